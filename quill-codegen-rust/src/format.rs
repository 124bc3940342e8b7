//! Formatting of generated Rust files.

use std::collections::HashSet;

use proc_macro2::{Ident, TokenStream, TokenTree};
use quote::ToTokens;
use syn::{
    ExprMethodCall, File, Item, Macro, Token, UseTree, Visibility,
    punctuated::Punctuated,
    visit::{self, Visit},
};

/// Format a generated file.
///
/// Private `use` items whose bound names never appear elsewhere in the file
/// are removed, the remaining ones are moved to the top in sorted order, and
/// the file is printed with `prettyplease`. Leading `//` comments (the
/// provenance banner) are carried over since the printer drops comments.
///
/// Globs, `as _` imports and `pub use` re-exports are always kept. Traits are
/// only referenced by name when called through a path, so in a file that
/// calls methods or macros a capitalized leaf is kept even when its name does
/// not appear.
pub fn format_source(src: &str) -> syn::Result<String> {
    let mut file = syn::parse_file(src)?;
    prune_unused_imports(&mut file);
    hoist_imports(&mut file);

    let mut out = leading_comments(src);
    out.push_str(&prettyplease::unparse(&file));
    Ok(out)
}

fn leading_comments(src: &str) -> String {
    let mut out = String::new();
    for line in src.lines() {
        let line = line.trim();
        if !line.starts_with("//") || line.starts_with("///") || line.starts_with("//!") {
            break;
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}

fn is_private_use(item: &Item) -> bool {
    matches!(item, Item::Use(item_use) if matches!(item_use.vis, Visibility::Inherited))
}

/// Names referenced outside of private `use` items.
#[derive(Debug, Default)]
struct Usage {
    idents: HashSet<String>,
    method_calls: bool,
}

impl Usage {
    fn of(file: &File) -> Self {
        let mut usage = Usage::default();
        for attr in &file.attrs {
            collect_idents(attr.to_token_stream(), &mut usage.idents);
        }
        for item in file.items.iter().filter(|item| !is_private_use(item)) {
            collect_idents(item.to_token_stream(), &mut usage.idents);
            usage.visit_item(item);
        }
        usage
    }

    fn binds(&self, ident: &Ident) -> bool {
        let name = ident.to_string();
        if self.idents.contains(&name) {
            return true;
        }
        // possibly a trait brought in for method resolution
        self.method_calls && name.starts_with(char::is_uppercase)
    }
}

impl<'ast> Visit<'ast> for Usage {
    fn visit_expr_method_call(&mut self, node: &'ast ExprMethodCall) {
        self.method_calls = true;
        visit::visit_expr_method_call(self, node);
    }

    // macro bodies are opaque and may expand to method calls (`write!`)
    fn visit_macro(&mut self, _node: &'ast Macro) {
        self.method_calls = true;
    }
}

fn prune_unused_imports(file: &mut File) {
    let used = Usage::of(file);

    let items = std::mem::take(&mut file.items);
    file.items = items
        .into_iter()
        .filter_map(|item| match item {
            Item::Use(mut item_use) if matches!(item_use.vis, Visibility::Inherited) => {
                item_use.tree = prune_tree(item_use.tree, None, &used)?;
                Some(Item::Use(item_use))
            }
            other => Some(other),
        })
        .collect();
}

fn collect_idents(tokens: TokenStream, used: &mut HashSet<String>) {
    for token in tokens {
        match token {
            TokenTree::Ident(ident) => {
                used.insert(ident.to_string());
            }
            TokenTree::Group(group) => collect_idents(group.stream(), used),
            TokenTree::Punct(_) | TokenTree::Literal(_) => {}
        }
    }
}

/// Drop the leaves of `tree` that bind unused names.
fn prune_tree(tree: UseTree, parent: Option<&Ident>, used: &Usage) -> Option<UseTree> {
    match tree {
        UseTree::Path(mut path) => {
            let ident = path.ident.clone();
            path.tree = Box::new(prune_tree(*path.tree, Some(&ident), used)?);
            Some(UseTree::Path(path))
        }
        UseTree::Name(name) => {
            // `self` in a group binds the parent segment
            let bound = if name.ident == "self" {
                parent
            } else {
                Some(&name.ident)
            };
            let keep = bound.is_none_or(|ident| used.binds(ident));
            keep.then_some(UseTree::Name(name))
        }
        UseTree::Rename(rename) => {
            let keep = rename.rename == "_" || used.binds(&rename.rename);
            keep.then_some(UseTree::Rename(rename))
        }
        UseTree::Glob(glob) => Some(UseTree::Glob(glob)),
        UseTree::Group(mut group) => {
            let items: Punctuated<UseTree, Token![,]> = group
                .items
                .into_iter()
                .filter_map(|tree| prune_tree(tree, parent, used))
                .collect();
            if items.is_empty() {
                return None;
            }
            group.items = items;
            Some(UseTree::Group(group))
        }
    }
}

fn hoist_imports(file: &mut File) {
    let items = std::mem::take(&mut file.items);
    let (uses, rest): (Vec<Item>, Vec<Item>) = items.into_iter().partition(is_private_use);

    let mut keyed: Vec<(String, Item)> = uses
        .into_iter()
        .map(|item| (item.to_token_stream().to_string(), item))
        .collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    keyed.dedup_by(|a, b| a.0 == b.0);

    file.items = keyed.into_iter().map(|(_, item)| item).chain(rest).collect();
}
