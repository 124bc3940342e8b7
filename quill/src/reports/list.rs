//! List command report data structures.

use super::output::{Output, Report};

/// Built-in generators and whether the manifest selects them.
#[derive(Debug)]
pub struct ListReport {
    /// `(name, selected)` in registration order.
    pub generators: Vec<(String, bool)>,
}

impl Report for ListReport {
    fn render(&self, out: &mut dyn Output) {
        out.section("Generators");
        for (name, selected) in &self.generators {
            if *selected {
                out.list_item(name);
            } else {
                out.list_item(&format!("{} (not selected)", name));
            }
        }
    }
}
