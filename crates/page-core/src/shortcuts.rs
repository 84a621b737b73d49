//! Global keyboard shortcuts

use std::rc::Rc;

use shared_types::events::{EventOutcome, KeyPress};

use crate::page::Page;

pub const SEARCH_SELECTOR: &str = r#"input[type="search"], .search-input"#;
pub const OPEN_MODAL_SELECTOR: &str = ".modal.show";

pub struct Shortcuts<P: Page> {
    page: Rc<P>,
}

impl<P: Page> Shortcuts<P> {
    pub fn new(page: Rc<P>) -> Self {
        Self { page }
    }

    /// Ctrl/Cmd+K focuses search, Escape closes open modals
    pub fn handle_key(&self, key: &KeyPress) -> EventOutcome {
        if key.is_command("k") {
            if let Some(search) = self.page.query_selector(SEARCH_SELECTOR) {
                self.page.focus(&search);
            }
            return EventOutcome::PreventDefault;
        }

        if key.key == "Escape" {
            for modal in self.page.query_selector_all(OPEN_MODAL_SELECTOR) {
                self.page.dismiss_modal(&modal);
            }
        }
        EventOutcome::Continue
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FakePage;

    #[test]
    fn test_command_k_focuses_search() {
        let page = Rc::new(FakePage::new());
        page.add(page.body(), "input").attr("type", "text");
        let search = page.add(page.body(), "input").class("search-input").node();
        let shortcuts = Shortcuts::new(page.clone());

        assert_eq!(
            shortcuts.handle_key(&KeyPress::new("k").with_meta()),
            EventOutcome::PreventDefault
        );
        assert_eq!(page.focused(), Some(search));

        assert_eq!(shortcuts.handle_key(&KeyPress::new("k")), EventOutcome::Continue);
    }

    #[test]
    fn test_escape_closes_modals() {
        let page = Rc::new(FakePage::new());
        let open = page.add(page.body(), "div").class("modal").class("show").node();
        let closed = page.add(page.body(), "div").class("modal").node();
        let shortcuts = Shortcuts::new(page.clone());

        assert_eq!(
            shortcuts.handle_key(&KeyPress::new("Escape")),
            EventOutcome::Continue
        );
        assert!(!page.has_class(&open, "show"));
        assert!(!page.has_class(&closed, "show"));
    }
}
