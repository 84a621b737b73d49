//! Viewport-dependent layout tweaks

use std::rc::Rc;

use config_system::LayoutConfig;

use crate::debounce::Debouncer;
use crate::page::Page;
use crate::scheduler::Scheduler;

pub const NAV_TOGGLER_SELECTOR: &str = ".navbar-toggler";
pub const NAV_COLLAPSE_SELECTOR: &str = ".navbar-collapse";
pub const TABLE_SELECTOR: &str = ".table-responsive";

const NAV_OPEN_CLASS: &str = "show";
const SCROLLABLE_CLASS: &str = "has-horizontal-scroll";

/// Set the root font size for the current viewport width
pub fn apply_font_size<P: Page>(page: &P, layout: &LayoutConfig) -> u32 {
    let size = layout.font_size_for(page.viewport_width());
    page.set_style(&page.document_element(), "font-size", &format!("{size}px"));
    size
}

pub struct Responsive<P: Page> {
    page: Rc<P>,
    layout: LayoutConfig,
    resize: Debouncer<()>,
}

impl<P: Page> Responsive<P> {
    pub fn new(
        page: Rc<P>,
        scheduler: Rc<dyn Scheduler>,
        layout: LayoutConfig,
        resize_ms: u32,
    ) -> Self {
        let resize = {
            let page = Rc::clone(&page);
            let layout = layout.clone();
            Debouncer::new(scheduler, resize_ms, move |()| {
                apply_font_size(page.as_ref(), &layout);
            })
        };

        Self {
            page,
            layout,
            resize,
        }
    }

    pub fn adjust_font_size(&self) -> u32 {
        apply_font_size(self.page.as_ref(), &self.layout)
    }

    /// Window resized; font size follows once resizing settles
    pub fn on_resize(&self) {
        self.resize.call(());
    }

    /// Mark responsive tables that need horizontal scrolling
    pub fn mark_scrollable_tables(&self) -> usize {
        let mut marked = 0;
        for table in self.page.query_selector_all(TABLE_SELECTOR) {
            if self.page.overflows_horizontally(&table) {
                self.page.add_class(&table, SCROLLABLE_CLASS);
                marked += 1;
            }
        }
        marked
    }

    /// Mobile menu: the toggler opens and closes it, any click outside both
    /// the toggler and the menu closes it.
    pub fn handle_nav_click(&self, target: &P::Node) {
        let (Some(toggler), Some(collapse)) = (
            self.page.query_selector(NAV_TOGGLER_SELECTOR),
            self.page.query_selector(NAV_COLLAPSE_SELECTOR),
        ) else {
            return;
        };

        if self.page.contains(&toggler, target) {
            self.page.toggle_class(&collapse, NAV_OPEN_CLASS);
        } else if !self.page.contains(&collapse, target) {
            self.page.remove_class(&collapse, NAV_OPEN_CLASS);
        }
    }
}
