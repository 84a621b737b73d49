//! Hover tooltips built from a data attribute

use std::cell::RefCell;
use std::rc::Rc;

use config_system::TooltipConfig;
use shared_types::tooltip::TooltipPlacement;

use crate::page::Page;

/// Tracks the overlay shown for each hovered element
pub struct TooltipController<P: Page> {
    page: Rc<P>,
    config: TooltipConfig,
    overlays: RefCell<Vec<(P::Node, P::Node)>>,
}

impl<P: Page> TooltipController<P> {
    pub fn new(page: Rc<P>, config: TooltipConfig) -> Self {
        Self {
            page,
            config,
            overlays: RefCell::new(Vec::new()),
        }
    }

    /// Selector for elements carrying a caption
    pub fn selector(&self) -> String {
        format!("[{}]", self.config.attribute)
    }

    pub fn has_caption(&self, element: &P::Node) -> bool {
        self.page.has_attribute(element, &self.config.attribute)
    }

    /// Show the overlay for `element`. Already shown: returns the existing
    /// overlay. No caption attribute: nothing is created.
    pub fn show(&self, element: &P::Node) -> Option<P::Node> {
        if let Some(existing) = self.overlay_for(element) {
            return Some(existing);
        }
        let caption = self.page.attribute(element, &self.config.attribute)?;

        let overlay = match self.page.create_element("div") {
            Ok(overlay) => overlay,
            Err(e) => {
                log::warn!("Could not create tooltip: {e}");
                return None;
            }
        };
        self.page.add_class(&overlay, &self.config.class_name);
        self.page.set_text_content(&overlay, &caption);
        // Size is only measurable once attached
        self.page.append_to_body(&overlay);

        let placement = TooltipPlacement::above(
            self.page.bounding_rect(element),
            self.page.offset_size(&overlay),
            self.config.gap_px,
        );
        self.page.set_style(&overlay, "left", &placement.left_px());
        self.page.set_style(&overlay, "top", &placement.top_px());

        self.overlays
            .borrow_mut()
            .push((element.clone(), overlay.clone()));
        Some(overlay)
    }

    /// Remove the overlay for `element`; false if none was shown
    pub fn hide(&self, element: &P::Node) -> bool {
        let removed = {
            let mut overlays = self.overlays.borrow_mut();
            overlays
                .iter()
                .position(|(owner, _)| owner == element)
                .map(|index| overlays.remove(index).1)
        };

        match removed {
            Some(overlay) => {
                self.page.remove(&overlay);
                true
            }
            None => false,
        }
    }

    pub fn overlay_for(&self, element: &P::Node) -> Option<P::Node> {
        self.overlays
            .borrow()
            .iter()
            .find(|(owner, _)| owner == element)
            .map(|(_, overlay)| overlay.clone())
    }

    pub fn active_count(&self) -> usize {
        self.overlays.borrow().len()
    }
}
