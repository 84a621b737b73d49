//! Class- and style-driven visual effects

use std::rc::Rc;

use config_system::{LayoutConfig, TimingConfig};
use shared_types::events::EventOutcome;

use crate::page::Page;
use crate::scheduler::Scheduler;

pub const ANCHOR_SELECTOR: &str = r##"a[href^="#"]"##;
pub const REVEAL_SELECTOR: &str = ".card, .feature-card, .stat-card";
pub const LIFT_SELECTOR: &str = ".card, .btn, .feature-card";
pub const BUTTON_SELECTOR: &str = ".btn";
pub const SELECT_SELECTOR: &str = "select";
pub const HERO_SELECTOR: &str = ".hero-section";

const FADE_IN_CLASS: &str = "fade-in";
const LOADING_CLASS: &str = "btn-loading";
const SELECTED_CLASS: &str = "selected";
const LOADING_HTML: &str = r#"<i class="fas fa-spinner fa-spin me-2"></i>Loading..."#;
const LIFTED_TRANSFORM: &str = "translateY(-5px) scale(1.02)";
const RESTING_TRANSFORM: &str = "translateY(0) scale(1)";

pub struct Effects<P: Page> {
    page: Rc<P>,
    scheduler: Rc<dyn Scheduler>,
    timing: TimingConfig,
    parallax_speed: f64,
}

impl<P: Page> Effects<P> {
    pub fn new(
        page: Rc<P>,
        scheduler: Rc<dyn Scheduler>,
        timing: TimingConfig,
        layout: &LayoutConfig,
    ) -> Self {
        Self {
            page,
            scheduler,
            timing,
            parallax_speed: layout.parallax_speed,
        }
    }

    /// Smooth-scroll to the target of an in-page link. The link's own
    /// navigation is always suppressed.
    pub fn scroll_to_anchor(&self, anchor: &P::Node) -> EventOutcome {
        let target = self
            .page
            .attribute(anchor, "href")
            .and_then(|href| href.strip_prefix('#').map(str::to_string))
            .filter(|id| !id.is_empty())
            .and_then(|id| self.page.element_by_id(&id));

        if let Some(target) = target {
            self.page.scroll_into_view(&target);
        }
        EventOutcome::PreventDefault
    }

    /// First time an element scrolls into view
    pub fn reveal(&self, node: &P::Node) {
        self.page.add_class(node, FADE_IN_CLASS);
    }

    pub fn parallax(&self, offset_y: f64) {
        let transform = format!("translateY({}px)", offset_y * self.parallax_speed);
        for hero in self.page.query_selector_all(HERO_SELECTOR) {
            self.page.set_style(&hero, "transform", &transform);
        }
    }

    pub fn lift(&self, node: &P::Node) {
        self.page.set_style(node, "transform", LIFTED_TRANSFORM);
    }

    pub fn settle(&self, node: &P::Node) {
        self.page.set_style(node, "transform", RESTING_TRANSFORM);
    }

    /// Put `button` in its loading state for a while. Returns false if it
    /// was already loading.
    pub fn start_loading(&self, button: &P::Node) -> bool {
        if self.page.has_class(button, LOADING_CLASS) {
            return false;
        }

        let original = self
            .page
            .attribute(button, "data-original-text")
            .unwrap_or_else(|| self.page.inner_html(button));
        self.page.add_class(button, LOADING_CLASS);
        self.page.set_inner_html(button, LOADING_HTML);

        let page = Rc::clone(&self.page);
        let button = button.clone();
        self.scheduler.set_timeout(
            self.timing.button_loading_ms,
            Box::new(move || {
                page.remove_class(&button, LOADING_CLASS);
                page.set_inner_html(&button, &original);
            }),
        );
        true
    }

    /// Briefly highlight a select after its value changed
    pub fn flash_select(&self, select: &P::Node) {
        self.page.add_class(select, SELECTED_CLASS);

        let page = Rc::clone(&self.page);
        let select = select.clone();
        self.scheduler.set_timeout(
            self.timing.select_flash_ms,
            Box::new(move || page.remove_class(&select, SELECTED_CLASS)),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakePage, ManualScheduler};

    fn setup() -> (Rc<FakePage>, Rc<ManualScheduler>, Effects<FakePage>) {
        let page = Rc::new(FakePage::new());
        let clock = Rc::new(ManualScheduler::new());
        let effects = Effects::new(
            page.clone(),
            clock.clone(),
            TimingConfig::default(),
            &LayoutConfig::default(),
        );
        (page, clock, effects)
    }

    #[test]
    fn test_anchor_scrolls_to_target() {
        let (page, _, effects) = setup();
        let link = page.add(page.body(), "a").attr("href", "#stats").node();
        let section = page.add(page.body(), "section").id("stats").node();
        let bare = page.add(page.body(), "a").attr("href", "#").node();

        assert_eq!(effects.scroll_to_anchor(&link), EventOutcome::PreventDefault);
        assert_eq!(page.scrolled_into_view(), vec![section]);

        assert_eq!(effects.scroll_to_anchor(&bare), EventOutcome::PreventDefault);
        assert_eq!(page.scrolled_into_view().len(), 1);
    }

    #[test]
    fn test_button_loading_restores_label() {
        let (page, clock, effects) = setup();
        let button = page.add(page.body(), "button").class("btn").text("Predict").node();

        assert!(effects.start_loading(&button));
        assert!(page.has_class(&button, LOADING_CLASS));
        assert!(page.inner_html(&button).contains("Loading..."));
        assert!(!effects.start_loading(&button));

        clock.advance(2000);
        assert!(!page.has_class(&button, LOADING_CLASS));
        assert_eq!(page.inner_html(&button), "Predict");
    }

    #[test]
    fn test_button_prefers_original_text_attribute() {
        let (page, clock, effects) = setup();
        let button = page
            .add(page.body(), "button")
            .class("btn")
            .attr("data-original-text", "Run prediction")
            .text("Run")
            .node();

        effects.start_loading(&button);
        clock.advance(2000);
        assert_eq!(page.inner_html(&button), "Run prediction");
    }

    #[test]
    fn test_select_flash() {
        let (page, clock, effects) = setup();
        let select = page.add(page.body(), "select").node();

        effects.flash_select(&select);
        assert!(page.has_class(&select, SELECTED_CLASS));
        clock.advance(199);
        assert!(page.has_class(&select, SELECTED_CLASS));
        clock.advance(1);
        assert!(!page.has_class(&select, SELECTED_CLASS));
    }

    #[test]
    fn test_parallax_and_hover() {
        let (page, _, effects) = setup();
        let hero = page.add(page.body(), "section").class("hero-section").node();
        let card = page.add(page.body(), "div").class("card").node();

        effects.parallax(300.0);
        assert_eq!(
            page.style(&hero, "transform").as_deref(),
            Some("translateY(150px)")
        );

        effects.lift(&card);
        assert_eq!(page.style(&card, "transform").as_deref(), Some(LIFTED_TRANSFORM));
        effects.settle(&card);
        assert_eq!(page.style(&card, "transform").as_deref(), Some(RESTING_TRANSFORM));

        effects.reveal(&card);
        assert!(page.has_class(&card, FADE_IN_CLASS));
    }
}
