//! The page application: every component built once, plus event dispatch
//!
//! [`PredictorApp`] owns the components and routes [`PageEvent`]s to them.
//! The browser bridge owns the listeners and forwards native events here;
//! tests drive the same entry points against the in-memory page.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use config_system::PredictorConfig;
use shared_types::events::{EventOutcome, PageEvent};
use shared_types::{PredictorError, PredictorResult};
use wasm_storage::KeyValueStore;

use crate::charts::{AnalyticsCharts, ChartSlot};
use crate::debounce::Debouncer;
use crate::effects::{
    Effects, ANCHOR_SELECTOR, BUTTON_SELECTOR, LIFT_SELECTOR, REVEAL_SELECTOR, SELECT_SELECTOR,
};
use crate::forms::{FormPersistence, FORM_SELECTOR};
use crate::page::{Page, FIELD_SELECTOR};
use crate::responsive::Responsive;
use crate::scheduler::Scheduler;
use crate::services::{AnalyticsSink, Charting};
use crate::shortcuts::Shortcuts;
use crate::tooltip::TooltipController;
use crate::tracker::InteractionTracker;
use crate::validation::FieldValidator;

/// Capabilities the application needs besides the page itself
pub struct Services {
    pub storage: Rc<dyn KeyValueStore>,
    pub scheduler: Rc<dyn Scheduler>,
    pub charting: Rc<dyn Charting>,
    pub analytics: Rc<dyn AnalyticsSink>,
}

/// What initialization found and did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InitReport {
    pub forms: usize,
    pub restored_fields: usize,
    pub font_size_px: u32,
    pub scrollable_tables: usize,
    pub charts: Vec<ChartSlot>,
}

pub struct PredictorApp<P: Page> {
    page: Rc<P>,
    config: PredictorConfig,
    scheduler: Rc<dyn Scheduler>,
    validator: FieldValidator<P>,
    forms: Rc<FormPersistence<P>>,
    tracker: InteractionTracker<P>,
    tooltips: TooltipController<P>,
    charts: AnalyticsCharts<P>,
    effects: Effects<P>,
    responsive: Responsive<P>,
    shortcuts: Shortcuts<P>,
    form_savers: RefCell<Vec<(P::Node, Debouncer<P::Node>)>>,
    initialized: Cell<bool>,
}

impl<P: Page> PredictorApp<P> {
    pub fn new(page: Rc<P>, config: PredictorConfig, services: Services) -> Self {
        let Services {
            storage,
            scheduler,
            charting,
            analytics,
        } = services;

        Self {
            validator: FieldValidator::new(Rc::clone(&page)),
            forms: Rc::new(FormPersistence::new(
                Rc::clone(&page),
                storage,
                config.forms.clone(),
            )),
            tracker: InteractionTracker::new(Rc::clone(&page), analytics, config.tracking.clone()),
            tooltips: TooltipController::new(Rc::clone(&page), config.tooltip.clone()),
            charts: AnalyticsCharts::new(Rc::clone(&page), charting, config.charts.clone()),
            effects: Effects::new(
                Rc::clone(&page),
                Rc::clone(&scheduler),
                config.timing.clone(),
                &config.layout,
            ),
            responsive: Responsive::new(
                Rc::clone(&page),
                Rc::clone(&scheduler),
                config.layout.clone(),
                config.timing.resize_debounce_ms,
            ),
            shortcuts: Shortcuts::new(Rc::clone(&page)),
            form_savers: RefCell::new(Vec::new()),
            initialized: Cell::new(false),
            scheduler,
            config,
            page,
        }
    }

    /// Restore saved forms, size the layout and render charts. Runs once;
    /// later calls fail with [`PredictorError::AlreadyInitialized`].
    pub fn initialize(&self) -> PredictorResult<InitReport> {
        if self.initialized.replace(true) {
            log::warn!("Page already initialized; ignoring repeat");
            return Err(PredictorError::AlreadyInitialized);
        }
        log::info!("Initializing Football Predictor page");

        let forms = self.page.query_selector_all(FORM_SELECTOR);
        let mut restored_fields = 0;
        {
            let mut savers = self.form_savers.borrow_mut();
            for form in &forms {
                restored_fields += self.forms.load(form);
                savers.push((form.clone(), self.form_saver()));
            }
        }

        let report = InitReport {
            forms: forms.len(),
            restored_fields,
            font_size_px: self.responsive.adjust_font_size(),
            scrollable_tables: self.responsive.mark_scrollable_tables(),
            charts: self.charts.initialize(),
        };
        log::info!(
            "Initialized: {} form(s), {} restored field(s), {} chart(s)",
            report.forms,
            report.restored_fields,
            report.charts.len()
        );
        Ok(report)
    }

    /// Wire the page's listeners with `attach`, then [`initialize`]. A
    /// failing `attach` leaves the page untouched and the app still
    /// uninitialized, so a later launch can start over.
    ///
    /// [`initialize`]: PredictorApp::initialize
    pub fn launch<S>(
        self: &Rc<Self>,
        attach: impl FnOnce(&Rc<Self>) -> PredictorResult<S>,
    ) -> PredictorResult<(InitReport, S)> {
        if self.is_initialized() {
            return Err(PredictorError::AlreadyInitialized);
        }
        let subscriptions = attach(self)?;
        let report = self.initialize()?;
        Ok((report, subscriptions))
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.get()
    }

    fn form_saver(&self) -> Debouncer<P::Node> {
        let forms = Rc::clone(&self.forms);
        Debouncer::new(
            Rc::clone(&self.scheduler),
            self.config.timing.form_save_debounce_ms,
            move |target: P::Node| {
                if let Err(e) = forms.save_enclosing(&target) {
                    log::warn!("Form auto-save failed: {e}");
                }
            },
        )
    }

    /// Route one page event to the components that care about it
    pub fn handle(&self, event: PageEvent<P::Node>) -> EventOutcome {
        match event {
            PageEvent::Click { target } => self.on_click(&target),
            PageEvent::Input { target } => {
                self.on_input(&target);
                EventOutcome::Continue
            }
            PageEvent::FocusOut { target } => {
                if self.page.matches(&target, FIELD_SELECTOR) {
                    self.validator.validate(&target);
                }
                EventOutcome::Continue
            }
            PageEvent::Change { target } => {
                if self.page.matches(&target, SELECT_SELECTOR) {
                    self.effects.flash_select(&target);
                }
                EventOutcome::Continue
            }
            PageEvent::PointerEnter { target } => {
                self.tooltips.show(&target);
                if self.page.matches(&target, LIFT_SELECTOR) {
                    self.effects.lift(&target);
                }
                EventOutcome::Continue
            }
            PageEvent::PointerLeave { target } => {
                self.tooltips.hide(&target);
                if self.page.matches(&target, LIFT_SELECTOR) {
                    self.effects.settle(&target);
                }
                EventOutcome::Continue
            }
            PageEvent::BecameVisible { target } => {
                self.effects.reveal(&target);
                EventOutcome::Continue
            }
            PageEvent::KeyDown(key) => self.shortcuts.handle_key(&key),
            PageEvent::Scroll { offset_y } => {
                self.effects.parallax(offset_y);
                EventOutcome::Continue
            }
            PageEvent::Resize => {
                self.responsive.on_resize();
                EventOutcome::Continue
            }
            PageEvent::Loaded { elapsed_ms } => {
                self.tracker.track_page_load(elapsed_ms);
                EventOutcome::Continue
            }
        }
    }

    fn on_click(&self, target: &P::Node) -> EventOutcome {
        // Tracked before the button's label is swapped for the spinner
        self.tracker.handle_click(target);
        self.responsive.handle_nav_click(target);

        let mut outcome = EventOutcome::Continue;
        if let Some(anchor) = self.page.closest(target, ANCHOR_SELECTOR) {
            outcome = outcome.merge(self.effects.scroll_to_anchor(&anchor));
        }
        if let Some(button) = self.page.closest(target, BUTTON_SELECTOR) {
            self.effects.start_loading(&button);
        }
        outcome
    }

    fn on_input(&self, target: &P::Node) {
        if self.page.matches(target, FIELD_SELECTOR) {
            self.validator.clear_error(target);
        }

        let Some(form) = self.page.closest(target, FORM_SELECTOR) else {
            return;
        };
        let savers = self.form_savers.borrow();
        match savers.iter().find(|(owner, _)| *owner == form) {
            Some((_, saver)) => saver.call(target.clone()),
            None => log::debug!("Input in a form that was not present at startup"),
        }
    }

    /// Elements that need pointer enter/leave listeners
    pub fn hover_targets(&self) -> Vec<P::Node> {
        let selector = format!("{LIFT_SELECTOR}, {}", self.tooltips.selector());
        self.page.query_selector_all(&selector)
    }

    /// Elements watched for their first appearance in the viewport
    pub fn reveal_targets(&self) -> Vec<P::Node> {
        self.page.query_selector_all(REVEAL_SELECTOR)
    }

    pub fn page(&self) -> &Rc<P> {
        &self.page
    }

    pub fn config(&self) -> &PredictorConfig {
        &self.config
    }

    pub fn validator(&self) -> &FieldValidator<P> {
        &self.validator
    }

    pub fn forms(&self) -> &FormPersistence<P> {
        &self.forms
    }

    pub fn tracker(&self) -> &InteractionTracker<P> {
        &self.tracker
    }

    pub fn tooltips(&self) -> &TooltipController<P> {
        &self.tooltips
    }

    pub fn charts(&self) -> &AnalyticsCharts<P> {
        &self.charts
    }
}
