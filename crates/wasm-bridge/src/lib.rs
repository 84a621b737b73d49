//! WASM bridge for the Football Predictor pages
//! Binds the page components to the live DOM, Chart.js, gtag and storage,
//! and exposes the `FootballPredictor` namespace to page scripts.

use std::cell::RefCell;
use std::rc::Rc;

use config_system::{ConfigParser, PredictorConfig};
use js_sys::{Array, Object, Reflect};
use page_core::{ChartSlot, PredictorApp, Services};
use shared_types::events::PageEvent;
use shared_types::{PredictorError, PredictorResult};
use wasm_bindgen::prelude::*;
use wasm_storage::SimpleStorage;
use web_sys::{Document, Element};

pub mod analytics;
pub mod chart_js;
pub mod dom;
pub mod listeners;
pub mod service_worker;
pub mod timers;

use analytics::GtagSink;
use chart_js::ChartJsCharting;
use dom::WebPage;
use listeners::Subscriptions;
use timers::WindowScheduler;

/// Inline JSON block a page can use to override the defaults
pub const CONFIG_ELEMENT_ID: &str = "predictor-config";

/// Global the public functions are published under for classic scripts
pub const NAMESPACE: &str = "FootballPredictor";

struct Runtime {
    app: Rc<PredictorApp<WebPage>>,
    _subscriptions: Subscriptions,
}

// One runtime per page
thread_local! {
    static RUNTIME: RefCell<Option<Runtime>> = const { RefCell::new(None) };
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    console_error_panic_hook::set_once();
    // A host page may have installed a logger already
    let _ = console_log::init_with_level(log::Level::Info);

    let window = web_sys::window().ok_or("No window object")?;
    let document = window.document().ok_or("No document")?;

    if document.ready_state() == "loading" {
        let on_ready = Closure::once_into_js(move || {
            if let Err(e) = boot() {
                log::error!("Football Predictor failed to start: {e}");
            }
        });
        document.add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())?;
    } else {
        boot()?;
    }
    Ok(())
}

/// Build the application, attach listeners, then restore state and render
/// charts. Only the first successful call does anything.
fn boot() -> PredictorResult<()> {
    if RUNTIME.with(|runtime| runtime.borrow().is_some()) {
        return Err(PredictorError::AlreadyInitialized);
    }

    let window = web_sys::window().ok_or_else(|| PredictorError::missing("window"))?;
    let document = window
        .document()
        .ok_or_else(|| PredictorError::missing("document"))?;
    let config = load_config(&document);

    let page = Rc::new(WebPage::new(window.clone())?);
    let charting = ChartJsCharting::new(window.clone(), document.clone());
    if !charting.is_loaded() {
        log::warn!("Chart.js not found; charts will be skipped");
    }
    let services = Services {
        storage: Rc::new(SimpleStorage::local()),
        scheduler: Rc::new(WindowScheduler::new(window.clone())),
        charting: Rc::new(charting),
        analytics: Rc::new(GtagSink::new(window.clone())),
    };

    let app = Rc::new(PredictorApp::new(page, config.clone(), services));
    let (_, subscriptions) = app.launch(|app| Subscriptions::attach(app, &window, &document))?;
    service_worker::spawn_registration(window.clone(), &config.service_worker);

    // The load event has already fired when we start late
    if document.ready_state() == "complete" {
        app.handle(PageEvent::Loaded {
            elapsed_ms: listeners::elapsed_ms(&window),
        });
    }

    RUNTIME.with(|runtime| {
        *runtime.borrow_mut() = Some(Runtime {
            app,
            _subscriptions: subscriptions,
        });
    });
    if let Err(e) = publish_namespace(&window) {
        log::warn!("Could not publish window.{NAMESPACE}: {e}");
    }
    log::info!("Football Predictor ready");
    Ok(())
}

/// Put the [`FootballPredictor`] functions on `window` so classic
/// `<script>` blocks can call them without importing the module
fn publish_namespace(window: &web_sys::Window) -> PredictorResult<()> {
    let namespace = Object::new();

    export(&namespace, "isInitialized", || {
        Ok(FootballPredictor::is_initialized().into())
    })?;
    export_with_element(&namespace, "trackInteraction", |element| {
        FootballPredictor::track_interaction(&element)
    })?;
    export_with_element(&namespace, "saveFormData", |element| {
        FootballPredictor::save_form_data(&element).map(JsValue::from)
    })?;
    export_with_element(&namespace, "loadFormData", |form| {
        FootballPredictor::load_form_data(&form).map(|restored| JsValue::from(restored as f64))
    })?;
    export_with_element(&namespace, "validateField", |field| {
        FootballPredictor::validate_field(&field).map(JsValue::from)
    })?;
    export_with_element(&namespace, "showTooltip", |element| {
        FootballPredictor::show_tooltip(&element).map(JsValue::from)
    })?;
    export_with_element(&namespace, "hideTooltip", |element| {
        FootballPredictor::hide_tooltip(&element).map(JsValue::from)
    })?;
    export(&namespace, "initializeAnalyticsCharts", || {
        let rendered = FootballPredictor::initialize_analytics_charts()?;
        Ok(rendered.into_iter().collect::<Array>().into())
    })?;
    export(&namespace, "createStrengthChart", || {
        FootballPredictor::create_strength_chart().map(|_| JsValue::UNDEFINED)
    })?;
    export(&namespace, "createProbabilityChart", || {
        FootballPredictor::create_probability_chart().map(|_| JsValue::UNDEFINED)
    })?;
    export(&namespace, "createFormChart", || {
        FootballPredictor::create_form_chart().map(|_| JsValue::UNDEFINED)
    })?;
    export(&namespace, "createH2HChart", || {
        FootballPredictor::create_h2h_chart().map(|_| JsValue::UNDEFINED)
    })?;

    Reflect::set(window, &NAMESPACE.into(), &namespace)?;
    Ok(())
}

type Exported = Result<JsValue, JsValue>;

// Each closure is handed to JS and lives as long as the page
fn export(
    namespace: &Object,
    name: &str,
    f: impl Fn() -> Exported + 'static,
) -> PredictorResult<()> {
    let function = Closure::<dyn Fn() -> Exported>::new(f).into_js_value();
    Reflect::set(namespace, &name.into(), &function)?;
    Ok(())
}

fn export_with_element(
    namespace: &Object,
    name: &str,
    f: impl Fn(Element) -> Exported + 'static,
) -> PredictorResult<()> {
    let function = Closure::<dyn Fn(Element) -> Exported>::new(f).into_js_value();
    Reflect::set(namespace, &name.into(), &function)?;
    Ok(())
}

/// Page config from the inline JSON or TOML block, or defaults
fn load_config(document: &Document) -> PredictorConfig {
    let Some(element) = document.get_element_by_id(CONFIG_ELEMENT_ID) else {
        return PredictorConfig::default();
    };
    let text = element.text_content().unwrap_or_default();
    let media_type = element.get_attribute("type").unwrap_or_default();

    let loaded = ConfigParser::detect_format(&media_type)
        .and_then(|format| ConfigParser::load(&text, format));
    match loaded {
        Ok(config) => config,
        Err(e) => {
            log::warn!("Ignoring #{CONFIG_ELEMENT_ID}: {e}");
            PredictorConfig::default()
        }
    }
}

fn with_app<R>(f: impl FnOnce(&PredictorApp<WebPage>) -> R) -> Result<R, JsValue> {
    // Cloned out so `f` runs without the runtime borrowed
    let app = RUNTIME.with(|runtime| runtime.borrow().as_ref().map(|r| Rc::clone(&r.app)));
    app.map(|app| f(&app))
        .ok_or_else(|| JsValue::from_str("Football Predictor is not initialized"))
}

fn render_chart(slot: ChartSlot) -> Result<(), JsValue> {
    with_app(|app| app.charts().render(slot))?.map_err(JsValue::from)
}

/// `window.FootballPredictor`
#[wasm_bindgen]
pub struct FootballPredictor;

#[wasm_bindgen]
impl FootballPredictor {
    #[wasm_bindgen(js_name = isInitialized)]
    pub fn is_initialized() -> bool {
        with_app(|app| app.is_initialized()).unwrap_or(false)
    }

    /// Log and forward an interaction record for `element`
    #[wasm_bindgen(js_name = trackInteraction)]
    pub fn track_interaction(element: &Element) -> Result<JsValue, JsValue> {
        let record = with_app(|app| app.tracker().track(element))?;
        let serializer = serde_wasm_bindgen::Serializer::json_compatible();
        serde::Serialize::serialize(&record, &serializer).map_err(JsValue::from)
    }

    /// Save the form enclosing `element` now; false if there is none
    #[wasm_bindgen(js_name = saveFormData)]
    pub fn save_form_data(element: &Element) -> Result<bool, JsValue> {
        let saved = with_app(|app| app.forms().save_enclosing(element))??;
        Ok(saved.is_some())
    }

    /// Fill empty fields of `form` from storage; returns how many
    #[wasm_bindgen(js_name = loadFormData)]
    pub fn load_form_data(form: &Element) -> Result<usize, JsValue> {
        with_app(|app| app.forms().load(form))
    }

    /// Validate `field`; returns the error message, if any
    #[wasm_bindgen(js_name = validateField)]
    pub fn validate_field(field: &Element) -> Result<Option<String>, JsValue> {
        with_app(|app| {
            app.validator()
                .validate(field)
                .map(|error| error.message().to_string())
        })
    }

    #[wasm_bindgen(js_name = showTooltip)]
    pub fn show_tooltip(element: &Element) -> Result<bool, JsValue> {
        with_app(|app| app.tooltips().show(element).is_some())
    }

    #[wasm_bindgen(js_name = hideTooltip)]
    pub fn hide_tooltip(element: &Element) -> Result<bool, JsValue> {
        with_app(|app| app.tooltips().hide(element))
    }

    /// Render every chart whose canvas exists; returns the canvas ids drawn
    #[wasm_bindgen(js_name = initializeAnalyticsCharts)]
    pub fn initialize_analytics_charts() -> Result<Vec<JsValue>, JsValue> {
        let rendered = with_app(|app| app.charts().initialize())?;
        Ok(rendered
            .into_iter()
            .map(|slot| JsValue::from_str(slot.canvas_id()))
            .collect())
    }

    #[wasm_bindgen(js_name = createStrengthChart)]
    pub fn create_strength_chart() -> Result<(), JsValue> {
        render_chart(ChartSlot::Strength)
    }

    #[wasm_bindgen(js_name = createProbabilityChart)]
    pub fn create_probability_chart() -> Result<(), JsValue> {
        render_chart(ChartSlot::Probability)
    }

    #[wasm_bindgen(js_name = createFormChart)]
    pub fn create_form_chart() -> Result<(), JsValue> {
        render_chart(ChartSlot::Form)
    }

    #[wasm_bindgen(js_name = createH2HChart)]
    pub fn create_h2h_chart() -> Result<(), JsValue> {
        render_chart(ChartSlot::HeadToHead)
    }
}
