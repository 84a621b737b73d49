//! Chart.js behind the [`Charting`] capability

use std::cell::RefCell;

use js_sys::{Object, Reflect};
use page_core::Charting;
use serde::Serialize;
use shared_types::chart_config::ChartConfiguration;
use shared_types::{PredictorError, PredictorResult};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, HtmlCanvasElement, Window};

#[wasm_bindgen]
extern "C" {
    /// The global `Chart` constructor
    #[wasm_bindgen(js_name = Chart)]
    type ChartJs;

    #[wasm_bindgen(constructor, js_class = "Chart", catch)]
    fn new(context: &JsValue, config: &JsValue) -> Result<ChartJs, JsValue>;
}

type TickCallback = Closure<dyn Fn(JsValue) -> JsValue>;

/// Builds Chart.js charts and keeps them (and their callbacks) alive
pub struct ChartJsCharting {
    window: Window,
    document: Document,
    charts: RefCell<Vec<ChartJs>>,
    tick_callbacks: RefCell<Vec<TickCallback>>,
}

impl ChartJsCharting {
    pub fn new(window: Window, document: Document) -> Self {
        Self {
            window,
            document,
            charts: RefCell::new(Vec::new()),
            tick_callbacks: RefCell::new(Vec::new()),
        }
    }

    pub fn is_loaded(&self) -> bool {
        Reflect::has(&self.window, &"Chart".into()).unwrap_or(false)
    }

    pub fn chart_count(&self) -> usize {
        self.charts.borrow().len()
    }

    fn context(&self, canvas_id: &str) -> PredictorResult<JsValue> {
        let canvas = self
            .document
            .get_element_by_id(canvas_id)
            .ok_or_else(|| PredictorError::missing(format!("#{canvas_id}")))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| charting_error(canvas_id, "element is not a canvas"))?;

        canvas
            .get_context("2d")?
            .map(JsValue::from)
            .ok_or_else(|| charting_error(canvas_id, "2D context unavailable"))
    }

    /// Chart.js formats ticks through a function, which JSON cannot carry
    fn install_tick_suffix(&self, config: &JsValue, suffix: &str) -> Result<(), JsValue> {
        let options = child_object(config, "options")?;
        let scales = child_object(&options, "scales")?;
        let y = child_object(&scales, "y")?;
        let ticks = child_object(&y, "ticks")?;

        let suffix = suffix.to_string();
        let callback: TickCallback = Closure::new(move |value: JsValue| {
            let shown = match value.as_f64() {
                Some(number) => number.to_string(),
                None => value.as_string().unwrap_or_default(),
            };
            JsValue::from_str(&format!("{shown}{suffix}"))
        });
        Reflect::set(&ticks, &"callback".into(), callback.as_ref())?;
        self.tick_callbacks.borrow_mut().push(callback);
        Ok(())
    }
}

impl Charting for ChartJsCharting {
    fn render(&self, canvas_id: &str, config: &ChartConfiguration) -> PredictorResult<()> {
        if !self.is_loaded() {
            return Err(charting_error(canvas_id, "Chart.js is not loaded"));
        }
        let context = self.context(canvas_id)?;

        let serializer = serde_wasm_bindgen::Serializer::json_compatible();
        let js_config = config
            .serialize(&serializer)
            .map_err(|e| PredictorError::Serialization {
                message: e.to_string(),
            })?;
        if let Some(suffix) = &config.y_tick_suffix {
            self.install_tick_suffix(&js_config, suffix)?;
        }

        let chart = ChartJs::new(&context, &js_config)
            .map_err(|e| charting_error(canvas_id, &format!("{e:?}")))?;
        self.charts.borrow_mut().push(chart);
        log::info!("Chart created on #{canvas_id}");
        Ok(())
    }
}

fn charting_error(canvas: &str, message: &str) -> PredictorError {
    PredictorError::Charting {
        canvas: canvas.to_string(),
        message: message.to_string(),
    }
}

/// `parent[key]`, created as `{}` when absent
fn child_object(parent: &JsValue, key: &str) -> Result<JsValue, JsValue> {
    let key = JsValue::from_str(key);
    let existing = Reflect::get(parent, &key)?;
    if existing.is_object() {
        return Ok(existing);
    }
    let created: JsValue = Object::new().into();
    Reflect::set(parent, &key, &created)?;
    Ok(created)
}
