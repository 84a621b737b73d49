//! Google Analytics `gtag` as an [`AnalyticsSink`]

use js_sys::{Function, Reflect};
use page_core::AnalyticsSink;
use serde::Serialize;
use shared_types::{PredictorError, PredictorResult};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::Window;

pub struct GtagSink {
    window: Window,
}

impl GtagSink {
    pub fn new(window: Window) -> Self {
        Self { window }
    }

    /// Looked up on every call; the tag script may load after us
    fn gtag(&self) -> Option<Function> {
        Reflect::get(&self.window, &"gtag".into())
            .ok()?
            .dyn_into::<Function>()
            .ok()
    }
}

impl AnalyticsSink for GtagSink {
    fn is_available(&self) -> bool {
        self.gtag().is_some()
    }

    fn send_event(&self, name: &str, payload: &serde_json::Value) -> PredictorResult<()> {
        let gtag = self.gtag().ok_or_else(|| PredictorError::JsInterop {
            message: "gtag is not defined".into(),
        })?;

        let serializer = serde_wasm_bindgen::Serializer::json_compatible();
        let payload = payload
            .serialize(&serializer)
            .map_err(|e| PredictorError::Serialization {
                message: e.to_string(),
            })?;

        gtag.call3(
            &JsValue::UNDEFINED,
            &"event".into(),
            &JsValue::from_str(name),
            &payload,
        )?;
        Ok(())
    }
}
