//! Common error type used across the predictor crates

use thiserror::Error;

/// Base error type for page runtime operations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PredictorError {
    #[error("Element not found: {selector}")]
    MissingElement { selector: String },

    #[error("Storage error: {message}")]
    Storage { message: String },

    #[error("Serialization error: {message}")]
    Serialization { message: String },

    #[error("Chart rendering failed for {canvas}: {message}")]
    Charting { canvas: String, message: String },

    #[error("JavaScript interop error: {message}")]
    JsInterop { message: String },

    #[error("Invalid configuration: {message}")]
    Config { message: String },

    #[error("Page runtime already initialized")]
    AlreadyInitialized,
}

/// Result type alias for page runtime operations
pub type PredictorResult<T> = Result<T, PredictorError>;

impl PredictorError {
    pub fn missing(selector: impl Into<String>) -> Self {
        PredictorError::MissingElement {
            selector: selector.into(),
        }
    }
}

impl From<serde_json::Error> for PredictorError {
    fn from(err: serde_json::Error) -> Self {
        PredictorError::Serialization {
            message: err.to_string(),
        }
    }
}

impl From<wasm_bindgen::JsValue> for PredictorError {
    fn from(err: wasm_bindgen::JsValue) -> Self {
        PredictorError::JsInterop {
            message: err.as_string().unwrap_or_else(|| format!("{err:?}")),
        }
    }
}

impl From<PredictorError> for wasm_bindgen::JsValue {
    fn from(err: PredictorError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}
