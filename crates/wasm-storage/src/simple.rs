use shared_types::{PredictorError, PredictorResult};
use wasm_bindgen::JsValue;

use crate::KeyValueStore;

/// Browser LocalStorage for the page's origin
pub struct SimpleStorage;

impl SimpleStorage {
    /// Create storage using LocalStorage
    pub fn local() -> Self {
        Self
    }

    fn get_storage(&self) -> PredictorResult<web_sys::Storage> {
        let window = web_sys::window().ok_or_else(|| PredictorError::Storage {
            message: "No window object".into(),
        })?;

        window
            .local_storage()
            .map_err(|_| PredictorError::Storage {
                message: "LocalStorage not available".into(),
            })?
            .ok_or_else(|| PredictorError::Storage {
                message: "LocalStorage not supported".into(),
            })
    }
}

impl KeyValueStore for SimpleStorage {
    fn get(&self, key: &str) -> PredictorResult<Option<String>> {
        let storage = self.get_storage()?;
        storage.get_item(key).map_err(storage_error)
    }

    fn set(&self, key: &str, value: &str) -> PredictorResult<()> {
        let storage = self.get_storage()?;
        storage.set_item(key, value).map_err(storage_error)
    }

    fn remove(&self, key: &str) -> PredictorResult<()> {
        let storage = self.get_storage()?;
        storage.remove_item(key).map_err(storage_error)
    }
}

fn storage_error(err: JsValue) -> PredictorError {
    PredictorError::Storage {
        message: err.as_string().unwrap_or_else(|| format!("{err:?}")),
    }
}
