//! Form auto-save to browser storage

use std::rc::Rc;

use config_system::{AnonymousFormKeys, FormConfig};
use shared_types::{FormSnapshot, PredictorResult};
use wasm_storage::KeyValueStore;

use crate::page::Page;

pub const FORM_SELECTOR: &str = "form";

/// Saves and restores one snapshot per form
pub struct FormPersistence<P: Page> {
    page: Rc<P>,
    store: Rc<dyn KeyValueStore>,
    config: FormConfig,
}

impl<P: Page> FormPersistence<P> {
    pub fn new(page: Rc<P>, store: Rc<dyn KeyValueStore>, config: FormConfig) -> Self {
        Self {
            page,
            store,
            config,
        }
    }

    /// Storage key for `form`: `form_<id>`, or the anonymous key. An
    /// anonymous form outside the document has no index and no key.
    pub fn storage_key(&self, form: &P::Node) -> Option<String> {
        let prefix = &self.config.key_prefix;
        if let Some(id) = self.page.attribute(form, "id").filter(|id| !id.is_empty()) {
            return Some(format!("{prefix}{id}"));
        }

        let anonymous = &self.config.anonymous_name;
        match self.config.anonymous_keys {
            AnonymousFormKeys::Shared => Some(format!("{prefix}{anonymous}")),
            AnonymousFormKeys::DocumentIndex => self
                .page
                .query_selector_all(FORM_SELECTOR)
                .iter()
                .position(|candidate| candidate == form)
                .map(|index| format!("{prefix}{anonymous}_{index}")),
        }
    }

    /// Current named field values of `form`
    pub fn snapshot(&self, form: &P::Node) -> FormSnapshot {
        self.page.form_entries(form).into_iter().collect()
    }

    /// Overwrite the stored snapshot for `form` with its current values.
    /// `None` when the form has no storage key.
    pub fn save(&self, form: &P::Node) -> PredictorResult<Option<FormSnapshot>> {
        let Some(key) = self.storage_key(form) else {
            log::debug!("Skipping save of a detached anonymous form");
            return Ok(None);
        };
        let snapshot = self.snapshot(form);
        self.store.set(&key, &snapshot.to_json()?)?;
        log::debug!("Saved {} field(s) under {key}", snapshot.len());
        Ok(Some(snapshot))
    }

    /// Save the form enclosing `node`, if there is one
    pub fn save_enclosing(&self, node: &P::Node) -> PredictorResult<Option<FormSnapshot>> {
        match self.page.closest(node, FORM_SELECTOR) {
            Some(form) => self.save(&form),
            None => Ok(None),
        }
    }

    /// Stored snapshot for `form`. Unreadable or malformed records count as
    /// no saved data.
    pub fn saved(&self, form: &P::Node) -> Option<FormSnapshot> {
        let key = self.storage_key(form)?;
        let raw = match self.store.get(&key) {
            Ok(raw) => raw?,
            Err(e) => {
                log::warn!("Could not read {key}: {e}");
                return None;
            }
        };

        match FormSnapshot::from_json(&raw) {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                log::warn!("Ignoring malformed saved data under {key}: {e}");
                None
            }
        }
    }

    /// Fill empty fields of `form` from its stored snapshot. Returns the
    /// number of fields restored.
    pub fn load(&self, form: &P::Node) -> usize {
        let Some(snapshot) = self.saved(form) else {
            return 0;
        };

        let mut restored = 0;
        for (name, value) in snapshot.iter() {
            let Some(field) = self.page.field_named(form, name) else {
                continue;
            };
            if self.page.field_value(&field).is_some_and(|current| current.is_empty()) {
                self.page.set_field_value(&field, value);
                restored += 1;
            }
        }

        if restored > 0 {
            log::debug!("Restored {restored} field(s)");
        }
        restored
    }
}
