//! Click and page-load tracking

use std::rc::Rc;

use chrono::{DateTime, Utc};
use config_system::TrackingConfig;
use serde_json::json;
use shared_types::InteractionRecord;

use crate::page::Page;
use crate::services::AnalyticsSink;

pub struct InteractionTracker<P: Page> {
    page: Rc<P>,
    sink: Rc<dyn AnalyticsSink>,
    config: TrackingConfig,
    clock: fn() -> DateTime<Utc>,
}

impl<P: Page> InteractionTracker<P> {
    pub fn new(page: Rc<P>, sink: Rc<dyn AnalyticsSink>, config: TrackingConfig) -> Self {
        Self {
            page,
            sink,
            config,
            clock: Utc::now,
        }
    }

    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// Track a click on `target` if it sits inside a tracked element
    pub fn handle_click(&self, target: &P::Node) -> Option<InteractionRecord> {
        let element = self.page.closest(target, &self.config.selector)?;
        Some(self.track(&element))
    }

    /// Build, log and forward the record for `element`
    pub fn track(&self, element: &P::Node) -> InteractionRecord {
        let record = InteractionRecord::new(
            &self.page.tag_name(element),
            &self.page.text_content(element),
            (self.clock)(),
            &self.page.location_path(),
            self.config.max_text_chars,
        );

        log::info!(
            "User interaction: <{}> \"{}\" at {} on {}",
            record.element,
            record.text,
            record.timestamp,
            record.url
        );

        match serde_json::to_value(&record) {
            Ok(payload) => self.forward(&self.config.event_name, &payload),
            Err(e) => log::warn!("Could not encode interaction record: {e}"),
        }
        record
    }

    pub fn track_page_load(&self, elapsed_ms: f64) {
        log::info!("Page loaded in {elapsed_ms:.2}ms");
        let payload = json!({
            "load_time": elapsed_ms,
            "page_title": self.page.title(),
        });
        self.forward("page_load", &payload);
    }

    fn forward(&self, event_name: &str, payload: &serde_json::Value) {
        if !self.sink.is_available() {
            return;
        }
        if let Err(e) = self.sink.send_event(event_name, payload) {
            log::warn!("Analytics event {event_name} dropped: {e}");
        }
    }
}
