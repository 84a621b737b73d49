//! Football Predictor page behaviour, independent of the browser
//!
//! Every component talks to the document through the [`Page`] capability
//! and to the outside world through [`Scheduler`], [`Charting`],
//! [`AnalyticsSink`] and [`KeyValueStore`](wasm_storage::KeyValueStore).
//! The wasm bridge supplies browser implementations; the `testing` module
//! (test builds and the `testing` feature) supplies in-memory ones.

pub mod app;
pub mod charts;
pub mod debounce;
pub mod effects;
pub mod forms;
pub mod page;
pub mod responsive;
pub mod scheduler;
pub mod services;
pub mod shortcuts;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod tooltip;
pub mod tracker;
pub mod validation;

pub use app::{InitReport, PredictorApp, Services};
pub use charts::{AnalyticsCharts, ChartBuilder, ChartSlot};
pub use debounce::Debouncer;
pub use forms::FormPersistence;
pub use page::Page;
pub use scheduler::{Scheduler, TimerId};
pub use services::{AnalyticsSink, Charting, NoopSink};
pub use tooltip::TooltipController;
pub use tracker::InteractionTracker;
pub use validation::{FieldError, FieldValidator};
