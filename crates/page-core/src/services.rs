//! External libraries the page talks to, as injected capabilities

use shared_types::chart_config::ChartConfiguration;
use shared_types::PredictorResult;

/// Chart library bound to canvases on the page
pub trait Charting {
    /// Construct a chart on the canvas with id `canvas_id`. The library owns
    /// rendering, animation and resizing from then on.
    fn render(&self, canvas_id: &str, config: &ChartConfiguration) -> PredictorResult<()>;
}

/// Optional analytics endpoint
pub trait AnalyticsSink {
    /// Whether an endpoint is configured on this page
    fn is_available(&self) -> bool;

    fn send_event(&self, name: &str, payload: &serde_json::Value) -> PredictorResult<()>;
}

/// Sink used when no analytics endpoint exists
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopSink;

impl AnalyticsSink for NoopSink {
    fn is_available(&self) -> bool {
        false
    }

    fn send_event(&self, _name: &str, _payload: &serde_json::Value) -> PredictorResult<()> {
        Ok(())
    }
}
