//! Result-page charts built from values already rendered into the page
//!
//! Each builder reads a handful of numbers (and team names) out of fixed
//! elements, falls back to the configured defaults when an element is
//! missing or its text does not parse, and produces a configuration for the
//! external chart library. Values are read once; nothing updates afterwards.

use std::rc::Rc;

use config_system::ChartDefaults;
use serde_json::json;
use shared_types::chart_config::{
    ChartConfiguration, ChartData, ChartKind, ColorSpec, Dataset, Palette,
};
use shared_types::{PredictorError, PredictorResult};

use crate::page::Page;
use crate::services::Charting;

const BACKGROUND_ALPHA: f32 = 0.8;
const FORM_BACKGROUND_ALPHA: f32 = 0.6;
const BORDER_ALPHA: f32 = 1.0;
const BORDER_WIDTH: u32 = 2;

/// The four charts of the result page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartSlot {
    Strength,
    Probability,
    Form,
    HeadToHead,
}

impl ChartSlot {
    pub const ALL: [ChartSlot; 4] = [
        ChartSlot::Strength,
        ChartSlot::Probability,
        ChartSlot::Form,
        ChartSlot::HeadToHead,
    ];

    pub fn canvas_id(&self) -> &'static str {
        match self {
            ChartSlot::Strength => "strengthChart",
            ChartSlot::Probability => "probabilityChart",
            ChartSlot::Form => "formChart",
            ChartSlot::HeadToHead => "h2hChart",
        }
    }
}

/// `parseFloat`-style read: optional sign, digits, fraction and exponent at
/// the start of the trimmed text; trailing text is ignored.
pub fn parse_leading_float(text: &str) -> Option<f64> {
    let text = text.trim_start();
    let bytes = text.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end += 1;
    }
    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end.min(bytes.len())..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    text[..end].parse().ok()
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}

/// Reads chart inputs out of the page and assembles configurations
pub struct ChartBuilder<'a, P: Page> {
    page: &'a P,
    defaults: &'a ChartDefaults,
    palette: Palette,
}

impl<'a, P: Page> ChartBuilder<'a, P> {
    pub fn new(page: &'a P, defaults: &'a ChartDefaults) -> Self {
        Self {
            page,
            defaults,
            palette: Palette::default(),
        }
    }

    pub fn build(&self, slot: ChartSlot) -> ChartConfiguration {
        match slot {
            ChartSlot::Strength => self.strength(),
            ChartSlot::Probability => self.probability(),
            ChartSlot::Form => self.form(),
            ChartSlot::HeadToHead => self.head_to_head(),
        }
    }

    /// Percentage value of the element with `id`, or `default`
    pub fn number(&self, id: &str, default: f64) -> f64 {
        let Some(element) = self.page.element_by_id(id) else {
            return default;
        };
        let text = self.page.text_content(&element);
        match parse_leading_float(&text.replace('%', "")).filter(|v| v.is_finite()) {
            Some(value) => value,
            None => {
                log::debug!("#{id} holds {text:?}; using default {default}");
                default
            }
        }
    }

    /// Trimmed text of the first element matching `selector`, or `default`
    pub fn text(&self, selector: &str, default: &str) -> String {
        self.page
            .query_selector(selector)
            .map(|element| self.page.text_content(&element).trim().to_string())
            .filter(|text| !text.is_empty())
            .unwrap_or_else(|| default.to_string())
    }

    pub fn strength(&self) -> ChartConfiguration {
        let d = self.defaults;
        let home = self.number("home-strength", d.home_strength);
        let away = self.number("away-strength", d.away_strength);
        let home_team = self.text(".home-team-name", &d.home_team);
        let away_team = self.text(".away-team-name", &d.away_team);
        log::debug!("Strength chart: {home_team} {home} / {away_team} {away}");

        let colors = [self.palette.home, self.palette.away];
        ChartConfiguration {
            kind: ChartKind::Bar,
            data: ChartData {
                labels: vec![home_team, away_team],
                datasets: vec![Dataset {
                    label: Some("Team Strength (%)".to_string()),
                    data: vec![home, away],
                    background_color: ColorSpec::per_point(&colors, BACKGROUND_ALPHA),
                    border_color: ColorSpec::per_point(&colors, BORDER_ALPHA),
                    border_width: BORDER_WIDTH,
                }],
            },
            options: json!({
                "responsive": true,
                "maintainAspectRatio": false,
                "scales": { "y": { "beginAtZero": true, "max": 100 } },
                "plugins": { "legend": { "display": false } }
            }),
            y_tick_suffix: Some("%".to_string()),
        }
    }

    pub fn probability(&self) -> ChartConfiguration {
        let d = self.defaults;
        let home = self.number("home-prob", d.home_win_probability);
        let draw = self.number("draw-prob", d.draw_probability);
        let away = self.number("away-prob", d.away_win_probability);
        log::debug!("Probability chart: {home} / {draw} / {away}");

        let colors = self.outcome_colors();
        ChartConfiguration {
            kind: ChartKind::Doughnut,
            data: ChartData {
                labels: labels(&["Home Win", "Draw", "Away Win"]),
                datasets: vec![Dataset {
                    label: None,
                    data: vec![home, draw, away],
                    background_color: ColorSpec::per_point(&colors, BACKGROUND_ALPHA),
                    border_color: ColorSpec::per_point(&colors, BORDER_ALPHA),
                    border_width: BORDER_WIDTH,
                }],
            },
            options: json!({
                "responsive": true,
                "maintainAspectRatio": false,
                "plugins": { "legend": { "position": "bottom" } }
            }),
            y_tick_suffix: None,
        }
    }

    pub fn form(&self) -> ChartConfiguration {
        let d = self.defaults;
        let home = self.number("home-form-points", d.home_form_points);
        let away = self.number("away-form-points", d.away_form_points);

        let series = |label: &str, value: f64, color| Dataset {
            label: Some(label.to_string()),
            data: vec![value],
            background_color: ColorSpec::single(color, FORM_BACKGROUND_ALPHA),
            border_color: ColorSpec::single(color, BORDER_ALPHA),
            border_width: BORDER_WIDTH,
        };

        ChartConfiguration {
            kind: ChartKind::Bar,
            data: ChartData {
                labels: labels(&["Last 5 Matches"]),
                datasets: vec![
                    series("Home Team Form", home, self.palette.home),
                    series("Away Team Form", away, self.palette.away),
                ],
            },
            options: json!({
                "responsive": true,
                "maintainAspectRatio": false,
                "scales": {
                    "y": { "beginAtZero": true, "max": 15, "ticks": { "stepSize": 3 } }
                }
            }),
            y_tick_suffix: None,
        }
    }

    pub fn head_to_head(&self) -> ChartConfiguration {
        let d = self.defaults;
        let home = self.number("h2h-home-wins", d.h2h_home_wins);
        let draws = self.number("h2h-draws", d.h2h_draws);
        let away = self.number("h2h-away-wins", d.h2h_away_wins);

        let colors = self.outcome_colors();
        ChartConfiguration {
            kind: ChartKind::Bar,
            data: ChartData {
                labels: labels(&["Home Wins", "Draws", "Away Wins"]),
                datasets: vec![Dataset {
                    label: Some("Head-to-Head Results".to_string()),
                    data: vec![home, draws, away],
                    background_color: ColorSpec::per_point(&colors, BACKGROUND_ALPHA),
                    border_color: ColorSpec::per_point(&colors, BORDER_ALPHA),
                    border_width: BORDER_WIDTH,
                }],
            },
            options: json!({
                "responsive": true,
                "maintainAspectRatio": false,
                "scales": { "y": { "beginAtZero": true, "ticks": { "stepSize": 1 } } },
                "plugins": { "legend": { "display": false } }
            }),
            y_tick_suffix: None,
        }
    }

    fn outcome_colors(&self) -> [shared_types::chart_config::Rgb; 3] {
        [self.palette.home, self.palette.draw, self.palette.away]
    }
}

fn labels(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

/// Builds and hands charts to the chart library
pub struct AnalyticsCharts<P: Page> {
    page: Rc<P>,
    charting: Rc<dyn Charting>,
    defaults: ChartDefaults,
}

impl<P: Page> AnalyticsCharts<P> {
    pub fn new(page: Rc<P>, charting: Rc<dyn Charting>, defaults: ChartDefaults) -> Self {
        Self {
            page,
            charting,
            defaults,
        }
    }

    pub fn build(&self, slot: ChartSlot) -> ChartConfiguration {
        ChartBuilder::new(self.page.as_ref(), &self.defaults).build(slot)
    }

    pub fn has_canvas(&self, slot: ChartSlot) -> bool {
        self.page.element_by_id(slot.canvas_id()).is_some()
    }

    /// Build and render one chart; fails if its canvas is absent
    pub fn render(&self, slot: ChartSlot) -> PredictorResult<()> {
        if !self.has_canvas(slot) {
            return Err(PredictorError::missing(format!("#{}", slot.canvas_id())));
        }
        let config = self.build(slot);
        self.charting.render(slot.canvas_id(), &config)
    }

    /// Render every chart whose canvas exists. A failing chart is logged and
    /// does not stop the others. Returns the charts rendered.
    pub fn initialize(&self) -> Vec<ChartSlot> {
        let present: Vec<ChartSlot> = ChartSlot::ALL
            .into_iter()
            .filter(|slot| self.has_canvas(*slot))
            .collect();
        log::info!("Chart canvases found: {present:?}");

        present
            .into_iter()
            .filter(|slot| match self.render(*slot) {
                Ok(()) => true,
                Err(e) => {
                    log::error!("Failed to create {slot:?} chart: {e}");
                    false
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakePage, RecordingCharting};

    #[test]
    fn test_parse_leading_float() {
        assert_eq!(parse_leading_float("72"), Some(72.0));
        assert_eq!(parse_leading_float("  58.5 "), Some(58.5));
        assert_eq!(parse_leading_float("12 pts"), Some(12.0));
        assert_eq!(parse_leading_float("-3.25e2x"), Some(-325.0));
        assert_eq!(parse_leading_float(".5"), Some(0.5));
        assert_eq!(parse_leading_float("7."), Some(7.0));
        assert_eq!(parse_leading_float("1e"), Some(1.0));
        assert_eq!(parse_leading_float("abc"), None);
        assert_eq!(parse_leading_float("."), None);
        assert_eq!(parse_leading_float(""), None);
        assert_eq!(parse_leading_float("-"), None);
    }

    #[test]
    fn test_strength_reads_page() {
        let page = FakePage::new();
        page.add(page.body(), "span").id("home-strength").text("72%");
        page.add(page.body(), "span").id("away-strength").text(" 58% ");
        page.add(page.body(), "h2").class("home-team-name").text("Arsenal");
        let defaults = ChartDefaults::default();

        let config = ChartBuilder::new(&page, &defaults).strength();
        assert_eq!(config.kind, ChartKind::Bar);
        assert_eq!(config.values(), &[72.0, 58.0]);
        assert_eq!(config.data.labels, vec!["Arsenal", "Away Team"]);
        assert_eq!(config.y_tick_suffix.as_deref(), Some("%"));
        assert!(config.is_aligned());
    }

    #[test]
    fn test_probability_falls_back() {
        let page = FakePage::new();
        let defaults = ChartDefaults::default();

        let config = ChartBuilder::new(&page, &defaults).probability();
        assert_eq!(config.kind, ChartKind::Doughnut);
        assert_eq!(config.values(), &[40.0, 30.0, 30.0]);
        assert!(config.is_aligned());
    }

    #[test]
    fn test_unparsable_text_uses_default() {
        let page = FakePage::new();
        page.add(page.body(), "span").id("home-prob").text("n/a");
        page.add(page.body(), "span").id("draw-prob").text("25.5%");
        let defaults = ChartDefaults::default();

        let config = ChartBuilder::new(&page, &defaults).probability();
        assert_eq!(config.values(), &[40.0, 25.5, 30.0]);
    }

    #[test]
    fn test_configured_defaults() {
        let page = FakePage::new();
        let defaults = ChartDefaults {
            h2h_home_wins: 0.0,
            h2h_draws: 0.0,
            h2h_away_wins: 0.0,
            ..ChartDefaults::default()
        };

        let config = ChartBuilder::new(&page, &defaults).head_to_head();
        assert_eq!(config.values(), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn test_form_chart_has_two_series() {
        let page = FakePage::new();
        page.add(page.body(), "span").id("home-form-points").text("11");
        let defaults = ChartDefaults::default();

        let config = ChartBuilder::new(&page, &defaults).form();
        assert_eq!(config.data.labels, vec!["Last 5 Matches"]);
        assert_eq!(config.data.datasets.len(), 2);
        assert_eq!(config.data.datasets[0].data, vec![11.0]);
        assert_eq!(config.data.datasets[1].data, vec![2.0]);
        assert_eq!(
            config.data.datasets[1].background_color,
            ColorSpec::Single("rgba(239, 68, 68, 0.6)".to_string())
        );
        assert!(config.is_aligned());
    }

    #[test]
    fn test_initialize_only_renders_present_canvases() {
        let page = Rc::new(FakePage::new());
        page.add(page.body(), "canvas").id("strengthChart");
        page.add(page.body(), "canvas").id("h2hChart");
        let charting = Rc::new(RecordingCharting::new());
        let charts = AnalyticsCharts::new(page.clone(), charting.clone(), ChartDefaults::default());

        let rendered = charts.initialize();
        assert_eq!(rendered, vec![ChartSlot::Strength, ChartSlot::HeadToHead]);
        assert_eq!(charting.canvas_ids(), vec!["strengthChart", "h2hChart"]);
        assert!(matches!(
            charts.render(ChartSlot::Form),
            Err(PredictorError::MissingElement { .. })
        ));
    }

    #[test]
    fn test_failing_chart_does_not_block_others() {
        let page = Rc::new(FakePage::new());
        for slot in ChartSlot::ALL {
            page.add(page.body(), "canvas").id(slot.canvas_id());
        }
        let charting = Rc::new(RecordingCharting::failing_on("probabilityChart"));
        let charts = AnalyticsCharts::new(page.clone(), charting.clone(), ChartDefaults::default());

        let rendered = charts.initialize();
        assert_eq!(
            rendered,
            vec![ChartSlot::Strength, ChartSlot::Form, ChartSlot::HeadToHead]
        );
    }
}
