//! Fallback values used when the rendered page lacks a chart input

use serde::{Deserialize, Serialize};

/// Literal fallbacks for every value the chart builders read from the page.
///
/// These are placeholders shown when the server did not render a value;
/// they are configuration so a deployment can change or neutralise them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartDefaults {
    pub home_team: String,
    pub away_team: String,

    pub home_strength: f64,
    pub away_strength: f64,

    pub home_win_probability: f64,
    pub draw_probability: f64,
    pub away_win_probability: f64,

    pub home_form_points: f64,
    pub away_form_points: f64,

    pub h2h_home_wins: f64,
    pub h2h_draws: f64,
    pub h2h_away_wins: f64,
}

impl Default for ChartDefaults {
    fn default() -> Self {
        Self {
            home_team: "Home Team".to_string(),
            away_team: "Away Team".to_string(),
            home_strength: 65.0,
            away_strength: 60.0,
            home_win_probability: 40.0,
            draw_probability: 30.0,
            away_win_probability: 30.0,
            home_form_points: 3.0,
            away_form_points: 2.0,
            h2h_home_wins: 3.0,
            h2h_draws: 2.0,
            h2h_away_wins: 1.0,
        }
    }
}

impl ChartDefaults {
    pub(crate) fn numeric_fields(&self) -> [(&'static str, f64); 10] {
        [
            ("home_strength", self.home_strength),
            ("away_strength", self.away_strength),
            ("home_win_probability", self.home_win_probability),
            ("draw_probability", self.draw_probability),
            ("away_win_probability", self.away_win_probability),
            ("home_form_points", self.home_form_points),
            ("away_form_points", self.away_form_points),
            ("h2h_home_wins", self.h2h_home_wins),
            ("h2h_draws", self.h2h_draws),
            ("h2h_away_wins", self.h2h_away_wins),
        ]
    }
}
