//! Chart configuration handed to the external charting library
//!
//! The serialized shape is the `{type, data: {labels, datasets}, options}`
//! object the library constructor expects.

use serde::{Deserialize, Serialize};

/// Chart kinds used on the result page
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Bar,
    Doughnut,
}

/// Opaque RGB color, rendered as a CSS `rgba()` string on demand
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn rgba(&self, alpha: f32) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, alpha)
    }
}

/// Colors shared by every chart so home/draw/away read the same everywhere
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Palette {
    pub home: Rgb,
    pub draw: Rgb,
    pub away: Rgb,
}

impl Palette {
    pub const BLUE: Rgb = Rgb::new(59, 130, 246);
    pub const GRAY: Rgb = Rgb::new(156, 163, 175);
    pub const RED: Rgb = Rgb::new(239, 68, 68);
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            home: Palette::BLUE,
            draw: Palette::GRAY,
            away: Palette::RED,
        }
    }
}

/// Either one color for the whole dataset or one per data point
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ColorSpec {
    Single(String),
    PerPoint(Vec<String>),
}

impl ColorSpec {
    pub fn per_point(colors: &[Rgb], alpha: f32) -> Self {
        ColorSpec::PerPoint(colors.iter().map(|c| c.rgba(alpha)).collect())
    }

    pub fn single(color: Rgb, alpha: f32) -> Self {
        ColorSpec::Single(color.rgba(alpha))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Dataset {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub data: Vec<f64>,
    pub background_color: ColorSpec,
    pub border_color: ColorSpec,
    pub border_width: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartData {
    pub labels: Vec<String>,
    pub datasets: Vec<Dataset>,
}

/// Complete chart configuration
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartConfiguration {
    #[serde(rename = "type")]
    pub kind: ChartKind,
    pub data: ChartData,
    pub options: serde_json::Value,
    /// Suffix appended to y-axis tick labels. Tick formatting needs a
    /// callback, so this travels beside the JSON rather than inside it.
    #[serde(skip)]
    pub y_tick_suffix: Option<String>,
}

impl ChartConfiguration {
    /// Every dataset has exactly one value per label
    pub fn is_aligned(&self) -> bool {
        let labels = self.data.labels.len();
        self.data.datasets.iter().all(|d| {
            d.data.len() == labels
                && match &d.background_color {
                    ColorSpec::PerPoint(colors) => colors.len() == labels,
                    ColorSpec::Single(_) => true,
                }
        })
    }

    /// Values of the first dataset
    pub fn values(&self) -> &[f64] {
        self.data
            .datasets
            .first()
            .map(|d| d.data.as_slice())
            .unwrap_or(&[])
    }
}
