//! Geometry for hover tooltips

use serde::{Deserialize, Serialize};

/// On-screen bounding box of an element, in CSS pixels
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }
}

/// Rendered size of an attached element
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

/// Where an overlay goes, relative to the viewport
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TooltipPlacement {
    pub left: f64,
    pub top: f64,
}

impl TooltipPlacement {
    /// Horizontally centered over `anchor`, with `gap` pixels between the
    /// overlay's bottom edge and the anchor's top edge.
    pub fn above(anchor: Rect, overlay: Size, gap: f64) -> Self {
        Self {
            left: anchor.left + anchor.width / 2.0 - overlay.width / 2.0,
            top: anchor.top - overlay.height - gap,
        }
    }

    pub fn left_px(&self) -> String {
        format!("{}px", self.left)
    }

    pub fn top_px(&self) -> String {
        format!("{}px", self.top)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_centered_above() {
        let anchor = Rect::new(100.0, 200.0, 80.0, 20.0);
        let overlay = Size {
            width: 40.0,
            height: 24.0,
        };

        let placement = TooltipPlacement::above(anchor, overlay, 10.0);
        assert_eq!(placement.left, 120.0);
        assert_eq!(placement.top, 166.0);
        assert_eq!(placement.left_px(), "120px");
    }
}
