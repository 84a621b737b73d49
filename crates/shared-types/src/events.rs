//! Page events delivered to the components, independent of the browser API
//!
//! `N` is the element handle of whatever page implementation produced the
//! event: a `web_sys::Element` in the browser, an arena index in tests.

#[derive(Clone, Debug, PartialEq)]
pub enum PageEvent<N> {
    Click { target: N },
    Input { target: N },
    /// Focus left a field (value committed)
    FocusOut { target: N },
    Change { target: N },
    PointerEnter { target: N },
    PointerLeave { target: N },
    /// Element scrolled into view for the first time
    BecameVisible { target: N },
    KeyDown(KeyPress),
    Scroll { offset_y: f64 },
    Resize,
    Loaded { elapsed_ms: f64 },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyPress {
    pub key: String,
    pub ctrl: bool,
    pub meta: bool,
}

impl KeyPress {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ctrl: false,
            meta: false,
        }
    }

    pub fn with_ctrl(mut self) -> Self {
        self.ctrl = true;
        self
    }

    pub fn with_meta(mut self) -> Self {
        self.meta = true;
        self
    }

    /// Ctrl (or Cmd on macOS) together with `key`
    pub fn is_command(&self, key: &str) -> bool {
        (self.ctrl || self.meta) && self.key == key
    }
}

/// What the bridge should do with the native event after dispatch
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum EventOutcome {
    #[default]
    Continue,
    PreventDefault,
}

impl EventOutcome {
    pub fn merge(self, other: EventOutcome) -> EventOutcome {
        match (self, other) {
            (EventOutcome::Continue, EventOutcome::Continue) => EventOutcome::Continue,
            _ => EventOutcome::PreventDefault,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_key() {
        assert!(KeyPress::new("k").with_ctrl().is_command("k"));
        assert!(KeyPress::new("k").with_meta().is_command("k"));
        assert!(!KeyPress::new("k").is_command("k"));
        assert!(!KeyPress::new("j").with_ctrl().is_command("k"));
    }

    #[test]
    fn test_outcome_merge() {
        assert_eq!(
            EventOutcome::Continue.merge(EventOutcome::Continue),
            EventOutcome::Continue
        );
        assert_eq!(
            EventOutcome::Continue.merge(EventOutcome::PreventDefault),
            EventOutcome::PreventDefault
        );
    }
}
