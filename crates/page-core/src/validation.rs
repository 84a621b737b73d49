//! Per-field validation with inline error messages

use std::rc::Rc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::page::Page;

pub const INVALID_CLASS: &str = "is-invalid";
pub const FEEDBACK_CLASS: &str = "invalid-feedback";

// Constant literal; `Regex::new` cannot fail on it
static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    Required,
    InvalidEmail,
}

impl FieldError {
    pub fn message(&self) -> &'static str {
        match self {
            FieldError::Required => "This field is required",
            FieldError::InvalidEmail => "Please enter a valid email address",
        }
    }
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

/// Apply the field rules to a raw value; first failing rule wins
pub fn check_value(value: &str, required: bool, is_email: bool) -> Option<FieldError> {
    let value = value.trim();
    if required && value.is_empty() {
        Some(FieldError::Required)
    } else if is_email && !value.is_empty() && !is_valid_email(value) {
        Some(FieldError::InvalidEmail)
    } else {
        None
    }
}

/// Validates fields and keeps at most one message node after each
pub struct FieldValidator<P: Page> {
    page: Rc<P>,
}

impl<P: Page> FieldValidator<P> {
    pub fn new(page: Rc<P>) -> Self {
        Self { page }
    }

    /// Check `field` and update its annotation
    pub fn validate(&self, field: &P::Node) -> Option<FieldError> {
        let value = self.page.field_value(field).unwrap_or_default();
        let required = self.page.has_attribute(field, "required");
        let is_email = self
            .page
            .attribute(field, "type")
            .is_some_and(|kind| kind.eq_ignore_ascii_case("email"));

        match check_value(&value, required, is_email) {
            Some(error) => {
                self.show_error(field, error.message());
                Some(error)
            }
            None => {
                self.clear_error(field);
                None
            }
        }
    }

    pub fn show_error(&self, field: &P::Node, message: &str) {
        self.clear_error(field);
        self.page.add_class(field, INVALID_CLASS);

        let feedback = match self.page.create_element("div") {
            Ok(feedback) => feedback,
            Err(e) => {
                log::warn!("Could not create validation message: {e}");
                return;
            }
        };
        self.page.add_class(&feedback, FEEDBACK_CLASS);
        self.page.set_text_content(&feedback, message);
        self.page.insert_after(field, &feedback);
    }

    pub fn clear_error(&self, field: &P::Node) {
        self.page.remove_class(field, INVALID_CLASS);
        if let Some(feedback) = self.feedback_node(field) {
            self.page.remove(&feedback);
        }
    }

    /// Message currently shown for `field`
    pub fn error_message(&self, field: &P::Node) -> Option<String> {
        self.feedback_node(field)
            .map(|node| self.page.text_content(&node))
    }

    fn feedback_node(&self, field: &P::Node) -> Option<P::Node> {
        self.page
            .next_sibling(field)
            .filter(|node| self.page.has_class(node, FEEDBACK_CLASS))
    }
}
