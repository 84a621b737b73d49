//! Page accessor capability
//!
//! Everything the components need from the document, behind one trait so
//! they can run against the real DOM in the browser and an in-memory
//! document in tests.

use std::fmt;

use shared_types::tooltip::{Rect, Size};
use shared_types::PredictorResult;

/// Selector matching every element that can hold a form value
pub const FIELD_SELECTOR: &str = "input, select, textarea";

pub trait Page: 'static {
    /// Handle to one element. Cheap to clone; equality is identity.
    type Node: Clone + PartialEq + fmt::Debug + 'static;

    // Lookup

    fn element_by_id(&self, id: &str) -> Option<Self::Node>;

    /// All matching elements in document order
    fn query_selector_all(&self, selector: &str) -> Vec<Self::Node>;

    fn query_selector(&self, selector: &str) -> Option<Self::Node> {
        self.query_selector_all(selector).into_iter().next()
    }

    /// Matching descendants of `root`, in document order
    fn query_within(&self, root: &Self::Node, selector: &str) -> Vec<Self::Node>;

    fn matches(&self, node: &Self::Node, selector: &str) -> bool;

    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    fn next_sibling(&self, node: &Self::Node) -> Option<Self::Node>;

    /// Nearest inclusive ancestor matching `selector`
    fn closest(&self, node: &Self::Node, selector: &str) -> Option<Self::Node> {
        let mut current = Some(node.clone());
        while let Some(candidate) = current {
            if self.matches(&candidate, selector) {
                return Some(candidate);
            }
            current = self.parent(&candidate);
        }
        None
    }

    /// `node` is `ancestor` or one of its descendants
    fn contains(&self, ancestor: &Self::Node, node: &Self::Node) -> bool {
        let mut current = Some(node.clone());
        while let Some(candidate) = current {
            if &candidate == ancestor {
                return true;
            }
            current = self.parent(&candidate);
        }
        false
    }

    // Content and attributes

    fn tag_name(&self, node: &Self::Node) -> String;

    fn text_content(&self, node: &Self::Node) -> String;

    fn set_text_content(&self, node: &Self::Node, text: &str);

    fn inner_html(&self, node: &Self::Node) -> String;

    fn set_inner_html(&self, node: &Self::Node, html: &str);

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;

    fn has_attribute(&self, node: &Self::Node, name: &str) -> bool {
        self.attribute(node, name).is_some()
    }

    fn has_class(&self, node: &Self::Node, class: &str) -> bool;

    fn add_class(&self, node: &Self::Node, class: &str);

    fn remove_class(&self, node: &Self::Node, class: &str);

    fn toggle_class(&self, node: &Self::Node, class: &str) {
        if self.has_class(node, class) {
            self.remove_class(node, class);
        } else {
            self.add_class(node, class);
        }
    }

    fn set_style(&self, node: &Self::Node, property: &str, value: &str);

    // Form fields

    /// Current value of an input, select or textarea; `None` for anything
    /// that is not a form field.
    fn field_value(&self, node: &Self::Node) -> Option<String>;

    fn set_field_value(&self, node: &Self::Node, value: &str);

    /// Name/value pairs the browser would submit for `form`
    fn form_entries(&self, form: &Self::Node) -> Vec<(String, String)>;

    /// First field inside `form` carrying `name`
    fn field_named(&self, form: &Self::Node, name: &str) -> Option<Self::Node> {
        let escaped = name.replace('\\', "\\\\").replace('"', "\\\"");
        self.query_within(form, &format!("[name=\"{escaped}\"]"))
            .into_iter()
            .next()
    }

    // Tree mutation

    /// Create a detached element
    fn create_element(&self, tag: &str) -> PredictorResult<Self::Node>;

    fn append_to_body(&self, node: &Self::Node);

    /// Insert `node` as the next sibling of `reference`
    fn insert_after(&self, reference: &Self::Node, node: &Self::Node);

    fn remove(&self, node: &Self::Node);

    // Geometry

    fn bounding_rect(&self, node: &Self::Node) -> Rect;

    /// Rendered size; only meaningful once the node is attached
    fn offset_size(&self, node: &Self::Node) -> Size;

    fn overflows_horizontally(&self, node: &Self::Node) -> bool;

    // Behaviour

    fn focus(&self, node: &Self::Node);

    fn scroll_into_view(&self, node: &Self::Node);

    /// Close an open modal dialog
    fn dismiss_modal(&self, node: &Self::Node) {
        self.remove_class(node, "show");
    }

    // Document and window

    fn document_element(&self) -> Self::Node;

    fn title(&self) -> String;

    fn location_path(&self) -> String;

    fn viewport_width(&self) -> f64;
}
