//! The live document as a [`Page`]

use js_sys::{Function, Reflect};
use page_core::Page;
use shared_types::tooltip::{Rect, Size};
use shared_types::{PredictorError, PredictorResult};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    Document, Element, FormData, HtmlElement, HtmlFormElement, HtmlInputElement,
    HtmlSelectElement, HtmlTextAreaElement, NodeList, ScrollBehavior, ScrollIntoViewOptions,
    ScrollLogicalPosition, Window,
};

pub struct WebPage {
    window: Window,
    document: Document,
    root: Element,
}

impl WebPage {
    pub fn new(window: Window) -> PredictorResult<Self> {
        let document = window
            .document()
            .ok_or_else(|| PredictorError::missing("document"))?;
        let root = document
            .document_element()
            .ok_or_else(|| PredictorError::missing("html"))?;

        Ok(Self {
            window,
            document,
            root,
        })
    }

    pub fn window(&self) -> &Window {
        &self.window
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// `bootstrap.Modal.getInstance(node)`, when Bootstrap is loaded
    fn bootstrap_modal(&self, node: &Element) -> Option<JsValue> {
        let bootstrap = Reflect::get(&self.window, &"bootstrap".into()).ok()?;
        let modal = Reflect::get(&bootstrap, &"Modal".into()).ok()?;
        let get_instance = Reflect::get(&modal, &"getInstance".into())
            .ok()?
            .dyn_into::<Function>()
            .ok()?;
        let instance = get_instance.call1(&modal, node).ok()?;
        (!instance.is_null() && !instance.is_undefined()).then_some(instance)
    }
}

fn elements(list: Result<NodeList, JsValue>, selector: &str) -> Vec<Element> {
    let list = match list {
        Ok(list) => list,
        Err(e) => {
            log::warn!("Bad selector {selector:?}: {e:?}");
            return Vec::new();
        }
    };
    (0..list.length())
        .filter_map(|i| list.item(i))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

fn log_failure(action: &str, result: Result<(), JsValue>) {
    if let Err(e) = result {
        log::warn!("{action} failed: {e:?}");
    }
}

impl Page for WebPage {
    type Node = Element;

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn query_selector_all(&self, selector: &str) -> Vec<Element> {
        elements(self.document.query_selector_all(selector), selector)
    }

    fn query_selector(&self, selector: &str) -> Option<Element> {
        self.document.query_selector(selector).ok().flatten()
    }

    fn query_within(&self, root: &Element, selector: &str) -> Vec<Element> {
        elements(root.query_selector_all(selector), selector)
    }

    fn matches(&self, node: &Element, selector: &str) -> bool {
        node.matches(selector).unwrap_or(false)
    }

    fn parent(&self, node: &Element) -> Option<Element> {
        node.parent_element()
    }

    fn next_sibling(&self, node: &Element) -> Option<Element> {
        node.next_element_sibling()
    }

    fn closest(&self, node: &Element, selector: &str) -> Option<Element> {
        node.closest(selector).ok().flatten()
    }

    fn contains(&self, ancestor: &Element, node: &Element) -> bool {
        let node: &web_sys::Node = node;
        ancestor.contains(Some(node))
    }

    fn tag_name(&self, node: &Element) -> String {
        node.tag_name()
    }

    fn text_content(&self, node: &Element) -> String {
        node.text_content().unwrap_or_default()
    }

    fn set_text_content(&self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn inner_html(&self, node: &Element) -> String {
        node.inner_html()
    }

    fn set_inner_html(&self, node: &Element, html: &str) {
        node.set_inner_html(html);
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn has_attribute(&self, node: &Element, name: &str) -> bool {
        node.has_attribute(name)
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn add_class(&self, node: &Element, class: &str) {
        log_failure("classList.add", node.class_list().add_1(class));
    }

    fn remove_class(&self, node: &Element, class: &str) {
        log_failure("classList.remove", node.class_list().remove_1(class));
    }

    fn toggle_class(&self, node: &Element, class: &str) {
        log_failure("classList.toggle", node.class_list().toggle(class).map(drop));
    }

    fn set_style(&self, node: &Element, property: &str, value: &str) {
        if let Some(element) = node.dyn_ref::<HtmlElement>() {
            log_failure("style", element.style().set_property(property, value));
        }
    }

    fn field_value(&self, node: &Element) -> Option<String> {
        if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
            Some(input.value())
        } else if let Some(select) = node.dyn_ref::<HtmlSelectElement>() {
            Some(select.value())
        } else {
            node.dyn_ref::<HtmlTextAreaElement>().map(|area| area.value())
        }
    }

    fn set_field_value(&self, node: &Element, value: &str) {
        if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
            input.set_value(value);
        } else if let Some(select) = node.dyn_ref::<HtmlSelectElement>() {
            select.set_value(value);
        } else if let Some(area) = node.dyn_ref::<HtmlTextAreaElement>() {
            area.set_value(value);
        }
    }

    fn form_entries(&self, form: &Element) -> Vec<(String, String)> {
        let Some(form) = form.dyn_ref::<HtmlFormElement>() else {
            return Vec::new();
        };
        let data = match FormData::new_with_form(form) {
            Ok(data) => data,
            Err(e) => {
                log::warn!("FormData unavailable: {e:?}");
                return Vec::new();
            }
        };
        let entries = match js_sys::try_iter(&data) {
            Ok(Some(entries)) => entries,
            _ => return Vec::new(),
        };

        entries
            .filter_map(Result::ok)
            .filter_map(|entry| {
                let pair = entry.dyn_into::<js_sys::Array>().ok()?;
                // File entries have no string value and are skipped
                Some((pair.get(0).as_string()?, pair.get(1).as_string()?))
            })
            .collect()
    }

    fn create_element(&self, tag: &str) -> PredictorResult<Element> {
        Ok(self.document.create_element(tag)?)
    }

    fn append_to_body(&self, node: &Element) {
        match self.document.body() {
            Some(body) => log_failure("appendChild", body.append_child(node).map(drop)),
            None => log::warn!("Document has no body"),
        }
    }

    fn insert_after(&self, reference: &Element, node: &Element) {
        log_failure("insert after", reference.after_with_node_1(node));
    }

    fn remove(&self, node: &Element) {
        node.remove();
    }

    fn bounding_rect(&self, node: &Element) -> Rect {
        let rect = node.get_bounding_client_rect();
        Rect::new(rect.left(), rect.top(), rect.width(), rect.height())
    }

    fn offset_size(&self, node: &Element) -> Size {
        node.dyn_ref::<HtmlElement>()
            .map(|element| Size {
                width: f64::from(element.offset_width()),
                height: f64::from(element.offset_height()),
            })
            .unwrap_or_default()
    }

    fn overflows_horizontally(&self, node: &Element) -> bool {
        node.scroll_width() > node.client_width()
    }

    fn focus(&self, node: &Element) {
        if let Some(element) = node.dyn_ref::<HtmlElement>() {
            log_failure("focus", element.focus());
        }
    }

    fn scroll_into_view(&self, node: &Element) {
        let options = ScrollIntoViewOptions::new();
        options.set_behavior(ScrollBehavior::Smooth);
        options.set_block(ScrollLogicalPosition::Start);
        node.scroll_into_view_with_scroll_into_view_options(&options);
    }

    fn dismiss_modal(&self, node: &Element) {
        let hide = self.bootstrap_modal(node).and_then(|modal| {
            let hide = Reflect::get(&modal, &"hide".into()).ok()?;
            hide.dyn_into::<Function>().ok().map(|hide| (modal, hide))
        });

        match hide {
            Some((modal, hide)) => log_failure("Modal.hide", hide.call0(&modal).map(drop)),
            None => self.remove_class(node, "show"),
        }
    }

    fn document_element(&self) -> Element {
        self.root.clone()
    }

    fn title(&self) -> String {
        self.document.title()
    }

    fn location_path(&self) -> String {
        self.window.location().pathname().unwrap_or_default()
    }

    fn viewport_width(&self) -> f64 {
        self.window
            .inner_width()
            .ok()
            .and_then(|width| width.as_f64())
            .unwrap_or_default()
    }
}
