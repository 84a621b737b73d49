//! In-memory doubles for the page capabilities
//!
//! [`FakePage`] is a small element tree with just enough DOM behaviour for
//! the components; [`ManualScheduler`] runs timers on a virtual clock; the
//! recording services capture what would have gone to Chart.js and gtag.

mod selector;

pub use selector::{Selector, SelectorError, Subject};

use std::cell::RefCell;
use std::collections::BTreeMap;

use shared_types::chart_config::ChartConfiguration;
use shared_types::tooltip::{Rect, Size};
use shared_types::{PredictorError, PredictorResult};

use crate::page::{Page, FIELD_SELECTOR};
use crate::scheduler::{Scheduler, TimerId};
use crate::services::{AnalyticsSink, Charting};

/// Handle to an element of a [`FakePage`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FakeNode(usize);

#[derive(Debug, Default)]
struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    text: String,
    html: Option<String>,
    value: String,
    styles: BTreeMap<String, String>,
    parent: Option<FakeNode>,
    children: Vec<FakeNode>,
    rect: Rect,
    size: Option<Size>,
    overflowing: bool,
}

impl Element {
    fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            ..Self::default()
        }
    }

    fn set_attribute(&mut self, name: &str, value: &str) {
        match self.attributes.iter_mut().find(|(k, _)| k == name) {
            Some((_, existing)) => *existing = value.to_string(),
            None => self.attributes.push((name.to_string(), value.to_string())),
        }
    }

    fn classes(&self) -> Vec<String> {
        selector::Subject::attribute(self, "class")
            .map(|list| list.split_whitespace().map(str::to_string).collect())
            .unwrap_or_default()
    }

    fn is_field(&self) -> bool {
        matches!(self.tag.as_str(), "input" | "select" | "textarea")
    }
}

impl selector::Subject for Element {
    fn tag(&self) -> &str {
        &self.tag
    }

    fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

#[derive(Debug)]
struct Document {
    elements: Vec<Element>,
    title: String,
    path: String,
    viewport_width: f64,
    default_size: Size,
    focused: Option<FakeNode>,
    scrolled: Vec<FakeNode>,
}

const ROOT: FakeNode = FakeNode(0);
const BODY: FakeNode = FakeNode(1);

impl Document {
    fn new() -> Self {
        let mut html = Element::new("html");
        html.children.push(BODY);
        let mut body = Element::new("body");
        body.parent = Some(ROOT);

        Self {
            elements: vec![html, body],
            title: String::new(),
            path: "/".to_string(),
            viewport_width: 1280.0,
            default_size: Size::default(),
            focused: None,
            scrolled: Vec::new(),
        }
    }

    fn get(&self, node: FakeNode) -> &Element {
        &self.elements[node.0]
    }

    fn get_mut(&mut self, node: FakeNode) -> &mut Element {
        &mut self.elements[node.0]
    }

    fn create(&mut self, tag: &str) -> FakeNode {
        self.elements.push(Element::new(tag));
        FakeNode(self.elements.len() - 1)
    }

    fn detach(&mut self, node: FakeNode) {
        if let Some(parent) = self.get_mut(node).parent.take() {
            self.get_mut(parent).children.retain(|child| *child != node);
        }
    }

    fn append(&mut self, parent: FakeNode, node: FakeNode) {
        self.detach(node);
        self.get_mut(node).parent = Some(parent);
        self.get_mut(parent).children.push(node);
    }

    fn clear_children(&mut self, node: FakeNode) {
        let children = std::mem::take(&mut self.get_mut(node).children);
        for child in children {
            self.get_mut(child).parent = None;
        }
    }

    /// Descendants of `root` in document order, `root` excluded
    fn descendants(&self, root: FakeNode) -> Vec<FakeNode> {
        let mut found = Vec::new();
        let mut stack: Vec<FakeNode> = self.get(root).children.iter().rev().copied().collect();
        while let Some(node) = stack.pop() {
            found.push(node);
            stack.extend(self.get(node).children.iter().rev().copied());
        }
        found
    }

    /// `root` and its descendants
    fn tree(&self, root: FakeNode) -> Vec<FakeNode> {
        let mut nodes = vec![root];
        nodes.extend(self.descendants(root));
        nodes
    }

    fn text_of(&self, node: FakeNode) -> String {
        let element = self.get(node);
        let mut text = element.text.clone();
        for child in &element.children {
            text.push_str(&self.text_of(*child));
        }
        text
    }

    fn matching(&self, nodes: Vec<FakeNode>, selector: &str) -> Vec<FakeNode> {
        match Selector::parse(selector) {
            Ok(selector) => nodes
                .into_iter()
                .filter(|node| selector.matches(self.get(*node)))
                .collect(),
            Err(e) => {
                log::warn!("{e}");
                Vec::new()
            }
        }
    }
}

/// In-memory document rooted at `<html><body>`
#[derive(Debug)]
pub struct FakePage {
    doc: RefCell<Document>,
}

impl Default for FakePage {
    fn default() -> Self {
        Self::new()
    }
}

impl FakePage {
    pub fn new() -> Self {
        Self {
            doc: RefCell::new(Document::new()),
        }
    }

    pub fn body(&self) -> FakeNode {
        BODY
    }

    /// Append a new `<tag>` under `parent`
    pub fn add(&self, parent: FakeNode, tag: &str) -> NodeBuilder<'_> {
        let mut doc = self.doc.borrow_mut();
        let node = doc.create(tag);
        doc.append(parent, node);
        NodeBuilder { page: self, node }
    }

    pub fn set_location_path(&self, path: &str) {
        self.doc.borrow_mut().path = path.to_string();
    }

    pub fn set_title(&self, title: &str) {
        self.doc.borrow_mut().title = title.to_string();
    }

    pub fn set_viewport_width(&self, width: f64) {
        self.doc.borrow_mut().viewport_width = width;
    }

    /// Rendered size reported for attached elements without an explicit one
    pub fn set_default_size(&self, width: f64, height: f64) {
        self.doc.borrow_mut().default_size = Size { width, height };
    }

    pub fn count(&self, selector: &str) -> usize {
        self.query_selector_all(selector).len()
    }

    pub fn style(&self, node: &FakeNode, property: &str) -> Option<String> {
        self.doc.borrow().get(*node).styles.get(property).cloned()
    }

    pub fn focused(&self) -> Option<FakeNode> {
        self.doc.borrow().focused
    }

    /// Every element scrolled to, oldest first
    pub fn scrolled_into_view(&self) -> Vec<FakeNode> {
        self.doc.borrow().scrolled.clone()
    }

    fn with_element<R>(&self, node: FakeNode, f: impl FnOnce(&mut Element) -> R) -> R {
        f(self.doc.borrow_mut().get_mut(node))
    }
}

/// Sets up an element created by [`FakePage::add`]. Every call applies
/// immediately; [`node`](NodeBuilder::node) just hands back the handle.
pub struct NodeBuilder<'a> {
    page: &'a FakePage,
    node: FakeNode,
}

impl NodeBuilder<'_> {
    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    pub fn attr(self, name: &str, value: &str) -> Self {
        self.page
            .with_element(self.node, |el| el.set_attribute(name, value));
        self
    }

    pub fn class(self, class: &str) -> Self {
        self.page.add_class(&self.node, class);
        self
    }

    pub fn text(self, text: &str) -> Self {
        self.page.with_element(self.node, |el| el.text.push_str(text));
        self
    }

    pub fn value(self, value: &str) -> Self {
        self.page.set_field_value(&self.node, value);
        self
    }

    pub fn rect(self, rect: Rect) -> Self {
        self.page.with_element(self.node, |el| el.rect = rect);
        self
    }

    pub fn overflowing(self) -> Self {
        self.page.with_element(self.node, |el| el.overflowing = true);
        self
    }

    pub fn node(self) -> FakeNode {
        self.node
    }
}

impl Page for FakePage {
    type Node = FakeNode;

    fn element_by_id(&self, id: &str) -> Option<FakeNode> {
        let doc = self.doc.borrow();
        doc.tree(ROOT)
            .into_iter()
            .find(|node| selector::Subject::attribute(doc.get(*node), "id") == Some(id))
    }

    fn query_selector_all(&self, selector: &str) -> Vec<FakeNode> {
        let doc = self.doc.borrow();
        doc.matching(doc.tree(ROOT), selector)
    }

    fn query_within(&self, root: &FakeNode, selector: &str) -> Vec<FakeNode> {
        let doc = self.doc.borrow();
        doc.matching(doc.descendants(*root), selector)
    }

    fn matches(&self, node: &FakeNode, selector: &str) -> bool {
        let doc = self.doc.borrow();
        !doc.matching(vec![*node], selector).is_empty()
    }

    fn parent(&self, node: &FakeNode) -> Option<FakeNode> {
        self.doc.borrow().get(*node).parent
    }

    fn next_sibling(&self, node: &FakeNode) -> Option<FakeNode> {
        let doc = self.doc.borrow();
        let parent = doc.get(*node).parent?;
        let siblings = &doc.get(parent).children;
        let index = siblings.iter().position(|child| child == node)?;
        siblings.get(index + 1).copied()
    }

    fn tag_name(&self, node: &FakeNode) -> String {
        self.doc.borrow().get(*node).tag.to_ascii_uppercase()
    }

    fn text_content(&self, node: &FakeNode) -> String {
        self.doc.borrow().text_of(*node)
    }

    fn set_text_content(&self, node: &FakeNode, text: &str) {
        let mut doc = self.doc.borrow_mut();
        doc.clear_children(*node);
        let element = doc.get_mut(*node);
        element.text = text.to_string();
        element.html = None;
    }

    fn inner_html(&self, node: &FakeNode) -> String {
        let doc = self.doc.borrow();
        match &doc.get(*node).html {
            Some(html) => html.clone(),
            None => doc.text_of(*node),
        }
    }

    fn set_inner_html(&self, node: &FakeNode, html: &str) {
        let mut doc = self.doc.borrow_mut();
        doc.clear_children(*node);
        let element = doc.get_mut(*node);
        element.text = html.to_string();
        element.html = Some(html.to_string());
    }

    fn attribute(&self, node: &FakeNode, name: &str) -> Option<String> {
        let doc = self.doc.borrow();
        selector::Subject::attribute(doc.get(*node), name).map(str::to_string)
    }

    fn has_class(&self, node: &FakeNode, class: &str) -> bool {
        selector::Subject::has_class(self.doc.borrow().get(*node), class)
    }

    fn add_class(&self, node: &FakeNode, class: &str) {
        self.with_element(*node, |el| {
            let mut classes = el.classes();
            if !classes.iter().any(|c| c == class) {
                classes.push(class.to_string());
                el.set_attribute("class", &classes.join(" "));
            }
        });
    }

    fn remove_class(&self, node: &FakeNode, class: &str) {
        self.with_element(*node, |el| {
            let mut classes = el.classes();
            let before = classes.len();
            classes.retain(|c| c != class);
            if classes.len() != before {
                el.set_attribute("class", &classes.join(" "));
            }
        });
    }

    fn set_style(&self, node: &FakeNode, property: &str, value: &str) {
        self.with_element(*node, |el| {
            el.styles.insert(property.to_string(), value.to_string());
        });
    }

    fn field_value(&self, node: &FakeNode) -> Option<String> {
        let doc = self.doc.borrow();
        let element = doc.get(*node);
        element.is_field().then(|| element.value.clone())
    }

    fn set_field_value(&self, node: &FakeNode, value: &str) {
        self.with_element(*node, |el| el.value = value.to_string());
    }

    fn form_entries(&self, form: &FakeNode) -> Vec<(String, String)> {
        let fields = self.query_within(form, FIELD_SELECTOR);
        let doc = self.doc.borrow();

        let mut entries = Vec::new();
        for node in fields {
            let element = doc.get(node);
            let attr = |name| selector::Subject::attribute(element, name);
            let Some(name) = attr("name").filter(|name| !name.is_empty()) else {
                continue;
            };
            if attr("disabled").is_some() {
                continue;
            }

            let kind = attr("type").unwrap_or("text").to_ascii_lowercase();
            match kind.as_str() {
                "submit" | "button" | "reset" | "file" | "image" => continue,
                "checkbox" | "radio" if attr("checked").is_none() => continue,
                "checkbox" | "radio" if element.value.is_empty() => {
                    entries.push((name.to_string(), "on".to_string()));
                }
                _ => entries.push((name.to_string(), element.value.clone())),
            }
        }
        entries
    }

    fn create_element(&self, tag: &str) -> PredictorResult<FakeNode> {
        Ok(self.doc.borrow_mut().create(tag))
    }

    fn append_to_body(&self, node: &FakeNode) {
        self.doc.borrow_mut().append(BODY, *node);
    }

    fn insert_after(&self, reference: &FakeNode, node: &FakeNode) {
        let mut doc = self.doc.borrow_mut();
        let Some(parent) = doc.get(*reference).parent else {
            return;
        };
        doc.detach(*node);
        let siblings = &mut doc.get_mut(parent).children;
        let index = siblings
            .iter()
            .position(|child| child == reference)
            .map_or(siblings.len(), |i| i + 1);
        siblings.insert(index, *node);
        doc.get_mut(*node).parent = Some(parent);
    }

    fn remove(&self, node: &FakeNode) {
        self.doc.borrow_mut().detach(*node);
    }

    fn bounding_rect(&self, node: &FakeNode) -> Rect {
        self.doc.borrow().get(*node).rect
    }

    fn offset_size(&self, node: &FakeNode) -> Size {
        let doc = self.doc.borrow();
        let element = doc.get(*node);
        match (element.parent, element.size) {
            (None, _) => Size::default(),
            (Some(_), Some(size)) => size,
            (Some(_), None) => doc.default_size,
        }
    }

    fn overflows_horizontally(&self, node: &FakeNode) -> bool {
        self.doc.borrow().get(*node).overflowing
    }

    fn focus(&self, node: &FakeNode) {
        self.doc.borrow_mut().focused = Some(*node);
    }

    fn scroll_into_view(&self, node: &FakeNode) {
        self.doc.borrow_mut().scrolled.push(*node);
    }

    fn document_element(&self) -> FakeNode {
        ROOT
    }

    fn title(&self) -> String {
        self.doc.borrow().title.clone()
    }

    fn location_path(&self) -> String {
        self.doc.borrow().path.clone()
    }

    fn viewport_width(&self) -> f64 {
        self.doc.borrow().viewport_width
    }
}

struct PendingTask {
    due: u64,
    id: TimerId,
    task: Box<dyn FnOnce()>,
}

#[derive(Default)]
struct Clock {
    now: u64,
    next_id: TimerId,
    tasks: Vec<PendingTask>,
}

/// Timers on a virtual clock that only moves when told to
#[derive(Default)]
pub struct ManualScheduler {
    clock: RefCell<Clock>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> u64 {
        self.clock.borrow().now
    }

    /// Move the clock forward, running due timers in order. Timers set by
    /// a running task fire in the same call if they fall due in range.
    pub fn advance(&self, ms: u64) {
        let target = self.clock.borrow().now + ms;
        loop {
            let next = {
                let mut clock = self.clock.borrow_mut();
                let due = clock
                    .tasks
                    .iter()
                    .enumerate()
                    .filter(|(_, pending)| pending.due <= target)
                    .min_by_key(|(_, pending)| (pending.due, pending.id))
                    .map(|(index, _)| index);
                due.map(|index| {
                    let pending = clock.tasks.remove(index);
                    clock.now = pending.due;
                    pending.task
                })
            };
            match next {
                Some(task) => task(),
                None => break,
            }
        }
        self.clock.borrow_mut().now = target;
    }

    pub fn pending_count(&self) -> usize {
        self.clock.borrow().tasks.len()
    }
}

impl Scheduler for ManualScheduler {
    fn set_timeout(&self, delay_ms: u32, task: Box<dyn FnOnce()>) -> TimerId {
        let mut clock = self.clock.borrow_mut();
        clock.next_id += 1;
        let id = clock.next_id;
        let due = clock.now + u64::from(delay_ms);
        clock.tasks.push(PendingTask { due, id, task });
        id
    }

    fn clear_timeout(&self, id: TimerId) {
        self.clock.borrow_mut().tasks.retain(|pending| pending.id != id);
    }
}

/// Chart library stand-in that remembers every configuration it was given
#[derive(Debug, Default)]
pub struct RecordingCharting {
    rendered: RefCell<Vec<(String, ChartConfiguration)>>,
    failing: Option<String>,
}

impl RecordingCharting {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rejects the chart for `canvas_id`, accepts the rest
    pub fn failing_on(canvas_id: &str) -> Self {
        Self {
            failing: Some(canvas_id.to_string()),
            ..Self::default()
        }
    }

    pub fn canvas_ids(&self) -> Vec<String> {
        self.rendered
            .borrow()
            .iter()
            .map(|(id, _)| id.clone())
            .collect()
    }

    pub fn config_for(&self, canvas_id: &str) -> Option<ChartConfiguration> {
        self.rendered
            .borrow()
            .iter()
            .find(|(id, _)| id == canvas_id)
            .map(|(_, config)| config.clone())
    }
}

impl Charting for RecordingCharting {
    fn render(&self, canvas_id: &str, config: &ChartConfiguration) -> PredictorResult<()> {
        if self.failing.as_deref() == Some(canvas_id) {
            return Err(PredictorError::Charting {
                canvas: canvas_id.to_string(),
                message: "rejected by test double".to_string(),
            });
        }
        self.rendered
            .borrow_mut()
            .push((canvas_id.to_string(), config.clone()));
        Ok(())
    }
}

/// Analytics endpoint stand-in
#[derive(Debug)]
pub struct RecordingSink {
    available: bool,
    events: RefCell<Vec<(String, serde_json::Value)>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self {
            available: true,
            events: RefCell::new(Vec::new()),
        }
    }

    /// A page without an analytics endpoint
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    pub fn events(&self) -> Vec<(String, serde_json::Value)> {
        self.events.borrow().clone()
    }
}

impl Default for RecordingSink {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalyticsSink for RecordingSink {
    fn is_available(&self) -> bool {
        self.available
    }

    fn send_event(&self, name: &str, payload: &serde_json::Value) -> PredictorResult<()> {
        self.events
            .borrow_mut()
            .push((name.to_string(), payload.clone()));
        Ok(())
    }
}
