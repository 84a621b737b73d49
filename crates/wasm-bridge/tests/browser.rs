//! Browser-only checks, run with `wasm-pack test --headless --chrome`
#![cfg(target_arch = "wasm32")]

use std::rc::Rc;

use js_sys::{Function, Reflect};

use page_core::{AnalyticsSink, Charting, FieldError, FieldValidator, Page, TooltipController};
use predictor_wasm::analytics::GtagSink;
use predictor_wasm::chart_js::ChartJsCharting;
use predictor_wasm::dom::WebPage;
use shared_types::chart_config::{ChartConfiguration, ChartData, ChartKind};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_test::*;
use web_sys::Element;

wasm_bindgen_test_configure!(run_in_browser);

fn page() -> Rc<WebPage> {
    let window = web_sys::window().unwrap();
    Rc::new(WebPage::new(window).unwrap())
}

fn mount(page: &WebPage, html: &str) -> Element {
    let host = page.create_element("div").unwrap();
    host.set_inner_html(html);
    page.append_to_body(&host);
    host
}

#[wasm_bindgen_test]
fn form_entries_follow_form_data() {
    let page = page();
    let host = mount(
        &page,
        r#"<form id="browser-form">
             <input name="team" value="Arsenal">
             <input name="agree" type="checkbox">
             <input name="off" value="x" disabled>
           </form>"#,
    );
    let form = page.element_by_id("browser-form").unwrap();

    assert_eq!(
        page.form_entries(&form),
        vec![("team".to_string(), "Arsenal".to_string())]
    );
    page.remove(&host);
}

#[wasm_bindgen_test]
fn validator_inserts_message_after_field() {
    let page = page();
    let host = mount(&page, r#"<input id="browser-email" type="email" value="a@b">"#);
    let field = page.element_by_id("browser-email").unwrap();
    let validator = FieldValidator::new(page.clone());

    assert_eq!(validator.validate(&field), Some(FieldError::InvalidEmail));
    let feedback = page.next_sibling(&field).unwrap();
    assert!(page.has_class(&feedback, "invalid-feedback"));

    page.set_field_value(&field, "a@b.com");
    assert_eq!(validator.validate(&field), None);
    assert!(page.next_sibling(&field).is_none());
    page.remove(&host);
}

#[wasm_bindgen_test]
fn tooltip_overlay_lifecycle() {
    let page = page();
    let host = mount(&page, r#"<span id="browser-badge" data-tooltip="xG">?</span>"#);
    let badge = page.element_by_id("browser-badge").unwrap();
    let tooltips = TooltipController::new(page.clone(), Default::default());

    let overlay = tooltips.show(&badge).unwrap();
    assert_eq!(page.text_content(&overlay), "xG");
    assert_eq!(page.query_selector_all(".custom-tooltip").len(), 1);

    assert!(tooltips.hide(&badge));
    assert!(page.query_selector_all(".custom-tooltip").is_empty());
    page.remove(&host);
}

#[wasm_bindgen_test]
fn gtag_absent_by_default() {
    let sink = GtagSink::new(web_sys::window().unwrap());
    assert!(!sink.is_available());
}

#[wasm_bindgen_test]
fn chart_without_library_is_an_error() {
    let window = web_sys::window().unwrap();
    let document = window.document().unwrap();
    let charting = ChartJsCharting::new(window, document);
    let config = ChartConfiguration {
        kind: ChartKind::Bar,
        data: ChartData {
            labels: vec![],
            datasets: vec![],
        },
        options: serde_json::json!({}),
        y_tick_suffix: None,
    };

    assert!(!charting.is_loaded());
    assert!(charting.render("strengthChart", &config).is_err());
}

#[wasm_bindgen_test]
fn namespace_is_published_on_window() {
    // The start hook may already have booted the page
    let _ = predictor_wasm::start();
    let window = web_sys::window().unwrap();

    let namespace = Reflect::get(&window, &predictor_wasm::NAMESPACE.into()).unwrap();
    assert!(namespace.is_object());
    for name in ["trackInteraction", "saveFormData", "createH2HChart"] {
        let function = Reflect::get(&namespace, &name.into()).unwrap();
        assert!(function.is_function(), "{name} missing");
    }

    let is_initialized: Function = Reflect::get(&namespace, &"isInitialized".into())
        .unwrap()
        .dyn_into()
        .unwrap();
    assert_eq!(is_initialized.call0(&JsValue::NULL).unwrap(), JsValue::TRUE);
}
