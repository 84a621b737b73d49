//! End-to-end tests driving the whole page application through events

use std::rc::Rc;

use config_system::{AnonymousFormKeys, PredictorConfig};
use page_core::testing::{FakeNode, FakePage, ManualScheduler, RecordingCharting, RecordingSink};
use page_core::{ChartSlot, Page, PredictorApp, Services};
use shared_types::chart_config::ChartKind;
use shared_types::events::{EventOutcome, KeyPress, PageEvent};
use shared_types::PredictorError;
use wasm_storage::{KeyValueStore, MemoryStorage};

struct Harness {
    page: Rc<FakePage>,
    clock: Rc<ManualScheduler>,
    storage: Rc<MemoryStorage>,
    charting: Rc<RecordingCharting>,
    sink: Rc<RecordingSink>,
    app: PredictorApp<FakePage>,
}

impl Harness {
    fn new(page: FakePage, storage: Rc<MemoryStorage>, config: PredictorConfig) -> Self {
        let _ = env_logger::builder().is_test(true).try_init();

        let page = Rc::new(page);
        let clock = Rc::new(ManualScheduler::new());
        let charting = Rc::new(RecordingCharting::new());
        let sink = Rc::new(RecordingSink::new());
        let app = PredictorApp::new(
            page.clone(),
            config,
            Services {
                storage: storage.clone(),
                scheduler: clock.clone(),
                charting: charting.clone(),
                analytics: sink.clone(),
            },
        );

        Self {
            page,
            clock,
            storage,
            charting,
            sink,
            app,
        }
    }

    fn fire(&self, event: PageEvent<FakeNode>) -> EventOutcome {
        self.app.handle(event)
    }
}

/// Prediction form plus the rendered result section
fn result_page() -> FakePage {
    let page = FakePage::new();
    let body = page.body();

    let form = page.add(body, "form").id("predict").node();
    page.add(form, "input").attr("name", "home").value("");
    page.add(form, "input").attr("name", "away").value("");
    page.add(form, "input")
        .attr("name", "email")
        .attr("type", "email")
        .value("");

    page.add(body, "h2").class("home-team-name").text("Arsenal");
    page.add(body, "h2").class("away-team-name").text("Chelsea");
    page.add(body, "span").id("home-strength").text("72%");
    page.add(body, "span").id("away-strength").text("58%");
    page.add(body, "span").id("home-prob").text("48.5%");
    page.add(body, "span").id("draw-prob").text("27%");
    page.add(body, "span").id("away-prob").text("24.5%");

    page.add(body, "canvas").id("strengthChart");
    page.add(body, "canvas").id("probabilityChart");
    page.add(body, "canvas").id("h2hChart");
    page
}

fn field(page: &FakePage, name: &str) -> FakeNode {
    page.query_selector(&format!("[name=\"{name}\"]")).unwrap()
}

#[test]
fn test_initialization_restores_forms_and_renders_charts() {
    let storage = Rc::new(MemoryStorage::new());
    storage
        .set("form_predict", r#"{"home":"Arsenal","away":"Chelsea"}"#)
        .unwrap();
    let h = Harness::new(result_page(), storage, PredictorConfig::default());
    h.page.set_viewport_width(900.0);

    let report = h.app.initialize().unwrap();
    assert_eq!(report.forms, 1);
    assert_eq!(report.restored_fields, 2);
    assert_eq!(report.font_size_px, 16);
    assert_eq!(
        report.charts,
        vec![ChartSlot::Strength, ChartSlot::Probability, ChartSlot::HeadToHead]
    );

    assert_eq!(h.page.field_value(&field(&h.page, "home")).as_deref(), Some("Arsenal"));
    assert_eq!(h.page.field_value(&field(&h.page, "email")).as_deref(), Some(""));

    let strength = h.charting.config_for("strengthChart").unwrap();
    assert_eq!(strength.kind, ChartKind::Bar);
    assert_eq!(strength.values(), &[72.0, 58.0]);
    assert_eq!(strength.data.labels, vec!["Arsenal", "Chelsea"]);

    let probability = h.charting.config_for("probabilityChart").unwrap();
    assert_eq!(probability.kind, ChartKind::Doughnut);
    assert_eq!(probability.values(), &[48.5, 27.0, 24.5]);

    let h2h = h.charting.config_for("h2hChart").unwrap();
    assert_eq!(h2h.values(), &[3.0, 2.0, 1.0]);

    assert_eq!(h.app.initialize(), Err(PredictorError::AlreadyInitialized));
    assert_eq!(h.charting.canvas_ids().len(), 3);
}

#[test]
fn test_typing_saves_once_per_quiet_period_and_survives_reload() {
    let storage = Rc::new(MemoryStorage::new());
    let h = Harness::new(result_page(), storage.clone(), PredictorConfig::default());
    h.app.initialize().unwrap();

    let home = field(&h.page, "home");
    for (typed, pause) in [("A", 100), ("Ars", 100), ("Arsenal", 0)] {
        h.page.set_field_value(&home, typed);
        h.fire(PageEvent::Input { target: home });
        h.clock.advance(pause);
    }

    h.clock.advance(499);
    assert_eq!(h.storage.get("form_predict").unwrap(), None);
    h.clock.advance(1);
    assert_eq!(
        h.storage.get("form_predict").unwrap().as_deref(),
        Some(r#"{"away":"","email":"","home":"Arsenal"}"#)
    );

    let reloaded = Harness::new(result_page(), storage, PredictorConfig::default());
    reloaded.app.initialize().unwrap();
    assert_eq!(
        reloaded
            .page
            .field_value(&field(&reloaded.page, "home"))
            .as_deref(),
        Some("Arsenal")
    );
}

#[test]
fn test_anonymous_forms_with_document_index_keys() {
    let page = FakePage::new();
    let first = page.add(page.body(), "form").node();
    let q1 = page.add(first, "input").attr("name", "q").value("").node();
    let second = page.add(page.body(), "form").node();
    let q2 = page.add(second, "input").attr("name", "q").value("").node();

    let mut config = PredictorConfig::default();
    config.forms.anonymous_keys = AnonymousFormKeys::DocumentIndex;
    let h = Harness::new(page, Rc::new(MemoryStorage::new()), config);
    h.app.initialize().unwrap();

    h.page.set_field_value(&q1, "league");
    h.fire(PageEvent::Input { target: q1 });
    h.page.set_field_value(&q2, "cup");
    h.fire(PageEvent::Input { target: q2 });
    h.clock.advance(500);

    assert_eq!(
        h.storage.keys(),
        vec!["form_default_0".to_string(), "form_default_1".to_string()]
    );
}

#[test]
fn test_validation_on_focus_loss() {
    let h = Harness::new(result_page(), Rc::new(MemoryStorage::new()), PredictorConfig::default());
    h.app.initialize().unwrap();

    let email = field(&h.page, "email");
    h.page.set_field_value(&email, "abc");
    h.fire(PageEvent::FocusOut { target: email });
    assert_eq!(
        h.app.validator().error_message(&email).as_deref(),
        Some("Please enter a valid email address")
    );
    assert!(h.page.has_class(&email, "is-invalid"));

    h.page.set_field_value(&email, "fan@club.com");
    h.fire(PageEvent::FocusOut { target: email });
    assert_eq!(h.app.validator().error_message(&email), None);
    assert_eq!(h.page.count(".invalid-feedback"), 0);
}

#[test]
fn test_clicks_track_scroll_and_load() {
    let page = FakePage::new();
    page.set_location_path("/predict");
    let link = page.add(page.body(), "a").attr("href", "#results").text("See results").node();
    let results = page.add(page.body(), "section").id("results").node();
    let button = page
        .add(page.body(), "button")
        .class("btn")
        .text("Predict")
        .node();
    let h = Harness::new(page, Rc::new(MemoryStorage::new()), PredictorConfig::default());
    h.app.initialize().unwrap();

    assert_eq!(
        h.fire(PageEvent::Click { target: link }),
        EventOutcome::PreventDefault
    );
    assert_eq!(h.page.scrolled_into_view(), vec![results]);

    assert_eq!(
        h.fire(PageEvent::Click { target: button }),
        EventOutcome::Continue
    );
    assert!(h.page.has_class(&button, "btn-loading"));
    h.clock.advance(2000);
    assert_eq!(h.page.inner_html(&button), "Predict");

    let events = h.sink.events();
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].0, "user_interaction");
    assert_eq!(events[0].1["element"], "a");
    assert_eq!(events[0].1["url"], "/predict");
    assert_eq!(events[1].1["text"], "Predict");
}

#[test]
fn test_hover_shows_tooltip_and_lifts_cards() {
    let page = FakePage::new();
    page.set_default_size(80.0, 24.0);
    let card = page
        .add(page.body(), "div")
        .class("card")
        .attr("data-tooltip", "Form over the last five matches")
        .node();
    let h = Harness::new(page, Rc::new(MemoryStorage::new()), PredictorConfig::default());
    h.app.initialize().unwrap();

    assert_eq!(h.app.hover_targets(), vec![card]);
    assert_eq!(h.app.reveal_targets(), vec![card]);

    h.fire(PageEvent::PointerEnter { target: card });
    h.fire(PageEvent::PointerEnter { target: card });
    assert_eq!(h.page.count(".custom-tooltip"), 1);
    assert_eq!(
        h.page.style(&card, "transform").as_deref(),
        Some("translateY(-5px) scale(1.02)")
    );

    h.fire(PageEvent::PointerLeave { target: card });
    assert_eq!(h.page.count(".custom-tooltip"), 0);
    assert_eq!(
        h.page.style(&card, "transform").as_deref(),
        Some("translateY(0) scale(1)")
    );

    h.fire(PageEvent::BecameVisible { target: card });
    assert!(h.page.has_class(&card, "fade-in"));
}

#[test]
fn test_shortcuts_resize_and_page_load() {
    let page = FakePage::new();
    page.set_title("Football Predictor");
    let search = page
        .add(page.body(), "input")
        .attr("type", "search")
        .node();
    let modal = page.add(page.body(), "div").class("modal").class("show").node();
    let h = Harness::new(page, Rc::new(MemoryStorage::new()), PredictorConfig::default());
    h.app.initialize().unwrap();

    assert_eq!(
        h.fire(PageEvent::KeyDown(KeyPress::new("k").with_ctrl())),
        EventOutcome::PreventDefault
    );
    assert_eq!(h.page.focused(), Some(search));

    h.fire(PageEvent::KeyDown(KeyPress::new("Escape")));
    assert!(!h.page.has_class(&modal, "show"));

    let root = h.page.document_element();
    assert_eq!(h.page.style(&root, "font-size").as_deref(), Some("18px"));
    h.page.set_viewport_width(500.0);
    h.fire(PageEvent::Resize);
    h.clock.advance(250);
    assert_eq!(h.page.style(&root, "font-size").as_deref(), Some("14px"));

    h.fire(PageEvent::Loaded { elapsed_ms: 812.5 });
    let events = h.sink.events();
    assert_eq!(events.last().unwrap().0, "page_load");
    assert_eq!(events.last().unwrap().1["page_title"], "Football Predictor");
}
