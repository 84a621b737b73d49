//! Native event listeners feeding [`PredictorApp::handle`]
//!
//! Bubbling events are delegated from the document, pointer enter/leave
//! are bound per element (they do not bubble) and first visibility comes
//! from one `IntersectionObserver`. Every closure lives in
//! [`Subscriptions`]; dropping it detaches everything.

use std::rc::Rc;

use js_sys::Array;
use page_core::PredictorApp;
use shared_types::events::{EventOutcome, KeyPress, PageEvent};
use shared_types::PredictorResult;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{
    Document, Element, Event, EventTarget, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, KeyboardEvent, Window,
};

use crate::dom::WebPage;

const REVEAL_THRESHOLD: f64 = 0.1;
const REVEAL_ROOT_MARGIN: &str = "0px 0px -50px 0px";

type App = Rc<PredictorApp<WebPage>>;
type ObserverCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;

struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

#[derive(Default)]
pub struct Subscriptions {
    listeners: Vec<Listener>,
    observer: Option<(IntersectionObserver, ObserverCallback)>,
}

impl Subscriptions {
    /// Wire every listener the application needs
    pub fn attach(app: &App, window: &Window, document: &Document) -> PredictorResult<Self> {
        let mut subs = Self::default();

        subs.delegate(app, document, "click", |target| PageEvent::Click { target })?;
        subs.delegate(app, document, "input", |target| PageEvent::Input { target })?;
        subs.delegate(app, document, "focusout", |target| PageEvent::FocusOut { target })?;
        subs.delegate(app, document, "change", |target| PageEvent::Change { target })?;

        {
            let app = Rc::clone(app);
            subs.listen(document, "keydown", move |event| {
                if let Some(key) = event.dyn_ref::<KeyboardEvent>() {
                    let press = KeyPress {
                        key: key.key(),
                        ctrl: key.ctrl_key(),
                        meta: key.meta_key(),
                    };
                    apply(&event, app.handle(PageEvent::KeyDown(press)));
                }
            })?;
        }

        for element in app.hover_targets() {
            let target: &EventTarget = &element;
            let enter = {
                let app = Rc::clone(app);
                let element = element.clone();
                move |_: Event| {
                    app.handle(PageEvent::PointerEnter {
                        target: element.clone(),
                    });
                }
            };
            let leave = {
                let app = Rc::clone(app);
                let element = element.clone();
                move |_: Event| {
                    app.handle(PageEvent::PointerLeave {
                        target: element.clone(),
                    });
                }
            };
            subs.listen(target, "mouseenter", enter)?;
            subs.listen(target, "mouseleave", leave)?;
        }

        {
            let app = Rc::clone(app);
            let win = window.clone();
            subs.listen(window, "scroll", move |_| {
                let offset_y = win.scroll_y().unwrap_or_default();
                app.handle(PageEvent::Scroll { offset_y });
            })?;
        }
        {
            let app = Rc::clone(app);
            subs.listen(window, "resize", move |_| {
                app.handle(PageEvent::Resize);
            })?;
        }
        {
            let app = Rc::clone(app);
            let win = window.clone();
            subs.listen(window, "load", move |_| {
                app.handle(PageEvent::Loaded {
                    elapsed_ms: elapsed_ms(&win),
                });
            })?;
        }

        subs.observe_reveals(app)?;
        log::debug!("Attached {} listener(s)", subs.listeners.len());
        Ok(subs)
    }

    fn listen(
        &mut self,
        target: &EventTarget,
        kind: &'static str,
        handler: impl FnMut(Event) + 'static,
    ) -> PredictorResult<()> {
        let callback = Closure::<dyn FnMut(Event)>::new(handler);
        target.add_event_listener_with_callback(kind, callback.as_ref().unchecked_ref())?;
        self.listeners.push(Listener {
            target: target.clone(),
            kind,
            callback,
        });
        Ok(())
    }

    /// Document-level listener for a bubbling event, keyed on its target
    fn delegate(
        &mut self,
        app: &App,
        document: &Document,
        kind: &'static str,
        to_event: fn(Element) -> PageEvent<Element>,
    ) -> PredictorResult<()> {
        let app = Rc::clone(app);
        self.listen(document, kind, move |event| {
            let target = event
                .target()
                .and_then(|target| target.dyn_into::<Element>().ok());
            if let Some(target) = target {
                apply(&event, app.handle(to_event(target)));
            }
        })
    }

    fn observe_reveals(&mut self, app: &App) -> PredictorResult<()> {
        let targets = app.reveal_targets();
        if targets.is_empty() {
            return Ok(());
        }

        let app = Rc::clone(app);
        let callback: ObserverCallback =
            Closure::new(move |entries: Array, observer: IntersectionObserver| {
                for entry in entries.iter() {
                    let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                        continue;
                    };
                    if entry.is_intersecting() {
                        let target = entry.target();
                        observer.unobserve(&target);
                        app.handle(PageEvent::BecameVisible { target });
                    }
                }
            });

        let options = IntersectionObserverInit::new();
        options.set_threshold(&JsValue::from_f64(REVEAL_THRESHOLD));
        options.set_root_margin(REVEAL_ROOT_MARGIN);
        let observer = IntersectionObserver::new_with_options(
            callback.as_ref().unchecked_ref(),
            &options,
        )?;
        for target in &targets {
            observer.observe(target);
        }

        self.observer = Some((observer, callback));
        Ok(())
    }
}

impl Drop for Subscriptions {
    fn drop(&mut self) {
        for listener in &self.listeners {
            let _ = listener.target.remove_event_listener_with_callback(
                listener.kind,
                listener.callback.as_ref().unchecked_ref(),
            );
        }
        if let Some((observer, _)) = &self.observer {
            observer.disconnect();
        }
    }
}

fn apply(event: &Event, outcome: EventOutcome) {
    if outcome == EventOutcome::PreventDefault {
        event.prevent_default();
    }
}

/// Milliseconds since navigation start
pub fn elapsed_ms(window: &Window) -> f64 {
    window
        .performance()
        .map(|performance| performance.now())
        .unwrap_or_default()
}
