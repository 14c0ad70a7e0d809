//! Browser bindings: `Page` over `web-sys`, `localStorage`, timers, and the
//! exported `start` entry point.
//!
//! SYSTEM CONTEXT
//! ==============
//! The host page loads the generated module and calls `start()` (optionally
//! with a JSON config). Everything else runs from DOM event callbacks on the
//! page's single thread. Listener closures are owned by [`WebPage`] and
//! dropped when unlistened; the attached [`Site`] itself lives for the rest of
//! the page in a thread-local.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use futures::future::LocalBoxFuture;
use wasm_bindgen::prelude::*;
use wasm_bindgen::{JsCast, closure::Closure};
use web_sys::{
    Document, Element, EventTarget, HtmlButtonElement, HtmlElement, HtmlFormElement, HtmlInputElement,
    HtmlSelectElement, HtmlTextAreaElement, ScrollBehavior, ScrollToOptions, Window,
};

use crate::config::PageConfig;
use crate::dom::{Event, EventKind, Handler, ListenerId, Page, PageError, Target};
use crate::runtime::Runtime;
use crate::site::Site;
use crate::theme::ThemeStore;

thread_local! {
    static SITE: RefCell<Option<Site<WebPage>>> = const { RefCell::new(None) };
}

fn js_message(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value.as_string().unwrap_or_else(|| format!("{value:?}"))
}

fn js_err(op: &'static str) -> impl Fn(JsValue) -> PageError {
    move |value| PageError::dom(op, js_message(&value))
}

fn query_all(root: &Element, selector: &str) -> Vec<Element> {
    let Ok(list) = root.query_selector_all(selector) else {
        log::warn!("invalid selector {selector:?}");
        return Vec::new();
    };
    (0..list.length()).filter_map(|i| list.item(i)).filter_map(|node| node.dyn_ref::<Element>().cloned()).collect()
}

fn query_one(root: &Element, selector: &str) -> Option<Element> {
    match root.query_selector(selector) {
        Ok(found) => found,
        Err(e) => {
            log::warn!("invalid selector {selector:?}: {}", js_message(&e));
            None
        }
    }
}

struct Registration {
    target: EventTarget,
    kind: EventKind,
    closure: Closure<dyn FnMut(web_sys::Event)>,
}

/// The live document and window.
pub struct WebPage {
    window: Window,
    document: Document,
    registrations: RefCell<HashMap<ListenerId, Registration>>,
    next_listener: Cell<u64>,
}

impl WebPage {
    pub fn new() -> Result<Self, PageError> {
        let window = web_sys::window().ok_or(PageError::Missing("window"))?;
        let document = window.document().ok_or(PageError::Missing("document"))?;
        Ok(Self { window, document, registrations: RefCell::new(HashMap::new()), next_listener: Cell::new(1) })
    }

    fn root(&self) -> Option<Element> {
        self.document.document_element()
    }

    fn html(node: &Element) -> Option<&HtmlElement> {
        node.dyn_ref::<HtmlElement>()
    }
}

impl Page for WebPage {
    type Node = Element;

    fn element_by_id(&self, id: &str) -> Option<Element> {
        self.document.get_element_by_id(id)
    }

    fn first_by_class(&self, class: &str) -> Option<Element> {
        self.document.get_elements_by_class_name(class).item(0)
    }

    fn body(&self) -> Option<Element> {
        self.document.body().map(Into::into)
    }

    fn nav_links(&self) -> Vec<Element> {
        self.root().map(|root| query_all(&root, "nav a")).unwrap_or_default()
    }

    fn forms(&self) -> Vec<Element> {
        self.root().map(|root| query_all(&root, "form")).unwrap_or_default()
    }

    fn form_fields(&self, form: &Element) -> Vec<Element> {
        query_all(form, "input, textarea, select")
    }

    fn submit_button(&self, form: &Element) -> Option<Element> {
        query_one(form, r#"button[type="submit"]"#)
    }

    fn descendant_by_class(&self, node: &Element, class: &str) -> Option<Element> {
        node.get_elements_by_class_name(class).item(0)
    }

    fn descendant_by_tag(&self, node: &Element, tag: &str) -> Option<Element> {
        node.get_elements_by_tag_name(tag).item(0)
    }

    fn parent(&self, node: &Element) -> Option<Element> {
        node.parent_element()
    }

    fn attribute(&self, node: &Element, name: &str) -> Option<String> {
        node.get_attribute(name)
    }

    fn has_attribute(&self, node: &Element, name: &str) -> bool {
        node.has_attribute(name)
    }

    fn set_attribute(&self, node: &Element, name: &str, value: &str) -> Result<(), PageError> {
        node.set_attribute(name, value).map_err(js_err("setAttribute"))
    }

    fn has_class(&self, node: &Element, class: &str) -> bool {
        node.class_list().contains(class)
    }

    fn add_class(&self, node: &Element, class: &str) -> Result<(), PageError> {
        node.class_list().add_1(class).map_err(js_err("classList.add"))
    }

    fn remove_class(&self, node: &Element, class: &str) -> Result<(), PageError> {
        node.class_list().remove_1(class).map_err(js_err("classList.remove"))
    }

    fn set_inner_html(&self, node: &Element, html: &str) {
        node.set_inner_html(html);
    }

    fn inner_text(&self, node: &Element) -> String {
        Self::html(node).map(HtmlElement::inner_text).unwrap_or_default()
    }

    fn set_inner_text(&self, node: &Element, text: &str) {
        if let Some(el) = Self::html(node) {
            el.set_inner_text(text);
        }
    }

    fn set_text_content(&self, node: &Element, text: &str) {
        node.set_text_content(Some(text));
    }

    fn set_style(&self, node: &Element, property: &str, value: &str) -> Result<(), PageError> {
        let el = Self::html(node).ok_or(PageError::Missing("element style"))?;
        let style = el.style();
        if value.is_empty() {
            style.remove_property(property).map(drop).map_err(js_err("style.removeProperty"))
        } else {
            style.set_property(property, value).map_err(js_err("style.setProperty"))
        }
    }

    fn create_element(&self, tag: &str) -> Result<Element, PageError> {
        self.document.create_element(tag).map_err(js_err("createElement"))
    }

    fn append_child(&self, parent: &Element, child: &Element) -> Result<(), PageError> {
        parent.append_child(child).map(drop).map_err(js_err("appendChild"))
    }

    fn control_type(&self, node: &Element) -> String {
        if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
            input.type_()
        } else if let Some(area) = node.dyn_ref::<HtmlTextAreaElement>() {
            area.type_()
        } else if let Some(select) = node.dyn_ref::<HtmlSelectElement>() {
            select.type_()
        } else {
            String::new()
        }
    }

    fn value(&self, node: &Element) -> String {
        if let Some(input) = node.dyn_ref::<HtmlInputElement>() {
            input.value()
        } else if let Some(area) = node.dyn_ref::<HtmlTextAreaElement>() {
            area.value()
        } else if let Some(select) = node.dyn_ref::<HtmlSelectElement>() {
            select.value()
        } else {
            String::new()
        }
    }

    fn set_disabled(&self, node: &Element, disabled: bool) -> Result<(), PageError> {
        if let Some(button) = node.dyn_ref::<HtmlButtonElement>() {
            button.set_disabled(disabled);
            return Ok(());
        }
        if disabled {
            node.set_attribute("disabled", "").map_err(js_err("setAttribute"))
        } else {
            node.remove_attribute("disabled").map_err(js_err("removeAttribute"))
        }
    }

    fn is_disabled(&self, node: &Element) -> bool {
        match node.dyn_ref::<HtmlButtonElement>() {
            Some(button) => button.disabled(),
            None => node.has_attribute("disabled"),
        }
    }

    fn reset_form(&self, form: &Element) -> Result<(), PageError> {
        let form = form.dyn_ref::<HtmlFormElement>().ok_or(PageError::Missing("form element"))?;
        form.reset();
        Ok(())
    }

    fn pathname(&self) -> Result<String, PageError> {
        self.window.location().pathname().map_err(js_err("location.pathname"))
    }

    fn href(&self) -> Result<String, PageError> {
        self.window.location().href().map_err(js_err("location.href"))
    }

    fn set_href(&self, href: &str) -> Result<(), PageError> {
        self.window.location().set_href(href).map_err(js_err("location.href"))
    }

    fn scroll_y(&self) -> Result<f64, PageError> {
        self.window.scroll_y().map_err(js_err("scrollY"))
    }

    fn scroll_to_top(&self) {
        let options = ScrollToOptions::new();
        options.set_top(0.0);
        options.set_behavior(ScrollBehavior::Smooth);
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn alert(&self, message: &str) -> Result<(), PageError> {
        self.window.alert_with_message(message).map_err(js_err("alert"))
    }

    fn listen(&self, target: Target<Element>, kind: EventKind, handler: Handler) -> Result<ListenerId, PageError> {
        let target: EventTarget = match target {
            Target::Window => self.window.clone().into(),
            Target::Node(node) => node.into(),
        };
        let closure = Closure::<dyn FnMut(web_sys::Event)>::new(move |native: web_sys::Event| {
            let event = Event::new(kind);
            handler(&event);
            if event.default_prevented() {
                native.prevent_default();
            }
        });
        target
            .add_event_listener_with_callback(kind.as_str(), closure.as_ref().unchecked_ref())
            .map_err(js_err("addEventListener"))?;
        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);
        self.registrations.borrow_mut().insert(id, Registration { target, kind, closure });
        Ok(id)
    }

    fn unlisten(&self, id: ListenerId) {
        let Some(reg) = self.registrations.borrow_mut().remove(&id) else {
            return;
        };
        if let Err(e) = reg.target.remove_event_listener_with_callback(reg.kind.as_str(), reg.closure.as_ref().unchecked_ref()) {
            log::warn!("removeEventListener failed: {}", js_message(&e));
        }
    }
}

/// `window.localStorage`.
pub struct LocalStorageStore {
    window: Window,
}

impl LocalStorageStore {
    pub fn new() -> Result<Self, PageError> {
        Ok(Self { window: web_sys::window().ok_or(PageError::Missing("window"))? })
    }

    fn storage(&self) -> Result<web_sys::Storage, PageError> {
        self.window.local_storage().map_err(js_err("localStorage"))?.ok_or(PageError::Missing("localStorage"))
    }
}

impl ThemeStore for LocalStorageStore {
    fn get(&self, key: &str) -> Result<Option<String>, PageError> {
        self.storage()?.get_item(key).map_err(js_err("localStorage.getItem"))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PageError> {
        self.storage()?.set_item(key, value).map_err(js_err("localStorage.setItem"))
    }
}

/// `setTimeout` via `gloo-timers`, tasks via `wasm-bindgen-futures`.
#[derive(Debug, Default)]
pub struct WebRuntime;

impl Runtime for WebRuntime {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        Box::pin(gloo_timers::future::sleep(duration))
    }

    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        wasm_bindgen_futures::spawn_local(task);
    }
}

fn attach_site(config: &Rc<PageConfig>) -> Result<(), PageError> {
    let page = Rc::new(WebPage::new()?);
    let store = Rc::new(LocalStorageStore::new()?);
    let runtime = Rc::new(WebRuntime);
    let site = Site::attach(&page, &store, &runtime, config);
    SITE.with(|slot| {
        if let Some(previous) = slot.borrow_mut().replace(site) {
            previous.dispose();
        }
    });
    Ok(())
}

fn attach_or_log(config: &Rc<PageConfig>) {
    if let Err(e) = attach_site(config) {
        log::error!("failed to attach page behaviors: {e}");
    }
}

/// Entry point called by the host page.
///
/// `config_json` is an optional partial [`PageConfig`]. Behaviors attach on
/// `DOMContentLoaded`, or immediately when the document has already loaded.
#[wasm_bindgen]
pub fn start(config_json: Option<String>) -> Result<(), JsValue> {
    console_error_panic_hook::set_once();

    let config = match config_json.as_deref() {
        Some(raw) => PageConfig::from_json(raw).map_err(|e| JsValue::from_str(&e.to_string()))?,
        None => PageConfig::default(),
    };
    let level = config.log_level_filter().map_err(|e| JsValue::from_str(&e.to_string()))?;
    if let Some(level) = level.to_level() {
        if let Err(e) = console_log::init_with_level(level) {
            web_sys::console::warn_1(&JsValue::from_str(&format!("logger already set: {e}")));
        }
    }
    let config = Rc::new(config);

    let document = web_sys::window().and_then(|w| w.document()).ok_or_else(|| JsValue::from_str("no document"))?;
    if document.ready_state() != "loading" {
        attach_or_log(&config);
        return Ok(());
    }

    let on_ready = Closure::once_into_js(move || attach_or_log(&config));
    document.add_event_listener_with_callback("DOMContentLoaded", on_ready.unchecked_ref())
}
