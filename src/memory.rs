//! In-memory page, theme store, and manual-clock runtime.
//!
//! `MemoryPage` is a small element tree with attributes, classes, inline
//! styles, form control values, window state, and listener dispatch. It is
//! enough to drive every component end to end without a browser. Events are
//! delivered to listeners on the exact target only; there is no bubbling.
//!
//! `ManualRuntime` never sleeps: timers resolve when [`ManualRuntime::advance`]
//! moves its clock past their deadline, and spawned tasks only run inside
//! `advance` / [`ManualRuntime::run_until_stalled`].

use std::cell::{Cell, RefCell};
use std::collections::{BTreeMap, HashMap};
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::task::{Context, Poll, Waker};
use std::time::Duration;

use futures::executor::{LocalPool, LocalSpawner};
use futures::future::LocalBoxFuture;
use futures::task::LocalSpawnExt;

use crate::dom::{Event, EventKind, Handler, ListenerId, Page, PageError, Target};
use crate::runtime::Runtime;
use crate::theme::ThemeStore;

#[cfg(test)]
#[path = "memory_test.rs"]
mod memory_test;

/// Element handle into a [`MemoryPage`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

const ROOT: NodeId = NodeId(0);
const BODY: NodeId = NodeId(1);

#[derive(Debug, Clone, Default)]
struct ElementData {
    tag: String,
    attributes: BTreeMap<String, String>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    inner_html: String,
    text: String,
    styles: BTreeMap<String, String>,
    value: String,
    default_value: String,
    disabled: bool,
}

impl ElementData {
    fn new(tag: &str) -> Self {
        Self { tag: tag.to_ascii_lowercase(), ..Self::default() }
    }

    fn has_class(&self, class: &str) -> bool {
        self.attributes.get("class").is_some_and(|list| list.split_whitespace().any(|c| c == class))
    }
}

struct Listener {
    id: ListenerId,
    target: Target<NodeId>,
    kind: EventKind,
    handler: Handler,
}

#[derive(Debug, Default)]
struct WindowState {
    href: String,
    pathname: String,
    scroll_y: f64,
    alerts: Vec<String>,
    navigations: Vec<String>,
    scroll_to_top_calls: usize,
}

/// In-memory document with `<html>` and `<body>` already present.
pub struct MemoryPage {
    nodes: RefCell<Vec<ElementData>>,
    listeners: RefCell<Vec<Listener>>,
    next_listener: Cell<u64>,
    window: RefCell<WindowState>,
}

impl Default for MemoryPage {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryPage {
    #[must_use]
    pub fn new() -> Self {
        let root = ElementData { children: vec![BODY], ..ElementData::new("html") };
        let body = ElementData { parent: Some(ROOT), ..ElementData::new("body") };
        let page = Self {
            nodes: RefCell::new(vec![root, body]),
            listeners: RefCell::new(Vec::new()),
            next_listener: Cell::new(1),
            window: RefCell::new(WindowState::default()),
        };
        page.set_location("https://example.com/index.html");
        page
    }

    /// Page at `href`, e.g. `https://example.com/login.html`.
    #[must_use]
    pub fn at(href: &str) -> Self {
        let page = Self::new();
        page.set_location(href);
        page
    }

    // --- Building ---

    #[must_use]
    pub fn body_node(&self) -> NodeId {
        BODY
    }

    /// Append a `tag` element under `parent`.
    pub fn append(&self, parent: NodeId, tag: &str) -> NodeId {
        self.append_with(parent, tag, &[])
    }

    /// Append a `tag` element with attributes. A `value` attribute also sets
    /// the control's current and default value.
    pub fn append_with(&self, parent: NodeId, tag: &str, attributes: &[(&str, &str)]) -> NodeId {
        let mut data = ElementData::new(tag);
        for (name, value) in attributes {
            data.attributes.insert((*name).to_owned(), (*value).to_owned());
        }
        if let Some(value) = data.attributes.get("value").cloned() {
            data.value.clone_from(&value);
            data.default_value = value;
        }
        data.parent = Some(parent);
        let mut nodes = self.nodes.borrow_mut();
        let id = NodeId(nodes.len());
        nodes.push(data);
        if let Some(p) = nodes.get_mut(parent.0) {
            p.children.push(id);
        }
        id
    }

    /// Type into a control.
    pub fn type_value(&self, node: NodeId, value: &str) {
        self.with_node_mut(node, |n| n.value = value.to_owned());
    }

    /// Move the window to `href`; the pathname follows.
    pub fn set_location(&self, href: &str) {
        let mut window = self.window.borrow_mut();
        window.href = href.to_owned();
        window.pathname = pathname_of(href);
    }

    // --- Inspection ---

    #[must_use]
    pub fn tag(&self, node: NodeId) -> String {
        self.with_node(node, |n| n.tag.clone()).unwrap_or_default()
    }

    #[must_use]
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.with_node(node, |n| n.children.clone()).unwrap_or_default()
    }

    #[must_use]
    pub fn style(&self, node: NodeId, property: &str) -> Option<String> {
        self.with_node(node, |n| n.styles.get(property).cloned()).flatten()
    }

    #[must_use]
    pub fn inner_html(&self, node: NodeId) -> String {
        self.with_node(node, |n| n.inner_html.clone()).unwrap_or_default()
    }

    /// Every element carrying `class`, in document order.
    #[must_use]
    pub fn all_by_class(&self, class: &str) -> Vec<NodeId> {
        self.filter_below(ROOT, |n| n.has_class(class))
    }

    #[must_use]
    pub fn alerts(&self) -> Vec<String> {
        self.window.borrow().alerts.clone()
    }

    /// Every `set_href` call, in order.
    #[must_use]
    pub fn navigations(&self) -> Vec<String> {
        self.window.borrow().navigations.clone()
    }

    #[must_use]
    pub fn scroll_to_top_calls(&self) -> usize {
        self.window.borrow().scroll_to_top_calls
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.borrow().len()
    }

    // --- Events ---

    /// Deliver `kind` to every listener on `target`. Returns whether a handler
    /// prevented the default action.
    pub fn dispatch(&self, target: &Target<NodeId>, kind: EventKind) -> bool {
        let handlers: Vec<Handler> = self
            .listeners
            .borrow()
            .iter()
            .filter(|l| l.kind == kind && &l.target == target)
            .map(|l| Rc::clone(&l.handler))
            .collect();
        let event = Event::new(kind);
        for handler in handlers {
            handler(&event);
        }
        event.default_prevented()
    }

    pub fn click(&self, node: NodeId) -> bool {
        self.dispatch(&Target::Node(node), EventKind::Click)
    }

    pub fn submit(&self, form: NodeId) -> bool {
        self.dispatch(&Target::Node(form), EventKind::Submit)
    }

    /// Scroll the window to `y` and fire a scroll event.
    pub fn scroll_window_to(&self, y: f64) {
        self.window.borrow_mut().scroll_y = y;
        self.dispatch(&Target::Window, EventKind::Scroll);
    }

    // --- Internals ---

    fn with_node<T>(&self, node: NodeId, f: impl FnOnce(&ElementData) -> T) -> Option<T> {
        self.nodes.borrow().get(node.0).map(f)
    }

    fn with_node_mut<T>(&self, node: NodeId, f: impl FnOnce(&mut ElementData) -> T) -> Option<T> {
        self.nodes.borrow_mut().get_mut(node.0).map(f)
    }

    fn try_node_mut(&self, node: NodeId, op: &'static str, f: impl FnOnce(&mut ElementData)) -> Result<(), PageError> {
        self.with_node_mut(node, f).ok_or_else(|| PageError::dom(op, format!("no node {}", node.0)))
    }

    /// Descendants of `node` in document order, excluding `node`.
    fn descendants(&self, node: NodeId) -> Vec<NodeId> {
        let nodes = self.nodes.borrow();
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = nodes.get(node.0).map(|n| n.children.iter().rev().copied().collect()).unwrap_or_default();
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(n) = nodes.get(id.0) {
                stack.extend(n.children.iter().rev().copied());
            }
        }
        out
    }

    fn find_below(&self, node: NodeId, pred: impl Fn(&ElementData) -> bool) -> Option<NodeId> {
        let candidates = self.descendants(node);
        let nodes = self.nodes.borrow();
        candidates.into_iter().find(|id| nodes.get(id.0).is_some_and(&pred))
    }

    fn filter_below(&self, node: NodeId, pred: impl Fn(&ElementData) -> bool) -> Vec<NodeId> {
        let candidates = self.descendants(node);
        let nodes = self.nodes.borrow();
        candidates.into_iter().filter(|id| nodes.get(id.0).is_some_and(&pred)).collect()
    }

    fn has_ancestor_tag(&self, node: NodeId, tag: &str) -> bool {
        let nodes = self.nodes.borrow();
        let mut current = nodes.get(node.0).and_then(|n| n.parent);
        while let Some(id) = current {
            let Some(n) = nodes.get(id.0) else {
                return false;
            };
            if n.tag == tag {
                return true;
            }
            current = n.parent;
        }
        false
    }
}

fn is_control(tag: &str) -> bool {
    matches!(tag, "input" | "textarea" | "select")
}

fn control_type_of(data: &ElementData) -> String {
    match data.tag.as_str() {
        "input" => data.attributes.get("type").map_or_else(|| "text".to_owned(), |t| t.to_ascii_lowercase()),
        "textarea" => "textarea".to_owned(),
        "select" if data.attributes.contains_key("multiple") => "select-multiple".to_owned(),
        "select" => "select-one".to_owned(),
        "button" => data.attributes.get("type").map_or_else(|| "submit".to_owned(), |t| t.to_ascii_lowercase()),
        _ => String::new(),
    }
}

/// Path component of an absolute or relative address.
fn pathname_of(href: &str) -> String {
    let after_scheme = match href.find("://") {
        Some(i) => {
            let rest = &href[i + 3..];
            rest.find('/').map_or("/", |j| &rest[j..])
        }
        None => href,
    };
    let end = after_scheme.find(['?', '#']).unwrap_or(after_scheme.len());
    after_scheme[..end].to_owned()
}

impl Page for MemoryPage {
    type Node = NodeId;

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.find_below(ROOT, |n| n.attributes.get("id").is_some_and(|v| v == id))
    }

    fn first_by_class(&self, class: &str) -> Option<NodeId> {
        self.find_below(ROOT, |n| n.has_class(class))
    }

    fn body(&self) -> Option<NodeId> {
        Some(BODY)
    }

    fn nav_links(&self) -> Vec<NodeId> {
        self.filter_below(ROOT, |n| n.tag == "a")
            .into_iter()
            .filter(|id| self.has_ancestor_tag(*id, "nav"))
            .collect()
    }

    fn forms(&self) -> Vec<NodeId> {
        self.filter_below(ROOT, |n| n.tag == "form")
    }

    fn form_fields(&self, form: &NodeId) -> Vec<NodeId> {
        self.filter_below(*form, |n| is_control(&n.tag))
    }

    fn submit_button(&self, form: &NodeId) -> Option<NodeId> {
        self.find_below(*form, |n| n.tag == "button" && n.attributes.get("type").is_some_and(|t| t.eq_ignore_ascii_case("submit")))
    }

    fn descendant_by_class(&self, node: &NodeId, class: &str) -> Option<NodeId> {
        self.find_below(*node, |n| n.has_class(class))
    }

    fn descendant_by_tag(&self, node: &NodeId, tag: &str) -> Option<NodeId> {
        let tag = tag.to_ascii_lowercase();
        self.find_below(*node, |n| n.tag == tag)
    }

    fn parent(&self, node: &NodeId) -> Option<NodeId> {
        self.with_node(*node, |n| n.parent).flatten()
    }

    fn attribute(&self, node: &NodeId, name: &str) -> Option<String> {
        self.with_node(*node, |n| n.attributes.get(name).cloned()).flatten()
    }

    fn has_attribute(&self, node: &NodeId, name: &str) -> bool {
        self.with_node(*node, |n| n.attributes.contains_key(name)).unwrap_or(false)
    }

    fn set_attribute(&self, node: &NodeId, name: &str, value: &str) -> Result<(), PageError> {
        self.try_node_mut(*node, "setAttribute", |n| {
            n.attributes.insert(name.to_owned(), value.to_owned());
        })
    }

    fn has_class(&self, node: &NodeId, class: &str) -> bool {
        self.with_node(*node, |n| n.has_class(class)).unwrap_or(false)
    }

    fn add_class(&self, node: &NodeId, class: &str) -> Result<(), PageError> {
        self.try_node_mut(*node, "classList.add", |n| {
            if n.has_class(class) {
                return;
            }
            let list = n.attributes.entry("class".to_owned()).or_default();
            if !list.trim().is_empty() {
                list.push(' ');
            }
            list.push_str(class);
        })
    }

    fn remove_class(&self, node: &NodeId, class: &str) -> Result<(), PageError> {
        self.try_node_mut(*node, "classList.remove", |n| {
            if let Some(list) = n.attributes.get_mut("class") {
                *list = list.split_whitespace().filter(|c| *c != class).collect::<Vec<_>>().join(" ");
            }
        })
    }

    fn set_inner_html(&self, node: &NodeId, html: &str) {
        self.with_node_mut(*node, |n| {
            n.inner_html = html.to_owned();
            n.children.clear();
        });
    }

    fn inner_text(&self, node: &NodeId) -> String {
        self.with_node(*node, |n| n.text.clone()).unwrap_or_default()
    }

    fn set_inner_text(&self, node: &NodeId, text: &str) {
        self.with_node_mut(*node, |n| n.text = text.to_owned());
    }

    fn set_text_content(&self, node: &NodeId, text: &str) {
        self.set_inner_text(node, text);
    }

    fn set_style(&self, node: &NodeId, property: &str, value: &str) -> Result<(), PageError> {
        self.try_node_mut(*node, "style.setProperty", |n| {
            if value.is_empty() {
                n.styles.remove(property);
            } else {
                n.styles.insert(property.to_owned(), value.to_owned());
            }
        })
    }

    fn create_element(&self, tag: &str) -> Result<NodeId, PageError> {
        let mut nodes = self.nodes.borrow_mut();
        let id = NodeId(nodes.len());
        nodes.push(ElementData::new(tag));
        Ok(id)
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) -> Result<(), PageError> {
        let mut nodes = self.nodes.borrow_mut();
        if parent.0 >= nodes.len() || child.0 >= nodes.len() {
            return Err(PageError::dom("appendChild", "unknown node"));
        }
        if let Some(old) = nodes[child.0].parent {
            nodes[old.0].children.retain(|c| c != child);
        }
        nodes[child.0].parent = Some(*parent);
        nodes[parent.0].children.push(*child);
        Ok(())
    }

    fn control_type(&self, node: &NodeId) -> String {
        self.with_node(*node, control_type_of).unwrap_or_default()
    }

    fn value(&self, node: &NodeId) -> String {
        self.with_node(*node, |n| n.value.clone()).unwrap_or_default()
    }

    fn set_disabled(&self, node: &NodeId, disabled: bool) -> Result<(), PageError> {
        self.try_node_mut(*node, "disabled", |n| n.disabled = disabled)
    }

    fn is_disabled(&self, node: &NodeId) -> bool {
        self.with_node(*node, |n| n.disabled).unwrap_or(false)
    }

    fn reset_form(&self, form: &NodeId) -> Result<(), PageError> {
        for field in self.form_fields(form) {
            self.with_node_mut(field, |n| n.value.clone_from(&n.default_value));
        }
        Ok(())
    }

    fn pathname(&self) -> Result<String, PageError> {
        Ok(self.window.borrow().pathname.clone())
    }

    fn href(&self) -> Result<String, PageError> {
        Ok(self.window.borrow().href.clone())
    }

    fn set_href(&self, href: &str) -> Result<(), PageError> {
        self.window.borrow_mut().navigations.push(href.to_owned());
        self.set_location(href);
        Ok(())
    }

    fn scroll_y(&self) -> Result<f64, PageError> {
        Ok(self.window.borrow().scroll_y)
    }

    fn scroll_to_top(&self) {
        let mut window = self.window.borrow_mut();
        window.scroll_y = 0.0;
        window.scroll_to_top_calls += 1;
    }

    fn alert(&self, message: &str) -> Result<(), PageError> {
        self.window.borrow_mut().alerts.push(message.to_owned());
        Ok(())
    }

    fn listen(&self, target: Target<NodeId>, kind: EventKind, handler: Handler) -> Result<ListenerId, PageError> {
        if let Target::Node(node) = &target {
            if node.0 >= self.nodes.borrow().len() {
                return Err(PageError::dom("addEventListener", "unknown node"));
            }
        }
        let id = ListenerId(self.next_listener.get());
        self.next_listener.set(id.0 + 1);
        self.listeners.borrow_mut().push(Listener { id, target, kind, handler });
        Ok(id)
    }

    fn unlisten(&self, id: ListenerId) {
        self.listeners.borrow_mut().retain(|l| l.id != id);
    }
}

/// Key-value theme store backed by a map.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<HashMap<String, String>>,
    failing: Cell<bool>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_entry(key: &str, value: &str) -> Self {
        let store = Self::new();
        store.entries.borrow_mut().insert(key.to_owned(), value.to_owned());
        store
    }

    /// Make every subsequent read and write fail, like blocked storage.
    pub fn set_failing(&self, failing: bool) {
        self.failing.set(failing);
    }

    #[must_use]
    pub fn raw(&self, key: &str) -> Option<String> {
        self.entries.borrow().get(key).cloned()
    }
}

impl ThemeStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, PageError> {
        if self.failing.get() {
            return Err(PageError::Missing("storage"));
        }
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), PageError> {
        if self.failing.get() {
            return Err(PageError::Missing("storage"));
        }
        self.entries.borrow_mut().insert(key.to_owned(), value.to_owned());
        Ok(())
    }
}

#[derive(Debug, Default)]
struct Clock {
    now: Duration,
    wakers: Vec<Waker>,
    pending: usize,
}

struct ManualSleep {
    deadline: Duration,
    clock: Rc<RefCell<Clock>>,
}

impl Future for ManualSleep {
    type Output = ();

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<()> {
        let mut clock = self.clock.borrow_mut();
        if clock.now >= self.deadline {
            Poll::Ready(())
        } else {
            clock.wakers.push(cx.waker().clone());
            Poll::Pending
        }
    }
}

impl Drop for ManualSleep {
    fn drop(&mut self) {
        let mut clock = self.clock.borrow_mut();
        clock.pending = clock.pending.saturating_sub(1);
    }
}

/// Single-threaded runtime with a clock that only moves when told to.
pub struct ManualRuntime {
    clock: Rc<RefCell<Clock>>,
    pool: RefCell<LocalPool>,
    spawner: LocalSpawner,
}

impl Default for ManualRuntime {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualRuntime {
    #[must_use]
    pub fn new() -> Self {
        let pool = LocalPool::new();
        let spawner = pool.spawner();
        Self { clock: Rc::new(RefCell::new(Clock::default())), pool: RefCell::new(pool), spawner }
    }

    #[must_use]
    pub fn now(&self) -> Duration {
        self.clock.borrow().now
    }

    /// Timers created but not yet fired or dropped.
    #[must_use]
    pub fn pending_timers(&self) -> usize {
        self.clock.borrow().pending
    }

    /// Move the clock forward, wake due timers, and run tasks until they stall.
    pub fn advance(&self, by: Duration) {
        let wakers = {
            let mut clock = self.clock.borrow_mut();
            clock.now += by;
            std::mem::take(&mut clock.wakers)
        };
        for waker in wakers {
            waker.wake();
        }
        self.run_until_stalled();
    }

    pub fn run_until_stalled(&self) {
        self.pool.borrow_mut().run_until_stalled();
    }
}

impl Runtime for ManualRuntime {
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()> {
        let deadline = {
            let mut clock = self.clock.borrow_mut();
            clock.pending += 1;
            clock.now + duration
        };
        Box::pin(ManualSleep { deadline, clock: Rc::clone(&self.clock) })
    }

    fn spawn(&self, task: LocalBoxFuture<'static, ()>) {
        if let Err(e) = self.spawner.spawn_local(task) {
            log::warn!("failed to spawn task: {e}");
        }
    }
}
