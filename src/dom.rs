//! The page contract every component is written against.
//!
//! `Page` bundles the small slice of document, window, and event-target
//! behavior the site script needs. Browser pages implement it over `web-sys`
//! (see `web`); tests use `memory::MemoryPage`. All methods take
//! `&self` like the DOM itself, so handlers may call back into the page while
//! an event is being dispatched.
//!
//! ERROR HANDLING
//! ==============
//! Host failures surface as [`PageError`]. Components never propagate them
//! past an event handler: [`warn_on_err`] logs and the handler carries on.

use std::cell::Cell;
use std::rc::Rc;

#[cfg(test)]
#[path = "dom_test.rs"]
mod dom_test;

/// A DOM, window, or storage operation failed in the host.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageError {
    /// The host rejected the operation.
    #[error("{op} failed: {message}")]
    Dom { op: &'static str, message: String },
    /// A host object the operation depends on is unavailable.
    #[error("{0} is unavailable")]
    Missing(&'static str),
}

impl PageError {
    pub fn dom(op: &'static str, message: impl Into<String>) -> Self {
        Self::Dom { op, message: message.into() }
    }
}

/// Log a swallowed host failure.
pub fn warn_on_err(result: Result<(), PageError>, context: &str) {
    if let Err(e) = result {
        log::warn!("{context}: {e}");
    }
}

/// The events the site script listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Click,
    Scroll,
    Submit,
}

impl EventKind {
    /// DOM event type name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Click => "click",
            Self::Scroll => "scroll",
            Self::Submit => "submit",
        }
    }
}

/// Where a listener is installed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Target<N> {
    Window,
    Node(N),
}

/// Event passed to handlers. Hosts forward `prevent_default` to the native
/// event after the handler returns.
#[derive(Debug)]
pub struct Event {
    kind: EventKind,
    default_prevented: Cell<bool>,
}

impl Event {
    #[must_use]
    pub fn new(kind: EventKind) -> Self {
        Self { kind, default_prevented: Cell::new(false) }
    }

    #[must_use]
    pub fn kind(&self) -> EventKind {
        self.kind
    }

    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    #[must_use]
    pub fn default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

pub type Handler = Rc<dyn Fn(&Event)>;

/// Identifies one installed listener on one page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(pub u64);

/// Document, window, and event-target operations used by the components.
///
/// Element queries mirror the selectors the site markup is written for; the
/// comment on each names the CSS selector it stands in for.
pub trait Page: 'static {
    /// Element handle. Equality is element identity.
    type Node: Clone + PartialEq + 'static;

    // --- Queries ---

    /// `#id`
    fn element_by_id(&self, id: &str) -> Option<Self::Node>;
    /// `.class`, first match in document order.
    fn first_by_class(&self, class: &str) -> Option<Self::Node>;
    /// `document.body`
    fn body(&self) -> Option<Self::Node>;
    /// `nav a`
    fn nav_links(&self) -> Vec<Self::Node>;
    /// `form`
    fn forms(&self) -> Vec<Self::Node>;
    /// `input, textarea, select` below `form`.
    fn form_fields(&self, form: &Self::Node) -> Vec<Self::Node>;
    /// `button[type="submit"]` below `form`.
    fn submit_button(&self, form: &Self::Node) -> Option<Self::Node>;
    /// `.class` below `node`.
    fn descendant_by_class(&self, node: &Self::Node, class: &str) -> Option<Self::Node>;
    /// `tag` below `node`.
    fn descendant_by_tag(&self, node: &Self::Node, tag: &str) -> Option<Self::Node>;
    fn parent(&self, node: &Self::Node) -> Option<Self::Node>;

    // --- Element state ---

    fn attribute(&self, node: &Self::Node, name: &str) -> Option<String>;
    fn has_attribute(&self, node: &Self::Node, name: &str) -> bool;
    fn set_attribute(&self, node: &Self::Node, name: &str, value: &str) -> Result<(), PageError>;
    fn has_class(&self, node: &Self::Node, class: &str) -> bool;
    fn add_class(&self, node: &Self::Node, class: &str) -> Result<(), PageError>;
    fn remove_class(&self, node: &Self::Node, class: &str) -> Result<(), PageError>;
    fn set_inner_html(&self, node: &Self::Node, html: &str);
    fn inner_text(&self, node: &Self::Node) -> String;
    fn set_inner_text(&self, node: &Self::Node, text: &str);
    fn set_text_content(&self, node: &Self::Node, text: &str);
    /// Inline style property; an empty value clears it.
    fn set_style(&self, node: &Self::Node, property: &str, value: &str) -> Result<(), PageError>;
    fn create_element(&self, tag: &str) -> Result<Self::Node, PageError>;
    fn append_child(&self, parent: &Self::Node, child: &Self::Node) -> Result<(), PageError>;

    // --- Form controls ---

    /// Control type as the DOM reports it: `text`, `email`, `password`,
    /// `textarea`, `select-one`, ... Empty for non-controls.
    fn control_type(&self, node: &Self::Node) -> String;
    fn value(&self, node: &Self::Node) -> String;
    fn set_disabled(&self, node: &Self::Node, disabled: bool) -> Result<(), PageError>;
    fn is_disabled(&self, node: &Self::Node) -> bool;
    /// Restore every control of `form` to its default value.
    fn reset_form(&self, form: &Self::Node) -> Result<(), PageError>;

    // --- Window ---

    fn pathname(&self) -> Result<String, PageError>;
    fn href(&self) -> Result<String, PageError>;
    fn set_href(&self, href: &str) -> Result<(), PageError>;
    fn scroll_y(&self) -> Result<f64, PageError>;
    /// Smooth-scroll the document to the top.
    fn scroll_to_top(&self);
    fn alert(&self, message: &str) -> Result<(), PageError>;

    // --- Events ---

    fn listen(&self, target: Target<Self::Node>, kind: EventKind, handler: Handler) -> Result<ListenerId, PageError>;
    fn unlisten(&self, id: ListenerId);
}

/// Listeners installed by one component. Dropping the subscription leaves
/// them in place; call [`Subscription::dispose`] to remove them.
#[must_use = "listeners stay installed; keep the subscription to dispose them"]
pub struct Subscription<P: Page> {
    page: Rc<P>,
    listeners: Vec<ListenerId>,
}

impl<P: Page> Subscription<P> {
    pub fn new(page: &Rc<P>) -> Self {
        Self { page: Rc::clone(page), listeners: Vec::new() }
    }

    /// Install `handler` and track it. Failures are logged and skipped.
    pub fn listen(&mut self, target: Target<P::Node>, kind: EventKind, handler: Handler) {
        match self.page.listen(target, kind, handler) {
            Ok(id) => self.listeners.push(id),
            Err(e) => log::warn!("failed to install {} listener: {e}", kind.as_str()),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Remove every tracked listener.
    pub fn dispose(self) {
        for id in self.listeners {
            self.page.unlisten(id);
        }
    }
}
