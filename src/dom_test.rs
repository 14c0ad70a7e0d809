use super::*;
use crate::memory::MemoryPage;

#[test]
fn event_kinds_use_dom_type_names() {
    assert_eq!(EventKind::Click.as_str(), "click");
    assert_eq!(EventKind::Scroll.as_str(), "scroll");
    assert_eq!(EventKind::Submit.as_str(), "submit");
}

#[test]
fn events_start_with_default_allowed() {
    let event = Event::new(EventKind::Submit);
    assert_eq!(event.kind(), EventKind::Submit);
    assert!(!event.default_prevented());
    event.prevent_default();
    assert!(event.default_prevented());
}

#[test]
fn page_error_messages_name_the_operation() {
    assert_eq!(PageError::dom("appendChild", "boom").to_string(), "appendChild failed: boom");
    assert_eq!(PageError::Missing("localStorage").to_string(), "localStorage is unavailable");
}

#[test]
fn subscription_tracks_and_disposes_listeners() {
    let page = Rc::new(MemoryPage::new());
    let button = page.append(page.body_node(), "button");
    let mut sub = Subscription::new(&page);
    sub.listen(Target::Node(button), EventKind::Click, Rc::new(|_: &Event| {}));
    sub.listen(Target::Window, EventKind::Scroll, Rc::new(|_: &Event| {}));
    assert_eq!(sub.len(), 2);
    assert_eq!(page.listener_count(), 2);

    sub.dispose();
    assert_eq!(page.listener_count(), 0);
}

#[test]
fn subscription_skips_listeners_the_page_rejects() {
    let page = Rc::new(MemoryPage::new());
    let detached = {
        let other = MemoryPage::new();
        let mut last = other.body_node();
        for _ in 0..8 {
            last = other.append(last, "div");
        }
        last
    };
    let mut sub = Subscription::new(&page);
    sub.listen(Target::Node(detached), EventKind::Click, Rc::new(|_: &Event| {}));
    assert!(sub.is_empty());
}
