use std::cell::Cell;

use super::*;

// =============================================================
// Element tree
// =============================================================

#[test]
fn queries_follow_document_order() {
    let page = MemoryPage::new();
    let body = page.body_node();
    let first = page.append_with(body, "div", &[("class", "card wide")]);
    let nested = page.append_with(first, "span", &[("class", "wide")]);
    let second = page.append_with(body, "div", &[("class", "wide")]);

    assert_eq!(page.first_by_class("wide"), Some(first));
    assert_eq!(page.descendant_by_class(&first, "wide"), Some(nested));
    assert_eq!(page.filter_below(body, |n| n.has_class("wide")), vec![first, nested, second]);
}

#[test]
fn element_by_id_finds_nested_elements() {
    let page = MemoryPage::new();
    let wrapper = page.append(page.body_node(), "header");
    let button = page.append_with(wrapper, "button", &[("id", "theme-toggle")]);
    assert_eq!(page.element_by_id("theme-toggle"), Some(button));
    assert_eq!(page.element_by_id("missing"), None);
}

#[test]
fn nav_links_require_a_nav_ancestor() {
    let page = MemoryPage::new();
    let body = page.body_node();
    let nav = page.append(body, "nav");
    let list = page.append(nav, "ul");
    let inside = page.append_with(list, "a", &[("href", "about.html")]);
    let _outside = page.append_with(body, "a", &[("href", "about.html")]);
    assert_eq!(page.nav_links(), vec![inside]);
}

#[test]
fn class_list_add_and_remove_preserve_other_classes() {
    let page = MemoryPage::new();
    let el = page.append_with(page.body_node(), "div", &[("class", "nav-wrapper")]);
    page.add_class(&el, "show").unwrap();
    page.add_class(&el, "show").unwrap();
    assert_eq!(page.attribute(&el, "class").as_deref(), Some("nav-wrapper show"));
    page.remove_class(&el, "show").unwrap();
    assert_eq!(page.attribute(&el, "class").as_deref(), Some("nav-wrapper"));
    assert!(!page.has_class(&el, "show"));
}

#[test]
fn append_child_moves_detached_element_under_parent() {
    let page = MemoryPage::new();
    let parent = page.append(page.body_node(), "div");
    let child = page.create_element("div").unwrap();
    assert_eq!(page.parent(&child), None);
    page.append_child(&parent, &child).unwrap();
    assert_eq!(page.parent(&child), Some(parent));
    assert_eq!(page.children(parent), vec![child]);
}

#[test]
fn empty_style_value_clears_property() {
    let page = MemoryPage::new();
    let el = page.append(page.body_node(), "input");
    page.set_style(&el, "border-color", "#e74c3c").unwrap();
    assert_eq!(page.style(el, "border-color").as_deref(), Some("#e74c3c"));
    page.set_style(&el, "border-color", "").unwrap();
    assert_eq!(page.style(el, "border-color"), None);
}

// =============================================================
// Form controls
// =============================================================

#[test]
fn control_types_follow_dom_defaults() {
    let page = MemoryPage::new();
    let form = page.append(page.body_node(), "form");
    let plain = page.append(form, "input");
    let email = page.append_with(form, "input", &[("type", "EMAIL")]);
    let area = page.append(form, "textarea");
    let select = page.append(form, "select");
    let multi = page.append_with(form, "select", &[("multiple", "")]);
    assert_eq!(page.control_type(&plain), "text");
    assert_eq!(page.control_type(&email), "email");
    assert_eq!(page.control_type(&area), "textarea");
    assert_eq!(page.control_type(&select), "select-one");
    assert_eq!(page.control_type(&multi), "select-multiple");
    assert_eq!(page.form_fields(&form), vec![plain, email, area, select, multi]);
}

#[test]
fn reset_form_restores_default_values() {
    let page = MemoryPage::new();
    let form = page.append(page.body_node(), "form");
    let name = page.append_with(form, "input", &[("value", "preset")]);
    let note = page.append(form, "textarea");
    page.type_value(name, "typed");
    page.type_value(note, "hello");
    page.reset_form(&form).unwrap();
    assert_eq!(page.value(&name), "preset");
    assert_eq!(page.value(&note), "");
}

#[test]
fn submit_button_lookup_skips_plain_buttons() {
    let page = MemoryPage::new();
    let form = page.append(page.body_node(), "form");
    let _plain = page.append_with(form, "button", &[("type", "button")]);
    let submit = page.append_with(form, "button", &[("type", "submit")]);
    let _later = page.append_with(form, "button", &[("type", "submit")]);
    assert_eq!(page.submit_button(&form), Some(submit));
}

// =============================================================
// Window
// =============================================================

#[test]
fn location_splits_pathname_from_href() {
    let page = MemoryPage::at("https://example.com/pages/login.html?next=home#top");
    assert_eq!(page.pathname().unwrap(), "/pages/login.html");
    let page = MemoryPage::at("https://example.com");
    assert_eq!(page.pathname().unwrap(), "/");
}

#[test]
fn set_href_records_navigation() {
    let page = MemoryPage::at("https://example.com/login.html");
    page.set_href("index.html").unwrap();
    assert_eq!(page.href().unwrap(), "index.html");
    assert_eq!(page.navigations(), vec!["index.html".to_owned()]);
}

// =============================================================
// Events
// =============================================================

#[test]
fn dispatch_reaches_only_matching_listeners() {
    let page = MemoryPage::new();
    let a = page.append(page.body_node(), "button");
    let b = page.append(page.body_node(), "button");
    let hits = Rc::new(Cell::new(0));
    let counter = Rc::clone(&hits);
    page.listen(Target::Node(a), EventKind::Click, Rc::new(move |_: &Event| counter.set(counter.get() + 1))).unwrap();

    page.click(a);
    page.click(b);
    page.submit(a);
    assert_eq!(hits.get(), 1);
}

#[test]
fn prevent_default_is_reported_to_dispatcher() {
    let page = MemoryPage::new();
    let form = page.append(page.body_node(), "form");
    page.listen(Target::Node(form), EventKind::Submit, Rc::new(|ev: &Event| ev.prevent_default())).unwrap();
    assert!(page.submit(form));
    assert!(!page.click(form));
}

#[test]
fn unlisten_removes_handler() {
    let page = MemoryPage::new();
    let id = page.listen(Target::Window, EventKind::Scroll, Rc::new(|_: &Event| {})).unwrap();
    assert_eq!(page.listener_count(), 1);
    page.unlisten(id);
    assert_eq!(page.listener_count(), 0);
}

#[test]
fn handlers_may_mutate_the_page_during_dispatch() {
    let page = Rc::new(MemoryPage::new());
    let button = page.append(page.body_node(), "button");
    let inner = Rc::clone(&page);
    page.listen(
        Target::Node(button),
        EventKind::Click,
        Rc::new(move |_: &Event| {
            inner.set_inner_text(&button, "clicked");
            let extra = inner.create_element("span").unwrap();
            inner.append_child(&button, &extra).unwrap();
        }),
    )
    .unwrap();
    page.click(button);
    assert_eq!(page.inner_text(&button), "clicked");
    assert_eq!(page.children(button).len(), 1);
}

// =============================================================
// Store
// =============================================================

#[test]
fn failing_store_rejects_reads_and_writes() {
    let store = MemoryStore::with_entry("theme", "dark");
    assert_eq!(store.get("theme").unwrap().as_deref(), Some("dark"));
    store.set_failing(true);
    assert!(store.get("theme").is_err());
    assert!(store.set("theme", "light").is_err());
    assert_eq!(store.raw("theme").as_deref(), Some("dark"));
}

// =============================================================
// Manual runtime
// =============================================================

#[test]
fn sleep_resolves_only_after_clock_passes_deadline() {
    let runtime = ManualRuntime::new();
    let fired = Rc::new(Cell::new(false));
    let flag = Rc::clone(&fired);
    let delay = runtime.sleep(Duration::from_millis(1500));
    runtime.spawn(Box::pin(async move {
        delay.await;
        flag.set(true);
    }));
    assert_eq!(runtime.pending_timers(), 1);

    runtime.advance(Duration::from_millis(1499));
    assert!(!fired.get());
    runtime.advance(Duration::from_millis(1));
    assert!(fired.get());
    assert_eq!(runtime.pending_timers(), 0);
    assert_eq!(runtime.now(), Duration::from_millis(1500));
}

#[test]
fn dropped_sleep_is_no_longer_pending() {
    let runtime = ManualRuntime::new();
    let delay = runtime.sleep(Duration::from_secs(1));
    assert_eq!(runtime.pending_timers(), 1);
    drop(delay);
    assert_eq!(runtime.pending_timers(), 0);
}
