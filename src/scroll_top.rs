//! "Back to top" button: visible past a scroll threshold, scrolls home on click.

use std::rc::Rc;

use crate::config::PageConfig;
use crate::dom::{Event, EventKind, Page, Subscription, Target, warn_on_err};

#[cfg(test)]
#[path = "scroll_top_test.rs"]
mod scroll_top_test;

/// Whether the button should be visible at vertical offset `scroll_y`.
#[must_use]
pub fn should_show(scroll_y: f64, threshold: f64) -> bool {
    scroll_y > threshold
}

/// Recompute the button's visibility from the current scroll offset.
pub fn sync_visibility<P: Page>(page: &P, button: &P::Node, config: &PageConfig) {
    let scroll_y = match page.scroll_y() {
        Ok(y) => y,
        Err(e) => {
            log::warn!("cannot read scroll offset: {e}");
            return;
        }
    };
    let class = config.back_to_top_visible_class.as_str();
    let result = if should_show(scroll_y, config.scroll_threshold) {
        page.add_class(button, class)
    } else {
        page.remove_class(button, class)
    };
    warn_on_err(result, "sync back-to-top visibility");
}

/// Listen for window scrolls and button clicks. Inert without the button.
pub fn attach<P: Page>(page: &Rc<P>, config: &Rc<PageConfig>) -> Subscription<P> {
    let mut subscription = Subscription::new(page);
    let Some(button) = page.element_by_id(&config.back_to_top_id) else {
        return subscription;
    };

    let (page_cb, config_cb, button_cb) = (Rc::clone(page), Rc::clone(config), button.clone());
    subscription.listen(
        Target::Window,
        EventKind::Scroll,
        Rc::new(move |_: &Event| sync_visibility(page_cb.as_ref(), &button_cb, &config_cb)),
    );

    let page_cb = Rc::clone(page);
    subscription.listen(Target::Node(button), EventKind::Click, Rc::new(move |_: &Event| page_cb.scroll_to_top()));
    subscription
}
