//! Mobile navigation toggle.

use std::rc::Rc;

use crate::config::PageConfig;
use crate::consts::{MENU_CLOSE_GLYPH, MENU_OPEN_GLYPH};
use crate::dom::{Event, EventKind, Page, Subscription, Target, warn_on_err};

#[cfg(test)]
#[path = "menu_test.rs"]
mod menu_test;

/// Flip the wrapper's shown class and sync the toggle glyph. Returns whether
/// the menu is now shown.
pub fn toggle<P: Page>(page: &P, control: &P::Node, wrapper: &P::Node, config: &PageConfig) -> bool {
    let class = config.nav_shown_class.as_str();
    let result = if page.has_class(wrapper, class) {
        page.remove_class(wrapper, class)
    } else {
        page.add_class(wrapper, class)
    };
    warn_on_err(result, "toggle menu");
    let shown = page.has_class(wrapper, class);
    page.set_inner_html(control, if shown { MENU_CLOSE_GLYPH } else { MENU_OPEN_GLYPH });
    shown
}

/// Listen for clicks on the menu toggle. Inert unless both the toggle and the
/// nav wrapper exist.
pub fn attach<P: Page>(page: &Rc<P>, config: &Rc<PageConfig>) -> Subscription<P> {
    let mut subscription = Subscription::new(page);
    let (Some(control), Some(wrapper)) =
        (page.element_by_id(&config.menu_toggle_id), page.first_by_class(&config.nav_wrapper_class))
    else {
        return subscription;
    };
    let (page_cb, config_cb, control_cb) = (Rc::clone(page), Rc::clone(config), control.clone());
    subscription.listen(
        Target::Node(control),
        EventKind::Click,
        Rc::new(move |_: &Event| {
            let shown = toggle(page_cb.as_ref(), &control_cb, &wrapper, &config_cb);
            log::debug!("menu shown: {shown}");
        }),
    );
    subscription
}
