//! Wires every page behavior onto one page.
//!
//! Components are independent: each one looks up its own elements, installs
//! its own listeners, and degrades to a no-op when its markup is missing.

use std::rc::Rc;

use crate::active_link;
use crate::config::PageConfig;
use crate::dom::{Page, Subscription};
use crate::forms::{self, FormsHandle};
use crate::menu;
use crate::runtime::Runtime;
use crate::scroll_top;
use crate::theme::{self, ThemeStore};

#[cfg(test)]
#[path = "site_test.rs"]
mod site_test;

/// Everything installed on a page by [`Site::attach`].
#[must_use = "listeners stay installed; keep the site to dispose them"]
pub struct Site<P: Page> {
    pub theme: Subscription<P>,
    pub menu: Subscription<P>,
    pub scroll_top: Subscription<P>,
    pub forms: FormsHandle<P>,
    /// Nav links marked active at startup.
    pub active_links: usize,
}

impl<P: Page> Site<P> {
    /// Run every component's startup step and install its listeners.
    pub fn attach<S: ThemeStore, R: Runtime>(page: &Rc<P>, store: &Rc<S>, runtime: &Rc<R>, config: &Rc<PageConfig>) -> Self {
        let site = Self {
            theme: theme::attach(page, store, config),
            menu: menu::attach(page, config),
            active_links: active_link::mark(page.as_ref(), config),
            scroll_top: scroll_top::attach(page, config),
            forms: forms::attach(page, runtime, config),
        };
        log::info!(
            "page behaviors attached: theme={} menu={} scroll_top={} forms={} active_links={}",
            !site.theme.is_empty(),
            !site.menu.is_empty(),
            !site.scroll_top.is_empty(),
            site.forms.forms().len(),
            site.active_links,
        );
        site
    }

    /// Remove every listener the site installed.
    pub fn dispose(self) {
        self.theme.dispose();
        self.menu.dispose();
        self.scroll_top.dispose();
        self.forms.dispose();
    }
}
