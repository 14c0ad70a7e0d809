//! Highlights the navigation link for the current page.
//!
//! Runs once at startup. The current page is the last segment of the document
//! path (`/blog/about.html` → `about.html`), or the home page when the path
//! ends in `/`. Links match on their literal `href` attribute only, so
//! `./about.html` or absolute URLs never match.

use crate::config::PageConfig;
use crate::dom::{Page, warn_on_err};

#[cfg(test)]
#[path = "active_link_test.rs"]
mod active_link_test;

/// Page identifier for `pathname`.
#[must_use]
pub fn current_page<'a>(pathname: &'a str, home_page: &'a str) -> &'a str {
    match pathname.rsplit('/').next() {
        Some(segment) if !segment.is_empty() => segment,
        _ => home_page,
    }
}

/// Mark every nav link pointing at the current page. Returns how many were marked.
pub fn mark<P: Page>(page: &P, config: &PageConfig) -> usize {
    let pathname = match page.pathname() {
        Ok(p) => p,
        Err(e) => {
            log::warn!("cannot read location for active link: {e}");
            return 0;
        }
    };
    let current = current_page(&pathname, &config.home_page);
    let mut marked = 0;
    for link in page.nav_links() {
        if page.attribute(&link, "href").as_deref() == Some(current) {
            warn_on_err(page.add_class(&link, &config.active_link_class), "mark active link");
            marked += 1;
        }
    }
    log::debug!("marked {marked} nav link(s) active for {current}");
    marked
}
