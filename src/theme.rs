//! Persisted light/dark theme and its toggle control.
//!
//! At startup the stored flag (if any) is applied as `data-theme` on
//! `<body>` and the toggle's `<svg>` gets the matching icon: a sun while dark
//! is active, a moon while light is active. Each click inverts the applied
//! theme, stores it, and swaps the icon. With nothing stored the page keeps
//! its default styling until the first click, which switches to dark.

use std::fmt;
use std::rc::Rc;
use std::str::FromStr;

use crate::config::PageConfig;
use crate::consts::{MOON_ICON_SVG, SUN_ICON_SVG};
use crate::dom::{Event, EventKind, Page, PageError, Subscription, Target, warn_on_err};

#[cfg(test)]
#[path = "theme_test.rs"]
mod theme_test;

/// Origin-scoped key-value storage for the theme flag.
pub trait ThemeStore: 'static {
    fn get(&self, key: &str) -> Result<Option<String>, PageError>;
    fn set(&self, key: &str, value: &str) -> Result<(), PageError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown theme: {0:?}")]
pub struct ThemeFlagError(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeFlag {
    #[default]
    Light,
    Dark,
}

impl ThemeFlag {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    #[must_use]
    pub fn inverted(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Icon markup for the toggle while this theme is applied.
    #[must_use]
    pub fn icon(self) -> &'static str {
        match self {
            Self::Dark => SUN_ICON_SVG,
            Self::Light => MOON_ICON_SVG,
        }
    }
}

impl fmt::Display for ThemeFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ThemeFlag {
    type Err = ThemeFlagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "light" => Ok(Self::Light),
            "dark" => Ok(Self::Dark),
            other => Err(ThemeFlagError(other.to_owned())),
        }
    }
}

/// Read the stored flag. Unknown values and storage failures count as unset.
pub fn load_preference<S: ThemeStore>(store: &S, key: &str) -> Option<ThemeFlag> {
    let raw = match store.get(key) {
        Ok(raw) => raw?,
        Err(e) => {
            log::warn!("theme preference unreadable: {e}");
            return None;
        }
    };
    match raw.parse() {
        Ok(flag) => Some(flag),
        Err(e) => {
            log::warn!("ignoring stored theme: {e}");
            None
        }
    }
}

/// The theme currently applied to `<body>`. A missing attribute reads as light.
pub fn applied_theme<P: Page>(page: &P, config: &PageConfig) -> ThemeFlag {
    let dark = page
        .body()
        .and_then(|body| page.attribute(&body, &config.theme_attribute))
        .is_some_and(|value| value == ThemeFlag::Dark.as_str());
    if dark { ThemeFlag::Dark } else { ThemeFlag::Light }
}

fn apply<P: Page>(page: &P, config: &PageConfig, flag: ThemeFlag) {
    let Some(body) = page.body() else {
        log::warn!("no <body> to apply theme to");
        return;
    };
    warn_on_err(page.set_attribute(&body, &config.theme_attribute, flag.as_str()), "apply theme");
}

fn render_icon<P: Page>(page: &P, toggle: Option<&P::Node>, flag: ThemeFlag) {
    let Some(icon) = toggle.and_then(|t| page.descendant_by_tag(t, "svg")) else {
        return;
    };
    page.set_inner_html(&icon, flag.icon());
}

/// Invert the applied theme, persist it, and re-render the icon.
pub fn toggle<P: Page, S: ThemeStore>(page: &P, store: &S, config: &PageConfig) -> ThemeFlag {
    let next = applied_theme(page, config).inverted();
    apply(page, config, next);
    warn_on_err(store.set(&config.theme_storage_key, next.as_str()), "persist theme");
    render_icon(page, page.element_by_id(&config.theme_toggle_id).as_ref(), next);
    log::debug!("theme toggled to {next}");
    next
}

/// Apply the stored theme and listen for toggle clicks.
///
/// The stored theme is applied even when the page has no toggle control; the
/// returned subscription is then empty.
pub fn attach<P: Page, S: ThemeStore>(page: &Rc<P>, store: &Rc<S>, config: &Rc<PageConfig>) -> Subscription<P> {
    let control = page.element_by_id(&config.theme_toggle_id);
    if let Some(flag) = load_preference(store.as_ref(), &config.theme_storage_key) {
        apply(page.as_ref(), config, flag);
        render_icon(page.as_ref(), control.as_ref(), flag);
        log::debug!("applied stored theme {flag}");
    }

    let mut subscription = Subscription::new(page);
    let Some(control) = control else {
        return subscription;
    };
    let (page_cb, store_cb, config_cb) = (Rc::clone(page), Rc::clone(store), Rc::clone(config));
    subscription.listen(
        Target::Node(control),
        EventKind::Click,
        Rc::new(move |_: &Event| {
            toggle(page_cb.as_ref(), store_cb.as_ref(), &config_cb);
        }),
    );
    subscription
}
