//! Page configuration: element hooks, messages, and timings.
//!
//! Every field defaults to the markup conventions in [`crate::consts`], so an
//! empty JSON object (or no configuration at all) targets the stock site.
//! Hosts override individual fields by passing partial JSON to `start`.

use std::str::FromStr;
use std::time::Duration;

use log::LevelFilter;
use serde::Deserialize;

use crate::consts;

#[cfg(test)]
#[path = "config_test.rs"]
mod config_test;

/// Error returned by [`PageConfig::from_json`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid page config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid log level: {0}")]
    InvalidLogLevel(String),
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub theme_toggle_id: String,
    pub theme_storage_key: String,
    pub theme_attribute: String,
    pub menu_toggle_id: String,
    pub nav_wrapper_class: String,
    pub nav_shown_class: String,
    pub active_link_class: String,
    pub home_page: String,
    pub back_to_top_id: String,
    pub back_to_top_visible_class: String,
    pub scroll_threshold: f64,
    pub confirm_password_id: String,
    pub error_class: String,
    pub error_border_color: String,
    pub submitting_label: String,
    pub confirmation_message: String,
    pub submit_delay_ms: u64,
    /// Address fragments that redirect to `home_page` after a submission.
    pub redirect_contexts: Vec<String>,
    pub log_level: String,
}

impl Default for PageConfig {
    fn default() -> Self {
        Self {
            theme_toggle_id: consts::THEME_TOGGLE_ID.to_owned(),
            theme_storage_key: consts::THEME_STORAGE_KEY.to_owned(),
            theme_attribute: consts::THEME_ATTRIBUTE.to_owned(),
            menu_toggle_id: consts::MENU_TOGGLE_ID.to_owned(),
            nav_wrapper_class: consts::NAV_WRAPPER_CLASS.to_owned(),
            nav_shown_class: consts::SHOW_CLASS.to_owned(),
            active_link_class: consts::ACTIVE_LINK_CLASS.to_owned(),
            home_page: consts::HOME_PAGE.to_owned(),
            back_to_top_id: consts::BACK_TO_TOP_ID.to_owned(),
            back_to_top_visible_class: consts::SHOW_CLASS.to_owned(),
            scroll_threshold: consts::SCROLL_THRESHOLD_PX,
            confirm_password_id: consts::CONFIRM_PASSWORD_ID.to_owned(),
            error_class: consts::ERROR_CLASS.to_owned(),
            error_border_color: consts::ERROR_BORDER_COLOR.to_owned(),
            submitting_label: consts::SUBMITTING_LABEL.to_owned(),
            confirmation_message: consts::CONFIRMATION_MESSAGE.to_owned(),
            submit_delay_ms: consts::SUBMIT_DELAY_MS,
            redirect_contexts: consts::REDIRECT_CONTEXTS.iter().map(|s| (*s).to_owned()).collect(),
            log_level: "info".to_owned(),
        }
    }
}

impl PageConfig {
    /// Parse a (possibly partial) JSON object over the defaults.
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(raw)?;
        config.log_level_filter()?;
        Ok(config)
    }

    pub fn log_level_filter(&self) -> Result<LevelFilter, ConfigError> {
        LevelFilter::from_str(self.log_level.trim()).map_err(|_| ConfigError::InvalidLogLevel(self.log_level.clone()))
    }

    #[must_use]
    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(self.submit_delay_ms)
    }

    /// Whether a successful submission from `href` should send the user home.
    #[must_use]
    pub fn redirects_after_submit(&self, href: &str) -> bool {
        self.redirect_contexts.iter().any(|ctx| !ctx.is_empty() && href.contains(ctx.as_str()))
    }
}
