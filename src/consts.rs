//! Shared defaults for the page behaviors.

// ── Theme ───────────────────────────────────────────────────────

/// Storage key holding the persisted theme flag.
pub const THEME_STORAGE_KEY: &str = "theme";

/// Attribute on `<body>` that carries the applied theme.
pub const THEME_ATTRIBUTE: &str = "data-theme";

/// Id of the theme toggle control.
pub const THEME_TOGGLE_ID: &str = "theme-toggle";

/// Sun icon, shown while dark mode is active (click switches to light).
pub const SUN_ICON_SVG: &str = concat!(
    r#"<circle cx="12" cy="12" r="5"></circle>"#,
    r#"<line x1="12" y1="1" x2="12" y2="3"></line>"#,
    r#"<line x1="12" y1="21" x2="12" y2="23"></line>"#,
    r#"<line x1="4.22" y1="4.22" x2="5.64" y2="5.64"></line>"#,
    r#"<line x1="18.36" y1="18.36" x2="19.78" y2="19.78"></line>"#,
    r#"<line x1="1" y1="12" x2="3" y2="12"></line>"#,
    r#"<line x1="21" y1="12" x2="23" y2="12"></line>"#,
    r#"<line x1="4.22" y1="19.78" x2="5.64" y2="18.36"></line>"#,
    r#"<line x1="18.36" y1="5.64" x2="19.78" y2="4.22"></line>"#,
);

/// Moon icon, shown while light mode is active (click switches to dark).
pub const MOON_ICON_SVG: &str = r#"<path d="M21 12.79A9 9 0 1 1 11.21 3 7 7 0 0 0 21 12.79z"></path>"#;

// ── Navigation ──────────────────────────────────────────────────

pub const MENU_TOGGLE_ID: &str = "menu-toggle";
pub const NAV_WRAPPER_CLASS: &str = "nav-wrapper";

/// Class that reveals the nav wrapper and the back-to-top button.
pub const SHOW_CLASS: &str = "show";

/// Menu toggle markup while the menu is hidden.
pub const MENU_OPEN_GLYPH: &str = "&#9776;";

/// Menu toggle markup while the menu is shown.
pub const MENU_CLOSE_GLYPH: &str = "&times;";

pub const ACTIVE_LINK_CLASS: &str = "active";

/// Page identifier used when the document path has no last segment.
pub const HOME_PAGE: &str = "index.html";

// ── Back to top ─────────────────────────────────────────────────

pub const BACK_TO_TOP_ID: &str = "back-to-top";

/// Vertical scroll offset, in CSS pixels, above which the button is shown.
pub const SCROLL_THRESHOLD_PX: f64 = 300.0;

// ── Forms ───────────────────────────────────────────────────────

pub const CONFIRM_PASSWORD_ID: &str = "confirm-password";
pub const ERROR_CLASS: &str = "error-message";
pub const ERROR_BORDER_COLOR: &str = "#e74c3c";
pub const SUBMITTING_LABEL: &str = "Sending…";
pub const CONFIRMATION_MESSAGE: &str = "Form submitted successfully! (This is a demo)";

/// Delay of the simulated submission, in milliseconds.
pub const SUBMIT_DELAY_MS: u64 = 1500;

/// Address fragments that send the user home after a successful submission.
pub const REDIRECT_CONTEXTS: [&str; 2] = ["login", "signup"];

/// Minimum password length, in characters.
pub const MIN_PASSWORD_CHARS: usize = 8;
