//! Page behaviors for a static website, compiled to WebAssembly.
//!
//! The crate attaches five independent behaviors to an already-rendered page:
//! a persisted light/dark theme toggle, a collapsible mobile menu, active-link
//! highlighting, a "back to top" button, and client-side form validation with
//! a simulated submission. Every component talks to the page through the
//! [`dom::Page`] trait, so the same code runs against the browser
//! (`web`, feature `hydrate`) and against the in-memory double in
//! `memory` used by the tests.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`dom`] | `Page` trait, events, listener subscriptions, `PageError` |
//! | [`runtime`] | Timer and task-spawning seam used by the submission delay |
//! | [`config`] | `PageConfig`: element ids, classes, messages, timings |
//! | [`consts`] | Default selectors, glyphs, and messages |
//! | [`theme`] | Theme flag, theme store, and the theme toggle component |
//! | [`menu`] | Mobile navigation toggle |
//! | [`active_link`] | Marks the nav link of the current page |
//! | [`scroll_top`] | Back-to-top button visibility and click handling |
//! | [`validation`] | Pure field validation rules |
//! | [`annotation`] | Per-field inline error rendering |
//! | [`forms`] | Form submit interception and simulated submission |
//! | [`site`] | Wires every component onto one page |
//! | `memory` | In-memory page, store, and manual-clock runtime (tests, feature `testing`) |
//! | `web` | Browser bindings and the `start` entry point (feature `hydrate`) |

pub mod active_link;
pub mod annotation;
pub mod config;
pub mod consts;
pub mod dom;
pub mod forms;
#[cfg(any(test, feature = "testing"))]
pub mod memory;
pub mod menu;
pub mod runtime;
pub mod scroll_top;
pub mod site;
pub mod theme;
pub mod validation;
#[cfg(feature = "hydrate")]
pub mod web;
