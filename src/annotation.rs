//! Inline error messages next to form fields.
//!
//! A field's message lives in one `.error-message` element under the field's
//! parent. It is created on the first error, then only re-texted, shown, and
//! hidden; it is never removed.

use crate::config::PageConfig;
use crate::dom::{Page, PageError, warn_on_err};

#[cfg(test)]
#[path = "annotation_test.rs"]
mod annotation_test;

fn find_annotation<P: Page>(page: &P, field: &P::Node, config: &PageConfig) -> Option<P::Node> {
    let container = page.parent(field)?;
    page.descendant_by_class(&container, &config.error_class)
}

fn find_or_create_annotation<P: Page>(page: &P, field: &P::Node, config: &PageConfig) -> Result<P::Node, PageError> {
    let container = page.parent(field).ok_or(PageError::Missing("field container"))?;
    if let Some(existing) = page.descendant_by_class(&container, &config.error_class) {
        return Ok(existing);
    }
    let annotation = page.create_element("div")?;
    page.set_attribute(&annotation, "class", &config.error_class)?;
    page.append_child(&container, &annotation)?;
    Ok(annotation)
}

/// Flag `field` and show `message` beside it.
pub fn show_error<P: Page>(page: &P, field: &P::Node, message: &str, config: &PageConfig) {
    warn_on_err(page.set_style(field, "border-color", &config.error_border_color), "flag field");
    match find_or_create_annotation(page, field, config) {
        Ok(annotation) => {
            page.set_text_content(&annotation, message);
            warn_on_err(page.set_style(&annotation, "display", "block"), "show error message");
        }
        Err(e) => log::warn!("cannot show error message: {e}"),
    }
}

/// Remove the field's flag and hide its message, if it has one.
pub fn clear_error<P: Page>(page: &P, field: &P::Node, config: &PageConfig) {
    warn_on_err(page.set_style(field, "border-color", ""), "unflag field");
    if let Some(annotation) = find_annotation(page, field, config) {
        warn_on_err(page.set_style(&annotation, "display", "none"), "hide error message");
    }
}
