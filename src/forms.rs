//! Form submit interception, inline validation, and simulated submission.
//!
//! Every `form` on the page gets a submit listener that:
//!
//! 1. prevents the native submission,
//! 2. clears and re-validates each `input`, `textarea`, and `select` in
//!    document order, rendering at most one message per field,
//! 3. stops there if any field failed, and otherwise
//! 4. disables the submit button, relabels it, and spawns
//!    [`simulate_submission`], which waits out the configured delay, confirms,
//!    resets the form, restores the button, and sends login/signup pages home.
//!
//! CONCURRENCY
//! ===========
//! One simulated submission per form at a time. While it is pending the
//! button is disabled and further submit events on that form are swallowed.
//! The pending delay is wrapped in [`futures::future::abortable`]; the abort
//! handle is the cancellation token behind [`FormsHandle::cancel_pending`].

use std::cell::RefCell;
use std::rc::Rc;

use futures::future::{AbortHandle, Abortable, Aborted, LocalBoxFuture, abortable};

use crate::annotation;
use crate::config::PageConfig;
use crate::dom::{Event, EventKind, Page, Subscription, Target, warn_on_err};
use crate::runtime::Runtime;
use crate::validation::{FieldInput, FieldKind, FormReport, validate_form};

#[cfg(test)]
#[path = "forms_test.rs"]
mod forms_test;

/// What one submit event led to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitAttempt {
    /// At least one field failed; errors are shown.
    Blocked(FormReport),
    /// All fields passed and the simulated submission is pending.
    Started,
    /// A simulated submission for this form was already pending.
    Ignored,
}

/// How a simulated submission ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The delay elapsed and the form was reset. `redirected_to` is the
    /// address navigated to afterwards, if any.
    Submitted { redirected_to: Option<String> },
    /// Aborted before the delay elapsed; the form keeps its values.
    Cancelled,
}

/// Per-form submission state.
pub struct FormState<P: Page> {
    form: P::Node,
    pending: RefCell<Option<AbortHandle>>,
}

impl<P: Page> FormState<P> {
    fn new(form: P::Node) -> Self {
        Self { form, pending: RefCell::new(None) }
    }

    pub fn form(&self) -> &P::Node {
        &self.form
    }

    pub fn is_in_flight(&self) -> bool {
        self.pending.borrow().is_some()
    }

    /// Abort the pending submission. False if none is pending or it was
    /// already aborted.
    fn cancel(&self) -> bool {
        match self.pending.borrow().as_ref() {
            Some(handle) if !handle.is_aborted() => {
                handle.abort();
                true
            }
            _ => false,
        }
    }

    fn finish(&self) {
        self.pending.borrow_mut().take();
    }
}

/// Submit listeners for every form on the page.
#[must_use = "listeners stay installed; keep the handle to dispose them"]
pub struct FormsHandle<P: Page> {
    subscription: Subscription<P>,
    forms: Vec<Rc<FormState<P>>>,
}

impl<P: Page> FormsHandle<P> {
    pub fn forms(&self) -> &[Rc<FormState<P>>] {
        &self.forms
    }

    /// Number of forms with a simulated submission pending.
    pub fn in_flight(&self) -> usize {
        self.forms.iter().filter(|f| f.is_in_flight()).count()
    }

    /// Abort every pending simulated submission. The aborted tasks restore
    /// their submit buttons the next time the runtime polls them. Returns how
    /// many were aborted.
    pub fn cancel_pending(&self) -> usize {
        self.forms.iter().filter(|f| f.cancel()).count()
    }

    /// Remove the submit listeners. Pending submissions still complete.
    pub fn dispose(self) {
        self.subscription.dispose();
    }
}

fn field_input<P: Page>(page: &P, field: &P::Node, config: &PageConfig) -> FieldInput {
    FieldInput {
        required: page.has_attribute(field, "required"),
        kind: FieldKind::from_control_type(&page.control_type(field)),
        value: page.value(field),
        is_confirm: page.attribute(field, "id").is_some_and(|id| id == config.confirm_password_id),
    }
}

/// Clear and re-validate every field of `form`, rendering errors inline.
pub fn validate<P: Page>(page: &P, form: &P::Node, config: &PageConfig) -> FormReport {
    let fields = page.form_fields(form);
    let inputs: Vec<FieldInput> = fields
        .iter()
        .map(|field| {
            annotation::clear_error(page, field, config);
            field_input(page, field, config)
        })
        .collect();
    let report = validate_form(&inputs);
    for (index, error) in &report.errors {
        if let Some(field) = fields.get(*index) {
            annotation::show_error(page, field, &error.to_string(), config);
        }
    }
    report
}

fn handle_submit<P: Page, R: Runtime>(
    page: &Rc<P>,
    runtime: &Rc<R>,
    config: &Rc<PageConfig>,
    state: &Rc<FormState<P>>,
    event: &Event,
) -> SubmitAttempt {
    event.prevent_default();
    if state.is_in_flight() {
        return SubmitAttempt::Ignored;
    }

    let report = validate(page.as_ref(), &state.form, config);
    if !report.is_valid() {
        return SubmitAttempt::Blocked(report);
    }

    let button = page.submit_button(&state.form);
    let original_label = button.as_ref().map(|b| page.inner_text(b)).unwrap_or_default();
    if let Some(button) = &button {
        page.set_inner_text(button, &config.submitting_label);
        warn_on_err(page.set_disabled(button, true), "disable submit button");
    }

    let (delay, handle) = abortable(runtime.sleep(config.submit_delay()));
    *state.pending.borrow_mut() = Some(handle);

    let task = simulate_submission(Rc::clone(page), Rc::clone(config), Rc::clone(state), button, original_label, delay);
    runtime.spawn(Box::pin(async move {
        let outcome = task.await;
        log::debug!("simulated submission finished: {outcome:?}");
    }));
    SubmitAttempt::Started
}

fn restore_button<P: Page>(page: &P, button: Option<&P::Node>, label: &str) {
    if let Some(button) = button {
        page.set_inner_text(button, label);
        warn_on_err(page.set_disabled(button, false), "re-enable submit button");
    }
}

/// Wait out `delay`, then confirm, reset the form, restore the button, and
/// redirect login/signup pages home. An aborted delay only restores the button.
pub async fn simulate_submission<P: Page>(
    page: Rc<P>,
    config: Rc<PageConfig>,
    state: Rc<FormState<P>>,
    button: Option<P::Node>,
    original_label: String,
    delay: Abortable<LocalBoxFuture<'static, ()>>,
) -> SubmissionOutcome {
    if let Err(Aborted) = delay.await {
        restore_button(page.as_ref(), button.as_ref(), &original_label);
        state.finish();
        return SubmissionOutcome::Cancelled;
    }

    warn_on_err(page.alert(&config.confirmation_message), "show confirmation");
    warn_on_err(page.reset_form(&state.form), "reset form");
    restore_button(page.as_ref(), button.as_ref(), &original_label);
    state.finish();

    let redirected_to = match page.href() {
        Ok(href) if config.redirects_after_submit(&href) => {
            warn_on_err(page.set_href(&config.home_page), "redirect home");
            Some(config.home_page.clone())
        }
        Ok(_) => None,
        Err(e) => {
            log::warn!("cannot read location after submission: {e}");
            None
        }
    };
    SubmissionOutcome::Submitted { redirected_to }
}

/// Install a submit listener on every form currently on the page.
pub fn attach<P: Page, R: Runtime>(page: &Rc<P>, runtime: &Rc<R>, config: &Rc<PageConfig>) -> FormsHandle<P> {
    let mut subscription = Subscription::new(page);
    let mut forms = Vec::new();
    for form in page.forms() {
        let state = Rc::new(FormState::new(form.clone()));
        let (page_cb, runtime_cb, config_cb, state_cb) =
            (Rc::clone(page), Rc::clone(runtime), Rc::clone(config), Rc::clone(&state));
        subscription.listen(
            Target::Node(form),
            EventKind::Submit,
            Rc::new(move |event: &Event| match handle_submit(&page_cb, &runtime_cb, &config_cb, &state_cb, event) {
                SubmitAttempt::Blocked(report) => log::debug!("submission blocked by {} invalid field(s)", report.errors.len()),
                SubmitAttempt::Started => log::debug!("simulated submission started"),
                SubmitAttempt::Ignored => log::debug!("submission already pending; ignoring submit"),
            }),
        );
        forms.push(state);
    }
    FormsHandle { subscription, forms }
}
