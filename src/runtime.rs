//! Timer and task seam for the one asynchronous step on the page.
//!
//! The browser implementation sleeps with `gloo-timers` and spawns onto the
//! page's microtask queue; `memory::ManualRuntime` advances a manual
//! clock instead so tests control exactly when timers fire.

use std::time::Duration;

use futures::future::LocalBoxFuture;

pub trait Runtime: 'static {
    /// A future that resolves once `duration` has elapsed. The timer counts as
    /// scheduled from the moment this is called.
    fn sleep(&self, duration: Duration) -> LocalBoxFuture<'static, ()>;

    /// Run `task` to completion in the background.
    fn spawn(&self, task: LocalBoxFuture<'static, ()>);
}
