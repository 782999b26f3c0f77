//! Trait seams for the authenticated portal session.
//!
//! The portal requires a scripted browser login before its alert page can
//! be rendered, so the scheduler only ever talks to these traits; the
//! binary supplies a headless-browser implementation, tests supply fakes.
//! One session is acquired per cycle and must be closed by the scheduler
//! in every path, including failures partway through the check.

use crate::errors::MonitorError;
use async_trait::async_trait;

/// An established (or establishable) authenticated browser session.
#[async_trait]
pub trait PortalSession: Send {
    /// Drives the login form. `Ok(true)` once the portal has redirected
    /// away from the login page; `Ok(false)` when the login did not take
    /// (bad credentials, no redirect within the bounded wait).
    async fn login(&mut self) -> Result<bool, MonitorError>;

    /// Navigates to `url` and returns the rendered HTML once the page's
    /// alert elements have loaded. Requires a prior successful login.
    async fn rendered_html(&mut self, url: &str) -> Result<String, MonitorError>;

    /// Tears the session down, releasing the underlying browser process.
    /// Called exactly once per cycle regardless of check outcome.
    async fn close(&mut self) -> Result<(), MonitorError>;
}

/// Produces one fresh [`PortalSession`] per polling cycle.
#[async_trait]
pub trait SessionFactory: Send + Sync {
    async fn open(&self) -> Result<Box<dyn PortalSession>, MonitorError>;
}
