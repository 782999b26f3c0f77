//! The polling loop.
//!
//! [`Monitor`] owns the per-target state and drives both check routines on
//! their fixed cadences: the portal check inside a scoped browser session,
//! then the course-page check. A failure in either target is logged and
//! contained; nothing short of the shutdown signal ends the loop.

use crate::config::MonitorConfig;
use crate::detect::{detect_alert_change, detect_timestamp_change, Notifier};
use crate::errors::MonitorError;
use crate::extract::{extract_timestamp, AlertStatus};
use crate::fetch::PageFetcher;
use crate::session::{PortalSession, SessionFactory};
use crate::state::StateStore;
use futures::FutureExt;
use log::{debug, error, info};
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::time::Duration;
use tokio::time::{sleep, Instant};

/// Idle granularity of the loop between due-time checks.
const TICK: Duration = Duration::from_secs(1);

/// Fixed cooldown after an unexpected error escapes a cycle, so a
/// persistent failure cannot spin the loop.
const ERROR_COOLDOWN: Duration = Duration::from_secs(60);

/// Alert count assumed at startup. Deliberately not loaded from disk: the
/// portal fingerprint resets on every process start.
pub const INITIAL_ALERT_COUNT: u8 = 3;

/// Last known fingerprint per target, owned by the scheduler and mutated
/// only by the single polling task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorState {
    /// Last course-page timestamp, seeded from the state store at startup.
    pub last_timestamp: Option<String>,
    /// Last portal alert count, seeded with [`INITIAL_ALERT_COUNT`].
    pub last_alert_count: u8,
}

impl MonitorState {
    pub fn new(last_timestamp: Option<String>) -> Self {
        Self {
            last_timestamp,
            last_alert_count: INITIAL_ALERT_COUNT,
        }
    }
}

/// The long-lived monitor: configuration, state, and the collaborators
/// behind their trait seams.
pub struct Monitor {
    config: MonitorConfig,
    state: MonitorState,
    store: StateStore,
    fetcher: Box<dyn PageFetcher>,
    sessions: Box<dyn SessionFactory>,
    notifier: Box<dyn Notifier>,
    portal_due: Instant,
    catedra_due: Instant,
}

impl Monitor {
    /// Builds a monitor, seeding the last known timestamp from the state
    /// store. Both targets come due immediately at startup.
    pub fn new(
        config: MonitorConfig,
        fetcher: Box<dyn PageFetcher>,
        sessions: Box<dyn SessionFactory>,
        notifier: Box<dyn Notifier>,
    ) -> Self {
        let store = StateStore::new(&config.state_file);
        let last_timestamp = store.load();
        info!(
            "starting monitor, last known catedra timestamp: {}",
            last_timestamp.as_deref().unwrap_or("none")
        );

        let now = Instant::now();
        Self {
            config,
            state: MonitorState::new(last_timestamp),
            store,
            fetcher,
            sessions,
            notifier,
            portal_due: now,
            catedra_due: now,
        }
    }

    /// Read access to the per-target state, mainly for assertions in
    /// integration tests.
    pub fn state(&self) -> &MonitorState {
        &self.state
    }

    /// Runs the loop until `shutdown` resolves.
    pub async fn run(&mut self, shutdown: impl Future<Output = ()>) {
        tokio::pin!(shutdown);

        loop {
            let cycle = AssertUnwindSafe(self.run_due_checks()).catch_unwind();
            if let Err(panic) = cycle.await {
                error!("unexpected error in monitor cycle: {}", panic_text(&panic));
                tokio::select! {
                    _ = &mut shutdown => {
                        info!("monitor stopped by the user");
                        return;
                    }
                    _ = sleep(ERROR_COOLDOWN) => {}
                }
            }

            tokio::select! {
                _ = &mut shutdown => {
                    info!("monitor stopped by the user");
                    return;
                }
                _ = sleep(TICK) => {}
            }
        }
    }

    /// One pass over both targets, running whichever checks are due. The
    /// portal check (with its scoped session) always runs first when both
    /// come due on the same tick.
    pub async fn run_due_checks(&mut self) {
        let now = Instant::now();

        if now >= self.portal_due {
            self.check_portal().await;
            self.portal_due = now + self.config.portal_interval();
        }

        if now >= self.catedra_due {
            self.check_catedra().await;
            self.catedra_due = now + self.config.catedra_interval();
        }
    }

    /// Checks the portal inside a session scoped to this call: the session
    /// is closed in every path, even when the check errors partway.
    pub async fn check_portal(&mut self) {
        let mut session = match self.sessions.open().await {
            Ok(session) => session,
            Err(e) => {
                error!("could not open a portal session, skipping portal check: {e}");
                return;
            }
        };

        if let Err(e) = self.run_portal_check(session.as_mut()).await {
            error!("portal check failed: {e}");
        }

        match session.close().await {
            Ok(()) => debug!("portal session closed"),
            Err(e) => error!("portal session did not close cleanly: {e}"),
        }
    }

    async fn run_portal_check(
        &mut self,
        session: &mut dyn PortalSession,
    ) -> Result<(), MonitorError> {
        info!("checking for portal updates");

        if !session.login().await? {
            return Err(MonitorError::Auth(
                "login did not redirect away from the login page".into(),
            ));
        }

        let html = session.rendered_html(&self.config.portal_target_url).await?;
        let status = AlertStatus::from_html(&html);

        if let Some(event) = detect_alert_change(self.state.last_alert_count, &status) {
            info!("portal change detected: {}", event.message);
            self.notifier.notify(&event.title, &event.message);
        }

        // The new count is stored whether or not anything fired.
        self.state.last_alert_count = status.count();
        debug!("portal alert count: {}", self.state.last_alert_count);
        Ok(())
    }

    /// Checks the course page over plain HTTP. All failures are logged and
    /// leave the stored fingerprint untouched.
    pub async fn check_catedra(&mut self) {
        info!("checking for updates on {}", self.config.catedra_url);

        let Some(html) = self.fetcher.fetch(&self.config.catedra_url).await else {
            error!("could not fetch the catedra page, no update this cycle");
            return;
        };

        if let Some(dump_path) = &self.config.dump_html {
            if let Err(e) = std::fs::write(dump_path, &html) {
                error!("failed to dump fetched HTML to {}: {e}", dump_path.display());
            }
        }

        let Some(current) = extract_timestamp(&html) else {
            error!("could not extract a timestamp from the catedra page");
            return;
        };

        if let Some(event) = detect_timestamp_change(self.state.last_timestamp.as_deref(), &current)
        {
            info!("catedra change detected: {}", event.message);
            self.notifier.notify(&event.title, &event.message);
        }

        // Updated and persisted after every successful comparison, changed
        // or not; a failed save only costs history across restarts.
        self.store.save(&current);
        self.state.last_timestamp = Some(current);
        debug!(
            "last known catedra timestamp: {}",
            self.state.last_timestamp.as_deref().unwrap_or("none")
        );
    }
}

fn panic_text(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(text) = panic.downcast_ref::<&str>() {
        (*text).to_owned()
    } else if let Some(text) = panic.downcast_ref::<String>() {
        text.clone()
    } else {
        "non-string panic payload".to_owned()
    }
}
