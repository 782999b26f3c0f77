// aviso-core/src/lib.rs
//! # Aviso Core Library
//!
//! `aviso-core` provides the change-detection and polling logic for the
//! `aviso` monitor: fetching a target's content, extracting a comparable
//! fingerprint from it, persisting the fingerprint across runs, comparing
//! it with the previous run, and deciding whether a notification-worthy
//! change occurred.
//!
//! Two targets are monitored with different fingerprint semantics:
//!
//! * the **cátedra** course page, fetched over plain HTTP, fingerprinted by
//!   its `YYYY-MM-DD HH:MM:SS` update stamp (persisted across restarts);
//! * the **SIU Guaraní** portal, fetched through an authenticated browser
//!   session, fingerprinted by the count of "no information" alert
//!   messages still present (in-memory only, reset to 3 at startup).
//!
//! ## Modules
//!
//! * `config`: [`MonitorConfig`] with the monitored URLs and cadences, plus
//!   environment-sourced [`Credentials`].
//! * `fetch`: the [`PageFetcher`] seam and the `reqwest`-backed
//!   [`HttpFetcher`].
//! * `extract`: fingerprint extraction ([`extract_timestamp`],
//!   [`AlertStatus`]).
//! * `detect`: pure change detection ([`ChangeEvent`]) and the
//!   [`Notifier`] seam.
//! * `state`: [`StateStore`], the single-file timestamp persistence.
//! * `session`: [`PortalSession`] / [`SessionFactory`], the authenticated
//!   browser boundary implemented by the binary.
//! * `scheduler`: the [`Monitor`] loop tying everything together.
//! * `errors`: [`MonitorError`].
//!
//! ## Design Principles
//!
//! * **Failure isolation:** no error in one target's check can prevent the
//!   other target's check, the next cycle, or the process from running.
//! * **Seams at the collaborators:** browser automation and notification
//!   delivery live behind traits, so the core is testable with fakes.
//! * **No ambient state:** the last known fingerprints live in a
//!   [`MonitorState`] context owned by the scheduler.

pub mod config;
pub mod detect;
pub mod errors;
pub mod extract;
pub mod fetch;
pub mod scheduler;
pub mod session;
pub mod state;

pub use config::{Credentials, MonitorConfig};
pub use detect::{detect_alert_change, detect_timestamp_change, ChangeEvent, Notifier};
pub use errors::MonitorError;
pub use extract::{
    extract_timestamp, is_timestamp_shaped, AlertStatus, ALERT_CATEGORIES,
    EXPECTED_ALERT_MESSAGES,
};
pub use fetch::{HttpFetcher, PageFetcher};
pub use scheduler::{Monitor, MonitorState, INITIAL_ALERT_COUNT};
pub use session::{PortalSession, SessionFactory};
pub use state::StateStore;
