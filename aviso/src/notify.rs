// aviso/src/notify.rs
//! Desktop notification delivery.
//!
//! Fire-and-forget: a notification that cannot be shown is logged and
//! forgotten, never propagated into the polling loop.

use aviso_core::Notifier;
use log::{error, info};
use notify_rust::{Notification, Timeout};

/// Application name shown by the desktop environment.
pub const APP_NAME: &str = "Monitor de Notas";

const NOTIFICATION_TIMEOUT_MS: u32 = 10_000;

/// [`Notifier`] backed by the desktop environment's notification service.
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn notify(&self, title: &str, message: &str) {
        let result = Notification::new()
            .appname(APP_NAME)
            .summary(title)
            .body(message)
            .timeout(Timeout::Milliseconds(NOTIFICATION_TIMEOUT_MS))
            .show();
        if let Err(e) = result {
            error!("failed to show desktop notification: {e}");
        }
    }
}

/// Sends a self-test notification so a misconfigured desktop shows up at
/// startup instead of on the first real change.
pub fn send_test_notification() {
    DesktopNotifier.notify(
        "Prueba de Notificación",
        "Si puedes ver esto, las notificaciones están funcionando correctamente!",
    );
    info!("test notification sent");
}
