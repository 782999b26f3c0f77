//! Change detection between consecutive fingerprints.
//!
//! Pure functions: they compare a freshly extracted fingerprint with the
//! last known one and decide whether a notification-worthy change occurred.
//! Storing the new fingerprint is always the caller's job, whether or not
//! an event fired.

use crate::extract::AlertStatus;

/// A notification-worthy change, ready to hand to a [`Notifier`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub title: String,
    pub message: String,
}

/// Delivers a human-visible alert. Fire-and-forget: implementations log
/// delivery failures and never propagate them into the polling loop.
pub trait Notifier: Send + Sync {
    fn notify(&self, title: &str, message: &str);
}

/// Compares course-page timestamps.
///
/// Fires only when a previous timestamp is known and the new one differs
/// (exact string equality). The first-ever observation seeds state without
/// notifying.
pub fn detect_timestamp_change(last: Option<&str>, current: &str) -> Option<ChangeEvent> {
    match last {
        Some(previous) if previous != current => Some(ChangeEvent {
            title: "Actualización en Cátedra".to_owned(),
            message: format!("La página de la cátedra se actualizó a las: {current}"),
        }),
        _ => None,
    }
}

/// Compares portal alert counts.
///
/// Fires only when the count of expected placeholder messages decreased: a
/// placeholder disappearing means real information was posted. The event
/// aggregates every currently missing category into one message. An
/// increase (or any non-decrease) is silent; the caller still stores the
/// new count.
pub fn detect_alert_change(last_count: u8, status: &AlertStatus) -> Option<ChangeEvent> {
    if status.count() >= last_count {
        return None;
    }
    let categories = status.missing_categories();
    Some(ChangeEvent {
        title: "¡Actualización en SIU Guarani!".to_owned(),
        message: format!("Se detectaron cambios en: {}", categories.join(", ")),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_observation_never_fires() {
        assert_eq!(detect_timestamp_change(None, "2024-01-01 10:00:00"), None);
    }

    #[test]
    fn identical_timestamps_are_silent() {
        assert_eq!(
            detect_timestamp_change(Some("2024-01-01 10:00:00"), "2024-01-01 10:00:00"),
            None
        );
    }

    #[test]
    fn changed_timestamp_fires_with_new_value() {
        let event =
            detect_timestamp_change(Some("2024-01-01 10:00:00"), "2024-01-02 11:30:00").unwrap();
        assert_eq!(event.title, "Actualización en Cátedra");
        assert!(event.message.contains("2024-01-02 11:30:00"));
    }

    #[test]
    fn alert_decrease_fires_naming_missing_category() {
        let status = AlertStatus::from_flags([false, true, true]);
        let event = detect_alert_change(3, &status).unwrap();
        assert_eq!(event.message, "Se detectaron cambios en: cursadas");
    }

    #[test]
    fn alert_decrease_aggregates_categories() {
        let status = AlertStatus::from_flags([false, true, false]);
        let event = detect_alert_change(3, &status).unwrap();
        assert_eq!(event.message, "Se detectaron cambios en: cursadas, exámenes");
    }

    #[test]
    fn unchanged_alert_count_is_silent() {
        let status = AlertStatus::from_flags([true, true, true]);
        assert_eq!(detect_alert_change(3, &status), None);
    }

    #[test]
    fn alert_increase_is_silent() {
        let status = AlertStatus::from_flags([true, true, true]);
        assert_eq!(detect_alert_change(2, &status), None);
    }
}
