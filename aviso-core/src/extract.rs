//! Fingerprint extraction from fetched HTML.
//!
//! Two independent extractors, one per monitored target:
//!
//! * [`extract_timestamp`] pulls the `YYYY-MM-DD HH:MM:SS` update stamp out
//!   of the course page.
//! * [`AlertStatus::from_html`] counts which of the portal's expected
//!   "no information" alert messages are still present.

use log::{info, warn};
use scraper::{Html, Selector};

/// The three status messages shown by the portal while no academic
/// information has been posted. Matching is a case-sensitive substring
/// check against each alert element's text.
pub const EXPECTED_ALERT_MESSAGES: [&str; 3] = [
    "No hay información sobre actuaciones provisorias en cursadas",
    "No hay información sobre actuaciones provisorias en promociones",
    "No hay información sobre actuaciones provisorias en exámenes",
];

/// Category labels paired with [`EXPECTED_ALERT_MESSAGES`] by index.
pub const ALERT_CATEGORIES: [&str; 3] = ["cursadas", "promociones", "exámenes"];

/// Returns true for a 19-character `YYYY-MM-DD HH:MM:SS` shaped string.
///
/// A deliberately narrow positional check (separators at offsets 4, 7, 10,
/// 13 and 16) rather than a date parse; the course page only ever shows
/// this one fixed-width format.
pub fn is_timestamp_shaped(text: &str) -> bool {
    let chars: Vec<char> = text.chars().collect();
    chars.len() == 19
        && chars[4] == '-'
        && chars[7] == '-'
        && chars[10] == ' '
        && chars[13] == ':'
        && chars[16] == ':'
}

/// Extracts the update timestamp from the course page HTML.
///
/// Scans every `<span>` in document order and returns the first whose
/// trimmed text is timestamp-shaped. When none matches, falls back to
/// `<li>` elements mentioning "actualización" (with or without the accent)
/// and returns the trimmed text of the first `<span>` nested inside such an
/// item. Returns `None` with a logged warning when nothing is found; never
/// panics on malformed HTML.
pub fn extract_timestamp(html: &str) -> Option<String> {
    let document = Html::parse_document(html);

    let span_selector = Selector::parse("span").ok()?;
    for span in document.select(&span_selector) {
        let text = span.text().collect::<String>();
        let trimmed = text.trim();
        if is_timestamp_shaped(trimmed) {
            info!("timestamp found in span: {trimmed}");
            return Some(trimmed.to_owned());
        }
    }

    let li_selector = Selector::parse("li").ok()?;
    for li in document.select(&li_selector) {
        let li_text = li.text().collect::<String>().to_lowercase();
        if li_text.contains("actualización") || li_text.contains("actualizacion") {
            if let Some(span) = li.select(&span_selector).next() {
                let text = span.text().collect::<String>();
                let trimmed = text.trim();
                info!("timestamp found in li mentioning 'actualización': {trimmed}");
                return Some(trimmed.to_owned());
            }
        }
    }

    warn!("no timestamp found in the page");
    None
}

/// Which of the expected portal status messages are currently present.
///
/// The count of present messages (0–3) is the portal's fingerprint; a
/// decrease means one of the "no information" placeholders disappeared,
/// i.e. real academic information was posted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlertStatus {
    present: [bool; 3],
}

impl AlertStatus {
    /// Scans all elements carrying the `alert` class in a rendered portal
    /// page and records which expected messages appear among them.
    pub fn from_html(html: &str) -> Self {
        let document = Html::parse_document(html);
        let mut present = [false; 3];

        if let Ok(alert_selector) = Selector::parse(".alert") {
            let alert_texts: Vec<String> = document
                .select(&alert_selector)
                .map(|alert| alert.text().collect::<String>())
                .collect();

            for (slot, message) in present.iter_mut().zip(EXPECTED_ALERT_MESSAGES) {
                *slot = alert_texts.iter().any(|text| text.contains(message));
            }
        }

        Self { present }
    }

    /// Builds a status directly from presence flags, indexed like
    /// [`EXPECTED_ALERT_MESSAGES`].
    pub fn from_flags(present: [bool; 3]) -> Self {
        Self { present }
    }

    /// Number of expected messages present, in `[0, 3]`.
    pub fn count(&self) -> u8 {
        self.present.iter().filter(|&&p| p).count() as u8
    }

    /// Category labels of the expected messages currently missing.
    pub fn missing_categories(&self) -> Vec<&'static str> {
        self.present
            .iter()
            .zip(ALERT_CATEGORIES)
            .filter(|(&present, _)| !present)
            .map(|(_, category)| category)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATEDRA_PAGE: &str = r#"
        <html><body>
            <ul>
                <li>Programa de la materia</li>
                <li>Última actualización: <span>2024-01-01 10:00:00</span></li>
            </ul>
        </body></html>
    "#;

    #[test]
    fn timestamp_shape_accepts_canonical_format() {
        assert!(is_timestamp_shaped("2024-01-01 10:00:00"));
        assert!(is_timestamp_shaped("1999-12-31 23:59:59"));
    }

    #[test]
    fn timestamp_shape_rejects_wrong_length_or_separators() {
        assert!(!is_timestamp_shaped(""));
        assert!(!is_timestamp_shaped("2024-01-01 10:00"));
        assert!(!is_timestamp_shaped("2024/01/01 10:00:00"));
        assert!(!is_timestamp_shaped("2024-01-01T10:00:00"));
        assert!(!is_timestamp_shaped("aaaa-bb-cc dd:ee:ff  "));
        // 19 chars but separators in the wrong slots.
        assert!(!is_timestamp_shaped("20240101 10:00:0000"));
    }

    #[test]
    fn timestamp_shape_counts_chars_not_bytes() {
        // 19 characters with multi-byte content and correct separators
        // still passes the positional check; equality downstream decides.
        assert!(is_timestamp_shaped("áéíó-ñ0-01 10:00:00"));
    }

    #[test]
    fn extracts_timestamp_from_span() {
        assert_eq!(
            extract_timestamp(CATEDRA_PAGE),
            Some("2024-01-01 10:00:00".to_owned())
        );
    }

    #[test]
    fn trims_surrounding_whitespace() {
        let html = "<span>\n  2024-05-06 08:30:00\n</span>";
        assert_eq!(extract_timestamp(html), Some("2024-05-06 08:30:00".to_owned()));
    }

    #[test]
    fn returns_none_when_no_timestamp_present() {
        let html = "<html><body><span>hola</span><p>sin fecha</p></body></html>";
        assert_eq!(extract_timestamp(html), None);
    }

    #[test]
    fn falls_back_to_actualizacion_list_item() {
        // The span text is not timestamp-shaped, so the span scan misses it;
        // the li fallback still returns it verbatim.
        let html = r#"
            <ul>
                <li>Actualización del sitio <span>06/05/2024 a las 08:30</span></li>
            </ul>
        "#;
        assert_eq!(
            extract_timestamp(html),
            Some("06/05/2024 a las 08:30".to_owned())
        );
    }

    #[test]
    fn fallback_matches_unaccented_spelling() {
        let html = "<li>actualizacion: <span>ayer</span></li>";
        assert_eq!(extract_timestamp(html), Some("ayer".to_owned()));
    }

    fn portal_page(messages: &[&str]) -> String {
        let alerts: String = messages
            .iter()
            .map(|m| format!("<div class=\"alert alert-info\">{m}</div>"))
            .collect();
        format!("<html><body>{alerts}</body></html>")
    }

    #[test]
    fn all_placeholders_present_counts_three() {
        let html = portal_page(&EXPECTED_ALERT_MESSAGES);
        let status = AlertStatus::from_html(&html);
        assert_eq!(status.count(), 3);
        assert!(status.missing_categories().is_empty());
    }

    #[test]
    fn missing_placeholder_is_categorised() {
        let html = portal_page(&[
            EXPECTED_ALERT_MESSAGES[1],
            EXPECTED_ALERT_MESSAGES[2],
            "Actuación provisoria de cursadas: Aprobado",
        ]);
        let status = AlertStatus::from_html(&html);
        assert_eq!(status.count(), 2);
        assert_eq!(status.missing_categories(), vec!["cursadas"]);
    }

    #[test]
    fn page_without_alerts_counts_zero() {
        let status = AlertStatus::from_html("<html><body><p>hola</p></body></html>");
        assert_eq!(status.count(), 0);
        assert_eq!(
            status.missing_categories(),
            vec!["cursadas", "promociones", "exámenes"]
        );
    }

    #[test]
    fn matching_is_case_sensitive() {
        let shouting = EXPECTED_ALERT_MESSAGES[0].to_uppercase();
        let html = portal_page(&[&shouting]);
        assert_eq!(AlertStatus::from_html(&html).count(), 0);
    }
}
