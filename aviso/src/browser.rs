// aviso/src/browser.rs
//! Headless-browser implementation of the authenticated portal session.
//!
//! Built on `chromiumoxide` (Chromium over the DevTools protocol). One
//! browser process is launched per polling cycle and torn down by the
//! scheduler when the cycle's portal check finishes, so a failed check
//! never leaks a browser across cycles.
//!
//! The login form is submitted through an ordered list of fallback
//! strategies, tried in sequence until one does not error: click the
//! submit button, then a JavaScript `form.submit()`, then an Enter
//! keypress in the password field.

use async_trait::async_trait;
use aviso_core::config::{ENV_PORTAL_PASSWORD, ENV_PORTAL_USER};
use aviso_core::{Credentials, MonitorError, PortalSession, SessionFactory};
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::Page;
use futures::StreamExt;
use log::{debug, info, warn};
use std::fmt;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{sleep, Instant};

const LOGIN_FORM_SELECTOR: &str = "#guarani_form_login";
const USERNAME_SELECTOR: &str = "input[name='usuario']";
const PASSWORD_SELECTOR: &str = "input[name='password']";
const SUBMIT_BUTTON_SELECTOR: &str = "input[type='submit'][name='login']";
const ALERT_SELECTOR: &str = ".alert";

/// Bounded wait for an element to appear on a page.
const ELEMENT_WAIT: Duration = Duration::from_secs(10);
/// Bounded wait for the post-login redirect away from the login URL.
const REDIRECT_WAIT: Duration = Duration::from_secs(15);
const POLL_INTERVAL: Duration = Duration::from_millis(500);
/// Settle time between scrolling the submit button into view and clicking.
const SCROLL_SETTLE: Duration = Duration::from_secs(1);

/// One way of submitting the login form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SubmitStrategy {
    /// Scroll the submit button into view and click it.
    ClickButton,
    /// Submit the form directly from JavaScript.
    ScriptSubmit,
    /// Press Enter inside the password field.
    EnterKey,
}

/// Tried in this order; the first strategy that does not error wins.
const SUBMIT_STRATEGIES: [SubmitStrategy; 3] = [
    SubmitStrategy::ClickButton,
    SubmitStrategy::ScriptSubmit,
    SubmitStrategy::EnterKey,
];

impl fmt::Display for SubmitStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmitStrategy::ClickButton => write!(f, "click on the submit button"),
            SubmitStrategy::ScriptSubmit => write!(f, "JavaScript form.submit()"),
            SubmitStrategy::EnterKey => write!(f, "Enter keypress"),
        }
    }
}

fn cdp_error(e: impl fmt::Display) -> MonitorError {
    MonitorError::Browser(e.to_string())
}

/// An authenticated portal session owning one headless Chromium process.
pub struct BrowserSession {
    browser: Browser,
    handler_task: JoinHandle<()>,
    login_url: String,
    credentials: Credentials,
    page: Option<Page>,
}

impl BrowserSession {
    /// Launches a headless browser ready to log in at `login_url`.
    pub async fn launch(login_url: &str, credentials: Credentials) -> Result<Self, MonitorError> {
        let config = BrowserConfig::builder()
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-gpu")
            .arg("--disable-extensions")
            .arg("--ignore-certificate-errors")
            .build()
            .map_err(MonitorError::Browser)?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| MonitorError::Browser(format!("failed to launch headless browser: {e}")))?;

        // Drain CDP events for the lifetime of the session; the browser
        // stalls if nobody polls the handler.
        let handler_task = tokio::task::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        debug!("headless browser launched");
        Ok(Self {
            browser,
            handler_task,
            login_url: login_url.to_owned(),
            credentials,
            page: None,
        })
    }

    /// Polls for `selector` until it appears or [`ELEMENT_WAIT`] elapses.
    /// Dynamically loaded elements (the portal's alerts, the login form)
    /// are not present at navigation time.
    async fn wait_for_element(
        page: &Page,
        selector: &str,
    ) -> Result<chromiumoxide::element::Element, MonitorError> {
        let deadline = Instant::now() + ELEMENT_WAIT;
        loop {
            if let Ok(element) = page.find_element(selector).await {
                return Ok(element);
            }
            if Instant::now() >= deadline {
                return Err(MonitorError::Browser(format!(
                    "element '{selector}' did not appear within {}s",
                    ELEMENT_WAIT.as_secs()
                )));
            }
            sleep(POLL_INTERVAL).await;
        }
    }

    async fn try_submit(page: &Page, strategy: SubmitStrategy) -> Result<(), MonitorError> {
        match strategy {
            SubmitStrategy::ClickButton => {
                let button = Self::wait_for_element(page, SUBMIT_BUTTON_SELECTOR).await?;
                page.evaluate(format!(
                    "document.querySelector(\"{SUBMIT_BUTTON_SELECTOR}\").scrollIntoView(true);"
                ))
                .await
                .map_err(cdp_error)?;
                sleep(SCROLL_SETTLE).await;
                button.click().await.map_err(cdp_error)?;
            }
            SubmitStrategy::ScriptSubmit => {
                page.evaluate(format!(
                    "document.querySelector(\"{LOGIN_FORM_SELECTOR}\").submit();"
                ))
                .await
                .map_err(cdp_error)?;
            }
            SubmitStrategy::EnterKey => {
                let password_input = Self::wait_for_element(page, PASSWORD_SELECTOR).await?;
                password_input.press_key("Enter").await.map_err(cdp_error)?;
            }
        }
        Ok(())
    }

    /// Polls the current URL until it leaves the login flow or
    /// [`REDIRECT_WAIT`] elapses. `Ok(false)` on timeout or an error URL.
    async fn await_login_redirect(page: &Page) -> Result<bool, MonitorError> {
        let deadline = Instant::now() + REDIRECT_WAIT;
        loop {
            sleep(POLL_INTERVAL).await;

            let url = page.url().await.map_err(cdp_error)?.unwrap_or_default();
            let lower = url.to_lowercase();
            if !url.is_empty() && !lower.contains("auth=form") && !lower.contains("acceso") {
                if lower.contains("error") {
                    warn!("login landed on an error URL: {url}");
                    return Ok(false);
                }
                info!("login redirect complete, current URL: {url}");
                return Ok(true);
            }

            if Instant::now() >= deadline {
                warn!("timed out waiting for the login redirect, current URL: {url}");
                return Ok(false);
            }
        }
    }
}

#[async_trait]
impl PortalSession for BrowserSession {
    async fn login(&mut self) -> Result<bool, MonitorError> {
        let page = self
            .browser
            .new_page(self.login_url.as_str())
            .await
            .map_err(cdp_error)?;

        Self::wait_for_element(&page, LOGIN_FORM_SELECTOR).await?;

        let username_input = Self::wait_for_element(&page, USERNAME_SELECTOR).await?;
        username_input.click().await.map_err(cdp_error)?;
        username_input
            .type_str(&self.credentials.username)
            .await
            .map_err(cdp_error)?;
        debug!("username entered");

        let password_input = Self::wait_for_element(&page, PASSWORD_SELECTOR).await?;
        password_input.click().await.map_err(cdp_error)?;
        password_input
            .type_str(&self.credentials.password)
            .await
            .map_err(cdp_error)?;
        debug!("password entered");

        let mut submitted = false;
        for strategy in SUBMIT_STRATEGIES {
            match Self::try_submit(&page, strategy).await {
                Ok(()) => {
                    info!("login form submitted via {strategy}");
                    submitted = true;
                    break;
                }
                Err(e) => warn!("submission via {strategy} failed, trying the next one: {e}"),
            }
        }
        if !submitted {
            return Ok(false);
        }

        let logged_in = Self::await_login_redirect(&page).await?;
        if logged_in {
            self.page = Some(page);
        }
        Ok(logged_in)
    }

    async fn rendered_html(&mut self, url: &str) -> Result<String, MonitorError> {
        let page = self
            .page
            .as_ref()
            .ok_or_else(|| MonitorError::Auth("not logged in; call login first".into()))?;

        page.goto(url).await.map_err(cdp_error)?;
        // The alert elements load dynamically after navigation.
        Self::wait_for_element(page, ALERT_SELECTOR).await?;
        page.content().await.map_err(cdp_error)
    }

    async fn close(&mut self) -> Result<(), MonitorError> {
        let closed = self.browser.close().await;
        let waited = self.browser.wait().await;
        self.handler_task.abort();

        closed.map_err(|e| MonitorError::Teardown(e.to_string()))?;
        waited.map_err(|e| MonitorError::Teardown(e.to_string()))?;
        debug!("headless browser closed");
        Ok(())
    }
}

/// Opens one fresh [`BrowserSession`] per polling cycle.
pub struct BrowserSessionFactory {
    login_url: String,
    credentials: Option<Credentials>,
}

impl BrowserSessionFactory {
    pub fn new(login_url: impl Into<String>, credentials: Option<Credentials>) -> Self {
        Self {
            login_url: login_url.into(),
            credentials,
        }
    }
}

#[async_trait]
impl SessionFactory for BrowserSessionFactory {
    async fn open(&self) -> Result<Box<dyn PortalSession>, MonitorError> {
        let credentials = self.credentials.clone().ok_or_else(|| {
            MonitorError::Auth(format!(
                "portal credentials not set; export {ENV_PORTAL_USER} and {ENV_PORTAL_PASSWORD}"
            ))
        })?;
        let session = BrowserSession::launch(&self.login_url, credentials).await?;
        Ok(Box::new(session))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strategies_escalate_from_click_to_script_to_keypress() {
        assert_eq!(
            SUBMIT_STRATEGIES,
            [
                SubmitStrategy::ClickButton,
                SubmitStrategy::ScriptSubmit,
                SubmitStrategy::EnterKey,
            ]
        );
    }

    #[test]
    fn strategy_display_names_are_stable() {
        assert_eq!(
            SubmitStrategy::ClickButton.to_string(),
            "click on the submit button"
        );
        assert_eq!(
            SubmitStrategy::ScriptSubmit.to_string(),
            "JavaScript form.submit()"
        );
        assert_eq!(SubmitStrategy::EnterKey.to_string(), "Enter keypress");
    }

    #[tokio::test]
    async fn factory_without_credentials_reports_auth_failure() {
        let factory = BrowserSessionFactory::new("https://example.com/", None);
        let err = factory.open().await.err().expect("open should fail");
        assert!(matches!(err, MonitorError::Auth(_)));
    }
}
