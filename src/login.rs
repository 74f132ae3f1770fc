use crate::browser::Browser;
use crate::config::{Credentials, HarvestConfig};
use crate::error::{HarvestError, Result};
use crate::wait::{self, WaitOutcome};

/// Result of submitting the login form
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    /// The login form went away after submission
    Authenticated,
    /// The browser was still on the login form when the timeout elapsed
    Rejected { url: String },
}

impl LoginOutcome {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, LoginOutcome::Authenticated)
    }
}

/// Logs into the site with the given credentials.
///
/// Missing form fields are an error. A submitted login that does not leave the form within
/// the configured timeout is reported as [`LoginOutcome::Rejected`].
pub async fn log_in<B: Browser>(
    browser: &B,
    config: &HarvestConfig,
    credentials: &Credentials,
) -> Result<LoginOutcome> {
    ::log::info!("Logging in at {}", config.login_url);
    browser.goto(&config.login_url).await?;

    // Wait for the form to render before touching it
    for field in [&config.identifier_field, &config.secret_field] {
        let present = wait::until(config.login_timeout(), config.poll_interval(), move || {
            browser.has_element(field)
        })
        .await?;
        if present == WaitOutcome::TimedOut {
            return Err(HarvestError::LoginFormMissing {
                field: field.clone(),
                url: browser.current_url().await?,
            });
        }
    }

    // The login page may have redirected (regional host, locale prefix)
    let form_url = browser.current_url().await?;
    ::log::debug!("Login form found on {}", form_url);

    browser
        .fill(&config.identifier_field, &credentials.identifier)
        .await?;
    browser.fill(&config.secret_field, &credentials.secret).await?;
    browser.submit(&config.secret_field).await?;

    // Only the secret field going away counts; a changed URL alone may be an error page
    let secret_field = config.secret_field.as_str();
    let left_form = wait::until(config.login_timeout(), config.poll_interval(), move || async move {
        let still_there = browser.has_element(secret_field).await?;
        Ok::<_, HarvestError>(!still_there)
    })
    .await?;

    match left_form {
        WaitOutcome::Ready => {
            ::log::info!("Login accepted");
            Ok(LoginOutcome::Authenticated)
        }
        WaitOutcome::TimedOut => {
            let url = browser.current_url().await?;
            ::log::warn!(
                "Login form still present after {:?} on {}",
                config.login_timeout(),
                url
            );
            Ok(LoginOutcome::Rejected { url })
        }
    }
}
