use thiserror::Error;

/// Errors raised while driving a harvest run
#[derive(Debug, Error)]
pub enum HarvestError {
    /// No WebDriver server accepted a new session
    #[error("failed to connect to a WebDriver server at {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: fantoccini::error::NewSessionError,
    },

    /// A WebDriver command failed
    #[error("WebDriver command failed: {0}")]
    Command(#[from] fantoccini::error::CmdError),

    /// The login page did not contain an expected input field
    #[error("login form field `{field}` not found on {url}")]
    LoginFormMissing { field: String, url: String },

    /// Login was submitted but the session never left the login form
    #[error("login was not accepted (still on {url})")]
    LoginRejected { url: String },

    /// Credentials were not supplied
    #[error("missing credentials: set {0}")]
    MissingCredentials(&'static str),

    /// The run was interrupted before it finished
    #[error("interrupted")]
    Interrupted,

    #[error("invalid URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("invalid link pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, HarvestError>;
