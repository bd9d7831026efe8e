use thiserror::Error;

/// Errors surfaced by the analyzer, the login controller and the browser bridge.
///
/// Only `Navigation` during the initial page load aborts an analysis run.
/// Everything else is either terminal for a single login attempt
/// (`LoginFieldNotFound`) or swallowed at the call site and logged.
#[derive(Debug, Error)]
pub enum ScoutError {
    /// Target page could not be reached within the configured timeout
    #[error(
        "Cannot reach website '{url}'. Please check: 1) URL is correct, \
         2) Website is accessible, 3) Internet connection is working. Error: {reason}"
    )]
    Navigation { url: String, reason: String },

    /// Username or password field missing from the snapshot
    #[error("Could not find {field} field")]
    LoginFieldNotFound { field: String },

    /// Element handle is stale or unknown to the page
    #[error("Element '{element}' not found: {context}")]
    ElementNotFound { element: String, context: String },

    /// A page interaction (fill, click, wait, ...) failed
    #[error("Page action '{action}' failed: {reason}")]
    PageAction { action: String, reason: String },

    /// Node.js bridge failed to spawn
    #[error("Failed to spawn {script} (is Node.js installed?): {source}")]
    SubprocessSpawn {
        script: String,
        #[source]
        source: std::io::Error,
    },

    /// Reading from / writing to the bridge process failed
    #[error("Browser session I/O error: {0}")]
    SessionIo(String),

    /// Bridge answered with ok=false or an unexpected payload
    #[error("Browser session command '{command}' failed: {error}")]
    SessionProtocol { command: String, error: String },

    #[error("JSON parse error ({context}): {source}")]
    JsonParse {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("JSON serialize error ({context}): {source}")]
    JsonSerialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Configuration error: {0}")]
    Config(String),

    /// Report could not be rendered or written
    #[error("Report output error: {0}")]
    Report(String),
}

impl ScoutError {
    pub fn page_action(action: &str, reason: impl ToString) -> Self {
        ScoutError::PageAction {
            action: action.to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn navigation(url: &str, reason: impl ToString) -> Self {
        ScoutError::Navigation {
            url: url.to_string(),
            reason: reason.to_string(),
        }
    }
}
