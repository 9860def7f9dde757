use thiserror::Error;

/// A specialized `Result` type for automation server operations.
pub type AppiumResult<T> = Result<T, AppiumError>;

/// The error type for all automation-server operations.
#[derive(Debug, Error)]
pub enum AppiumError {
    #[error("HTTP request to automation server failed: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },

    #[error("Invalid automation server URL '{url}'")]
    InvalidServerUrl { url: String },

    #[error("Failed to start session (HTTP {status}): {message}")]
    SessionNotCreated { status: u16, message: String },

    #[error("No element found for {locator}: {message}")]
    NoSuchElement { locator: String, message: String },

    #[error("Element is no longer attached to the UI: {message}")]
    StaleElement { message: String },

    #[error("Command '{command}' failed with '{error}': {message}")]
    Command {
        command: String,
        error: String,
        message: String,
    },

    #[error("Unexpected response to '{command}': {description}")]
    InvalidResponse {
        command: String,
        description: String,
    },

    #[error("Timed out after {duration:?}: {description}")]
    Timeout {
        duration: std::time::Duration,
        description: String,
    },

    #[error("Screenshot payload could not be decoded: {description}")]
    ScreenshotDecode { description: String },
}

impl AppiumError {
    /// Errors a polling wait should ignore and retry through.
    pub fn is_transient_lookup(&self) -> bool {
        matches!(
            self,
            AppiumError::NoSuchElement { .. } | AppiumError::StaleElement { .. }
        )
    }

    /// Map a W3C error payload (`{"error": ..., "message": ...}`) onto a typed error.
    pub fn from_w3c(command: &str, locator: Option<&str>, error: String, message: String) -> Self {
        match error.as_str() {
            "no such element" => AppiumError::NoSuchElement {
                locator: locator.unwrap_or("element").to_string(),
                message,
            },
            "stale element reference" => AppiumError::StaleElement { message },
            _ => AppiumError::Command {
                command: command.to_string(),
                error,
                message,
            },
        }
    }
}
