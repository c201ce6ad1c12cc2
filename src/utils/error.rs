use thiserror::Error;

#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Missing parameter: {name}")]
    MissingParameter { name: String },

    #[error("Invalid parameter '{name}' = '{value}': {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },

    #[error("Upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("Upstream returned {status} for {url}")]
    UpstreamStatus { url: String, status: u16 },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for '{field}' ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Request,
    Upstream,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl RelayError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RelayError::MissingParameter { .. } | RelayError::InvalidParameter { .. } => {
                ErrorCategory::Request
            }
            RelayError::Upstream(_) | RelayError::UpstreamStatus { .. } => ErrorCategory::Upstream,
            RelayError::InvalidUrl(_)
            | RelayError::ConfigError { .. }
            | RelayError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            RelayError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Request => ErrorSeverity::Low,
            ErrorCategory::Upstream => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// HTTP status used when the error ends a page load.
    pub fn status_code(&self) -> u16 {
        match self {
            RelayError::MissingParameter { .. } | RelayError::InvalidParameter { .. } => 400,
            RelayError::Upstream(e) if e.is_timeout() => 504,
            RelayError::Upstream(_) | RelayError::UpstreamStatus { .. } => 502,
            _ => 500,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            RelayError::MissingParameter { name } => {
                format!("Please choose a value for '{}'.", name)
            }
            RelayError::InvalidParameter { name, value, reason } => {
                format!("'{}' is not a valid {}: {}", value, name, reason)
            }
            RelayError::Upstream(e) if e.is_timeout() => {
                "The control list service did not answer in time.".to_string()
            }
            RelayError::Upstream(_) => "The control list service could not be reached.".to_string(),
            RelayError::UpstreamStatus { status, .. } => {
                format!("The control list service answered with status {}.", status)
            }
            RelayError::InvalidUrl(e) => format!("The upstream address is not a valid URL: {}", e),
            RelayError::IoError(e) => format!("A system error occurred: {}", e),
            RelayError::ConfigError { message } => format!("Configuration problem: {}", message),
            RelayError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration value '{}' is invalid: {}", field, reason)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            RelayError::MissingParameter { .. } => "Submit the form with every field selected.",
            RelayError::InvalidParameter { .. } => {
                "Use one of the values offered by the form."
            }
            RelayError::Upstream(_) | RelayError::UpstreamStatus { .. } => {
                "Check that the upstream API is running and retry the request."
            }
            RelayError::InvalidUrl(_) => "Set --api-base to an absolute http(s) URL.",
            RelayError::IoError(_) => "Check file permissions and that the path exists.",
            RelayError::ConfigError { .. } | RelayError::InvalidConfigValueError { .. } => {
                "Fix the configuration file or command line flags and restart."
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, RelayError>;
