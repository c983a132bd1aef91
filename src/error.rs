use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdminError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("API error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    #[error("Failed to read config file at {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {path}: {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Failed to write config file at {path}: {source}")]
    ConfigSave {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize config: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("Could not determine config directory")]
    NoConfigDir,

    #[error("Failed to read session file at {path}: {source}")]
    SessionRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse session file at {path}: {source}")]
    SessionParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to write session file at {path}: {source}")]
    SessionWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("No selected user found.")]
    NoSelection,

    #[error("Page size must be greater than zero")]
    EmptyPage,

    #[error("Rows per page must be one of 5, 10 or 15 (got {0})")]
    InvalidPageSize(u32),

    #[error("Invalid form: {}", messages.join(", "))]
    InvalidForm { messages: Vec<String> },

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Not logged in. Run 'useradmin login' first")]
    NotLoggedIn,

    #[error("User not found: {0}")]
    UserNotFound(u64),
}

impl AdminError {
    /// The failure's own message, without the variant's prefix.
    pub fn message(&self) -> String {
        match self {
            AdminError::ApiError { message, .. } => message.clone(),
            AdminError::Http(e) => e.to_string(),
            other => other.to_string(),
        }
    }

    /// Failures raised from local state before any request goes out.
    pub fn is_precondition(&self) -> bool {
        matches!(
            self,
            AdminError::NoSelection | AdminError::EmptyPage | AdminError::InvalidPageSize(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, AdminError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn message_drops_the_status_prefix() {
        let err = AdminError::ApiError {
            status: 0,
            message: "Network Error".to_string(),
        };

        assert_eq!(err.to_string(), "API error (status 0): Network Error");
        assert_eq!(err.message(), "Network Error");
        assert_eq!(AdminError::NoSelection.message(), "No selected user found.");
    }
}
