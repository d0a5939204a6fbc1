//! Error types and handling for the Geoscope application

use thiserror::Error;

/// Main error type for the Geoscope application
#[derive(Error, Debug)]
pub enum ExplorerError {
    /// A required request field was missing or empty
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// Reaching or parsing a third-party source failed
    #[error("Upstream error: {message}")]
    Upstream { message: String },

    /// A lookup produced no matches
    #[error("Not found: {message}")]
    NotFound { message: String },

    /// Device geolocation was denied or unavailable
    #[error("Permission error: {message}")]
    Permission { message: String },

    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl ExplorerError {
    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new upstream error
    pub fn upstream<S: Into<String>>(message: S) -> Self {
        Self::Upstream {
            message: message.into(),
        }
    }

    /// Create a new not-found error
    pub fn not_found<S: Into<String>>(message: S) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    /// Create a new permission error
    pub fn permission<S: Into<String>>(message: S) -> Self {
        Self::Permission {
            message: message.into(),
        }
    }

    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Get the short message suitable for replacing a UI region.
    ///
    /// Upstream detail stays in the logs; only the stored generic message
    /// crosses this boundary.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            ExplorerError::Validation { message }
            | ExplorerError::Upstream { message }
            | ExplorerError::NotFound { message }
            | ExplorerError::Permission { message } => message.clone(),
            ExplorerError::Config { .. } => {
                "Configuration error. Please check your config file.".to_string()
            }
            ExplorerError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let validation_err = ExplorerError::validation("Country required");
        assert!(matches!(validation_err, ExplorerError::Validation { .. }));

        let upstream_err = ExplorerError::upstream("Failed to fetch countries");
        assert!(matches!(upstream_err, ExplorerError::Upstream { .. }));

        let not_found_err = ExplorerError::not_found("Location not found");
        assert!(matches!(not_found_err, ExplorerError::NotFound { .. }));
    }

    #[test]
    fn test_user_messages() {
        let upstream_err = ExplorerError::upstream("Failed to fetch states");
        assert_eq!(upstream_err.user_message(), "Failed to fetch states");

        let permission_err =
            ExplorerError::permission("Permission denied or unable to get location.");
        assert!(permission_err.user_message().contains("Permission denied"));

        let config_err = ExplorerError::config("missing port");
        assert!(config_err.user_message().contains("Configuration error"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let explorer_err: ExplorerError = io_err.into();
        assert!(matches!(explorer_err, ExplorerError::Io { .. }));
    }
}
