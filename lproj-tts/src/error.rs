//! All error types for the lproj-tts crate.
//!
//! These are returned from all fallible operations (parsing, synthesis, deployment, etc.).

use std::path::PathBuf;

use thiserror::Error;

/// Substrings the provider uses when the Text-to-Speech API is not enabled for a project.
const SERVICE_DISABLED_MARKERS: &[&str] =
    &["SERVICE_DISABLED", "Text-to-Speech API", "has not been used"];

#[derive(Error, Debug)]
pub enum Error {
    #[error("not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("invalid language code `{0}`")]
    InvalidLanguage(String),

    #[error("invalid voice map: {0}")]
    InvalidVoiceMap(String),

    #[error("unknown audio encoding `{0}`")]
    UnknownEncoding(String),

    #[error("token signing error: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),

    #[error("missing credentials: {0}")]
    MissingCredentials(String),

    #[error("synthesis failed: {message}")]
    Synthesis {
        message: String,
        /// HTTP status returned by the provider, when there was a response at all.
        status: Option<u16>,
    },
}

impl Error {
    /// Creates a new synthesis error
    pub fn synthesis(message: impl Into<String>, status: Option<u16>) -> Self {
        Error::Synthesis {
            message: message.into(),
            status,
        }
    }

    /// Whether the failure means the remote speech API is not enabled for the
    /// account or project behind the credentials.
    ///
    /// Detection is by message content, since the provider reports this as a
    /// plain permission error.
    pub fn is_service_disabled(&self) -> bool {
        match self {
            Error::Synthesis { message, .. } => SERVICE_DISABLED_MARKERS
                .iter()
                .any(|marker| message.contains(marker)),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_not_found_error() {
        let error = Error::NotFound(PathBuf::from("ja.lproj/Localizable.strings"));
        assert_eq!(error.to_string(), "not found: ja.lproj/Localizable.strings");
    }

    #[test]
    fn test_io_error() {
        let io_error = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let error = Error::Io(io_error);
        assert!(error.to_string().contains("I/O error"));
    }

    #[test]
    fn test_synthesis_error_display() {
        let error = Error::synthesis("quota exceeded", Some(429));
        assert_eq!(error.to_string(), "synthesis failed: quota exceeded");
        assert!(!error.is_service_disabled());
    }

    #[test]
    fn test_service_disabled_detection() {
        let messages = [
            "PERMISSION_DENIED: reason=SERVICE_DISABLED",
            "Cloud Text-to-Speech API has not been used in project 42 before or it is disabled.",
            "API has not been used in project demo",
        ];
        for message in messages {
            let error = Error::synthesis(message, Some(403));
            assert!(error.is_service_disabled(), "{message}");
        }
    }

    #[test]
    fn test_service_disabled_only_for_synthesis() {
        let error = Error::InvalidVoiceMap("Text-to-Speech API".to_string());
        assert!(!error.is_service_disabled());
    }

    #[test]
    fn test_error_debug() {
        let error = Error::UnknownEncoding("flac".to_string());
        let debug = format!("{:?}", error);
        assert!(debug.contains("UnknownEncoding"));
        assert!(debug.contains("flac"));
    }
}
