//! Error handling and custom error types
//!
//! Provides unified error handling across the application using thiserror.
//! Remote failures are split into transport, service and credential errors so
//! callers can branch on [`ErrorKind`] instead of matching message text.

use std::path::PathBuf;
use thiserror::Error;

/// Remote error codes that mean every following call will fail as well.
pub const CREDENTIAL_ERROR_CODES: [&str; 2] = ["SignatureDoesNotMatch", "InvalidCredential"];

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Unexpected HTTP status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },

    /// The remote call completed but the response carried an error payload.
    #[error("{code}")]
    Service { code: String, message: String },

    /// A service error whose code says the credentials were rejected.
    #[error("{code}")]
    Credential { code: String, message: String },

    #[error("Malformed VOD response: {0}")]
    MalformedResponse(String),

    #[error("Directory walk error: {0}")]
    Walk(#[from] walkdir::Error),

    #[error("Directory {} does not exist", .0.display())]
    DirectoryNotFound(PathBuf),

    #[error("Destination {} already exists", .0.display())]
    DestinationExists(PathBuf),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("INI error: {0}")]
    Ini(#[from] ini::Error),
}

/// Coarse classification used to decide whether a failure is per-file or fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Transport,
    Service,
    Credential,
    Filesystem,
    Config,
    Other,
}

impl Error {
    /// Build the error for a remote error payload, promoting credential codes.
    pub fn service(code: impl Into<String>, message: impl Into<String>) -> Self {
        let code = code.into();
        let message = message.into();
        if CREDENTIAL_ERROR_CODES.contains(&code.as_str()) {
            Error::Credential { code, message }
        } else {
            Error::Service { code, message }
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Http(_) | Error::UnexpectedStatus { .. } => ErrorKind::Transport,
            Error::Service { .. } | Error::MalformedResponse(_) => ErrorKind::Service,
            Error::Credential { .. } => ErrorKind::Credential,
            Error::Io(_)
            | Error::Walk(_)
            | Error::DirectoryNotFound(_)
            | Error::DestinationExists(_) => ErrorKind::Filesystem,
            Error::Config(_) | Error::Ini(_) => ErrorKind::Config,
            Error::Serialization(_) => ErrorKind::Other,
        }
    }

    pub fn is_credential(&self) -> bool {
        self.kind() == ErrorKind::Credential
    }
}

pub type Result<T> = std::result::Result<T, Error>;
