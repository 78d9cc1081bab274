//! Tagged storage errors produced by the lowest-level store adapter.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::MISSING_RANK_COMMANDS;
use crate::models::IssueCategory;

/// What went wrong talking to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StoreErrorKind {
    /// The client exposes no such method.
    MethodNotAvailable,
    /// The host rejected the command as unsupported.
    MethodNotSupported,
    /// The host does not recognise the command.
    UnknownCommand,
    /// A rank-by-score primitive is missing on the host.
    MissingRankCommand,
    Timeout,
    ConnectionError,
    Other,
}

impl StoreErrorKind {
    /// Compatibility-class failures may be recovered locally by a fallback.
    pub fn is_compatibility(self) -> bool {
        matches!(
            self,
            Self::MethodNotAvailable
                | Self::MethodNotSupported
                | Self::UnknownCommand
                | Self::MissingRankCommand
        )
    }

    /// Bucket reported in compatibility-issue records.
    pub fn issue_category(self) -> IssueCategory {
        match self {
            Self::MethodNotAvailable => IssueCategory::MethodNotAvailable,
            Self::MethodNotSupported => IssueCategory::MethodNotSupported,
            Self::UnknownCommand | Self::MissingRankCommand => IssueCategory::UnknownCommand,
            Self::Timeout => IssueCategory::Timeout,
            Self::ConnectionError => IssueCategory::ConnectionError,
            Self::Other => IssueCategory::Other,
        }
    }

    /// Classify a raw error message from a transport that only reports text.
    ///
    /// Adapters call this once at the boundary; everything above them
    /// decides on the tag, never on the message.
    pub fn from_message(message: &str) -> Self {
        let lower = message.to_ascii_lowercase();
        if lower.contains("is not a function") || lower.contains("no such method") {
            return Self::MethodNotAvailable;
        }
        if MISSING_RANK_COMMANDS
            .iter()
            .any(|cmd| lower.contains(&format!("'{cmd}'")) || lower.contains(&format!("{cmd} ")))
            && (lower.contains("unknown") || lower.contains("unsupported"))
        {
            return Self::MissingRankCommand;
        }
        if lower.contains("unknown command") {
            return Self::UnknownCommand;
        }
        if lower.contains("not supported") || lower.contains("unsupported") {
            return Self::MethodNotSupported;
        }
        if lower.contains("timed out") || lower.contains("timeout") {
            return Self::Timeout;
        }
        if lower.contains("econnrefused")
            || lower.contains("econnreset")
            || lower.contains("connection")
            || lower.contains("socket")
        {
            return Self::ConnectionError;
        }
        Self::Other
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::MethodNotAvailable => "method_not_available",
            Self::MethodNotSupported => "method_not_supported",
            Self::UnknownCommand => "unknown_command",
            Self::MissingRankCommand => "missing_rank_command",
            Self::Timeout => "timeout",
            Self::ConnectionError => "connection_error",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for StoreErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A failed store command, tagged with its kind.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{command} failed ({kind}): {message}")]
pub struct StoreError {
    pub kind: StoreErrorKind,
    pub command: String,
    pub message: String,
}

impl StoreError {
    pub fn new(kind: StoreErrorKind, command: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            kind,
            command: command.into(),
            message: message.into(),
        }
    }

    /// Build an error from a raw transport message, classifying it once.
    pub fn from_message(command: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            kind: StoreErrorKind::from_message(&message),
            command: command.into(),
            message,
        }
    }

    pub fn timeout(command: impl Into<String>, after_ms: u64) -> Self {
        Self::new(
            StoreErrorKind::Timeout,
            command,
            format!("operation timed out after {after_ms}ms"),
        )
    }

    pub fn unsupported(command: impl Into<String>) -> Self {
        let command = command.into();
        let message = format!("command '{command}' is not supported by this host");
        Self::new(StoreErrorKind::MethodNotSupported, command, message)
    }

    pub fn is_compatibility(&self) -> bool {
        self.kind.is_compatibility()
    }
}
