#![forbid(unsafe_code)]

//! One-shot user notifications.

use std::fmt;

/// Semantic level of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// A requested store operation completed.
    Success,
    /// A requested store operation failed.
    Error,
}

impl Level {
    /// Single-character marker for plain-text output.
    #[must_use]
    pub const fn as_ascii(self) -> char {
        match self {
            Self::Success => '+',
            Self::Error => 'x',
        }
    }
}

/// A message shown to the user once, then discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Notification level.
    pub level: Level,
    /// Text shown to the user.
    pub message: String,
}

impl Notification {
    /// A success notification.
    #[must_use]
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: Level::Success,
            message: message.into(),
        }
    }

    /// An error notification.
    #[must_use]
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
        }
    }

    /// Whether this notification reports a failure.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.level == Level::Error
    }
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.level.as_ascii(), self.message)
    }
}
