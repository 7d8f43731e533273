use thiserror::Error;

use crate::construct::{ElementId, UserId};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum VocabError {
    #[error("Config error: {0}")]
    Config(String),
    #[error("Invalid identifier: {0}")]
    InvalidIdentifier(String),
    #[error("Invalid user: {0}")]
    InvalidUser(UserId),
    #[error("Invalid state: {0}")]
    InvalidState(String),
    #[error("Unknown value variant: {0}")]
    UnknownValueVariant(String),
    #[error("Null observer handle: {0}")]
    NullHandle(&'static str),
    #[error("Unsupported: {0}")]
    Unsupported(String),
    #[error("Internal invariant violated: {0}")]
    Invariant(String),
    #[error("Element {id} rejected: {message}")]
    Logic { id: ElementId, message: String },
}

impl VocabError {
    /// Everything except [`VocabError::Logic`] and [`VocabError::Config`]
    /// signals a bug elsewhere in the system and should abort the enclosing
    /// operation.
    pub fn is_invariant(&self) -> bool {
        !matches!(self, Self::Logic { .. } | Self::Config(_))
    }
    pub(crate) fn invariant(message: impl Into<String>) -> Self {
        Self::Invariant(message.into())
    }
    pub(crate) fn logic(id: ElementId, message: impl Into<String>) -> Self {
        Self::Logic {
            id,
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, VocabError>;

// Helper conversions
impl From<config::ConfigError> for VocabError {
    fn from(e: config::ConfigError) -> Self {
        Self::Config(e.to_string())
    }
}
