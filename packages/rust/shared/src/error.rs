//! Error types for shellhelp.
//!
//! Library crates use [`HelpError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all shellhelp operations.
#[derive(Debug, thiserror::Error)]
pub enum HelpError {
    /// The help document could not be read.
    #[error("help text not found at {path:?}: {source}")]
    SourceUnavailable {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A query named a level or command that has no documentation.
    #[error("undocumented topic '{topic}'{}", in_level(.level))]
    UndocumentedTopic {
        topic: String,
        level: Option<String>,
    },

    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// Filesystem I/O error outside of the help document itself.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

fn in_level(level: &Option<String>) -> String {
    match level {
        Some(level) => format!(" in '{level}'"),
        None => String::new(),
    }
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, HelpError>;

impl HelpError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// The help document at `path` could not be read.
    pub fn source_unavailable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::SourceUnavailable {
            path: path.into(),
            source,
        }
    }

    /// An undocumented topic outside of any level.
    pub fn undocumented(topic: impl Into<String>) -> Self {
        Self::UndocumentedTopic {
            topic: topic.into(),
            level: None,
        }
    }

    /// An undocumented topic within `level`.
    pub fn undocumented_in(topic: impl Into<String>, level: impl Into<String>) -> Self {
        Self::UndocumentedTopic {
            topic: topic.into(),
            level: Some(level.into()),
        }
    }
}
