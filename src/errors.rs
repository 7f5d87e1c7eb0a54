use std::time::Duration;

use thiserror::Error;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Failures of a single pagination run.
///
/// `MalformedScore` only ever describes one score element; the extractor logs
/// and skips it. Every other variant aborts the run it was raised in.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("request to {url} failed: {source}")]
    Network {
        url: String,
        #[source]
        source: BoxError,
    },

    #[error("could not parse page markup: {0}")]
    Parse(String),

    #[error("score {text:?} is not an integer")]
    MalformedScore { text: String },

    #[error(transparent)]
    InvalidInput(#[from] InputError),

    #[error("invalid keyword pattern: {0}")]
    Keyword(#[from] regex::Error),

    #[error("run cancelled")]
    Cancelled,

    #[error("run did not finish within {0:?}")]
    Timeout(Duration),
}

impl ScrapeError {
    pub fn network(url: impl Into<String>, source: impl Into<BoxError>) -> Self {
        ScrapeError::Network {
            url: url.into(),
            source: source.into(),
        }
    }
}

/// Problems with a single answer typed at a prompt.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("{field} must be a whole number, got {value:?}")]
    NotAnInteger { field: &'static str, value: String },

    #[error("{field} cannot be negative, got {value}")]
    Negative { field: &'static str, value: i64 },

    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    #[error("{field} is not valid: {reason}")]
    Invalid { field: &'static str, reason: String },

    #[error("input closed")]
    Closed,

    #[error("could not read input: {0}")]
    Io(#[from] std::io::Error),
}

/// A text field that cannot be represented in the output character set.
#[derive(Debug, Error)]
#[error("{field} {text:?} is not representable as ASCII")]
pub struct EncodingError {
    pub field: &'static str,
    pub text: String,
}

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("could not write {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}
