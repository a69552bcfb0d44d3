//! Error types for transaction encoding, decoding, and hash derivation.
//!
//! Every fallible operation in this crate returns [`Error`]. Decode
//! failures are wrapped layer by layer with the field being read, so a
//! failure deep inside a witness reads like a path:
//!
//! ```text
//! reading input 3: reading input witness: reading arguments: truncated input
//! ```
//!
//! Callers that need to branch on the failure (reject vs. re-fetch) use
//! [`Error::kind`], which looks through all context layers.

use std::fmt;
use std::io;

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced by the codec and the hash engine.
#[derive(Debug, Error)]
pub enum Error {
    /// The input ended in the middle of a field.
    #[error("truncated input")]
    Truncated,

    /// The bytes are present but do not form a valid encoding
    /// (non-minimal varint, unknown tag, bad flag byte, ...).
    #[error("malformed encoding: {0}")]
    Malformed(String),

    /// Hex text could not be decoded.
    #[error("invalid hex: {0}")]
    Hex(#[from] hex::FromHexError),

    /// A strictly-read extensible block had bytes left over.
    #[error("{remaining} unconsumed trailing bytes")]
    TrailingData {
        /// Bytes left in the region after the body parser returned.
        remaining: usize,
    },

    /// A field or value that the transaction version does not allow.
    #[error("transaction version {version} does not support {feature}")]
    UnsupportedVersionFeature {
        /// The transaction version in effect.
        version: u64,
        /// What was found.
        feature: &'static str,
    },

    /// A per-input hash was requested for an input that does not exist.
    #[error("no input {index} (transaction has {count})")]
    InputIndexOutOfRange {
        /// The requested index.
        index: usize,
        /// Number of inputs in the transaction.
        count: usize,
    },

    /// An issuance hash was requested for a spend.
    #[error("input {index} is not an issuance")]
    NotAnIssuanceInput {
        /// The requested index.
        index: usize,
    },

    /// The output sink failed. Passed through untouched.
    #[error(transparent)]
    Io(#[from] io::Error),

    /// Positional context around an inner error.
    #[error("{context}: {source}")]
    Context {
        /// What was being processed.
        context: String,
        /// The underlying failure.
        #[source]
        source: Box<Error>,
    },
}

/// Classification of an [`Error`], independent of how much context
/// surrounds it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    DecodeTruncated,
    DecodeMalformed,
    DecodeTrailingData,
    UnsupportedVersionFeature,
    InputIndexOutOfRange,
    NotAnIssuanceInput,
    Io,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DecodeTruncated => write!(f, "DecodeTruncated"),
            Self::DecodeMalformed => write!(f, "DecodeMalformed"),
            Self::DecodeTrailingData => write!(f, "DecodeTrailingData"),
            Self::UnsupportedVersionFeature => write!(f, "UnsupportedVersionFeature"),
            Self::InputIndexOutOfRange => write!(f, "InputIndexOutOfRange"),
            Self::NotAnIssuanceInput => write!(f, "NotAnIssuanceInput"),
            Self::Io => write!(f, "Io"),
        }
    }
}

impl Error {
    /// Shorthand for [`Error::Malformed`].
    pub fn malformed(msg: impl Into<String>) -> Self {
        Self::Malformed(msg.into())
    }

    /// Returns the innermost error, skipping every context layer.
    pub fn root(&self) -> &Error {
        let mut err = self;
        while let Error::Context { source, .. } = err {
            err = source;
        }
        err
    }

    /// Classifies the error by its root cause.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Truncated => ErrorKind::DecodeTruncated,
            Error::Malformed(_) | Error::Hex(_) => ErrorKind::DecodeMalformed,
            Error::TrailingData { .. } => ErrorKind::DecodeTrailingData,
            Error::UnsupportedVersionFeature { .. } => ErrorKind::UnsupportedVersionFeature,
            Error::InputIndexOutOfRange { .. } => ErrorKind::InputIndexOutOfRange,
            Error::NotAnIssuanceInput { .. } => ErrorKind::NotAnIssuanceInput,
            Error::Io(_) => ErrorKind::Io,
            Error::Context { source, .. } => source.kind(),
        }
    }

    /// Wraps `self` in a context layer.
    pub fn context(self, context: impl Into<String>) -> Self {
        Error::Context {
            context: context.into(),
            source: Box::new(self),
        }
    }
}

/// Adds positional context to a `Result`, in the style of
/// `anyhow::Context` but keeping the typed error.
pub trait Context<T> {
    /// Wraps the error, if any, with a fixed message.
    fn context(self, context: &'static str) -> Result<T>;

    /// Wraps the error, if any, with a lazily built message.
    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C;
}

impl<T> Context<T> for Result<T> {
    fn context(self, context: &'static str) -> Result<T> {
        self.map_err(|e| e.context(context))
    }

    fn with_context<C, F>(self, f: F) -> Result<T>
    where
        C: Into<String>,
        F: FnOnce() -> C,
    {
        self.map_err(|e| e.context(f()))
    }
}
