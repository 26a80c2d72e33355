use alloc::string::String;

use thiserror::Error;

/// Result type used across this crate.
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// Errors raised while loading shares or reconstructing a secret.
///
/// Every variant carries the offending field or value so callers can report
/// which test case failed and why.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum Error {
    /// A share field has a bad name, a bad base or a digit outside its base.
    #[error("malformed share `{field}`: {reason}")]
    MalformedShare { field: String, reason: String },
    /// The `keys` field, or its `n`/`k` entries, are absent or not usable.
    #[error("missing or invalid metadata `{field}`: {reason}")]
    MissingMetadata { field: String, reason: String },
    /// Fewer points than the threshold are available.
    #[error("Not enough shares to recover original secret: need {needed}, got {got}")]
    InsufficientShares { needed: usize, got: usize },
    /// Two points share the same abscissa, so interpolation is undefined.
    #[error("duplicate abscissa x = {x} (fields `{first}` and `{second}`)")]
    DuplicateAbscissa {
        x: String,
        first: String,
        second: String,
    },
}

impl Error {
    pub(crate) fn malformed(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::MalformedShare {
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub(crate) fn metadata(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Error::MissingMetadata {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
