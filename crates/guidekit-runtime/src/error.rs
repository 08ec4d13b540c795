#![forbid(unsafe_code)]

//! Error types.

use std::fmt;

/// Errors surfaced by GuideKit.
///
/// Transient measurement failures are not errors; they are retried on the
/// next display refresh and never reach the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuideError {
    /// A consumer hook was used without a live [`GuideProvider`].
    ///
    /// [`GuideProvider`]: crate::GuideProvider
    ProviderMissing {
        /// Name of the hook that was called.
        hook: &'static str,
    },
    /// A configuration value could not be used.
    InvalidConfig {
        key: &'static str,
        value: String,
        reason: &'static str,
    },
}

impl fmt::Display for GuideError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ProviderMissing { hook } => {
                write!(f, "{hook} must be used within a GuideProvider")
            }
            Self::InvalidConfig { key, value, reason } => {
                write!(f, "invalid value {value:?} for {key}: {reason}")
            }
        }
    }
}

impl std::error::Error for GuideError {}

/// Standard result type for GuideKit APIs.
pub type Result<T> = std::result::Result<T, GuideError>;
