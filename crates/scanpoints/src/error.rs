use thiserror::Error;

/// Errors raised while validating models or assembling a compound scan.
///
/// Both kinds surface synchronously when a generator is built; iteration
/// itself never fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A model carries degenerate parameters (zero step, zero scale, empty
    /// array, non-positive bounding box extent, ...).
    #[error("invalid model: {0}")]
    Validation(String),
    /// Models, regions and mutators do not fit together (unknown or shared
    /// axis names, dangling mutators, ...).
    #[error("invalid scan configuration: {0}")]
    Configuration(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Shorthand for building a [`Error::Validation`] result.
pub(crate) fn validation<T>(msg: impl Into<String>) -> Result<T> {
    Err(Error::Validation(msg.into()))
}

/// Shorthand for building a [`Error::Configuration`] result.
pub(crate) fn configuration<T>(msg: impl Into<String>) -> Result<T> {
    Err(Error::Configuration(msg.into()))
}
