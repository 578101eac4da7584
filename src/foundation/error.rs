/// Convenience result type used across Tessella.
pub type TessellaResult<T> = Result<T, TessellaError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Recoverable conditions (missing config fields, absent containers, numeric
/// edge cases) are handled in place with documented fallbacks and never reach
/// this type; these variants cover contract violations the caller must fix.
#[derive(thiserror::Error, Debug)]
pub enum TessellaError {
    /// Invalid user-provided layout spec or component configuration.
    #[error("validation error: {0}")]
    Validation(String),

    /// A referenced container, element, or partition node does not exist.
    #[error("target error: {0}")]
    Target(String),

    /// Errors raised by the change-observation subsystem.
    #[error("observer error: {0}")]
    Observer(String),

    /// Errors when serializing or deserializing data structures.
    #[error("serialization error: {0}")]
    Serde(String),

    /// Wrapped lower-level error from dependencies.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl TessellaError {
    /// Build a [`TessellaError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`TessellaError::Target`] value.
    pub fn target(msg: impl Into<String>) -> Self {
        Self::Target(msg.into())
    }

    /// Build a [`TessellaError::Observer`] value.
    pub fn observer(msg: impl Into<String>) -> Self {
        Self::Observer(msg.into())
    }

    /// Build a [`TessellaError::Serde`] value.
    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
