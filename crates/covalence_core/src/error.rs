//! Error types for covalence_core.
//!
//! Only malformed calls surface as errors. Unknown identifiers and refusals
//! imposed by domain rules are reported through `Option` and `bool` returns.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoreError {
    /// Malformed arguments (mismatched lengths, bad edge indices, ...)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A template name that is not registered
    #[error("Unknown template: {0}")]
    UnknownTemplate(String),
}

/// Result type alias for covalence_core operations.
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    #[must_use]
    pub fn invalid_input<S: Into<String>>(msg: S) -> Self {
        Self::InvalidInput(msg.into())
    }

    #[must_use]
    pub fn unknown_template<S: Into<String>>(name: S) -> Self {
        Self::UnknownTemplate(name.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CoreError::invalid_input("ids and types differ in length");
        assert_eq!(
            err.to_string(),
            "Invalid input: ids and types differ in length"
        );
    }

    #[test]
    fn test_unknown_template_display() {
        let err = CoreError::unknown_template("hexagonal");
        assert!(err.to_string().contains("hexagonal"));
    }
}
