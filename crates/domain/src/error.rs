//! Error type for the domain layer.
//!
//! Cognition operations are mostly total; errors only surface where input
//! from the game can be rejected outright.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum DomainError {
    /// Input violates an invariant (empty action name, empty salience content)
    #[error("Validation failed: {0}")]
    Validation(String),

    /// String-to-type conversion failed (e.g. a non-numeric action id)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_display() {
        let err = DomainError::validation("Action name cannot be empty");
        assert_eq!(err.to_string(), "Validation failed: Action name cannot be empty");
    }

    #[test]
    fn test_parse_display() {
        let err = DomainError::parse("Invalid action id: x");
        assert_eq!(err.to_string(), "Parse error: Invalid action id: x");
    }
}
