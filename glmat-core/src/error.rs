//! Error types for transform construction and scene parameter loading

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures reported by the checked operations.
///
/// The unchecked fast paths (`Mat4::invert`, `Mat4::look_at`) never
/// return these; they degenerate silently instead.
#[derive(Debug, Error)]
pub enum Error {
    /// Determinant magnitude fell below the caller's epsilon.
    #[error("matrix is singular: |det| = {determinant:e} < {epsilon:e}")]
    SingularMatrix { determinant: f32, epsilon: f32 },

    /// A projection was requested with parameters outside its domain.
    #[error("invalid parameter `{name}` = {value}: {reason}")]
    InvalidParameter {
        name: &'static str,
        value: f32,
        reason: &'static str,
    },

    /// Scene parameter text could not be applied.
    #[error(transparent)]
    Params(#[from] ParamError),

    #[error("failed to read scene parameters: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn invalid(name: &'static str, value: f32, reason: &'static str) -> Self {
        Self::InvalidParameter {
            name,
            value,
            reason,
        }
    }
}

/// A problem on one line of a scene parameter file.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ParamError {
    #[error("line {line}: expected `name = value`, found `{text}`")]
    Syntax { line: usize, text: String },

    #[error("line {line}: unknown parameter `{name}`")]
    UnknownName { line: usize, name: String },

    #[error("line {line}: parameter `{name}` expects {expected}")]
    WrongType {
        line: usize,
        name: String,
        expected: &'static str,
    },
}

impl ParamError {
    /// 1-based line the error refers to.
    pub fn line(&self) -> usize {
        match self {
            Self::Syntax { line, .. }
            | Self::UnknownName { line, .. }
            | Self::WrongType { line, .. } => *line,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_parameter() {
        let err = Error::invalid("z_near", -1.0, "must be positive");
        let text = err.to_string();
        assert!(text.contains("z_near"));
        assert!(text.contains("must be positive"));
    }

    #[test]
    fn test_param_error_converts() {
        let err: Error = ParamError::UnknownName {
            line: 3,
            name: "fovy".into(),
        }
        .into();
        assert!(matches!(err, Error::Params(ref p) if p.line() == 3));
        assert_eq!(err.to_string(), "line 3: unknown parameter `fovy`");
    }
}
