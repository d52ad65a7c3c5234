//! Error kinds of the SCF engine

use integrals::IntegralError;

#[derive(Debug, thiserror::Error)]
pub enum ScfError {
    /// Missing or malformed input data, or an impossible geometry.
    #[error(transparent)]
    FileFormat(IntegralError),

    /// Matrices whose dimensions do not fit together.
    #[error("shape mismatch in {what}: expected {expected}, found {found}")]
    Shape {
        what: String,
        expected: String,
        found: String,
    },

    /// Ill-conditioned overlap or an eigensolver that did not converge.
    #[error("numerical failure: {0}")]
    Numerical(String),

    /// Electron count that cannot fill a closed-shell determinant.
    #[error("cannot build a closed-shell occupation: {0}")]
    Occupation(String),

    /// An SCF operation invoked in the wrong lifecycle state.
    #[error("SCF driver is {found}, but this operation requires it to be {expected}")]
    State { expected: String, found: String },
}

impl ScfError {
    pub(crate) fn shape(what: impl Into<String>, expected: (usize, usize), found: (usize, usize)) -> Self {
        ScfError::Shape {
            what: what.into(),
            expected: format!("{}x{}", expected.0, expected.1),
            found: format!("{}x{}", found.0, found.1),
        }
    }
}

impl From<IntegralError> for ScfError {
    fn from(err: IntegralError) -> Self {
        match err {
            IntegralError::Shape { what, expected, found } => ScfError::Shape { what, expected, found },
            IntegralError::Occupation { message } => ScfError::Occupation(message),
            other => ScfError::FileFormat(other),
        }
    }
}

pub type Result<T, E = ScfError> = std::result::Result<T, E>;
