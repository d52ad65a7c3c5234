use std::path::PathBuf;

/// Errors raised while loading or validating integral data.
#[derive(Debug, thiserror::Error)]
pub enum IntegralError {
    #[error("unable to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed integral file {}{}: {message}", .path.display(), .line.map_or_else(String::new, |l| format!(" (line {l})")))]
    FileFormat {
        path: PathBuf,
        line: Option<usize>,
        message: String,
    },
    #[error("shape mismatch for {what}: expected {expected}, found {found}")]
    Shape {
        what: String,
        expected: String,
        found: String,
    },
    #[error("invalid geometry: {message}")]
    Geometry { message: String },
    #[error("cannot build a closed-shell occupation: {message}")]
    Occupation { message: String },
}

impl IntegralError {
    pub(crate) fn format(path: impl Into<PathBuf>, line: Option<usize>, message: impl Into<String>) -> Self {
        IntegralError::FileFormat {
            path: path.into(),
            line,
            message: message.into(),
        }
    }

    pub(crate) fn shape(what: impl Into<String>, expected: impl ToString, found: impl ToString) -> Self {
        IntegralError::Shape {
            what: what.into(),
            expected: expected.to_string(),
            found: found.to_string(),
        }
    }
}
