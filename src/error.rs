use thiserror::Error;

/// Errors raised while interpreting a single annotation line.
///
/// These never abort a run: the extractor logs them and skips the offending line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnnotationError {
    #[error("malformed @{directive} annotation, expected `{expected}`: {line}")]
    Malformed {
        directive: &'static str,
        expected: &'static str,
        line: String,
    },

    #[error("unknown parameter location `{0}`")]
    UnknownLocation(String),

    #[error("unsupported HTTP method `{0}`")]
    UnknownMethod(String),

    #[error("invalid status code `{0}`")]
    InvalidStatusCode(String),

    #[error("invalid required flag `{0}`, expected true or false")]
    InvalidRequiredFlag(String),
}

impl AnnotationError {
    pub(crate) fn malformed(directive: &'static str, expected: &'static str, line: &str) -> Self {
        AnnotationError::Malformed {
            directive,
            expected,
            line: line.to_string(),
        }
    }
}
