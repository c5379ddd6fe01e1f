use core::fmt;

/// Result alias for `glean`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by the mining, clustering, and correlation primitives.
///
/// Malformed feature *values* never surface here: they are excluded where they
/// occur. These variants cover missing data the caller must handle and
/// precondition violations.
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Input was empty.
    EmptyInput,

    /// Matrix dimension mismatch.
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Found dimension.
        found: usize,
    },

    /// Fewer usable records than the operation requires (e.g. `n < k`).
    InsufficientData {
        /// Records required.
        required: usize,
        /// Records available.
        available: usize,
    },

    /// Invalid parameter value.
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: String,
    },

    /// Feature list is empty or repeats a feature.
    InvalidFeatureList(String),

    /// A raw row could not be turned into a record.
    MalformedRecord {
        /// Position of the row in the ingested batch.
        index: usize,
        /// What was wrong with it.
        reason: String,
    },

    /// Configuration could not be parsed or failed validation.
    InvalidConfig(String),
}

impl Error {
    pub(crate) fn invalid_parameter(name: &'static str, message: impl Into<String>) -> Self {
        Error::InvalidParameter {
            name,
            message: message.into(),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::EmptyInput => write!(f, "empty input provided"),
            Error::DimensionMismatch { expected, found } => {
                write!(f, "dimension mismatch: expected {expected}, found {found}")
            }
            Error::InsufficientData {
                required,
                available,
            } => {
                write!(
                    f,
                    "insufficient data: {required} records required, {available} available"
                )
            }
            Error::InvalidParameter { name, message } => {
                write!(f, "invalid parameter '{name}': {message}")
            }
            Error::InvalidFeatureList(msg) => write!(f, "invalid feature list: {msg}"),
            Error::MalformedRecord { index, reason } => {
                write!(f, "malformed record at index {index}: {reason}")
            }
            Error::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::InvalidConfig(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_problem() {
        let err = Error::InsufficientData {
            required: 5,
            available: 3,
        };
        assert_eq!(
            err.to_string(),
            "insufficient data: 5 records required, 3 available"
        );

        let err = Error::invalid_parameter("k", "must be at least 2");
        assert_eq!(err.to_string(), "invalid parameter 'k': must be at least 2");
    }
}
