use thiserror::Error;

/// Errors returned by the tokenizing, vectorizing and distance stages.
///
/// Every error is final: nothing in the crate retries or recovers, the stage
/// that produced it is aborted and the error is handed back unchanged.
#[derive(Debug, Error)]
pub enum Error {
    /// A parameter or input value is not acceptable
    /// (n-gram size, unknown strategy/metric name, empty input, ...).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The vectors disagree with the index or reduction map describing them.
    #[error("inconsistent state: {0}")]
    InconsistentState(String),

    /// A column total (or nonzero proportion) of zero was used as a divisor.
    #[error("division undefined: column {column} has a zero {what}")]
    DivisionUndefined {
        /// Column of the feature space.
        column: usize,
        /// Which aggregate was zero.
        what: &'static str,
    },

    /// Reading from the token source failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }

    pub(crate) fn inconsistent(msg: impl Into<String>) -> Self {
        Error::InconsistentState(msg.into())
    }
}

/// Result type used by this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        let e = Error::invalid("ngram size must be positive");
        assert_eq!(e.to_string(), "invalid argument: ngram size must be positive");

        let e = Error::DivisionUndefined { column: 3, what: "total" };
        assert_eq!(e.to_string(), "division undefined: column 3 has a zero total");
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::InvalidData, "bad utf-8");
        let e: Error = io.into();
        assert!(matches!(e, Error::Io(_)));
    }
}
