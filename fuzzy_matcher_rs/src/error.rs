//! Definition of errors.

/// A specialized Result type for this crate.
pub type Result<T, E = MatchError> = std::result::Result<T, E>;

/// The error type for matcher construction and queries.
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    /// A caller-supplied argument is outside its valid domain, e.g. an empty
    /// word, a similarity threshold outside `[0, 1]` or an unknown match mode
    /// name.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A confusion table entry is outside the valid cost range `(0, 1]`.
    #[error("invalid confusion cost {cost} for pair ({a}, {b}), expected a value in (0, 1]")]
    InvalidConfusionCost { a: String, b: String, cost: f64 },

    /// The error variant for [`std::io::Error`].
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// The error variant for [`serde_json::Error`].
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// The error variant for [`DaachorseError`](daachorse::errors::DaachorseError).
    #[error("{0}")]
    Automaton(String),
}

impl From<daachorse::errors::DaachorseError> for MatchError {
    fn from(err: daachorse::errors::DaachorseError) -> Self {
        Self::Automaton(err.to_string())
    }
}
