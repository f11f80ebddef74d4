use thiserror::Error;

/// Canonical result for every crate in the workspace.
pub type Result<T> = std::result::Result<T, SeqError>;

#[derive(Debug, Error)]
pub enum SeqError {
    #[error("{op}: sequence contains no matching element")]
    EmptySequence { op: &'static str },

    #[error("{op}: sequence contains more than one matching element")]
    MultipleElements { op: &'static str },

    #[error("index {index} out of range (sequence has {len} elements)")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("type mismatch: expected {expected}, found {found}")]
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },

    #[error("{op}: arithmetic overflow")]
    ArithmeticOverflow { op: &'static str },

    #[error("worker error: {0}")]
    Worker(String),

    #[error("serialization error: {0}")]
    Serialization(String),

    // Caller-supplied callbacks report their own failures through here; the
    // engine hands the boxed error back untouched.
    #[error(transparent)]
    External(Box<dyn std::error::Error + Send + Sync + 'static>),
}

impl SeqError {
    /// Wrap a caller error so it can travel through a traversal.
    pub fn external<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        SeqError::External(Box::new(err))
    }

    /// Short stable name of the error kind, used by logs and tests.
    pub fn kind(&self) -> &'static str {
        match self {
            SeqError::EmptySequence { .. } => "empty_sequence",
            SeqError::MultipleElements { .. } => "multiple_elements",
            SeqError::IndexOutOfRange { .. } => "index_out_of_range",
            SeqError::InvalidArgument(_) => "invalid_argument",
            SeqError::TypeMismatch { .. } => "type_mismatch",
            SeqError::ArithmeticOverflow { .. } => "arithmetic_overflow",
            SeqError::Worker(_) => "worker",
            SeqError::Serialization(_) => "serialization",
            SeqError::External(_) => "external",
        }
    }
}

impl From<serde_json::Error> for SeqError {
    fn from(e: serde_json::Error) -> Self {
        SeqError::Serialization(e.to_string())
    }
}
