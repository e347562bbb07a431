use thiserror::Error;

/// Result type alias for the codec's internal steps
pub type Result<T> = std::result::Result<T, WireError>;

/// Failures inside the wire codec
///
/// These never reach callers of `encode`/`decode`; each one is logged and
/// turned into the corresponding lower-fidelity output.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WireError {
    /// The structured detail would exceed the configured size limit
    #[error("error detail is {size} bytes, exceeding the {limit} byte limit")]
    DetailTooLarge { size: usize, limit: usize },

    /// A detail of a known type failed to decode
    #[error("malformed {type_url} detail: {reason}")]
    MalformedDetail { type_url: String, reason: String },

    /// The status' binary details are not a valid status message
    #[error("malformed status details: {reason}")]
    MalformedStatus { reason: String },
}
