//! Transport-level status model
//!
//! A [`TransportStatus`] is what crosses an RPC boundary: a code from the
//! fixed [`StatusCode`] taxonomy, a message, and a list of attached detail
//! records. Details are tagged variants; consumers pattern-match for the one
//! they understand and ignore the rest.

pub mod code;
pub mod detail;

pub use code::StatusCode;
pub use detail::{ErrorDetail, StatusDetail, TransportStatus};
