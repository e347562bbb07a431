//! apperr core - structured application errors
//!
//! An [`AppError`] keeps its identity (service + code), message, key/value
//! fields, cause and correlation id intact while it travels:
//! - through business code, via copy-on-write enrichment ([`builder`])
//! - across an RPC boundary, via [`codec::encode`] / [`codec::decode`] and,
//!   with the `tonic` feature, `tonic::Status`
//! - into a log sink, via [`serialize::to_log_json`] and [`log_app_error!`]
//!
//! ```
//! use apperr_core::{codec, AppError, StatusCode};
//!
//! let err = AppError::new("user-service", "US-404", "user not found")
//!     .with_field("id", "456")
//!     .with_transport_code(StatusCode::NotFound);
//!
//! let status = codec::encode(&err);
//! let decoded = codec::decode(Some(&status)).unwrap();
//! assert!(decoded.is(&err));
//! ```

pub mod builder;
pub mod codec;
pub mod config;
pub mod error;
pub mod errors;
#[cfg(feature = "tonic")]
pub mod grpc;
pub mod logging_facility;
pub mod proto;
pub mod serialize;
pub mod status;
pub mod templates;

// Re-export commonly used types
pub use apperr_core_types::{schema, RequestContext, RequestId, TraceId};
pub use codec::{decode, encode, encode_in, WireCodec};
pub use config::CodecConfig;
pub use error::{AppError, ErrorFields, ResultExt};
pub use errors::WireError;
pub use serialize::to_log_json;
pub use status::{ErrorDetail, StatusCode, StatusDetail, TransportStatus};

#[doc(hidden)]
pub use tracing as __tracing;
