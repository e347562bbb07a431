//! Structured logging facility
//!
//! - Single initialization point via `init(profile)`
//! - `log_app_error!` for reporting an [`AppError`](crate::AppError) with its
//!   identity, transport code and correlation id as separate fields
//! - Test capture mode for deterministic assertions
//!
//! # Usage
//!
//! ```rust
//! use apperr_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
