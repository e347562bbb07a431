//! Shared error templates
//!
//! Process-wide prototypes for the failures every service reports. Enrich a
//! template per call site; test for one with [`AppError::is`] or
//! [`AppError::chain_matches`].

use std::sync::LazyLock;

use crate::error::AppError;
use crate::status::StatusCode;

pub const COMMON_SERVICE: &str = "common";

/// `[common:00100] internal error`, sent as `Internal`
pub static ERR_INTERNAL: LazyLock<AppError> = LazyLock::new(|| {
    AppError::new(COMMON_SERVICE, "00100", "internal error")
        .with_transport_code(StatusCode::Internal)
});

/// `[common:00101] invalid input`, sent as `InvalidArgument`
pub static ERR_INVALID_INPUT: LazyLock<AppError> = LazyLock::new(|| {
    AppError::new(COMMON_SERVICE, "00101", "invalid input")
        .with_transport_code(StatusCode::InvalidArgument)
});
