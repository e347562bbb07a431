//! Conversion between [`AppError`] and [`TransportStatus`]
//!
//! Encoding never reports success and never fails outright: an unset or `Ok`
//! transport code is sent as `Unknown`, and a detail that cannot be attached
//! degrades the whole status to a generic internal failure. Decoding never
//! fails either: a status without a structured detail becomes a minimal
//! error carrying the status' own code and message.

use apperr_core_types::schema::{
    EVENT_DECODE_FALLBACK, EVENT_ENCODE_DEGRADED, FIELD_ERR_CODE, FIELD_ERR_SERVICE,
    FIELD_GRPC_CODE,
};
use apperr_core_types::{RequestContext, TraceId};

use crate::config::CodecConfig;
use crate::error::AppError;
use crate::errors::{Result, WireError};
use crate::proto;
use crate::status::{StatusCode, StatusDetail, TransportStatus};

/// Message of the status sent when the structured detail cannot be attached
pub const ENCODE_FAILURE_MESSAGE: &str = "failed to marshal error";

/// The code an error is reported with on the wire
///
/// An error must never look like success, so unset and `Ok` both become
/// `Unknown`.
pub fn outward_code(code: Option<StatusCode>) -> StatusCode {
    match code {
        Some(code) if !code.is_success() => code,
        _ => StatusCode::Unknown,
    }
}

/// Configured encoder/decoder
#[derive(Debug, Clone, Default)]
pub struct WireCodec {
    config: CodecConfig,
}

impl WireCodec {
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Encode `err` into a status with one structured detail
    pub fn encode(&self, err: &AppError) -> TransportStatus {
        self.encode_with(err, err.correlation_id())
    }

    /// Encode `err`, also attaching the correlation id resolved from `ctx`
    pub fn encode_in(&self, ctx: &RequestContext, err: &AppError) -> TransportStatus {
        self.encode_with(err, err.resolve_correlation_id(ctx))
    }

    fn encode_with(&self, err: &AppError, correlation_id: Option<&TraceId>) -> TransportStatus {
        let status = TransportStatus::new(outward_code(err.transport_code()), err.message());

        match self.attach_detail(status, err) {
            Ok(status) => match correlation_id {
                Some(id) => status.with_detail(StatusDetail::RequestInfo {
                    request_id: id.to_string(),
                    serving_data: String::new(),
                }),
                None => status,
            },
            Err(reason) => {
                tracing::warn!(
                    component = module_path!(),
                    op = "encode",
                    event = EVENT_ENCODE_DEGRADED,
                    { FIELD_ERR_SERVICE } = err.service(),
                    { FIELD_ERR_CODE } = err.code(),
                    reason = %reason,
                );
                TransportStatus::new(StatusCode::Internal, ENCODE_FAILURE_MESSAGE)
            }
        }
    }

    fn attach_detail(&self, status: TransportStatus, err: &AppError) -> Result<TransportStatus> {
        let detail = err.to_detail();
        let size = proto::encoded_len(&detail);
        if size > self.config.max_detail_bytes {
            return Err(WireError::DetailTooLarge {
                size,
                limit: self.config.max_detail_bytes,
            });
        }
        Ok(status.with_detail(StatusDetail::Error(detail)))
    }

    /// Decode an optional status; an absent status is an absent error
    pub fn decode(&self, status: Option<&TransportStatus>) -> Option<AppError> {
        status.map(|status| self.decode_status(status))
    }

    /// Rebuild an error from a status, falling back to a minimal value
    pub fn decode_status(&self, status: &TransportStatus) -> AppError {
        let correlation_id = status.request_id().map(TraceId::from);

        match status.error_detail() {
            Some(detail) => AppError::from_detail(detail.clone(), status.code(), correlation_id),
            None => {
                tracing::debug!(
                    component = module_path!(),
                    op = "decode",
                    event = EVENT_DECODE_FALLBACK,
                    { FIELD_GRPC_CODE } = %status.code(),
                    details = status.details().len(),
                );
                let fallback = AppError::new(
                    self.config.fallback_service.as_str(),
                    self.config.fallback_code.as_str(),
                    status.message(),
                )
                .with_transport_code(status.code());
                match correlation_id {
                    Some(id) => fallback.with_correlation_id(id),
                    None => fallback,
                }
            }
        }
    }
}

/// [`WireCodec::encode`] with the default configuration
pub fn encode(err: &AppError) -> TransportStatus {
    WireCodec::default().encode(err)
}

/// [`WireCodec::encode_in`] with the default configuration
pub fn encode_in(ctx: &RequestContext, err: &AppError) -> TransportStatus {
    WireCodec::default().encode_in(ctx, err)
}

/// [`WireCodec::decode`] with the default configuration
pub fn decode(status: Option<&TransportStatus>) -> Option<AppError> {
    WireCodec::default().decode(status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outward_code_never_reports_success() {
        assert_eq!(outward_code(None), StatusCode::Unknown);
        assert_eq!(outward_code(Some(StatusCode::Ok)), StatusCode::Unknown);
        assert_eq!(outward_code(Some(StatusCode::NotFound)), StatusCode::NotFound);
    }

    #[test]
    fn test_encode_attaches_one_structured_detail() {
        let err = AppError::new("user-service", "US-404", "user not found")
            .with_field("id", "456")
            .with_transport_code(StatusCode::NotFound);

        let status = encode(&err);

        assert_eq!(status.code(), StatusCode::NotFound);
        assert_eq!(status.message(), "user not found");
        assert_eq!(status.details().len(), 1);
        let detail = status.error_detail().unwrap();
        assert_eq!(detail.service, "user-service");
        assert_eq!(detail.fields.get("id").map(String::as_str), Some("456"));
    }

    #[test]
    fn test_oversized_detail_degrades_to_internal() {
        let codec = WireCodec::new(CodecConfig {
            max_detail_bytes: 16,
            ..CodecConfig::default()
        });
        let err = AppError::new("svc", "C1", "a message longer than the limit")
            .with_transport_code(StatusCode::NotFound);

        let status = codec.encode(&err);

        assert_eq!(status.code(), StatusCode::Internal);
        assert_eq!(status.message(), ENCODE_FAILURE_MESSAGE);
        assert!(status.details().is_empty());
    }

    #[test]
    fn test_decode_absent_status() {
        assert!(decode(None).is_none());
    }

    #[test]
    fn test_decode_fallback_uses_configured_identity() {
        let codec = WireCodec::new(CodecConfig {
            fallback_service: "edge".to_string(),
            fallback_code: "E-0".to_string(),
            ..CodecConfig::default()
        });
        let status = TransportStatus::new(StatusCode::Unavailable, "upstream down");

        let err = codec.decode_status(&status);

        assert_eq!(err.service(), "edge");
        assert_eq!(err.code(), "E-0");
        assert_eq!(err.message(), "upstream down");
        assert_eq!(err.transport_code(), Some(StatusCode::Unavailable));
    }
}
