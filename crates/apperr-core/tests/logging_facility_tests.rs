#![allow(clippy::unwrap_used, clippy::expect_used)]

use apperr_core::logging_facility::test_capture::init_test_capture;
use apperr_core::schema::{
    EVENT_DECODE_FALLBACK, EVENT_ENCODE_DEGRADED, EVENT_ERROR, FIELD_ERR_CODE, FIELD_ERR_MESSAGE,
    FIELD_ERR_SERVICE, FIELD_GRPC_CODE, FIELD_REQUEST_ID, FIELD_TRACE_ID,
};
use apperr_core::{
    codec, log_app_error, AppError, CodecConfig, RequestContext, StatusCode, TransportStatus,
    WireCodec,
};
use tracing::Level;

#[test]
fn test_log_app_error_records_identity() {
    let capture = init_test_capture();
    let op_name = "test_log_app_error_unique_1";

    let err = AppError::new("user-service", "US-404", "user not found")
        .with_transport_code(StatusCode::NotFound);
    log_app_error!(op_name, err);

    let event = capture.expect_one(op_name, EVENT_ERROR);
    assert_eq!(event.level, Level::ERROR);
    assert_eq!(event.field("err.service"), Some("user-service"));
    assert_eq!(event.field("err.code"), Some("US-404"));
    assert_eq!(event.field("err.message"), Some("user not found"));
    assert_eq!(event.field("grpc.code"), Some("NOT_FOUND"));
    assert_eq!(event.field("trace_id"), None);
}

#[test]
fn test_log_app_error_reports_outward_code_when_unset() {
    let capture = init_test_capture();
    let op_name = "test_log_app_error_unset_unique_2";

    log_app_error!(op_name, AppError::new("svc", "C1", "msg"));

    let event = capture.expect_one(op_name, EVENT_ERROR);
    assert_eq!(event.field("grpc.code"), Some("UNKNOWN"));
}

#[test]
fn test_log_app_error_resolves_trace_from_context() {
    let capture = init_test_capture();
    let op_name = "test_log_app_error_ctx_unique_3";

    let ctx = RequestContext::new().with_trace_id("a1b2c3d4");
    let err = AppError::new("svc", "C1", "msg");
    log_app_error!(op_name, err, &ctx);

    let event = capture.expect_one(op_name, EVENT_ERROR);
    assert_eq!(event.field(FIELD_TRACE_ID), Some("a1b2c3d4"));
    assert_eq!(event.field(FIELD_REQUEST_ID), Some(ctx.request_id.as_str()));
    assert!(event
        .component()
        .is_some_and(|c| c.contains("logging_facility_tests")));
}

#[test]
fn test_log_app_error_falls_back_to_error_correlation_id() {
    let capture = init_test_capture();
    let op_name = "test_log_app_error_own_trace_unique_4";

    let err = AppError::new("svc", "C1", "msg").with_correlation_id("carried");
    log_app_error!(op_name, err, &RequestContext::new());

    let event = capture.expect_one(op_name, EVENT_ERROR);
    assert_eq!(event.field("trace_id"), Some("carried"));
}

#[test]
fn test_degraded_encode_is_logged() {
    let capture = init_test_capture();

    let codec = WireCodec::new(CodecConfig {
        max_detail_bytes: 8,
        ..CodecConfig::default()
    });
    let err = AppError::new("degrade-check-service", "DG-1", "too large for the limit");
    let status = codec.encode(&err);
    assert_eq!(status.code(), StatusCode::Internal);

    let degraded = capture.count_events(|e| {
        e.op() == Some("encode")
            && e.event() == Some(EVENT_ENCODE_DEGRADED)
            && e.field("err.service") == Some("degrade-check-service")
    });
    assert_eq!(degraded, 1);
}

#[test]
fn test_decode_fallback_is_logged_at_debug() {
    let capture = init_test_capture();

    let status = TransportStatus::new(StatusCode::DataLoss, "fallback-check");
    let decoded = codec::decode(Some(&status)).unwrap();
    assert_eq!(decoded.code(), "00000");

    let fallbacks: Vec<_> = capture
        .events_for("decode")
        .into_iter()
        .filter(|e| {
            e.event() == Some(EVENT_DECODE_FALLBACK) && e.field("grpc.code") == Some("DATA_LOSS")
        })
        .collect();
    assert!(!fallbacks.is_empty());
    assert!(fallbacks.iter().all(|e| e.level == Level::DEBUG));
}

#[test]
fn test_successful_round_trip_logs_nothing_from_codec() {
    let capture = init_test_capture();

    let err = AppError::new("quiet-service", "Q-1", "quiet").with_transport_code(StatusCode::Aborted);
    let _ = codec::decode(Some(&codec::encode(&err)));

    let noisy = capture.count_events(|e| e.field("err.service") == Some("quiet-service"));
    assert_eq!(noisy, 0);
}

#[test]
fn test_log_app_error_uses_schema_keys() {
    let capture = init_test_capture();
    let op_name = "test_log_app_error_schema_unique_5";

    let err = AppError::new("schema-service", "SC-1", "keyed")
        .with_transport_code(StatusCode::FailedPrecondition);
    log_app_error!(op_name, err, &RequestContext::new().with_trace_id(""));

    let event = capture.expect_one(op_name, EVENT_ERROR);
    assert_eq!(event.field(FIELD_ERR_SERVICE), Some("schema-service"));
    assert_eq!(event.field(FIELD_ERR_CODE), Some("SC-1"));
    assert_eq!(event.field(FIELD_ERR_MESSAGE), Some("keyed"));
    assert_eq!(event.field(FIELD_GRPC_CODE), Some("FAILED_PRECONDITION"));
    // an empty trace id is not logged
    assert_eq!(event.field(FIELD_TRACE_ID), None);
    assert_eq!(event.field("message"), None);
}
