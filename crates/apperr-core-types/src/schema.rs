//! Canonical schema constants for structured logging and the wire format
//!
//! These constants keep log events, log JSON and the transport detail record
//! spelled the same way everywhere.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_REQUEST_ID: &str = "request_id";
pub const FIELD_TRACE_ID: &str = "trace_id";

// Error fields
pub const FIELD_ERR_SERVICE: &str = "err.service";
pub const FIELD_ERR_CODE: &str = "err.code";
pub const FIELD_ERR_MESSAGE: &str = "err.message";
pub const FIELD_GRPC_CODE: &str = "grpc.code";

// Canonical event names
pub const EVENT_ERROR: &str = "error";
pub const EVENT_ENCODE_DEGRADED: &str = "encode_degraded";
pub const EVENT_DECODE_FALLBACK: &str = "decode_fallback";

// Fallback identity for statuses that carry no structured detail
pub const FALLBACK_SERVICE: &str = "unknown";
pub const FALLBACK_CODE: &str = "00000";

// Protobuf type URLs of the detail records
pub const TYPE_URL_ERROR_DETAIL: &str = "type.googleapis.com/errors.ErrorDetail";
pub const TYPE_URL_REQUEST_INFO: &str = "type.googleapis.com/google.rpc.RequestInfo";
