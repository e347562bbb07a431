//! JSON rendering of errors for structured logs
//!
//! The record is built from the error's data (see [`ErrorDetail`]), never
//! from its `Display` text, so service, code and fields stay separate keys.

use std::error::Error as StdError;

use serde::Serialize;

use apperr_core_types::RequestContext;

use crate::error::AppError;
use crate::status::ErrorDetail;

#[derive(Serialize)]
struct LogRecord<'a> {
    #[serde(flatten)]
    detail: ErrorDetail,
    #[serde(skip_serializing_if = "Option::is_none")]
    trace_id: Option<&'a str>,
}

#[derive(Serialize)]
struct PlainRecord<'a> {
    error: &'a str,
}

/// Render `err` as a JSON object for a log sink
///
/// When the chain holds an [`AppError`], the first one is rendered as
/// `{service, code, message, fields, trace_id}` with the trace id taken from
/// `ctx` (or from the error itself). Anything else becomes
/// `{"error": "<display text>"}`.
pub fn to_log_json(ctx: &RequestContext, err: &(dyn StdError + 'static)) -> Vec<u8> {
    let Some(app_err) = AppError::find_in_chain(err) else {
        return plain(&err.to_string());
    };

    let record = LogRecord {
        detail: app_err.to_detail(),
        trace_id: app_err.resolve_correlation_id(ctx).map(|id| id.as_str()),
    };

    match serde_json::to_vec(&record) {
        Ok(bytes) => bytes,
        Err(e) => plain(&format!("failed to marshal app error: {}", e)),
    }
}

fn plain(message: &str) -> Vec<u8> {
    serde_json::to_vec(&PlainRecord { error: message })
        .unwrap_or_else(|_| br#"{"error":"failed to marshal app error"}"#.to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn parse(bytes: &[u8]) -> Value {
        serde_json::from_slice(bytes).unwrap()
    }

    #[test]
    fn test_empty_identity_and_fields_are_omitted() {
        let err = AppError::new("", "", "bare");
        let json = parse(&to_log_json(&RequestContext::new(), &err));

        assert_eq!(json, serde_json::json!({"message": "bare"}));
    }

    #[test]
    fn test_plain_error_text_is_escaped() {
        let err = std::io::Error::new(std::io::ErrorKind::Other, "bad \"quote\"");
        let json = parse(&to_log_json(&RequestContext::new(), &err));

        assert_eq!(json["error"], "bad \"quote\"");
    }
}
