use serde::Serialize;

use crate::error::ErrorFields;
use crate::status::StatusCode;

/// Structured detail record carried on a transport status
///
/// Field names are fixed for interoperability; the JSON form omits empty
/// identity and fields, matching the log record shape.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ErrorDetail {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub service: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "ErrorFields::is_empty")]
    pub fields: ErrorFields,
}

/// One entry of a status' detail list
#[derive(Debug, Clone, PartialEq)]
pub enum StatusDetail {
    /// The structured error record
    Error(ErrorDetail),
    /// Correlation for the request that failed
    RequestInfo {
        request_id: String,
        serving_data: String,
    },
    /// A detail of a type this crate does not interpret, kept verbatim
    Opaque { type_url: String, value: Vec<u8> },
}

/// Wire-level status: code, message and attached details
#[derive(Debug, Clone, PartialEq)]
pub struct TransportStatus {
    code: StatusCode,
    message: String,
    details: Vec<StatusDetail>,
}

impl TransportStatus {
    /// A status with no details
    pub fn new(code: StatusCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: Vec::new(),
        }
    }

    /// Append a detail record
    pub fn with_detail(mut self, detail: StatusDetail) -> Self {
        self.details.push(detail);
        self
    }

    pub fn code(&self) -> StatusCode {
        self.code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn details(&self) -> &[StatusDetail] {
        &self.details
    }

    /// The first structured error record, if any
    pub fn error_detail(&self) -> Option<&ErrorDetail> {
        self.details.iter().find_map(|detail| match detail {
            StatusDetail::Error(error) => Some(error),
            _ => None,
        })
    }

    /// The request id of the first request-info record, if any
    pub fn request_id(&self) -> Option<&str> {
        self.details.iter().find_map(|detail| match detail {
            StatusDetail::RequestInfo { request_id, .. } if !request_id.is_empty() => {
                Some(request_id.as_str())
            }
            _ => None,
        })
    }
}
