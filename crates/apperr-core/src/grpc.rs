//! Interop with `tonic::Status`
//!
//! Details travel the standard way: a `google.rpc.Status` message, with each
//! detail packed as an `Any`, in the status' binary details. Unknown detail
//! types are carried through as [`StatusDetail::Opaque`].

use bytes::Bytes;
use prost::Message;
use prost_types::Any;

use apperr_core_types::schema::{TYPE_URL_ERROR_DETAIL, TYPE_URL_REQUEST_INFO};

use crate::codec::{self, WireCodec};
use crate::error::AppError;
use crate::errors::{Result, WireError};
use crate::proto::{ErrorDetailProto, RequestInfoProto};
use crate::status::{StatusCode, StatusDetail, TransportStatus};

/// `google.rpc.Status`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RpcStatusProto {
    #[prost(int32, tag = "1")]
    pub code: i32,
    #[prost(string, tag = "2")]
    pub message: String,
    #[prost(message, repeated, tag = "3")]
    pub details: Vec<Any>,
}

fn pack(detail: &StatusDetail) -> Any {
    match detail {
        StatusDetail::Error(error) => Any {
            type_url: TYPE_URL_ERROR_DETAIL.to_string(),
            value: ErrorDetailProto::from(error.clone()).encode_to_vec(),
        },
        StatusDetail::RequestInfo {
            request_id,
            serving_data,
        } => Any {
            type_url: TYPE_URL_REQUEST_INFO.to_string(),
            value: RequestInfoProto {
                request_id: request_id.clone(),
                serving_data: serving_data.clone(),
            }
            .encode_to_vec(),
        },
        StatusDetail::Opaque { type_url, value } => Any {
            type_url: type_url.clone(),
            value: value.clone(),
        },
    }
}

fn unpack_known(any: &Any) -> Result<Option<StatusDetail>> {
    let malformed = |e: prost::DecodeError| WireError::MalformedDetail {
        type_url: any.type_url.clone(),
        reason: e.to_string(),
    };

    match any.type_url.as_str() {
        TYPE_URL_ERROR_DETAIL => {
            let proto = ErrorDetailProto::decode(any.value.as_slice()).map_err(malformed)?;
            Ok(Some(StatusDetail::Error(proto.into())))
        }
        TYPE_URL_REQUEST_INFO => {
            let proto = RequestInfoProto::decode(any.value.as_slice()).map_err(malformed)?;
            Ok(Some(StatusDetail::RequestInfo {
                request_id: proto.request_id,
                serving_data: proto.serving_data,
            }))
        }
        _ => Ok(None),
    }
}

fn unpack(any: Any) -> StatusDetail {
    match unpack_known(&any) {
        Ok(Some(detail)) => detail,
        Ok(None) => StatusDetail::Opaque {
            type_url: any.type_url,
            value: any.value,
        },
        Err(reason) => {
            tracing::debug!(
                component = module_path!(),
                op = "unpack_detail",
                reason = %reason,
            );
            StatusDetail::Opaque {
                type_url: any.type_url,
                value: any.value,
            }
        }
    }
}

fn decode_details(bytes: &[u8]) -> Result<Vec<StatusDetail>> {
    if bytes.is_empty() {
        return Ok(Vec::new());
    }
    let status = RpcStatusProto::decode(bytes).map_err(|e| WireError::MalformedStatus {
        reason: e.to_string(),
    })?;
    Ok(status.details.into_iter().map(unpack).collect())
}

impl From<TransportStatus> for tonic::Status {
    fn from(status: TransportStatus) -> Self {
        let code = tonic::Code::from(status.code().as_i32());
        if status.details().is_empty() {
            return tonic::Status::new(code, status.message());
        }

        let proto = RpcStatusProto {
            code: status.code().as_i32(),
            message: status.message().to_string(),
            details: status.details().iter().map(pack).collect(),
        };
        tonic::Status::with_details(code, status.message(), Bytes::from(proto.encode_to_vec()))
    }
}

impl From<&tonic::Status> for TransportStatus {
    fn from(status: &tonic::Status) -> Self {
        let transport =
            TransportStatus::new(StatusCode::from_i32(status.code() as i32), status.message());

        match decode_details(status.details()) {
            Ok(details) => details
                .into_iter()
                .fold(transport, |transport, detail| transport.with_detail(detail)),
            Err(reason) => {
                tracing::debug!(
                    component = module_path!(),
                    op = "decode_details",
                    reason = %reason,
                );
                transport
            }
        }
    }
}

impl From<&AppError> for tonic::Status {
    fn from(err: &AppError) -> Self {
        codec::encode(err).into()
    }
}

impl From<AppError> for tonic::Status {
    fn from(err: AppError) -> Self {
        tonic::Status::from(&err)
    }
}

impl From<&tonic::Status> for AppError {
    fn from(status: &tonic::Status) -> Self {
        WireCodec::default().decode_status(&TransportStatus::from(status))
    }
}

impl From<tonic::Status> for AppError {
    fn from(status: tonic::Status) -> Self {
        AppError::from(&status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_any_is_kept_opaque() {
        let any = Any {
            type_url: "type.googleapis.com/google.rpc.DebugInfo".to_string(),
            value: vec![10, 3, b'a', b'b', b'c'],
        };
        match unpack(any) {
            StatusDetail::Opaque { type_url, value } => {
                assert!(type_url.ends_with("DebugInfo"));
                assert_eq!(value.len(), 5);
            }
            other => panic!("expected opaque detail, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_known_detail_degrades_to_opaque() {
        let any = Any {
            type_url: TYPE_URL_ERROR_DETAIL.to_string(),
            value: vec![0xff, 0xff, 0xff],
        };
        assert!(matches!(unpack(any), StatusDetail::Opaque { .. }));
    }

    #[test]
    fn test_garbage_details_decode_to_nothing() {
        assert!(decode_details(&[0xff, 0xff, 0xff]).is_err());
        assert!(decode_details(&[]).unwrap().is_empty());
    }
}
