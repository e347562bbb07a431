//! Protobuf messages for the detail records
//!
//! Hand-declared `prost` messages; tags are part of the wire contract.

use std::collections::BTreeMap;

use crate::status::ErrorDetail;

/// `errors.ErrorDetail`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ErrorDetailProto {
    #[prost(string, tag = "1")]
    pub service: String,
    #[prost(string, tag = "2")]
    pub code: String,
    #[prost(string, tag = "3")]
    pub message: String,
    #[prost(btree_map = "string, string", tag = "4")]
    pub fields: BTreeMap<String, String>,
}

/// `google.rpc.RequestInfo`
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RequestInfoProto {
    #[prost(string, tag = "1")]
    pub request_id: String,
    #[prost(string, tag = "2")]
    pub serving_data: String,
}

impl From<ErrorDetail> for ErrorDetailProto {
    fn from(detail: ErrorDetail) -> Self {
        Self {
            service: detail.service,
            code: detail.code,
            message: detail.message,
            fields: detail.fields,
        }
    }
}

impl From<ErrorDetailProto> for ErrorDetail {
    fn from(proto: ErrorDetailProto) -> Self {
        Self {
            service: proto.service,
            code: proto.code,
            message: proto.message,
            fields: proto.fields,
        }
    }
}

/// Encoded size of a detail record, without materialising the bytes
pub fn encoded_len(detail: &ErrorDetail) -> usize {
    use prost::Message;

    ErrorDetailProto::from(detail.clone()).encoded_len()
}
