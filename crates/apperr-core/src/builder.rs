//! Copy-on-write enrichment of [`AppError`] values
//!
//! Every method takes `&self` and returns a new value. The receiver is never
//! altered, which is what lets a `static` template be enriched concurrently
//! from many call sites.

use std::error::Error as StdError;
use std::sync::Arc;

use apperr_core_types::TraceId;

use crate::error::{AppError, ErrorFields, Inner};
use crate::status::StatusCode;

impl AppError {
    /// Shallow-copy the record, apply `edit` to the copy
    fn copy_with(&self, edit: impl FnOnce(&mut Inner)) -> AppError {
        let mut inner = (*self.inner).clone();
        edit(&mut inner);
        AppError::from_inner(inner)
    }

    /// Add a single key/value field, overwriting an existing key
    pub fn with_field(&self, key: impl Into<String>, value: impl Into<String>) -> AppError {
        self.add_fields(ErrorFields::from([(key.into(), value.into())]))
    }

    /// Merge `fields` into a copy of this error's fields; the argument wins
    ///
    /// An empty argument returns a handle to this same value.
    pub fn add_fields<I, K, V>(&self, fields: I) -> AppError
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut fields = fields.into_iter().peekable();
        if fields.peek().is_none() {
            return self.clone();
        }

        let mut merged = (*self.inner.fields).clone();
        merged.extend(fields.map(|(key, value)| (key.into(), value.into())));
        self.copy_with(|inner| inner.fields = Arc::new(merged))
    }

    /// Replace the fields wholesale (no merge)
    pub fn with_fields<I, K, V>(&self, fields: I) -> AppError
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let replaced: ErrorFields = fields
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        self.copy_with(|inner| inner.fields = Arc::new(replaced))
    }

    /// Set the transport status code used when crossing an RPC boundary
    pub fn with_transport_code(&self, code: StatusCode) -> AppError {
        self.copy_with(|inner| inner.transport_code = Some(code))
    }

    /// Attach a correlation id
    pub fn with_correlation_id(&self, correlation_id: impl Into<TraceId>) -> AppError {
        let correlation_id = correlation_id.into();
        self.copy_with(|inner| inner.correlation_id = Some(correlation_id))
    }

    /// Copy of this error with `cause` as its immediate cause
    pub fn caused_by<E>(&self, cause: E) -> AppError
    where
        E: StdError + Send + Sync + 'static,
    {
        self.copy_with(|inner| inner.cause = Some(Arc::new(cause)))
    }
}
