//! The structured application error value
//!
//! An [`AppError`] carries a machine-readable identity (`service` + `code`),
//! a human message, key/value fields, an optional cause, an optional
//! transport status code and an optional correlation id. Values are
//! immutable: every enrichment in [`crate::builder`] returns a new value and
//! leaves the receiver untouched, so one value can serve as a shared template
//! for many call sites and threads.

use std::collections::BTreeMap;
use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;

use apperr_core_types::{RequestContext, TraceId};

use crate::status::{ErrorDetail, StatusCode};

/// Key/value context attached to an error
pub type ErrorFields = BTreeMap<String, String>;

pub(crate) type SharedCause = Arc<dyn StdError + Send + Sync + 'static>;

#[derive(Debug, Clone)]
pub(crate) struct Inner {
    pub(crate) service: String,
    pub(crate) code: String,
    pub(crate) message: String,
    pub(crate) fields: Arc<ErrorFields>,
    pub(crate) cause: Option<SharedCause>,
    pub(crate) transport_code: Option<StatusCode>,
    pub(crate) correlation_id: Option<TraceId>,
}

/// Canonical structured error value
///
/// Cloning is a reference-count bump. Two values are the same *kind* of
/// error when their service and code match; see [`AppError::is`].
#[derive(Clone)]
pub struct AppError {
    pub(crate) inner: Arc<Inner>,
}

impl AppError {
    /// Create a root error (no cause, no fields, transport code unset)
    pub fn new(
        service: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::from_inner(Inner {
            service: service.into(),
            code: code.into(),
            message: message.into(),
            fields: Arc::default(),
            cause: None,
            transport_code: None,
            correlation_id: None,
        })
    }

    /// Wrap `cause` in a copy of `template`
    ///
    /// Wrapping no error yields no error, so call sites can write
    /// `AppError::wrap(maybe_err, &TEMPLATE)` without a guard.
    pub fn wrap<E>(cause: Option<E>, template: &AppError) -> Option<AppError>
    where
        E: StdError + Send + Sync + 'static,
    {
        cause.map(|err| template.caused_by(err))
    }

    /// Rebuild a value from a wire detail record
    pub(crate) fn from_detail(
        detail: ErrorDetail,
        transport_code: StatusCode,
        correlation_id: Option<TraceId>,
    ) -> Self {
        Self::from_inner(Inner {
            service: detail.service,
            code: detail.code,
            message: detail.message,
            fields: Arc::new(detail.fields),
            cause: None,
            transport_code: Some(transport_code),
            correlation_id,
        })
    }

    pub(crate) fn from_inner(inner: Inner) -> Self {
        Self {
            inner: Arc::new(inner),
        }
    }

    /// Originating subsystem
    pub fn service(&self) -> &str {
        &self.inner.service
    }

    /// Stable machine-readable code, unique within the service
    pub fn code(&self) -> &str {
        &self.inner.code
    }

    /// Human-readable message
    pub fn message(&self) -> &str {
        &self.inner.message
    }

    /// Attached key/value context
    pub fn fields(&self) -> &ErrorFields {
        &self.inner.fields
    }

    /// The immediate cause, if this error wraps another
    pub fn cause(&self) -> Option<&(dyn StdError + Send + Sync + 'static)> {
        self.inner.cause.as_deref()
    }

    /// Transport status code, `None` when never set
    pub fn transport_code(&self) -> Option<StatusCode> {
        self.inner.transport_code
    }

    /// Correlation id attached at decode time or by a late setter
    pub fn correlation_id(&self) -> Option<&TraceId> {
        self.inner.correlation_id.as_ref().filter(|id| !id.is_empty())
    }

    /// Resolve the correlation id for a boundary crossing
    ///
    /// The request context wins; the value's own correlation id (for example
    /// one recovered by the decoder) is the fallback.
    pub fn resolve_correlation_id<'a>(&'a self, ctx: &'a RequestContext) -> Option<&'a TraceId> {
        ctx.correlation_id().or(self.correlation_id())
    }

    /// Whether two handles share the same underlying value
    pub fn ptr_eq(a: &AppError, b: &AppError) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }

    /// The textual form: `[service:code] message [fields:{..}]: cause`
    pub fn render(&self) -> String {
        self.to_string()
    }

    /// The wire detail record of this value
    pub fn to_detail(&self) -> ErrorDetail {
        ErrorDetail {
            service: self.inner.service.clone(),
            code: self.inner.code.clone(),
            message: self.inner.message.clone(),
            fields: (*self.inner.fields).clone(),
        }
    }

    /// Equivalence test against a template
    ///
    /// True when service and code match and every field of `template` is
    /// present with an equal value here. Extra fields on `self` are ignored,
    /// so an enriched value still matches the template it came from.
    pub fn is(&self, template: &AppError) -> bool {
        self.inner.service == template.inner.service
            && self.inner.code == template.inner.code
            && template
                .inner
                .fields
                .iter()
                .all(|(key, value)| self.inner.fields.get(key) == Some(value))
    }

    /// [`AppError::is`] against any error value; false unless it is an `AppError`
    pub fn matches_template(&self, candidate: &(dyn StdError + 'static)) -> bool {
        candidate
            .downcast_ref::<AppError>()
            .is_some_and(|template| self.is(template))
    }

    /// Does any `AppError` in the chain starting at `err` match `template`?
    pub fn chain_matches(err: &(dyn StdError + 'static), template: &AppError) -> bool {
        chain(err).any(|link| {
            link.downcast_ref::<AppError>()
                .is_some_and(|app_err| app_err.is(template))
        })
    }

    /// The first `AppError` in the chain starting at `err`
    pub fn find_in_chain<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a AppError> {
        chain(err).find_map(|link| link.downcast_ref::<AppError>())
    }
}

/// Iterate `err` followed by its transitive sources
pub fn chain<'a>(
    err: &'a (dyn StdError + 'static),
) -> impl Iterator<Item = &'a (dyn StdError + 'static)> {
    std::iter::successors(Some(err), |&link| link.source())
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}:{}] {}", self.inner.service, self.inner.code, self.inner.message)?;

        if !self.inner.fields.is_empty() {
            f.write_str(" [fields:{")?;
            for (i, (key, value)) in self.inner.fields.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{:?}:{:?}", key, value)?;
            }
            f.write_str("}]")?;
        }

        if let Some(cause) = &self.inner.cause {
            write!(f, ": {}", cause)?;
        }
        Ok(())
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppError")
            .field("service", &self.inner.service)
            .field("code", &self.inner.code)
            .field("message", &self.inner.message)
            .field("fields", &self.inner.fields)
            .field("cause", &self.inner.cause)
            .field("transport_code", &self.inner.transport_code)
            .field("correlation_id", &self.inner.correlation_id)
            .finish()
    }
}

impl StdError for AppError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner
            .cause
            .as_ref()
            .map(|cause| cause.as_ref() as &(dyn StdError + 'static))
    }
}

/// Wrap the error side of a `Result` in a copy of a template
pub trait ResultExt<T> {
    /// Map `Err(e)` to `Err(template.caused_by(e))`; `Ok` passes through
    fn wrap_err(self, template: &AppError) -> Result<T, AppError>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    fn wrap_err(self, template: &AppError) -> Result<T, AppError> {
        self.map_err(|err| template.caused_by(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Refused;

    impl fmt::Display for Refused {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("connection refused")
        }
    }

    impl StdError for Refused {}

    #[test]
    fn test_render_root() {
        let err = AppError::new("svc", "C1", "msg");
        assert_eq!(err.render(), "[svc:C1] msg");
        assert_eq!(err.to_string(), err.render());
    }

    #[test]
    fn test_render_escapes_field_text() {
        let err = AppError::new("svc", "C1", "msg").with_field("path", "a\"b");
        assert_eq!(err.render(), r#"[svc:C1] msg [fields:{"path":"a\"b"}]"#);
    }

    #[test]
    fn test_render_with_cause_after_fields() {
        let err = AppError::new("database", "DB-500", "internal database error")
            .with_field("table", "users")
            .caused_by(Refused);

        assert_eq!(
            err.render(),
            r#"[database:DB-500] internal database error [fields:{"table":"users"}]: connection refused"#
        );
    }

    #[test]
    fn test_source_exposes_cause() {
        let err = AppError::new("svc", "C1", "msg").caused_by(Refused);
        let source = err.source().expect("cause should be the source");
        assert!(source.downcast_ref::<Refused>().is_some());
        assert!(err.cause().is_some());
    }

    #[test]
    fn test_find_in_chain_skips_foreign_links() {
        let inner = AppError::new("svc", "INNER", "inner");
        let outer = AppError::new("svc", "OUTER", "outer").caused_by(inner);

        let found = AppError::find_in_chain(&outer).expect("outer is an AppError");
        assert_eq!(found.code(), "OUTER");

        let source = outer.source().expect("has a source");
        assert_eq!(AppError::find_in_chain(source).map(AppError::code), Some("INNER"));
    }

    #[test]
    fn test_chain_outlives_each_link() {
        let err = AppError::new("api", "OUTER", "outer")
            .caused_by(AppError::new("db", "INNER", "inner").caused_by(Refused));

        let links: Vec<&(dyn StdError + 'static)> = chain(&err).collect();

        assert_eq!(links.len(), 3);
        assert!(links[2].downcast_ref::<Refused>().is_some());
        assert!(AppError::chain_matches(&err, &AppError::new("db", "INNER", "")));
    }

    #[test]
    fn test_empty_correlation_id_is_absent() {
        let err = AppError::new("svc", "C1", "msg").with_correlation_id("");
        assert!(err.correlation_id().is_none());

        let ctx = RequestContext::new().with_trace_id("");
        assert!(err.resolve_correlation_id(&ctx).is_none());
    }

    #[test]
    fn test_app_error_is_send_sync() {
        fn assert_send_sync_static<T: Send + Sync + 'static>() {}
        assert_send_sync_static::<AppError>();
    }
}
