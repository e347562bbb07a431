//! Canonical logging macros

/// Log an [`AppError`](crate::AppError) as one `error`-level event
///
/// Emits `err.service`, `err.code`, `err.message`, the outward `grpc.code`,
/// and `trace_id` when one can be resolved (from the optional request
/// context first, then from the error itself). With a context, the local
/// `request_id` is emitted too.
///
/// # Example
///
/// ```
/// use apperr_core::{log_app_error, AppError, RequestContext};
///
/// let err = AppError::new("user-service", "US-404", "user not found");
/// log_app_error!("get_user", err);
///
/// let ctx = RequestContext::new().with_trace_id("abc");
/// log_app_error!("get_user", err, &ctx);
/// ```
#[macro_export]
macro_rules! log_app_error {
    ($op:expr, $err:expr) => {{
        let app_err: &$crate::AppError = &$err;
        $crate::__tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::schema::EVENT_ERROR,
            { $crate::schema::FIELD_ERR_SERVICE } = app_err.service(),
            { $crate::schema::FIELD_ERR_CODE } = app_err.code(),
            { $crate::schema::FIELD_ERR_MESSAGE } = app_err.message(),
            { $crate::schema::FIELD_GRPC_CODE } = %$crate::codec::outward_code(app_err.transport_code()),
            { $crate::schema::FIELD_TRACE_ID } = app_err.correlation_id().map(|id| id.as_str()),
        );
    }};
    ($op:expr, $err:expr, $ctx:expr) => {{
        let app_err: &$crate::AppError = &$err;
        let ctx: &$crate::RequestContext = $ctx;
        $crate::__tracing::error!(
            component = module_path!(),
            op = $op,
            event = $crate::schema::EVENT_ERROR,
            { $crate::schema::FIELD_ERR_SERVICE } = app_err.service(),
            { $crate::schema::FIELD_ERR_CODE } = app_err.code(),
            { $crate::schema::FIELD_ERR_MESSAGE } = app_err.message(),
            { $crate::schema::FIELD_GRPC_CODE } = %$crate::codec::outward_code(app_err.transport_code()),
            { $crate::schema::FIELD_REQUEST_ID } = ctx.request_id.as_str(),
            { $crate::schema::FIELD_TRACE_ID } = app_err.resolve_correlation_id(ctx).map(|id| id.as_str()),
        );
    }};
}
