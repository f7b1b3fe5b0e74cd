use crate::{
    audit::{AuditEvent, AuditLogger},
    domain::RequestContext,
    errors::Error,
};

/// Log a failure that escaped an update handler.
///
/// Nothing is retried and the user is not notified beyond what the handler
/// already sent; the failure stays scoped to this one update.
pub async fn report(
    audit: &AuditLogger,
    ctx: &RequestContext,
    operation: &str,
    input: &str,
    err: &Error,
) {
    tracing::error!(
        operation,
        input,
        chat_id = ctx.chat_id.0,
        user_id = ctx.user_id.0,
        error = %err,
        "update handler failed"
    );
    audit
        .record(AuditEvent::error(ctx, operation, input, &err.to_string()))
        .await;
}
