//! Constructors for response envelope statuses

use super::proto::{Code, RpcStatus};
use opentelemetry::trace::TraceContextExt;
use std::error::Error;
use tracing_opentelemetry::OpenTelemetrySpanExt;

/// Successful status
pub fn new_ok() -> RpcStatus {
    RpcStatus {
        code: Code::Ok as i32,
        message: String::new(),
        trace: current_trace(),
    }
}

/// Not-found status with a caller-supplied message
pub fn new_not_found(msg: impl Into<String>) -> RpcStatus {
    RpcStatus {
        code: Code::NotFound as i32,
        message: msg.into(),
        trace: current_trace(),
    }
}

/// Internal status for a failure that happened on this side of the wire.
///
/// The cause is logged and embedded in the message. Never fails.
pub fn new_internal(err: &dyn Error, msg: &str) -> RpcStatus {
    let message = format!("{}: {}", msg, err);
    tracing::error!(error = %err, "{}", msg);

    RpcStatus {
        code: Code::Internal as i32,
        message,
        trace: current_trace(),
    }
}

/// True only for a present status with code `Ok`
pub fn is_ok(status: Option<&RpcStatus>) -> bool {
    status.is_some_and(|s| s.code() == Code::Ok)
}

/// Trace id of the current span, empty when no trace is being recorded
fn current_trace() -> String {
    let context = tracing::Span::current().context();
    let span = context.span();
    let span_context = span.span_context();

    if span_context.is_valid() {
        span_context.trace_id().to_string()
    } else {
        String::new()
    }
}
