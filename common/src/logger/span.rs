use tracing::{Level, Span};

use super::TraceId;

/// Create a root span for one monitoring pass / batch job
pub fn pass_span(name: &'static str, trace_id: &TraceId) -> Span {
    tracing::span!(Level::INFO, "pass", job = name, trace_id = %trace_id)
}

/// Create a child span (inherits trace_id automatically)
pub fn child_span(name: &'static str) -> Span {
    tracing::span!(Level::INFO, "step", step = name)
}
