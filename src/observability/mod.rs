//! Observability infrastructure: structured tracing to stderr.

pub mod tracing;
