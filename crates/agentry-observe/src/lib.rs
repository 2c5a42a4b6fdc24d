//! Observability for Agentry.
//!
//! Structured logging via `tracing` with optional OpenTelemetry span export.
//! LLM calls are instrumented at the call site with `gen_ai.*` semantic
//! convention fields; this crate only owns subscriber setup and shutdown.

pub mod tracing_setup;
