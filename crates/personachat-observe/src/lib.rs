//! Observability setup for PersonaChat: structured logging through
//! `tracing`, with optional OpenTelemetry span export.

pub mod tracing_setup;
