//! Observability for Waypost: tracing subscriber setup and OpenTelemetry
//! span export.

pub mod tracing_setup;
