//! Risk profiling and investment proposal engine.
//!
//! [`workflows::profiling`] holds the pure scoring → matching → assembly pipeline;
//! [`workflows::holdings`] imports instrument universes from CSV exports. Configuration,
//! telemetry, and the application error type sit alongside for the service wrapper.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
