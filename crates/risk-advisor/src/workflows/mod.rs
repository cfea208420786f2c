pub mod holdings;
pub mod profiling;
