//! Logging for armock: a `tracing` fmt subscriber filtered by `ARMOCK_LOG`.

pub mod setup;

pub use setup::{init_tracing, log_filter};
