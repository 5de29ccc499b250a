//! Tracing subscriber setup
//!
//! Console logging in either human-readable or JSON form, filtered by
//! `RUST_LOG` when set and by the configured filter otherwise.

mod subscriber;

pub use subscriber::{TelemetryError, build_filter, init_tracing};
