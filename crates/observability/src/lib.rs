//! Process-wide tracing/logging setup.
//!
//! The binary builds a [`LogConfig`] from its own configuration and calls
//! [`init`] once at startup. Nothing in here reads the environment except the
//! standard `RUST_LOG` filter.

pub mod tracing;

pub use self::tracing::{LogConfig, LogFormat, ParseLogFormatError, init};
