//! Logger setup.
//!
//! The engine only emits through the `log` facade; binaries call
//! [`init_logging`] once to route it through `env_logger`. On wasm32 the same
//! filter feeds the browser console.

#[cfg(target_arch = "wasm32")]
mod console;
mod init;

pub use init::{init_logging, LoggingConfig};
