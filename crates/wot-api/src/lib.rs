//! Web of Trust API: authenticate, identify, list and look up bindings,
//! and verify explicit paths.
//!
//! This crate provides:
//! - [`WebOfTrust`]: the facade over a network, its roots and a required amount.
//! - [`Binding`] and [`AuthenticationResult`]: evidence for one binding.
//! - [`PathVerdict`]: the outcome of [`WebOfTrust::check_path`].
//! - [`WotConfig`]: TOML configuration.
//! - [`telemetry::init`]: tracing subscriber setup.

pub mod api;
pub mod binding;
pub mod config;
pub mod telemetry;

// Re-exports for convenience.
pub use api::{PathVerdict, WebOfTrust};
pub use binding::{AuthenticationResult, Binding};
pub use config::{LogFormat, LoggingConfig, QueryConfig, WotConfig};
