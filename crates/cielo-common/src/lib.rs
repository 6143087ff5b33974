//! Configuration, shared value types and tracing setup for the cielo crates.
//!
//! This crate sits at the bottom of the workspace: the editor core and the
//! media crate depend on it for [`InsertionMode`] and [`MediaScope`].

pub mod config;
pub mod error;
pub mod scope;
#[cfg(feature = "telemetry")]
pub mod telemetry;

pub use crate::config::{Config, DEFAULT_CONFIG_PATH, InsertionMode};
pub use crate::error::ConfigError;
pub use crate::scope::MediaScope;
