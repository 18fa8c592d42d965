#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// filter configuration and validation.
pub mod config;

/// image filtering module.
pub mod filter;

/// module containing parallization utilities.
pub mod parallel;

pub use crate::config::{BorderMode, ConfigError, FilterConfig, Technique};
