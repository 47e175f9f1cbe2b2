//! Infrastructure adapters for configuration and template engine integration.

pub mod config;
pub mod templates;
