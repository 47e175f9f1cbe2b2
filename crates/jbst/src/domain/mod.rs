//! Core binding types, identifier rules, and errors.

pub mod errors;
pub mod identifier;
pub mod model;
