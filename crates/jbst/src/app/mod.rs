//! Application layer turning binding descriptors into markup and script.

pub mod data_block;
pub mod render;
pub mod script;
pub mod startup;
