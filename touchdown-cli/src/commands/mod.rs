//! CLI command implementations.

pub mod common;
pub mod render;
pub mod replay;
pub mod settings;
