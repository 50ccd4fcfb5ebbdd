//! Utility functions and helpers

pub mod settings;

pub use settings::{resolve_token, Settings};
