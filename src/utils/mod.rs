//! Shared helpers.

pub mod date;
pub mod minify;
