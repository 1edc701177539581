//! Exported library files

pub mod error;
pub mod json;
