pub mod album;
pub mod library;
