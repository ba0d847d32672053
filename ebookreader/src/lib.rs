//! ebookreader - a minimal reader for plain-text books
//!
//! Imported files are copied into app-private storage and read from there.

pub mod app;
pub mod book;
pub mod library;
pub mod source;
pub mod store;
pub mod tasks;

pub const APP_NAME: &str = "ebookreader";
