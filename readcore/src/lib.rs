//! readcore — shared library for the ebook reader

pub mod logging;
pub mod prefs;
pub mod storage;
pub mod theme;

pub use prefs::ThemePreferences;
pub use theme::ThemeState;
