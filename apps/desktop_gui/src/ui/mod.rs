//! UI layer for the desktop app: app shell, routing, and the three screens.

pub mod app;

pub use app::DirectoryApp;
