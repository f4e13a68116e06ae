//! UI layer for desktop GUI: the issue list screen and its modals.

pub mod app;

pub use app::DesktopGuiApp;
