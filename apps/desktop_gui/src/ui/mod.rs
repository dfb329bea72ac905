//! UI layer for desktop GUI: the demo app shell and its panels.

pub mod app;

pub use app::DemoApp;
