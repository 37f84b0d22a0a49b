//! GUI panels and application state.

pub mod app;
pub mod components;
pub mod moves_panel;
pub mod scan_panel;

pub use app::App;
