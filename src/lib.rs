//! Desk Clock library
//!
//! The clock widget binary and the `validate-hands` utility share everything
//! through this crate: settings, theme storage, hand image processing and the
//! egui front end.

pub mod app;
pub mod backend;
pub mod clock;
pub mod config;
pub mod constant;
pub mod saver;
pub mod style;
pub mod theme;
pub mod ui;
