//! # Module: TUI Widgets
//!
//! ## Responsibility
//! Individual rendering widgets for each console section. Each widget is a
//! pure function that takes app state and a layout rect, and renders into a
//! frame.
//!
//! ## Guarantees
//! - All widgets handle zero-data gracefully (empty state rendering)
//! - No widget panics on any input range

pub mod controls;
pub mod log;
pub mod summary;
