//! # Module: TUI Console
//!
//! ## Responsibility
//! Interactive terminal front end for the orchestrator using Ratatui: trigger
//! controls, message editing, a scrolling log console and a run summary, in
//! one of three colour themes.
//!
//! ## Guarantees
//! - No panics in any rendering or update path
//! - Clean terminal restore on exit, including on panic (see the console binary)
//! - Graceful resize handling down to 80x24 minimum
//!
//! ## NOT Responsible For
//! - Issuing requests (returns [`app::Action`]s for the orchestrator)
//! - Persisting anything between sessions

pub mod app;
pub mod events;
pub mod theme;
pub mod ui;
pub mod widgets;
