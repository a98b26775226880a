//! Terminal sandbox game played on maps written in the PWSandbox map format.
//!
//! A map file is parsed by [`parser`] into a [`map::Grid`] of typed cells, and a [`game::Engine`]
//! moves the player over that grid until a finish cell is reached or the session is quit. The
//! [`App`] wraps both in a Ratatui front end with a main menu and a map path prompt.

#![expect(
    clippy::cargo_common_metadata,
    reason = "Temporary allow during development."
)]

mod app;
pub mod config;
mod events;
pub mod file_loader;
pub mod game;
pub mod map;
pub mod parser;
mod types;
mod ui;

pub use app::App;
