//! Core application state and main loop.

use color_eyre::eyre::Result;
use log::info;
use ratatui::DefaultTerminal;

use crate::{events, game::Engine, parser::FormatVersion, types::Screen, ui};

/// Application state container for the game.
///
/// This structure holds the state of the application, which is to say the structure from which
/// Ratatui will render the game and Crossterm events will help writing to.
#[derive(Debug)]
pub struct App {
    /// Application exit flag.
    ///
    /// This field indicates whether the application should exit. It is set to `true` when the user
    /// quits from the main menu, or leaves a map that was given on the command line.
    pub(crate) exit: bool,
    /// Current screen being displayed to the user.
    pub(crate) screen: Screen,
    /// Format version forced on every map loaded, or [`None`] to detect it from the header.
    pub(crate) format_version: Option<FormatVersion>,
    /// Whether leaving the game exits the application instead of going back to the main menu.
    pub(crate) exit_after_game: bool,
}

impl Default for App {
    fn default() -> Self {
        Self::new(None)
    }
}

impl App {
    /// Creates an application that opens on the main menu.
    ///
    /// Every map loaded from the menu is parsed with `format_version`, or with the version named in
    /// its header when that is [`None`].
    pub const fn new(format_version: Option<FormatVersion>) -> Self {
        Self {
            exit: false,
            screen: Screen::MainMenu,
            format_version,
            exit_after_game: false,
        }
    }

    /// Creates an application that opens straight into a session.
    ///
    /// Leaving that session exits the application.
    pub const fn with_engine(engine: Engine) -> Self {
        Self {
            exit: false,
            screen: Screen::InGame(engine),
            format_version: None,
            exit_after_game: true,
        }
    }

    /// Runs the main loop of the application.
    ///
    /// This function draws a frame and then blocks until the next key press, over and over, until
    /// the exit condition is `true`.
    ///
    /// # Errors
    ///
    /// - [`std::io::Error`]
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> Result<()> {
        while !self.exit {
            let _ = terminal.draw(|frame| ui::draw(self, frame))?;
            events::handle_events(self)?;
        }

        Ok(())
    }

    /// Ends the current session, going back to the main menu or exiting.
    pub(crate) fn leave_game(&mut self) {
        if self.exit_after_game {
            info!("session over, exiting");
            self.exit = true;
        } else {
            info!("session over, back to the main menu");
            self.screen = Screen::MainMenu;
        }
    }
}
