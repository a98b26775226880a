//! This crate contains the source code for the binary for the game PWSandbox.Tui.

#![expect(
    clippy::cargo_common_metadata,
    reason = "Temporary allow during development."
)]
#![expect(
    unused_crate_dependencies,
    reason = "The dependencies are used in the library crate."
)]

use clap::Parser as _;
use color_eyre::{eyre::Result, install};
use pwsandbox_tui::{
    config::{init_logger, Cli},
    file_loader,
    game::Engine,
    App,
};

fn main() -> Result<()> {
    install()?;

    let cli = Cli::parse();
    init_logger(cli.log_file.as_deref())?;

    let mut app = match &cli.map_file {
        None => App::new(cli.format_version),
        Some(path) => match file_loader::load_map(path, cli.format_version) {
            Ok(grid) => App::with_engine(Engine::new(grid)),
            Err(err) => {
                eprintln!("{}", err.user_message());
                return Ok(());
            }
        },
    };

    let mut terminal = ratatui::init();
    let result = app.run(&mut terminal);
    ratatui::restore();

    result
}
