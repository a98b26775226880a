//! Event handling functions for user input and application state updates.

use std::path::{Path, PathBuf};

use color_eyre::eyre::Result;
use log::{info, warn};
use ratatui::crossterm::event::{self, Event, KeyCode, KeyEventKind};

use crate::{
    file_loader,
    game::{Command, Direction, Engine, SessionState},
    types::{Prompt, Screen},
    App,
};

/// Blocks until the next key press and applies it to the application state.
///
/// Key releases and repeats reported by some terminals are ignored, so each physical press counts
/// once.
pub(crate) fn handle_events(app: &mut App) -> Result<()> {
    if let Event::Key(key) = event::read()? {
        if key.kind == KeyEventKind::Press {
            handle_key(app, key.code);
        }
    }

    Ok(())
}

/// Dispatches one key press to the handler of the current screen.
pub(crate) fn handle_key(app: &mut App, code: KeyCode) {
    match app.screen {
        Screen::MainMenu => handle_main_menu(app, code),
        Screen::PathPrompt(_) => handle_path_prompt(app, code),
        Screen::LoadFailed(_) => app.screen = Screen::MainMenu,
        Screen::InGame(_) => handle_in_game(app, code),
    }
}

/// Maps a key to the engine command it stands for.
pub(crate) const fn command_for(code: KeyCode) -> Option<Command> {
    match code {
        KeyCode::Char('w' | 'W') | KeyCode::Up => Some(Command::Move(Direction::Up)),
        KeyCode::Char('s' | 'S') | KeyCode::Down => Some(Command::Move(Direction::Down)),
        KeyCode::Char('a' | 'A') | KeyCode::Left => Some(Command::Move(Direction::Left)),
        KeyCode::Char('d' | 'D') | KeyCode::Right => Some(Command::Move(Direction::Right)),
        KeyCode::Esc => Some(Command::Quit),
        _ => None,
    }
}

/// Handles key presses on the main menu.
fn handle_main_menu(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char('m' | 'M') => {
            let suggestions = file_loader::discover_maps(Path::new(".")).unwrap_or_else(|err| {
                warn!("failed to list map files in the working directory: {err}");
                Vec::new()
            });
            app.screen = Screen::PathPrompt(Prompt::new(suggestions));
        }
        KeyCode::Char('q' | 'Q') => app.exit = true,
        _ => {}
    }
}

/// Handles key presses while the user types a map path.
fn handle_path_prompt(app: &mut App, code: KeyCode) {
    let Screen::PathPrompt(prompt) = &mut app.screen else {
        return;
    };

    match code {
        KeyCode::Char(ch) => prompt.push(ch),
        KeyCode::Backspace => prompt.pop(),
        KeyCode::Tab => prompt.complete(),
        KeyCode::Enter => {
            let path = PathBuf::from(&prompt.input);
            start_game(app, &path);
        }
        KeyCode::Esc => app.screen = Screen::MainMenu,
        _ => {}
    }
}

/// Loads the map at `path` and switches to the in-game screen, or to the failure screen.
fn start_game(app: &mut App, path: &Path) {
    app.screen = match file_loader::load_map(path, app.format_version) {
        Ok(grid) => {
            info!("starting a session on {}", path.display());
            Screen::InGame(Engine::new(grid))
        }
        Err(err) => Screen::LoadFailed(err.user_message()),
    };
}

/// Handles key presses during a session.
fn handle_in_game(app: &mut App, code: KeyCode) {
    let Screen::InGame(engine) = &mut app.screen else {
        return;
    };

    if let Some(command) = command_for(code) {
        engine.handle(command);
    }

    if engine.state() == SessionState::Exit {
        app.leave_game();
    }
}

#[cfg(test)]
mod tests {
    use std::{env, fs, process};

    use super::*;
    use crate::{map::Position, parser};

    /// Builds an application in the middle of a session on a small map.
    fn app_in_game() -> App {
        let grid = parser::parse_str(
            "?PWSandbox-Map 1.1;\n(map: begin)\n!.=\n(map: end)",
            None,
        )
        .expect("test map should parse");
        let mut engine = Engine::new(grid);
        let _ = engine.render_rows().count();

        let mut app = App::default();
        app.screen = Screen::InGame(engine);
        app
    }

    /// Returns the player position of the running session.
    fn player(app: &App) -> Option<Position> {
        match &app.screen {
            Screen::InGame(engine) => engine.player(),
            _ => None,
        }
    }

    #[test]
    fn test_command_for_keys() {
        assert_eq!(
            command_for(KeyCode::Char('w')),
            Some(Command::Move(Direction::Up))
        );
        assert_eq!(
            command_for(KeyCode::Char('W')),
            Some(Command::Move(Direction::Up))
        );
        assert_eq!(command_for(KeyCode::Up), Some(Command::Move(Direction::Up)));
        assert_eq!(
            command_for(KeyCode::Down),
            Some(Command::Move(Direction::Down))
        );
        assert_eq!(
            command_for(KeyCode::Char('s')),
            Some(Command::Move(Direction::Down))
        );
        assert_eq!(
            command_for(KeyCode::Char('a')),
            Some(Command::Move(Direction::Left))
        );
        assert_eq!(
            command_for(KeyCode::Left),
            Some(Command::Move(Direction::Left))
        );
        assert_eq!(
            command_for(KeyCode::Char('d')),
            Some(Command::Move(Direction::Right))
        );
        assert_eq!(
            command_for(KeyCode::Right),
            Some(Command::Move(Direction::Right))
        );
        assert_eq!(command_for(KeyCode::Esc), Some(Command::Quit));
        assert_eq!(command_for(KeyCode::Char('x')), None);
        assert_eq!(command_for(KeyCode::Enter), None);
    }

    #[test]
    fn test_main_menu_quit() {
        let mut app = App::default();

        handle_key(&mut app, KeyCode::Char('Q'));

        assert!(app.exit);
    }

    #[test]
    fn test_main_menu_opens_prompt() {
        let mut app = App::default();

        handle_key(&mut app, KeyCode::Char('m'));

        assert!(matches!(app.screen, Screen::PathPrompt(_)));
        assert!(!app.exit);
    }

    #[test]
    fn test_main_menu_ignores_other_keys() {
        let mut app = App::default();

        handle_key(&mut app, KeyCode::Char('x'));
        handle_key(&mut app, KeyCode::Esc);

        assert_eq!(app.screen, Screen::MainMenu);
        assert!(!app.exit);
    }

    #[test]
    fn test_prompt_escape_returns_to_menu() {
        let mut app = App::default();
        app.screen = Screen::PathPrompt(Prompt::default());

        handle_key(&mut app, KeyCode::Esc);

        assert_eq!(app.screen, Screen::MainMenu);
    }

    #[test]
    fn test_prompt_typing() {
        let mut app = App::default();
        app.screen = Screen::PathPrompt(Prompt::default());

        for ch in "abcd".chars() {
            handle_key(&mut app, KeyCode::Char(ch));
        }
        handle_key(&mut app, KeyCode::Backspace);

        let Screen::PathPrompt(prompt) = &app.screen else {
            panic!("expected the path prompt to stay open");
        };
        assert_eq!(prompt.input, "abc");
    }

    #[test]
    fn test_prompt_load_failure() {
        let mut app = App::default();
        app.screen = Screen::PathPrompt(Prompt::default());

        handle_key(&mut app, KeyCode::Enter);

        assert_eq!(
            app.screen,
            Screen::LoadFailed("Please enter a valid path of the map file.".to_owned())
        );

        handle_key(&mut app, KeyCode::Char('z'));
        assert_eq!(app.screen, Screen::MainMenu);
    }

    #[test]
    fn test_prompt_loads_map() {
        let dir = env::temp_dir().join(format!("pwsandbox-{}-events", process::id()));
        fs::create_dir_all(&dir).expect("failed to create scratch directory");
        let path = dir.join("level.pws_map");
        fs::write(&path, "?PWSandbox-Map 1.1;\n(map: begin)\n!=\n(map: end)\n")
            .expect("failed to write map file");

        let mut app = App::default();
        app.screen = Screen::PathPrompt(Prompt::default());
        for ch in path.display().to_string().chars() {
            handle_key(&mut app, KeyCode::Char(ch));
        }
        handle_key(&mut app, KeyCode::Enter);
        let _ = fs::remove_dir_all(&dir);

        assert!(matches!(app.screen, Screen::InGame(_)));
    }

    #[test]
    fn test_in_game_moves() {
        let mut app = app_in_game();

        handle_key(&mut app, KeyCode::Char('d'));
        assert_eq!(player(&app), Some(Position::new(1, 0)));

        handle_key(&mut app, KeyCode::Up);
        assert_eq!(player(&app), Some(Position::new(1, 0)));

        handle_key(&mut app, KeyCode::Right);
        let Screen::InGame(engine) = &app.screen else {
            panic!("expected the session to continue");
        };
        assert_eq!(engine.state(), SessionState::Finished);
    }

    #[test]
    fn test_in_game_escape_returns_to_menu() {
        let mut app = app_in_game();

        handle_key(&mut app, KeyCode::Esc);

        assert_eq!(app.screen, Screen::MainMenu);
        assert!(!app.exit);
    }

    #[test]
    fn test_in_game_escape_exits_direct_session() {
        let mut app = app_in_game();
        app.exit_after_game = true;

        handle_key(&mut app, KeyCode::Esc);

        assert!(app.exit);
    }
}
