//! Movement and collision engine for a single play session.
//!
//! The [`Engine`] owns the parsed [`Grid`] and the player position. The position stays unresolved
//! until the first render pass finds the spawn marker, and every accepted move changes exactly one
//! axis by one cell.

use log::{debug, trace};

use crate::map::{Cell, Grid, Position};

/// Character drawn at the player position.
pub const PLAYER_GLYPH: char = '!';

/// One-cell step the player can take.
///
/// This enumeration holds the four directions the movement keys map to. Every direction changes
/// exactly one axis of a [`Position`] by one cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Towards row zero.
    ///
    /// This variant represents a step to the row above the current one.
    Up,
    /// Away from row zero.
    ///
    /// This variant represents a step to the row below the current one.
    Down,
    /// Towards column zero.
    ///
    /// This variant represents a step to the column left of the current one.
    Left,
    /// Away from column zero.
    ///
    /// This variant represents a step to the column right of the current one.
    Right,
}

impl Direction {
    /// Returns the neighbour of `from` in this direction.
    ///
    /// [`None`] means the step would leave the coordinate space entirely, which callers treat as
    /// out of bounds.
    pub const fn step(self, from: Position) -> Option<Position> {
        let (col, row) = match self {
            Self::Up => (Some(from.col), from.row.checked_sub(1)),
            Self::Down => (Some(from.col), from.row.checked_add(1)),
            Self::Left => (from.col.checked_sub(1), Some(from.row)),
            Self::Right => (from.col.checked_add(1), Some(from.row)),
        };

        match (col, row) {
            (Some(col), Some(row)) => Some(Position::new(col, row)),
            _ => None,
        }
    }
}

/// Input understood by the engine.
///
/// The front end translates key presses into commands, so the engine never sees terminal events
/// directly.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Command {
    /// Try to move the player one cell.
    ///
    /// The move is dropped silently when the target cell collides.
    Move(Direction),
    /// Leave the session.
    ///
    /// This variant moves the session to [`SessionState::Exit`] for good.
    Quit,
}

/// Phase of a play session.
///
/// This enumeration holds the state the front end inspects after every frame to decide whether to
/// show the finish banner or to leave the in-game screen.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum SessionState {
    /// The player is somewhere other than a finish cell.
    ///
    /// Every session starts in this state.
    #[default]
    Playing,
    /// The player stands on a finish cell.
    ///
    /// Re-evaluated every frame, so walking off the finish goes back to [`SessionState::Playing`].
    Finished,
    /// The session was quit.
    ///
    /// This state is terminal: moves are ignored and the finish state is no longer re-evaluated.
    Exit,
}

/// Grid game engine.
///
/// This structure holds everything a play session needs: the immutable map, the player position
/// and the session phase. The front end drives it with [`Engine::handle`] and draws the rows
/// returned by [`Engine::render_rows`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Engine {
    /// Map being played. Never modified.
    grid: Grid,
    /// Player position, unresolved until the first render finds a [`Cell::Player`].
    player: Option<Position>,
    /// Current phase of the session.
    state: SessionState,
}

impl Engine {
    /// Starts a session on `grid` with the player position unresolved.
    pub const fn new(grid: Grid) -> Self {
        Self {
            grid,
            player: None,
            state: SessionState::Playing,
        }
    }

    /// Returns the map being played.
    pub const fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Returns the player position, if it has been resolved.
    pub const fn player(&self) -> Option<Position> {
        self.player
    }

    /// Returns the current phase of the session.
    pub const fn state(&self) -> SessionState {
        self.state
    }

    /// Prepares a frame and returns its rows.
    ///
    /// The player position is resolved from the first [`Cell::Player`] in row-major order if it is
    /// still unknown, and the finish state is re-evaluated. The rows are produced lazily, one
    /// character per cell, with [`PLAYER_GLYPH`] drawn over whatever cell the player stands on.
    pub fn render_rows(&mut self) -> impl Iterator<Item = String> + '_ {
        if self.player.is_none() {
            self.player = self.grid.find(Cell::Player);
            if let Some(player) = self.player {
                debug!("player spawn resolved at {player:?}");
            }
        }
        self.refresh_state();

        let player = self.player;
        self.grid.rows().enumerate().map(move |(row, cells)| {
            cells
                .iter()
                .enumerate()
                .map(|(col, cell)| {
                    if player == Some(Position::new(col, row)) {
                        PLAYER_GLYPH
                    } else {
                        cell.glyph()
                    }
                })
                .collect()
        })
    }

    /// Moves the player one cell unless the target collides.
    ///
    /// Does nothing while the position is unresolved or after the session was quit.
    pub fn apply_move(&mut self, direction: Direction) {
        if self.state == SessionState::Exit {
            return;
        }
        let Some(from) = self.player else {
            return;
        };

        match direction.step(from) {
            Some(target) if !self.is_collision(target) => {
                trace!("player moved {direction:?} to {target:?}");
                self.player = Some(target);
                self.refresh_state();
            }
            _ => trace!("player blocked moving {direction:?} from {from:?}"),
        }
    }

    /// Returns whether the player may not enter `target`.
    ///
    /// Positions outside the grid collide, as do [`Cell::Wall`] and [`Cell::Barrier`].
    pub fn is_collision(&self, target: Position) -> bool {
        self.grid.get(target).is_none_or(Cell::is_collidable)
    }

    /// Ends the session.
    pub fn quit(&mut self) {
        debug!("session quit");
        self.state = SessionState::Exit;
    }

    /// Applies one command.
    pub fn handle(&mut self, command: Command) {
        match command {
            Command::Move(direction) => self.apply_move(direction),
            Command::Quit => self.quit(),
        }
    }

    /// Recomputes whether the player stands on a finish cell.
    fn refresh_state(&mut self) {
        if self.state == SessionState::Exit {
            return;
        }

        let on_finish = self
            .player
            .and_then(|player| self.grid.get(player))
            .is_some_and(|cell| cell == Cell::Finish);
        let state = if on_finish {
            SessionState::Finished
        } else {
            SessionState::Playing
        };

        if state != self.state {
            debug!("session state changed to {state:?}");
        }
        self.state = state;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::{parse_with_dialect, Dialect};

    /// Builds an engine from the rows of a version 1.1 map body.
    fn engine(rows: &[&str]) -> Engine {
        let mut lines = vec!["?Map 1.1;", "(map: begin)"];
        lines.extend_from_slice(rows);
        lines.push("(map: end)");

        let grid = parse_with_dialect(&lines, Dialect::new("?Map 1.1;", true))
            .expect("test map should parse");
        Engine::new(grid)
    }

    /// Renders a frame into owned rows.
    fn frame(engine: &mut Engine) -> Vec<String> {
        engine.render_rows().collect()
    }

    #[test]
    fn test_documented_walkthrough() {
        let mut engine = engine(&["!. =", "@@@"]);
        assert_eq!(engine.player(), None);

        assert_eq!(frame(&mut engine), vec!["!  =", "@@@ "]);
        assert_eq!(engine.player(), Some(Position::new(0, 0)));
        assert_eq!(engine.state(), SessionState::Playing);

        engine.apply_move(Direction::Right);
        engine.apply_move(Direction::Right);
        let _ = frame(&mut engine);
        assert_eq!(engine.player(), Some(Position::new(2, 0)));
        assert_eq!(engine.state(), SessionState::Playing);

        engine.apply_move(Direction::Right);
        assert_eq!(frame(&mut engine), vec!["   !", "@@@ "]);
        assert_eq!(engine.player(), Some(Position::new(3, 0)));
        assert_eq!(engine.state(), SessionState::Finished);
    }

    #[test]
    fn test_moves_ignored_before_first_render() {
        let mut engine = engine(&["! "]);

        engine.apply_move(Direction::Right);

        assert_eq!(engine.player(), None);
    }

    #[test]
    fn test_walls_and_barriers_block() {
        let mut engine = engine(&[" * ", "@!@", "   "]);
        let _ = frame(&mut engine);

        engine.apply_move(Direction::Up);
        engine.apply_move(Direction::Left);
        engine.apply_move(Direction::Right);

        assert_eq!(engine.player(), Some(Position::new(1, 1)));
    }

    #[test]
    fn test_out_of_bounds_blocks() {
        let mut engine = engine(&["!"]);
        let _ = frame(&mut engine);

        for direction in [
            Direction::Up,
            Direction::Down,
            Direction::Left,
            Direction::Right,
        ] {
            engine.apply_move(direction);
            assert_eq!(engine.player(), Some(Position::new(0, 0)));
        }
    }

    #[test]
    fn test_walkable_cells() {
        let mut engine = engine(&["!x.#="]);
        let _ = frame(&mut engine);

        for col in 1..=4 {
            engine.apply_move(Direction::Right);
            assert_eq!(engine.player(), Some(Position::new(col, 0)));
        }
        assert_eq!(engine.state(), SessionState::Finished);
    }

    #[test]
    fn test_padding_is_walkable() {
        let mut engine = engine(&["!  ", "@"]);
        let _ = frame(&mut engine);

        engine.apply_move(Direction::Right);
        engine.apply_move(Direction::Down);

        assert_eq!(engine.player(), Some(Position::new(1, 1)));
    }

    #[test]
    fn test_is_collision() {
        let engine = engine(&["@*#", "x=."]);

        assert!(engine.is_collision(Position::new(0, 0)));
        assert!(engine.is_collision(Position::new(1, 0)));
        assert!(!engine.is_collision(Position::new(2, 0)));
        assert!(!engine.is_collision(Position::new(0, 1)));
        assert!(!engine.is_collision(Position::new(1, 1)));
        assert!(!engine.is_collision(Position::new(2, 1)));
        assert!(engine.is_collision(Position::new(3, 0)));
        assert!(engine.is_collision(Position::new(0, 2)));
    }

    #[test]
    fn test_leaving_finish_reverts_to_playing() {
        let mut engine = engine(&["!="]);
        let _ = frame(&mut engine);

        engine.apply_move(Direction::Right);
        let _ = frame(&mut engine);
        assert_eq!(engine.state(), SessionState::Finished);

        engine.apply_move(Direction::Left);
        let _ = frame(&mut engine);
        assert_eq!(engine.state(), SessionState::Playing);
    }

    #[test]
    fn test_only_first_player_seeds_position() {
        let mut engine = engine(&["..", ".!", "!."]);

        assert_eq!(frame(&mut engine), vec!["  ", " !", "  "]);
        assert_eq!(engine.player(), Some(Position::new(1, 1)));

        engine.apply_move(Direction::Left);
        assert_eq!(frame(&mut engine), vec!["  ", "! ", "  "]);
        assert_eq!(engine.player(), Some(Position::new(0, 1)));
    }

    #[test]
    fn test_render_table() {
        let mut engine = engine(&["x.!=@#*"]);

        assert_eq!(frame(&mut engine), vec!["? !=@@ "]);
    }

    #[test]
    fn test_map_without_player() {
        let mut engine = engine(&["@ ="]);

        assert_eq!(frame(&mut engine), vec!["@ ="]);
        engine.apply_move(Direction::Left);

        assert_eq!(engine.player(), None);
        assert_eq!(engine.state(), SessionState::Playing);
    }

    #[test]
    fn test_quit_is_terminal() {
        let mut engine = engine(&["!="]);
        let _ = frame(&mut engine);

        engine.handle(Command::Quit);
        assert_eq!(engine.state(), SessionState::Exit);

        engine.handle(Command::Move(Direction::Right));
        let _ = frame(&mut engine);
        assert_eq!(engine.player(), Some(Position::new(0, 0)));
        assert_eq!(engine.state(), SessionState::Exit);
    }

    #[test]
    fn test_quit_from_finished() {
        let mut engine = engine(&["!="]);
        let _ = frame(&mut engine);
        engine.handle(Command::Move(Direction::Right));
        assert_eq!(engine.state(), SessionState::Finished);

        engine.handle(Command::Quit);

        assert_eq!(engine.state(), SessionState::Exit);
    }

    #[test]
    fn test_direction_step() {
        let origin = Position::new(0, 0);

        assert_eq!(Direction::Up.step(origin), None);
        assert_eq!(Direction::Left.step(origin), None);
        assert_eq!(Direction::Down.step(origin), Some(Position::new(0, 1)));
        assert_eq!(Direction::Right.step(origin), Some(Position::new(1, 0)));
        assert_eq!(
            Direction::Right.step(Position::new(usize::MAX, 3)),
            None
        );
    }
}
