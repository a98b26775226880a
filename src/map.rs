//! Map data module.
//!
//! This module contains the [`Cell`] enumeration, the [`Position`] coordinate type and the [`Grid`]
//! structure that holds a parsed map for the lifetime of a play session.

/// Semantic type of a single map position.
///
/// Each variant is produced by the parser from one glyph of the map body. The render and collision
/// tables below match on every variant, so adding one forces both tables to be revisited.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Cell {
    /// Unrecognized glyph.
    ///
    /// A walkable placeholder rather than a parse failure.
    Unknown,
    /// Walkable empty space.
    ///
    /// This is also the value of every position a short row never reached.
    #[default]
    Void,
    /// Player spawn marker.
    ///
    /// The first one in row-major order is where the player starts. The cell itself renders as
    /// empty space once the player has left it.
    Player,
    /// Goal marker.
    ///
    /// Standing on any finish cell puts the session in its finished state.
    Finish,
    /// Impassable, visible wall.
    ///
    /// This variant represents the ordinary building block of a maze.
    Wall,
    /// Wall look-alike.
    ///
    /// Renders exactly like [`Cell::Wall`] but the engine lets the player walk through it.
    FakeWall,
    /// Impassable wall that renders as empty space.
    ///
    /// This variant represents an invisible obstacle the player only notices by bumping into it.
    Barrier,
}

impl Cell {
    /// Returns the character drawn for this cell when the player is not standing on it.
    pub const fn glyph(self) -> char {
        match self {
            Self::Unknown => '?',
            Self::Void | Self::Player | Self::Barrier => ' ',
            Self::Finish => '=',
            Self::Wall | Self::FakeWall => '@',
        }
    }

    /// Returns whether the player is blocked from entering this cell.
    pub const fn is_collidable(self) -> bool {
        match self {
            Self::Wall | Self::Barrier => true,
            Self::Unknown | Self::Void | Self::Player | Self::Finish | Self::FakeWall => false,
        }
    }
}

/// Column and row coordinates of a map position.
///
/// Positions are plain coordinates and may lie outside any grid. Use [`Grid::contains`] or
/// [`Grid::get`] to check them against a map.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Position {
    /// Zero-based column, growing to the right.
    pub col: usize,
    /// Zero-based row, growing downwards.
    pub row: usize,
}

impl Position {
    /// Builds a position from a column and a row.
    pub const fn new(col: usize, row: usize) -> Self {
        Self { col, row }
    }
}

/// Parsed map as a rectangular, row-major array of cells.
///
/// The dimensions are fixed when the grid is built. Rows shorter than the widest one are padded
/// with [`Cell::Void`].
///
/// A grid never changes after construction. The player position lives in the engine, so the
/// spawn marker stays where the map author put it for the whole session.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Grid {
    /// Number of columns.
    width: usize,
    /// Number of rows.
    height: usize,
    /// Cells stored row after row, `width * height` long.
    cells: Vec<Cell>,
}

impl Grid {
    /// Builds a grid from possibly ragged rows.
    ///
    /// The width is the length of the longest row and every shorter row is padded with
    /// [`Cell::Void`] up to it.
    pub fn from_rows(rows: Vec<Vec<Cell>>) -> Self {
        let width = rows.iter().map(Vec::len).max().unwrap_or_default();
        let height = rows.len();

        let mut cells = Vec::with_capacity(width * height);
        for mut row in rows {
            row.resize(width, Cell::default());
            cells.append(&mut row);
        }

        Self {
            width,
            height,
            cells,
        }
    }

    /// Returns the number of columns.
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Returns the number of rows.
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Returns whether the position lies inside the grid.
    pub const fn contains(&self, position: Position) -> bool {
        position.col < self.width && position.row < self.height
    }

    /// Returns the cell at the position, or [`None`] when it lies outside the grid.
    ///
    /// The bounds check comes first, so a column past the width never wraps into the next row.
    pub fn get(&self, position: Position) -> Option<Cell> {
        if !self.contains(position) {
            return None;
        }

        self.cells
            .get(position.row * self.width + position.col)
            .copied()
    }

    /// Returns the cells of one row.
    pub fn row(&self, row: usize) -> Option<&[Cell]> {
        if row >= self.height {
            return None;
        }

        let start = row * self.width;
        self.cells.get(start..start + self.width)
    }

    /// Iterates over the rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> + '_ {
        (0..self.height).filter_map(|row| self.row(row))
    }

    /// Finds the first position holding `cell`, scanning row by row.
    pub fn find(&self, cell: Cell) -> Option<Position> {
        if self.width == 0 {
            return None;
        }

        self.cells
            .iter()
            .position(|candidate| *candidate == cell)
            .map(|index| Position::new(index % self.width, index / self.width))
    }
}
