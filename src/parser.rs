//! Map format parser.
//!
//! This module turns the lines of a map file into a [`Grid`]. A map file looks like this:
//!
//! ```text
//! ?PWSandbox-Map 1.1;
//! (map: begin)
//! ! . =
//! @@@@@
//! (map: end)
//! ```
//!
//! The header names the format version, the begin and end markers frame the map body, and every
//! character of the body becomes one [`Cell`]. Whitespace-only lines are ignored everywhere, and
//! the framing tokens may share a line with map content.

use std::fmt;

use clap::ValueEnum;
use log::debug;

use crate::map::{Cell, Grid};

/// Name of the map format as written in the header.
pub const FORMAT_NAME: &str = "PWSandbox-Map";

/// Token opening the map body.
pub const BEGIN_MARKER: &str = "(map: begin)";

/// Token closing the map body.
pub const END_MARKER: &str = "(map: end)";

/// Supported versions of the map format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum)]
pub enum FormatVersion {
    /// Version 1.0, where `.` is an unknown glyph.
    #[value(name = "1.0")]
    V1_0,
    /// Version 1.1, which adds `.` as an alias for empty space.
    #[value(name = "1.1")]
    V1_1,
}

impl FormatVersion {
    /// Every supported version, in detection order.
    pub const ALL: [Self; 2] = [Self::V1_0, Self::V1_1];

    /// Returns the header token identifying this version.
    pub const fn header(self) -> &'static str {
        match self {
            Self::V1_0 => "?PWSandbox-Map 1.0;",
            Self::V1_1 => "?PWSandbox-Map 1.1;",
        }
    }

    /// Returns the dialect parsing this version.
    ///
    /// Version 1.0 is parsed by the same algorithm as version 1.1 with the `.` alias turned off.
    pub const fn dialect(self) -> Dialect {
        match self {
            Self::V1_0 => Dialect::new(self.header(), false),
            Self::V1_1 => Dialect::new(self.header(), true),
        }
    }
}

impl fmt::Display for FormatVersion {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V1_0 => write!(formatter, "1.0"),
            Self::V1_1 => write!(formatter, "1.1"),
        }
    }
}

/// Rules that distinguish one format version from another.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Dialect {
    /// Header token expected at the start of the first line.
    pub header: &'static str,
    /// Whether `.` maps to [`Cell::Void`] instead of [`Cell::Unknown`].
    pub dot_is_void: bool,
}

impl Dialect {
    /// Builds a dialect from a header token and the `.` alias flag.
    pub const fn new(header: &'static str, dot_is_void: bool) -> Self {
        Self {
            header,
            dot_is_void,
        }
    }

    /// Maps one glyph of the map body to its cell.
    pub const fn cell_for(self, glyph: char) -> Cell {
        match glyph {
            ' ' => Cell::Void,
            '.' if self.dot_is_void => Cell::Void,
            '!' => Cell::Player,
            '=' => Cell::Finish,
            '@' => Cell::Wall,
            '#' => Cell::FakeWall,
            '*' => Cell::Barrier,
            _ => Cell::Unknown,
        }
    }
}

/// Reasons a map cannot be parsed.
///
/// No grid is produced when any of these is returned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParseError {
    /// The input holds no line with visible content.
    EmptyInput,
    /// The header names the format but a version this parser does not know.
    UnsupportedVersion {
        /// Header text as found in the input.
        found: String,
    },
    /// The first line does not start with the expected header.
    MissingHeader,
    /// No begin marker follows the header.
    MissingBeginMarker,
    /// The last line does not end with the end marker.
    MissingEndMarker,
}

impl fmt::Display for ParseError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyInput => write!(formatter, "map does not contain any content"),
            Self::UnsupportedVersion { found } => {
                write!(formatter, "map header \"{found}\" names an unsupported format version")
            }
            Self::MissingHeader => write!(
                formatter,
                "map doesn't contain a map header or the header is written incorrectly"
            ),
            Self::MissingBeginMarker => write!(
                formatter,
                "expected \"{BEGIN_MARKER}\" block after the map header, but it was not found"
            ),
            Self::MissingEndMarker => write!(
                formatter,
                "expected \"{END_MARKER}\" block at the end of the map, but it was not found"
            ),
        }
    }
}

impl std::error::Error for ParseError {}

/// Detects the format version from the first line of a map.
///
/// The match is a case-insensitive prefix match on the header tokens, and the first match wins.
///
/// # Errors
///
/// - [`ParseError::UnsupportedVersion`] if the line starts with the format name but no known
///   version token
/// - [`ParseError::MissingHeader`] otherwise
pub fn detect_version(first_line: &str) -> Result<FormatVersion, ParseError> {
    let line = first_line.trim_start();

    if let Some(version) = FormatVersion::ALL
        .into_iter()
        .find(|version| strip_prefix_ignore_case(line, version.header()).is_some())
    {
        return Ok(version);
    }

    if line
        .strip_prefix('?')
        .and_then(|rest| strip_prefix_ignore_case(rest, FORMAT_NAME))
        .is_some()
    {
        let found = line
            .find(';')
            .and_then(|end| line.get(..=end))
            .unwrap_or(line);

        return Err(ParseError::UnsupportedVersion {
            found: found.to_owned(),
        });
    }

    Err(ParseError::MissingHeader)
}

/// Parses map lines into a grid.
///
/// With `version` set to [`None`] the version is detected from the header. A forced version skips
/// detection, but the header must still be that version's token.
///
/// # Errors
///
/// This function returns a [`ParseError`] if the input is empty, the version is unsupported or
/// any of the header, begin marker and end marker is missing.
pub fn parse<S: AsRef<str>>(
    lines: &[S],
    version: Option<FormatVersion>,
) -> Result<Grid, ParseError> {
    let version = match version {
        Some(version) => version,
        None => {
            let first = lines
                .iter()
                .map(AsRef::as_ref)
                .find(|line| !is_blank(line))
                .ok_or(ParseError::EmptyInput)?;
            detect_version(first)?
        }
    };
    debug!("parsing map as format version {version}");

    parse_with_dialect(lines, version.dialect())
}

/// Parses map text into a grid, splitting it on line boundaries first.
///
/// # Errors
///
/// This function returns the same errors as [`parse`].
pub fn parse_str(text: &str, version: Option<FormatVersion>) -> Result<Grid, ParseError> {
    let lines: Vec<&str> = text.lines().collect();
    parse(&lines, version)
}

/// Parses map lines with an explicit dialect.
///
/// Blank lines are dropped again before each framing check, so blank lines between the header,
/// the markers and the body never matter.
///
/// # Errors
///
/// - [`ParseError::EmptyInput`] if no line has visible content
/// - [`ParseError::MissingHeader`] if the first line does not start with `dialect.header`
/// - [`ParseError::MissingBeginMarker`] if no begin marker follows the header
/// - [`ParseError::MissingEndMarker`] if the last line does not end with the end marker
pub fn parse_with_dialect<S: AsRef<str>>(
    lines: &[S],
    dialect: Dialect,
) -> Result<Grid, ParseError> {
    let mut lines: Vec<&str> = lines.iter().map(AsRef::as_ref).collect();

    drop_blank(&mut lines);
    let first = lines.first_mut().ok_or(ParseError::EmptyInput)?;
    let line: &str = *first;
    *first = strip_prefix_ignore_case(line.trim_start(), dialect.header)
        .ok_or(ParseError::MissingHeader)?;

    drop_blank(&mut lines);
    let first = lines.first_mut().ok_or(ParseError::MissingBeginMarker)?;
    let line: &str = *first;
    *first = strip_prefix_ignore_case(line.trim_start(), BEGIN_MARKER)
        .ok_or(ParseError::MissingBeginMarker)?;

    drop_blank(&mut lines);
    let last = lines.last_mut().ok_or(ParseError::MissingEndMarker)?;
    let line: &str = *last;
    *last = strip_suffix_ignore_case(line.trim_end(), END_MARKER)
        .ok_or(ParseError::MissingEndMarker)?;
    drop_blank(&mut lines);

    let grid = rasterize(&lines, dialect);
    debug!("parsed {}x{} map", grid.width(), grid.height());

    Ok(grid)
}

/// Maps every character of the body lines to a cell.
fn rasterize(lines: &[&str], dialect: Dialect) -> Grid {
    Grid::from_rows(
        lines
            .iter()
            .map(|line| line.chars().map(|glyph| dialect.cell_for(glyph)).collect())
            .collect(),
    )
}

/// Returns whether the line is empty or holds only whitespace.
fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Removes every blank line in place.
fn drop_blank(lines: &mut Vec<&str>) {
    lines.retain(|line| !is_blank(line));
}

/// Strips `token` from the start of `line`, ignoring ASCII case.
fn strip_prefix_ignore_case<'line>(line: &'line str, token: &str) -> Option<&'line str> {
    let head = line.get(..token.len())?;
    let rest = line.get(token.len()..)?;

    head.eq_ignore_ascii_case(token).then_some(rest)
}

/// Strips `token` from the end of `line`, ignoring ASCII case.
fn strip_suffix_ignore_case<'line>(line: &'line str, token: &str) -> Option<&'line str> {
    let split = line.len().checked_sub(token.len())?;
    let rest = line.get(..split)?;
    let tail = line.get(split..)?;

    tail.eq_ignore_ascii_case(token).then_some(rest)
}
