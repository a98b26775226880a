//! File loading utilities for map files.

use std::{
    fmt, fs,
    io::{self, ErrorKind},
    path::{Path, PathBuf},
};

use log::{info, warn};

use crate::{
    map::Grid,
    parser::{self, FormatVersion, ParseError},
};

/// Extension of map files, without the leading dot.
pub const MAP_EXTENSION: &str = "pws_map";

/// Byte-order mark some editors write at the start of UTF-8 files.
const BYTE_ORDER_MARK: char = '\u{feff}';

/// Reasons a map file cannot be turned into a grid.
#[derive(Debug)]
pub enum LoadError {
    /// Nothing exists at the path.
    FileNotFound(PathBuf),
    /// The path is empty, malformed or does not name a regular file.
    PathInvalid(PathBuf),
    /// The file exists but could not be read.
    Io(io::Error),
    /// The file was read but its contents are not a valid map.
    Format(ParseError),
}

impl LoadError {
    /// Returns the plain-language explanation shown to the player.
    ///
    /// Format errors carry the detailed parser message for map authors.
    pub fn user_message(&self) -> String {
        match self {
            Self::FileNotFound(_) => "This file does not exist.".to_owned(),
            Self::PathInvalid(_) => "Please enter a valid path of the map file.".to_owned(),
            Self::Format(ParseError::EmptyInput) => {
                "The file you selected is empty and does not contain a valid PWSandbox map."
                    .to_owned()
            }
            Self::Format(err) => format!(
                "Map file is not valid!\n\
                 It's either made for a newer version of PWSandbox or just written incorrectly.\n\
                 \n\
                 Contact the map maker and let them know about this problem.\n\
                 (If you are the map maker and the map file is being loaded with the right version \
                 of PWSandbox, then the map file is written in a wrong way. Check the detailed \
                 message.)\n\
                 \n\
                 Detailed message: \"{err}\""
            ),
            Self::Io(_) => "An error occurred when reading this file. Please check it's not \
                            blocked by anything."
                .to_owned(),
        }
    }
}

impl fmt::Display for LoadError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FileNotFound(path) => {
                write!(formatter, "map file {} does not exist", path.display())
            }
            Self::PathInvalid(path) => {
                write!(formatter, "invalid map file path {:?}", path.display())
            }
            Self::Io(err) => write!(formatter, "failed to read map file: {err}"),
            Self::Format(err) => write!(formatter, "invalid map file: {err}"),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(err) => Some(err),
            Self::Format(err) => Some(err),
            Self::FileNotFound(_) | Self::PathInvalid(_) => None,
        }
    }
}

impl From<ParseError> for LoadError {
    fn from(err: ParseError) -> Self {
        Self::Format(err)
    }
}

/// Reads a map file and parses it.
///
/// With `version` set to [`None`] the format version is detected from the header. A leading
/// byte-order mark is skipped, and bytes that are not valid UTF-8 are decoded as U+FFFD, which the
/// parser turns into [`Cell::Unknown`](crate::map::Cell::Unknown) cells.
///
/// # Errors
///
/// - [`LoadError::PathInvalid`] if the path is blank or names a directory
/// - [`LoadError::FileNotFound`] if nothing exists at the path
/// - [`LoadError::Io`] if reading fails for any other reason
/// - [`LoadError::Format`] if the contents are not a valid map
pub fn load_map(path: &Path, version: Option<FormatVersion>) -> Result<Grid, LoadError> {
    let result = read_map(path, version);

    match &result {
        Ok(grid) => info!(
            "loaded {}x{} map from {}",
            grid.width(),
            grid.height(),
            path.display()
        ),
        Err(err) => warn!("failed to load map from {}: {err}", path.display()),
    }

    result
}

/// Does the work of [`load_map`] without logging.
fn read_map(path: &Path, version: Option<FormatVersion>) -> Result<Grid, LoadError> {
    if path.as_os_str().to_string_lossy().trim().is_empty() || path.is_dir() {
        return Err(LoadError::PathInvalid(path.to_path_buf()));
    }

    let bytes = fs::read(path).map_err(|err| match err.kind() {
        ErrorKind::NotFound => LoadError::FileNotFound(path.to_path_buf()),
        ErrorKind::InvalidInput => LoadError::PathInvalid(path.to_path_buf()),
        _ => LoadError::Io(err),
    })?;

    let decoded = String::from_utf8_lossy(&bytes);
    let contents: &str = &decoded;
    let contents = contents.strip_prefix(BYTE_ORDER_MARK).unwrap_or(contents);

    Ok(parser::parse_str(contents, version)?)
}

/// Lists the map files in a directory.
///
/// Only regular files with the [`MAP_EXTENSION`] extension are returned, sorted by path.
///
/// # Errors
///
/// This function returns an error if the directory or one of its entries cannot be read.
pub fn discover_maps(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut maps = Vec::new();

    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();

        if entry.file_type()?.is_file()
            && path
                .extension()
                .is_some_and(|extension| extension == MAP_EXTENSION)
        {
            maps.push(path);
        }
    }

    maps.sort();
    Ok(maps)
}
