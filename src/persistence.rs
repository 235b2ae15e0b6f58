//! File I/O for gap grids.
//!
//! JSON format (keys sorted, two-space indent):
//! - `"horiz"`: `Y` rows of `X + 1` booleans, `true` = gap open
//! - `"vert"`: `X` rows of `Y + 1` booleans, `true` = gap open

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{Error, Result};
use crate::grid::GridModel;

/// On-disk shape of a grid. Field order keeps the keys sorted.
#[derive(Debug, Serialize, Deserialize)]
struct GridFile {
    horiz: Vec<Vec<bool>>,
    vert: Vec<Vec<bool>>,
}

/// Parses a grid from JSON text.
pub fn parse_grid(json: &str) -> Result<GridModel> {
    let file: GridFile =
        serde_json::from_str(json).map_err(|e| Error::Validation(e.to_string()))?;
    GridModel::new(file.horiz, file.vert)
}

/// Serializes a grid to pretty-printed JSON.
pub fn to_json(grid: &GridModel) -> Result<String> {
    let file = GridFile {
        horiz: grid.horizontal().to_vec(),
        vert: grid.vertical().to_vec(),
    };
    let mut json = serde_json::to_string_pretty(&file)?;
    json.push('\n');
    Ok(json)
}

/// Loads and validates a grid file.
pub fn load_grid(path: &Path) -> Result<GridModel> {
    info!(path = %path.display(), "loading grid");
    let json = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let file: GridFile = serde_json::from_str(&json)
        .map_err(|e| Error::Validation(format!("{}: {e}", path.display())))?;
    GridModel::new(file.horiz, file.vert).map_err(|err| match err {
        Error::Validation(message) => {
            Error::Validation(format!("{}: {message}", path.display()))
        }
        other => other,
    })
}

/// Saves a grid file.
pub fn save_grid(grid: &GridModel, path: &Path) -> Result<()> {
    fs::write(path, to_json(grid)?).map_err(|e| Error::io(path, e))?;
    info!(path = %path.display(), "saved grid");
    Ok(())
}
