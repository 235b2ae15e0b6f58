//! Physical dimensions used when turning a grid into solids.

use std::str::FromStr;

/// Dimensions of the surrounding frame box.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FrameSettings {
    /// Wall thickness around the cavity.
    pub wall_mm: f64,
    /// Clearance between the tile lattice and the cavity wall.
    pub tolerance_mm: f64,
}

impl Default for FrameSettings {
    fn default() -> Self {
        Self {
            wall_mm: 3.0,
            tolerance_mm: 0.5,
        }
    }
}

/// Tile, gap and frame dimensions in millimeters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GridSettings {
    pub tile_height_mm: f64,
    pub tile_side_mm: f64,
    pub gap_mm: f64,
    /// Render tolerance for coplanar faces in OpenSCAD previews.
    pub eps: f64,
    /// Emit a frame around the grid when set.
    pub frame: Option<FrameSettings>,
    /// Only synthesize the top-left window of this many tiles.
    pub tile_limit: Option<(usize, usize)>,
}

impl GridSettings {
    /// Needs 4 Ender 3 printer beds for the field without frame.
    pub const LARGE: Self = Self {
        tile_height_mm: 6.0,
        tile_side_mm: 6.0,
        gap_mm: 0.5,
        eps: 0.01,
        frame: None,
        tile_limit: None,
    };

    /// Just fits on an Ender 3 printer bed.
    pub const SMALL: Self = Self {
        tile_height_mm: 3.6,
        tile_side_mm: 3.6,
        gap_mm: 0.5,
        eps: 0.01,
        frame: None,
        tile_limit: None,
    };

    /// Distance between the origins of neighboring tiles.
    #[inline]
    pub fn pitch_mm(&self) -> f64 {
        self.tile_side_mm + self.gap_mm
    }
}

impl Default for GridSettings {
    fn default() -> Self {
        Self::LARGE
    }
}

/// Named settings presets selectable from the command line.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Preset {
    #[default]
    Large,
    Small,
}

impl Preset {
    pub fn settings(self) -> GridSettings {
        match self {
            Preset::Large => GridSettings::LARGE,
            Preset::Small => GridSettings::SMALL,
        }
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "large" => Ok(Preset::Large),
            "small" => Ok(Preset::Small),
            other => Err(format!("unknown preset '{other}', expected 'large' or 'small'")),
        }
    }
}
