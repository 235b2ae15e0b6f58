//! Solid geometry synthesis for decomposed grids.
//!
//! Coordinate conventions:
//! - In the puzzle field the top left tile is `(0, 0)`, `+x` is right and
//!   `+y` is down.
//! - In the output the puzzle's top left corner is at the origin, grid `y`
//!   runs along output X and grid `x` along output Y, so that the puzzle's
//!   "down" shows up the right way in the modeling tool's default view.
//! - Tiles sit on a lattice with pitch `tile_side + gap`; the gap before a
//!   tile occupies the `gap` millimeters below its lattice origin.

use tracing::{debug, info};

use crate::coloring::{AdjacencyGraph, Coloring};
use crate::config::{FrameSettings, GridSettings};
use crate::error::Result;
use crate::grid::{GridModel, Tile};
use crate::pieces::Decomposition;
use crate::solid::{self, cube, subtract, union, Rgb, Solid};

/// Color of the frame box around the grid.
pub const FRAME_RGB: Rgb = [0.5, 0.5, 0.5];

/// Solids belonging to one piece, kept apart by kind for debugging.
#[derive(Clone, Debug, PartialEq)]
pub struct PieceGeometry {
    pub piece_id: usize,
    pub rgb: Rgb,
    pub tiles: Vec<Solid>,
    pub bridges: Vec<Solid>,
    pub corners: Vec<Solid>,
}

impl PieceGeometry {
    fn new(piece_id: usize, rgb: Rgb) -> Self {
        Self {
            piece_id,
            rgb,
            tiles: Vec::new(),
            bridges: Vec::new(),
            corners: Vec::new(),
        }
    }

    /// The piece as one colored solid.
    pub fn to_solid(&self) -> Solid {
        let [r, g, b] = self.rgb;
        solid::color(
            r,
            g,
            b,
            union(
                self.tiles
                    .iter()
                    .chain(&self.bridges)
                    .chain(&self.corners)
                    .cloned(),
            ),
        )
    }
}

/// Result of synthesizing one grid.
#[derive(Clone, Debug)]
pub struct SynthesizedGrid {
    pub decomposition: Decomposition,
    pub adjacency: AdjacencyGraph,
    pub coloring: Coloring,
    /// Geometry per piece, indexed by piece ID.
    pub pieces: Vec<PieceGeometry>,
    pub frame: Option<Solid>,
}

impl SynthesizedGrid {
    #[inline]
    pub fn num_tiles_x(&self) -> usize {
        self.decomposition.num_tiles_x()
    }

    #[inline]
    pub fn num_tiles_y(&self) -> usize {
        self.decomposition.num_tiles_y()
    }

    /// One colored solid per piece, indexed by piece ID.
    pub fn piece_solids(&self) -> Vec<Solid> {
        self.pieces.iter().map(PieceGeometry::to_solid).collect()
    }

    /// All pieces and the frame as a single solid.
    pub fn to_solid(&self) -> Solid {
        union(self.piece_solids().into_iter().chain(self.frame.clone()))
    }
}

/// Places tiles, gaps and corners in output space.
struct Lattice {
    pitch: f64,
    side: f64,
    gap: f64,
    height: f64,
}

impl Lattice {
    fn new(settings: &GridSettings) -> Self {
        Self {
            pitch: settings.pitch_mm(),
            side: settings.tile_side_mm,
            gap: settings.gap_mm,
            height: settings.tile_height_mm,
        }
    }

    /// Output-space origin of lattice cell `(x, y)`; note the axis swap.
    #[inline]
    fn origin(&self, x: usize, y: usize) -> (f64, f64) {
        (y as f64 * self.pitch, x as f64 * self.pitch)
    }

    fn tile(&self, (x, y): Tile) -> Result<Solid> {
        let (ox, oy) = self.origin(x, y);
        Ok(cube(self.side, self.side, self.height)?.translated(ox, oy, 0.0))
    }

    /// Bridge for the horizontal gap at lane `y`, offset `x`.
    fn horizontal_bridge(&self, lane: usize, offset: usize) -> Result<Solid> {
        let (ox, oy) = self.origin(offset, lane);
        Ok(cube(self.side, self.gap, self.height)?.translated(ox, oy - self.gap, 0.0))
    }

    /// Bridge for the vertical gap at lane `x`, offset `y`.
    fn vertical_bridge(&self, lane: usize, offset: usize) -> Result<Solid> {
        let (ox, oy) = self.origin(lane, offset);
        Ok(cube(self.gap, self.side, self.height)?.translated(ox - self.gap, oy, 0.0))
    }

    /// Filler for the hole where four gaps meet at corner `(x, y)`.
    fn corner(&self, x: usize, y: usize) -> Result<Solid> {
        let (ox, oy) = self.origin(x, y);
        Ok(cube(self.gap, self.gap, self.height)?.translated(ox - self.gap, oy - self.gap, 0.0))
    }

    /// Box around the whole lattice, boundary gaps included, minus a cavity
    /// with `tolerance` clearance.
    fn frame(
        &self,
        num_tiles_x: usize,
        num_tiles_y: usize,
        frame: &FrameSettings,
        eps: f64,
    ) -> Result<Solid> {
        let (extent_x, extent_y) = self.origin(num_tiles_x, num_tiles_y);
        let cavity_start = -self.gap - frame.tolerance_mm;
        let cavity_x = extent_x - cavity_start + frame.tolerance_mm;
        let cavity_y = extent_y - cavity_start + frame.tolerance_mm;

        let outer = cube(
            cavity_x + 2.0 * frame.wall_mm,
            cavity_y + 2.0 * frame.wall_mm,
            self.height,
        )?
        .translated(
            cavity_start - frame.wall_mm,
            cavity_start - frame.wall_mm,
            0.0,
        );
        let cavity = cube(cavity_x, cavity_y, self.height + 2.0 * eps)?.translated(
            cavity_start,
            cavity_start,
            -eps,
        );

        let [r, g, b] = FRAME_RGB;
        Ok(solid::color(r, g, b, subtract(outer, cavity)))
    }
}

/// Decomposes, colors and builds solids for a grid.
///
/// Honors `settings.tile_limit` by cropping the grid first, and emits a frame
/// when `settings.frame` is set.
pub fn synthesize(grid: &GridModel, settings: &GridSettings) -> Result<SynthesizedGrid> {
    let cropped;
    let grid = match settings.tile_limit {
        Some((max_x, max_y)) => {
            cropped = grid.cropped(max_x, max_y)?;
            &cropped
        }
        None => grid,
    };
    let num_tiles_x = grid.num_tiles_x();
    let num_tiles_y = grid.num_tiles_y();

    let decomposition = Decomposition::new(grid);
    let adjacency = AdjacencyGraph::new(grid, &decomposition);
    let coloring = Coloring::greedy(&adjacency);
    let lattice = Lattice::new(settings);

    let mut pieces: Vec<PieceGeometry> = (0..decomposition.num_pieces())
        .map(|piece_id| PieceGeometry::new(piece_id, coloring.rgb_of(piece_id)))
        .collect();

    for piece in &mut pieces {
        for &tile in decomposition.tiles_of(piece.piece_id) {
            piece.tiles.push(lattice.tile(tile)?);
        }
    }

    // A closed gap belongs to the piece on either side of it; the first and
    // last gap of a lane only have a tile on one side.
    for (y, lane) in grid.horizontal().iter().enumerate() {
        for (x, &open) in lane.iter().enumerate() {
            if !open {
                let piece_id = decomposition.piece_of((x.min(num_tiles_x - 1), y));
                pieces[piece_id].bridges.push(lattice.horizontal_bridge(y, x)?);
            }
        }
    }
    for (x, lane) in grid.vertical().iter().enumerate() {
        for (y, &open) in lane.iter().enumerate() {
            if !open {
                let piece_id = decomposition.piece_of((x, y.min(num_tiles_y - 1)));
                pieces[piece_id].bridges.push(lattice.vertical_bridge(x, y)?);
            }
        }
    }

    // Corner hole fillers, wherever none of the up to four meeting gaps is open.
    for x in 0..=num_tiles_x {
        for y in 0..=num_tiles_y {
            let any_adjacent_gap_open = (y > 0 && grid.horizontal()[y - 1][x])
                || (y < num_tiles_y && grid.horizontal()[y][x])
                || (x > 0 && grid.vertical()[x - 1][y])
                || (x < num_tiles_x && grid.vertical()[x][y]);
            if !any_adjacent_gap_open {
                let owner = (x.saturating_sub(1), y.saturating_sub(1));
                let piece_id = decomposition.piece_of(owner);
                pieces[piece_id].corners.push(lattice.corner(x, y)?);
            }
        }
    }

    let frame = match &settings.frame {
        Some(frame) => Some(lattice.frame(num_tiles_x, num_tiles_y, frame, settings.eps)?),
        None => None,
    };

    let num_bridges: usize = pieces.iter().map(|p| p.bridges.len()).sum();
    let num_corners: usize = pieces.iter().map(|p| p.corners.len()).sum();
    debug!(num_bridges, num_corners, "placed bridges and corner fillers");
    info!(
        num_pieces = pieces.len(),
        num_colors = coloring.num_colors(),
        frame = frame.is_some(),
        "synthesized grid"
    );

    Ok(SynthesizedGrid {
        decomposition,
        adjacency,
        coloring,
        pieces,
        frame,
    })
}
