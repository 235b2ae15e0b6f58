//! Grid representation and neighbor queries for gap grids.
//!
//! A puzzle of `X * Y` unit tiles is described entirely by the state of the
//! gaps around its tiles. Gap state is held in two dense arrays:
//! - `horizontal[y][x]` separates tile `(x - 1, y)` from tile `(x, y)`,
//!   so each of the `Y` lanes has `X + 1` offsets.
//! - `vertical[x][y]` separates tile `(x, y - 1)` from tile `(x, y)`,
//!   so each of the `X` lanes has `Y + 1` offsets.
//!
//! `true` means the gap is open, `false` means a bridge fuses the tiles on
//! either side. Offsets `0` and the last offset of each lane border the
//! outside of the grid.

use crate::error::{Error, Result};

/// A tile position `(x, y)`; `(0, 0)` is the top left, `+x` right, `+y` down.
pub type Tile = (usize, usize);

/// Orientation of a gap lane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Gaps between horizontally adjacent tiles; lanes are rows.
    Horizontal,
    /// Gaps between vertically adjacent tiles; lanes are columns.
    Vertical,
}

/// Address of a single gap within its directional array.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Gap {
    pub direction: Direction,
    pub lane: usize,
    pub offset: usize,
}

impl Gap {
    pub const fn horizontal(lane: usize, offset: usize) -> Self {
        Self {
            direction: Direction::Horizontal,
            lane,
            offset,
        }
    }

    pub const fn vertical(lane: usize, offset: usize) -> Self {
        Self {
            direction: Direction::Vertical,
            lane,
            offset,
        }
    }
}

/// Bridge state for every gap of a rectangular tile grid.
///
/// Dimensions are validated once on construction; afterwards every index
/// derived from `num_tiles_x`/`num_tiles_y` is in bounds.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridModel {
    horizontal: Vec<Vec<bool>>,
    vertical: Vec<Vec<bool>>,
}

impl GridModel {
    /// Builds a grid from the two gap arrays, rejecting ragged or empty input.
    pub fn new(horizontal: Vec<Vec<bool>>, vertical: Vec<Vec<bool>>) -> Result<Self> {
        let num_tiles_x = vertical.len();
        let num_tiles_y = horizontal.len();

        if num_tiles_x == 0 || num_tiles_y == 0 {
            return Err(Error::Validation(format!(
                "grid has no tiles ({num_tiles_x}x{num_tiles_y})"
            )));
        }

        check_lanes("horiz", &horizontal, num_tiles_x + 1)?;
        check_lanes("vert", &vertical, num_tiles_y + 1)?;

        Ok(Self {
            horizontal,
            vertical,
        })
    }

    /// A grid of separate tiles: every gap open.
    pub fn all_open(num_tiles_x: usize, num_tiles_y: usize) -> Result<Self> {
        Self::filled(num_tiles_x, num_tiles_y, true)
    }

    /// A single slab: every gap bridged, including the outer boundary.
    pub fn all_bridged(num_tiles_x: usize, num_tiles_y: usize) -> Result<Self> {
        Self::filled(num_tiles_x, num_tiles_y, false)
    }

    fn filled(num_tiles_x: usize, num_tiles_y: usize, open: bool) -> Result<Self> {
        Self::new(
            vec![vec![open; num_tiles_x + 1]; num_tiles_y],
            vec![vec![open; num_tiles_y + 1]; num_tiles_x],
        )
    }

    #[inline]
    pub fn num_tiles_x(&self) -> usize {
        self.vertical.len()
    }

    #[inline]
    pub fn num_tiles_y(&self) -> usize {
        self.horizontal.len()
    }

    #[inline]
    pub fn num_tiles(&self) -> usize {
        self.num_tiles_x() * self.num_tiles_y()
    }

    /// Raw gap arrays, in persisted order.
    pub fn horizontal(&self) -> &[Vec<bool>] {
        &self.horizontal
    }

    pub fn vertical(&self) -> &[Vec<bool>] {
        &self.vertical
    }

    /// Number of lanes in the given direction.
    pub fn num_lanes(&self, direction: Direction) -> usize {
        match direction {
            Direction::Horizontal => self.num_tiles_y(),
            Direction::Vertical => self.num_tiles_x(),
        }
    }

    /// Number of gaps along each lane of the given direction.
    pub fn lane_len(&self, direction: Direction) -> usize {
        match direction {
            Direction::Horizontal => self.num_tiles_x() + 1,
            Direction::Vertical => self.num_tiles_y() + 1,
        }
    }

    /// Whether `gap` addresses a gap of this grid.
    pub fn contains_gap(&self, gap: Gap) -> bool {
        gap.lane < self.num_lanes(gap.direction) && gap.offset < self.lane_len(gap.direction)
    }

    /// Returns the open state of a gap.
    ///
    /// Panics if the gap lies outside the grid.
    #[inline]
    pub fn is_open(&self, direction: Direction, lane: usize, offset: usize) -> bool {
        match direction {
            Direction::Horizontal => self.horizontal[lane][offset],
            Direction::Vertical => self.vertical[lane][offset],
        }
    }

    /// Returns whether a bridge spans the gap.
    #[inline]
    pub fn bridged(&self, direction: Direction, lane: usize, offset: usize) -> bool {
        !self.is_open(direction, lane, offset)
    }

    #[inline]
    pub fn is_gap_open(&self, gap: Gap) -> bool {
        self.is_open(gap.direction, gap.lane, gap.offset)
    }

    /// Sets the open state of a gap. Only the editor mutates grids; the
    /// rendering pipeline works on snapshots.
    pub fn set_open(&mut self, gap: Gap, open: bool) {
        let lanes = match gap.direction {
            Direction::Horizontal => &mut self.horizontal,
            Direction::Vertical => &mut self.vertical,
        };
        lanes[gap.lane][gap.offset] = open;
    }

    #[inline]
    pub fn contains(&self, (x, y): Tile) -> bool {
        x < self.num_tiles_x() && y < self.num_tiles_y()
    }

    /// Converts a tile to a linear index.
    ///
    /// Index order is x-major: `idx = x * Y + y`, matching [`GridModel::tiles`].
    #[inline]
    pub fn tile_index(&self, (x, y): Tile) -> usize {
        x * self.num_tiles_y() + y
    }

    /// All tiles in scan order: outer loop over `x`, inner over `y`.
    pub fn tiles(&self) -> impl Iterator<Item = Tile> {
        let num_tiles_y = self.num_tiles_y();
        (0..self.num_tiles_x()).flat_map(move |x| (0..num_tiles_y).map(move |y| (x, y)))
    }

    /// In-bounds neighbors (left, right, up, down) with the gap separating them.
    fn neighbor_gaps(&self, (x, y): Tile) -> impl Iterator<Item = (Tile, Gap)> {
        let num_tiles_x = self.num_tiles_x();
        let num_tiles_y = self.num_tiles_y();
        [
            (x > 0).then(|| ((x - 1, y), Gap::horizontal(y, x))),
            (x + 1 < num_tiles_x).then(|| ((x + 1, y), Gap::horizontal(y, x + 1))),
            (y > 0).then(|| ((x, y - 1), Gap::vertical(x, y))),
            (y + 1 < num_tiles_y).then(|| ((x, y + 1), Gap::vertical(x, y + 1))),
        ]
        .into_iter()
        .flatten()
    }

    /// Direct neighbors of a tile, connected or not (thus up to 4).
    pub fn tile_neighbors(&self, tile: Tile) -> Vec<Tile> {
        self.neighbor_gaps(tile).map(|(neighbor, _)| neighbor).collect()
    }

    /// Direct neighbors reachable through a bridged gap.
    pub fn connected_neighbors(&self, tile: Tile) -> Vec<Tile> {
        self.neighbor_gaps(tile)
            .filter(|&(_, gap)| !self.is_gap_open(gap))
            .map(|(neighbor, _)| neighbor)
            .collect()
    }

    /// Keeps only the top-left `max_x * max_y` window of the grid.
    ///
    /// Limits larger than the grid are clamped. A zero limit leaves no tiles
    /// and is rejected like any other empty grid.
    pub fn cropped(&self, max_x: usize, max_y: usize) -> Result<Self> {
        let num_tiles_x = max_x.min(self.num_tiles_x());
        let num_tiles_y = max_y.min(self.num_tiles_y());

        let horizontal = self.horizontal[..num_tiles_y]
            .iter()
            .map(|lane| lane[..=num_tiles_x].to_vec())
            .collect();
        let vertical = self.vertical[..num_tiles_x]
            .iter()
            .map(|lane| lane[..=num_tiles_y].to_vec())
            .collect();

        Self::new(horizontal, vertical)
    }

    /// Formats the grid as ASCII art.
    ///
    /// Corners show as `+`, open gaps as `|` or `---`, bridged gaps and
    /// tiles as blanks.
    pub fn format_grid(&self) -> String {
        let mut output = String::new();

        for y in 0..=self.num_tiles_y() {
            // corner row: vertical gaps above row `y`
            for x in 0..self.num_tiles_x() {
                output.push('+');
                output.push_str(if self.vertical[x][y] { "---" } else { "   " });
            }
            output.push_str("+\n");

            if y == self.num_tiles_y() {
                break;
            }

            // tile row: horizontal gaps between the tiles of row `y`
            for x in 0..=self.num_tiles_x() {
                output.push(if self.horizontal[y][x] { '|' } else { ' ' });
                if x < self.num_tiles_x() {
                    output.push_str("   ");
                }
            }
            output.push('\n');
        }

        output
    }
}

fn check_lanes(name: &str, lanes: &[Vec<bool>], expected_len: usize) -> Result<()> {
    match lanes.iter().position(|lane| lane.len() != expected_len) {
        Some(lane) => Err(Error::Validation(format!(
            "'{name}' lane {lane} has {} gaps, expected {expected_len}",
            lanes[lane].len()
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensions_derive_from_lane_counts() {
        let grid = GridModel::all_open(3, 2).unwrap();
        assert_eq!(grid.num_tiles_x(), 3);
        assert_eq!(grid.num_tiles_y(), 2);
        assert_eq!(grid.num_tiles(), 6);
        assert_eq!(grid.horizontal().len(), 2);
        assert_eq!(grid.horizontal()[0].len(), 4);
        assert_eq!(grid.vertical().len(), 3);
        assert_eq!(grid.vertical()[0].len(), 3);
    }

    #[test]
    fn test_empty_grid_is_rejected() {
        assert!(matches!(
            GridModel::new(vec![], vec![]),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            GridModel::all_open(0, 4),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_inconsistent_lane_lengths_are_rejected() {
        // 2x2 tiles, but the second horizontal lane is one gap short
        let horizontal = vec![vec![true; 3], vec![true; 2]];
        let vertical = vec![vec![true; 3]; 2];
        let err = GridModel::new(horizontal, vertical).unwrap_err();
        assert!(err.to_string().contains("'horiz' lane 1"), "{err}");

        // vertical lanes sized for 3 rows, horizontal array has 2
        let horizontal = vec![vec![true; 3]; 2];
        let vertical = vec![vec![true; 4]; 2];
        assert!(matches!(
            GridModel::new(horizontal, vertical),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn test_tile_neighbors_respect_bounds() {
        let grid = GridModel::all_open(3, 3).unwrap();
        assert_eq!(grid.tile_neighbors((0, 0)), vec![(1, 0), (0, 1)]);
        assert_eq!(grid.tile_neighbors((2, 2)), vec![(1, 2), (2, 1)]);
        assert_eq!(
            grid.tile_neighbors((1, 1)),
            vec![(0, 1), (2, 1), (1, 0), (1, 2)]
        );
    }

    #[test]
    fn test_connected_neighbors_follow_bridges() {
        let mut grid = GridModel::all_open(3, 3).unwrap();
        assert!(grid.connected_neighbors((1, 1)).is_empty());

        // bridge between (1, 1) and (2, 1)
        grid.set_open(Gap::horizontal(1, 2), false);
        // bridge between (1, 0) and (1, 1)
        grid.set_open(Gap::vertical(1, 1), false);

        assert_eq!(grid.connected_neighbors((1, 1)), vec![(2, 1), (1, 0)]);
        assert_eq!(grid.connected_neighbors((2, 1)), vec![(1, 1)]);
        assert!(grid.bridged(Direction::Horizontal, 1, 2));
        assert!(!grid.bridged(Direction::Horizontal, 1, 1));
    }

    #[test]
    fn test_boundary_bridges_connect_nothing() {
        let mut grid = GridModel::all_open(2, 1).unwrap();
        grid.set_open(Gap::horizontal(0, 0), false);
        grid.set_open(Gap::horizontal(0, 2), false);
        assert!(grid.connected_neighbors((0, 0)).is_empty());
        assert!(grid.connected_neighbors((1, 0)).is_empty());
    }

    #[test]
    fn test_tiles_scan_x_major() {
        let grid = GridModel::all_open(2, 3).unwrap();
        let tiles: Vec<Tile> = grid.tiles().collect();
        assert_eq!(
            tiles,
            vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1), (1, 2)]
        );
        for (index, &tile) in tiles.iter().enumerate() {
            assert_eq!(grid.tile_index(tile), index);
        }
    }

    #[test]
    fn test_cropped_keeps_top_left_window() {
        let mut grid = GridModel::all_open(4, 4).unwrap();
        grid.set_open(Gap::horizontal(0, 1), false);
        grid.set_open(Gap::vertical(3, 2), false);

        let cropped = grid.cropped(2, 10).unwrap();
        assert_eq!(cropped.num_tiles_x(), 2);
        assert_eq!(cropped.num_tiles_y(), 4);
        assert!(cropped.bridged(Direction::Horizontal, 0, 1));
        assert_eq!(cropped.vertical().len(), 2);

        assert!(matches!(grid.cropped(0, 3), Err(Error::Validation(_))));
    }

    #[test]
    fn test_format_grid() {
        let mut grid = GridModel::all_open(2, 1).unwrap();
        grid.set_open(Gap::horizontal(0, 1), false);
        grid.set_open(Gap::vertical(1, 1), false);
        let expected = "\
+---+---+
|       |
+---+   +
";
        assert_eq!(grid.format_grid(), expected);
    }
}
