//! Decomposition of a gap grid into puzzle pieces.
//!
//! Conceptually the field is an undirected graph whose nodes are tiles and
//! whose edges are bridged gaps; its connected components are the puzzle
//! pieces. They are found with a stack-based flood fill.

use tracing::{debug, info};

use crate::grid::{GridModel, Tile};

/// Partition of all tiles of a grid into connected pieces.
///
/// Piece IDs are dense, start at 0 and follow discovery order of the
/// x-major tile scan, so identical grids always produce identical IDs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Decomposition {
    num_tiles_x: usize,
    num_tiles_y: usize,
    /// Piece ID per tile, indexed by [`GridModel::tile_index`].
    piece_of: Vec<usize>,
    /// Tiles of each piece, in flood-fill order.
    pieces: Vec<Vec<Tile>>,
}

impl Decomposition {
    /// Floodfills the grid.
    ///
    /// For each tile not yet visited, a new piece is started and grown by
    /// popping tiles off a stack and pushing their bridged neighbors.
    pub fn new(grid: &GridModel) -> Self {
        const UNVISITED: usize = usize::MAX;

        let mut piece_of = vec![UNVISITED; grid.num_tiles()];
        let mut pieces: Vec<Vec<Tile>> = Vec::new();
        let mut stack = Vec::new();

        for start in grid.tiles() {
            if piece_of[grid.tile_index(start)] != UNVISITED {
                continue;
            }

            let piece_id = pieces.len();
            let mut piece = Vec::new();
            piece_of[grid.tile_index(start)] = piece_id;
            stack.push(start);

            while let Some(tile) = stack.pop() {
                piece.push(tile);
                for neighbor in grid.connected_neighbors(tile) {
                    let slot = &mut piece_of[grid.tile_index(neighbor)];
                    // mark on push so each tile enters the stack once
                    if *slot == UNVISITED {
                        *slot = piece_id;
                        stack.push(neighbor);
                    }
                }
            }

            debug!(piece_id, tiles = piece.len(), "flood filled piece");
            pieces.push(piece);
        }

        info!(
            num_tiles_x = grid.num_tiles_x(),
            num_tiles_y = grid.num_tiles_y(),
            num_pieces = pieces.len(),
            "decomposed grid"
        );

        Self {
            num_tiles_x: grid.num_tiles_x(),
            num_tiles_y: grid.num_tiles_y(),
            piece_of,
            pieces,
        }
    }

    #[inline]
    pub fn num_pieces(&self) -> usize {
        self.pieces.len()
    }

    #[inline]
    pub fn num_tiles_x(&self) -> usize {
        self.num_tiles_x
    }

    #[inline]
    pub fn num_tiles_y(&self) -> usize {
        self.num_tiles_y
    }

    /// Piece ID of a tile, or `None` if the tile lies outside the grid.
    #[inline]
    pub fn get(&self, (x, y): Tile) -> Option<usize> {
        if x < self.num_tiles_x && y < self.num_tiles_y {
            Some(self.piece_of[x * self.num_tiles_y + y])
        } else {
            None
        }
    }

    /// Piece ID of a tile inside the grid.
    ///
    /// Panics if the tile lies outside the grid.
    #[inline]
    pub fn piece_of(&self, tile: Tile) -> usize {
        match self.get(tile) {
            Some(piece_id) => piece_id,
            None => panic!(
                "tile {tile:?} outside {}x{} grid",
                self.num_tiles_x, self.num_tiles_y
            ),
        }
    }

    /// Tiles belonging to a piece.
    pub fn tiles_of(&self, piece_id: usize) -> &[Tile] {
        &self.pieces[piece_id]
    }

    /// All pieces, indexed by piece ID.
    pub fn pieces(&self) -> &[Vec<Tile>] {
        &self.pieces
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Gap;

    use proptest::prelude::*;

    fn sorted(tiles: &[Tile]) -> Vec<Tile> {
        let mut tiles = tiles.to_vec();
        tiles.sort();
        tiles
    }

    #[test]
    fn test_two_by_two_with_one_bridge() {
        let mut grid = GridModel::all_open(2, 2).unwrap();
        // bridge between (0, 0) and (1, 0)
        grid.set_open(Gap::horizontal(0, 1), false);

        let decomposition = Decomposition::new(&grid);
        assert_eq!(decomposition.num_pieces(), 3);
        assert_eq!(sorted(decomposition.tiles_of(0)), vec![(0, 0), (1, 0)]);
        assert_eq!(decomposition.tiles_of(1), &[(0, 1)]);
        assert_eq!(decomposition.tiles_of(2), &[(1, 1)]);
        assert_eq!(decomposition.piece_of((1, 0)), 0);
    }

    #[test]
    fn test_all_open_yields_singletons() {
        let grid = GridModel::all_open(4, 3).unwrap();
        let decomposition = Decomposition::new(&grid);
        assert_eq!(decomposition.num_pieces(), 12);
        for (piece_id, tile) in grid.tiles().enumerate() {
            assert_eq!(decomposition.tiles_of(piece_id), &[tile]);
        }
    }

    #[test]
    fn test_all_bridged_yields_one_piece() {
        let grid = GridModel::all_bridged(5, 7).unwrap();
        let decomposition = Decomposition::new(&grid);
        assert_eq!(decomposition.num_pieces(), 1);
        assert_eq!(decomposition.tiles_of(0).len(), 35);
    }

    #[test]
    fn test_lookup_outside_grid() {
        let grid = GridModel::all_open(2, 2).unwrap();
        let decomposition = Decomposition::new(&grid);
        assert_eq!(decomposition.get((2, 0)), None);
        assert_eq!(decomposition.get((1, 1)), Some(3));
    }

    #[test]
    fn test_snake_is_one_piece() {
        // row 0 left to right, down at the right edge, row 1 right to left
        let mut grid = GridModel::all_open(3, 2).unwrap();
        grid.set_open(Gap::horizontal(0, 1), false);
        grid.set_open(Gap::horizontal(0, 2), false);
        grid.set_open(Gap::vertical(2, 1), false);
        grid.set_open(Gap::horizontal(1, 2), false);
        grid.set_open(Gap::horizontal(1, 1), false);

        let decomposition = Decomposition::new(&grid);
        assert_eq!(decomposition.num_pieces(), 1);
    }

    fn arb_grid() -> impl Strategy<Value = GridModel> {
        (1usize..7, 1usize..7).prop_flat_map(|(x, y)| {
            (
                prop::collection::vec(prop::collection::vec(any::<bool>(), x + 1), y),
                prop::collection::vec(prop::collection::vec(any::<bool>(), y + 1), x),
            )
                .prop_map(|(horizontal, vertical)| {
                    GridModel::new(horizontal, vertical).unwrap()
                })
        })
    }

    /// Union-find over bridged gaps, independent of the flood fill.
    fn reference_components(grid: &GridModel) -> Vec<usize> {
        fn find(parent: &mut [usize], i: usize) -> usize {
            if parent[i] != i {
                let root = find(parent, parent[i]);
                parent[i] = root;
            }
            parent[i]
        }

        let mut parent: Vec<usize> = (0..grid.num_tiles()).collect();
        for tile in grid.tiles() {
            for neighbor in grid.connected_neighbors(tile) {
                let a = find(&mut parent, grid.tile_index(tile));
                let b = find(&mut parent, grid.tile_index(neighbor));
                parent[a] = b;
            }
        }
        (0..grid.num_tiles()).map(|i| find(&mut parent, i)).collect()
    }

    proptest! {
        #[test]
        fn prop_every_tile_in_exactly_one_piece(grid in arb_grid()) {
            let decomposition = Decomposition::new(&grid);
            let mut seen = vec![0usize; grid.num_tiles()];
            for (piece_id, tiles) in decomposition.pieces().iter().enumerate() {
                prop_assert!(!tiles.is_empty());
                for &tile in tiles {
                    seen[grid.tile_index(tile)] += 1;
                    prop_assert_eq!(decomposition.piece_of(tile), piece_id);
                }
            }
            prop_assert!(seen.iter().all(|&count| count == 1));
        }

        #[test]
        fn prop_pieces_match_bridge_connectivity(grid in arb_grid()) {
            let decomposition = Decomposition::new(&grid);
            let roots = reference_components(&grid);
            for a in grid.tiles() {
                for b in grid.tiles() {
                    let same_piece = decomposition.piece_of(a) == decomposition.piece_of(b);
                    let same_component =
                        roots[grid.tile_index(a)] == roots[grid.tile_index(b)];
                    prop_assert_eq!(same_piece, same_component);
                }
            }
        }

        #[test]
        fn prop_decomposition_is_deterministic(grid in arb_grid()) {
            prop_assert_eq!(Decomposition::new(&grid), Decomposition::new(&grid.clone()));
        }
    }
}
