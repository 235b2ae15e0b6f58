//! Piece adjacency and coloring for visualization.
//!
//! Colors only need to make bordering pieces distinguishable; they carry no
//! manufacturing meaning. A four-coloring always exists, but finding one is
//! far more expensive than a greedy pass, so new colors are made up as
//! necessary instead.

use rustc_hash::FxHashSet;
use tracing::info;

use crate::grid::GridModel;
use crate::pieces::Decomposition;

/// Undirected graph of pieces that touch geometrically, bridged or not.
#[derive(Clone, Debug)]
pub struct AdjacencyGraph {
    bordering: Vec<FxHashSet<usize>>,
}

impl AdjacencyGraph {
    /// Finds which pieces border each other by scanning every tile's direct
    /// neighbors.
    pub fn new(grid: &GridModel, decomposition: &Decomposition) -> Self {
        let mut bordering = vec![FxHashSet::default(); decomposition.num_pieces()];

        for tile in grid.tiles() {
            let piece_id = decomposition.piece_of(tile);
            for neighbor in grid.tile_neighbors(tile) {
                let neighbor_piece_id = decomposition.piece_of(neighbor);
                if neighbor_piece_id != piece_id {
                    bordering[piece_id].insert(neighbor_piece_id);
                    bordering[neighbor_piece_id].insert(piece_id);
                }
            }
        }

        Self { bordering }
    }

    #[inline]
    pub fn num_pieces(&self) -> usize {
        self.bordering.len()
    }

    /// Bordering piece IDs of a piece, ascending.
    pub fn neighbors(&self, piece_id: usize) -> Vec<usize> {
        let mut neighbors: Vec<usize> = self.bordering[piece_id].iter().copied().collect();
        neighbors.sort_unstable();
        neighbors
    }

    #[inline]
    pub fn are_adjacent(&self, a: usize, b: usize) -> bool {
        self.bordering[a].contains(&b)
    }

    /// Every edge once as `(a, b)` with `a < b`, sorted.
    pub fn edges(&self) -> Vec<(usize, usize)> {
        let mut edges: Vec<(usize, usize)> = self
            .bordering
            .iter()
            .enumerate()
            .flat_map(|(a, neighbors)| {
                neighbors
                    .iter()
                    .filter(move |&&b| a < b)
                    .map(move |&b| (a, b))
            })
            .collect();
        edges.sort_unstable();
        edges
    }
}

/// Color index per piece.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Coloring {
    color_of: Vec<usize>,
    num_colors: usize,
}

impl Coloring {
    /// Greedy first-fit coloring in increasing piece-ID order.
    ///
    /// Each piece takes the smallest color not used by an already colored
    /// neighbor; a new color is introduced only when every used one is taken.
    pub fn greedy(graph: &AdjacencyGraph) -> Self {
        let mut color_of: Vec<Option<usize>> = vec![None; graph.num_pieces()];
        let mut num_colors = 0;

        for piece_id in 0..graph.num_pieces() {
            let bordering_colors: FxHashSet<usize> = graph.bordering[piece_id]
                .iter()
                .filter_map(|&neighbor| color_of[neighbor])
                .collect();

            let color = match (0..num_colors).find(|c| !bordering_colors.contains(c)) {
                Some(existing) => existing,
                None => {
                    num_colors += 1;
                    num_colors - 1
                }
            };
            color_of[piece_id] = Some(color);
        }

        info!(num_colors, "colored pieces");

        Self {
            color_of: color_of.into_iter().flatten().collect(),
            num_colors,
        }
    }

    #[inline]
    pub fn color_of(&self, piece_id: usize) -> usize {
        self.color_of[piece_id]
    }

    #[inline]
    pub fn num_colors(&self) -> usize {
        self.num_colors
    }

    /// Display color of a piece, spread evenly over the rainbow.
    pub fn rgb_of(&self, piece_id: usize) -> [f64; 3] {
        rainbow_rgb(self.color_of(piece_id) as f64 / self.num_colors as f64)
    }
}

/// Maps `h` in `[0, 1)` to a fully saturated rainbow color.
///
/// Each channel is a triangle wave over the 12-step hue circle, with the
/// channels phase shifted by a third of the circle.
pub fn rainbow_rgb(h: f64) -> [f64; 3] {
    let channel = |n: f64| {
        let k = (n + h * 12.0).rem_euclid(12.0);
        0.5 - 0.5 * (k - 3.0).min(9.0 - k).min(1.0).max(-1.0)
    };
    [channel(0.0), channel(8.0), channel(4.0)]
}
