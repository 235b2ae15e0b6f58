//! Joining the puzzle layer with the lower frame layer.
//!
//! The puzzle is printed on top of a second grid whose border pieces carry
//! the frame. Every upper piece touching the border is paired with the lower
//! piece it overlaps most along the border, and each pair is emitted as one
//! two-layer solid so the frame prints as a single rigid body.

use rustc_hash::{FxHashMap, FxHashSet};
use tracing::{debug, info};

use crate::config::GridSettings;
use crate::error::{Error, Result};
use crate::geometry::SynthesizedGrid;
use crate::grid::Tile;
use crate::pieces::Decomposition;
use crate::solid::{self, union, Rgb, Solid};

/// Color of the lower layer when layers are kept separate.
pub const LOWER_LAYER_RGB: Rgb = [0.0, 1.0, 0.0];

/// An upper border piece and the lower piece it is fused with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameMatch {
    pub upper_piece: usize,
    pub lower_piece: usize,
    /// Border tiles of the upper piece that lie on the lower piece.
    pub overlap: usize,
}

/// How the two layers are combined into the final solid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct AssemblyOptions {
    /// Don't join upper and lower frame parts; render the lower layer as one
    /// block for simpler previews.
    pub separate_layers: bool,
    /// Offset every object vertically, like an explosion diagram.
    pub explode: bool,
}

/// Tiles on any of the four border rows and columns.
///
/// Order is top row, bottom row, left column, right column; corner tiles
/// appear once, at their first position.
pub fn outermost_tiles(num_tiles_x: usize, num_tiles_y: usize) -> Vec<Tile> {
    if num_tiles_x == 0 || num_tiles_y == 0 {
        return Vec::new();
    }

    let (last_x, last_y) = (num_tiles_x - 1, num_tiles_y - 1);
    let mut seen = FxHashSet::default();
    (0..num_tiles_x)
        .map(|x| (x, 0))
        .chain((0..num_tiles_x).map(|x| (x, last_y)))
        .chain((0..num_tiles_y).map(|y| (0, y)))
        .chain((0..num_tiles_y).map(|y| (last_x, y)))
        .filter(|&tile| seen.insert(tile))
        .collect()
}

/// Finds, for each upper piece on the border, the lower piece with the most
/// overlap in outermost tiles.
///
/// Ties go to the lower piece encountered first along the border. An upper
/// border piece without any lower piece beneath its border tiles is an error.
pub fn match_frame_pieces(upper: &Decomposition, lower: &Decomposition) -> Result<Vec<FrameMatch>> {
    // upper border pieces with their border tiles, in order of first appearance
    let mut frame_pieces: Vec<(usize, Vec<Tile>)> = Vec::new();
    let mut slot_of: FxHashMap<usize, usize> = FxHashMap::default();
    for tile in outermost_tiles(upper.num_tiles_x(), upper.num_tiles_y()) {
        let upper_piece = upper.piece_of(tile);
        let slot = *slot_of.entry(upper_piece).or_insert_with(|| {
            frame_pieces.push((upper_piece, Vec::new()));
            frame_pieces.len() - 1
        });
        frame_pieces[slot].1.push(tile);
    }

    let mut matches = Vec::with_capacity(frame_pieces.len());
    for (upper_piece, tiles) in frame_pieces {
        // (lower piece, overlap count) in order of first encounter
        let mut overlap_counter: Vec<(usize, usize)> = Vec::new();
        for &tile in &tiles {
            let Some(lower_piece) = lower.get(tile) else {
                continue;
            };
            match overlap_counter.iter_mut().find(|(id, _)| *id == lower_piece) {
                Some((_, count)) => *count += 1,
                None => overlap_counter.push((lower_piece, 1)),
            }
        }

        let mut best: Option<(usize, usize)> = None;
        for &(lower_piece, count) in &overlap_counter {
            if best.map_or(true, |(_, best_count)| count > best_count) {
                best = Some((lower_piece, count));
            }
        }

        let Some((lower_piece, overlap)) = best else {
            return Err(Error::UnmatchedFrame {
                upper_piece,
                tiles: tiles.len(),
            });
        };
        debug!(upper_piece, lower_piece, overlap, "matched frame piece");
        matches.push(FrameMatch {
            upper_piece,
            lower_piece,
            overlap,
        });
    }

    info!(num_matches = matches.len(), "matched upper and lower frame pieces");
    Ok(matches)
}

/// Combines the puzzle layer and the lower frame layer into one solid.
///
/// The lower layer is moved down by one tile height. Objects are ordered
/// upper pieces off the border, joined frame pieces, remaining lower pieces,
/// then the upper layer's frame box if it has one.
pub fn assemble(
    upper: &SynthesizedGrid,
    lower: &SynthesizedGrid,
    settings: &GridSettings,
    options: AssemblyOptions,
) -> Result<Solid> {
    let lower_z = -settings.tile_height_mm;
    let upper_solids = upper.piece_solids();
    let lower_solids = lower.piece_solids();

    let mut objects: Vec<Solid> = if options.separate_layers {
        let [r, g, b] = LOWER_LAYER_RGB;
        let lower_layer = solid::color(r, g, b, union(lower_solids).translated(0.0, 0.0, lower_z));
        upper_solids.into_iter().chain([lower_layer]).collect()
    } else {
        let matches = match_frame_pieces(&upper.decomposition, &lower.decomposition)?;
        let matched_upper: FxHashSet<usize> = matches.iter().map(|m| m.upper_piece).collect();
        let matched_lower: FxHashSet<usize> = matches.iter().map(|m| m.lower_piece).collect();

        let mut objects = Vec::with_capacity(upper_solids.len() + lower_solids.len());
        objects.extend(
            upper_solids
                .iter()
                .enumerate()
                .filter(|(piece_id, _)| !matched_upper.contains(piece_id))
                .map(|(_, solid)| solid.clone()),
        );
        objects.extend(matches.iter().map(|m| {
            union([
                upper_solids[m.upper_piece].clone(),
                lower_solids[m.lower_piece]
                    .clone()
                    .translated(0.0, 0.0, lower_z),
            ])
        }));
        objects.extend(
            lower_solids
                .into_iter()
                .enumerate()
                .filter(|(piece_id, _)| !matched_lower.contains(piece_id))
                .map(|(_, solid)| solid.translated(0.0, 0.0, lower_z)),
        );
        objects
    };
    objects.extend(upper.frame.clone());

    info!(num_objects = objects.len(), "assembled layers");
    Ok(finish(objects, options.explode))
}

/// The puzzle layer alone, for runs without a lower frame grid.
pub fn assemble_single(upper: &SynthesizedGrid, options: AssemblyOptions) -> Solid {
    let objects: Vec<Solid> = upper
        .piece_solids()
        .into_iter()
        .chain(upper.frame.clone())
        .collect();
    finish(objects, options.explode)
}

fn finish(objects: Vec<Solid>, explode: bool) -> Solid {
    if explode {
        // first object ends up highest
        union(
            objects
                .into_iter()
                .rev()
                .enumerate()
                .map(|(i, solid)| solid.translated(0.0, 0.0, i as f64)),
        )
    } else {
        union(objects)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::synthesize;
    use crate::grid::{Gap, GridModel};

    /// 3x3 grid whose border tiles form one ring piece around a loose center.
    fn ring_grid() -> GridModel {
        let mut grid = GridModel::all_open(3, 3).unwrap();
        for lane in [0, 2] {
            for offset in [1, 2] {
                grid.set_open(Gap::horizontal(lane, offset), false);
                grid.set_open(Gap::vertical(lane, offset), false);
            }
        }
        grid
    }

    fn decompose(grid: &GridModel) -> Decomposition {
        Decomposition::new(grid)
    }

    fn offset_of(solid: &Solid) -> [f64; 3] {
        match solid {
            Solid::Translate { offset, .. } => *offset,
            other => panic!("expected a translation, got {other:?}"),
        }
    }

    fn children(solid: &Solid) -> &[Solid] {
        match solid {
            Solid::Union(children) => children,
            other => panic!("expected a union, got {other:?}"),
        }
    }

    #[test]
    fn test_outermost_tiles_order_and_dedup() {
        assert_eq!(
            outermost_tiles(3, 3),
            vec![
                (0, 0),
                (1, 0),
                (2, 0),
                (0, 2),
                (1, 2),
                (2, 2),
                (0, 1),
                (2, 1)
            ]
        );
        assert_eq!(outermost_tiles(1, 1), vec![(0, 0)]);
        assert_eq!(outermost_tiles(4, 4).len(), 12);
    }

    #[test]
    fn test_ring_matches_solid_lower_layer() {
        let upper = decompose(&ring_grid());
        assert_eq!(upper.num_pieces(), 2);
        let lower = decompose(&GridModel::all_bridged(3, 3).unwrap());

        let matches = match_frame_pieces(&upper, &lower).unwrap();
        assert_eq!(
            matches,
            vec![FrameMatch {
                upper_piece: 0,
                lower_piece: 0,
                overlap: 8
            }]
        );
    }

    #[test]
    fn test_highest_overlap_wins() {
        let upper = decompose(&GridModel::all_bridged(3, 1).unwrap());
        let mut lower_grid = GridModel::all_open(3, 1).unwrap();
        lower_grid.set_open(Gap::horizontal(0, 2), false);
        let lower = decompose(&lower_grid);

        let matches = match_frame_pieces(&upper, &lower).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].lower_piece, 1);
        assert_eq!(matches[0].overlap, 2);
    }

    #[test]
    fn test_tie_goes_to_first_encountered() {
        let upper = decompose(&GridModel::all_bridged(2, 1).unwrap());
        let lower = decompose(&GridModel::all_open(2, 1).unwrap());

        let matches = match_frame_pieces(&upper, &lower).unwrap();
        assert_eq!(matches[0].lower_piece, 0);
        assert_eq!(matches[0].overlap, 1);
    }

    #[test]
    fn test_unbacked_border_piece_is_an_error() {
        let upper = decompose(&GridModel::all_open(3, 3).unwrap());
        let lower = decompose(&GridModel::all_open(1, 1).unwrap());

        let err = match_frame_pieces(&upper, &lower).unwrap_err();
        assert!(matches!(
            err,
            Error::UnmatchedFrame {
                upper_piece: 3,
                tiles: 1
            }
        ));
    }

    #[test]
    fn test_assemble_joins_matched_pairs() {
        let settings = GridSettings::LARGE;
        let upper = synthesize(&ring_grid(), &settings).unwrap();
        let lower = synthesize(&GridModel::all_bridged(3, 3).unwrap(), &settings).unwrap();

        let assembled = assemble(&upper, &lower, &settings, AssemblyOptions::default()).unwrap();
        let objects = children(&assembled);
        // loose center piece, then the joined ring
        assert_eq!(objects.len(), 2);
        assert_eq!(objects[0], upper.pieces[1].to_solid());
        let joint = children(&objects[1]);
        assert_eq!(joint[0], upper.pieces[0].to_solid());
        assert_eq!(offset_of(&joint[1]), [0.0, 0.0, -6.0]);

        assert_eq!(
            assembled.count_cubes(),
            upper.to_solid().count_cubes() + lower.to_solid().count_cubes()
        );
    }

    #[test]
    fn test_unmatched_lower_pieces_move_down() {
        let settings = GridSettings::LARGE;
        let upper = synthesize(&GridModel::all_bridged(2, 1).unwrap(), &settings).unwrap();
        let lower = synthesize(&GridModel::all_open(3, 1).unwrap(), &settings).unwrap();

        let assembled = assemble(&upper, &lower, &settings, AssemblyOptions::default()).unwrap();
        let objects = children(&assembled);
        assert_eq!(objects.len(), 3);
        assert_eq!(objects[1], lower.pieces[1].to_solid().translated(0.0, 0.0, -6.0));
        assert_eq!(offset_of(&objects[2]), [0.0, 0.0, -6.0]);
    }

    #[test]
    fn test_separate_layers_skip_matching() {
        let settings = GridSettings::LARGE;
        let upper = synthesize(&GridModel::all_open(3, 3).unwrap(), &settings).unwrap();
        // would be unmatched if matching ran
        let lower = synthesize(&GridModel::all_open(1, 1).unwrap(), &settings).unwrap();

        let options = AssemblyOptions {
            separate_layers: true,
            ..AssemblyOptions::default()
        };
        let assembled = assemble(&upper, &lower, &settings, options).unwrap();
        let objects = children(&assembled);
        assert_eq!(objects.len(), 10);
        assert!(matches!(
            &objects[9],
            Solid::Color { rgb, .. } if *rgb == LOWER_LAYER_RGB
        ));
    }

    #[test]
    fn test_explode_stacks_objects() {
        let upper = synthesize(&GridModel::all_open(2, 1).unwrap(), &GridSettings::LARGE).unwrap();
        let options = AssemblyOptions {
            explode: true,
            ..AssemblyOptions::default()
        };
        let exploded = assemble_single(&upper, options);
        let objects = children(&exploded);
        assert_eq!(offset_of(&objects[0]), [0.0, 0.0, 0.0]);
        assert_eq!(offset_of(&objects[1]), [0.0, 0.0, 1.0]);
        // the last piece is lowest
        assert_eq!(objects[0], upper.pieces[1].to_solid().translated(0.0, 0.0, 0.0));
    }
}
