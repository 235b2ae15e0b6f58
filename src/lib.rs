//! Interlocking Tile Puzzle Designer Library
//!
//! Turns a grid of bridged and open gaps into puzzle pieces, colors them,
//! and synthesizes printable solids for each piece, optionally fused with a
//! lower frame layer.

pub mod coloring;
pub mod config;
pub mod editor;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod grid;
pub mod persistence;
pub mod pieces;
pub mod scad;
pub mod solid;

use tracing::info;

pub use error::{Error, Result};

use config::GridSettings;
use frame::AssemblyOptions;
use grid::GridModel;
use solid::Solid;

/// Runs the whole pipeline and returns the root solid for emission.
///
/// The puzzle grid is synthesized with `settings` as given. When a lower
/// frame grid is supplied it is synthesized with the same dimensions but
/// never gets a frame box of its own, and the two layers are assembled.
pub fn build_puzzle(
    puzzle: &GridModel,
    lower_frame: Option<&GridModel>,
    settings: &GridSettings,
    options: AssemblyOptions,
) -> Result<Solid> {
    let upper = geometry::synthesize(puzzle, settings)?;

    match lower_frame {
        Some(lower_frame) => {
            info!("synthesizing lower frame layer");
            let lower_settings = GridSettings {
                frame: None,
                ..*settings
            };
            let lower = geometry::synthesize(lower_frame, &lower_settings)?;
            frame::assemble(&upper, &lower, settings, options)
        }
        None => Ok(frame::assemble_single(&upper, options)),
    }
}
