//! Interlocking Tile Puzzle Designer
//!
//! Reads a grid of tiles whose separating gaps are either open or bridged,
//! splits it into the connected pieces the bridges form, and writes an
//! OpenSCAD model with one colored solid per piece. An optional second grid
//! describes the lower frame layer, whose border pieces are fused with the
//! matching puzzle pieces so the frame prints as one body.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use tilegap::coloring::{AdjacencyGraph, Coloring};
use tilegap::config::{FrameSettings, GridSettings, Preset};
use tilegap::editor::EditorState;
use tilegap::frame::AssemblyOptions;
use tilegap::grid::{Gap, GridModel};
use tilegap::pieces::Decomposition;
use tilegap::{persistence, scad, Error, Result};

/// Designs interlocking tile puzzles from gap grids.
#[derive(Parser)]
#[command(name = "tilegap")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Build the puzzle solids and write them as an OpenSCAD file.
    Render(RenderArgs),
    /// Print pieces, colors and an ASCII view of a grid.
    Inspect {
        /// Grid file to inspect.
        #[arg(long, default_value = "field.json")]
        grid: PathBuf,
    },
    /// Write a new grid with every gap open.
    New {
        #[arg(long)]
        width: usize,
        #[arg(long)]
        height: usize,
        #[arg(long, short, default_value = "field.json")]
        output: PathBuf,
        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },
    /// Apply editor operations to a grid file.
    Edit(EditArgs),
}

#[derive(Args)]
struct RenderArgs {
    /// Puzzle grid file.
    #[arg(long, default_value = "field.json")]
    grid: PathBuf,
    /// Lower frame grid file; its border pieces are fused with the puzzle's.
    #[arg(long)]
    frame_grid: Option<PathBuf>,
    #[arg(long, short, default_value = "puzzle.scad")]
    output: PathBuf,
    /// Dimension preset: 'large' or 'small'.
    #[arg(long, default_value = "large")]
    preset: Preset,
    /// Override the tile side length (mm).
    #[arg(long)]
    tile_side: Option<f64>,
    /// Override the tile height (mm).
    #[arg(long)]
    tile_height: Option<f64>,
    /// Override the gap width (mm).
    #[arg(long)]
    gap: Option<f64>,
    /// Surround the puzzle with a frame box.
    #[arg(long)]
    frame: bool,
    /// Frame wall thickness (mm).
    #[arg(long, default_value_t = FrameSettings::default().wall_mm)]
    frame_wall: f64,
    /// Clearance between tiles and frame (mm).
    #[arg(long, default_value_t = FrameSettings::default().tolerance_mm)]
    frame_tolerance: f64,
    /// Only render the top-left X,Y tiles.
    #[arg(long, value_parser = parse_tile_limit)]
    tile_limit: Option<(usize, usize)>,
    /// Keep the lower layer as one block instead of fusing frame pieces.
    #[arg(long)]
    separate_layers: bool,
    /// Offset every object vertically like an explosion diagram.
    #[arg(long)]
    explode: bool,
}

impl RenderArgs {
    fn settings(&self) -> GridSettings {
        let preset = self.preset.settings();
        GridSettings {
            tile_side_mm: self.tile_side.unwrap_or(preset.tile_side_mm),
            tile_height_mm: self.tile_height.unwrap_or(preset.tile_height_mm),
            gap_mm: self.gap.unwrap_or(preset.gap_mm),
            frame: self.frame.then_some(FrameSettings {
                wall_mm: self.frame_wall,
                tolerance_mm: self.frame_tolerance,
            }),
            tile_limit: self.tile_limit,
            ..preset
        }
    }

    fn options(&self) -> AssemblyOptions {
        AssemblyOptions {
            separate_layers: self.separate_layers,
            explode: self.explode,
        }
    }
}

#[derive(Args)]
struct EditArgs {
    /// Grid file to edit.
    #[arg(long, default_value = "field.json")]
    grid: PathBuf,
    /// Move the cursor to a gap, given as h|v,lane,offset.
    #[arg(long)]
    at: Option<Gap>,
    /// Flip the gap under the cursor.
    #[arg(long, requires = "at")]
    toggle: bool,
    /// Run-length entries (1-9) applied in order from the cursor.
    #[arg(long, num_args = 1..)]
    run: Vec<usize>,
    /// Write the result here instead of back to the grid file.
    #[arg(long, short)]
    output: Option<PathBuf>,
}

fn parse_tile_limit(s: &str) -> std::result::Result<(usize, usize), String> {
    let (x, y) = s
        .split_once(',')
        .ok_or_else(|| format!("tile limit '{s}' must be X,Y"))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<usize>()
            .map_err(|e| format!("tile limit '{s}': {e}"))
    };
    Ok((parse(x)?, parse(y)?))
}

fn main() -> ExitCode {
    // Default: INFO for tilegap. Override with RUST_LOG (e.g. RUST_LOG=tilegap=debug).
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("tilegap=info"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Render(args) => run_render(&args),
        Command::Inspect { grid } => run_inspect(&grid),
        Command::New {
            width,
            height,
            output,
            force,
        } => run_new(width, height, &output, force),
        Command::Edit(args) => run_edit(args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Loads the grids, builds the model and writes the SCAD file.
fn run_render(args: &RenderArgs) -> Result<()> {
    let settings = args.settings();
    let puzzle = persistence::load_grid(&args.grid)?;
    let lower_frame = args
        .frame_grid
        .as_deref()
        .map(persistence::load_grid)
        .transpose()?;

    let model = tilegap::build_puzzle(&puzzle, lower_frame.as_ref(), &settings, args.options())?;
    scad::write(&model, &args.output)?;

    println!("Wrote {}", args.output.display());
    Ok(())
}

/// Prints the decomposition summary of a grid file.
fn run_inspect(path: &Path) -> Result<()> {
    let grid = persistence::load_grid(path)?;
    print!("{}", inspect_report(&grid));
    Ok(())
}

/// Writes an all-open grid.
fn run_new(width: usize, height: usize, output: &Path, force: bool) -> Result<()> {
    if output.exists() && !force {
        return Err(Error::Validation(format!(
            "{} already exists, pass --force to overwrite",
            output.display()
        )));
    }
    let grid = GridModel::all_open(width, height)?;
    persistence::save_grid(&grid, output)?;
    println!("Saved to {}", output.display());
    Ok(())
}

/// Applies cursor moves, toggles and run-length entries, then saves.
fn run_edit(args: EditArgs) -> Result<()> {
    let grid = persistence::load_grid(&args.grid)?;
    let mut state = EditorState::new(grid);

    if let Some(gap) = args.at {
        state = if args.toggle {
            state.toggle(gap)?
        } else {
            state.move_to(gap)?
        };
    }
    for n in args.run {
        state = state.run_length(n)?;
    }

    let output = args.output.unwrap_or(args.grid);
    persistence::save_grid(&state.grid, &output)?;
    println!(
        "Saved to {} (cursor at {:?} {} {})",
        output.display(),
        state.cursor.direction,
        state.cursor.lane,
        state.cursor.offset
    );
    Ok(())
}

/// Formats tile counts, per-piece colors and neighbors, and the ASCII grid.
fn inspect_report(grid: &GridModel) -> String {
    let decomposition = Decomposition::new(grid);
    let adjacency = AdjacencyGraph::new(grid, &decomposition);
    let coloring = Coloring::greedy(&adjacency);

    let mut output = format!(
        "{}x{} tiles, {} pieces, {} colors\n",
        grid.num_tiles_x(),
        grid.num_tiles_y(),
        decomposition.num_pieces(),
        coloring.num_colors()
    );
    for (piece_id, tiles) in decomposition.pieces().iter().enumerate() {
        output.push_str(&format!(
            "piece {}: color {}, {} tiles, borders {:?}\n",
            piece_id,
            coloring.color_of(piece_id),
            tiles.len(),
            adjacency.neighbors(piece_id)
        ));
    }
    output.push_str(&grid.format_grid());
    output
}
