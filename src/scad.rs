//! OpenSCAD source emission for [`Solid`] trees.

use std::fmt::{self, Write as _};
use std::fs;
use std::path::Path;

use tracing::info;

use crate::error::{Error, Result};
use crate::solid::Solid;

const INDENT: &str = "  ";

/// Renders a solid tree as OpenSCAD source.
pub fn render(solid: &Solid) -> Result<String> {
    let mut output = String::new();
    render_node(solid, 0, &mut output)
        .map_err(|e| Error::GeometryEmission(format!("cannot format scad source: {e}")))?;
    Ok(output)
}

/// Writes the OpenSCAD source for `solid` to `path`.
pub fn write(solid: &Solid, path: &Path) -> Result<()> {
    fs::write(path, render(solid)?).map_err(|e| Error::io(path, e))?;
    info!(path = %path.display(), cubes = solid.count_cubes(), "wrote scad file");
    Ok(())
}

fn render_node(solid: &Solid, depth: usize, output: &mut String) -> fmt::Result {
    let indent = INDENT.repeat(depth);
    match solid {
        Solid::Cube { size } => {
            writeln!(output, "{indent}cube(size = {});", vector(size))?;
        }
        Solid::Translate { offset, child } => {
            writeln!(output, "{indent}translate(v = {}) {{", vector(offset))?;
            render_node(child, depth + 1, output)?;
            writeln!(output, "{indent}}}")?;
        }
        Solid::Color { rgb, child } => {
            writeln!(output, "{indent}color(c = {}) {{", vector(rgb))?;
            render_node(child, depth + 1, output)?;
            writeln!(output, "{indent}}}")?;
        }
        Solid::Union(children) => {
            writeln!(output, "{indent}union() {{")?;
            for child in children {
                render_node(child, depth + 1, output)?;
            }
            writeln!(output, "{indent}}}")?;
        }
        Solid::Difference { base, cut } => {
            writeln!(output, "{indent}difference() {{")?;
            render_node(base, depth + 1, output)?;
            render_node(cut, depth + 1, output)?;
            writeln!(output, "{indent}}}")?;
        }
    }
    Ok(())
}

fn vector(values: &[f64; 3]) -> String {
    format!("[{}, {}, {}]", values[0], values[1], values[2])
}
