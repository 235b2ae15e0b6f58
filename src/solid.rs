//! Constructive solid geometry tree handed to the modeling tool.
//!
//! Only the five primitives the synthesizer needs are modeled: axis-aligned
//! cubes, translation, union, subtraction and color annotation.

use crate::error::{Error, Result};

/// RGB color with channels in `[0, 1]`.
pub type Rgb = [f64; 3];

#[derive(Clone, Debug, PartialEq)]
pub enum Solid {
    /// Axis-aligned box with one corner at the origin.
    Cube { size: [f64; 3] },
    Translate { offset: [f64; 3], child: Box<Solid> },
    Union(Vec<Solid>),
    /// `base` minus `cut`.
    Difference { base: Box<Solid>, cut: Box<Solid> },
    Color { rgb: Rgb, child: Box<Solid> },
}

/// A box of the given extents.
///
/// Fails for zero, negative or non-finite extents, which the modeling tool
/// would otherwise silently drop or reject at export time.
pub fn cube(dx: f64, dy: f64, dz: f64) -> Result<Solid> {
    let size = [dx, dy, dz];
    if size.iter().any(|extent| !extent.is_finite() || *extent <= 0.0) {
        return Err(Error::GeometryEmission(format!(
            "degenerate cube {dx} x {dy} x {dz}"
        )));
    }
    Ok(Solid::Cube { size })
}

pub fn translate(dx: f64, dy: f64, dz: f64, child: Solid) -> Solid {
    Solid::Translate {
        offset: [dx, dy, dz],
        child: Box::new(child),
    }
}

pub fn union(children: impl IntoIterator<Item = Solid>) -> Solid {
    Solid::Union(children.into_iter().collect())
}

pub fn subtract(base: Solid, cut: Solid) -> Solid {
    Solid::Difference {
        base: Box::new(base),
        cut: Box::new(cut),
    }
}

pub fn color(r: f64, g: f64, b: f64, child: Solid) -> Solid {
    Solid::Color {
        rgb: [r, g, b],
        child: Box::new(child),
    }
}

impl Solid {
    /// Number of cube primitives in the tree.
    pub fn count_cubes(&self) -> usize {
        match self {
            Solid::Cube { .. } => 1,
            Solid::Translate { child, .. } | Solid::Color { child, .. } => child.count_cubes(),
            Solid::Union(children) => children.iter().map(Solid::count_cubes).sum(),
            Solid::Difference { base, cut } => base.count_cubes() + cut.count_cubes(),
        }
    }

    /// Shorthand for wrapping `self` in a translation.
    pub fn translated(self, dx: f64, dy: f64, dz: f64) -> Solid {
        translate(dx, dy, dz, self)
    }
}
