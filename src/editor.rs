//! Headless grid editing.
//!
//! The editor state is an explicit record (grid plus cursor) threaded
//! through update functions, so scripted edits and tests see exactly the
//! state transitions an interactive front end would.

use std::str::FromStr;

use crate::error::{Error, Result};
use crate::grid::{Direction, Gap, GridModel};

/// Grid being edited and the gap the cursor rests on.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EditorState {
    pub grid: GridModel,
    pub cursor: Gap,
}

impl EditorState {
    /// Starts editing with the cursor on the first vertical gap.
    pub fn new(grid: GridModel) -> Self {
        Self {
            grid,
            cursor: Gap::vertical(0, 0),
        }
    }

    /// Sets a gap's open state without moving the cursor.
    pub fn set_gap(mut self, gap: Gap, open: bool) -> Result<Self> {
        self.check(gap)?;
        self.grid.set_open(gap, open);
        Ok(self)
    }

    /// Moves the cursor to a gap inside the grid.
    pub fn move_to(mut self, gap: Gap) -> Result<Self> {
        self.check(gap)?;
        self.cursor = gap;
        Ok(self)
    }

    /// Flips a gap and moves the cursor onto it.
    pub fn toggle(mut self, gap: Gap) -> Result<Self> {
        self.check(gap)?;
        let open = self.grid.is_gap_open(gap);
        self.grid.set_open(gap, !open);
        self.cursor = gap;
        Ok(self)
    }

    /// Run-length entry: bridges the next `n - 1` gaps along the cursor's
    /// lane, then opens the gap `n` positions ahead and moves the cursor there.
    ///
    /// Positions past the end of the lane are clamped to its last gap.
    pub fn run_length(mut self, n: usize) -> Result<Self> {
        if !(1..=9).contains(&n) {
            return Err(Error::Validation(format!(
                "run length must be a digit 1-9, got {n}"
            )));
        }
        self.check(self.cursor)?;

        let cursor = self.cursor;
        let last_offset = self.grid.lane_len(cursor.direction) - 1;
        let at = |steps: usize| Gap {
            offset: (cursor.offset + steps).min(last_offset),
            ..cursor
        };

        for step in 1..n {
            self.grid.set_open(at(step), false);
        }
        let end = at(n);
        self.grid.set_open(end, true);
        self.cursor = end;
        Ok(self)
    }

    fn check(&self, gap: Gap) -> Result<()> {
        if self.grid.contains_gap(gap) {
            Ok(())
        } else {
            Err(Error::Validation(format!(
                "gap {gap:?} outside {}x{} grid",
                self.grid.num_tiles_x(),
                self.grid.num_tiles_y()
            )))
        }
    }
}

/// Parses `h,lane,offset` or `v,lane,offset`.
impl FromStr for Gap {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let mut parts = s.split(',').map(str::trim);
        let direction = match parts.next() {
            Some("h") => Direction::Horizontal,
            Some("v") => Direction::Vertical,
            _ => return Err(format!("gap '{s}' must start with 'h' or 'v'")),
        };
        let mut number = |name: &str| -> std::result::Result<usize, String> {
            parts
                .next()
                .ok_or_else(|| format!("gap '{s}' is missing its {name}"))?
                .parse()
                .map_err(|e| format!("gap '{s}' has an invalid {name}: {e}"))
        };
        let lane = number("lane")?;
        let offset = number("offset")?;
        if parts.next().is_some() {
            return Err(format!("gap '{s}' has trailing fields"));
        }
        Ok(Gap {
            direction,
            lane,
            offset,
        })
    }
}
