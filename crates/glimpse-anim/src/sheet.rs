//! Sprite-sheet slicing.

use std::fmt;
use std::str::FromStr;

use crate::frame::SheetFrame;
use crate::{Error, Result};

/// Filename fragments that mark an image as a sprite sheet.
pub const SHEET_NAME_HINTS: &[&str] = &["sheet", "sprite", "atlas", "tileset"];

/// Returns `true` if `name` looks like a sprite sheet (case-insensitive substring match).
pub fn is_sprite_sheet_name(name: &str) -> bool {
    let lower = name.to_lowercase();
    SHEET_NAME_HINTS.iter().any(|hint| lower.contains(hint))
}

/// Row and column count of a uniform sprite-sheet grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SheetGrid {
    pub rows: u32,
    pub columns: u32,
}

impl SheetGrid {
    pub const fn new(rows: u32, columns: u32) -> Self {
        Self { rows, columns }
    }

    /// Grid with both dimensions raised to at least 1.
    pub fn clamped(rows: u32, columns: u32) -> Self {
        Self::new(rows.max(1), columns.max(1))
    }

    pub fn cell_count(&self) -> usize {
        self.rows as usize * self.columns as usize
    }

    /// Slice an image of the given size with this grid.
    pub fn frames(&self, width: u32, height: u32) -> Result<Vec<SheetFrame>> {
        detect_frames(width, height, self.rows, self.columns)
    }
}

impl Default for SheetGrid {
    fn default() -> Self {
        Self::new(4, 4)
    }
}

impl fmt::Display for SheetGrid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.rows, self.columns)
    }
}

impl FromStr for SheetGrid {
    type Err = String;

    /// Parses `ROWSxCOLUMNS`, e.g. `4x8`.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let (rows, columns) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected ROWSxCOLUMNS, got {s:?}"))?;
        let rows = rows.trim().parse().map_err(|e| format!("invalid rows: {e}"))?;
        let columns = columns.trim().parse().map_err(|e| format!("invalid columns: {e}"))?;
        Ok(Self::new(rows, columns))
    }
}

/// Slice a `width` x `height` image into `rows` x `columns` equal cells.
///
/// Cells are returned in row-major order. Cell sizes are real-valued and
/// not rounded.
pub fn detect_frames(width: u32, height: u32, rows: u32, columns: u32) -> Result<Vec<SheetFrame>> {
    if rows < 1 || columns < 1 {
        return Err(Error::InvalidGrid { rows, columns });
    }

    let frame_width = f64::from(width) / f64::from(columns);
    let frame_height = f64::from(height) / f64::from(rows);

    let mut frames = Vec::with_capacity(rows as usize * columns as usize);
    for row in 0..rows {
        for col in 0..columns {
            frames.push(SheetFrame {
                x: f64::from(col) * frame_width,
                y: f64::from(row) * frame_height,
                width: frame_width,
                height: frame_height,
            });
        }
    }

    Ok(frames)
}
