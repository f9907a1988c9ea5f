// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Grid buffer utilities.
//!
//! A [`Buffer`] is the 2-D cell grid owned by a single canvas actor. Everything in
//! this module is a plain function over a buffer: generation, cell writes, bulk
//! writes driven by a chart/metadata pair, and rendering to printable text.
//!
//! Coordinates are 0-based `(row, col)` pairs. They are signed so that charts may
//! reference positions left of or above a buffer; such positions are simply out of
//! bounds and every write helper skips them.

mod layout;

pub use layout::{box_borders, rect_coords, wrapped_chart};

use serde::{Deserialize, Serialize};

/// A `(row, col)` grid position. Serialized as a two-element array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "(i64, i64)", into = "(i64, i64)")]
pub struct Coord {
    pub row: i64,
    pub col: i64,
}

impl Coord {
    pub const fn new(row: i64, col: i64) -> Self {
        Self { row, col }
    }

    /// Translate this coordinate by `origin`.
    pub fn offset(self, origin: Coord) -> Coord {
        Coord {
            row: self.row.saturating_add(origin.row),
            col: self.col.saturating_add(origin.col),
        }
    }
}

impl From<(i64, i64)> for Coord {
    fn from((row, col): (i64, i64)) -> Self {
        Self { row, col }
    }
}

impl From<Coord> for (i64, i64) {
    fn from(coord: Coord) -> Self {
        (coord.row, coord.col)
    }
}

impl std::fmt::Display for Coord {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Metadata stored at one grid position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    #[serde(rename = "char")]
    pub glyph: char,
    pub owner: String,
    pub canvas_id: String,
    pub visible: bool,
}

/// A partial [`Cell`]. Only the fields that are present are written.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellPatch {
    #[serde(rename = "char", default, skip_serializing_if = "Option::is_none")]
    pub glyph: Option<char>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub canvas_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
}

impl CellPatch {
    /// Patch that only sets the glyph.
    pub fn glyph(glyph: char) -> Self {
        Self {
            glyph: Some(glyph),
            ..Default::default()
        }
    }

    /// Copy every field that is present in `other` over this patch.
    pub fn merge(&mut self, other: &CellPatch) {
        if let Some(glyph) = other.glyph {
            self.glyph = Some(glyph);
        }
        if let Some(owner) = &other.owner {
            self.owner = Some(owner.clone());
        }
        if let Some(canvas_id) = &other.canvas_id {
            self.canvas_id = Some(canvas_id.clone());
        }
        if let Some(visible) = other.visible {
            self.visible = Some(visible);
        }
    }

    pub fn apply_to(&self, cell: &mut Cell) {
        if let Some(glyph) = self.glyph {
            cell.glyph = glyph;
        }
        if let Some(owner) = &self.owner {
            cell.owner.clone_from(owner);
        }
        if let Some(canvas_id) = &self.canvas_id {
            cell.canvas_id.clone_from(canvas_id);
        }
        if let Some(visible) = self.visible {
            cell.visible = visible;
        }
    }
}

impl From<&Cell> for CellPatch {
    fn from(cell: &Cell) -> Self {
        Self {
            glyph: Some(cell.glyph),
            owner: Some(cell.owner.clone()),
            canvas_id: Some(cell.canvas_id.clone()),
            visible: Some(cell.visible),
        }
    }
}

/// Row-major grid of cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Buffer {
    height: usize,
    width: usize,
    rows: Vec<Vec<Cell>>,
}

impl Buffer {
    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn cell_count(&self) -> usize {
        self.height.saturating_mul(self.width)
    }

    pub fn contains(&self, coord: Coord) -> bool {
        self.index(coord).is_some()
    }

    pub fn get(&self, coord: Coord) -> Option<&Cell> {
        let (row, col) = self.index(coord)?;
        Some(&self.rows[row][col])
    }

    pub fn get_mut(&mut self, coord: Coord) -> Option<&mut Cell> {
        let (row, col) = self.index(coord)?;
        Some(&mut self.rows[row][col])
    }

    pub fn rows(&self) -> impl Iterator<Item = &[Cell]> {
        self.rows.iter().map(|row| row.as_slice())
    }

    /// Every cell paired with its coordinate, in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = (Coord, &Cell)> {
        self.rows.iter().enumerate().flat_map(|(row, cells)| {
            cells
                .iter()
                .enumerate()
                .map(move |(col, cell)| (Coord::new(row as i64, col as i64), cell))
        })
    }

    fn index(&self, coord: Coord) -> Option<(usize, usize)> {
        let row = usize::try_from(coord.row).ok().filter(|r| *r < self.height)?;
        let col = usize::try_from(coord.col).ok().filter(|c| *c < self.width)?;
        Some((row, col))
    }
}

/// Allocate a `height × width` buffer with every cell set to `fillvalue`.
pub fn generate(
    height: usize,
    width: usize,
    fillvalue: char,
    owner: &str,
    canvas_id: &str,
    visible: bool,
) -> Buffer {
    let template = Cell {
        glyph: fillvalue,
        owner: owner.to_string(),
        canvas_id: canvas_id.to_string(),
        visible,
    };
    Buffer {
        height,
        width,
        rows: vec![vec![template; width]; height],
    }
}

/// Merge `patch` into the cell at `coord`. Returns `false` when out of bounds.
pub fn write_cell(buffer: &mut Buffer, coord: Coord, patch: &CellPatch) -> bool {
    match buffer.get_mut(coord) {
        Some(cell) => {
            patch.apply_to(cell);
            true
        }
        None => false,
    }
}

/// Zip `chart` with `metadata` and write each pair, returning how many landed.
///
/// Pairing stops at the shorter of the two lists; callers that require equal
/// lengths check before calling.
pub fn bulk_write(buffer: &mut Buffer, chart: &[Coord], metadata: &[CellPatch]) -> usize {
    chart
        .iter()
        .zip(metadata)
        .filter(|(coord, patch)| write_cell(buffer, **coord, patch))
        .count()
}

/// Render a buffer as newline-terminated rows of glyphs.
///
/// Hidden cells and cells whose glyph equals `transparent` render as a space.
pub fn render(buffer: &Buffer, transparent: Option<char>) -> String {
    let mut out = String::with_capacity(buffer.height * (buffer.width + 1));
    for row in buffer.rows() {
        for cell in row {
            if !cell.visible || Some(cell.glyph) == transparent {
                out.push(' ');
            } else {
                out.push(cell.glyph);
            }
        }
        out.push('\n');
    }
    out
}
