// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Coordinate-list helpers: rectangles, borders and wrapped text placement.

use super::{write_cell, Buffer, CellPatch, Coord};

/// Row-major coordinates of the `height × width` rectangle whose top-left is `corner`.
pub fn rect_coords(corner: Coord, height: usize, width: usize) -> Vec<Coord> {
    let rows = i64::try_from(height).unwrap_or(i64::MAX);
    let cols = i64::try_from(width).unwrap_or(i64::MAX);
    (0..rows)
        .flat_map(|row| (0..cols).map(move |col| Coord::new(row, col).offset(corner)))
        .collect()
}

/// Outline the `height × width` rectangle at `corner` with `glyph`.
///
/// Border cells that fall outside the buffer are skipped. Edges are clamped to
/// the `i64` range, so a corner far off the grid draws nothing.
pub fn box_borders(buffer: &mut Buffer, corner: Coord, height: usize, width: usize, glyph: char) {
    if height == 0 || width == 0 {
        return;
    }
    let patch = CellPatch::glyph(glyph);
    let bottom = corner.row.saturating_add(span(height));
    let right = corner.col.saturating_add(span(width));

    // Only the part of each edge that overlaps the buffer is walked.
    let cols = corner.col.max(0)..=right.min(span(buffer.width()));
    for col in cols {
        write_cell(buffer, Coord::new(corner.row, col), &patch);
        write_cell(buffer, Coord::new(bottom, col), &patch);
    }
    let last_row = span(buffer.height());
    let rows = corner.row.saturating_add(1).max(0)..bottom.min(last_row.saturating_add(1));
    for row in rows {
        write_cell(buffer, Coord::new(row, corner.col), &patch);
        write_cell(buffer, Coord::new(row, right), &patch);
    }
}

/// Offset from the first to the last index of a run of `len` cells.
fn span(len: usize) -> i64 {
    i64::try_from(len).map_or(i64::MAX, |len| len - 1)
}

/// Chart for placing `text` starting at `origin`, wrapping every `width` glyphs.
///
/// A newline moves to the start of the next row and consumes no coordinate, so the
/// chart has exactly one entry per non-newline character.
pub fn wrapped_chart(origin: Coord, text: &str, width: usize) -> Vec<Coord> {
    let width = width.max(1) as i64;
    let mut chart = Vec::with_capacity(text.len());
    let (mut row, mut col) = (origin.row, origin.col);

    for ch in text.chars() {
        if ch == '\n' {
            row = row.saturating_add(1);
            col = origin.col;
            continue;
        }
        chart.push(Coord::new(row, col));
        col = col.saturating_add(1);
        if col.saturating_sub(origin.col) >= width {
            col = origin.col;
            row = row.saturating_add(1);
        }
    }
    chart
}
