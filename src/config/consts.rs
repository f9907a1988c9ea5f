// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use crate::buffer::Coord;

/// Glyph a canvas is filled with when the scene does not name one
pub const DEFAULT_FILLVALUE: char = '·';
/// Owner recorded on cells of canvases declared without one
pub const DEFAULT_OWNER: &str = "anonymous";
/// Position of a hosted canvas on its host when none is given
pub const DEFAULT_ORIGIN: Coord = Coord::new(0, 0);
/// Largest buffer a canvas may hold, in cells
pub const MAX_CANVAS_CELLS: usize = 1 << 24;
/// Filter used when neither the scene nor `RUST_LOG` sets one
pub const DEFAULT_LOG_FILTER: &str = "info";

/// Background glyph of the debug overlay
pub const OVERLAY_FILL: char = '·';
/// Glyph outlining a canvas' footprint on the debug overlay
pub const OVERLAY_BORDER: char = '#';
/// Owner and canvas id stamped on overlay cells
pub const OVERLAY_OWNER: &str = "ref";
