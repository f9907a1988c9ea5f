// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Local-to-host coordinate translation.
//!
//! A canvas placed at `origin` on its host maps local `(row, col)` to host
//! `(origin.row + row, origin.col + col)`. The host dimensions used for bounds
//! checks are whatever the registry reported when the chart was last built; they
//! may be stale if the host has since resized. Cells that translate outside those
//! dimensions are dropped, and the host's own write bounds check drops anything a
//! stale chart lets through, so staleness never produces an out-of-bounds write.

use crate::buffer::{box_borders, generate, Buffer, CellPatch, Coord};
use crate::config::consts::{OVERLAY_BORDER, OVERLAY_FILL, OVERLAY_OWNER};

/// Cached mapping from a canvas' local space into its host's space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversionChart {
    origin: Coord,
    height: usize,
    width: usize,
    host_height: usize,
    host_width: usize,
}

impl ConversionChart {
    pub fn new(
        origin: Coord,
        (height, width): (usize, usize),
        (host_height, host_width): (usize, usize),
    ) -> Self {
        Self {
            origin,
            height,
            width,
            host_height,
            host_width,
        }
    }

    pub fn origin(&self) -> Coord {
        self.origin
    }

    /// Host dimensions this chart was built against.
    pub fn host_dimensions(&self) -> (usize, usize) {
        (self.host_height, self.host_width)
    }

    /// Host coordinate for `local`, or `None` if it falls outside the host.
    pub fn translate(&self, local: Coord) -> Option<Coord> {
        let host = local.offset(self.origin);
        let in_rows = usize::try_from(host.row).is_ok_and(|row| row < self.host_height);
        let in_cols = usize::try_from(host.col).is_ok_and(|col| col < self.host_width);
        (in_rows && in_cols).then_some(host)
    }

    /// Buffer of host dimensions with this canvas' footprint outlined.
    pub fn overlay(&self) -> Buffer {
        let mut overlay = generate(
            self.host_height,
            self.host_width,
            OVERLAY_FILL,
            OVERLAY_OWNER,
            OVERLAY_OWNER,
            true,
        );
        box_borders(&mut overlay, self.origin, self.height, self.width, OVERLAY_BORDER);
        overlay
    }
}

/// Chart/metadata pair in host space, ready to be packed into a packet.
#[derive(Debug, Default, PartialEq)]
pub struct Translated {
    pub chart: Vec<Coord>,
    pub metadata: Vec<CellPatch>,
    pub dropped: usize,
}

/// Translate local cells through `chart`, dropping the ones outside the host.
pub fn translate_cells<I>(chart: &ConversionChart, cells: I) -> Translated
where
    I: IntoIterator<Item = (Coord, CellPatch)>,
{
    let mut translated = Translated::default();
    for (local, patch) in cells {
        match chart.translate(local) {
            Some(host) => {
                translated.chart.push(host);
                translated.metadata.push(patch);
            }
            None => translated.dropped += 1,
        }
    }
    translated
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::render;

    #[test]
    fn test_translate_offsets_by_origin() {
        let chart = ConversionChart::new(Coord::new(2, 3), (2, 2), (10, 10));
        assert_eq!(chart.translate(Coord::new(0, 0)), Some(Coord::new(2, 3)));
        assert_eq!(chart.translate(Coord::new(1, 1)), Some(Coord::new(3, 4)));
    }

    #[test]
    fn test_translate_drops_outside_host() {
        let chart = ConversionChart::new(Coord::new(-1, 8), (3, 3), (4, 10));
        assert_eq!(chart.translate(Coord::new(0, 0)), None);
        assert_eq!(chart.translate(Coord::new(1, 1)), Some(Coord::new(0, 9)));
        assert_eq!(chart.translate(Coord::new(1, 2)), None);
    }

    #[test]
    fn test_translate_cells_keeps_pairs_aligned() {
        let chart = ConversionChart::new(Coord::new(0, 1), (1, 3), (1, 3));
        let cells = vec![
            (Coord::new(0, 0), CellPatch::glyph('a')),
            (Coord::new(0, 2), CellPatch::glyph('b')),
            (Coord::new(0, 1), CellPatch::glyph('c')),
        ];

        let translated = translate_cells(&chart, cells);

        assert_eq!(translated.chart, vec![Coord::new(0, 1), Coord::new(0, 2)]);
        assert_eq!(
            translated.metadata,
            vec![CellPatch::glyph('a'), CellPatch::glyph('c')]
        );
        assert_eq!(translated.dropped, 1);
    }

    #[test]
    fn test_overlay_outlines_footprint() {
        let chart = ConversionChart::new(Coord::new(1, 1), (2, 3), (4, 5));
        let overlay = chart.overlay();
        assert_eq!(overlay.height(), 4);
        assert_eq!(overlay.width(), 5);
        assert_eq!(render(&overlay, None), "·····\n·###·\n·###·\n·····\n");
    }
}
