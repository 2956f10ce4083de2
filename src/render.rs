//! Read-only views of a [Lattice] for debug drawing. Nothing here feeds back into the lattice.
use fxhash::FxHashSet;
use grid_util::point::Point;

use crate::lattice::Lattice;

/// How a cell should be drawn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CellMark {
    Walkable,
    Blocked,
    /// Part of the highlighted path, drawn over walkability.
    Highlighted,
}

impl CellMark {
    pub fn symbol(&self) -> char {
        match self {
            CellMark::Walkable => '.',
            CellMark::Blocked => '#',
            CellMark::Highlighted => '*',
        }
    }
}

/// Marks every cell of the lattice in storage order.
pub fn classify(lattice: &Lattice, path: &[Point]) -> Vec<(Point, CellMark)> {
    let on_path: FxHashSet<Point> = path.iter().copied().collect();
    lattice
        .iter()
        .map(|cell| {
            let point = cell.point();
            let mark = if on_path.contains(&point) {
                CellMark::Highlighted
            } else if cell.walkable {
                CellMark::Walkable
            } else {
                CellMark::Blocked
            };
            (point, mark)
        })
        .collect()
}

/// Text map with the highest Z row first, one character per cell.
pub fn render_with_path(lattice: &Lattice, path: &[Point]) -> String {
    let marks = classify(lattice, path);
    let mut out = String::with_capacity(marks.len() + lattice.size_z());
    for row in marks.chunks(lattice.size_x().max(1)).rev() {
        out.extend(row.iter().map(|(_, mark)| mark.symbol()));
        out.push('\n');
    }
    out
}
