//! Walkway adjacency inference.
//!
//! Everything here is recomputed from a floor's paint map on request; no
//! graph is stored. Two walkway cells are joined by a primary edge when they
//! share a side, and by a secondary edge when they share only a corner and
//! the two cells completing the square are not both walkway. A diagonal next
//! to an existing L-shaped route would let a pathfinder cut a corner that may
//! not be walkable at 45 degrees.

use crate::cell::CellKey;
use crate::palette::ColorKey;
use serde::Serialize;
use std::collections::BTreeMap;

const ORTHOGONAL: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, 1), (0, -1)];
const DIAGONAL: [(i32, i32); 4] = [(-1, 1), (-1, -1), (1, 1), (1, -1)];

/// Edge classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    /// Shared side (N, S, E, W).
    Primary,
    /// Shared corner with no L-shaped alternative.
    Secondary,
}

/// An undirected edge between two walkway cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Edge {
    /// Lower endpoint when produced by [`Connectivity::graph`].
    pub from: CellKey,
    pub to: CellKey,
    pub kind: EdgeKind,
}

/// Read-only view of one floor's walkway cells.
#[derive(Debug, Clone, Copy)]
pub struct Connectivity<'a> {
    cells: &'a BTreeMap<CellKey, ColorKey>,
    walkway: &'a ColorKey,
}

impl<'a> Connectivity<'a> {
    /// View over a floor's paint map with `walkway` as the traversable color.
    pub fn new(cells: &'a BTreeMap<CellKey, ColorKey>, walkway: &'a ColorKey) -> Self {
        Self { cells, walkway }
    }

    /// Whether the cell is painted with the walkway color.
    pub fn is_walkway(&self, cell: CellKey) -> bool {
        self.cells.get(&cell) == Some(self.walkway)
    }

    /// A neighbor past the edge of the `i32` grid is never walkway.
    fn walkway_at(&self, cell: Option<CellKey>) -> bool {
        cell.is_some_and(|c| self.is_walkway(c))
    }

    /// Orthogonal walkway neighbors, in N, S, E, W order.
    pub fn primary_edges(&self, cell: CellKey) -> Vec<CellKey> {
        if !self.is_walkway(cell) {
            return Vec::new();
        }
        ORTHOGONAL
            .iter()
            .filter_map(|&(dr, dc)| cell.offset(dr, dc))
            .filter(|&n| self.is_walkway(n))
            .collect()
    }

    /// Diagonal walkway neighbors without an orthogonal two-step route, in
    /// NE, NW, SE, SW order.
    pub fn secondary_edges(&self, cell: CellKey) -> Vec<CellKey> {
        if !self.is_walkway(cell) {
            return Vec::new();
        }
        DIAGONAL
            .iter()
            .filter_map(|&(dr, dc)| {
                let diagonal = cell.offset(dr, dc).filter(|&d| self.is_walkway(d))?;
                let both_legs = self.walkway_at(cell.offset(dr, 0)) && self.walkway_at(cell.offset(0, dc));
                (!both_legs).then_some(diagonal)
            })
            .collect()
    }

    /// Primary edges followed by secondary edges.
    pub fn edges(&self, cell: CellKey) -> Vec<Edge> {
        let primary = self.primary_edges(cell).into_iter().map(|to| Edge {
            from: cell,
            to,
            kind: EdgeKind::Primary,
        });
        let secondary = self.secondary_edges(cell).into_iter().map(|to| Edge {
            from: cell,
            to,
            kind: EdgeKind::Secondary,
        });
        primary.chain(secondary).collect()
    }

    /// Whether a walkway cell has two perpendicular walkway neighbors, i.e.
    /// a path through it may be forced into a 90 degree turn. Advisory only.
    pub fn is_sharp_corner(&self, cell: CellKey) -> bool {
        if !self.is_walkway(cell) {
            return false;
        }
        let north = self.walkway_at(cell.north());
        let south = self.walkway_at(cell.south());
        let east = self.walkway_at(cell.east());
        let west = self.walkway_at(cell.west());
        (north && east) || (north && west) || (south && east) || (south && west)
    }

    /// Every walkway cell, in row-major order.
    pub fn walkway_cells(&self) -> impl Iterator<Item = CellKey> + 'a {
        let walkway = self.walkway;
        self.cells
            .iter()
            .filter(move |&(_, color)| color == walkway)
            .map(|(&cell, _)| cell)
    }

    /// Each undirected edge once, with `from < to`, sorted.
    pub fn graph(&self) -> Vec<Edge> {
        let mut edges: Vec<Edge> = self
            .walkway_cells()
            .flat_map(|cell| self.edges(cell))
            .filter(|edge| edge.from < edge.to)
            .collect();
        edges.sort();
        edges
    }

    /// All cells flagged by [`Connectivity::is_sharp_corner`], sorted.
    pub fn sharp_corners(&self) -> Vec<CellKey> {
        self.walkway_cells().filter(|&c| self.is_sharp_corner(c)).collect()
    }
}
