//! 8-connected adjacency list
//!
//! The list drives both field accumulation and transport, so its content and
//! order are fixed: cells in row-major order, and for each cell the in-bounds
//! neighbours in the order
//! `(i+1,j) (i-1,j) (i,j+1) (i,j-1) (i+1,j+1) (i-1,j-1) (i+1,j-1) (i-1,j+1)`.

use std::f32::consts::SQRT_2;

/// Row/column offsets in adjacency order
const NEIGHBOR_OFFSETS: [(isize, isize); 8] = [
    (1, 0),
    (-1, 0),
    (0, 1),
    (0, -1),
    (1, 1),
    (-1, -1),
    (1, -1),
    (-1, 1),
];

/// Ordered pair of a cell `(i, j)` and one in-bounds neighbour `(k, l)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NeighborPair {
    /// Source row
    pub i: usize,
    /// Source column
    pub j: usize,
    /// Neighbour row
    pub k: usize,
    /// Neighbour column
    pub l: usize,
}

impl NeighborPair {
    /// Coupling weight between the two cells.
    ///
    /// Compares the coordinate sums `k + l` and `i + j`: when they differ by
    /// more than one the weight is `sqrt(2)`, otherwise `1`. Only the `(+1,+1)`
    /// and `(-1,-1)` diagonals take the larger weight; the anti-diagonals
    /// keep `1`. The simulation dynamics depend on this exact rule.
    #[inline]
    #[must_use]
    pub fn distance_weight(&self) -> f32 {
        let sum_ij = self.i + self.j;
        let sum_kl = self.k + self.l;
        if sum_kl + 1 < sum_ij || sum_kl > sum_ij + 1 {
            SQRT_2
        } else {
            1.0
        }
    }
}

/// Number of in-bounds 8-neighbours of `(i, j)`
#[must_use]
pub fn neighbor_count(rows: usize, cols: usize, i: usize, j: usize) -> usize {
    NEIGHBOR_OFFSETS
        .iter()
        .filter(|&&(di, dj)| offset(i, di, rows).is_some() && offset(j, dj, cols).is_some())
        .count()
}

/// Build the full adjacency list for a `rows x cols` grid
#[must_use]
pub fn build_neighbor_pairs(rows: usize, cols: usize) -> Vec<NeighborPair> {
    let mut pairs = Vec::with_capacity(rows * cols * NEIGHBOR_OFFSETS.len());
    for i in 0..rows {
        for j in 0..cols {
            for &(di, dj) in &NEIGHBOR_OFFSETS {
                if let (Some(k), Some(l)) = (offset(i, di, rows), offset(j, dj, cols)) {
                    pairs.push(NeighborPair { i, j, k, l });
                }
            }
        }
    }
    pairs
}

#[inline]
fn offset(base: usize, delta: isize, len: usize) -> Option<usize> {
    base.checked_add_signed(delta).filter(|&v| v < len)
}
