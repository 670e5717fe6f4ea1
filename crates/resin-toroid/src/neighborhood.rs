//! Fixed neighborhoods and toroidal coordinate wrapping.

use crate::error::{AutomatonError, Result};
use crate::lattice::{Coord, Dimensionality, Extents};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A relative cell offset `(dx, dy, dz)`.
pub type Offset = (i32, i32, i32);

/// The ordered set of cells whose states address a rule table.
///
/// Position `i` in [`offsets`](Neighborhood::offsets) is bit `i` of the
/// rule-table index, least significant first. The center cell `(0, 0, 0)` is
/// always present.
pub trait Neighborhood: std::fmt::Debug + Send + Sync {
    /// Returns the dimensionality this neighborhood applies to.
    fn dimensionality(&self) -> Dimensionality;

    /// Returns the ordered offsets, including the center cell.
    fn offsets(&self) -> &[Offset];

    /// Returns the number of cells in the neighborhood (k).
    fn size(&self) -> u32 {
        self.offsets().len() as u32
    }

    /// Returns the number of rule-table entries this neighborhood addresses (2^k).
    fn table_size(&self) -> usize {
        1 << self.size()
    }

    /// Fails with [`AutomatonError::DimensionMismatch`] unless the extents
    /// have this neighborhood's dimensionality.
    fn check_extents(&self, extents: Extents) -> Result<()> {
        let got = extents.dimensionality();
        if got != self.dimensionality() {
            return Err(AutomatonError::DimensionMismatch {
                expected: self.dimensionality(),
                got: Some(got),
            });
        }
        Ok(())
    }

    /// Returns the wrapped coordinates of every neighbor of `coord`, in offset order.
    fn resolve(&self, coord: Coord, extents: Extents) -> Vec<Coord> {
        self.offsets()
            .iter()
            .map(|&offset| wrap(coord, offset, extents))
            .collect()
    }
}

/// Applies `offset` to `coord`, wrapping every axis independently.
///
/// Each axis computes `(c + o) mod e` normalized into `[0, e)`. An axis of
/// extent 1 always resolves to 0.
#[inline]
pub fn wrap(coord: Coord, (dx, dy, dz): Offset, extents: Extents) -> Coord {
    let [w, h, d] = extents.axes();
    Coord::new(
        wrap_axis(coord.x, dx, w),
        wrap_axis(coord.y, dy, h),
        wrap_axis(coord.z, dz, d),
    )
}

#[inline]
fn wrap_axis(c: usize, offset: i32, extent: usize) -> usize {
    (c as isize + offset as isize).rem_euclid(extent as isize) as usize
}

/// 1D three-cell neighborhood used by elementary automata.
///
/// Ordered `[right, self, left]`, so the index is `4·left + 2·self + right`
/// and rule numbers follow Wolfram's numbering.
///
/// ```text
/// ┌───┬───┬───┐
/// │ 2 │ 1 │ 0 │
/// └───┴───┴───┘
/// ```
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Elementary;

impl Neighborhood for Elementary {
    fn dimensionality(&self) -> Dimensionality {
        Dimensionality::One
    }

    fn offsets(&self) -> &[Offset] {
        &[(1, 0, 0), (0, 0, 0), (-1, 0, 0)]
    }
}

/// 2D Von Neumann neighborhood including the center (5 cells).
///
/// Ordered `[north, west, self, east, south]`, north being `y - 1`.
///
/// ```text
/// ┌───┬───┬───┐
/// │   │ 0 │   │
/// ├───┼───┼───┤
/// │ 1 │ 2 │ 3 │
/// ├───┼───┼───┤
/// │   │ 4 │   │
/// └───┴───┴───┘
/// ```
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VonNeumann;

impl Neighborhood for VonNeumann {
    fn dimensionality(&self) -> Dimensionality {
        Dimensionality::Two
    }

    fn offsets(&self) -> &[Offset] {
        &[(0, -1, 0), (-1, 0, 0), (0, 0, 0), (1, 0, 0), (0, 1, 0)]
    }
}

/// 3D Von Neumann neighborhood including the center (7 cells).
///
/// Ordered `[front, north, west, self, east, south, back]` where front is
/// `z + 1` and back is `z - 1`.
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct VonNeumann3D;

impl Neighborhood for VonNeumann3D {
    fn dimensionality(&self) -> Dimensionality {
        Dimensionality::Three
    }

    fn offsets(&self) -> &[Offset] {
        &[
            (0, 0, 1),
            (0, -1, 0),
            (-1, 0, 0),
            (0, 0, 0),
            (1, 0, 0),
            (0, 1, 0),
            (0, 0, -1),
        ]
    }
}

/// Returns the fixed neighborhood for a dimensionality.
pub fn neighborhood_for(dimensionality: Dimensionality) -> &'static dyn Neighborhood {
    match dimensionality {
        Dimensionality::One => &Elementary,
        Dimensionality::Two => &VonNeumann,
        Dimensionality::Three => &VonNeumann3D,
    }
}
