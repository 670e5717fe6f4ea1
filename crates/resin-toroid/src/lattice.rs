//! Dense boolean lattices in one, two, or three dimensions.
//!
//! Cells live in a single flat buffer indexed row-major:
//! `(z * height + y) * width + x`. Axes a lattice does not have report an
//! extent of 1, so a 1D lattice is a `width x 1 x 1` block.

use crate::error::{AutomatonError, Result};
use rand::Rng;
use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Number of spatial axes of a lattice.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Dimensionality {
    /// A single row of cells.
    One,
    /// A plane of cells.
    Two,
    /// A volume of cells.
    Three,
}

impl Dimensionality {
    /// Returns the number of axes.
    pub fn rank(self) -> usize {
        match self {
            Self::One => 1,
            Self::Two => 2,
            Self::Three => 3,
        }
    }
}

impl fmt::Display for Dimensionality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}D", self.rank())
    }
}

/// Extents of a lattice, one positive length per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Extents {
    /// Width.
    D1(usize),
    /// Width and height.
    D2(usize, usize),
    /// Width, height and depth.
    D3(usize, usize, usize),
}

impl Extents {
    /// Returns the dimensionality these extents describe.
    pub fn dimensionality(&self) -> Dimensionality {
        match self {
            Self::D1(..) => Dimensionality::One,
            Self::D2(..) => Dimensionality::Two,
            Self::D3(..) => Dimensionality::Three,
        }
    }

    /// Returns `[width, height, depth]`, padding missing axes with 1.
    pub fn axes(&self) -> [usize; 3] {
        match *self {
            Self::D1(w) => [w, 1, 1],
            Self::D2(w, h) => [w, h, 1],
            Self::D3(w, h, d) => [w, h, d],
        }
    }

    /// Returns the width (X extent).
    pub fn width(&self) -> usize {
        self.axes()[0]
    }

    /// Returns the height (Y extent); 1 for 1D lattices.
    pub fn height(&self) -> usize {
        self.axes()[1]
    }

    /// Returns the depth (Z extent); 1 for 1D and 2D lattices.
    pub fn depth(&self) -> usize {
        self.axes()[2]
    }

    /// Returns the total number of cells.
    ///
    /// Only meaningful for extents that passed [`validate`](Self::validate).
    pub fn cell_count(&self) -> usize {
        self.axes().iter().product()
    }

    /// Checks that every declared axis is at least 1 and that the cell
    /// count fits a single buffer.
    pub fn validate(&self) -> Result<()> {
        let rank = self.dimensionality().rank();
        for (axis, &extent) in self.axes()[..rank].iter().enumerate() {
            if extent < 1 {
                return Err(AutomatonError::InvalidDimension { axis, extent });
            }
        }
        self.checked_cell_count()
            .filter(|&count| count <= isize::MAX as usize)
            .map(|_| ())
            .ok_or(AutomatonError::LatticeTooLarge { extents: *self })
    }

    /// Returns the total number of cells, or `None` on overflow.
    pub fn checked_cell_count(&self) -> Option<usize> {
        self.axes()
            .iter()
            .try_fold(1usize, |count, &extent| count.checked_mul(extent))
    }

    /// Returns the geometric center cell, `floor(extent / 2)` on every axis.
    pub fn center(&self) -> Coord {
        let [w, h, d] = self.axes();
        Coord::new(w / 2, h / 2, d / 2)
    }

    /// Returns whether `coord` lies inside these extents.
    pub fn contains(&self, coord: Coord) -> bool {
        let [w, h, d] = self.axes();
        coord.x < w && coord.y < h && coord.z < d
    }

    /// Returns the flat buffer index of an in-range coordinate.
    #[inline]
    pub fn index(&self, coord: Coord) -> usize {
        let [w, h, _] = self.axes();
        (coord.z * h + coord.y) * w + coord.x
    }

    /// Converts a flat buffer index back to a coordinate.
    #[inline]
    pub fn coord(&self, index: usize) -> Coord {
        let [w, h, _] = self.axes();
        Coord::new(index % w, (index / w) % h, index / (w * h))
    }
}

impl fmt::Display for Extents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::D1(w) => write!(f, "{w}"),
            Self::D2(w, h) => write!(f, "{w}x{h}"),
            Self::D3(w, h, d) => write!(f, "{w}x{h}x{d}"),
        }
    }
}

/// A cell coordinate. Axes beyond the lattice's rank are 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Coord {
    /// X (column).
    pub x: usize,
    /// Y (row).
    pub y: usize,
    /// Z (plane).
    pub z: usize,
}

impl Coord {
    /// Creates a coordinate.
    pub const fn new(x: usize, y: usize, z: usize) -> Self {
        Self { x, y, z }
    }

    /// Returns the coordinate as `[x, y, z]`.
    pub fn to_array(self) -> [usize; 3] {
        [self.x, self.y, self.z]
    }
}

impl From<usize> for Coord {
    fn from(x: usize) -> Self {
        Self::new(x, 0, 0)
    }
}

impl From<(usize, usize)> for Coord {
    fn from((x, y): (usize, usize)) -> Self {
        Self::new(x, y, 0)
    }
}

impl From<(usize, usize, usize)> for Coord {
    fn from((x, y, z): (usize, usize, usize)) -> Self {
        Self::new(x, y, z)
    }
}

impl From<[usize; 3]> for Coord {
    fn from([x, y, z]: [usize; 3]) -> Self {
        Self::new(x, y, z)
    }
}

/// One generation of an automaton: a dense boolean grid with fixed extents.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "RawLattice")
)]
pub struct Lattice {
    /// Extents, fixed for the lifetime of the lattice.
    extents: Extents,
    /// Cell states (true = filled), row-major.
    cells: Vec<bool>,
}

impl Lattice {
    /// Creates an all-empty lattice. See [`create_empty`].
    pub fn new(extents: Extents) -> Result<Self> {
        create_empty(extents)
    }

    /// Wraps an existing row-major cell buffer.
    ///
    /// Fails if the extents are invalid or `cells` does not hold exactly one
    /// value per cell.
    pub fn from_cells(extents: Extents, cells: Vec<bool>) -> Result<Self> {
        extents.validate()?;
        let expected = extents.cell_count();
        if cells.len() != expected {
            return Err(AutomatonError::CellCountMismatch {
                extents,
                expected,
                got: cells.len(),
            });
        }
        Ok(Self { extents, cells })
    }

    /// Returns the extents.
    pub fn extents(&self) -> Extents {
        self.extents
    }

    /// Returns the dimensionality.
    pub fn dimensionality(&self) -> Dimensionality {
        self.extents.dimensionality()
    }

    /// Returns the total number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Always false: a lattice holds at least one cell.
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Gets the state of a cell. Out-of-range coordinates read as empty.
    pub fn get(&self, coord: impl Into<Coord>) -> bool {
        let coord = coord.into();
        self.extents.contains(coord) && self.cells[self.extents.index(coord)]
    }

    /// Sets the state of a cell. Out-of-range coordinates are ignored.
    pub fn set(&mut self, coord: impl Into<Coord>, filled: bool) {
        let coord = coord.into();
        if self.extents.contains(coord) {
            let index = self.extents.index(coord);
            self.cells[index] = filled;
        }
    }

    /// Clears all cells.
    pub fn clear(&mut self) {
        self.cells.fill(false);
    }

    /// Returns the flat row-major cell buffer.
    pub fn cells(&self) -> &[bool] {
        &self.cells
    }

    /// Returns one row of cells (fixed `y` and `z`).
    pub fn row(&self, y: usize, z: usize) -> Option<&[bool]> {
        let [w, h, d] = self.extents.axes();
        if y >= h || z >= d {
            return None;
        }
        let start = self.extents.index(Coord::new(0, y, z));
        Some(&self.cells[start..start + w])
    }

    /// Iterates over every coordinate in buffer order.
    pub fn iter_coords(&self) -> impl Iterator<Item = Coord> + '_ {
        (0..self.cells.len()).map(|i| self.extents.coord(i))
    }

    /// Counts filled cells.
    pub fn population(&self) -> usize {
        self.cells.iter().filter(|&&c| c).count()
    }

    /// Renders the lattice as text, one line per row.
    ///
    /// 3D lattices print their Z planes in order, separated by a blank line.
    pub fn to_string_art(&self) -> String {
        let [_, h, d] = self.extents.axes();
        let mut result = String::new();
        for z in 0..d {
            if z > 0 {
                result.push('\n');
            }
            for y in 0..h {
                if let Some(row) = self.row(y, z) {
                    push_row(&mut result, row);
                }
            }
        }
        result
    }

    pub(crate) fn from_parts(extents: Extents, cells: Vec<bool>) -> Self {
        debug_assert_eq!(extents.cell_count(), cells.len());
        Self { extents, cells }
    }

    pub(crate) fn cells_mut(&mut self) -> &mut [bool] {
        &mut self.cells
    }
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawLattice {
    extents: Extents,
    cells: Vec<bool>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawLattice> for Lattice {
    type Error = AutomatonError;

    fn try_from(raw: RawLattice) -> Result<Self> {
        Self::from_cells(raw.extents, raw.cells)
    }
}

fn push_row(out: &mut String, row: &[bool]) {
    for &cell in row {
        out.push(if cell { '█' } else { '·' });
    }
    out.push('\n');
}

/// Renders a stack of 1D generations as text, one generation per line.
pub fn history_art(history: &[Lattice]) -> String {
    let mut result = String::new();
    for generation in history {
        push_row(&mut result, generation.cells());
    }
    result
}

/// Allocates an all-empty lattice.
///
/// Fails with [`AutomatonError::InvalidDimension`] if any extent is 0, or
/// [`AutomatonError::LatticeTooLarge`] if the cell count overflows.
///
/// # Example
///
/// ```
/// use rhizome_resin_toroid::{create_empty, Extents};
///
/// let lattice = create_empty(Extents::D2(4, 3)).unwrap();
/// assert_eq!(lattice.len(), 12);
/// assert_eq!(lattice.population(), 0);
/// ```
pub fn create_empty(extents: Extents) -> Result<Lattice> {
    extents.validate()?;
    Ok(Lattice::from_parts(extents, vec![false; extents.cell_count()]))
}

/// Clears the lattice and fills the single cell nearest its center.
pub fn seed_center(mut lattice: Lattice) -> Lattice {
    lattice.clear();
    let center = lattice.extents.center();
    lattice.set(center, true);
    lattice
}

/// Fills cells at random from an injected source.
///
/// Each cell draws a uniform `f32` in `[0, 1)` and is filled when the draw is
/// at or above `density`, so `density` is the expected fraction of empty
/// cells: 0.0 fills everything, 1.0 leaves everything empty.
pub fn seed_random<R: Rng>(
    mut lattice: Lattice,
    density: f32,
    rng: &mut R,
) -> Result<Lattice> {
    if !(0.0..=1.0).contains(&density) {
        return Err(AutomatonError::InvalidDensity(density));
    }
    for cell in lattice.cells_mut() {
        *cell = rng.random::<f32>() >= density;
    }
    Ok(lattice)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_create_empty() {
        let lattice = create_empty(Extents::D3(4, 3, 2)).unwrap();
        assert_eq!(lattice.len(), 24);
        assert_eq!(lattice.dimensionality(), Dimensionality::Three);
        assert!(lattice.cells().iter().all(|&c| !c));
    }

    #[test]
    fn test_create_empty_rejects_overflowing_extents() {
        let extents = Extents::D2(1 << 33, 1 << 33);
        assert_eq!(extents.checked_cell_count(), None);
        assert_eq!(
            create_empty(extents),
            Err(AutomatonError::LatticeTooLarge { extents })
        );

        let extents = Extents::D3(usize::MAX, 1, 1);
        assert_eq!(
            create_empty(extents),
            Err(AutomatonError::LatticeTooLarge { extents })
        );
    }

    #[test]
    fn test_from_cells() {
        let lattice = Lattice::from_cells(Extents::D2(2, 2), vec![true, false, false, true]).unwrap();
        assert!(lattice.get((0, 0)) && lattice.get((1, 1)));
        assert_eq!(
            Lattice::from_cells(Extents::D2(3, 3), vec![true]),
            Err(AutomatonError::CellCountMismatch {
                extents: Extents::D2(3, 3),
                expected: 9,
                got: 1,
            })
        );
        assert!(Lattice::from_cells(Extents::D1(0), vec![]).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_deserialize_checks_cells() {
        let lattice = seed_center(create_empty(Extents::D2(3, 3)).unwrap());
        let json = serde_json::to_string(&lattice).unwrap();
        assert_eq!(serde_json::from_str::<Lattice>(&json).unwrap(), lattice);

        let short = r#"{"extents":{"D2":[3,3]},"cells":[true]}"#;
        assert!(serde_json::from_str::<Lattice>(short).is_err());
        let zero = r#"{"extents":{"D1":0},"cells":[]}"#;
        assert!(serde_json::from_str::<Lattice>(zero).is_err());
    }

    #[test]
    fn test_create_empty_rejects_zero_extent() {
        assert_eq!(
            create_empty(Extents::D2(5, 0)),
            Err(AutomatonError::InvalidDimension { axis: 1, extent: 0 })
        );
        assert!(matches!(
            create_empty(Extents::D1(0)),
            Err(AutomatonError::InvalidDimension { axis: 0, .. })
        ));
    }

    #[test]
    fn test_seed_center_2d() {
        let lattice = seed_center(create_empty(Extents::D2(7, 4)).unwrap());
        assert_eq!(lattice.population(), 1);
        assert!(lattice.get((3, 2)));
    }

    #[test]
    fn test_seed_center_clears_first() {
        let mut lattice = create_empty(Extents::D1(5)).unwrap();
        lattice.set(0, true);
        lattice.set(4, true);
        let lattice = seed_center(lattice);
        assert_eq!(lattice.cells(), &[false, false, true, false, false]);
    }

    #[test]
    fn test_seed_center_3d() {
        let lattice = seed_center(create_empty(Extents::D3(17, 17, 17)).unwrap());
        assert_eq!(lattice.population(), 1);
        assert!(lattice.get((8, 8, 8)));
    }

    #[test]
    fn test_seed_center_single_cell() {
        let lattice = seed_center(create_empty(Extents::D2(1, 1)).unwrap());
        assert!(lattice.get((0, 0)));
    }

    #[test]
    fn test_seed_random_density_extremes() {
        let mut rng = StdRng::seed_from_u64(7);
        let base = create_empty(Extents::D2(16, 16)).unwrap();

        let full = seed_random(base.clone(), 0.0, &mut rng).unwrap();
        assert_eq!(full.population(), 256);

        let empty = seed_random(base, 1.0, &mut rng).unwrap();
        assert_eq!(empty.population(), 0);
    }

    #[test]
    fn test_seed_random_reproducible() {
        let base = create_empty(Extents::D2(32, 32)).unwrap();
        let a = seed_random(base.clone(), 0.5, &mut StdRng::seed_from_u64(42)).unwrap();
        let b = seed_random(base, 0.5, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(a, b);

        // Roughly half filled
        let pop = a.population();
        assert!(pop > 300 && pop < 724, "population {pop}");
    }

    #[test]
    fn test_seed_random_rejects_bad_density() {
        let base = create_empty(Extents::D1(8)).unwrap();
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(
            seed_random(base.clone(), 1.5, &mut rng),
            Err(AutomatonError::InvalidDensity(1.5))
        );
        assert!(seed_random(base, f32::NAN, &mut rng).is_err());
    }

    #[test]
    fn test_get_set_out_of_range() {
        let mut lattice = create_empty(Extents::D2(3, 3)).unwrap();
        lattice.set((3, 0), true);
        assert_eq!(lattice.population(), 0);
        assert!(!lattice.get((10, 10)));
    }

    #[test]
    fn test_index_round_trip() {
        let extents = Extents::D3(4, 3, 2);
        let lattice = create_empty(extents).unwrap();
        for (i, coord) in lattice.iter_coords().enumerate() {
            assert_eq!(extents.index(coord), i);
        }
        assert_eq!(extents.coord(23), Coord::new(3, 2, 1));
    }

    #[test]
    fn test_row() {
        let mut lattice = create_empty(Extents::D2(3, 2)).unwrap();
        lattice.set((1, 1), true);
        assert_eq!(lattice.row(1, 0), Some(&[false, true, false][..]));
        assert_eq!(lattice.row(2, 0), None);
    }

    #[test]
    fn test_to_string_art() {
        let lattice = seed_center(create_empty(Extents::D2(3, 3)).unwrap());
        let art = lattice.to_string_art();
        let lines: Vec<_> = art.lines().collect();
        assert_eq!(lines, ["···", "·█·", "···"]);
    }

    #[test]
    fn test_to_string_art_3d_planes() {
        let lattice = create_empty(Extents::D3(2, 2, 3)).unwrap();
        let art = lattice.to_string_art();
        // 3 planes of 2 rows, plus 2 separators
        assert_eq!(art.lines().count(), 8);
    }
}
