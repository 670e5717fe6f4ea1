//! Error types for resin-toroid.

use crate::lattice::{Dimensionality, Extents};
use thiserror::Error;

/// Validation failures reported before a simulation starts or before a
/// configuration change is applied.
///
/// Nothing in this crate fails mid-step: [`step`](crate::step) validates its
/// inputs before computing any cell.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AutomatonError {
    /// A lattice extent is smaller than one.
    #[error("invalid dimension: extent {extent} on axis {axis} (must be at least 1)")]
    InvalidDimension {
        /// Axis index (0 = x, 1 = y, 2 = z).
        axis: usize,
        /// The rejected extent.
        extent: usize,
    },

    /// The total cell count of the extents does not fit in memory.
    #[error("lattice too large: {extents} cells overflow the address space")]
    LatticeTooLarge {
        /// The rejected extents.
        extents: Extents,
    },

    /// A cell buffer does not hold exactly one value per cell of its extents.
    #[error("cell count mismatch: {extents} needs {expected} cells, got {got}")]
    CellCountMismatch {
        /// Extents the buffer was supplied for.
        extents: Extents,
        /// Cells the extents require.
        expected: usize,
        /// Cells supplied.
        got: usize,
    },

    /// A rule identifier does not fit the table of the target neighborhood.
    #[error("rule out of range: {rule} does not fit a {entries}-entry rule table")]
    RuleOutOfRange {
        /// The rejected identifier, rendered for display.
        rule: String,
        /// Number of entries the table has (2^k).
        entries: usize,
    },

    /// Lattice extents or rule table do not match the requested neighborhood.
    #[error("dimension mismatch: expected {expected}, got {}", describe(.got))]
    DimensionMismatch {
        /// Dimensionality the neighborhood operates on.
        expected: Dimensionality,
        /// Dimensionality of the supplied lattice or table; `None` for a
        /// table sized for no supported neighborhood.
        got: Option<Dimensionality>,
    },

    /// Random seeding density outside `[0, 1]`.
    #[error("invalid density: {0} (must be within 0.0..=1.0)")]
    InvalidDensity(f32),

    /// Frame rate of zero.
    #[error("invalid frame rate: {0} (must be at least 1)")]
    InvalidFrameRate(u32),
}

/// Result alias for automaton operations.
pub type Result<T> = std::result::Result<T, AutomatonError>;

fn describe(got: &Option<Dimensionality>) -> String {
    match got {
        Some(dimensionality) => dimensionality.to_string(),
        None => "a table for no supported neighborhood".to_string(),
    }
}
