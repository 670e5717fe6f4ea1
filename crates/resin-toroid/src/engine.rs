//! Generation stepping.

use crate::bits;
use crate::error::{AutomatonError, Result};
use crate::lattice::Lattice;
use crate::neighborhood::{Neighborhood, wrap};
use crate::rule::RuleTable;
use tracing::{debug, trace};

/// Computes the next generation.
///
/// Every cell of the new lattice is `rule[index]`, where `index` packs the
/// states of the cell's neighborhood (read from `lattice` only) in the
/// neighborhood's order. Inputs are validated before any cell is computed:
/// the lattice must have the neighborhood's dimensionality and the table
/// must have 2^k entries.
///
/// # Example
///
/// ```
/// use rhizome_resin_toroid::{create_empty, seed_center, step, Elementary, Extents, RuleTable};
///
/// let gen0 = seed_center(create_empty(Extents::D1(5)).unwrap());
/// let rule = RuleTable::from_number(30, 3).unwrap();
/// let gen1 = step(&gen0, &rule, &Elementary).unwrap();
/// assert_eq!(gen1.cells(), &[false, true, true, true, false]);
/// ```
pub fn step<N: Neighborhood + ?Sized>(
    lattice: &Lattice,
    rule: &RuleTable,
    neighborhood: &N,
) -> Result<Lattice> {
    validate(lattice, rule, neighborhood)?;
    Ok(advance(lattice, rule, neighborhood))
}

/// Advances `n` generations, returning the last one.
pub fn steps<N: Neighborhood + ?Sized>(
    lattice: &Lattice,
    rule: &RuleTable,
    neighborhood: &N,
    n: usize,
) -> Result<Lattice> {
    validate(lattice, rule, neighborhood)?;
    let mut current = lattice.clone();
    for _ in 0..n {
        current = advance(&current, rule, neighborhood);
    }
    Ok(current)
}

/// Precomputes `generations` lattices, starting with `initial` itself.
///
/// Used to render a 1D automaton as a stack of rows.
pub fn history<N: Neighborhood + ?Sized>(
    initial: Lattice,
    rule: &RuleTable,
    neighborhood: &N,
    generations: usize,
) -> Result<Vec<Lattice>> {
    validate(&initial, rule, neighborhood)?;
    Ok(unfold(initial, rule, neighborhood, generations))
}

pub(crate) fn validate<N: Neighborhood + ?Sized>(
    lattice: &Lattice,
    rule: &RuleTable,
    neighborhood: &N,
) -> Result<()> {
    neighborhood.check_extents(lattice.extents())?;
    if rule.len() != neighborhood.table_size() {
        return Err(AutomatonError::DimensionMismatch {
            expected: neighborhood.dimensionality(),
            got: rule.dimensionality(),
        });
    }
    Ok(())
}

/// History without validation; callers must have run [`validate`].
pub(crate) fn unfold<N: Neighborhood + ?Sized>(
    initial: Lattice,
    rule: &RuleTable,
    neighborhood: &N,
    generations: usize,
) -> Vec<Lattice> {
    debug!(generations, extents = %initial.extents(), "precomputing history");
    if generations == 0 {
        return Vec::new();
    }
    let mut stack = vec![initial];
    while stack.len() < generations {
        let next = advance(&stack[stack.len() - 1], rule, neighborhood);
        stack.push(next);
    }
    stack
}

/// Step without validation; callers must have run [`validate`].
pub(crate) fn advance<N: Neighborhood + ?Sized>(
    lattice: &Lattice,
    rule: &RuleTable,
    neighborhood: &N,
) -> Lattice {
    let extents = lattice.extents();
    let offsets = neighborhood.offsets();
    let cells = lattice.cells();

    let next: Vec<bool> = (0..cells.len())
        .map(|i| {
            let coord = extents.coord(i);
            let index = bits::encode_iter(
                offsets
                    .iter()
                    .map(|&offset| cells[extents.index(wrap(coord, offset, extents))]),
            );
            rule.lookup(index)
        })
        .collect();

    let next = Lattice::from_parts(extents, next);
    trace!(population = next.population(), "step");
    next
}
