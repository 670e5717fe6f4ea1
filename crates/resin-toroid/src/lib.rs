//! Toroidal cellular automata driven by integer-encoded rule tables.
//!
//! Each generation is a dense boolean [`Lattice`] in one, two, or three
//! dimensions. Every cell's next state is looked up in a [`RuleTable`] at the
//! index formed by packing the states of its fixed [`Neighborhood`], with
//! every axis wrapping around:
//!
//! | Dimensionality | Neighborhood | Cells (k) | Table entries | Rule identifier |
//! |---|---|---|---|---|
//! | 1D | [`Elementary`] | 3 | 8 | number in `[0, 256)` |
//! | 2D | [`VonNeumann`] | 5 | 32 | number in `[0, 2^32)` |
//! | 3D | [`VonNeumann3D`] | 7 | 128 | four 32-bit words |
//!
//! # Example
//!
//! ```
//! use rhizome_resin_toroid::{
//!     build_rule_table, create_empty, history, seed_center, step, Dimensionality, Elementary,
//!     Extents, RuleId, VonNeumann3D, rules_3d,
//! };
//!
//! // 1D: Rule 30 as a stack of generations
//! let rule = build_rule_table(&RuleId::Number(30), Dimensionality::One).unwrap();
//! let gen0 = seed_center(create_empty(Extents::D1(101)).unwrap());
//! let rows = history(gen0, &rule, &Elementary, 50).unwrap();
//! assert_eq!(rows.len(), 50);
//!
//! // 3D: one generation at a time
//! let rule = build_rule_table(&RuleId::from(rules_3d::DEFAULT), Dimensionality::Three).unwrap();
//! let mut lattice = seed_center(create_empty(Extents::D3(17, 17, 17)).unwrap());
//! for _ in 0..10 {
//!     lattice = step(&lattice, &rule, &VonNeumann3D).unwrap();
//! }
//! ```
//!
//! For a driver with pause/resume and reconfiguration, see [`Simulation`].

pub mod bits;
mod engine;
mod error;
mod lattice;
mod neighborhood;
mod rule;
mod simulation;

pub use engine::{history, step, steps};
pub use error::{AutomatonError, Result};
pub use lattice::{
    Coord, Dimensionality, Extents, Lattice, create_empty, history_art, seed_center, seed_random,
};
pub use neighborhood::{
    Elementary, Neighborhood, Offset, VonNeumann, VonNeumann3D, neighborhood_for, wrap,
};
pub use rule::{RuleId, RuleTable, build_rule_table, elementary_rules, rules_2d, rules_3d};
pub use simulation::{RunState, SeedMode, Simulation, SimulationConfig};
