#![no_main]

use libfuzzer_sys::fuzz_target;
use rhizome_resin_toroid::{Extents, SimulationConfig, neighborhood_for, step};

fuzz_target!(|data: (u8, u8, u8, u64)| {
    let (w, h, d, rule) = data;
    // Small extents keep runs fast; zero extents must be rejected, not panic
    let extents = Extents::D3(w as usize % 9, h as usize % 9, d as usize % 9);
    let config = SimulationConfig::new(extents, rule);
    let Ok(table) = config.validate() else {
        return;
    };
    let Ok(lattice) = config.initial_lattice() else {
        return;
    };
    let next = step(&lattice, &table, neighborhood_for(extents.dimensionality())).unwrap();
    assert_eq!(next.extents(), lattice.extents());
});
