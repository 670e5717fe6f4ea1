#![no_main]

use libfuzzer_sys::fuzz_target;
use rhizome_resin_toroid::{Dimensionality, RuleId, build_rule_table};

fuzz_target!(|data: (u8, u64, Vec<u32>)| {
    let (dim, number, words) = data;
    let dimensionality = match dim % 3 {
        0 => Dimensionality::One,
        1 => Dimensionality::Two,
        _ => Dimensionality::Three,
    };
    // build_rule_table should never panic, and a built table is always 2^k long
    for id in [RuleId::Number(number), RuleId::Words(words)] {
        if let Ok(table) = build_rule_table(&id, dimensionality) {
            assert_eq!(table.len(), 1 << table.neighborhood_size());
        }
    }
});
