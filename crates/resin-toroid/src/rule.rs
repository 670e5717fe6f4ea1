//! Rule tables addressed by neighborhood index.

use crate::bits::{self, WORD_BITS};
use crate::error::{AutomatonError, Result};
use crate::lattice::Dimensionality;
use crate::neighborhood::neighborhood_for;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A user-facing rule identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RuleId {
    /// A single rule number, expanded bit by bit.
    Number(u64),
    /// 32-bit words concatenated into one table, word 0 first.
    Words(Vec<u32>),
}

impl From<u64> for RuleId {
    fn from(rule: u64) -> Self {
        Self::Number(rule)
    }
}

impl From<Vec<u32>> for RuleId {
    fn from(words: Vec<u32>) -> Self {
        Self::Words(words)
    }
}

impl From<[u32; 4]> for RuleId {
    fn from(words: [u32; 4]) -> Self {
        Self::Words(words.to_vec())
    }
}

impl std::fmt::Display for RuleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Words(words) => {
                let parts: Vec<String> = words.iter().map(u32::to_string).collect();
                write!(f, "[{}]", parts.join(", "))
            }
        }
    }
}

/// Boolean outcome for every configuration of a k-cell neighborhood.
///
/// Always holds exactly 2^k entries.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(try_from = "RawRuleTable")
)]
pub struct RuleTable {
    /// Neighborhood size (k).
    neighborhood_size: u32,
    /// Outcome per neighborhood index.
    entries: Vec<bool>,
}

impl RuleTable {
    /// Expands a single rule number: `table[i]` is bit `i` of `rule`.
    ///
    /// Requires 2^k ≤ 64. Fails with [`AutomatonError::RuleOutOfRange`] if the
    /// rule has bits set at or past 2^k.
    ///
    /// # Example
    ///
    /// ```
    /// use rhizome_resin_toroid::RuleTable;
    ///
    /// let rule = RuleTable::from_number(30, 3).unwrap();
    /// assert_eq!(rule.len(), 8);
    /// assert!(rule.lookup(0b100));
    /// assert!(!rule.lookup(0b111));
    /// ```
    pub fn from_number(rule: u64, neighborhood_size: u32) -> Result<Self> {
        let entries = table_len(neighborhood_size)?;
        if entries > u64::BITS as usize || (entries < 64 && rule >> entries != 0) {
            return Err(AutomatonError::RuleOutOfRange {
                rule: rule.to_string(),
                entries,
            });
        }
        let words = [rule as u32, (rule >> WORD_BITS) as u32];
        Ok(Self::from_words_unchecked(&words, neighborhood_size, entries))
    }

    /// Concatenates 32-bit words: word 0 supplies entries `[0, 32)`, word 1
    /// `[32, 64)` and so on.
    ///
    /// Missing trailing words read as zero. Fails with
    /// [`AutomatonError::RuleOutOfRange`] if there are more words than the
    /// table needs or the last word has bits set past 2^k.
    pub fn from_words(words: &[u32], neighborhood_size: u32) -> Result<Self> {
        let entries = table_len(neighborhood_size)?;
        let needed = entries.div_ceil(WORD_BITS as usize);
        let out_of_range = || AutomatonError::RuleOutOfRange {
            rule: RuleId::Words(words.to_vec()).to_string(),
            entries,
        };
        if words.len() > needed {
            return Err(out_of_range());
        }
        if entries < WORD_BITS as usize && words.first().is_some_and(|&w| w >> entries != 0) {
            return Err(out_of_range());
        }
        Ok(Self::from_words_unchecked(words, neighborhood_size, entries))
    }

    fn from_words_unchecked(words: &[u32], neighborhood_size: u32, entries: usize) -> Self {
        let entries = (0..entries)
            .map(|i| {
                let word = words.get(i / WORD_BITS as usize).copied().unwrap_or(0);
                bits::decode_bit(word, (i % WORD_BITS as usize) as u32)
            })
            .collect();
        Self {
            neighborhood_size,
            entries,
        }
    }

    /// Returns the neighborhood size (k) this table is keyed by.
    pub fn neighborhood_size(&self) -> u32 {
        self.neighborhood_size
    }

    /// Returns the dimensionality whose fixed neighborhood has this table's k,
    /// if any.
    pub fn dimensionality(&self) -> Option<Dimensionality> {
        [
            Dimensionality::One,
            Dimensionality::Two,
            Dimensionality::Three,
        ]
        .into_iter()
        .find(|&d| neighborhood_for(d).size() == self.neighborhood_size)
    }

    /// Returns the number of entries (2^k).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false: a table has at least one entry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns the outcome for a neighborhood index.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    #[inline]
    pub fn lookup(&self, index: u32) -> bool {
        self.entries[index as usize]
    }

    /// Returns the outcome for neighbor states given in neighborhood order.
    pub fn evaluate(&self, neighbors: &[bool]) -> bool {
        debug_assert_eq!(neighbors.len(), self.neighborhood_size as usize);
        self.lookup(bits::encode(neighbors))
    }

    /// Returns all entries, indexed by neighborhood configuration.
    pub fn entries(&self) -> &[bool] {
        &self.entries
    }

    /// Packs the table back into 32-bit words, word 0 first.
    pub fn to_words(&self) -> Vec<u32> {
        self.entries
            .chunks(WORD_BITS as usize)
            .map(bits::encode)
            .collect()
    }
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawRuleTable {
    neighborhood_size: u32,
    entries: Vec<bool>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawRuleTable> for RuleTable {
    type Error = AutomatonError;

    fn try_from(raw: RawRuleTable) -> Result<Self> {
        let expected = table_len(raw.neighborhood_size)?;
        if raw.entries.len() != expected {
            return Err(AutomatonError::RuleOutOfRange {
                rule: format!("table of {} entries", raw.entries.len()),
                entries: expected,
            });
        }
        Ok(Self {
            neighborhood_size: raw.neighborhood_size,
            entries: raw.entries,
        })
    }
}

fn table_len(neighborhood_size: u32) -> Result<usize> {
    // Past 2^16 entries the table is no longer something a rule id can describe.
    if neighborhood_size > 16 {
        return Err(AutomatonError::RuleOutOfRange {
            rule: format!("k = {neighborhood_size}"),
            entries: usize::MAX,
        });
    }
    Ok(1 << neighborhood_size)
}

/// Builds the rule table for a dimensionality's fixed neighborhood.
///
/// - 1D (3 cells, 8 entries): numbers in `[0, 256)`.
/// - 2D (5 cells, 32 entries): numbers in `[0, 2^32)`.
/// - 3D (7 cells, 128 entries): up to four words, or a number which fills the
///   first two words.
///
/// Words are accepted for any dimensionality as long as they fit.
///
/// # Example
///
/// ```
/// use rhizome_resin_toroid::{build_rule_table, rules_3d, Dimensionality, RuleId};
///
/// let table = build_rule_table(&RuleId::from(rules_3d::DEFAULT), Dimensionality::Three).unwrap();
/// assert_eq!(table.len(), 128);
///
/// assert!(build_rule_table(&RuleId::Number(256), Dimensionality::One).is_err());
/// ```
pub fn build_rule_table(identifier: &RuleId, dimensionality: Dimensionality) -> Result<RuleTable> {
    let k = neighborhood_for(dimensionality).size();
    let entries = table_len(k)?;
    match identifier {
        RuleId::Number(rule) if entries > u64::BITS as usize => {
            let words = [*rule as u32, (*rule >> WORD_BITS) as u32];
            RuleTable::from_words(&words, k)
        }
        RuleId::Number(rule) => RuleTable::from_number(*rule, k),
        RuleId::Words(words) => RuleTable::from_words(words, k),
    }
}

/// Common 1D rules.
pub mod elementary_rules {
    /// Rule 30 - chaotic, used for random number generation.
    pub const RULE_30: u64 = 30;

    /// Rule 90 - Sierpinski triangle.
    pub const RULE_90: u64 = 90;

    /// Rule 110 - Turing complete.
    pub const RULE_110: u64 = 110;

    /// Rule 184 - traffic flow model.
    pub const RULE_184: u64 = 184;

    /// Rule 222 - solid expanding triangle.
    pub const RULE_222: u64 = 222;

    /// Rule 250 - simple growth.
    pub const RULE_250: u64 = 250;
}

/// 2D rules for the five-cell Von Neumann neighborhood.
pub mod rules_2d {
    /// Everything dies.
    pub const EMPTY: u64 = 0;

    /// A cell is filled when any of its five cells is filled (diamond growth).
    pub const GROWTH: u64 = 0xFFFF_FFFE;

    /// Odd parity of the five cells (replicates patterns in a diamond lattice).
    pub const PARITY: u64 = 0x9669_6996;
}

/// 3D rules for the seven-cell Von Neumann neighborhood, as four words.
pub mod rules_3d {
    /// The rule the interactive 3D scene starts with.
    pub const DEFAULT: [u32; 4] = [621_375_902, 2_960_227_347, 4_095_321_793, 2_586_228_668];

    /// Odd parity of the seven cells.
    pub const PARITY: [u32; 4] = [0x9669_6996, 0x6996_9669, 0x6996_9669, 0x9669_6996];
}
