//! Packing neighborhood states into rule-table indices.
//!
//! Bit `i` of an index corresponds to position `i` of the ordered boolean
//! sequence, so the first element is always the least significant bit.

/// Number of bits in one rule word.
pub const WORD_BITS: u32 = u32::BITS;

/// Packs `bits` into an integer, `bits[0]` being the least significant bit.
///
/// # Example
///
/// ```
/// use rhizome_resin_toroid::bits::encode;
///
/// assert_eq!(encode(&[true, false, true]), 0b101);
/// assert_eq!(encode(&[false, true, true]), 0b110);
/// ```
pub fn encode(bits: &[bool]) -> u32 {
    debug_assert!(bits.len() <= WORD_BITS as usize, "too many bits for one word");
    encode_iter(bits.iter().copied())
}

/// Allocation-free form of [`encode`].
///
/// Elements past the 32nd are ignored.
pub fn encode_iter(bits: impl IntoIterator<Item = bool>) -> u32 {
    bits.into_iter()
        .take(WORD_BITS as usize)
        .enumerate()
        .fold(0, |acc, (i, bit)| acc | (bit as u32) << i)
}

/// Returns whether bit `index` of `value` is set.
///
/// Indices at or past the word width read as `false`.
pub fn decode_bit(value: u32, index: u32) -> bool {
    value.checked_shr(index).is_some_and(|v| v & 1 == 1)
}

/// Expands the lowest `count` bits of `value`, least significant first.
pub fn decode(value: u32, count: u32) -> Vec<bool> {
    (0..count).map(|i| decode_bit(value, i)).collect()
}
