//! Height budget and deterministic level assignment.

/// The height a list of `len` nodes should have: `1 + log2(len)`,
/// rounded down. Zero for an empty list.
pub fn expected_top_level(len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    return 1 + len.ilog2() as usize;
}

/// Whether `1 + log2(len) > max_level`, using the real-valued logarithm.
///
/// For `max_level >= 1` this is exactly `len > 2^(max_level - 1)`; a list of
/// height zero is outgrown by its first node.
pub fn needs_rebuild(len: usize, max_level: usize) -> bool {
    if max_level == 0 {
        return len > 0;
    }
    let shift = u32::try_from(max_level - 1).unwrap_or(u32::MAX);
    return match 1usize.checked_shl(shift) {
        Some(capacity) => len > capacity,
        // 2^(max_level - 1) doesn't fit in a usize, so nothing outgrows it.
        None => false,
    };
}

/// Height ceiling after a rebuild. Doubles, but never stays at zero.
pub fn grown_max_level(max_level: usize) -> usize {
    return max_level.saturating_mul(2).max(1);
}

/// Level for the 1-indexed `position` in a rebuilt list: the exponent of
/// the largest power of two dividing it, capped at `max_level`.
///
/// Level `L` therefore ends up holding `floor(n / 2^L)` of `n` positions.
pub fn level_for_position(position: usize, max_level: usize) -> usize {
    debug_assert!(position >= 1, "positions are 1-indexed");
    return (position.trailing_zeros() as usize).min(max_level);
}
