//! Hash primitives shared by the type operators.

/// Seed for a row hash before any channel is folded in.
pub const INITIAL_HASH_VALUE: u64 = 0;

/// Hash contributed by a null channel value.
pub const NULL_HASH_CODE: u64 = 0;

const PRIME64_2: u64 = 0xC2B2_AE3D_27D4_EB4F;
const PRIME64_1: u64 = 0x9E37_79B1_85EB_CA87;

/// Identity-style hash of a 64-bit value (a single XxHash64 round).
///
/// Used by the `HASH_CODE` operator of every long-backed type; cheap enough for per-row
/// hash-table probing.
#[inline]
pub fn long_hash(value: i64) -> u64 {
    (value as u64)
        .wrapping_mul(PRIME64_2)
        .rotate_left(31)
        .wrapping_mul(PRIME64_1)
}

/// Full XxHash64 (seed 0) of the little-endian bytes of `value`.
#[inline]
pub fn xx_hash64(value: i64) -> u64 {
    xxhash_rust::xxh64::xxh64(&value.to_le_bytes(), 0)
}

/// Fold one channel hash into a row hash.
#[inline]
pub fn combine_hash(previous: u64, value: u64) -> u64 {
    previous.wrapping_mul(31).wrapping_add(value)
}
