//! Table sizing: round capacity requests up to a prime.

/// Ascending table sizes, each roughly double the previous and prime.
pub const PRIMES: [usize; 25] = [
    127, 251, 509, 1021, 2039, 4093, 8191, 16381, 32749, 65521, 131071, 262139, 524287, 1048573,
    2097143, 4194301, 8388593, 16777213, 33554393, 67108859, 134217689, 268435399, 536870909,
    1073741789, 2147483647,
];

/// Round `value` up to the first table prime that can hold it.
///
/// Requests beyond the largest table entry fall back to `1.5 * value`
/// forced odd, which is not guaranteed prime but avoids even moduli. The
/// fallback saturates at `usize::MAX`.
pub fn to_prime(value: usize) -> usize {
    match PRIMES.iter().find(|&&p| value <= p) {
        Some(&p) => p,
        None => value.saturating_add(value / 2) | 1,
    }
}
