//! Helpers for computing record checksums.

/// Accumulate a slice of bytes into a running record sum.
pub fn compute_sum(init: u8, r: &[u8]) -> u8 {
    r.iter().fold(init, |acc, b| acc.wrapping_add(*b))
}

/// Turn a record sum into the checksum stored at the end of the record.
///
/// Adding the checksum to the sum of every other record byte yields zero.
pub fn checksum(sum: u8) -> u8 {
    sum.wrapping_neg()
}
