//! Helpers shared by the x86 backends.

/// Writes the low `out.len()` bits of a movemask result as lane flags.
#[inline(always)]
pub(crate) fn bits_to_lanes(bits: u64, out: &mut [bool]) {
    for (i, o) in out.iter_mut().enumerate() {
        *o = (bits >> i) & 1 != 0;
    }
}

/// Byte-level movemask of `lanes` elements `width` bytes wide, reduced to one bit per
/// lane by keeping the top byte of each.
#[inline(always)]
pub(crate) fn byte_bits_to_lanes(bits: u64, width: usize, out: &mut [bool]) {
    for (i, o) in out.iter_mut().enumerate() {
        *o = (bits >> (i * width + width - 1)) & 1 != 0;
    }
}

/// Lane flags packed into an AVX-512 k-register value.
#[inline(always)]
pub(crate) fn lanes_to_bits(mask: &[bool]) -> u64 {
    mask.iter()
        .enumerate()
        .fold(0, |bits, (i, &m)| bits | ((m as u64) << i))
}
