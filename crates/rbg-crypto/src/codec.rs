//! Byte-string / integer conversions and fixed-width counter arithmetic.
//!
//! DRBG state values (`V`, the CTR counter block) are big-endian byte
//! strings of a fixed width. Every arithmetic helper here works modulo
//! `2^(8 * width)` and never changes the width of its destination.

use rbg_bignum::BigNum;

/// Interpret `bytes` as an unsigned big-endian integer.
pub fn bytes_to_int(bytes: &[u8]) -> BigNum {
    BigNum::from_bytes_be(bytes)
}

/// Minimal big-endian encoding of `n`; zero encodes as `[0x00]`.
pub fn int_to_bytes(n: &BigNum) -> Vec<u8> {
    n.to_bytes_be()
}

/// Prepend zero bytes to `bytes` up to `len`. Inputs already at least
/// `len` bytes long are returned unchanged.
pub fn left_pad(bytes: &[u8], len: usize) -> Vec<u8> {
    let pad = len.saturating_sub(bytes.len());
    let mut out = Vec::with_capacity(pad + bytes.len());
    out.resize(pad, 0);
    out.extend_from_slice(bytes);
    out
}

/// `v = (v + 1) mod 2^(8 * v.len())`.
pub fn increment(v: &mut [u8]) {
    for byte in v.iter_mut().rev() {
        let (sum, carry) = byte.overflowing_add(1);
        *byte = sum;
        if !carry {
            break;
        }
    }
}

/// `v = (v + addend) mod 2^(8 * v.len())`.
///
/// `addend` is aligned at the least significant byte; any bytes of it
/// beyond the width of `v` fall outside the modulus and are ignored.
pub fn add_into(v: &mut [u8], addend: &[u8]) {
    let mut carry = 0u16;
    let mut addend = addend.iter().rev();
    for byte in v.iter_mut().rev() {
        let sum = u16::from(*byte) + u16::from(addend.next().copied().unwrap_or(0)) + carry;
        *byte = sum as u8;
        carry = sum >> 8;
    }
}

/// `dst ^= src` over the common prefix of both slices.
pub fn xor_into(dst: &mut [u8], src: &[u8]) {
    for (d, s) in dst.iter_mut().zip(src) {
        *d ^= s;
    }
}
