//! Unsigned big number type and conversions.

use zeroize::Zeroize;

/// Limb type for big number representation.
pub type Limb = u64;

/// Bits per limb.
pub const LIMB_BITS: usize = 64;

/// A heap-allocated non-negative big number that is zeroized on drop.
///
/// Internally represented as little-endian `u64` limbs with no leading
/// zero limbs (zero is a single `0` limb).
#[derive(Clone, Zeroize)]
#[zeroize(drop)]
pub struct BigNum {
    limbs: Vec<Limb>,
}

impl BigNum {
    /// Create a zero-valued BigNum.
    pub fn zero() -> Self {
        Self { limbs: vec![0] }
    }

    /// Create a BigNum from a `u64` value.
    pub fn from_u64(value: u64) -> Self {
        Self { limbs: vec![value] }
    }

    /// Interpret `bytes` as an unsigned big-endian integer.
    ///
    /// The empty slice decodes to zero.
    pub fn from_bytes_be(bytes: &[u8]) -> Self {
        let mut limbs = vec![0; bytes.len().div_ceil(8).max(1)];
        for (i, &byte) in bytes.iter().rev().enumerate() {
            limbs[i / 8] |= Limb::from(byte) << ((i % 8) * 8);
        }
        Self::from_limbs(limbs)
    }

    /// Minimal big-endian encoding. Zero encodes as a single `0x00` byte.
    pub fn to_bytes_be(&self) -> Vec<u8> {
        let num_bytes = self.bit_len().div_ceil(8).max(1);
        (0..num_bytes)
            .rev()
            .map(|i| (self.limbs.get(i / 8).copied().unwrap_or(0) >> ((i % 8) * 8)) as u8)
            .collect()
    }

    /// Number of significant bits.
    pub fn bit_len(&self) -> usize {
        self.limbs
            .iter()
            .rposition(|&l| l != 0)
            .map_or(0, |i| i * LIMB_BITS + (LIMB_BITS - self.limbs[i].leading_zeros() as usize))
    }

    pub fn is_zero(&self) -> bool {
        self.limbs.iter().all(|&l| l == 0)
    }

    pub fn limbs(&self) -> &[Limb] {
        &self.limbs
    }

    /// Create a BigNum from little-endian limbs.
    pub fn from_limbs(limbs: Vec<Limb>) -> Self {
        let mut bn = Self {
            limbs: if limbs.is_empty() { vec![0] } else { limbs },
        };
        bn.normalize();
        bn
    }

    /// Remove leading zero limbs.
    pub(crate) fn normalize(&mut self) {
        while self.limbs.len() > 1 && self.limbs.last() == Some(&0) {
            self.limbs.pop();
        }
    }
}

impl std::fmt::Debug for BigNum {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let hex = self
            .to_bytes_be()
            .iter()
            .map(|b| format!("{b:02x}"))
            .collect::<String>();
        write!(f, "BigNum(0x{hex})")
    }
}

impl PartialEq for BigNum {
    fn eq(&self, other: &Self) -> bool {
        self.limbs == other.limbs
    }
}

impl Eq for BigNum {}

impl PartialOrd for BigNum {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for BigNum {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Normalized limbs: more limbs means a larger value.
        self.limbs
            .len()
            .cmp(&other.limbs.len())
            .then_with(|| self.limbs.iter().rev().cmp(other.limbs.iter().rev()))
    }
}
