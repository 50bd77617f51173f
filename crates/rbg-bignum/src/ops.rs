//! Arithmetic operations for BigNum.

use crate::bignum::{BigNum, Limb, LIMB_BITS};

impl BigNum {
    /// Add two BigNums: self + other.
    pub fn add(&self, other: &BigNum) -> BigNum {
        let (long, short) = if self.limbs().len() >= other.limbs().len() {
            (self.limbs(), other.limbs())
        } else {
            (other.limbs(), self.limbs())
        };

        let mut result = Vec::with_capacity(long.len() + 1);
        let mut carry = false;
        for (i, &a) in long.iter().enumerate() {
            let b = short.get(i).copied().unwrap_or(0);
            let (sum, c1) = a.overflowing_add(b);
            let (sum, c2) = sum.overflowing_add(Limb::from(carry));
            result.push(sum);
            carry = c1 || c2;
        }
        if carry {
            result.push(1);
        }
        BigNum::from_limbs(result)
    }

    /// Reduce modulo `2^bits`, i.e. keep only the low `bits` bits.
    pub fn rem_pow2(&self, bits: usize) -> BigNum {
        let full = bits / LIMB_BITS;
        let partial = bits % LIMB_BITS;
        let mut limbs: Vec<Limb> = self.limbs().iter().take(full + 1).copied().collect();
        if limbs.len() > full {
            if partial == 0 {
                limbs.truncate(full);
            } else {
                limbs[full] &= ((1 as Limb) << partial) - 1;
            }
        }
        BigNum::from_limbs(limbs)
    }
}
