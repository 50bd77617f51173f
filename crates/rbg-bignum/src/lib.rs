#![forbid(unsafe_code)]
#![doc = "Unsigned big number arithmetic for DRBG byte/integer conversions."]

mod bignum;
mod ops;

pub use bignum::{BigNum, Limb, LIMB_BITS};
