//! Scalar decomposition for the GLV endomorphism.
//!
//! The endomorphism φ(x, y) = (ζx, y) acts on the r-torsion as
//! multiplication by λ, a cube root of unity mod r. Splitting a scalar s
//! into (k1, k2) with s ≡ k1 + k2·λ (mod r) against a short basis of the
//! lattice {(a, b) : a + b·λ ≡ 0 (mod r)} bounds both halves to roughly
//! half the bit length of r, halving the doubling count of a
//! double-and-add walk.

use std::sync::LazyLock;

use num_bigint::{BigInt, BigUint, Sign};

struct Lattice {
    v1: (BigInt, BigInt),
    v2: (BigInt, BigInt),
    det: BigInt,
}

/// Short vectors spanning the GLV lattice for this curve; the determinant
/// is exactly r.
static LATTICE: LazyLock<Lattice> = LazyLock::new(|| {
    let int = |s: &str| BigInt::parse_bytes(s.as_bytes(), 10).expect("hardcoded decimal literal");
    Lattice {
        v1: (
            int("9931322734385697763"),
            int("-147946756881789319000765030803803410728"),
        ),
        v2: (
            int("147946756881789319010696353538189108491"),
            int("9931322734385697763"),
        ),
        det: int("21888242871839275222246405745257275088548364400416034343698204186575808495617"),
    }
});

/// round(n / d) for d > 0.
fn rounded_div(n: &BigInt, d: &BigInt) -> BigInt {
    let num = n * 2 + d;
    let den = d * 2;
    let q = &num / &den;
    // `/` truncates toward zero; shift down to floor for negative numerators
    let rem: BigInt = &num % &den;
    if rem.sign() == Sign::Minus {
        q - 1
    } else {
        q
    }
}

/// Split `s` into (k1, k2) with k1 + k2·λ ≡ s (mod r) and |k1|, |k2| < 2¹²⁸,
/// by rounding the coordinates of (s, 0) in the lattice basis.
pub(crate) fn split_scalar(s: &BigUint) -> (BigInt, BigInt) {
    let l = &*LATTICE;
    let s = BigInt::from(s.clone());

    let c1 = rounded_div(&(&s * &l.v2.1), &l.det);
    let c2 = rounded_div(&(-&s * &l.v1.1), &l.det);

    let k1 = &s - &c1 * &l.v1.0 - &c2 * &l.v2.0;
    let k2 = -(&c1 * &l.v1.1) - &c2 * &l.v2.1;
    (k1, k2)
}

/// Low 128 bits of |k| as two little-endian words.
pub(crate) fn limbs_128(k: &BigInt) -> [u64; 2] {
    let digits = k.magnitude().to_u64_digits();
    debug_assert!(digits.len() <= 2, "split scalar exceeds 128 bits");
    let mut limbs = [0u64; 2];
    limbs[..digits.len()].copy_from_slice(&digits);
    limbs
}

#[cfg(test)]
mod tests {
    use rand::{RngCore, SeedableRng};
    use rand_chacha::ChaCha20Rng;
    use test_log::test;

    use super::*;

    const LAMBDA: &str = "4407920970296243842393367215006156084916469457145843978461";

    #[test]
    fn test_split_recombines_mod_r() {
        let r = &LATTICE.det;
        let lambda = BigInt::parse_bytes(LAMBDA.as_bytes(), 10).unwrap();
        let mut rng = ChaCha20Rng::seed_from_u64(7);
        for _ in 0..200 {
            let mut bytes = [0u8; 38];
            rng.fill_bytes(&mut bytes);
            let s = BigUint::from_bytes_be(&bytes);
            let (k1, k2) = split_scalar(&s);
            let lhs = (&k1 + &k2 * &lambda - BigInt::from(s)) % r;
            assert!(lhs.sign() == Sign::NoSign);
            assert!(k1.magnitude().bits() <= 128);
            assert!(k2.magnitude().bits() <= 128);
        }
    }
}
