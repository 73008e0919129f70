//! Sparse Fq12 helpers for the pairing.
//!
//! The tower Fq12 = Fq6[w]/(w² - v), Fq6 = Fq2[v]/(v³ - ξ) comes from
//! `ark-bn254`; this module adds the handful of operations the Miller loop
//! and final exponentiation need that the generic field API does not expose:
//! multiplications by the three line-evaluation-shaped sparse elements c·v,
//! c·vw and c·v²w, the unitary conjugate, and cyclotomic exponentiation by
//! the curve seed.

use ark_bn254::{Fq2, Fq6, Fq6Config, Fq12};
use ark_ff::{BitIteratorBE, CyclotomicMultSubgroup, Field, Fp6Config};

use crate::curve::SEED_X;

fn mul_by_xi(c: &Fq2) -> Fq2 {
    Fq6Config::NONRESIDUE * c
}

/// z · (c·v).
pub(crate) fn mul_by_v(z: &Fq12, c: &Fq2) -> Fq12 {
    Fq12::new(
        Fq6::new(mul_by_xi(&(z.c0.c2 * c)), z.c0.c0 * c, z.c0.c1 * c),
        Fq6::new(mul_by_xi(&(z.c1.c2 * c)), z.c1.c0 * c, z.c1.c1 * c),
    )
}

/// z · (c·v·w).
pub(crate) fn mul_by_vw(z: &Fq12, c: &Fq2) -> Fq12 {
    Fq12::new(
        Fq6::new(mul_by_xi(&(z.c1.c1 * c)), mul_by_xi(&(z.c1.c2 * c)), z.c1.c0 * c),
        Fq6::new(mul_by_xi(&(z.c0.c2 * c)), z.c0.c0 * c, z.c0.c1 * c),
    )
}

/// z · (c·v²·w).
pub(crate) fn mul_by_v2w(z: &Fq12, c: &Fq2) -> Fq12 {
    Fq12::new(
        Fq6::new(
            mul_by_xi(&(z.c1.c0 * c)),
            mul_by_xi(&(z.c1.c1 * c)),
            mul_by_xi(&(z.c1.c2 * c)),
        ),
        Fq6::new(mul_by_xi(&(z.c0.c1 * c)), mul_by_xi(&(z.c0.c2 * c)), z.c0.c0 * c),
    )
}

/// Unitary conjugate; on the cyclotomic subgroup this is the inverse.
pub(crate) fn conjugate(z: &Fq12) -> Fq12 {
    Fq12::new(z.c0, -z.c1)
}

/// z^x₀ for the curve seed x₀, using cyclotomic squarings. Only valid for
/// elements of the cyclotomic subgroup (anything past the easy part of the
/// final exponentiation).
pub(crate) fn expt(z: &Fq12) -> Fq12 {
    let mut res = Fq12::ONE;
    for bit in BitIteratorBE::without_leading_zeros([SEED_X]) {
        res.cyclotomic_square_in_place();
        if bit {
            res *= z;
        }
    }
    res
}

#[cfg(test)]
mod tests {
    use ark_ff::{AdditiveGroup, UniformRand};
    use rand::SeedableRng;
    use rand_chacha::ChaCha20Rng;
    use test_log::test;

    use super::*;

    fn rng() -> ChaCha20Rng {
        ChaCha20Rng::seed_from_u64(0)
    }

    /// A random element of the cyclotomic subgroup, via the easy part of the
    /// final exponentiation.
    fn random_cyclotomic(rng: &mut ChaCha20Rng) -> Fq12 {
        let f = Fq12::rand(rng);
        let t = conjugate(&f) * f.inverse().unwrap();
        t.frobenius_map(2) * t
    }

    #[test]
    fn test_sparse_products_match_dense() {
        let mut rng = rng();
        for _ in 0..10 {
            let z = Fq12::rand(&mut rng);
            let c = Fq2::rand(&mut rng);
            let zero = Fq2::ZERO;

            let v = Fq12::new(Fq6::new(zero, c, zero), Fq6::ZERO);
            let vw = Fq12::new(Fq6::ZERO, Fq6::new(zero, c, zero));
            let v2w = Fq12::new(Fq6::ZERO, Fq6::new(zero, zero, c));

            assert_eq!(mul_by_v(&z, &c), z * v);
            assert_eq!(mul_by_vw(&z, &c), z * vw);
            assert_eq!(mul_by_v2w(&z, &c), z * v2w);
        }
    }

    #[test]
    fn test_expt_matches_pow() {
        let mut rng = rng();
        let z = random_cyclotomic(&mut rng);
        assert_eq!(expt(&z), z.pow([SEED_X]));
    }

    #[test]
    fn test_conjugate_is_unitary_inverse() {
        let mut rng = rng();
        let z = random_cyclotomic(&mut rng);
        assert_eq!(conjugate(&z), z.inverse().unwrap());
    }
}
