//! BN254 curve constants.
//!
//! Everything here is fixed by the choice of curve: the short Weierstrass
//! coefficients for the base curve and its sextic twist, the group
//! generators, the GLV endomorphism root, the ate loop counter derived from
//! the curve seed, and the twist-Frobenius coefficients used at the end of
//! the Miller loop.

use ark_bn254::{Fq, Fq2};
use ark_ff::{AdditiveGroup, BigInt, MontFp, PrimeField};

/// Curve seed x₀; the base field and scalar field orders and the ate loop
/// length all derive from it.
pub(crate) const SEED_X: u64 = 4965661367192848881;

/// Coefficient b in y² = x³ + b over Fq.
pub const B_G1: Fq = MontFp!("3");

/// Coefficient b' = b/ξ of the sextic twist y² = x³ + b' over Fq2.
pub const B_G2: Fq2 = Fq2::new(
    MontFp!("19485874751759354771024239261021720505790618469301721065564631296452457478373"),
    MontFp!("266929791119991161246907387137283842545076965332900288569378510910307636690"),
);

/// Primitive cube root of unity in Fq; (x, y) -> (ζx, y) is the curve
/// endomorphism backing GLV scalar multiplication.
pub(crate) const THIRD_ROOT_ONE_G1: Fq =
    MontFp!("2203960485148121921418603742825762020974279258880205651966");

/// 6x₀+2 in signed binary (NAF), least significant digit first. The Miller
/// loop walks it from the second-most-significant digit down.
pub(crate) const LOOP_COUNTER: [i8; 66] = [
    0, 0, 0, 1, 0, 1, 0, -1, 0, 0, -1, 0, 0, 0, 1, 0, 0, -1, 0, -1, 0, 0, 0, 1, 0, -1, 0, 0, 0, 0,
    -1, 0, 0, 1, 0, -1, 0, 0, 1, 0, 0, 0, 0, 0, -1, 0, 0, -1, 0, 1, 0, -1, 0, 0, 0, -1, 0, -1, 0,
    0, 0, 1, 0, -1, 0, 1,
];

// Twist-Frobenius coefficients: with π the p-power Frobenius, the image of a
// twist point (x, y) is (x̄·ξ^((p-1)/3), ȳ·ξ^((p-1)/2)), and π² multiplies the
// untouched coordinates by ξ^((p²-1)/3) and ξ^((p²-1)/2).

pub(crate) const TWIST_FROB_X: Fq2 = Fq2::new(
    MontFp!("21575463638280843010398324269430826099269044274347216827212613867836435027261"),
    MontFp!("10307601595873709700152284273816112264069230130616436755625194854815875713954"),
);

pub(crate) const TWIST_FROB_Y: Fq2 = Fq2::new(
    MontFp!("2821565182194536844548159561693502659359617185244120367078079554186484126554"),
    MontFp!("3505843767911556378687030309984248845540243509899259641013678093033130930403"),
);

pub(crate) const TWIST_FROB2_X: Fq2 = Fq2::new(
    MontFp!("21888242871839275220042445260109153167277707414472061641714758635765020556616"),
    Fq::ZERO,
);

pub(crate) const TWIST_FROB2_Y: Fq2 = Fq2::new(
    MontFp!("21888242871839275222246405745257275088696311157297823662689037894645226208582"),
    Fq::ZERO,
);

/// (p - 1) / 2, little-endian limbs.
const FQ_HALF: BigInt<4> = BigInt::new([
    0x9e10460b6c3e7ea3,
    0xcbc0b548b438e546,
    0xdc2822db40c0ac2e,
    0x183227397098d014,
]);

/// True if the canonical representative of `x` is strictly larger than that
/// of `-x`, i.e. x > (p-1)/2. Fixes which square root a compressed point
/// encoding refers to.
pub fn lexicographically_largest(x: &Fq) -> bool {
    x.into_bigint() > FQ_HALF
}

#[cfg(test)]
mod tests {
    use ark_ff::Field;

    use super::*;

    #[test]
    fn test_lexicographic_order() {
        assert!(!lexicographically_largest(&Fq::ZERO));
        assert!(!lexicographically_largest(&Fq::ONE));
        assert!(lexicographically_largest(&-Fq::ONE));
        let one = Fq::ONE;
        assert_ne!(lexicographically_largest(&one), lexicographically_largest(&-one));
    }

    #[test]
    fn test_third_root_of_unity() {
        let z = THIRD_ROOT_ONE_G1;
        assert_ne!(z, Fq::ONE);
        assert_eq!(z * z * z, Fq::ONE);
    }

    #[test]
    fn test_loop_counter_value() {
        // the signed digits must recompose to 6x₀+2
        let mut acc = 0i128;
        for (i, d) in LOOP_COUNTER.iter().enumerate() {
            acc += (*d as i128) << i;
        }
        assert_eq!(acc, 6 * SEED_X as i128 + 2);
    }
}
