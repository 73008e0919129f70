//! Pairing properties: bilinearity, multi-pairing, degeneracy, and
//! agreement with an independent implementation.

use ark_ec::pairing::Pairing as _;
use ark_ff::{Field, PrimeField, UniformRand};
use bn254_pairing::ark::{Fq12, Fr};
use bn254_pairing::{final_exponentiation, miller_loop, pairing, G1Affine, G2Affine};
use num_bigint::BigUint;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use test_log::test;

fn rng() -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(1)
}

fn random_scalar(rng: &mut ChaCha20Rng) -> BigUint {
    Fr::rand(rng).into_bigint().into()
}

fn random_g1(rng: &mut ChaCha20Rng) -> G1Affine {
    G1Affine::GENERATOR.scalar_multiplication(&random_scalar(rng))
}

fn random_g2(rng: &mut ChaCha20Rng) -> G2Affine {
    G2Affine::GENERATOR.scalar_multiplication(&random_scalar(rng))
}

#[test]
fn test_bilinearity() {
    let mut rng = rng();
    let a = random_scalar(&mut rng);
    let b = random_scalar(&mut rng);

    let p = G1Affine::GENERATOR;
    let q = G2Affine::GENERATOR;

    let e = pairing(&p, &q);
    assert_ne!(e, Fq12::ONE, "pairing of generators must not degenerate");

    let e_ab = pairing(
        &p.scalar_multiplication(&a),
        &q.scalar_multiplication(&b),
    );
    let ab = a * b;
    assert_eq!(e_ab, e.pow(ab.to_u64_digits()));
}

#[test]
fn test_pairing_is_nondegenerate_of_order_r() {
    let e = pairing(&G1Affine::GENERATOR, &G2Affine::GENERATOR);
    let r: BigUint = Fr::MODULUS.into();
    assert_eq!(e.pow(r.to_u64_digits()), Fq12::ONE);
}

#[test]
fn test_matches_independent_implementation() {
    let mut rng = rng();
    for _ in 0..3 {
        let p = random_g1(&mut rng);
        let q = random_g2(&mut rng);

        let theirs = ark_bn254::Bn254::pairing(
            ark_bn254::G1Affine::new(p.x, p.y),
            ark_bn254::G2Affine::new(q.x, q.y),
        )
        .0;

        assert_eq!(pairing(&p, &q), theirs);
    }
}

#[test]
fn test_multi_pairing_single_final_exponentiation() {
    let mut rng = rng();
    let (p1, q1) = (random_g1(&mut rng), random_g2(&mut rng));
    let (p2, q2) = (random_g1(&mut rng), random_g2(&mut rng));

    let e1 = miller_loop(&p1, &q1);
    let e2 = miller_loop(&p2, &q2);

    let combined = final_exponentiation(&e1, &[e2]);
    let separate = final_exponentiation(&e1, &[]) * final_exponentiation(&e2, &[]);
    assert_eq!(combined, separate);
}

#[test]
fn test_infinity_absorbs() {
    let mut rng = rng();
    let p = random_g1(&mut rng);
    let q = random_g2(&mut rng);

    assert_eq!(miller_loop(&G1Affine::INFINITY, &q), Fq12::ONE);
    assert_eq!(miller_loop(&p, &G2Affine::INFINITY), Fq12::ONE);
    assert_eq!(pairing(&G1Affine::INFINITY, &q), Fq12::ONE);
}

#[test]
fn test_inverse_pair() {
    // e(-P, Q) is the inverse of e(P, Q)
    let mut rng = rng();
    let p = random_g1(&mut rng);
    let q = random_g2(&mut rng);

    let e = pairing(&p, &q);
    let e_neg = pairing(&(-p), &q);
    assert_eq!(e * e_neg, Fq12::ONE);
}
