//! Round trips and failure modes of the G1 byte codec.

use ark_ff::{PrimeField, UniformRand};
use bn254_pairing::ark::Fr;
use bn254_pairing::curve::lexicographically_largest;
use bn254_pairing::{batch_decompress_g1, G1Affine, G1Jacobian, SIZE_OF_G1_COMPRESSED};
use num_bigint::BigUint;
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use test_log::test;

fn rng() -> ChaCha20Rng {
    ChaCha20Rng::seed_from_u64(3)
}

fn random_point(rng: &mut ChaCha20Rng) -> G1Affine {
    let s: BigUint = Fr::rand(rng).into_bigint().into();
    G1Affine::from(&G1Jacobian::GENERATOR.mul_windowed(&s))
}

#[test]
fn test_compressed_round_trip() {
    let mut rng = rng();
    for _ in 0..20 {
        let p = random_point(&mut rng);
        let buf = p.to_bytes();

        let mut decoded = G1Affine::INFINITY;
        assert_eq!(decoded.set_bytes(&buf), Ok(SIZE_OF_G1_COMPRESSED));
        assert_eq!(decoded, p);
    }
}

#[test]
fn test_uncompressed_round_trip() {
    let mut rng = rng();
    for _ in 0..20 {
        let p = random_point(&mut rng);
        let buf = p.to_raw_bytes();

        let mut decoded = G1Affine::INFINITY;
        assert_eq!(decoded.set_bytes(&buf), Ok(buf.len()));
        assert_eq!(decoded, p);
    }
}

#[test]
fn test_metadata_encodes_root_choice() {
    let mut rng = rng();
    for _ in 0..20 {
        let p = random_point(&mut rng);
        let buf = p.to_bytes();

        let largest = buf[0] >> 6 == 0b11;
        assert_eq!(largest, lexicographically_largest(&p.y));
    }
}

#[test]
fn test_decode_ignores_trailing_bytes() {
    let mut rng = rng();
    let p = random_point(&mut rng);

    let mut stream = p.to_bytes().to_vec();
    stream.extend_from_slice(&[0xab; 7]);

    let mut decoded = G1Affine::INFINITY;
    assert_eq!(decoded.set_bytes(&stream), Ok(SIZE_OF_G1_COMPRESSED));
    assert_eq!(decoded, p);
}

#[test]
fn test_batch_decompress_matches_serial() {
    let mut rng = rng();
    let mut points: Vec<G1Affine> = (0..40).map(|_| random_point(&mut rng)).collect();
    points[0] = G1Affine::INFINITY;
    points[13] = G1Affine::INFINITY;

    let mut stream = Vec::with_capacity(points.len() * SIZE_OF_G1_COMPRESSED);
    for p in &points {
        stream.extend_from_slice(&p.to_bytes());
    }

    let decoded = batch_decompress_g1(&stream).unwrap();
    assert_eq!(decoded, points);
}
