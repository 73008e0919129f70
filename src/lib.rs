//! BN254 (alt_bn128) G1 arithmetic and optimal-ate pairing.
//!
//! This crate implements the curve layer of a BN254 pairing stack on top of
//! the `ark-bn254`/`ark-ff` field tower:
//!
//! - **G1 points** in affine, Jacobian and projective coordinates, with the
//!   full additive group law, GLV-accelerated scalar multiplication, and
//!   batch conversion / batch scalar multiplication that fan out over a
//!   rayon worker pool.
//! - **A serialization codec** for G1 with compressed and uncompressed
//!   fixed-width big-endian layouts (metadata in the top two bits of the
//!   first byte) and a two-phase bulk decompression path that moves the
//!   square-root work off the sequential parse.
//! - **The pairing engine**: an optimal-ate Miller loop whose line
//!   evaluations are produced on a dedicated thread and streamed through a
//!   bounded channel into the accumulator, and the two-stage final
//!   exponentiation with multi-pairing support.
//! - A minimal **G2 twist layer**, just enough to feed the Miller loop and
//!   to exercise bilinearity in tests.
//!
//! Field and extension-tower arithmetic (Fq, Fr, Fq2, Fq6, Fq12) is consumed
//! as an opaque primitive; everything above it (group law, scalar
//! decomposition, byte layout, pairing schedule) lives here.
//!
//! # Example
//!
//! ```rust
//! use bn254_pairing::{pairing, G1Affine, G2Affine};
//! use num_bigint::BigUint;
//!
//! let p = G1Affine::GENERATOR.scalar_multiplication(&BigUint::from(6u32));
//! let q = G2Affine::GENERATOR;
//!
//! // e(6·P, Q) == e(2·P, 3·Q)
//! let lhs = pairing(&p, &q);
//! let rhs = pairing(
//!     &G1Affine::GENERATOR.scalar_multiplication(&BigUint::from(2u32)),
//!     &q.scalar_multiplication(&BigUint::from(3u32)),
//! );
//! assert_eq!(lhs, rhs);
//! ```
//!
//! This crate does not attempt constant-time execution; it is not suited to
//! handling long-term secrets.

pub mod curve;
mod encoding;
mod g1;
mod g2;
mod glv;
pub mod logging;
mod pairing;
mod tower;

pub use encoding::{
    batch_decompress_g1, CompressedG1, PointDecodeError, SIZE_OF_G1_COMPRESSED,
    SIZE_OF_G1_UNCOMPRESSED,
};
pub use g1::{
    batch_jacobian_to_affine_g1, batch_scalar_multiplication_g1, G1Affine, G1Jacobian,
    G1Projective,
};
pub use g2::{G2Affine, G2Jacobian};
pub use logging::init_tracing;
pub use pairing::{final_exponentiation, miller_loop, pairing, Gt};

/// The field primitives this crate builds on, re-exported so consumers can
/// name coordinates and scalars without a direct `ark` dependency.
pub mod ark {
    pub use ark_bn254::{Fq, Fq2, Fq6, Fq12, Fr};
    pub use ark_ff::{AdditiveGroup, Field, PrimeField, UniformRand};
}
