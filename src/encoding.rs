//! Binary encoding of G1 points.
//!
//! Fixed-width big-endian layout with the two most significant bits of the
//! first byte repurposed as metadata (the coordinate leaves 2 spare bits,
//! not the 3 a BLS12-381/ZCash-style encoding would need):
//!
//! | bits | meaning                                          |
//! |------|--------------------------------------------------|
//! | 00   | uncompressed, X then Y                           |
//! | 01   | compressed point at infinity                     |
//! | 10   | compressed, Y is the lexicographically smaller root |
//! | 11   | compressed, Y is the lexicographically larger root  |
//!
//! Decoding reconstructs Y from the curve equation when compressed, and
//! deliberately does **not** check curve or subgroup membership; callers
//! that consume untrusted bytes must validate the decoded point themselves.
//!
//! For bulk inputs the compressed decode splits in two phases: a cheap
//! sequential parse of metadata and X, and the square-root recovery of Y,
//! which is embarrassingly parallel and runs on the rayon pool.

use ark_bn254::Fq;
use ark_ff::{AdditiveGroup, BigInteger, Field, PrimeField};
use rayon::prelude::*;
use tracing::trace;

use crate::curve::{lexicographically_largest, B_G1};
use crate::g1::G1Affine;

/// Size in bytes of a compressed G1 point.
pub const SIZE_OF_G1_COMPRESSED: usize = 32;

/// Size in bytes of an uncompressed G1 point.
pub const SIZE_OF_G1_UNCOMPRESSED: usize = 2 * SIZE_OF_G1_COMPRESSED;

const M_MASK: u8 = 0b11 << 6;
const M_UNCOMPRESSED: u8 = 0b00 << 6;
const M_COMPRESSED_INFINITY: u8 = 0b01 << 6;
const M_COMPRESSED_SMALLEST: u8 = 0b10 << 6;
const M_COMPRESSED_LARGEST: u8 = 0b11 << 6;

/// Decoding failures surfaced to the caller; everything else about point
/// encoding is infallible.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PointDecodeError {
    #[error("not enough bytes to decode a curve point")]
    ShortBuffer,
    #[error("invalid compressed coordinate: square root doesn't exist")]
    InvalidCompressedPoint,
}

/// Picks the square root matching the metadata bit and orients it.
fn orient_y(mut y: Fq, m_data: u8) -> Fq {
    if lexicographically_largest(&y) {
        if m_data == M_COMPRESSED_SMALLEST {
            y = -y;
        }
    } else if m_data == M_COMPRESSED_LARGEST {
        y = -y;
    }
    y
}

fn write_fq_be(out: &mut [u8], x: &Fq) {
    out.copy_from_slice(&x.into_bigint().to_bytes_be());
}

impl G1Affine {
    /// Compressed encoding: X with the root-selection metadata, or the
    /// infinity marker over a zero buffer.
    pub fn to_bytes(&self) -> [u8; SIZE_OF_G1_COMPRESSED] {
        let mut res = [0u8; SIZE_OF_G1_COMPRESSED];

        if self.is_infinity() {
            res[0] = M_COMPRESSED_INFINITY;
            return res;
        }

        let msb_mask = if lexicographically_largest(&self.y) {
            M_COMPRESSED_LARGEST
        } else {
            M_COMPRESSED_SMALLEST
        };

        write_fq_be(&mut res, &self.x);
        res[0] |= msb_mask;
        res
    }

    /// Uncompressed encoding: X then Y, metadata 00. Infinity is the
    /// all-zero buffer.
    pub fn to_raw_bytes(&self) -> [u8; SIZE_OF_G1_UNCOMPRESSED] {
        let mut res = [0u8; SIZE_OF_G1_UNCOMPRESSED];

        if self.is_infinity() {
            res[0] = M_UNCOMPRESSED;
            return res;
        }

        write_fq_be(&mut res[..SIZE_OF_G1_COMPRESSED], &self.x);
        write_fq_be(&mut res[SIZE_OF_G1_COMPRESSED..], &self.y);
        res[0] |= M_UNCOMPRESSED;
        res
    }

    /// Decodes either encoding from the front of `buf`, returning the
    /// number of bytes consumed. No curve or subgroup validation happens
    /// here.
    pub fn set_bytes(&mut self, buf: &[u8]) -> Result<usize, PointDecodeError> {
        if buf.len() < SIZE_OF_G1_COMPRESSED {
            return Err(PointDecodeError::ShortBuffer);
        }

        let m_data = buf[0] & M_MASK;

        if m_data == M_UNCOMPRESSED && buf.len() < SIZE_OF_G1_UNCOMPRESSED {
            return Err(PointDecodeError::ShortBuffer);
        }

        if m_data == M_COMPRESSED_INFINITY {
            *self = G1Affine::INFINITY;
            return Ok(SIZE_OF_G1_COMPRESSED);
        }

        let mut tmp = [0u8; SIZE_OF_G1_COMPRESSED];
        tmp.copy_from_slice(&buf[..SIZE_OF_G1_COMPRESSED]);
        tmp[0] &= !M_MASK;
        self.x = Fq::from_be_bytes_mod_order(&tmp);

        if m_data == M_UNCOMPRESSED {
            self.y = Fq::from_be_bytes_mod_order(
                &buf[SIZE_OF_G1_COMPRESSED..SIZE_OF_G1_UNCOMPRESSED],
            );
            return Ok(SIZE_OF_G1_UNCOMPRESSED);
        }

        let y_squared = self.x.square() * self.x + B_G1;
        let y = y_squared
            .sqrt()
            .ok_or(PointDecodeError::InvalidCompressedPoint)?;
        self.y = orient_y(y, m_data);

        Ok(SIZE_OF_G1_COMPRESSED)
    }
}

/// A compressed point after the cheap parsing phase: X is set, the root
/// selection is remembered, and Y is still to be recovered. Splitting here
/// keeps the expensive square-root step off the sequential path of a bulk
/// decode.
#[derive(Copy, Clone, Debug)]
pub struct CompressedG1 {
    x: Fq,
    flags: u8,
}

impl CompressedG1 {
    /// Phase 1: strip the metadata bits and read X. Cheap and sequential.
    pub fn parse(buf: &[u8; SIZE_OF_G1_COMPRESSED]) -> CompressedG1 {
        let flags = buf[0] & M_MASK;

        if flags == M_COMPRESSED_INFINITY {
            return CompressedG1 {
                x: Fq::ZERO,
                flags,
            };
        }

        let mut tmp = *buf;
        tmp[0] &= !M_MASK;
        CompressedG1 {
            x: Fq::from_be_bytes_mod_order(&tmp),
            flags,
        }
    }

    pub fn is_infinity(&self) -> bool {
        self.flags == M_COMPRESSED_INFINITY
    }

    /// Phase 2: solve Y² = X³ + b and orient the root. Compute-heavy and
    /// independent per point, safe to fan out.
    pub fn recover_y(&self) -> Result<G1Affine, PointDecodeError> {
        if self.is_infinity() {
            return Ok(G1Affine::INFINITY);
        }

        let y_squared = self.x.square() * self.x + B_G1;
        let y = y_squared
            .sqrt()
            .ok_or(PointDecodeError::InvalidCompressedPoint)?;

        Ok(G1Affine {
            x: self.x,
            y: orient_y(y, self.flags),
        })
    }
}

/// Decodes a contiguous stream of compressed points, parsing sequentially
/// and recovering the Y coordinates in parallel. The buffer length must be
/// a whole number of compressed points.
pub fn batch_decompress_g1(buf: &[u8]) -> Result<Vec<G1Affine>, PointDecodeError> {
    if buf.len() % SIZE_OF_G1_COMPRESSED != 0 {
        return Err(PointDecodeError::ShortBuffer);
    }

    let parsed: Vec<CompressedG1> = buf
        .chunks_exact(SIZE_OF_G1_COMPRESSED)
        .map(|chunk| {
            let chunk: &[u8; SIZE_OF_G1_COMPRESSED] =
                chunk.try_into().expect("chunks_exact yields exact chunks");
            CompressedG1::parse(chunk)
        })
        .collect();

    trace!(points = parsed.len(), "batch decompress");

    parsed.par_iter().map(CompressedG1::recover_y).collect()
}
