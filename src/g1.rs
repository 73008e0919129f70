//! G1: points on the BN254 base curve y² = x³ + 3 over Fq.
//!
//! Three representations cooperate here:
//!
//! - [`G1Affine`], the canonical (x, y) pair. The identity is encoded as
//!   (0, 0), which is unambiguous because the curve does not pass through
//!   the origin.
//! - [`G1Jacobian`], the working representation (X, Y, Z) with affine image
//!   (X/Z², Y/Z³). Z = 0 marks the identity, normalized to X = Y = 1 by
//!   every constructor. All group-law work happens here to avoid per-op
//!   inversions.
//! - [`G1Projective`], (x, y, z) with affine image (x/z, y/z), produced only
//!   as a conversion intermediate for line evaluation.
//!
//! Scalar multiplication uses the GLV endomorphism split by default, with a
//! plain 2-bit-windowed walk kept as the endomorphism-free reference path.
//! Batch conversion and batch scalar multiplication fan their elementwise
//! phases out over the rayon pool; each worker writes a disjoint region of
//! the output, so no synchronization is involved.

use std::ops::{AddAssign, Neg, SubAssign};

use ark_bn254::{Fq, Fr};
use ark_ff::{AdditiveGroup, Field, MontFp, PrimeField, Zero};
use num_bigint::{BigUint, Sign};
use rayon::prelude::*;
use tracing::debug;

use crate::curve::{B_G1, THIRD_ROOT_ONE_G1};
use crate::glv;

/// Point on the base curve in affine coordinates; (0, 0) is the identity.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct G1Affine {
    pub x: Fq,
    pub y: Fq,
}

/// Point on the base curve in Jacobian coordinates.
#[derive(Copy, Clone, Debug)]
pub struct G1Jacobian {
    pub x: Fq,
    pub y: Fq,
    pub z: Fq,
}

/// Point on the base curve in homogeneous projective coordinates.
#[derive(Copy, Clone, Debug)]
pub struct G1Projective {
    pub x: Fq,
    pub y: Fq,
    pub z: Fq,
}

impl G1Affine {
    pub const INFINITY: G1Affine = G1Affine {
        x: Fq::ZERO,
        y: Fq::ZERO,
    };

    pub const GENERATOR: G1Affine = G1Affine {
        x: MontFp!("1"),
        y: MontFp!("2"),
    };

    pub fn is_infinity(&self) -> bool {
        self.x.is_zero() && self.y.is_zero()
    }

    pub fn is_on_curve(&self) -> bool {
        // route through Jacobian so the identity is handled uniformly
        G1Jacobian::from(self).is_on_curve()
    }

    /// Subgroup membership. The r-torsion of this curve over the base field
    /// is the full group (cofactor 1), so this reduces to the curve check;
    /// that shortcut does not carry over to other curve families.
    pub fn is_in_subgroup(&self) -> bool {
        let p = G1Jacobian::from(self);
        p.is_on_curve() && p.is_in_subgroup()
    }

    /// s·P via the GLV fast path.
    pub fn scalar_multiplication(&self, s: &BigUint) -> G1Affine {
        G1Affine::from(&G1Jacobian::from(self).mul_glv(s))
    }
}

impl Neg for G1Affine {
    type Output = G1Affine;

    fn neg(mut self) -> G1Affine {
        self.y = -self.y;
        self
    }
}

impl From<&G1Jacobian> for G1Affine {
    fn from(p: &G1Jacobian) -> G1Affine {
        if p.z.is_zero() {
            return G1Affine::INFINITY;
        }
        let a = p.z.inverse().unwrap_or(Fq::ZERO);
        let b = a.square();
        G1Affine {
            x: p.x * b,
            y: p.y * b * a,
        }
    }
}

impl G1Jacobian {
    pub const INFINITY: G1Jacobian = G1Jacobian {
        x: Fq::ONE,
        y: Fq::ONE,
        z: Fq::ZERO,
    };

    pub const GENERATOR: G1Jacobian = G1Jacobian {
        x: MontFp!("1"),
        y: MontFp!("2"),
        z: MontFp!("1"),
    };

    pub fn is_infinity(&self) -> bool {
        self.z.is_zero()
    }

    /// Doubling, dbl-2007-bl. Total: no coincidence concerns, unlike
    /// addition.
    pub fn double_in_place(&mut self) {
        let xx = self.x.square();
        let yy = self.y.square();
        let yyyy = yy.square();
        let zz = self.z.square();
        let s = ((self.x + yy).square() - xx - yyyy).double();
        let m = xx.double() + xx;
        self.z = (self.z + self.y).square() - yy - zz;
        self.x = m.square() - s.double();
        self.y = (s - self.x) * m - yyyy.double().double().double();
    }

    pub fn double(&self) -> G1Jacobian {
        let mut p = *self;
        p.double_in_place();
        p
    }

    /// Homogeneous curve check Y² = X³ + b·Z⁶; no normalization needed, and
    /// the (1, 1, 0) identity satisfies it.
    pub fn is_on_curve(&self) -> bool {
        let left = self.y.square();
        let mut tmp = self.z.square();
        tmp.square_in_place();
        tmp *= self.z;
        tmp *= self.z;
        let right = self.x.square() * self.x + tmp * B_G1;
        left == right
    }

    /// See [`G1Affine::is_in_subgroup`]: cofactor 1 makes this the curve
    /// check.
    pub fn is_in_subgroup(&self) -> bool {
        self.is_on_curve()
    }

    /// s·P via the GLV fast path.
    pub fn scalar_multiplication(&self, s: &BigUint) -> G1Jacobian {
        self.mul_glv(s)
    }

    /// Plain 2-bit-windowed multiplication over the big-endian scalar bytes.
    /// Slower than [`Self::mul_glv`] but independent of the endomorphism;
    /// both must agree on every input.
    pub fn mul_windowed(&self, s: &BigUint) -> G1Jacobian {
        let mut res = G1Jacobian::INFINITY;
        let mut ops = [*self; 3];
        ops[1] = ops[0].double();
        ops[2] = ops[1] + ops[0];

        for w in s.to_bytes_be() {
            let mut mask = 0xc0u8;
            for j in 0..4 {
                res.double_in_place();
                res.double_in_place();
                let c = (w & mask) >> (6 - 2 * j);
                if c != 0 {
                    res += &ops[(c - 1) as usize];
                }
                mask >>= 2;
            }
        }
        res
    }

    /// The curve endomorphism (x, y) -> (ζx, y), acting as multiplication
    /// by λ on the group.
    fn phi(&self) -> G1Jacobian {
        let mut p = *self;
        p.x *= THIRD_ROOT_ONE_G1;
        p
    }

    /// GLV scalar multiplication: split s into half-width (k1, k2) with
    /// s ≡ k1 + k2·λ (mod r), then walk both digit streams jointly with a
    /// 15-entry table covering every signed 2-bit digit pair. Two doublings
    /// per pair, half the doublings of the plain walk.
    pub fn mul_glv(&self, s: &BigUint) -> G1Jacobian {
        let mut table = [G1Jacobian::INFINITY; 15];
        let mut res = G1Jacobian::INFINITY;

        // table[b3b2b1b0 - 1] = b3b2·phi(a) + b1b0·a
        table[0] = *self;
        table[3] = self.phi();

        let (k1, k2) = glv::split_scalar(s);
        if k1.sign() == Sign::Minus {
            table[0] = -table[0];
        }
        if k2.sign() == Sign::Minus {
            table[3] = -table[3];
        }

        table[1] = table[0].double();
        table[2] = table[1] + table[0];
        table[4] = table[3] + table[0];
        table[5] = table[3] + table[1];
        table[6] = table[3] + table[2];
        table[7] = table[3].double();
        table[8] = table[7] + table[0];
        table[9] = table[7] + table[1];
        table[10] = table[7] + table[2];
        table[11] = table[7] + table[3];
        table[12] = table[11] + table[0];
        table[13] = table[11] + table[1];
        table[14] = table[11] + table[2];

        // the lattice bounds both halves to 128 bits
        let k1 = glv::limbs_128(&k1);
        let k2 = glv::limbs_128(&k2);

        for i in (0..2).rev() {
            let mut mask = 3u64 << 62;
            for j in 0..32 {
                res.double_in_place();
                res.double_in_place();
                let b1 = (k1[i] & mask) >> (62 - 2 * j);
                let b2 = (k2[i] & mask) >> (62 - 2 * j);
                if b1 | b2 != 0 {
                    let entry = (b2 << 2) | b1;
                    res += &table[(entry - 1) as usize];
                }
                mask >>= 2;
            }
        }

        res
    }
}

/// Jacobian + Jacobian, add-2007-bl. Coincident inputs are routed to
/// doubling: the unified formula divides by zero on them.
impl AddAssign<&G1Jacobian> for G1Jacobian {
    fn add_assign(&mut self, a: &G1Jacobian) {
        if self.z.is_zero() {
            *self = *a;
            return;
        }
        if a.z.is_zero() {
            return;
        }

        let z1z1 = a.z.square();
        let z2z2 = self.z.square();
        let u1 = a.x * z2z2;
        let u2 = self.x * z1z1;
        let s1 = a.y * self.z * z2z2;
        let s2 = self.y * a.z * z1z1;

        if u1 == u2 && s1 == s2 {
            self.double_in_place();
            return;
        }

        let h = u2 - u1;
        let i = h.double().square();
        let j = h * i;
        let r = (s2 - s1).double();
        let v = u1 * i;
        self.x = r.square() - j - v.double();
        self.y = r * (v - self.x) - (s1 * j).double();
        self.z = ((self.z + a.z).square() - z1z1 - z2z2) * h;
    }
}

/// Jacobian + affine, madd-2007-bl; the affine operand's implicit Z = 1
/// saves the cross-scaling work. Same coincidence guard as the full
/// addition.
impl AddAssign<&G1Affine> for G1Jacobian {
    fn add_assign(&mut self, a: &G1Affine) {
        if a.is_infinity() {
            return;
        }
        if self.z.is_zero() {
            self.x = a.x;
            self.y = a.y;
            self.z = Fq::ONE;
            return;
        }

        let z1z1 = self.z.square();
        let u2 = a.x * z1z1;
        let s2 = a.y * self.z * z1z1;

        if u2 == self.x && s2 == self.y {
            self.double_in_place();
            return;
        }

        let h = u2 - self.x;
        let hh = h.square();
        let i = hh.double().double();
        let j = h * i;
        let r = (s2 - self.y).double();
        let v = self.x * i;
        let x3 = r.square() - j - v.double();
        self.y = r * (v - x3) - (j * self.y).double();
        self.x = x3;
        self.z = (self.z + h).square() - z1z1 - hh;
    }
}

impl SubAssign<&G1Jacobian> for G1Jacobian {
    fn sub_assign(&mut self, a: &G1Jacobian) {
        let mut t = *a;
        t.y = -t.y;
        *self += &t;
    }
}

impl std::ops::Add for G1Jacobian {
    type Output = G1Jacobian;

    fn add(mut self, rhs: G1Jacobian) -> G1Jacobian {
        self += &rhs;
        self
    }
}

impl Neg for G1Jacobian {
    type Output = G1Jacobian;

    fn neg(mut self) -> G1Jacobian {
        self.y = -self.y;
        self
    }
}

/// Scale-free equality: both infinite, or equal affine projections.
impl PartialEq for G1Jacobian {
    fn eq(&self, other: &G1Jacobian) -> bool {
        if self.z.is_zero() && other.z.is_zero() {
            return true;
        }
        G1Affine::from(self) == G1Affine::from(other)
    }
}

impl Eq for G1Jacobian {}

impl From<&G1Affine> for G1Jacobian {
    fn from(q: &G1Affine) -> G1Jacobian {
        if q.is_infinity() {
            return G1Jacobian::INFINITY;
        }
        G1Jacobian {
            x: q.x,
            y: q.y,
            z: Fq::ONE,
        }
    }
}

impl From<&G1Jacobian> for G1Projective {
    fn from(q: &G1Jacobian) -> G1Projective {
        let buf = q.z.square();
        G1Projective {
            x: q.x * q.z,
            y: q.y,
            z: q.z * buf,
        }
    }
}

/// Converts a slice of Jacobian points to affine with a single field
/// inversion: accumulate prefix products of the Z coordinates, invert the
/// total once, then unwind it into the individual Z⁻¹ values. Points at
/// infinity are flagged and written as (0, 0). The elementwise rescale at
/// the end runs on the rayon pool.
///
/// `result` must have the same length as `points`; anything else is a
/// caller bug.
pub fn batch_jacobian_to_affine_g1(points: &[G1Jacobian], result: &mut [G1Affine]) {
    assert_eq!(points.len(), result.len());
    let mut zeroes = vec![false; points.len()];
    let mut accumulator = Fq::ONE;

    // stash the prefix products in result[i].x to avoid a scratch slice
    for i in 0..points.len() {
        if points[i].z.is_zero() {
            zeroes[i] = true;
            result[i] = G1Affine::INFINITY;
            continue;
        }
        result[i].x = accumulator;
        accumulator *= points[i].z;
    }

    let mut acc_inverse = accumulator.inverse().unwrap_or(Fq::ZERO);

    for i in (0..points.len()).rev() {
        if zeroes[i] {
            continue;
        }
        result[i].x *= acc_inverse;
        acc_inverse *= points[i].z;
    }

    result
        .par_iter_mut()
        .zip(points.par_iter())
        .for_each(|(out, point)| {
            if point.z.is_zero() {
                return;
            }
            let a = out.x;
            let b = a.square();
            out.x = point.x * b;
            out.y = point.y * b * a;
        });
}

/// Digit-window descriptor: which word of the scalar holds a chunk's bits,
/// how to shift and mask them out, and the spill-over masks when a window
/// straddles a 64-bit boundary.
#[derive(Copy, Clone, Debug)]
struct Selector {
    index: usize,
    shift: u64,
    mask: u64,
    multi_word: bool,
    mask_high: u64,
    shift_high: u64,
}

fn window_selectors(c: u64, nb_chunks: usize) -> Vec<Selector> {
    let mask = (1u64 << c) - 1;
    (0..nb_chunks)
        .map(|chunk| {
            let jc = chunk as u64 * c;
            let index = (jc / 64) as usize;
            let shift = jc - (jc / 64) * 64;
            let mut sel = Selector {
                index,
                shift,
                mask: mask << shift,
                multi_word: false,
                mask_high: 0,
                shift_high: 0,
            };
            sel.multi_word = 64 % c != 0 && shift > 64 - c && index < 3;
            if sel.multi_word {
                let nb_bits_high = shift - (64 - c);
                sel.mask_high = (1 << nb_bits_high) - 1;
                sel.shift_high = c - nb_bits_high;
            }
            sel
        })
        .collect()
}

/// Rewrites each scalar's c-bit windows into signed-digit form: a digit
/// d ≥ 2^(c-1) borrows 2^c from the next window and is stored as
/// (|d'| - 1) with the window's top bit set, so the main walk only ever
/// needs the first 2^(c-1) odd multiples of the base.
fn partition_scalars(scalars: &[Fr], c: u64, selectors: &[Selector]) -> Vec<[u64; 4]> {
    let max = 1i64 << (c - 1);
    let msb_window = 1u64 << (c - 1);

    scalars
        .iter()
        .map(|scalar| {
            let limbs = scalar.into_bigint().0;
            let mut out = [0u64; 4];
            let mut carry = 0i64;
            for sel in selectors {
                let mut digit = carry;
                carry = 0;
                digit += ((limbs[sel.index] & sel.mask) >> sel.shift) as i64;
                if sel.multi_word {
                    digit += ((limbs[sel.index + 1] & sel.mask_high) << sel.shift_high) as i64;
                }
                if digit == 0 {
                    continue;
                }
                if digit >= max {
                    digit -= 1 << c;
                    carry = 1;
                }
                let bits = if digit >= 0 {
                    digit as u64
                } else {
                    (-digit - 1) as u64 | msb_window
                };
                out[sel.index] |= bits << sel.shift;
                if sel.multi_word {
                    out[sel.index + 1] |= bits >> sel.shift_high;
                }
            }
            out
        })
        .collect()
}

/// Multiplies one fixed base by many scalars, returning affine results.
///
/// The window width c minimizes the cost model 2^(c-1) + n·(bits + chunks):
/// one odd-multiples table shared by every scalar, then an independent
/// digit walk per scalar, parallelized over the rayon pool. The table is
/// batch-converted to affine first so every inner addition is a mixed add.
pub fn batch_scalar_multiplication_g1(base: &G1Affine, scalars: &[Fr]) -> Vec<G1Affine> {
    let nb_points = scalars.len() as u64;
    let mut best_cost = u64::MAX;
    let mut best_c = 2u64;
    for c in 2..18 {
        let mut nb_chunks = 256 / c;
        if 256 % c != 0 {
            nb_chunks += 1;
        }
        let cost = (1u64 << (c - 1)) + nb_points * (256 + nb_chunks);
        if cost < best_cost {
            best_cost = cost;
            best_c = c;
        }
    }
    let c = best_c;
    let mut nb_chunks = (256 / c) as usize;
    if 256 % c != 0 {
        nb_chunks += 1;
    }
    let msb_window = 1u64 << (c - 1);

    debug!(
        n = scalars.len(),
        window = c,
        chunks = nb_chunks,
        "batch scalar multiplication"
    );

    // odd multiples table: base_table[i] = (i+1)·base
    let mut base_table = vec![G1Jacobian::INFINITY; 1 << (c - 1)];
    base_table[0] += base;
    for i in 1..base_table.len() {
        base_table[i] = base_table[i - 1];
        base_table[i] += base;
    }

    let selectors = window_selectors(c, nb_chunks);
    let partitioned = partition_scalars(scalars, c, &selectors);

    // affine table turns every addition below into a mixed add
    let mut base_table_aff = vec![G1Affine::INFINITY; base_table.len()];
    batch_jacobian_to_affine_g1(&base_table, &mut base_table_aff);

    let results: Vec<G1Jacobian> = partitioned
        .par_iter()
        .map(|scalar| {
            let mut p = G1Jacobian::INFINITY;
            for chunk in (0..nb_chunks).rev() {
                let sel = selectors[chunk];
                if chunk != nb_chunks - 1 {
                    for _ in 0..c {
                        p.double_in_place();
                    }
                }

                let mut bits = (scalar[sel.index] & sel.mask) >> sel.shift;
                if sel.multi_word {
                    bits += (scalar[sel.index + 1] & sel.mask_high) << sel.shift_high;
                }
                if bits == 0 {
                    continue;
                }

                if bits & msb_window == 0 {
                    p += &base_table_aff[(bits - 1) as usize];
                } else {
                    let t = -base_table_aff[(bits & !msb_window) as usize];
                    p += &t;
                }
            }
            p
        })
        .collect();

    let mut out = vec![G1Affine::INFINITY; scalars.len()];
    batch_jacobian_to_affine_g1(&results, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_infinity_conventions() {
        let inf = G1Jacobian::from(&G1Affine::INFINITY);
        assert!(inf.z.is_zero());
        assert_eq!(inf.x, Fq::ONE);
        assert_eq!(inf.y, Fq::ONE);
        assert_eq!(G1Affine::from(&inf), G1Affine::INFINITY);
        assert!(inf.is_on_curve());
    }

    #[test]
    fn test_identity_laws() {
        let g = G1Jacobian::GENERATOR;
        let mut p = G1Jacobian::INFINITY;
        p += &g;
        assert_eq!(p, g);

        let mut p = g;
        p += &G1Jacobian::INFINITY;
        assert_eq!(p, g);

        let mut p = g;
        p -= &g;
        assert!(p.is_infinity());
    }

    #[test]
    fn test_coincident_addition_doubles() {
        let g = G1Jacobian::GENERATOR;
        let mut sum = g;
        sum += &g;
        assert_eq!(sum, g.double());

        // same point under a different scale
        let mut scaled = g;
        let s = MontFp!("5");
        let s2: Fq = s * s;
        scaled.x *= s2;
        scaled.y *= s2 * s;
        scaled.z *= s;
        let mut sum = g;
        sum += &scaled;
        assert_eq!(sum, g.double());
    }

    #[test]
    fn test_mixed_addition_matches_full() {
        let g = G1Jacobian::GENERATOR;
        let two = g.double();
        let three_full = two + g;

        let mut three_mixed = two;
        three_mixed += &G1Affine::GENERATOR;
        assert_eq!(three_mixed, three_full);
    }

    #[test]
    fn test_projective_conversion() {
        let p = G1Jacobian::GENERATOR.double();
        let proj = G1Projective::from(&p);
        let aff = G1Affine::from(&p);
        let zi = proj.z.inverse().unwrap();
        assert_eq!(proj.x * zi, aff.x);
        assert_eq!(proj.y * zi, aff.y);
    }
}
