//! G2: points on the sextic twist y² = x³ + b/ξ over Fq2.
//!
//! Only what the pairing needs: affine and Jacobian representations with
//! the same group law as G1 (coordinates in Fq2), a projective intermediate
//! for line evaluation, and a windowed scalar multiplication for producing
//! test inputs. The twist has a nontrivial cofactor, so unlike G1 there is
//! no curve-check shortcut for subgroup membership here.

use std::ops::{AddAssign, Neg};

use ark_bn254::Fq2;
use ark_ff::{AdditiveGroup, Field, MontFp, Zero};
use num_bigint::BigUint;

use crate::curve::B_G2;

/// Twist point in affine coordinates; (0, 0) is the identity.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct G2Affine {
    pub x: Fq2,
    pub y: Fq2,
}

/// Twist point in Jacobian coordinates.
#[derive(Copy, Clone, Debug)]
pub struct G2Jacobian {
    pub x: Fq2,
    pub y: Fq2,
    pub z: Fq2,
}

/// Twist point in homogeneous projective coordinates, the shape consumed by
/// line evaluation.
#[derive(Copy, Clone, Debug)]
pub(crate) struct G2Projective {
    pub x: Fq2,
    pub y: Fq2,
    pub z: Fq2,
}

impl G2Affine {
    pub const INFINITY: G2Affine = G2Affine {
        x: Fq2::ZERO,
        y: Fq2::ZERO,
    };

    pub const GENERATOR: G2Affine = G2Affine {
        x: Fq2::new(
            MontFp!("10857046999023057135944570762232829481370756359578518086990519993285655852781"),
            MontFp!("11559732032986387107991004021392285783925812861821192530917403151452391805634"),
        ),
        y: Fq2::new(
            MontFp!("8495653923123431417604973247489272438418190587263600148770280649306958101930"),
            MontFp!("4082367875863433681332203403145435568316851327593401208105741076214120093531"),
        ),
    };

    pub fn is_infinity(&self) -> bool {
        self.x.is_zero() && self.y.is_zero()
    }

    pub fn is_on_curve(&self) -> bool {
        G2Jacobian::from(self).is_on_curve()
    }

    pub fn scalar_multiplication(&self, s: &BigUint) -> G2Affine {
        G2Affine::from(&G2Jacobian::from(self).mul_windowed(s))
    }
}

impl Neg for G2Affine {
    type Output = G2Affine;

    fn neg(mut self) -> G2Affine {
        self.y = -self.y;
        self
    }
}

impl From<&G2Jacobian> for G2Affine {
    fn from(p: &G2Jacobian) -> G2Affine {
        if p.z.is_zero() {
            return G2Affine::INFINITY;
        }
        let a = p.z.inverse().unwrap_or(Fq2::ZERO);
        let b = a.square();
        G2Affine {
            x: p.x * b,
            y: p.y * b * a,
        }
    }
}

impl G2Jacobian {
    pub const INFINITY: G2Jacobian = G2Jacobian {
        x: Fq2::ONE,
        y: Fq2::ONE,
        z: Fq2::ZERO,
    };

    pub fn is_infinity(&self) -> bool {
        self.z.is_zero()
    }

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

    pub fn double(&self) -> G2Jacobian {
        let mut p = *self;
        p.double_in_place();
        p
    }

    pub fn is_on_curve(&self) -> bool {
        let left = self.y.square();
        let mut tmp = self.z.square();
        tmp.square_in_place();
        tmp *= self.z;
        tmp *= self.z;
        let right = self.x.square() * self.x + tmp * B_G2;
        left == right
    }

    /// 2-bit-windowed multiplication; the twist carries no GLV fast path in
    /// this crate.
    pub fn mul_windowed(&self, s: &BigUint) -> G2Jacobian {
        let mut res = G2Jacobian::INFINITY;
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
}

impl AddAssign<&G2Jacobian> for G2Jacobian {
    fn add_assign(&mut self, a: &G2Jacobian) {
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

impl std::ops::Add for G2Jacobian {
    type Output = G2Jacobian;

    fn add(mut self, rhs: G2Jacobian) -> G2Jacobian {
        self += &rhs;
        self
    }
}

impl Neg for G2Jacobian {
    type Output = G2Jacobian;

    fn neg(mut self) -> G2Jacobian {
        self.y = -self.y;
        self
    }
}

impl PartialEq for G2Jacobian {
    fn eq(&self, other: &G2Jacobian) -> bool {
        if self.z.is_zero() && other.z.is_zero() {
            return true;
        }
        G2Affine::from(self) == G2Affine::from(other)
    }
}

impl Eq for G2Jacobian {}

impl From<&G2Affine> for G2Jacobian {
    fn from(q: &G2Affine) -> G2Jacobian {
        if q.is_infinity() {
            return G2Jacobian::INFINITY;
        }
        G2Jacobian {
            x: q.x,
            y: q.y,
            z: Fq2::ONE,
        }
    }
}

impl From<&G2Jacobian> for G2Projective {
    fn from(q: &G2Jacobian) -> G2Projective {
        let buf = q.z.square();
        G2Projective {
            x: q.x * q.z,
            y: q.y,
            z: q.z * buf,
        }
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_generator_on_curve() {
        assert!(G2Affine::GENERATOR.is_on_curve());
        assert!(G2Jacobian::INFINITY.is_on_curve());
    }

    #[test]
    fn test_windowed_small_multiples() {
        let g = G2Jacobian::from(&G2Affine::GENERATOR);
        let five = g.mul_windowed(&BigUint::from(5u32));
        let mut acc = G2Jacobian::INFINITY;
        for _ in 0..5 {
            acc += &g;
        }
        assert_eq!(five, acc);
    }
}
