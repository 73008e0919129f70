//! Optimal-ate pairing e: G1 × G2 → Fq12.
//!
//! The Miller loop walks the fixed signed-binary expansion of 6x₀+2,
//! accumulating line-function evaluations into a running Fq12 value, then
//! applies the two twist-Frobenius correction lines. Line computation is
//! pipelined: a producer thread walks the loop counter and ships each
//! evaluation by value through a bounded channel, while the consumer folds
//! them into the accumulator strictly in emission order. Ordering is the
//! correctness invariant; the channel capacity only bounds how far the
//! producer may run ahead.
//!
//! The final exponentiation raises a Miller-loop output to (p¹²-1)/r in two
//! stages: the cheap (p⁶-1)(p²+1) part, then the hard part via the
//! addition chain of Devegili, Scott and Dahab (eprint 2008/490). Feeding
//! it several Miller-loop outputs multiplies them first, so an n-pairing
//! costs n Miller loops and one exponentiation.

use std::thread;

use ark_bn254::{Fq2, Fq12};
use ark_ff::{AdditiveGroup, CyclotomicMultSubgroup, Field};
use crossbeam::channel::{self, Receiver, Sender};

use crate::curve::{LOOP_COUNTER, TWIST_FROB2_X, TWIST_FROB2_Y, TWIST_FROB_X, TWIST_FROB_Y};
use crate::g1::G1Affine;
use crate::g2::{G2Affine, G2Jacobian, G2Projective};
use crate::tower::{conjugate, expt, mul_by_v, mul_by_v2w, mul_by_vw};

/// Target group of the pairing, the order-r subgroup of Fq12*.
pub type Gt = Fq12;

/// Coefficients of the line through two twist points, evaluated at a G1
/// point, in the sparse shape the accumulator consumes.
#[derive(Copy, Clone, Debug)]
struct LineEvaluation {
    r0: Fq2,
    r1: Fq2,
    r2: Fq2,
}

/// How far the line producer may run ahead of the accumulator. Purely a
/// throughput knob: capacity 1 would still be correct, just serialized.
const LINE_QUEUE_CAPACITY: usize = 30;

fn conj(x: &Fq2) -> Fq2 {
    Fq2::new(x.c0, -x.c1)
}

/// Evaluation at `p` of the line through `q` and `r` on the twist.
///
/// Both points pass through projective coordinates; the three cross
/// products are the line coefficients, and the two that multiply the
/// variables pick up p's coordinates.
fn line_eval(q: &G2Jacobian, r: &G2Jacobian, p: &G1Affine) -> LineEvaluation {
    let q = G2Projective::from(q);
    let r = G2Projective::from(r);

    let mut r1 = q.y * r.z - q.z * r.y;
    let mut r0 = q.z * r.x - q.x * r.z;
    let r2 = q.x * r.y - q.y * r.x;

    r1.mul_assign_by_fp(&p.x);
    r0.mul_assign_by_fp(&p.y);

    LineEvaluation { r0, r1, r2 }
}

/// f ← f · (r0·v + r1·vw + r2·v²w), using the three sparse products.
fn mul_by_line(f: &mut Fq12, l: &LineEvaluation) {
    let a = mul_by_vw(f, &l.r1);
    let b = mul_by_v(f, &l.r0);
    let c = mul_by_v2w(f, &l.r2);
    *f = a + b + c;
}

/// Producer side of the Miller loop: walks the loop counter, emitting one
/// doubling line per digit and one addition line per nonzero digit, then
/// the two twist-Frobenius correction lines, in exactly the order the
/// accumulator will fold them. A send failure means the consumer is gone;
/// there is nothing left to do then.
fn emit_lines(q: G2Affine, p: G1Affine, lines: Sender<LineEvaluation>) {
    let q_start = G2Jacobian::from(&q);
    let q_neg = -q_start;
    let mut acc = q_start;

    for i in (0..=LOOP_COUNTER.len() - 2).rev() {
        // the tangent at a point also passes through minus its double, so
        // the doubling step reuses the generic two-point line
        let prev = acc;
        acc.double_in_place();
        acc.y = -acc.y;
        let line = line_eval(&prev, &acc, &p);
        acc.y = -acc.y;
        if lines.send(line).is_err() {
            return;
        }

        if LOOP_COUNTER[i] == 1 {
            let line = line_eval(&acc, &q_start, &p);
            acc += &q_start;
            if lines.send(line).is_err() {
                return;
            }
        } else if LOOP_COUNTER[i] == -1 {
            let line = line_eval(&acc, &q_neg, &p);
            acc += &q_neg;
            if lines.send(line).is_err() {
                return;
            }
        }
    }

    // correction lines through π(Q) and -π²(Q), cf. eprint 2010/354
    let q1 = G2Jacobian {
        x: conj(&q.x) * TWIST_FROB_X,
        y: conj(&q.y) * TWIST_FROB_Y,
        z: Fq2::ONE,
    };
    let q2 = G2Jacobian {
        x: q.x * TWIST_FROB2_X,
        y: -(q.y * TWIST_FROB2_Y),
        z: Fq2::ONE,
    };

    let line = line_eval(&acc, &q1, &p);
    if lines.send(line).is_err() {
        return;
    }
    acc += &q1;
    let _ = lines.send(line_eval(&acc, &q2, &p));
}

fn next_line(lines: &Receiver<LineEvaluation>) -> LineEvaluation {
    // the producer only hangs up after the last correction line
    lines.recv().expect("line producer terminated early")
}

/// Miller loop of the optimal-ate pairing. Returns one (the Gt identity)
/// if either input is the point at infinity. The output still needs
/// [`final_exponentiation`] to land in the order-r subgroup.
pub fn miller_loop(p: &G1Affine, q: &G2Affine) -> Gt {
    if p.is_infinity() || q.is_infinity() {
        return Fq12::ONE;
    }

    let (p, q) = (*p, *q);
    thread::scope(|s| {
        let (tx, rx) = channel::bounded(LINE_QUEUE_CAPACITY);
        s.spawn(move || emit_lines(q, p, tx));

        let mut f = Fq12::ONE;
        for i in (0..=LOOP_COUNTER.len() - 2).rev() {
            f.square_in_place();
            mul_by_line(&mut f, &next_line(&rx));
            if LOOP_COUNTER[i] != 0 {
                mul_by_line(&mut f, &next_line(&rx));
            }
        }

        mul_by_line(&mut f, &next_line(&rx));
        mul_by_line(&mut f, &next_line(&rx));
        f
    })
}

/// Raises a Miller-loop output to (p⁶-1)(p²+1)(p⁴-p²+1)/r. Extra operands
/// are multiplied in first, so a multi-pairing pays for a single
/// exponentiation.
pub fn final_exponentiation(z: &Gt, extra: &[Gt]) -> Gt {
    let mut m = *z;
    for e in extra {
        m *= e;
    }

    // easy part: m^((p⁶-1)(p²+1))
    let mut t = conjugate(&m);
    t *= m.inverse().unwrap_or(Fq12::ZERO);
    let mut m0 = t.frobenius_map(2);
    m0 *= t;

    // hard part, addition chain from eprint 2008/490
    let m1 = expt(&m0);
    let m2 = expt(&m1);
    let m3 = expt(&m2);

    let y1 = conjugate(&m0);
    let mut y4 = m1;
    let y5 = conjugate(&m2);
    let mut y6 = m3;

    let f0 = m0.frobenius_map(1);
    let f1 = m1.frobenius_map(1);
    let f2 = m2.frobenius_map(1);
    let f3 = m3.frobenius_map(1);

    let mut y0 = f0;
    let y3 = conjugate(&f1);
    y4 = conjugate(&(y4 * f2));
    y6 = conjugate(&(y6 * f3));

    let f0 = f0.frobenius_map(1);
    let f2 = f2.frobenius_map(1);
    y0 *= f0;
    let y2 = f2;
    let f0 = f0.frobenius_map(1);
    y0 *= f0;

    let mut t0 = y6.cyclotomic_square();
    t0 *= y4;
    t0 *= y5;
    let mut t1 = y3 * y5;
    t1 *= t0;
    t0 *= y2;
    t1 = t1.cyclotomic_square();
    t1 *= t0;
    t1 = t1.cyclotomic_square();
    t0 = t1 * y1;
    t1 *= y0;
    t0 = t0.cyclotomic_square();
    t0 * t1
}

/// The full reduced pairing e(P, Q).
pub fn pairing(p: &G1Affine, q: &G2Affine) -> Gt {
    final_exponentiation(&miller_loop(p, q), &[])
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;

    #[test]
    fn test_infinity_short_circuits() {
        assert_eq!(miller_loop(&G1Affine::INFINITY, &G2Affine::GENERATOR), Fq12::ONE);
        assert_eq!(miller_loop(&G1Affine::GENERATOR, &G2Affine::INFINITY), Fq12::ONE);
    }

    #[test]
    fn test_final_exponentiation_fixes_one() {
        assert_eq!(final_exponentiation(&Fq12::ONE, &[]), Fq12::ONE);
        assert_eq!(final_exponentiation(&Fq12::ONE, &[Fq12::ONE]), Fq12::ONE);
    }
}
