//! Gauss-Jacobi quadrature
use super::types::QuadratureRule;
use crate::error::ElementError;
use crate::reference_cell;
use crate::types::ReferenceCellType;
use itertools::izip;
use log::debug;
use std::f64::consts::PI;

const NEWTON_TOLERANCE: f64 = 1e-14;
const NEWTON_MAX_ITERATIONS: usize = 100;

/// Evaluate the Jacobi polynomial P_n^(a, 0) and its derivative at a point in \[-1, 1\]
pub(crate) fn jacobi_polynomial(a: f64, n: usize, x: f64) -> (f64, f64) {
    if n == 0 {
        return (1.0, 0.0);
    }
    let mut p0 = 1.0;
    let mut d0 = 0.0;
    let mut p1 = ((a + 2.0) * x + a) / 2.0;
    let mut d1 = (a + 2.0) / 2.0;
    for k in 2..n + 1 {
        let k = k as f64;
        let c0 = 2.0 * k * (k + a) * (2.0 * k + a - 2.0);
        let c1 = (2.0 * k + a - 1.0) * (2.0 * k + a) * (2.0 * k + a - 2.0);
        let c2 = (2.0 * k + a - 1.0) * a * a;
        let c3 = 2.0 * (k + a - 1.0) * (k - 1.0) * (2.0 * k + a);
        let p2 = ((c1 * x + c2) * p1 - c3 * p0) / c0;
        let d2 = ((c1 * x + c2) * d1 + c1 * p1 - c3 * d0) / c0;
        (p0, d0, p1, d1) = (p1, d1, p2, d2);
    }
    (p1, d1)
}

/// Find the roots of a function on \[-1, 1\] by Newton's method with deflation
///
/// `f` returns the value and derivative of the function. `guess` gives the starting point of
/// each root, in increasing order.
pub(crate) fn newton_roots(
    f: impl Fn(f64) -> (f64, f64),
    guess: impl Fn(usize) -> f64,
    nroots: usize,
) -> Vec<f64> {
    let mut x = vec![0.0; nroots];
    for k in 0..nroots {
        x[k] = guess(k);
        if k > 0 {
            x[k] = 0.5 * (x[k] + x[k - 1]);
        }
        for _ in 0..NEWTON_MAX_ITERATIONS {
            let xk = x[k];
            let s = x[..k].iter().map(|xi| 1.0 / (xk - xi)).sum::<f64>();
            let (value, derivative) = f(xk);
            let delta = value / (derivative - value * s);
            x[k] -= delta;
            if delta.abs() < NEWTON_TOLERANCE {
                break;
            }
        }
    }
    x
}

/// Points and weights of the m-point Gauss-Jacobi rule with weight (1 - x)^a on \[-1, 1\]
fn gauss_jacobi(a: f64, m: usize) -> (Vec<f64>, Vec<f64>) {
    let points = newton_roots(
        |x| jacobi_polynomial(a, m, x),
        |k| -f64::cos((2 * k + 1) as f64 * PI / (2 * m) as f64),
        m,
    );
    let weights = points
        .iter()
        .map(|x| {
            let (_, d) = jacobi_polynomial(a, m, *x);
            2f64.powf(a + 1.0) / ((1.0 - x * x) * d * d)
        })
        .collect();
    (points, weights)
}

/// The m-point Gauss-Legendre rule on \[0, 1\]
fn gauss_legendre_interval(m: usize) -> (Vec<f64>, Vec<f64>) {
    let (points, weights) = gauss_jacobi(0.0, m);
    (
        points.iter().map(|x| 0.5 * (1.0 + x)).collect(),
        weights.iter().map(|w| 0.5 * w).collect(),
    )
}

/// A Gauss-Jacobi rule using `m` points in each direction
///
/// The rule integrates polynomials of degree 2m - 1 exactly. On simplices, it is a collapsed
/// (Duffy) product rule.
pub fn gauss_jacobi_rule(
    cell: ReferenceCellType,
    m: usize,
) -> Result<QuadratureRule, ElementError> {
    if m == 0 {
        return Err(ElementError::InvalidQuadrature {
            reason: "a rule needs at least one point",
        });
    }
    let mut points = vec![];
    let mut weights = vec![];
    match cell {
        ReferenceCellType::Interval => {
            (points, weights) = gauss_legendre_interval(m);
        }
        ReferenceCellType::Quadrilateral => {
            let (pts, wts) = gauss_legendre_interval(m);
            for (p0, w0) in izip!(&pts, &wts) {
                for (p1, w1) in izip!(&pts, &wts) {
                    points.extend_from_slice(&[*p0, *p1]);
                    weights.push(w0 * w1);
                }
            }
        }
        ReferenceCellType::Hexahedron => {
            let (pts, wts) = gauss_legendre_interval(m);
            for (p0, w0) in izip!(&pts, &wts) {
                for (p1, w1) in izip!(&pts, &wts) {
                    for (p2, w2) in izip!(&pts, &wts) {
                        points.extend_from_slice(&[*p0, *p1, *p2]);
                        weights.push(w0 * w1 * w2);
                    }
                }
            }
        }
        ReferenceCellType::Triangle => {
            let (pts0, wts0) = gauss_jacobi(0.0, m);
            let (pts1, wts1) = gauss_jacobi(1.0, m);
            for (p0, w0) in izip!(&pts0, &wts0) {
                for (p1, w1) in izip!(&pts1, &wts1) {
                    points.extend_from_slice(&[0.25 * (1.0 + p0) * (1.0 - p1), 0.5 * (1.0 + p1)]);
                    weights.push(w0 * w1 * 0.125);
                }
            }
        }
        ReferenceCellType::Tetrahedron => {
            let (pts0, wts0) = gauss_jacobi(0.0, m);
            let (pts1, wts1) = gauss_jacobi(1.0, m);
            let (pts2, wts2) = gauss_jacobi(2.0, m);
            for (p0, w0) in izip!(&pts0, &wts0) {
                for (p1, w1) in izip!(&pts1, &wts1) {
                    for (p2, w2) in izip!(&pts2, &wts2) {
                        points.extend_from_slice(&[
                            0.125 * (1.0 + p0) * (1.0 - p1) * (1.0 - p2),
                            0.25 * (1.0 + p1) * (1.0 - p2),
                            0.5 * (1.0 + p2),
                        ]);
                        weights.push(w0 * w1 * w2 * 0.015625);
                    }
                }
            }
        }
        ReferenceCellType::Point => {
            return Err(ElementError::UnsupportedCell {
                context: "Gauss-Jacobi quadrature",
                cell,
            });
        }
    }
    let dim = reference_cell::dim(cell);
    debug!("Created {}-point Gauss-Jacobi rule on a {cell:?}", weights.len());
    Ok(QuadratureRule {
        dim,
        degree: 2 * m - 1,
        npoints: weights.len(),
        weights,
        points,
    })
}

/// A quadrature rule that integrates polynomials of the given degree exactly
pub fn make_quadrature(
    cell: ReferenceCellType,
    degree: usize,
) -> Result<QuadratureRule, ElementError> {
    gauss_jacobi_rule(cell, degree / 2 + 1)
}
