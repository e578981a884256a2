//! Gauss-Lobatto-Legendre quadrature
use super::gauss_jacobi::{jacobi_polynomial, newton_roots};
use super::types::QuadratureRule;
use crate::error::ElementError;
use std::f64::consts::PI;

/// The m-point Gauss-Lobatto-Legendre rule on the interval \[0, 1\]
///
/// The points are the endpoints and the roots of the derivative of the Legendre polynomial of
/// degree m - 1, in increasing order. The rule integrates polynomials of degree 2m - 3 exactly.
pub fn gauss_lobatto_legendre_rule(m: usize) -> Result<QuadratureRule, ElementError> {
    if m < 2 {
        return Err(ElementError::InvalidQuadrature {
            reason: "a Gauss-Lobatto-Legendre rule needs at least two points",
        });
    }
    let n = m - 1;
    let nf = n as f64;

    // Roots of P_n', using P_n'' from Legendre's equation
    let interior = newton_roots(
        |x| {
            let (p, d) = jacobi_polynomial(0.0, n, x);
            (d, (2.0 * x * d - nf * (nf + 1.0) * p) / (1.0 - x * x))
        },
        |k| -f64::cos((k + 1) as f64 * PI / nf),
        n - 1,
    );

    let mut points = vec![-1.0];
    points.extend(interior);
    points.push(1.0);
    let weights = points
        .iter()
        .map(|x| {
            let (p, _) = jacobi_polynomial(0.0, n, *x);
            1.0 / (nf * (nf + 1.0) * p * p)
        })
        .collect();

    Ok(QuadratureRule {
        dim: 1,
        degree: 2 * m - 3,
        npoints: m,
        weights,
        points: points.iter().map(|x| 0.5 * (1.0 + x)).collect(),
    })
}
