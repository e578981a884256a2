//! Lagrange elements on an interval with nodes at Gauss-Lobatto-Legendre points

use crate::ciarlet::CiarletElement;
use crate::dual_set::DualSet;
use crate::error::ElementError;
use crate::functionals::Functional;
use crate::polynomial_set::PolynomialSet;
use crate::quadrature::gauss_lobatto_legendre_rule;
use crate::types::{Continuity, Family, ReferenceCellType};
use rlst::{MatrixInverse, RlstScalar};

/// Create a Gauss-Lobatto-Legendre element
///
/// DOF 0 is at the vertex x = 0 and DOF 1 at x = 1; the remaining DOFs are at the interior
/// Gauss-Lobatto-Legendre points in increasing order.
pub fn create<T: RlstScalar + MatrixInverse>(
    cell_type: ReferenceCellType,
    degree: usize,
    continuity: Continuity,
) -> Result<CiarletElement<T>, ElementError> {
    if cell_type != ReferenceCellType::Interval {
        return Err(ElementError::UnsupportedCell {
            context: "Gauss-Lobatto-Legendre element",
            cell: cell_type,
        });
    }
    if degree == 0 {
        return Err(ElementError::UnsupportedDegree {
            family: Family::GaussLobattoLegendre,
            degree,
            reason: "the nodes include both vertices",
        });
    }
    let rule = gauss_lobatto_legendre_rule(degree + 1)?;
    let node = |i: usize| {
        Functional::point_evaluation(
            cell_type,
            degree,
            &[num::cast::<f64, T::Real>(rule.points[i]).unwrap()],
        )
    };
    let functionals = [
        vec![vec![node(0)?], vec![node(degree)?]],
        vec![(1..degree).map(node).collect::<Result<Vec<_>, _>>()?],
        vec![],
        vec![],
    ];

    CiarletElement::create(
        Family::GaussLobattoLegendre,
        degree,
        PolynomialSet::orthonormal(cell_type, degree),
        DualSet::new(cell_type, functionals)?,
        continuity,
    )
}
