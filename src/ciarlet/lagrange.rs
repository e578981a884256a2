//! Lagrange elements

use crate::ciarlet::CiarletElement;
use crate::dual_set::{DualSet, EntityFunctionals};
use crate::error::ElementError;
use crate::functionals::Functional;
use crate::polynomial_set::PolynomialSet;
use crate::reference_cell;
use crate::traits::ElementFamily;
use crate::types::{Continuity, Family, ReferenceCellType};
use rlst::{MatrixInverse, RlstScalar};
use std::marker::PhantomData;

/// Create a Lagrange element
///
/// The DOFs are point evaluations at equally spaced points. They are numbered by sub-entity:
/// vertices, then the interiors of the edges, faces and cell.
pub fn create<T: RlstScalar + MatrixInverse>(
    cell_type: ReferenceCellType,
    degree: usize,
    continuity: Continuity,
) -> Result<CiarletElement<T>, ElementError> {
    let tdim = reference_cell::dim(cell_type);
    let entity_counts = reference_cell::entity_counts(cell_type);
    let mut functionals: EntityFunctionals<T> = [vec![], vec![], vec![], vec![]];
    if degree == 0 {
        if continuity == Continuity::Continuous {
            return Err(ElementError::UnsupportedDegree {
                family: Family::Lagrange,
                degree,
                reason: "a degree 0 Lagrange element must be discontinuous",
            });
        }
        for (d, count) in entity_counts.iter().enumerate().take(tdim) {
            functionals[d] = vec![vec![]; *count];
        }
        let midpoint = reference_cell::midpoint::<T::Real>(cell_type);
        functionals[tdim].push(vec![Functional::point_evaluation(
            cell_type, 0, &midpoint,
        )?]);
    } else {
        for (d, count) in entity_counts.iter().enumerate() {
            for e in 0..*count {
                functionals[d].push(
                    reference_cell::entity_lattice_points::<T::Real>(cell_type, d, e, degree)?
                        .iter()
                        .map(|p| Functional::point_evaluation(cell_type, degree, p))
                        .collect::<Result<Vec<_>, _>>()?,
                );
            }
        }
    }

    CiarletElement::create(
        Family::Lagrange,
        degree,
        PolynomialSet::orthonormal(cell_type, degree),
        DualSet::new(cell_type, functionals)?,
        continuity,
    )
}

/// Lagrange element family
pub struct LagrangeElementFamily<T: RlstScalar + MatrixInverse> {
    degree: usize,
    continuity: Continuity,
    _t: PhantomData<T>,
}

impl<T: RlstScalar + MatrixInverse> LagrangeElementFamily<T> {
    /// Create new family
    pub fn new(degree: usize, continuity: Continuity) -> Self {
        Self {
            degree,
            continuity,
            _t: PhantomData,
        }
    }
}

impl<T: RlstScalar + MatrixInverse> ElementFamily for LagrangeElementFamily<T> {
    type T = T;
    type FiniteElement = CiarletElement<T>;
    fn element(&self, cell_type: ReferenceCellType) -> Result<CiarletElement<T>, ElementError> {
        create::<T>(cell_type, self.degree, self.continuity)
    }
}
