//! Discontinuous elements whose DOFs are moments against orthonormal polynomials
//!
//! The basis functions of these elements are the orthonormal polynomials of the expansion set.

use crate::ciarlet::CiarletElement;
use crate::dual_set::{DualSet, EntityFunctionals};
use crate::error::ElementError;
use crate::functionals::Functional;
use crate::options::CiarletOptions;
use crate::polynomial_set::PolynomialSet;
use crate::quadrature::make_quadrature;
use crate::reference_cell;
use crate::types::{Continuity, Family, ReferenceCellType};
use rlst::{MatrixInverse, RandomAccessByRef, RlstScalar};

/// Create a Legendre element
pub fn create<T: RlstScalar + MatrixInverse>(
    cell_type: ReferenceCellType,
    degree: usize,
) -> Result<CiarletElement<T>, ElementError> {
    create_with_options(cell_type, degree, &CiarletOptions::default())
}

/// Create a Legendre element, using the quadrature degree set in `options` for the moments
pub fn create_with_options<T: RlstScalar + MatrixInverse>(
    cell_type: ReferenceCellType,
    degree: usize,
    options: &CiarletOptions,
) -> Result<CiarletElement<T>, ElementError> {
    let tdim = reference_cell::dim(cell_type);
    let rule = make_quadrature(cell_type, options.moment_quadrature_degree(degree))?;
    let span = PolynomialSet::<T>::orthonormal(cell_type, degree);
    let table = span.tabulate(&rule.points_array::<T>(), 0)?;

    let mut functionals: EntityFunctionals<T> = [vec![], vec![], vec![], vec![]];
    for (d, count) in reference_cell::entity_counts(cell_type)
        .iter()
        .enumerate()
        .take(tdim)
    {
        functionals[d] = vec![vec![]; *count];
    }
    functionals[tdim].push(
        (0..span.dim())
            .map(|i| {
                let weights = (0..rule.npoints)
                    .map(|p| *table.get([0, p, i, 0]).unwrap())
                    .collect::<Vec<_>>();
                Functional::integral_moment(cell_type, degree, 1, 0, &rule, &weights, degree)
            })
            .collect::<Result<Vec<_>, _>>()?,
    );

    CiarletElement::create_with_options(
        Family::Legendre,
        degree,
        span,
        DualSet::new(cell_type, functionals)?,
        Continuity::Discontinuous,
        options,
    )
}
