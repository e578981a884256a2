//! Ciarlet finite elements
//!
//! A Ciarlet element is defined by a polynomial set and a dual set of the same dimension. Its
//! basis is the set of functions in the span of the polynomial set that are dual to the
//! functionals: functional j applied to basis function i is 1 if i = j and 0 otherwise.

use crate::dual_set::DualSet;
use crate::error::ElementError;
use crate::options::CiarletOptions;
use crate::polynomial_set::PolynomialSet;
use crate::polynomials::{highest_degree, multi_indices};
use crate::reference_cell;
use crate::traits::FiniteElement;
use crate::types::{Continuity, Family, MultiIndex, ReferenceCellType};
use log::{debug, warn};
use rlst::{
    rlst_dynamic_array2, rlst_dynamic_array3, DynamicArray, MatrixInverse, RandomAccessByRef,
    RandomAccessMut, RlstScalar, Shape,
};
use std::cmp::Ordering;
use std::collections::HashMap;

pub mod bubble;
pub mod enriched;
pub mod gauss_lobatto_legendre;
pub mod lagrange;
pub mod legendre;
pub mod tensor_product;
pub use lagrange::LagrangeElementFamily;

/// Tabulated derivatives of the basis functions
///
/// Each array has shape \[dim, value_size, npoints\] and holds the partial derivative given by
/// its key.
pub type Tabulation<T> = HashMap<MultiIndex, DynamicArray<T, 3>>;

/// A Ciarlet element
pub struct CiarletElement<T: RlstScalar> {
    family: Family,
    cell_type: ReferenceCellType,
    degree: usize,
    embedded_superdegree: usize,
    highest_degree: usize,
    value_shape: Vec<usize>,
    value_size: usize,
    continuity: Continuity,
    dim: usize,
    polynomial_set: PolynomialSet<T>,
    dual_set: DualSet<T>,
    nodal_basis: PolynomialSet<T>,
    solve_residual: T::Real,
    parent_dofs: Option<Vec<usize>>,
    options: CiarletOptions,
}

impl<T: RlstScalar + MatrixInverse> CiarletElement<T> {
    /// Create a Ciarlet element
    pub fn create(
        family: Family,
        degree: usize,
        polynomial_set: PolynomialSet<T>,
        dual_set: DualSet<T>,
        continuity: Continuity,
    ) -> Result<Self, ElementError> {
        Self::create_with_options(
            family,
            degree,
            polynomial_set,
            dual_set,
            continuity,
            &CiarletOptions::default(),
        )
    }

    /// Create a Ciarlet element with non-default options
    pub fn create_with_options(
        family: Family,
        degree: usize,
        polynomial_set: PolynomialSet<T>,
        dual_set: DualSet<T>,
        continuity: Continuity,
        options: &CiarletOptions,
    ) -> Result<Self, ElementError> {
        let cell_type = polynomial_set.cell_type();
        if dual_set.cell_type() != cell_type {
            return Err(ElementError::Incompatible {
                reason: "the polynomial set and dual set are defined on different cells",
            });
        }
        if dual_set.value_size() != polynomial_set.value_size() {
            return Err(ElementError::Incompatible {
                reason: "the polynomial set and dual set have different value sizes",
            });
        }
        let dim = polynomial_set.dim();
        if dual_set.dim() != dim {
            return Err(ElementError::DimensionMismatch {
                functionals: dual_set.dim(),
                space_dimension: dim,
            });
        }

        let embedded_superdegree = polynomial_set.degree();
        let expansion_degree = usize::max(polynomial_set.degree(), dual_set.degree());
        let span = polynomial_set.embed(expansion_degree)?;
        let dual_set = if continuity == Continuity::Discontinuous {
            dual_set.discontinuous()?
        } else {
            dual_set
        }
        .embed(expansion_degree)?;

        let singular = ElementError::SingularDualMatrix {
            family,
            cell: cell_type,
            degree,
        };

        // Compute the dual matrix
        let matrix = dual_set.dual_matrix(&span)?;
        let mut inverse = rlst_dynamic_array2!(T, [dim, dim]);
        for i in 0..dim {
            for j in 0..dim {
                *inverse.get_mut([i, j]).unwrap() = *matrix.get([i, j]).unwrap();
            }
        }
        inverse
            .view_mut()
            .into_inverse_alloc()
            .map_err(|_| singular.clone())?;

        let one = num::cast::<f64, T::Real>(1.0).unwrap();
        let mut solve_residual = num::cast::<f64, T::Real>(0.0).unwrap();
        for k in 0..dim {
            for j in 0..dim {
                let mut entry = if k == j {
                    T::from(-1.0).unwrap()
                } else {
                    T::from(0.0).unwrap()
                };
                for i in 0..dim {
                    entry += *inverse.get([k, i]).unwrap() * *matrix.get([i, j]).unwrap();
                }
                let entry = entry.abs();
                if entry.partial_cmp(&one) != Some(Ordering::Less) {
                    return Err(singular);
                }
                if entry > solve_residual {
                    solve_residual = entry;
                }
            }
        }
        if solve_residual > num::cast::<f64, T::Real>(options.conditioning_tolerance()).unwrap() {
            warn!(
                "Dual matrix of the degree {degree} {family:?} element on a {cell_type:?} is ill-conditioned (residual {:?})",
                solve_residual
            );
        }

        let value_size = span.value_size();
        let expansion_size = span.expansion_size();
        let mut coefficients = rlst_dynamic_array3!(T, [dim, value_size, expansion_size]);
        for k in 0..dim {
            for i in 0..dim {
                let c = *inverse.get([k, i]).unwrap();
                for j in 0..value_size {
                    for l in 0..expansion_size {
                        *coefficients.get_mut([k, j, l]).unwrap() += c * span.coefficient(i, j, l);
                    }
                }
            }
        }
        let nodal_basis = PolynomialSet::new(
            cell_type,
            expansion_degree,
            span.value_shape().to_vec(),
            coefficients,
        )?;

        debug!("Created degree {degree} {family:?} element on a {cell_type:?} with {dim} basis functions");
        Ok(Self {
            family,
            cell_type,
            degree,
            embedded_superdegree,
            highest_degree: highest_degree(cell_type, embedded_superdegree),
            value_shape: span.value_shape().to_vec(),
            value_size,
            continuity,
            dim,
            polynomial_set,
            dual_set,
            nodal_basis,
            solve_residual,
            parent_dofs: None,
            options: options.clone(),
        })
    }

    /// The element spanned by a subset of the basis functions
    ///
    /// The basis functions of the result are those listed in `indices`, in increasing order;
    /// [CiarletElement::parent_dofs] maps them back to this element's numbering.
    pub fn restrict(&self, indices: &[usize]) -> Result<Self, ElementError> {
        let mut kept = indices.to_vec();
        kept.sort();
        kept.dedup();
        let dual_set = self.dual_set.take_subset(&kept)?;
        let span = self.nodal_basis.take_subset(&kept)?;
        let mut element = Self::create_with_options(
            Family::Restricted,
            self.degree,
            span,
            dual_set,
            self.continuity,
            &self.options,
        )?;
        element.parent_dofs = Some(match &self.parent_dofs {
            Some(parent) => kept.iter().map(|i| parent[*i]).collect(),
            None => kept,
        });
        Ok(element)
    }

    /// The same element with every DOF associated with the interior of the cell
    pub fn discontinuous(&self) -> Result<Self, ElementError> {
        let mut element = Self::create_with_options(
            self.family,
            self.degree,
            self.polynomial_set.clone(),
            self.dual_set.clone(),
            Continuity::Discontinuous,
            &self.options,
        )?;
        element.parent_dofs = self.parent_dofs.clone();
        Ok(element)
    }
}

impl<T: RlstScalar> CiarletElement<T> {
    /// The polynomial degree
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// The element family
    pub fn family(&self) -> Family {
        self.family
    }

    /// The largest entry of `C V - I`, where V is the dual matrix and C its computed inverse
    pub fn solve_residual(&self) -> T::Real {
        self.solve_residual
    }

    /// The polynomial set the element was created from
    pub fn polynomial_set(&self) -> &PolynomialSet<T> {
        &self.polynomial_set
    }

    /// The dual set
    pub fn dual_set(&self) -> &DualSet<T> {
        &self.dual_set
    }

    /// The basis functions
    pub fn nodal_basis(&self) -> &PolynomialSet<T> {
        &self.nodal_basis
    }

    /// The coefficients of the basis functions in terms of the orthonormal expansion set
    pub fn coefficients(&self) -> &DynamicArray<T, 3> {
        self.nodal_basis.coefficients()
    }

    /// For a restricted element, the index in the original element of each basis function
    pub fn parent_dofs(&self) -> Option<&[usize]> {
        self.parent_dofs.as_deref()
    }

    /// Tabulate the basis functions and their partial derivatives up to a given order
    ///
    /// If `entity` is `Some((dim, index))`, the points are given in the coordinates of that
    /// sub-entity's reference entity and are mapped onto it first. Derivatives are always taken
    /// with respect to the coordinates of the cell.
    pub fn tabulate_entity<Array2: RandomAccessByRef<2, Item = T::Real> + Shape<2>>(
        &self,
        order: usize,
        points: &Array2,
        entity: Option<(usize, usize)>,
    ) -> Result<Tabulation<T>, ElementError> {
        let data = match entity {
            Some((entity_dim, entity_number)) => {
                let mapped =
                    reference_cell::entity_map(self.cell_type, entity_dim, entity_number, points)?;
                self.nodal_basis.tabulate(&mapped, order)?
            }
            None => self.nodal_basis.tabulate(points, order)?,
        };
        let npts = data.shape()[1];
        let tdim = reference_cell::dim(self.cell_type);
        Ok(multi_indices(tdim, order)
            .into_iter()
            .enumerate()
            .map(|(k, alpha)| {
                let mut table = rlst_dynamic_array3!(T, [self.dim, self.value_size, npts]);
                for b in 0..self.dim {
                    for j in 0..self.value_size {
                        for p in 0..npts {
                            *table.get_mut([b, j, p]).unwrap() = *data.get([k, p, b, j]).unwrap();
                        }
                    }
                }
                (alpha, table)
            })
            .collect())
    }
}

impl<T: RlstScalar> FiniteElement for CiarletElement<T> {
    type T = T;
    fn cell_type(&self) -> ReferenceCellType {
        self.cell_type
    }
    fn embedded_superdegree(&self) -> usize {
        self.embedded_superdegree
    }
    fn highest_degree(&self) -> usize {
        self.highest_degree
    }
    fn dim(&self) -> usize {
        self.dim
    }
    fn value_shape(&self) -> &[usize] {
        &self.value_shape
    }
    fn value_size(&self) -> usize {
        self.value_size
    }
    fn continuity(&self) -> Continuity {
        self.continuity
    }
    fn tabulate<
        Array2: RandomAccessByRef<2, Item = T::Real> + Shape<2>,
        Array4Mut: RandomAccessMut<4, Item = T> + Shape<4>,
    >(
        &self,
        points: &Array2,
        nderivs: usize,
        data: &mut Array4Mut,
    ) -> Result<(), ElementError> {
        self.nodal_basis.tabulate_into(points, nderivs, data)
    }
    fn entity_dofs(&self, entity_dim: usize, entity_number: usize) -> Option<&[usize]> {
        self.dual_set.entity_ids(entity_dim, entity_number)
    }
    fn entity_closure_dofs(&self, entity_dim: usize, entity_number: usize) -> Option<&[usize]> {
        self.dual_set.entity_closure_ids(entity_dim, entity_number)
    }
}
