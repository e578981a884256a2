//! Trait definitions

use crate::error::ElementError;
use crate::polynomials::derivative_count;
use crate::types::{Continuity, ReferenceCellType};
use rlst::{RandomAccessByRef, RandomAccessMut, RlstScalar, Shape};

/// A finite element defined on a reference cell
pub trait FiniteElement {
    /// The scalar type
    type T: RlstScalar;

    /// The reference cell type
    fn cell_type(&self) -> ReferenceCellType;

    /// The smallest degree n such that the highest degree polynomial in this element is
    /// contained in a Lagrange (or vector Lagrange) element of degree n
    fn embedded_superdegree(&self) -> usize;

    /// The highest total degree of any polynomial in the element's span
    fn highest_degree(&self) -> usize;

    /// The number of basis functions
    fn dim(&self) -> usize;

    /// The value shape
    fn value_shape(&self) -> &[usize];

    /// The value size
    fn value_size(&self) -> usize;

    /// The continuity of the element between cells
    fn continuity(&self) -> Continuity;

    /// Tabulate the values of the basis functions and their derivatives at a set of points
    ///
    /// Entry \[d, p, b, c\] of `data` is derivative d of component c of basis function b at
    /// point p. Derivatives are ordered by total order, then as in
    /// [crate::polynomials::multi_indices].
    fn tabulate<
        Array2: RandomAccessByRef<2, Item = <Self::T as RlstScalar>::Real> + Shape<2>,
        Array4Mut: RandomAccessMut<4, Item = Self::T> + Shape<4>,
    >(
        &self,
        points: &Array2,
        nderivs: usize,
        data: &mut Array4Mut,
    ) -> Result<(), ElementError>;

    /// The DOFs that are associated with a subentity of the reference cell
    fn entity_dofs(&self, entity_dim: usize, entity_number: usize) -> Option<&[usize]>;

    /// The DOFs that are associated with a subentity of the reference cell or any of its
    /// sub-entities
    fn entity_closure_dofs(&self, entity_dim: usize, entity_number: usize) -> Option<&[usize]>;

    /// Get the required shape for a tabulation array
    fn tabulate_array_shape(&self, nderivs: usize, npoints: usize) -> [usize; 4] {
        [
            derivative_count(self.cell_type(), nderivs),
            npoints,
            self.dim(),
            self.value_size(),
        ]
    }
}

/// A family of finite elements
pub trait ElementFamily {
    /// The scalar type
    type T: RlstScalar;
    /// The finite element type
    type FiniteElement: FiniteElement<T = Self::T> + 'static;

    /// Get an element on the given cell
    fn element(&self, cell_type: ReferenceCellType) -> Result<Self::FiniteElement, ElementError>;
}
