//! Polynomial sets
//!
//! A polynomial set is a list of (possibly vector-valued) polynomials on a reference cell,
//! each stored as coefficients of the orthonormal polynomials of the [crate::polynomials]
//! module.

use crate::error::ElementError;
use crate::polynomials::{
    derivative_count, embedding_indices, highest_degree, legendre_shape, polynomial_count,
    tabulate_legendre_polynomials,
};
use crate::reference_cell;
use crate::types::ReferenceCellType;
use rlst::{
    rlst_dynamic_array3, rlst_dynamic_array4, DynamicArray, RandomAccessByRef, RandomAccessMut,
    RlstScalar, Shape,
};

/// A set of polynomials on a reference cell
pub struct PolynomialSet<T: RlstScalar> {
    cell_type: ReferenceCellType,
    degree: usize,
    value_shape: Vec<usize>,
    value_size: usize,
    coefficients: DynamicArray<T, 3>,
}

impl<T: RlstScalar> PolynomialSet<T> {
    /// Create a polynomial set
    ///
    /// Entry \[i, j, k\] of `coefficients` is the coefficient of orthonormal polynomial k of
    /// degree `degree` in component j of member i.
    pub fn new(
        cell_type: ReferenceCellType,
        degree: usize,
        value_shape: Vec<usize>,
        coefficients: DynamicArray<T, 3>,
    ) -> Result<Self, ElementError> {
        let value_size = value_shape.iter().product::<usize>();
        let expansion_size = polynomial_count(cell_type, degree);
        let shape = coefficients.shape();
        if shape[1] != value_size || shape[2] != expansion_size {
            return Err(ElementError::ShapeMismatch {
                what: "Polynomial set coefficients",
                expected: vec![shape[0], value_size, expansion_size],
                found: shape.to_vec(),
            });
        }
        if shape[0] == 0 {
            return Err(ElementError::NoDegreesOfFreedom {
                context: "polynomial set",
                cell: cell_type,
                degree,
            });
        }
        Ok(Self {
            cell_type,
            degree,
            value_shape,
            value_size,
            coefficients,
        })
    }

    /// The full scalar expansion set of the given degree
    pub fn orthonormal(cell_type: ReferenceCellType, degree: usize) -> Self {
        Self::orthonormal_vector(cell_type, degree, vec![])
    }

    /// Each component of the given value shape taken from the expansion set of the given degree
    pub fn orthonormal_vector(
        cell_type: ReferenceCellType,
        degree: usize,
        value_shape: Vec<usize>,
    ) -> Self {
        let value_size = value_shape.iter().product::<usize>();
        let expansion_size = polynomial_count(cell_type, degree);
        let mut coefficients =
            rlst_dynamic_array3!(T, [value_size * expansion_size, value_size, expansion_size]);
        for c in 0..value_size {
            for i in 0..expansion_size {
                *coefficients
                    .get_mut([c * expansion_size + i, c, i])
                    .unwrap() = T::from(1.0).unwrap();
            }
        }
        Self {
            cell_type,
            degree,
            value_shape,
            value_size,
            coefficients,
        }
    }

    /// The cell type
    pub fn cell_type(&self) -> ReferenceCellType {
        self.cell_type
    }

    /// The degree of the expansion set the coefficients refer to
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// The highest total degree of any polynomial in the set
    pub fn highest_degree(&self) -> usize {
        highest_degree(self.cell_type, self.degree)
    }

    /// The value shape
    pub fn value_shape(&self) -> &[usize] {
        &self.value_shape
    }

    /// The number of components
    pub fn value_size(&self) -> usize {
        self.value_size
    }

    /// The number of polynomials in the set
    pub fn dim(&self) -> usize {
        self.coefficients.shape()[0]
    }

    /// The number of polynomials in the expansion set
    pub fn expansion_size(&self) -> usize {
        self.coefficients.shape()[2]
    }

    /// The coefficients, with shape \[dim, value_size, expansion_size\]
    pub fn coefficients(&self) -> &DynamicArray<T, 3> {
        &self.coefficients
    }

    /// A coefficient
    pub fn coefficient(&self, member: usize, component: usize, index: usize) -> T {
        *self.coefficients.get([member, component, index]).unwrap()
    }

    /// A new set containing the listed members, in the order given
    pub fn take_subset(&self, indices: &[usize]) -> Result<Self, ElementError> {
        if let Some(i) = indices.iter().find(|i| **i >= self.dim()) {
            return Err(ElementError::InvalidIndex {
                index: *i,
                size: self.dim(),
            });
        }
        let mut coefficients =
            rlst_dynamic_array3!(T, [indices.len(), self.value_size, self.expansion_size()]);
        for (new, old) in indices.iter().enumerate() {
            for j in 0..self.value_size {
                for k in 0..self.expansion_size() {
                    *coefficients.get_mut([new, j, k]).unwrap() = self.coefficient(*old, j, k);
                }
            }
        }
        Self::new(
            self.cell_type,
            self.degree,
            self.value_shape.clone(),
            coefficients,
        )
    }

    /// The same polynomials written in terms of a higher degree expansion set
    pub fn embed(&self, degree: usize) -> Result<Self, ElementError> {
        if degree < self.degree {
            return Err(ElementError::Incompatible {
                reason: "a polynomial set cannot be embedded in a lower degree expansion set",
            });
        }
        let positions = embedding_indices(self.cell_type, self.degree, degree);
        let mut coefficients = rlst_dynamic_array3!(
            T,
            [
                self.dim(),
                self.value_size,
                polynomial_count(self.cell_type, degree)
            ]
        );
        for i in 0..self.dim() {
            for j in 0..self.value_size {
                for (k, position) in positions.iter().enumerate() {
                    *coefficients.get_mut([i, j, *position]).unwrap() = self.coefficient(i, j, k);
                }
            }
        }
        Self::new(
            self.cell_type,
            degree,
            self.value_shape.clone(),
            coefficients,
        )
    }

    /// The members of this set followed by the members of another
    ///
    /// Both sets are embedded in the expansion set of the larger degree.
    pub fn union(&self, other: &Self) -> Result<Self, ElementError> {
        if self.cell_type != other.cell_type {
            return Err(ElementError::Incompatible {
                reason: "polynomial sets are defined on different cells",
            });
        }
        if self.value_shape != other.value_shape {
            return Err(ElementError::Incompatible {
                reason: "polynomial sets have different value shapes",
            });
        }
        let degree = usize::max(self.degree, other.degree);
        let a = self.embed(degree)?;
        let b = other.embed(degree)?;
        let mut coefficients = rlst_dynamic_array3!(
            T,
            [a.dim() + b.dim(), self.value_size, a.expansion_size()]
        );
        for (offset, set) in [(0, &a), (a.dim(), &b)] {
            for i in 0..set.dim() {
                for j in 0..self.value_size {
                    for k in 0..set.expansion_size() {
                        *coefficients.get_mut([offset + i, j, k]).unwrap() =
                            set.coefficient(i, j, k);
                    }
                }
            }
        }
        Self::new(
            self.cell_type,
            degree,
            self.value_shape.clone(),
            coefficients,
        )
    }

    /// The shape of the array filled by [PolynomialSet::tabulate_into]
    pub fn tabulate_shape(&self, nderivs: usize, npoints: usize) -> [usize; 4] {
        [
            derivative_count(self.cell_type, nderivs),
            npoints,
            self.dim(),
            self.value_size,
        ]
    }

    /// Tabulate the members of the set and their derivatives
    ///
    /// The result has the shape given by [PolynomialSet::tabulate_shape]: entry \[k, p, i, j\]
    /// is derivative k of component j of member i at point p.
    pub fn tabulate<Array2: RandomAccessByRef<2, Item = T::Real> + Shape<2>>(
        &self,
        points: &Array2,
        nderivs: usize,
    ) -> Result<DynamicArray<T, 4>, ElementError> {
        let mut data = rlst_dynamic_array4!(T, self.tabulate_shape(nderivs, points.shape()[0]));
        self.tabulate_into(points, nderivs, &mut data)?;
        Ok(data)
    }

    /// Tabulate the members of the set and their derivatives into an existing array
    ///
    /// Derivatives of higher order than [PolynomialSet::highest_degree] are zero and are not
    /// computed.
    pub fn tabulate_into<
        Array2: RandomAccessByRef<2, Item = T::Real> + Shape<2>,
        Array4Mut: RandomAccessMut<4, Item = T> + Shape<4>,
    >(
        &self,
        points: &Array2,
        nderivs: usize,
        data: &mut Array4Mut,
    ) -> Result<(), ElementError> {
        let tdim = reference_cell::dim(self.cell_type);
        let [npts, pdim] = points.shape();
        if pdim != tdim {
            return Err(ElementError::ShapeMismatch {
                what: "Points",
                expected: vec![npts, tdim],
                found: vec![npts, pdim],
            });
        }
        let expected = self.tabulate_shape(nderivs, npts);
        if data.shape() != expected {
            return Err(ElementError::ShapeMismatch {
                what: "Tabulation array",
                expected: expected.to_vec(),
                found: data.shape().to_vec(),
            });
        }

        let computed = usize::min(nderivs, self.highest_degree());
        let mut table = rlst_dynamic_array3!(
            T,
            legendre_shape(self.cell_type, points, self.degree, computed)
        );
        tabulate_legendre_polynomials(self.cell_type, points, self.degree, computed, &mut table)?;

        let nderivs_computed = table.shape()[0];
        for d in 0..expected[0] {
            for p in 0..npts {
                for b in 0..self.dim() {
                    for j in 0..self.value_size {
                        let value = data.get_mut([d, p, b, j]).unwrap();
                        *value = T::from(0.0).unwrap();
                        if d < nderivs_computed {
                            for i in 0..self.expansion_size() {
                                *value += *self.coefficients.get([b, j, i]).unwrap()
                                    * *table.get([d, i, p]).unwrap();
                            }
                        }
                    }
                }
            }
        }
        Ok(())
    }
}

impl<T: RlstScalar> Clone for PolynomialSet<T> {
    fn clone(&self) -> Self {
        let mut coefficients = rlst_dynamic_array3!(T, self.coefficients.shape());
        for i in 0..self.dim() {
            for j in 0..self.value_size {
                for k in 0..self.expansion_size() {
                    *coefficients.get_mut([i, j, k]).unwrap() = self.coefficient(i, j, k);
                }
            }
        }
        Self {
            cell_type: self.cell_type,
            degree: self.degree,
            value_shape: self.value_shape.clone(),
            value_size: self.value_size,
            coefficients,
        }
    }
}
