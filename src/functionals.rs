//! Linear functionals on polynomial spaces
//!
//! Every functional is a finite sum of weighted point evaluations of (derivatives of)
//! components, so it is stored as a list of terms. When the functional is created, its action
//! on each orthonormal polynomial of the expansion set is computed once and cached.

use crate::error::ElementError;
use crate::polynomial_set::PolynomialSet;
use crate::polynomials::{
    derivative_index, legendre_shape, polynomial_count, tabulate_legendre_polynomials,
};
use crate::quadrature::QuadratureRule;
use crate::reference_cell;
use crate::types::{MultiIndex, ReferenceCellType};
use log::warn;
use rlst::{
    rlst_dynamic_array2, rlst_dynamic_array3, RandomAccessByRef, RandomAccessMut, RlstScalar,
};

/// The kind of a functional
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
pub enum FunctionalKind {
    /// Evaluation of a scalar function at a point
    PointEvaluation,
    /// Evaluation of one component of a vector function at a point
    ComponentPointEvaluation,
    /// A partial derivative at a point
    PointDerivative,
    /// A directional derivative at a point
    PointDirectionalDerivative,
    /// The derivative in the direction normal to a facet
    PointNormalDerivative,
    /// The derivative in the direction tangent to an edge
    PointTangentialDerivative,
    /// An integral against a weight function, computed by quadrature
    IntegralMoment,
    /// A product of functionals on the two factors of a tensor product cell
    TensorProduct,
}

#[derive(Debug, Clone)]
struct Term<T> {
    point: usize,
    derivative: MultiIndex,
    component: usize,
    weight: T,
}

/// A linear functional
#[derive(Debug, Clone)]
pub struct Functional<T: RlstScalar> {
    kind: FunctionalKind,
    cell_type: ReferenceCellType,
    degree: usize,
    value_size: usize,
    points: Vec<Vec<T::Real>>,
    terms: Vec<Term<T>>,
    action: Vec<T>,
    /// For moments, the degree of the quadrature rule and of the weight function
    moment_degrees: Option<(usize, usize)>,
}

impl<T: RlstScalar> Functional<T> {
    fn from_terms(
        kind: FunctionalKind,
        cell_type: ReferenceCellType,
        degree: usize,
        value_size: usize,
        points: Vec<Vec<T::Real>>,
        terms: Vec<Term<T>>,
    ) -> Result<Self, ElementError> {
        let tdim = reference_cell::dim(cell_type);
        for (index, point) in points.iter().enumerate() {
            if point.len() != tdim {
                return Err(ElementError::InvalidPoint {
                    index,
                    expected: tdim,
                    found: point.len(),
                });
            }
        }
        for term in &terms {
            if term.component >= value_size {
                return Err(ElementError::InvalidIndex {
                    index: term.component,
                    size: value_size,
                });
            }
            if term.derivative.len() != tdim {
                return Err(ElementError::ShapeMismatch {
                    what: "Derivative multi-index",
                    expected: vec![tdim],
                    found: vec![term.derivative.len()],
                });
            }
        }
        let mut functional = Self {
            kind,
            cell_type,
            degree,
            value_size,
            points,
            terms,
            action: vec![],
            moment_degrees: None,
        };
        functional.action = functional.compute_action()?;
        Ok(functional)
    }

    /// The action on each component of each polynomial of the expansion set
    fn compute_action(&self) -> Result<Vec<T>, ElementError> {
        let tdim = reference_cell::dim(self.cell_type);
        let nderivs = self
            .terms
            .iter()
            .map(|t| t.derivative.iter().sum::<usize>())
            .max()
            .unwrap_or(0);
        let mut points = rlst_dynamic_array2!(T::Real, [self.points.len(), tdim]);
        for (p, point) in self.points.iter().enumerate() {
            for (d, x) in point.iter().enumerate() {
                *points.get_mut([p, d]).unwrap() = *x;
            }
        }
        let mut table = rlst_dynamic_array3!(
            T,
            legendre_shape(self.cell_type, &points, self.degree, nderivs)
        );
        tabulate_legendre_polynomials(self.cell_type, &points, self.degree, nderivs, &mut table)?;

        let pdim = polynomial_count(self.cell_type, self.degree);
        let mut action = vec![T::from(0.0).unwrap(); self.value_size * pdim];
        for term in &self.terms {
            let d = derivative_index(&term.derivative);
            for i in 0..pdim {
                action[term.component * pdim + i] +=
                    term.weight * *table.get([d, i, term.point]).unwrap();
            }
        }
        Ok(action)
    }

    fn check_direction(
        cell_type: ReferenceCellType,
        direction: &[T::Real],
    ) -> Result<(), ElementError> {
        let tdim = reference_cell::dim(cell_type);
        if direction.len() != tdim {
            return Err(ElementError::ShapeMismatch {
                what: "Direction",
                expected: vec![tdim],
                found: vec![direction.len()],
            });
        }
        Ok(())
    }

    fn directional(
        kind: FunctionalKind,
        cell_type: ReferenceCellType,
        degree: usize,
        point: &[T::Real],
        direction: &[T::Real],
    ) -> Result<Self, ElementError> {
        Self::check_direction(cell_type, direction)?;
        let tdim = reference_cell::dim(cell_type);
        let terms = direction
            .iter()
            .enumerate()
            .map(|(d, v)| {
                let mut derivative = vec![0; tdim];
                derivative[d] = 1;
                Term {
                    point: 0,
                    derivative,
                    component: 0,
                    weight: T::from(*v).unwrap(),
                }
            })
            .collect();
        Self::from_terms(kind, cell_type, degree, 1, vec![point.to_vec()], terms)
    }

    /// Evaluation of a scalar function at a point
    pub fn point_evaluation(
        cell_type: ReferenceCellType,
        degree: usize,
        point: &[T::Real],
    ) -> Result<Self, ElementError> {
        let mut f = Self::component_point_evaluation(cell_type, degree, 1, 0, point)?;
        f.kind = FunctionalKind::PointEvaluation;
        Ok(f)
    }

    /// Evaluation of one component of a vector-valued function at a point
    pub fn component_point_evaluation(
        cell_type: ReferenceCellType,
        degree: usize,
        value_size: usize,
        component: usize,
        point: &[T::Real],
    ) -> Result<Self, ElementError> {
        let tdim = reference_cell::dim(cell_type);
        Self::from_terms(
            FunctionalKind::ComponentPointEvaluation,
            cell_type,
            degree,
            value_size,
            vec![point.to_vec()],
            vec![Term {
                point: 0,
                derivative: vec![0; tdim],
                component,
                weight: T::from(1.0).unwrap(),
            }],
        )
    }

    /// A partial derivative of a scalar function at a point
    ///
    /// Entry i of `alpha` is the number of derivatives taken in direction i.
    pub fn point_derivative(
        cell_type: ReferenceCellType,
        degree: usize,
        point: &[T::Real],
        alpha: &[usize],
    ) -> Result<Self, ElementError> {
        Self::from_terms(
            FunctionalKind::PointDerivative,
            cell_type,
            degree,
            1,
            vec![point.to_vec()],
            vec![Term {
                point: 0,
                derivative: alpha.to_vec(),
                component: 0,
                weight: T::from(1.0).unwrap(),
            }],
        )
    }

    /// The derivative of a scalar function in a direction at a point
    pub fn point_directional_derivative(
        cell_type: ReferenceCellType,
        degree: usize,
        point: &[T::Real],
        direction: &[T::Real],
    ) -> Result<Self, ElementError> {
        Self::directional(
            FunctionalKind::PointDirectionalDerivative,
            cell_type,
            degree,
            point,
            direction,
        )
    }

    /// The derivative of a scalar function along the outward unit normal to a facet
    pub fn point_normal_derivative(
        cell_type: ReferenceCellType,
        degree: usize,
        facet: usize,
        point: &[T::Real],
    ) -> Result<Self, ElementError> {
        let normal = reference_cell::facet_normal::<T::Real>(cell_type, facet)?;
        Self::directional(
            FunctionalKind::PointNormalDerivative,
            cell_type,
            degree,
            point,
            &normal,
        )
    }

    /// The derivative of a scalar function along the unit tangent to an edge
    pub fn point_tangential_derivative(
        cell_type: ReferenceCellType,
        degree: usize,
        edge: usize,
        point: &[T::Real],
    ) -> Result<Self, ElementError> {
        let tangent = reference_cell::edge_tangent::<T::Real>(cell_type, edge)?;
        Self::directional(
            FunctionalKind::PointTangentialDerivative,
            cell_type,
            degree,
            point,
            &tangent,
        )
    }

    /// The integral of one component against a weight function over the cell
    ///
    /// `weights` holds the values of the weight function at the points of `rule`, and
    /// `weight_degree` is its polynomial degree.
    pub fn integral_moment(
        cell_type: ReferenceCellType,
        degree: usize,
        value_size: usize,
        component: usize,
        rule: &QuadratureRule,
        weights: &[T],
        weight_degree: usize,
    ) -> Result<Self, ElementError> {
        Self::integral_moment_on_entity(
            cell_type,
            degree,
            value_size,
            component,
            (reference_cell::dim(cell_type), 0),
            rule,
            weights,
            weight_degree,
        )
    }

    /// The integral of one component against a weight function over a sub-entity
    ///
    /// The points of `rule` are on the reference entity and are mapped onto the sub-entity
    /// `(entity_dim, entity_number)`.
    #[allow(clippy::too_many_arguments)]
    pub fn integral_moment_on_entity(
        cell_type: ReferenceCellType,
        degree: usize,
        value_size: usize,
        component: usize,
        entity: (usize, usize),
        rule: &QuadratureRule,
        weights: &[T],
        weight_degree: usize,
    ) -> Result<Self, ElementError> {
        let (entity_dim, entity_number) = entity;
        reference_cell::check_entity(cell_type, entity_dim, entity_number)?;
        if rule.dim != entity_dim {
            return Err(ElementError::ShapeMismatch {
                what: "Quadrature points",
                expected: vec![rule.npoints, entity_dim],
                found: vec![rule.npoints, rule.dim],
            });
        }
        if weights.len() != rule.npoints {
            return Err(ElementError::ShapeMismatch {
                what: "Weight function values",
                expected: vec![rule.npoints],
                found: vec![weights.len()],
            });
        }
        let tdim = reference_cell::dim(cell_type);
        let mapped = reference_cell::entity_map(
            cell_type,
            entity_dim,
            entity_number,
            &rule.points_array::<T>(),
        )?;
        let points = (0..rule.npoints)
            .map(|p| (0..tdim).map(|d| *mapped.get([p, d]).unwrap()).collect())
            .collect();
        let scale = T::from(reference_cell::entity_measure::<T::Real>(
            cell_type,
            entity_dim,
            entity_number,
        )?)
        .unwrap();
        let terms = weights
            .iter()
            .enumerate()
            .map(|(p, w)| Term {
                point: p,
                derivative: vec![0; tdim],
                component,
                weight: T::from(rule.weights[p]).unwrap() * scale * *w,
            })
            .collect();
        let mut functional = Self::from_terms(
            FunctionalKind::IntegralMoment,
            cell_type,
            degree,
            value_size,
            points,
            terms,
        )?;
        functional.moment_degrees = Some((rule.degree, weight_degree));
        functional.warn_if_inexact();
        Ok(functional)
    }

    /// The product of a functional on each factor of a tensor product cell
    ///
    /// The coordinates of a point in `cell_type` are those of a point in the cell of `a`
    /// followed by those of a point in the cell of `b`. Both functionals must act on scalar
    /// functions.
    pub fn tensor_product(
        cell_type: ReferenceCellType,
        a: &Self,
        b: &Self,
    ) -> Result<Self, ElementError> {
        for f in [a, b] {
            if f.value_size != 1 {
                return Err(ElementError::Incompatible {
                    reason: "tensor products of functionals act on scalar functions",
                });
            }
        }
        let points = a
            .points
            .iter()
            .flat_map(|pa| b.points.iter().map(move |pb| [&pa[..], &pb[..]].concat()))
            .collect();
        let terms = a
            .terms
            .iter()
            .flat_map(|ta| {
                b.terms.iter().map(move |tb| Term {
                    point: ta.point * b.points.len() + tb.point,
                    derivative: [&ta.derivative[..], &tb.derivative[..]].concat(),
                    component: 0,
                    weight: ta.weight * tb.weight,
                })
            })
            .collect();
        let mut functional = Self::from_terms(
            FunctionalKind::TensorProduct,
            cell_type,
            usize::max(a.degree, b.degree),
            1,
            points,
            terms,
        )?;
        functional.moment_degrees = match (a.moment_degrees, b.moment_degrees) {
            (Some((ra, wa)), Some((rb, wb))) => Some((usize::min(ra, rb), usize::max(wa, wb))),
            (Some(m), None) | (None, Some(m)) => Some(m),
            (None, None) => None,
        };
        functional.warn_if_inexact();
        Ok(functional)
    }

    /// Whether the quadrature of a moment is exact on the expansion set
    ///
    /// This is always true for functionals that are not moments.
    pub fn integrates_exactly(&self) -> bool {
        match self.moment_degrees {
            Some((rule_degree, weight_degree)) => rule_degree >= self.degree + weight_degree,
            None => true,
        }
    }

    fn warn_if_inexact(&self) {
        if let Some((rule_degree, weight_degree)) = self.moment_degrees {
            if !self.integrates_exactly() {
                warn!(
                    "Quadrature of degree {rule_degree} does not integrate a degree {} integrand exactly",
                    self.degree + weight_degree
                );
            }
        }
    }

    /// The same functional acting on a higher degree expansion set
    pub fn embed(&self, degree: usize) -> Result<Self, ElementError> {
        if degree < self.degree {
            return Err(ElementError::Incompatible {
                reason: "a functional cannot be embedded in a lower degree expansion set",
            });
        }
        let mut functional = self.clone();
        functional.degree = degree;
        functional.action = functional.compute_action()?;
        if self.integrates_exactly() {
            functional.warn_if_inexact();
        }
        Ok(functional)
    }

    /// Apply the functional to every member of a polynomial set
    pub fn apply(&self, set: &PolynomialSet<T>) -> Result<Vec<T>, ElementError> {
        if set.cell_type() != self.cell_type {
            return Err(ElementError::Incompatible {
                reason: "the functional and polynomial set are defined on different cells",
            });
        }
        if set.value_size() != self.value_size {
            return Err(ElementError::Incompatible {
                reason: "the functional and polynomial set have different value sizes",
            });
        }
        let degree = usize::max(self.degree, set.degree());
        let embedded_functional;
        let functional = if degree == self.degree {
            self
        } else {
            embedded_functional = self.embed(degree)?;
            &embedded_functional
        };
        let embedded_set;
        let set = if degree == set.degree() {
            set
        } else {
            embedded_set = set.embed(degree)?;
            &embedded_set
        };

        let pdim = set.expansion_size();
        Ok((0..set.dim())
            .map(|m| {
                let mut value = T::from(0.0).unwrap();
                for c in 0..self.value_size {
                    for i in 0..pdim {
                        value += functional.action[c * pdim + i] * set.coefficient(m, c, i);
                    }
                }
                value
            })
            .collect())
    }

    /// The kind of functional
    pub fn kind(&self) -> FunctionalKind {
        self.kind
    }

    /// The cell type
    pub fn cell_type(&self) -> ReferenceCellType {
        self.cell_type
    }

    /// The degree of the expansion set the functional acts on
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// The number of components of the functions the functional acts on
    pub fn value_size(&self) -> usize {
        self.value_size
    }

    /// The points at which the functional evaluates
    pub fn points(&self) -> &[Vec<T::Real>] {
        &self.points
    }

    /// The highest order of derivative used
    pub fn max_derivative_order(&self) -> usize {
        self.terms
            .iter()
            .map(|t| t.derivative.iter().sum::<usize>())
            .max()
            .unwrap_or(0)
    }

    /// The action on the expansion set
    ///
    /// Entry `c * n + i` is the value of the functional applied to the function whose
    /// component c is orthonormal polynomial i (of n) and whose other components are zero.
    pub fn action(&self) -> &[T] {
        &self.action
    }
}
