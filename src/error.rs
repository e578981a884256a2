//! Error type

use crate::types::{Family, ReferenceCellType};

/// Errors raised while creating or tabulating a finite element
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ElementError {
    /// The number of functionals differs from the dimension of the polynomial space
    #[error("The dual set has {functionals} functionals but the polynomial space has dimension {space_dimension}")]
    DimensionMismatch {
        /// Number of functionals in the dual set
        functionals: usize,
        /// Dimension of the polynomial set
        space_dimension: usize,
    },
    /// The dual matrix could not be inverted
    #[error("The dual matrix of the degree {degree} {family:?} element on a {cell:?} is singular")]
    SingularDualMatrix {
        /// Element family
        family: Family,
        /// Cell type
        cell: ReferenceCellType,
        /// Polynomial degree
        degree: usize,
    },
    /// Nothing is left to build a space from
    #[error("The {context} of degree {degree} on a {cell:?} has no degrees of freedom")]
    NoDegreesOfFreedom {
        /// What was being built
        context: &'static str,
        /// Cell type
        cell: ReferenceCellType,
        /// Polynomial degree
        degree: usize,
    },
    /// The operation is not available on this cell
    #[error("{context} is not supported on a {cell:?}")]
    UnsupportedCell {
        /// What was being built or evaluated
        context: &'static str,
        /// Cell type
        cell: ReferenceCellType,
    },
    /// The family cannot be created with this degree
    #[error("{family:?} elements of degree {degree} are not supported: {reason}")]
    UnsupportedDegree {
        /// Element family
        family: Family,
        /// Polynomial degree
        degree: usize,
        /// Explanation
        reason: &'static str,
    },
    /// A functional does not match the others in a dual set
    #[error("Functional {index} is incompatible with the dual set: {reason}")]
    IncompatibleFunctionals {
        /// Index of the offending functional
        index: usize,
        /// Explanation
        reason: &'static str,
    },
    /// Two sets or elements cannot be combined
    #[error("Incompatible inputs: {reason}")]
    Incompatible {
        /// Explanation
        reason: &'static str,
    },
    /// Per-entity input does not match the cell's topology
    #[error("Expected {expected} entities of dimension {dim}, found {found}")]
    EntityCountMismatch {
        /// Entity dimension
        dim: usize,
        /// Number of entities of the cell
        expected: usize,
        /// Number of entities supplied
        found: usize,
    },
    /// The quadrature rule cannot be created
    #[error("Invalid quadrature: {reason}")]
    InvalidQuadrature {
        /// Explanation
        reason: &'static str,
    },
    /// A point has the wrong number of coordinates
    #[error("Point {index} has {found} coordinates but {expected} are needed")]
    InvalidPoint {
        /// Index of the point
        index: usize,
        /// Required number of coordinates
        expected: usize,
        /// Number of coordinates supplied
        found: usize,
    },
    /// A sub-entity does not exist
    #[error("The cell has no entity of dimension {dim} with index {index}")]
    InvalidEntity {
        /// Entity dimension
        dim: usize,
        /// Entity index
        index: usize,
    },
    /// An index is out of range
    #[error("Index {index} is out of range for size {size}")]
    InvalidIndex {
        /// The index
        index: usize,
        /// The size of the indexed range
        size: usize,
    },
    /// An array has the wrong shape
    #[error("{what} has shape {found:?} but shape {expected:?} is needed")]
    ShapeMismatch {
        /// The array
        what: &'static str,
        /// Required shape
        expected: Vec<usize>,
        /// Supplied shape
        found: Vec<usize>,
    },
}
