//! Type definitions

/// The type of a reference cell
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[repr(u8)]
pub enum ReferenceCellType {
    /// A point
    Point = 0,
    /// A line interval
    Interval = 1,
    /// A triangle
    Triangle = 2,
    /// A quadrilateral
    Quadrilateral = 3,
    /// A tetrahedron (whose faces are all triangles)
    Tetrahedron = 4,
    /// A hexahedron (whose faces are all quadrilaterals)
    Hexahedron = 5,
}

impl ReferenceCellType {
    /// Create a reference cell type from a u8
    pub fn from(i: u8) -> Option<ReferenceCellType> {
        match i {
            0 => Some(ReferenceCellType::Point),
            1 => Some(ReferenceCellType::Interval),
            2 => Some(ReferenceCellType::Triangle),
            3 => Some(ReferenceCellType::Quadrilateral),
            4 => Some(ReferenceCellType::Tetrahedron),
            5 => Some(ReferenceCellType::Hexahedron),
            _ => None,
        }
    }
}

/// Continuity type
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[repr(u8)]
pub enum Continuity {
    /// DOFs are shared by neighbouring cells through the sub-entities they are associated with
    Continuous = 0,
    /// Every DOF is associated with the interior of the cell
    Discontinuous = 1,
}

/// The family of a finite element
#[derive(Debug, PartialEq, Eq, Clone, Copy, Hash)]
#[repr(u8)]
pub enum Family {
    /// Lagrange element with equispaced nodes
    Lagrange = 0,
    /// Interval element with nodes at the Gauss-Lobatto-Legendre points
    GaussLobattoLegendre = 1,
    /// Discontinuous element whose DOFs are moments against orthonormal polynomials
    Legendre = 2,
    /// The interior DOFs of a Lagrange element
    Bubble = 3,
    /// The facet DOFs of a Lagrange element
    FacetBubble = 4,
    /// Direct sum of two elements
    Enriched = 5,
    /// A subset of the DOFs of another element
    Restricted = 6,
    /// An element assembled directly from a polynomial set and a dual set
    Custom = 7,
    /// Product of two elements whose cells multiply to a quadrilateral or hexahedron
    TensorProduct = 8,
}

/// A multi-index: the number of derivatives taken in each coordinate direction
pub type MultiIndex = Vec<usize>;
