//! Bubble elements
//!
//! These are the Lagrange basis functions associated with the interior of the cell (for a
//! bubble element) or with the interiors of its facets (for a facet bubble element).

use crate::ciarlet::{lagrange, CiarletElement};
use crate::error::ElementError;
use crate::reference_cell;
use crate::traits::FiniteElement;
use crate::types::{Continuity, Family, ReferenceCellType};
use rlst::{MatrixInverse, RlstScalar};

fn restrict_to_codimension<T: RlstScalar + MatrixInverse>(
    cell_type: ReferenceCellType,
    degree: usize,
    codim: usize,
    family: Family,
    context: &'static str,
) -> Result<CiarletElement<T>, ElementError> {
    let tdim = reference_cell::dim(cell_type);
    if codim > tdim || degree == 0 {
        return Err(ElementError::NoDegreesOfFreedom {
            context,
            cell: cell_type,
            degree,
        });
    }
    let lagrange = lagrange::create::<T>(cell_type, degree, Continuity::Continuous)?;
    let dim = tdim - codim;
    let dofs = (0..reference_cell::entity_counts(cell_type)[dim])
        .flat_map(|e| lagrange.entity_dofs(dim, e).unwrap_or(&[]).to_vec())
        .collect::<Vec<_>>();
    if dofs.is_empty() {
        return Err(ElementError::NoDegreesOfFreedom {
            context,
            cell: cell_type,
            degree,
        });
    }
    let mut element = lagrange.restrict(&dofs)?;
    element.family = family;
    Ok(element)
}

/// Create a bubble element
///
/// The basis functions vanish on the boundary of the cell. The smallest degree with any DOFs
/// is 2 on an interval or a quadrilateral, 3 on a triangle, and 4 on a tetrahedron.
pub fn create<T: RlstScalar + MatrixInverse>(
    cell_type: ReferenceCellType,
    degree: usize,
) -> Result<CiarletElement<T>, ElementError> {
    restrict_to_codimension(cell_type, degree, 0, Family::Bubble, "bubble element")
}

/// Create a facet bubble element
pub fn create_facet<T: RlstScalar + MatrixInverse>(
    cell_type: ReferenceCellType,
    degree: usize,
) -> Result<CiarletElement<T>, ElementError> {
    restrict_to_codimension(
        cell_type,
        degree,
        1,
        Family::FacetBubble,
        "facet bubble element",
    )
}
