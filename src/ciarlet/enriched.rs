//! Enriched elements

use crate::ciarlet::CiarletElement;
use crate::error::ElementError;
use crate::types::Family;
use rlst::{MatrixInverse, RlstScalar};

/// Create the direct sum of two elements on the same cell
///
/// The span is the union of the two spans and the DOFs are the union of the two sets of DOFs.
/// On each sub-entity, the DOFs of `a` come before those of `b`.
pub fn create<T: RlstScalar + MatrixInverse>(
    a: &CiarletElement<T>,
    b: &CiarletElement<T>,
) -> Result<CiarletElement<T>, ElementError> {
    if a.cell_type != b.cell_type {
        return Err(ElementError::Incompatible {
            reason: "enriched elements must be defined on the same cell",
        });
    }
    if a.value_shape != b.value_shape {
        return Err(ElementError::Incompatible {
            reason: "enriched elements must have the same value shape",
        });
    }
    if a.continuity != b.continuity {
        return Err(ElementError::Incompatible {
            reason: "enriched elements must have the same continuity",
        });
    }
    CiarletElement::create_with_options(
        Family::Enriched,
        usize::max(a.degree, b.degree),
        a.nodal_basis.union(&b.nodal_basis)?,
        a.dual_set.union(&b.dual_set)?,
        a.continuity,
        &a.options,
    )
}
