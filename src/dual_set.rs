//! Dual sets

use crate::error::ElementError;
use crate::functionals::Functional;
use crate::polynomial_set::PolynomialSet;
use crate::reference_cell;
use crate::types::ReferenceCellType;
use rlst::{rlst_dynamic_array2, DynamicArray, RandomAccessMut, RlstScalar};

/// Functionals grouped by the sub-entity they are associated with
pub type EntityFunctionals<T> = [Vec<Vec<Functional<T>>>; 4];

/// An ordered list of functionals, each associated with a sub-entity of a reference cell
#[derive(Debug, Clone)]
pub struct DualSet<T: RlstScalar> {
    cell_type: ReferenceCellType,
    degree: usize,
    value_size: usize,
    functionals: Vec<Functional<T>>,
    entity_ids: [Vec<Vec<usize>>; 4],
    entity_closure_ids: [Vec<Vec<usize>>; 4],
}

impl<T: RlstScalar> DualSet<T> {
    /// Create a dual set
    ///
    /// Entry \[d\]\[e\] of `functionals` lists the functionals associated with sub-entity e of
    /// dimension d. The functionals are numbered by increasing entity dimension, then by
    /// entity number, then by their position in each list.
    pub fn new(
        cell_type: ReferenceCellType,
        functionals: EntityFunctionals<T>,
    ) -> Result<Self, ElementError> {
        let tdim = reference_cell::dim(cell_type);
        let counts = reference_cell::entity_counts(cell_type);
        for (d, entities) in functionals.iter().enumerate() {
            let expected = if d <= tdim { counts[d] } else { 0 };
            if entities.len() != expected {
                return Err(ElementError::EntityCountMismatch {
                    dim: d,
                    expected,
                    found: entities.len(),
                });
            }
        }

        let mut entity_ids = [vec![], vec![], vec![], vec![]];
        let mut all = vec![];
        for (d, entities) in functionals.into_iter().enumerate() {
            for entity in entities {
                entity_ids[d].push((all.len()..all.len() + entity.len()).collect::<Vec<_>>());
                all.extend(entity);
            }
        }

        let (degree, value_size) = match all.first() {
            Some(f) => (f.degree(), f.value_size()),
            None => {
                return Err(ElementError::NoDegreesOfFreedom {
                    context: "dual set",
                    cell: cell_type,
                    degree: 0,
                })
            }
        };
        for (index, f) in all.iter().enumerate() {
            if f.cell_type() != cell_type {
                return Err(ElementError::IncompatibleFunctionals {
                    index,
                    reason: "defined on a different cell",
                });
            }
            if f.degree() != degree {
                return Err(ElementError::IncompatibleFunctionals {
                    index,
                    reason: "built against a different expansion degree",
                });
            }
            if f.value_size() != value_size {
                return Err(ElementError::IncompatibleFunctionals {
                    index,
                    reason: "acts on functions with a different value size",
                });
            }
        }

        let entity_closure_ids = closure_ids(cell_type, &entity_ids);
        Ok(Self {
            cell_type,
            degree,
            value_size,
            functionals: all,
            entity_ids,
            entity_closure_ids,
        })
    }

    /// The cell type
    pub fn cell_type(&self) -> ReferenceCellType {
        self.cell_type
    }

    /// The expansion degree the functionals act on
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// The number of components of the functions the functionals act on
    pub fn value_size(&self) -> usize {
        self.value_size
    }

    /// The number of functionals
    pub fn dim(&self) -> usize {
        self.functionals.len()
    }

    /// All functionals, in order
    pub fn functionals(&self) -> &[Functional<T>] {
        &self.functionals
    }

    /// A functional
    pub fn functional(&self, index: usize) -> Option<&Functional<T>> {
        self.functionals.get(index)
    }

    /// The functionals associated with a sub-entity
    pub fn entity_ids(&self, entity_dim: usize, entity_number: usize) -> Option<&[usize]> {
        self.entity_ids
            .get(entity_dim)
            .and_then(|e| e.get(entity_number))
            .map(|ids| &ids[..])
    }

    /// The functionals associated with a sub-entity or any of its sub-entities, sorted
    pub fn entity_closure_ids(&self, entity_dim: usize, entity_number: usize) -> Option<&[usize]> {
        self.entity_closure_ids
            .get(entity_dim)
            .and_then(|e| e.get(entity_number))
            .map(|ids| &ids[..])
    }

    /// The dual matrix
    ///
    /// Entry \[i, j\] is functional j applied to member i of the polynomial set.
    pub fn dual_matrix(&self, set: &PolynomialSet<T>) -> Result<DynamicArray<T, 2>, ElementError> {
        let mut matrix = rlst_dynamic_array2!(T, [set.dim(), self.dim()]);
        for (j, f) in self.functionals.iter().enumerate() {
            for (i, value) in f.apply(set)?.into_iter().enumerate() {
                *matrix.get_mut([i, j]).unwrap() = value;
            }
        }
        Ok(matrix)
    }

    fn by_entity(&self, keep: impl Fn(usize) -> bool) -> EntityFunctionals<T> {
        let mut functionals = [vec![], vec![], vec![], vec![]];
        for (d, entities) in self.entity_ids.iter().enumerate() {
            for ids in entities {
                functionals[d].push(
                    ids.iter()
                        .filter(|i| keep(**i))
                        .map(|i| self.functionals[*i].clone())
                        .collect(),
                );
            }
        }
        functionals
    }

    /// A dual set containing only the listed functionals
    ///
    /// The functionals keep their entities and their relative order, so functional i of the
    /// result is the i-th smallest of `indices`. Repeated indices are ignored.
    pub fn take_subset(&self, indices: &[usize]) -> Result<Self, ElementError> {
        if let Some(i) = indices.iter().find(|i| **i >= self.dim()) {
            return Err(ElementError::InvalidIndex {
                index: *i,
                size: self.dim(),
            });
        }
        Self::new(self.cell_type, self.by_entity(|i| indices.contains(&i)))
    }

    /// The same functionals, all associated with the interior of the cell
    pub fn discontinuous(&self) -> Result<Self, ElementError> {
        let tdim = reference_cell::dim(self.cell_type);
        let counts = reference_cell::entity_counts(self.cell_type);
        let mut functionals: EntityFunctionals<T> = [vec![], vec![], vec![], vec![]];
        for (d, count) in counts.iter().enumerate().take(tdim) {
            functionals[d] = vec![vec![]; *count];
        }
        functionals[tdim] = vec![self.functionals.clone()];
        Self::new(self.cell_type, functionals)
    }

    /// The same functionals acting on a higher degree expansion set
    pub fn embed(&self, degree: usize) -> Result<Self, ElementError> {
        let mut functionals = [vec![], vec![], vec![], vec![]];
        for (d, entities) in self.entity_ids.iter().enumerate() {
            for ids in entities {
                functionals[d].push(
                    ids.iter()
                        .map(|i| self.functionals[*i].embed(degree))
                        .collect::<Result<Vec<_>, _>>()?,
                );
            }
        }
        Self::new(self.cell_type, functionals)
    }

    /// The functionals of both sets
    ///
    /// On each sub-entity, the functionals of this set come before those of the other.
    pub fn union(&self, other: &Self) -> Result<Self, ElementError> {
        if self.cell_type != other.cell_type {
            return Err(ElementError::Incompatible {
                reason: "dual sets are defined on different cells",
            });
        }
        if self.value_size != other.value_size {
            return Err(ElementError::Incompatible {
                reason: "dual sets act on functions with different value sizes",
            });
        }
        let degree = usize::max(self.degree, other.degree);
        let mut functionals = self.embed(degree)?.by_entity(|_| true);
        let extra = other.embed(degree)?.by_entity(|_| true);
        for (d, entities) in extra.into_iter().enumerate() {
            for (e, entity) in entities.into_iter().enumerate() {
                functionals[d][e].extend(entity);
            }
        }
        Self::new(self.cell_type, functionals)
    }
}

/// Collect the ids on each entity's closure
pub(crate) fn closure_ids(
    cell_type: ReferenceCellType,
    entity_ids: &[Vec<Vec<usize>>; 4],
) -> [Vec<Vec<usize>>; 4] {
    let connectivity = reference_cell::connectivity(cell_type);
    let mut closure = [vec![], vec![], vec![], vec![]];
    for (d, entities) in connectivity.iter().enumerate() {
        for sub_entities in entities {
            let mut ids = (0..d + 1)
                .flat_map(|sub_dim| {
                    sub_entities[sub_dim]
                        .iter()
                        .flat_map(move |e| entity_ids[sub_dim][*e].iter().copied())
                })
                .collect::<Vec<_>>();
            ids.sort();
            closure[d].push(ids);
        }
    }
    closure
}
