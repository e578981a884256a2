//! Reference cell geometry and topology
//!
//! Every cell is the unit simplex or the unit hypercube with the vertex numbering used by
//! [vertices]. Sub-entities are numbered as in [edges] and [faces].

use crate::error::ElementError;
use crate::types::ReferenceCellType;
use rlst::{
    rlst_dynamic_array2, DynamicArray, RandomAccessByRef, RandomAccessMut, RlstScalar, Shape,
};

/// The topological dimension of the cell
pub fn dim(cell: ReferenceCellType) -> usize {
    match cell {
        ReferenceCellType::Point => 0,
        ReferenceCellType::Interval => 1,
        ReferenceCellType::Triangle => 2,
        ReferenceCellType::Quadrilateral => 2,
        ReferenceCellType::Tetrahedron => 3,
        ReferenceCellType::Hexahedron => 3,
    }
}

/// Is the cell a simplex?
pub fn is_simplex(cell: ReferenceCellType) -> bool {
    !matches!(
        cell,
        ReferenceCellType::Quadrilateral | ReferenceCellType::Hexahedron
    )
}

/// The vertices of the reference cell
pub fn vertices<T: RlstScalar<Real = T>>(cell: ReferenceCellType) -> Vec<Vec<T>> {
    let zero = T::from(0.0).unwrap();
    let one = T::from(1.0).unwrap();
    match cell {
        ReferenceCellType::Point => vec![vec![]],
        ReferenceCellType::Interval => vec![vec![zero], vec![one]],
        ReferenceCellType::Triangle => vec![vec![zero, zero], vec![one, zero], vec![zero, one]],
        ReferenceCellType::Quadrilateral => vec![
            vec![zero, zero],
            vec![one, zero],
            vec![zero, one],
            vec![one, one],
        ],
        ReferenceCellType::Tetrahedron => vec![
            vec![zero, zero, zero],
            vec![one, zero, zero],
            vec![zero, one, zero],
            vec![zero, zero, one],
        ],
        ReferenceCellType::Hexahedron => (0..8)
            .map(|v| {
                (0..3)
                    .map(|d| if (v >> d) & 1 == 1 { one } else { zero })
                    .collect()
            })
            .collect(),
    }
}

/// The midpoint of the cell
pub fn midpoint<T: RlstScalar<Real = T>>(cell: ReferenceCellType) -> Vec<T> {
    let half = T::from(0.5).unwrap();
    match cell {
        ReferenceCellType::Point => vec![],
        ReferenceCellType::Interval => vec![half],
        ReferenceCellType::Triangle => vec![T::from(1.0).unwrap() / T::from(3.0).unwrap(); 2],
        ReferenceCellType::Quadrilateral => vec![half; 2],
        ReferenceCellType::Tetrahedron => vec![T::from(0.25).unwrap(); 3],
        ReferenceCellType::Hexahedron => vec![half; 3],
    }
}

/// The volume of the cell
pub fn volume<T: RlstScalar<Real = T>>(cell: ReferenceCellType) -> T {
    match cell {
        ReferenceCellType::Triangle => T::from(0.5).unwrap(),
        ReferenceCellType::Tetrahedron => T::from(1.0).unwrap() / T::from(6.0).unwrap(),
        _ => T::from(1.0).unwrap(),
    }
}

/// The edges of the reference cell
pub fn edges(cell: ReferenceCellType) -> Vec<Vec<usize>> {
    match cell {
        ReferenceCellType::Point => vec![],
        ReferenceCellType::Interval => vec![vec![0, 1]],
        ReferenceCellType::Triangle => vec![vec![1, 2], vec![0, 2], vec![0, 1]],
        ReferenceCellType::Quadrilateral => vec![vec![0, 1], vec![0, 2], vec![1, 3], vec![2, 3]],
        ReferenceCellType::Tetrahedron => vec![
            vec![2, 3],
            vec![1, 3],
            vec![1, 2],
            vec![0, 3],
            vec![0, 2],
            vec![0, 1],
        ],
        ReferenceCellType::Hexahedron => vec![
            vec![0, 1],
            vec![0, 2],
            vec![0, 4],
            vec![1, 3],
            vec![1, 5],
            vec![2, 3],
            vec![2, 6],
            vec![3, 7],
            vec![4, 5],
            vec![4, 6],
            vec![5, 7],
            vec![6, 7],
        ],
    }
}

/// The faces of the reference cell
pub fn faces(cell: ReferenceCellType) -> Vec<Vec<usize>> {
    match cell {
        ReferenceCellType::Point => vec![],
        ReferenceCellType::Interval => vec![],
        ReferenceCellType::Triangle => vec![vec![0, 1, 2]],
        ReferenceCellType::Quadrilateral => vec![vec![0, 1, 2, 3]],
        ReferenceCellType::Tetrahedron => {
            vec![vec![1, 2, 3], vec![0, 2, 3], vec![0, 1, 3], vec![0, 1, 2]]
        }
        ReferenceCellType::Hexahedron => vec![
            vec![0, 1, 2, 3],
            vec![0, 1, 4, 5],
            vec![0, 2, 4, 6],
            vec![1, 3, 5, 7],
            vec![2, 3, 6, 7],
            vec![4, 5, 6, 7],
        ],
    }
}

/// The types of the subentities of the reference cell
pub fn entity_types(cell: ReferenceCellType) -> Vec<Vec<ReferenceCellType>> {
    let counts = entity_counts(cell);
    let facet_type = match cell {
        ReferenceCellType::Tetrahedron => ReferenceCellType::Triangle,
        ReferenceCellType::Hexahedron => ReferenceCellType::Quadrilateral,
        _ => cell,
    };
    let types = [
        ReferenceCellType::Point,
        ReferenceCellType::Interval,
        facet_type,
        cell,
    ];
    (0..4)
        .map(|d| vec![if d == dim(cell) { cell } else { types[d] }; counts[d]])
        .collect()
}

/// The number of subentities of each dimension
pub fn entity_counts(cell: ReferenceCellType) -> Vec<usize> {
    match cell {
        ReferenceCellType::Point => vec![1, 0, 0, 0],
        ReferenceCellType::Interval => vec![2, 1, 0, 0],
        ReferenceCellType::Triangle => vec![3, 3, 1, 0],
        ReferenceCellType::Quadrilateral => vec![4, 4, 1, 0],
        ReferenceCellType::Tetrahedron => vec![4, 6, 4, 1],
        ReferenceCellType::Hexahedron => vec![8, 12, 6, 1],
    }
}

/// The vertices of every sub-entity, indexed by \[dim\]\[entity\]
fn topology(cell: ReferenceCellType) -> Vec<Vec<Vec<usize>>> {
    let tdim = dim(cell);
    let nvertices = entity_counts(cell)[0];
    let mut topology = vec![(0..nvertices).map(|v| vec![v]).collect::<Vec<_>>()];
    if tdim >= 1 {
        topology.push(edges(cell));
    }
    if tdim >= 2 {
        topology.push(faces(cell));
    }
    if tdim == 3 {
        topology.push(vec![(0..nvertices).collect()]);
    }
    topology
}

/// The connectivity of the reference cell
///
/// The indices of the result are \[i\]\[j\]\[k\]\[l\]: entry l of the list of sub-entities
/// of dimension k that are connected to entity j of dimension i. For k = 0, the list is the
/// entity's vertices in their local order; otherwise it is sorted.
pub fn connectivity(cell: ReferenceCellType) -> Vec<Vec<Vec<Vec<usize>>>> {
    let topology = topology(cell);
    let contains = |a: &[usize], b: &[usize]| b.iter().all(|v| a.contains(v));
    topology
        .iter()
        .enumerate()
        .map(|(i, entities)| {
            entities
                .iter()
                .enumerate()
                .map(|(j, entity)| {
                    topology
                        .iter()
                        .enumerate()
                        .map(|(k, others)| {
                            if k == 0 {
                                entity.clone()
                            } else if k == i {
                                vec![j]
                            } else if k < i {
                                (0..others.len())
                                    .filter(|e| contains(entity, &others[*e]))
                                    .collect()
                            } else {
                                (0..others.len())
                                    .filter(|e| contains(&others[*e], entity))
                                    .collect()
                            }
                        })
                        .collect()
                })
                .collect()
        })
        .collect()
}

/// Check that a sub-entity exists
pub fn check_entity(
    cell: ReferenceCellType,
    entity_dim: usize,
    entity_number: usize,
) -> Result<(), ElementError> {
    if entity_dim > dim(cell) || entity_number >= entity_counts(cell)[entity_dim] {
        Err(ElementError::InvalidEntity {
            dim: entity_dim,
            index: entity_number,
        })
    } else {
        Ok(())
    }
}

/// The vertices of a sub-entity, in the entity's local order
pub fn entity_vertices(
    cell: ReferenceCellType,
    entity_dim: usize,
    entity_number: usize,
) -> Result<Vec<usize>, ElementError> {
    check_entity(cell, entity_dim, entity_number)?;
    Ok(topology(cell)[entity_dim][entity_number].clone())
}

/// The vectors spanning a sub-entity
///
/// Reference coordinate j of the entity moves along the j-th vector. On a simplex entity the
/// vectors point from the entity's first vertex to each of its other vertices; on a tensor
/// product entity they point to vertices 1, 2 and 4.
fn entity_axes<T: RlstScalar<Real = T>>(
    cell: ReferenceCellType,
    entity_dim: usize,
    entity_number: usize,
) -> Result<(Vec<T>, Vec<Vec<T>>), ElementError> {
    let entity = entity_vertices(cell, entity_dim, entity_number)?;
    let v = vertices::<T>(cell);
    let simplex = is_simplex(entity_types(cell)[entity_dim][entity_number]);
    let origin = v[entity[0]].clone();
    let axes = (0..entity_dim)
        .map(|j| {
            let other = &v[entity[if simplex { j + 1 } else { 1 << j }]];
            other.iter().zip(&origin).map(|(a, b)| *a - *b).collect()
        })
        .collect();
    Ok((origin, axes))
}

/// Map points on the reference entity of a sub-entity onto the sub-entity
///
/// `points` has shape \[npoints, entity_dim\]; the result has shape \[npoints, tdim\].
pub fn entity_map<
    T: RlstScalar<Real = T>,
    Array2: RandomAccessByRef<2, Item = T> + Shape<2>,
>(
    cell: ReferenceCellType,
    entity_dim: usize,
    entity_number: usize,
    points: &Array2,
) -> Result<DynamicArray<T, 2>, ElementError> {
    let (origin, axes) = entity_axes::<T>(cell, entity_dim, entity_number)?;
    let [npts, pdim] = points.shape();
    if pdim != entity_dim {
        return Err(ElementError::ShapeMismatch {
            what: "Points",
            expected: vec![npts, entity_dim],
            found: vec![npts, pdim],
        });
    }
    let tdim = dim(cell);
    let mut mapped = rlst_dynamic_array2!(T, [npts, tdim]);
    for p in 0..npts {
        for (d, o) in origin.iter().enumerate() {
            let mut value = *o;
            for (j, axis) in axes.iter().enumerate() {
                value += *points.get([p, j]).unwrap() * axis[d];
            }
            *mapped.get_mut([p, d]).unwrap() = value;
        }
    }
    Ok(mapped)
}

/// The factor by which [entity_map] scales measure
///
/// Integrals over a sub-entity are integrals over its reference entity multiplied by this.
pub fn entity_measure<T: RlstScalar<Real = T>>(
    cell: ReferenceCellType,
    entity_dim: usize,
    entity_number: usize,
) -> Result<T, ElementError> {
    let (_, axes) = entity_axes::<T>(cell, entity_dim, entity_number)?;
    let dot = |a: &[T], b: &[T]| a.iter().zip(b).fold(T::zero(), |s, (x, y)| s + *x * *y);
    Ok(match axes.len() {
        0 => T::from(1.0).unwrap(),
        1 => T::sqrt(dot(&axes[0], &axes[0])),
        2 => {
            let g01 = dot(&axes[0], &axes[1]);
            T::sqrt(dot(&axes[0], &axes[0]) * dot(&axes[1], &axes[1]) - g01 * g01)
        }
        _ => T::abs(dot(&cross(&axes[0], &axes[1]), &axes[2])),
    })
}

fn cross<T: RlstScalar<Real = T>>(a: &[T], b: &[T]) -> Vec<T> {
    vec![
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn normalise<T: RlstScalar<Real = T>>(v: Vec<T>) -> Vec<T> {
    let norm = T::sqrt(v.iter().fold(T::zero(), |s, x| s + *x * *x));
    v.into_iter().map(|x| x / norm).collect()
}

/// The outward unit normal to a facet
pub fn facet_normal<T: RlstScalar<Real = T> + PartialOrd>(
    cell: ReferenceCellType,
    facet: usize,
) -> Result<Vec<T>, ElementError> {
    let tdim = dim(cell);
    if tdim == 0 {
        return Err(ElementError::UnsupportedCell {
            context: "Facet normals",
            cell,
        });
    }
    let (origin, axes) = entity_axes::<T>(cell, tdim - 1, facet)?;
    let normal = match tdim {
        1 => vec![T::from(1.0).unwrap()],
        2 => vec![axes[0][1], -axes[0][0]],
        _ => cross(&axes[0], &axes[1]),
    };
    let outward = midpoint::<T>(cell)
        .iter()
        .zip(&origin)
        .zip(&normal)
        .fold(T::zero(), |s, ((m, o), n)| s + (*o - *m) * *n);
    let normal = normalise(normal);
    if outward < T::zero() {
        Ok(normal.into_iter().map(|x| -x).collect())
    } else {
        Ok(normal)
    }
}

/// The unit tangent to an edge, pointing from its first vertex to its second
pub fn edge_tangent<T: RlstScalar<Real = T>>(
    cell: ReferenceCellType,
    edge: usize,
) -> Result<Vec<T>, ElementError> {
    let (_, mut axes) = entity_axes::<T>(cell, 1, edge)?;
    Ok(normalise(axes.remove(0)))
}

/// Equispaced points of spacing 1/n in the interior of a sub-entity, in cell coordinates
///
/// The points are ordered with the first entity coordinate varying slowest.
pub fn entity_lattice_points<T: RlstScalar<Real = T>>(
    cell: ReferenceCellType,
    entity_dim: usize,
    entity_number: usize,
    n: usize,
) -> Result<Vec<Vec<T>>, ElementError> {
    check_entity(cell, entity_dim, entity_number)?;
    if entity_dim == 0 {
        return Ok(vec![vertices::<T>(cell)[entity_number].clone()]);
    }
    let simplex = is_simplex(entity_types(cell)[entity_dim][entity_number]);
    let mut indices: Vec<Vec<usize>> = vec![vec![]];
    for _ in 0..entity_dim {
        indices = indices
            .into_iter()
            .flat_map(|i| {
                let used = if simplex { i.iter().sum::<usize>() } else { 0 };
                (1..n.saturating_sub(used)).map(move |j| {
                    let mut next = i.clone();
                    next.push(j);
                    next
                })
            })
            .collect();
    }

    let mut points = rlst_dynamic_array2!(T, [indices.len(), entity_dim]);
    for (p, index) in indices.iter().enumerate() {
        for (j, i) in index.iter().enumerate() {
            *points.get_mut([p, j]).unwrap() = T::from(*i).unwrap() / T::from(n).unwrap();
        }
    }
    let mapped = entity_map(cell, entity_dim, entity_number, &points)?;
    let tdim = dim(cell);
    Ok((0..indices.len())
        .map(|p| (0..tdim).map(|d| *mapped.get([p, d]).unwrap()).collect())
        .collect())
}
