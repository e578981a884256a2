//! Tensor product elements
//!
//! The product of an element on an interval with an element on an interval or a
//! quadrilateral. The first factor gives the leading coordinates of the product cell.

use crate::ciarlet::CiarletElement;
use crate::dual_set::{DualSet, EntityFunctionals};
use crate::error::ElementError;
use crate::functionals::Functional;
use crate::polynomial_set::PolynomialSet;
use crate::reference_cell;
use crate::types::{Continuity, Family, ReferenceCellType};
use rlst::{rlst_dynamic_array3, MatrixInverse, RandomAccessMut, RlstScalar};

/// The sub-entity of the product cell spanned by a sub-entity of each factor
fn product_entity(
    cell_type: ReferenceCellType,
    factors: [ReferenceCellType; 2],
    a_entity: (usize, usize),
    b_entity: (usize, usize),
) -> Result<(usize, usize), ElementError> {
    let cell_vertices = reference_cell::vertices::<f64>(cell_type);
    let a_vertices = reference_cell::vertices::<f64>(factors[0]);
    let b_vertices = reference_cell::vertices::<f64>(factors[1]);
    let mut product = vec![];
    for va in reference_cell::entity_vertices(factors[0], a_entity.0, a_entity.1)? {
        for vb in reference_cell::entity_vertices(factors[1], b_entity.0, b_entity.1)? {
            let point = [&a_vertices[va][..], &b_vertices[vb][..]].concat();
            if let Some(v) = cell_vertices.iter().position(|w| *w == point) {
                product.push(v);
            }
        }
    }
    product.sort_unstable();

    let dim = a_entity.0 + b_entity.0;
    reference_cell::connectivity(cell_type)[dim]
        .iter()
        .position(|entity| {
            let mut vertices = entity[0].clone();
            vertices.sort_unstable();
            vertices == product
        })
        .map(|e| (dim, e))
        .ok_or(ElementError::InvalidEntity {
            dim,
            index: product.len(),
        })
}

/// Create the tensor product of two scalar elements
///
/// An interval times an interval gives a quadrilateral, and an interval times a quadrilateral
/// (in either order) gives a hexahedron. Basis function `i * b.dim() + j` is the product of
/// basis function i of `a` and basis function j of `b`. The DOFs on each sub-entity of the
/// product cell are products of the DOFs of `a` and `b` on the factors of that sub-entity,
/// with those of `a` varying slowest.
pub fn create<T: RlstScalar + MatrixInverse>(
    a: &CiarletElement<T>,
    b: &CiarletElement<T>,
) -> Result<CiarletElement<T>, ElementError> {
    let cell_type = match (a.cell_type, b.cell_type) {
        (ReferenceCellType::Interval, ReferenceCellType::Interval) => {
            ReferenceCellType::Quadrilateral
        }
        (ReferenceCellType::Interval, ReferenceCellType::Quadrilateral)
        | (ReferenceCellType::Quadrilateral, ReferenceCellType::Interval) => {
            ReferenceCellType::Hexahedron
        }
        (ReferenceCellType::Interval, cell) | (cell, _) => {
            return Err(ElementError::UnsupportedCell {
                context: "Tensor product element",
                cell,
            })
        }
    };
    if a.value_size != 1 || b.value_size != 1 {
        return Err(ElementError::Incompatible {
            reason: "tensor product elements are built from scalar elements",
        });
    }

    // Products of the orthonormal sets of the factors are the orthonormal set of the product
    let degree = usize::max(a.nodal_basis.degree(), b.nodal_basis.degree());
    let basis_a = a.nodal_basis.embed(degree)?;
    let basis_b = b.nodal_basis.embed(degree)?;
    let size_a = basis_a.expansion_size();
    let size_b = basis_b.expansion_size();
    let mut coefficients = rlst_dynamic_array3!(T, [a.dim * b.dim, 1, size_a * size_b]);
    for ia in 0..a.dim {
        for ib in 0..b.dim {
            for j in 0..size_b {
                let cb = basis_b.coefficient(ib, 0, j);
                for i in 0..size_a {
                    *coefficients
                        .get_mut([ia * b.dim + ib, 0, j * size_a + i])
                        .unwrap() = basis_a.coefficient(ia, 0, i) * cb;
                }
            }
        }
    }
    let polynomial_set = PolynomialSet::new(cell_type, degree, vec![], coefficients)?;

    let mut functionals: EntityFunctionals<T> = [vec![], vec![], vec![], vec![]];
    for (d, count) in reference_cell::entity_counts(cell_type).iter().enumerate() {
        functionals[d] = vec![vec![]; *count];
    }
    let factors = [a.cell_type, b.cell_type];
    let a_counts = reference_cell::entity_counts(a.cell_type);
    let b_counts = reference_cell::entity_counts(b.cell_type);
    for (da, a_count) in a_counts.iter().enumerate() {
        for ea in 0..*a_count {
            let a_ids = a.dual_set.entity_ids(da, ea).unwrap_or(&[]);
            for (db, b_count) in b_counts.iter().enumerate() {
                for eb in 0..*b_count {
                    let b_ids = b.dual_set.entity_ids(db, eb).unwrap_or(&[]);
                    if a_ids.is_empty() || b_ids.is_empty() {
                        continue;
                    }
                    let (d, e) = product_entity(cell_type, factors, (da, ea), (db, eb))?;
                    for i in a_ids {
                        for j in b_ids {
                            functionals[d][e].push(Functional::tensor_product(
                                cell_type,
                                &a.dual_set.functionals()[*i],
                                &b.dual_set.functionals()[*j],
                            )?);
                        }
                    }
                }
            }
        }
    }

    let continuity =
        if a.continuity == Continuity::Continuous && b.continuity == Continuity::Continuous {
            Continuity::Continuous
        } else {
            Continuity::Discontinuous
        };
    CiarletElement::create_with_options(
        Family::TensorProduct,
        usize::max(a.degree, b.degree),
        polynomial_set,
        DualSet::new(cell_type, functionals)?,
        continuity,
        &a.options,
    )
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::ciarlet::{gauss_lobatto_legendre, lagrange};
    use crate::traits::FiniteElement;
    use approx::assert_relative_eq;
    use rlst::{rlst_dynamic_array2, rlst_dynamic_array4, RandomAccessByRef};

    fn grid_points(tdim: usize, n: usize) -> rlst::DynamicArray<f64, 2> {
        let npts = (n + 1).pow(tdim as u32);
        let mut points = rlst_dynamic_array2!(f64, [npts, tdim]);
        for p in 0..npts {
            let mut index = p;
            for d in 0..tdim {
                *points.get_mut([p, d]).unwrap() = (index % (n + 1)) as f64 / n as f64 + 0.01;
                index /= n + 1;
            }
        }
        points
    }

    /// Values and first derivatives of each basis function at the points
    fn tabulate(
        e: &CiarletElement<f64>,
        points: &rlst::DynamicArray<f64, 2>,
        npts: usize,
    ) -> Vec<Vec<f64>> {
        let shape = e.tabulate_array_shape(1, npts);
        let mut data = rlst_dynamic_array4!(f64, shape);
        e.tabulate(points, 1, &mut data).unwrap();
        (0..e.dim())
            .map(|i| {
                (0..shape[0])
                    .flat_map(|d| (0..npts).map(move |p| (d, p)))
                    .map(|(d, p)| *data.get([d, p, i, 0]).unwrap())
                    .collect()
            })
            .collect()
    }

    #[test]
    fn test_interval_squared_is_lagrange() {
        for degree in 1..5 {
            let interval =
                lagrange::create::<f64>(ReferenceCellType::Interval, degree, Continuity::Continuous)
                    .unwrap();
            let e = create(&interval, &interval).unwrap();
            let q = lagrange::create::<f64>(
                ReferenceCellType::Quadrilateral,
                degree,
                Continuity::Continuous,
            )
            .unwrap();
            assert_eq!(e.family(), Family::TensorProduct);
            assert_eq!(e.cell_type(), ReferenceCellType::Quadrilateral);
            assert_eq!(e.continuity(), Continuity::Continuous);
            assert_eq!(e.embedded_superdegree(), q.embedded_superdegree());
            assert_eq!(e.dim(), q.dim());
            for (d, count) in reference_cell::entity_counts(ReferenceCellType::Quadrilateral)
                .iter()
                .enumerate()
            {
                for i in 0..*count {
                    assert_eq!(e.entity_dofs(d, i), q.entity_dofs(d, i));
                    assert_eq!(e.entity_closure_dofs(d, i), q.entity_closure_dofs(d, i));
                }
            }

            let points = grid_points(2, 4);
            for (fe, fq) in tabulate(&e, &points, 25).iter().zip(&tabulate(&q, &points, 25)) {
                for (x, y) in fe.iter().zip(fq) {
                    assert_relative_eq!(*x, *y, epsilon = 1e-10);
                }
            }
        }
    }

    #[test]
    fn test_kronecker() {
        let p1 = lagrange::create::<f64>(ReferenceCellType::Interval, 1, Continuity::Continuous)
            .unwrap();
        let p2 = lagrange::create::<f64>(ReferenceCellType::Interval, 2, Continuity::Continuous)
            .unwrap();
        let e = create(&p1, &p2).unwrap();
        assert_eq!(e.dim(), 6);
        assert_eq!(e.degree(), 2);
        assert_eq!(e.entity_dofs(1, 0).unwrap(), &[] as &[usize]);
        assert_eq!(e.entity_dofs(1, 1).unwrap(), &[4]);
        assert_eq!(e.entity_dofs(1, 2).unwrap(), &[5]);
        assert_eq!(e.entity_closure_dofs(1, 2).unwrap(), &[1, 3, 5]);

        let dof_points = [
            [0.0, 0.0],
            [1.0, 0.0],
            [0.0, 1.0],
            [1.0, 1.0],
            [0.0, 0.5],
            [1.0, 0.5],
        ];
        let mut points = rlst_dynamic_array2!(f64, [6, 2]);
        for (p, point) in dof_points.iter().enumerate() {
            for (d, x) in point.iter().enumerate() {
                *points.get_mut([p, d]).unwrap() = *x;
            }
        }
        let mut data = rlst_dynamic_array4!(f64, e.tabulate_array_shape(0, 6));
        e.tabulate(&points, 0, &mut data).unwrap();
        for p in 0..6 {
            for i in 0..6 {
                assert_relative_eq!(
                    *data.get([0, p, i, 0]).unwrap(),
                    if p == i { 1.0 } else { 0.0 },
                    epsilon = 1e-12
                );
            }
        }
    }

    #[test]
    fn test_hexahedron() {
        let interval =
            lagrange::create::<f64>(ReferenceCellType::Interval, 2, Continuity::Continuous)
                .unwrap();
        let quad =
            lagrange::create::<f64>(ReferenceCellType::Quadrilateral, 2, Continuity::Continuous)
                .unwrap();
        let hex =
            lagrange::create::<f64>(ReferenceCellType::Hexahedron, 2, Continuity::Continuous)
                .unwrap();
        let points = grid_points(3, 3);
        let hex_table = tabulate(&hex, &points, 64);

        for e in [create(&interval, &quad).unwrap(), create(&quad, &interval).unwrap()] {
            assert_eq!(e.cell_type(), ReferenceCellType::Hexahedron);
            assert_eq!(e.dim(), 27);
            for (d, count) in reference_cell::entity_counts(ReferenceCellType::Hexahedron)
                .iter()
                .enumerate()
            {
                for i in 0..*count {
                    assert_eq!(
                        e.entity_dofs(d, i).unwrap().len(),
                        hex.entity_dofs(d, i).unwrap().len()
                    );
                }
            }

            // Every basis function is a Lagrange basis function
            for values in tabulate(&e, &points, 64) {
                assert!(hex_table.iter().any(|other| {
                    other
                        .iter()
                        .zip(&values)
                        .all(|(x, y)| (x - y).abs() < 1e-10)
                }));
            }
        }
    }

    #[test]
    fn test_discontinuous_factor() {
        let gll = gauss_lobatto_legendre::create::<f64>(
            ReferenceCellType::Interval,
            3,
            Continuity::Continuous,
        )
        .unwrap();
        let dg = gll.discontinuous().unwrap();
        let e = create(&dg, &gll).unwrap();
        assert_eq!(e.continuity(), Continuity::Discontinuous);
        assert_eq!(e.dim(), 16);
        assert_eq!(e.entity_dofs(2, 0).unwrap().len(), 16);
        for v in 0..4 {
            assert_eq!(e.entity_dofs(0, v).unwrap(), &[] as &[usize]);
        }
    }

    #[test]
    fn test_unsupported() {
        let interval =
            lagrange::create::<f64>(ReferenceCellType::Interval, 1, Continuity::Continuous)
                .unwrap();
        let triangle =
            lagrange::create::<f64>(ReferenceCellType::Triangle, 1, Continuity::Continuous)
                .unwrap();
        let quad =
            lagrange::create::<f64>(ReferenceCellType::Quadrilateral, 1, Continuity::Continuous)
                .unwrap();
        assert_eq!(
            create(&interval, &triangle).err(),
            Some(ElementError::UnsupportedCell {
                context: "Tensor product element",
                cell: ReferenceCellType::Triangle
            })
        );
        assert!(create(&triangle, &interval).is_err());
        assert!(create(&quad, &quad).is_err());
    }
}
