//! Properties shared by the basis functions of the element families
use approx::assert_relative_eq;
use ciarlet::ciarlet::{
    bubble, enriched, gauss_lobatto_legendre, lagrange, legendre, CiarletElement,
};
use ciarlet::polynomials::{derivative_index, multi_indices};
use ciarlet::reference_cell;
use ciarlet::traits::FiniteElement;
use ciarlet::types::{Continuity, ReferenceCellType};
use paste::paste;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rlst::{
    rlst_dynamic_array2, rlst_dynamic_array4, DynamicArray, RandomAccessByRef, RandomAccessMut,
    Shape,
};

extern crate blas_src;
extern crate lapack_src;

/// Random points inside a reference cell
fn random_points(cell: ReferenceCellType, npts: usize, seed: u64) -> DynamicArray<f64, 2> {
    let tdim = reference_cell::dim(cell);
    let mut rng = StdRng::seed_from_u64(seed);
    let mut points = rlst_dynamic_array2!(f64, [npts, tdim]);
    let mut p = 0;
    while p < npts {
        let candidate = (0..tdim)
            .map(|_| rng.gen_range(0.05..0.95))
            .collect::<Vec<f64>>();
        if reference_cell::is_simplex(cell) && candidate.iter().sum::<f64>() > 0.95 {
            continue;
        }
        for (d, x) in candidate.iter().enumerate() {
            *points.get_mut([p, d]).unwrap() = *x;
        }
        p += 1;
    }
    points
}

fn tabulate(
    e: &CiarletElement<f64>,
    points: &DynamicArray<f64, 2>,
    nderivs: usize,
) -> DynamicArray<f64, 4> {
    let npts = points.shape()[0];
    let mut data = rlst_dynamic_array4!(f64, e.tabulate_array_shape(nderivs, npts));
    e.tabulate(points, nderivs, &mut data).unwrap();
    data
}

/// Every functional applied to every basis function gives the identity matrix
fn check_dual_identity(e: &CiarletElement<f64>) {
    let matrix = e.dual_set().dual_matrix(e.nodal_basis()).unwrap();
    for i in 0..e.dim() {
        for j in 0..e.dim() {
            assert_relative_eq!(
                *matrix.get([i, j]).unwrap(),
                if i == j { 1.0 } else { 0.0 },
                epsilon = 1e-10
            );
        }
    }
}

fn check_partition_of_unity(e: &CiarletElement<f64>) {
    let points = random_points(e.cell_type(), 5, 1);
    let data = tabulate(e, &points, 1);
    for p in 0..5 {
        let sum = (0..e.dim())
            .map(|b| *data.get([0, p, b, 0]).unwrap())
            .sum::<f64>();
        assert_relative_eq!(sum, 1.0, epsilon = 1e-10);
        for d in 1..reference_cell::dim(e.cell_type()) + 1 {
            let sum = (0..e.dim())
                .map(|b| *data.get([d, p, b, 0]).unwrap())
                .sum::<f64>();
            assert_relative_eq!(sum, 0.0, epsilon = 1e-8);
        }
    }
}

/// Interpolating a polynomial of the element's degree reproduces it
fn check_reproduction(e: &CiarletElement<f64>, degree: usize) {
    let f = |p: &[f64]| {
        (0.3 + p.iter().enumerate().map(|(d, x)| (d + 1) as f64 * x).sum::<f64>())
            .powi(degree as i32)
    };
    let coefficients = e
        .dual_set()
        .functionals()
        .iter()
        .map(|functional| f(&functional.points()[0]))
        .collect::<Vec<_>>();
    let points = random_points(e.cell_type(), 8, 2);
    let data = tabulate(e, &points, 0);
    let tdim = reference_cell::dim(e.cell_type());
    for p in 0..8 {
        let x = (0..tdim)
            .map(|d| *points.get([p, d]).unwrap())
            .collect::<Vec<_>>();
        let value = coefficients
            .iter()
            .enumerate()
            .map(|(b, c)| c * *data.get([0, p, b, 0]).unwrap())
            .sum::<f64>();
        assert_relative_eq!(value, f(&x), epsilon = 1e-9, max_relative = 1e-9);
    }
}

/// Compare first and second derivatives with central differences
fn check_derivatives(e: &CiarletElement<f64>) {
    let h = 1e-6;
    let tdim = reference_cell::dim(e.cell_type());
    let points = random_points(e.cell_type(), 3, 3);
    let data = tabulate(e, &points, 2);
    for p in 0..3 {
        for d in 0..tdim {
            let mut shifted = rlst_dynamic_array2!(f64, [2, tdim]);
            for j in 0..tdim {
                let x = *points.get([p, j]).unwrap();
                *shifted.get_mut([0, j]).unwrap() = if j == d { x + h } else { x };
                *shifted.get_mut([1, j]).unwrap() = if j == d { x - h } else { x };
            }
            let nearby = tabulate(e, &shifted, 1);
            let mut alpha = vec![0; tdim];
            alpha[d] = 1;
            for b in 0..e.dim() {
                let fd = (*nearby.get([0, 0, b, 0]).unwrap() - *nearby.get([0, 1, b, 0]).unwrap())
                    / (2.0 * h);
                assert_relative_eq!(
                    *data.get([derivative_index(&alpha), p, b, 0]).unwrap(),
                    fd,
                    epsilon = 1e-5,
                    max_relative = 1e-5
                );
                for j in 0..tdim {
                    let mut first = vec![0; tdim];
                    first[j] = 1;
                    let mut second = alpha.clone();
                    second[j] += 1;
                    let k = derivative_index(&first);
                    let fd = (*nearby.get([k, 0, b, 0]).unwrap()
                        - *nearby.get([k, 1, b, 0]).unwrap())
                        / (2.0 * h);
                    assert_relative_eq!(
                        *data.get([derivative_index(&second), p, b, 0]).unwrap(),
                        fd,
                        epsilon = 1e-4,
                        max_relative = 1e-5
                    );
                }
            }
        }
    }
}

/// Basis functions not associated with the closure of a sub-entity vanish on it
fn check_closure(e: &CiarletElement<f64>) {
    let cell = e.cell_type();
    let tdim = reference_cell::dim(cell);
    for (d, types) in reference_cell::entity_types(cell).iter().enumerate().take(tdim) {
        for (n, entity_type) in types.iter().enumerate() {
            let points = if d == 0 {
                rlst_dynamic_array2!(f64, [1, 0])
            } else {
                random_points(*entity_type, 4, 4)
            };
            let table = e.tabulate_entity(0, &points, Some((d, n))).unwrap();
            let values = &table[&vec![0; tdim]];
            let closure = e.entity_closure_dofs(d, n).unwrap();
            for b in (0..e.dim()).filter(|b| !closure.contains(b)) {
                for p in 0..values.shape()[2] {
                    assert_relative_eq!(*values.get([b, 0, p]).unwrap(), 0.0, epsilon = 1e-10);
                }
            }
        }
    }
}

macro_rules! test_lagrange_properties {
    ($($cell:ident, $degree:literal),+) => {
    $(
        paste! {
            #[test]
            fn [<test_lagrange_ $cell:lower _ $degree>]() {
                let e = lagrange::create::<f64>(
                    ReferenceCellType::[<$cell>],
                    $degree,
                    Continuity::Continuous,
                )
                .unwrap();
                check_dual_identity(&e);
                check_partition_of_unity(&e);
                check_reproduction(&e, $degree);
                check_derivatives(&e);
                check_closure(&e);
            }
        }
    )*
    };
}

test_lagrange_properties!(
    Interval, 1, Interval, 4, Triangle, 1, Triangle, 2, Triangle, 4, Quadrilateral, 1,
    Quadrilateral, 3, Tetrahedron, 1, Tetrahedron, 3, Hexahedron, 1, Hexahedron, 2
);

#[test]
fn test_other_families() {
    let e = gauss_lobatto_legendre::create::<f64>(
        ReferenceCellType::Interval,
        5,
        Continuity::Continuous,
    )
    .unwrap();
    check_dual_identity(&e);
    check_partition_of_unity(&e);
    check_reproduction(&e, 5);
    check_derivatives(&e);
    check_closure(&e);

    for cell in [ReferenceCellType::Triangle, ReferenceCellType::Hexahedron] {
        let e = legendre::create::<f64>(cell, 2).unwrap();
        check_dual_identity(&e);
        check_derivatives(&e);
    }

    let e = bubble::create::<f64>(ReferenceCellType::Tetrahedron, 5).unwrap();
    assert_eq!(e.dim(), 4);
    check_dual_identity(&e);
    check_derivatives(&e);
    check_closure(&e);

    let p1 = lagrange::create::<f64>(ReferenceCellType::Tetrahedron, 1, Continuity::Continuous)
        .unwrap();
    let b = bubble::create::<f64>(ReferenceCellType::Tetrahedron, 4).unwrap();
    let mini = enriched::create(&p1, &b).unwrap();
    assert_eq!(mini.dim(), 5);
    check_dual_identity(&mini);
    check_partition_of_unity(&mini);
    check_closure(&mini);
}

#[test]
fn test_discontinuous_lagrange() {
    let e = lagrange::create::<f64>(ReferenceCellType::Triangle, 3, Continuity::Discontinuous)
        .unwrap();
    check_dual_identity(&e);
    check_partition_of_unity(&e);
    check_reproduction(&e, 3);
    for v in 0..3 {
        assert_eq!(e.entity_closure_dofs(0, v).unwrap().len(), 0);
    }
    assert_eq!(e.entity_closure_dofs(2, 0).unwrap().len(), 10);
}

#[test]
fn test_interval_p1_midpoint() {
    let e = lagrange::create::<f64>(ReferenceCellType::Interval, 1, Continuity::Continuous)
        .unwrap();
    let mut points = rlst_dynamic_array2!(f64, [1, 1]);
    *points.get_mut([0, 0]).unwrap() = 0.5;
    let table = e.tabulate_entity(0, &points, None).unwrap();
    assert_eq!(table.len(), 1);
    let values = &table[&vec![0]];
    assert_eq!(values.shape(), [2, 1, 1]);
    assert_relative_eq!(*values.get([0, 0, 0]).unwrap(), 0.5, epsilon = 1e-14);
    assert_relative_eq!(*values.get([1, 0, 0]).unwrap(), 0.5, epsilon = 1e-14);
}

#[test]
fn test_interval_p2_vertex() {
    let e = lagrange::create::<f64>(ReferenceCellType::Interval, 2, Continuity::Continuous)
        .unwrap();
    let points = rlst_dynamic_array2!(f64, [1, 1]);
    let table = e.tabulate_entity(0, &points, None).unwrap();
    let values = &table[&vec![0]];
    for (b, expected) in [1.0, 0.0, 0.0].iter().enumerate() {
        assert_relative_eq!(*values.get([b, 0, 0]).unwrap(), *expected, epsilon = 1e-14);
    }
}

#[test]
fn test_zero_beyond_degree() {
    let e = lagrange::create::<f64>(ReferenceCellType::Triangle, 2, Continuity::Continuous)
        .unwrap();
    let points = random_points(ReferenceCellType::Triangle, 4, 5);
    let table = e.tabulate_entity(4, &points, None).unwrap();
    assert_eq!(table.len(), 15);
    for alpha in multi_indices(2, 4) {
        if alpha.iter().sum::<usize>() > 2 {
            let values = &table[&alpha];
            for b in 0..6 {
                for p in 0..4 {
                    assert_eq!(*values.get([b, 0, p]).unwrap(), 0.0);
                }
            }
        }
    }
    // Second derivatives of quadratics are constant
    let dxx = &table[&vec![2, 0]];
    for b in 0..6 {
        for p in 1..4 {
            assert_relative_eq!(
                *dxx.get([b, 0, p]).unwrap(),
                *dxx.get([b, 0, 0]).unwrap(),
                epsilon = 1e-10
            );
        }
    }
}

#[test]
fn test_zero_points() {
    let e = lagrange::create::<f64>(ReferenceCellType::Quadrilateral, 2, Continuity::Continuous)
        .unwrap();
    let points = rlst_dynamic_array2!(f64, [0, 2]);
    let table = e.tabulate_entity(1, &points, None).unwrap();
    assert_eq!(table.len(), 3);
    for values in table.values() {
        assert_eq!(values.shape(), [9, 1, 0]);
    }
}

#[test]
fn test_tabulate_errors() {
    let e = lagrange::create::<f64>(ReferenceCellType::Triangle, 1, Continuity::Continuous)
        .unwrap();
    let points = rlst_dynamic_array2!(f64, [2, 3]);
    let mut data = rlst_dynamic_array4!(f64, e.tabulate_array_shape(0, 2));
    assert!(e.tabulate(&points, 0, &mut data).is_err());
    let points = rlst_dynamic_array2!(f64, [2, 2]);
    let mut data = rlst_dynamic_array4!(f64, e.tabulate_array_shape(1, 2));
    assert!(e.tabulate(&points, 0, &mut data).is_err());
    assert!(e.tabulate_entity(0, &points, Some((3, 0))).is_err());
}
