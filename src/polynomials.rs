//! Orthonormal polynomials
//!
//! The expansion set of degree n on each cell is an L2-orthonormal basis of the polynomials of
//! degree n (simplices) or of degree n in each variable (quadrilaterals and hexahedra).
//! Derivatives are obtained by differentiating the three-term recurrences, so every derivative
//! table up to the requested order is filled in a single pass.

use crate::error::ElementError;
use crate::reference_cell;
use crate::types::{MultiIndex, ReferenceCellType};
use rlst::{rlst_dynamic_array3, RandomAccessByRef, RandomAccessMut, RlstScalar, Shape};

/// Read a coordinate of a point
fn coordinate<T: RlstScalar, Array2: RandomAccessByRef<2, Item = T::Real>>(
    points: &Array2,
    point: usize,
    direction: usize,
) -> T {
    T::from(*points.get([point, direction]).unwrap()).unwrap()
}

/// Coefficients (a1, a2, a3) of the recurrence P_{n+1} = (a1 x + a2) P_n - a3 P_{n-1}
/// satisfied by the Jacobi polynomials P_n^(alpha, 0)
fn jacobi_coefficients<T: RlstScalar>(alpha: usize, n: usize) -> (T, T, T) {
    let a = alpha as f64;
    let n = n as f64;
    let a1 = (2.0 * n + a + 1.0) * (2.0 * n + a + 2.0) / (2.0 * (n + 1.0) * (n + a + 1.0));
    let a2 = a * a * (2.0 * n + a + 1.0) / (2.0 * (n + 1.0) * (n + a + 1.0) * (2.0 * n + a));
    let a3 = n * (n + a) * (2.0 * n + a + 2.0) / ((n + 1.0) * (n + a + 1.0) * (2.0 * n + a));
    (
        T::from(a1).unwrap(),
        T::from(a2).unwrap(),
        T::from(a3).unwrap(),
    )
}

/// Tabulate orthonormal polynomials on an interval, using one coordinate of the points
fn tabulate_legendre_polynomials_interval<
    T: RlstScalar,
    Array2: RandomAccessByRef<2, Item = T::Real> + Shape<2>,
    Array3Mut: RandomAccessMut<3, Item = T> + RandomAccessByRef<3, Item = T> + Shape<3>,
>(
    points: &Array2,
    direction: usize,
    degree: usize,
    derivatives: usize,
    data: &mut Array3Mut,
) {
    let npts = points.shape()[0];
    for i in 0..npts {
        *data.get_mut([0, 0, i]).unwrap() = T::from(1.0).unwrap();
    }

    for k in 0..derivatives + 1 {
        for p in 1..degree + 1 {
            let a = T::from(1.0).unwrap() - T::from(1.0).unwrap() / T::from(p).unwrap();
            let b = (a + T::from(1.0).unwrap())
                * T::sqrt(T::from((2 * p + 1) as f64 / (2 * p - 1) as f64).unwrap());
            let c = if p > 1 {
                a * T::sqrt(T::from((2 * p + 1) as f64 / (2 * p - 3) as f64).unwrap())
            } else {
                T::from(0.0).unwrap()
            };
            for i in 0..npts {
                let x = coordinate::<T, _>(points, i, direction);
                let mut value = (x * T::from(2.0).unwrap() - T::from(1.0).unwrap())
                    * *data.get([k, p - 1, i]).unwrap()
                    * b;
                if p > 1 {
                    value -= *data.get([k, p - 2, i]).unwrap() * c;
                }
                if k > 0 {
                    value += T::from(2 * k).unwrap() * *data.get([k - 1, p - 1, i]).unwrap() * b;
                }
                *data.get_mut([k, p, i]).unwrap() = value;
            }
        }
    }
}

fn tri_index(i: usize, j: usize) -> usize {
    (i + j + 1) * (i + j) / 2 + j
}

fn tet_index(i: usize, j: usize, k: usize) -> usize {
    let s = i + j + k;
    s * (s + 1) * (s + 2) / 6 + (j + k) * (j + k + 1) / 2 + k
}

fn quad_index(i: usize, j: usize, n: usize) -> usize {
    j * (n + 1) + i
}

fn hex_index(i: usize, j: usize, k: usize, n: usize) -> usize {
    (k * (n + 1) + j) * (n + 1) + i
}

/// Tabulate orthonormal polynomials on a quadrilateral
fn tabulate_legendre_polynomials_quadrilateral<
    T: RlstScalar,
    Array2: RandomAccessByRef<2, Item = T::Real> + Shape<2>,
    Array3Mut: RandomAccessMut<3, Item = T> + RandomAccessByRef<3, Item = T> + Shape<3>,
>(
    points: &Array2,
    degree: usize,
    derivatives: usize,
    data: &mut Array3Mut,
) {
    let npts = points.shape()[0];
    let mut tables = vec![];
    for direction in 0..2 {
        let mut table = rlst_dynamic_array3!(T, [derivatives + 1, degree + 1, npts]);
        tabulate_legendre_polynomials_interval(points, direction, degree, derivatives, &mut table);
        tables.push(table);
    }

    for kx in 0..derivatives + 1 {
        for ky in 0..derivatives + 1 - kx {
            for px in 0..degree + 1 {
                for py in 0..degree + 1 {
                    for i in 0..npts {
                        *data
                            .get_mut([tri_index(kx, ky), quad_index(px, py, degree), i])
                            .unwrap() = *tables[0].get([kx, px, i]).unwrap()
                            * *tables[1].get([ky, py, i]).unwrap();
                    }
                }
            }
        }
    }
}

/// Tabulate orthonormal polynomials on a hexahedron
fn tabulate_legendre_polynomials_hexahedron<
    T: RlstScalar,
    Array2: RandomAccessByRef<2, Item = T::Real> + Shape<2>,
    Array3Mut: RandomAccessMut<3, Item = T> + RandomAccessByRef<3, Item = T> + Shape<3>,
>(
    points: &Array2,
    degree: usize,
    derivatives: usize,
    data: &mut Array3Mut,
) {
    let npts = points.shape()[0];
    let mut tables = vec![];
    for direction in 0..3 {
        let mut table = rlst_dynamic_array3!(T, [derivatives + 1, degree + 1, npts]);
        tabulate_legendre_polynomials_interval(points, direction, degree, derivatives, &mut table);
        tables.push(table);
    }

    for kx in 0..derivatives + 1 {
        for ky in 0..derivatives + 1 - kx {
            for kz in 0..derivatives + 1 - kx - ky {
                for px in 0..degree + 1 {
                    for py in 0..degree + 1 {
                        for pz in 0..degree + 1 {
                            for i in 0..npts {
                                *data
                                    .get_mut([
                                        tet_index(kx, ky, kz),
                                        hex_index(px, py, pz, degree),
                                        i,
                                    ])
                                    .unwrap() = *tables[0].get([kx, px, i]).unwrap()
                                    * *tables[1].get([ky, py, i]).unwrap()
                                    * *tables[2].get([kz, pz, i]).unwrap();
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Tabulate orthonormal polynomials on a triangle
///
/// The polynomials are the Dubiner basis Q_p(x, y) J_q(2y - 1), where Q_p is a Legendre
/// polynomial in the collapsed coordinate scaled by (1 - y)^p and J_q is the Jacobi polynomial
/// with weight (1 - t)^(2p + 1). These are computed unscaled and normalised at the end.
fn tabulate_legendre_polynomials_triangle<
    T: RlstScalar,
    Array2: RandomAccessByRef<2, Item = T::Real> + Shape<2>,
    Array3Mut: RandomAccessMut<3, Item = T> + RandomAccessByRef<3, Item = T> + Shape<3>,
>(
    points: &Array2,
    degree: usize,
    derivatives: usize,
    data: &mut Array3Mut,
) {
    let npts = points.shape()[0];
    let one = T::from(1.0).unwrap();
    let two = T::from(2.0).unwrap();

    for i in 0..npts {
        *data.get_mut([tri_index(0, 0), tri_index(0, 0), i]).unwrap() = one;
    }

    for kx in 0..derivatives + 1 {
        for ky in 0..derivatives + 1 - kx {
            let k = tri_index(kx, ky);
            let fkx = T::from(kx).unwrap();
            let fky = T::from(ky).unwrap();

            for p in 1..degree + 1 {
                let a = T::from((2 * p - 1) as f64 / p as f64).unwrap();
                for i in 0..npts {
                    let x = coordinate::<T, _>(points, i, 0);
                    let y = coordinate::<T, _>(points, i, 1);
                    let d = |kx: usize, ky: usize, p: usize| {
                        *data.get([tri_index(kx, ky), tri_index(p, 0), i]).unwrap()
                    };
                    let mut value = (x * two + y - one) * d(kx, ky, p - 1) * a;
                    if kx > 0 {
                        value += two * fkx * a * d(kx - 1, ky, p - 1);
                    }
                    if ky > 0 {
                        value += fky * a * d(kx, ky - 1, p - 1);
                    }
                    if p > 1 {
                        // Leibniz rule applied to (1 - y)^2 Q_{p-2}
                        let f = one - y;
                        let mut w = f * f * d(kx, ky, p - 2);
                        if ky > 0 {
                            w -= two * fky * f * d(kx, ky - 1, p - 2);
                        }
                        if ky > 1 {
                            w += fky * (fky - one) * d(kx, ky - 2, p - 2);
                        }
                        value -= (a - one) * w;
                    }
                    *data.get_mut([k, tri_index(p, 0), i]).unwrap() = value;
                }
            }

            for p in 0..degree {
                for q in 0..degree - p {
                    let (a1, a2, a3) = jacobi_coefficients::<T>(2 * p + 1, q);
                    for i in 0..npts {
                        let y = coordinate::<T, _>(points, i, 1);
                        let d = |kx: usize, ky: usize, q: usize| {
                            *data.get([tri_index(kx, ky), tri_index(p, q), i]).unwrap()
                        };
                        let mut value = d(kx, ky, q) * ((y * two - one) * a1 + a2);
                        if ky > 0 {
                            value += two * fky * a1 * d(kx, ky - 1, q);
                        }
                        if q > 0 {
                            value -= a3 * d(kx, ky, q - 1);
                        }
                        *data.get_mut([k, tri_index(p, q + 1), i]).unwrap() = value;
                    }
                }
            }
        }
    }

    for k in 0..data.shape()[0] {
        for p in 0..degree + 1 {
            for q in 0..degree + 1 - p {
                let norm = T::sqrt(T::from(((2 * p + 1) * (2 * p + 2 * q + 2)) as f64).unwrap());
                for i in 0..npts {
                    *data.get_mut([k, tri_index(p, q), i]).unwrap() *= norm;
                }
            }
        }
    }
}

/// Tabulate orthonormal polynomials on a tetrahedron
///
/// The polynomials are the products Q_p R_pq S_pqr of a scaled Legendre polynomial in the
/// first collapsed coordinate, a scaled Jacobi polynomial (weight (1 - t)^(2p + 1)) in the
/// second, and a Jacobi polynomial (weight (1 - t)^(2p + 2q + 2)) in 2z - 1.
fn tabulate_legendre_polynomials_tetrahedron<
    T: RlstScalar,
    Array2: RandomAccessByRef<2, Item = T::Real> + Shape<2>,
    Array3Mut: RandomAccessMut<3, Item = T> + RandomAccessByRef<3, Item = T> + Shape<3>,
>(
    points: &Array2,
    degree: usize,
    derivatives: usize,
    data: &mut Array3Mut,
) {
    let npts = points.shape()[0];
    let one = T::from(1.0).unwrap();
    let two = T::from(2.0).unwrap();

    for i in 0..npts {
        *data.get_mut([0, 0, i]).unwrap() = one;
    }

    for kx in 0..derivatives + 1 {
        for ky in 0..derivatives + 1 - kx {
            for kz in 0..derivatives + 1 - kx - ky {
                let k = tet_index(kx, ky, kz);
                let fkx = T::from(kx).unwrap();
                let fky = T::from(ky).unwrap();
                let fkz = T::from(kz).unwrap();

                for p in 1..degree + 1 {
                    let a = T::from((2 * p - 1) as f64 / p as f64).unwrap();
                    for i in 0..npts {
                        let x = coordinate::<T, _>(points, i, 0);
                        let y = coordinate::<T, _>(points, i, 1);
                        let z = coordinate::<T, _>(points, i, 2);
                        let d = |kx: usize, ky: usize, kz: usize, p: usize| {
                            *data
                                .get([tet_index(kx, ky, kz), tet_index(p, 0, 0), i])
                                .unwrap()
                        };
                        let mut value = (x * two + y + z - one) * d(kx, ky, kz, p - 1) * a;
                        if kx > 0 {
                            value += two * fkx * a * d(kx - 1, ky, kz, p - 1);
                        }
                        if ky > 0 {
                            value += fky * a * d(kx, ky - 1, kz, p - 1);
                        }
                        if kz > 0 {
                            value += fkz * a * d(kx, ky, kz - 1, p - 1);
                        }
                        if p > 1 {
                            // Leibniz rule applied to (1 - y - z)^2 Q_{p-2}
                            let f = one - y - z;
                            let mut w = f * f * d(kx, ky, kz, p - 2);
                            if ky > 0 {
                                w -= two * fky * f * d(kx, ky - 1, kz, p - 2);
                            }
                            if kz > 0 {
                                w -= two * fkz * f * d(kx, ky, kz - 1, p - 2);
                            }
                            if ky > 1 {
                                w += fky * (fky - one) * d(kx, ky - 2, kz, p - 2);
                            }
                            if ky > 0 && kz > 0 {
                                w += two * fky * fkz * d(kx, ky - 1, kz - 1, p - 2);
                            }
                            if kz > 1 {
                                w += fkz * (fkz - one) * d(kx, ky, kz - 2, p - 2);
                            }
                            value -= (a - one) * w;
                        }
                        *data.get_mut([k, tet_index(p, 0, 0), i]).unwrap() = value;
                    }
                }

                for p in 0..degree {
                    for q in 0..degree - p {
                        let (a1, a2, a3) = jacobi_coefficients::<T>(2 * p + 1, q);
                        for i in 0..npts {
                            let y = coordinate::<T, _>(points, i, 1);
                            let z = coordinate::<T, _>(points, i, 2);
                            let d = |kx: usize, ky: usize, kz: usize, q: usize| {
                                *data
                                    .get([tet_index(kx, ky, kz), tet_index(p, q, 0), i])
                                    .unwrap()
                            };
                            let mut value =
                                (a1 * (y * two + z - one) + a2 * (one - z)) * d(kx, ky, kz, q);
                            if ky > 0 {
                                value += two * fky * a1 * d(kx, ky - 1, kz, q);
                            }
                            if kz > 0 {
                                value += fkz * (a1 - a2) * d(kx, ky, kz - 1, q);
                            }
                            if q > 0 {
                                // Leibniz rule applied to (1 - z)^2 R_{q-1}
                                let f = one - z;
                                let mut w = f * f * d(kx, ky, kz, q - 1);
                                if kz > 0 {
                                    w -= two * fkz * f * d(kx, ky, kz - 1, q - 1);
                                }
                                if kz > 1 {
                                    w += fkz * (fkz - one) * d(kx, ky, kz - 2, q - 1);
                                }
                                value -= a3 * w;
                            }
                            *data.get_mut([k, tet_index(p, q + 1, 0), i]).unwrap() = value;
                        }
                    }
                }

                for p in 0..degree {
                    for q in 0..degree - p {
                        for r in 0..degree - p - q {
                            let (a1, a2, a3) = jacobi_coefficients::<T>(2 * p + 2 * q + 2, r);
                            for i in 0..npts {
                                let z = coordinate::<T, _>(points, i, 2);
                                let d = |kx: usize, ky: usize, kz: usize, r: usize| {
                                    *data
                                        .get([tet_index(kx, ky, kz), tet_index(p, q, r), i])
                                        .unwrap()
                                };
                                let mut value = d(kx, ky, kz, r) * ((z * two - one) * a1 + a2);
                                if kz > 0 {
                                    value += two * fkz * a1 * d(kx, ky, kz - 1, r);
                                }
                                if r > 0 {
                                    value -= a3 * d(kx, ky, kz, r - 1);
                                }
                                *data.get_mut([k, tet_index(p, q, r + 1), i]).unwrap() = value;
                            }
                        }
                    }
                }
            }
        }
    }

    for k in 0..data.shape()[0] {
        for p in 0..degree + 1 {
            for q in 0..degree + 1 - p {
                for r in 0..degree + 1 - p - q {
                    let norm = T::sqrt(
                        T::from(
                            ((2 * p + 1) * (2 * p + 2 * q + 2) * (2 * p + 2 * q + 2 * r + 3))
                                as f64,
                        )
                        .unwrap(),
                    );
                    for i in 0..npts {
                        *data.get_mut([k, tet_index(p, q, r), i]).unwrap() *= norm;
                    }
                }
            }
        }
    }
}

/// The number of polynomials
pub fn polynomial_count(cell_type: ReferenceCellType, degree: usize) -> usize {
    match cell_type {
        ReferenceCellType::Point => 1,
        ReferenceCellType::Interval => degree + 1,
        ReferenceCellType::Triangle => (degree + 1) * (degree + 2) / 2,
        ReferenceCellType::Quadrilateral => (degree + 1) * (degree + 1),
        ReferenceCellType::Tetrahedron => (degree + 1) * (degree + 2) * (degree + 3) / 6,
        ReferenceCellType::Hexahedron => (degree + 1) * (degree + 1) * (degree + 1),
    }
}

/// The total number of partial derivatives up to a give degree
pub fn derivative_count(cell_type: ReferenceCellType, derivatives: usize) -> usize {
    match reference_cell::dim(cell_type) {
        0 => 1,
        1 => derivatives + 1,
        2 => (derivatives + 1) * (derivatives + 2) / 2,
        _ => (derivatives + 1) * (derivatives + 2) * (derivatives + 3) / 6,
    }
}

/// The highest total degree of any polynomial in the expansion set
///
/// Derivatives of higher order than this are identically zero.
pub fn highest_degree(cell_type: ReferenceCellType, degree: usize) -> usize {
    if reference_cell::is_simplex(cell_type) {
        degree
    } else {
        reference_cell::dim(cell_type) * degree
    }
}

/// The position of a partial derivative in a tabulated array
///
/// Derivatives are ordered by total order, then lexicographically with the first direction
/// decreasing. In 2D the order is (0,0), (1,0), (0,1), (2,0), (1,1), (0,2), ...
pub fn derivative_index(alpha: &[usize]) -> usize {
    match alpha.len() {
        0 => 0,
        1 => alpha[0],
        2 => tri_index(alpha[0], alpha[1]),
        _ => tet_index(alpha[0], alpha[1], alpha[2]),
    }
}

/// All multi-indices of total order at most `derivatives`, in tabulation order
pub fn multi_indices(tdim: usize, derivatives: usize) -> Vec<MultiIndex> {
    let mut indices = vec![];
    for total in 0..derivatives + 1 {
        match tdim {
            0 => {
                if total == 0 {
                    indices.push(vec![]);
                }
            }
            1 => indices.push(vec![total]),
            2 => {
                for ky in 0..total + 1 {
                    indices.push(vec![total - ky, ky]);
                }
            }
            _ => {
                for t in 0..total + 1 {
                    for kz in 0..t + 1 {
                        indices.push(vec![total - t, t - kz, kz]);
                    }
                }
            }
        }
    }
    indices
}

/// The positions of the polynomials of one expansion set inside a larger one
///
/// Entry i is the index in the degree `to` set of polynomial i of the degree `from` set.
pub fn embedding_indices(cell_type: ReferenceCellType, from: usize, to: usize) -> Vec<usize> {
    match cell_type {
        ReferenceCellType::Quadrilateral => (0..from + 1)
            .flat_map(|py| (0..from + 1).map(move |px| quad_index(px, py, to)))
            .collect(),
        ReferenceCellType::Hexahedron => (0..from + 1)
            .flat_map(|pz| {
                (0..from + 1).flat_map(move |py| {
                    (0..from + 1).map(move |px| hex_index(px, py, pz, to))
                })
            })
            .collect(),
        _ => (0..polynomial_count(cell_type, from)).collect(),
    }
}

/// The shape of a table containing the values of Legendre polynomials
pub fn legendre_shape<T, Array2: RandomAccessByRef<2, Item = T> + Shape<2>>(
    cell_type: ReferenceCellType,
    points: &Array2,
    degree: usize,
    derivatives: usize,
) -> [usize; 3] {
    [
        derivative_count(cell_type, derivatives),
        polynomial_count(cell_type, degree),
        points.shape()[0],
    ]
}

/// Tabulate orthonormal polynomials
///
/// `points` has shape \[npoints, tdim\] and `data` must have the shape given by
/// [legendre_shape]. Entry \[k, i, j\] of `data` is set to derivative k (see
/// [derivative_index]) of polynomial i at point j.
pub fn tabulate_legendre_polynomials<
    T: RlstScalar,
    Array2: RandomAccessByRef<2, Item = T::Real> + Shape<2>,
    Array3Mut: RandomAccessMut<3, Item = T> + RandomAccessByRef<3, Item = T> + Shape<3>,
>(
    cell_type: ReferenceCellType,
    points: &Array2,
    degree: usize,
    derivatives: usize,
    data: &mut Array3Mut,
) -> Result<(), ElementError> {
    let tdim = reference_cell::dim(cell_type);
    let [npts, pdim] = points.shape();
    if pdim != tdim {
        return Err(ElementError::ShapeMismatch {
            what: "Points",
            expected: vec![npts, tdim],
            found: vec![npts, pdim],
        });
    }
    let expected = legendre_shape(cell_type, points, degree, derivatives);
    if data.shape() != expected {
        return Err(ElementError::ShapeMismatch {
            what: "Legendre polynomial table",
            expected: expected.to_vec(),
            found: data.shape().to_vec(),
        });
    }

    let [nderivs, npolys, npts] = expected;
    for k in 0..nderivs {
        for p in 0..npolys {
            for i in 0..npts {
                *data.get_mut([k, p, i]).unwrap() = T::from(0.0).unwrap();
            }
        }
    }

    match cell_type {
        ReferenceCellType::Point => {
            for i in 0..npts {
                *data.get_mut([0, 0, i]).unwrap() = T::from(1.0).unwrap();
            }
        }
        ReferenceCellType::Interval => {
            tabulate_legendre_polynomials_interval(points, 0, degree, derivatives, data)
        }
        ReferenceCellType::Triangle => {
            tabulate_legendre_polynomials_triangle(points, degree, derivatives, data)
        }
        ReferenceCellType::Quadrilateral => {
            tabulate_legendre_polynomials_quadrilateral(points, degree, derivatives, data)
        }
        ReferenceCellType::Tetrahedron => {
            tabulate_legendre_polynomials_tetrahedron(points, degree, derivatives, data)
        }
        ReferenceCellType::Hexahedron => {
            tabulate_legendre_polynomials_hexahedron(points, degree, derivatives, data)
        }
    };
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::quadrature::make_quadrature;
    use approx::assert_relative_eq;
    use paste::paste;
    use rlst::{rlst_dynamic_array2, DynamicArray};

    fn make_points(cell: ReferenceCellType, pts: &[Vec<f64>]) -> DynamicArray<f64, 2> {
        let mut points = rlst_dynamic_array2!(f64, [pts.len(), reference_cell::dim(cell)]);
        for (i, p) in pts.iter().enumerate() {
            for (j, x) in p.iter().enumerate() {
                *points.get_mut([i, j]).unwrap() = *x;
            }
        }
        points
    }

    /// Points inside the cell, each followed by a copy shifted by epsilon in each direction
    fn shifted_points(cell: ReferenceCellType, epsilon: f64) -> DynamicArray<f64, 2> {
        let tdim = reference_cell::dim(cell);
        let mut pts = vec![];
        let n = 6;
        for i in 0..n {
            for j in 0..if tdim > 1 { n } else { 1 } {
                for k in 0..if tdim > 2 { n } else { 1 } {
                    let p = [i, j, k][..tdim]
                        .iter()
                        .map(|c| (*c as f64 + 0.5) / (n as f64 + 1.0) / tdim as f64)
                        .collect::<Vec<_>>();
                    pts.push(p.clone());
                    for d in 0..tdim {
                        let mut q = p.clone();
                        q[d] += epsilon;
                        pts.push(q);
                    }
                }
            }
        }
        make_points(cell, &pts)
    }

    macro_rules! test_polynomials {

        ($($cell:ident, $degree:expr),+) => {

        $(
            paste! {

                #[test]
                fn [<test_legendre_ $cell:lower>]() {
                    let cell = ReferenceCellType::[<$cell>];
                    let degree = $degree;
                    let rule = make_quadrature(cell, 2 * degree).unwrap();
                    let points = rule.points_array::<f64>();

                    let mut data = rlst_dynamic_array3!(f64, legendre_shape(cell, &points, degree, 0));
                    tabulate_legendre_polynomials(cell, &points, degree, 0, &mut data).unwrap();

                    for i in 0..data.shape()[1] {
                        for j in 0..data.shape()[1] {
                            let mut product = 0.0;
                            for k in 0..rule.npoints {
                                product += data.get([0, i, k]).unwrap()
                                    * data.get([0, j, k]).unwrap()
                                    * rule.weights[k];
                            }
                            if i == j {
                                assert_relative_eq!(product, 1.0, epsilon = 1e-12);
                            } else {
                                assert_relative_eq!(product, 0.0, epsilon = 1e-12);
                            }
                        }
                    }
                }

                #[test]
                fn [<test_legendre_ $cell:lower _derivative>]() {
                    let cell = ReferenceCellType::[<$cell>];
                    let degree = $degree;
                    let tdim = reference_cell::dim(cell);
                    let epsilon = 1e-8;
                    let points = shifted_points(cell, epsilon);

                    let mut data = rlst_dynamic_array3!(f64, legendre_shape(cell, &points, degree, 2));
                    tabulate_legendre_polynomials(cell, &points, degree, 2, &mut data).unwrap();

                    for i in 0..data.shape()[1] {
                        for k in 0..points.shape()[0] / (tdim + 1) {
                            let base = (tdim + 1) * k;
                            for d in 0..tdim {
                                let mut alpha = vec![0; tdim];
                                alpha[d] = 1;
                                // First derivatives
                                assert_relative_eq!(
                                    *data.get([derivative_index(&alpha), i, base]).unwrap(),
                                    (data.get([0, i, base + 1 + d]).unwrap()
                                        - data.get([0, i, base]).unwrap())
                                        / epsilon,
                                    epsilon = 1e-3,
                                    max_relative = 1e-4
                                );
                                // Second derivatives
                                for e in 0..tdim {
                                    let mut beta = alpha.clone();
                                    beta[e] += 1;
                                    assert_relative_eq!(
                                        *data.get([derivative_index(&beta), i, base]).unwrap(),
                                        (data.get([derivative_index(&alpha), i, base + 1 + e]).unwrap()
                                            - data.get([derivative_index(&alpha), i, base]).unwrap())
                                            / epsilon,
                                        epsilon = 1e-2,
                                        max_relative = 1e-4
                                    );
                                }
                            }
                        }
                    }
                }

                #[test]
                fn [<test_legendre_ $cell:lower _beyond_degree>]() {
                    let cell = ReferenceCellType::[<$cell>];
                    let degree = $degree;
                    let tdim = reference_cell::dim(cell);
                    let order = highest_degree(cell, degree) + 1;
                    let points = shifted_points(cell, 0.01);

                    let mut data = rlst_dynamic_array3!(f64, legendre_shape(cell, &points, degree, order));
                    tabulate_legendre_polynomials(cell, &points, degree, order, &mut data).unwrap();

                    for alpha in multi_indices(tdim, order) {
                        if alpha.iter().sum::<usize>() == order {
                            for i in 0..data.shape()[1] {
                                for k in 0..data.shape()[2] {
                                    assert_relative_eq!(
                                        *data.get([derivative_index(&alpha), i, k]).unwrap(),
                                        0.0,
                                        epsilon = 1e-8
                                    );
                                }
                            }
                        }
                    }
                }

            }
        )*
        };
    }

    test_polynomials!(
        Interval, 6,
        Triangle, 5,
        Quadrilateral, 4,
        Tetrahedron, 4,
        Hexahedron, 2
    );

    #[test]
    fn test_multi_indices() {
        for tdim in 1..4 {
            for (i, alpha) in multi_indices(tdim, 4).iter().enumerate() {
                assert_eq!(alpha.len(), tdim);
                assert_eq!(derivative_index(alpha), i);
            }
        }
        assert_eq!(
            multi_indices(2, 2),
            vec![
                vec![0, 0],
                vec![1, 0],
                vec![0, 1],
                vec![2, 0],
                vec![1, 1],
                vec![0, 2]
            ]
        );
        assert_eq!(
            multi_indices(3, 3).len(),
            derivative_count(ReferenceCellType::Tetrahedron, 3)
        );
    }

    #[test]
    fn test_embedding() {
        let points = make_points(
            ReferenceCellType::Quadrilateral,
            &[vec![0.1, 0.2], vec![0.7, 0.4], vec![0.3, 0.9]],
        );
        let mut low = rlst_dynamic_array3!(
            f64,
            legendre_shape(ReferenceCellType::Quadrilateral, &points, 1, 0)
        );
        let mut high = rlst_dynamic_array3!(
            f64,
            legendre_shape(ReferenceCellType::Quadrilateral, &points, 3, 0)
        );
        tabulate_legendre_polynomials(ReferenceCellType::Quadrilateral, &points, 1, 0, &mut low)
            .unwrap();
        tabulate_legendre_polynomials(ReferenceCellType::Quadrilateral, &points, 3, 0, &mut high)
            .unwrap();
        for (i, j) in embedding_indices(ReferenceCellType::Quadrilateral, 1, 3)
            .iter()
            .enumerate()
        {
            for k in 0..3 {
                assert_relative_eq!(
                    *low.get([0, i, k]).unwrap(),
                    *high.get([0, *j, k]).unwrap(),
                    epsilon = 1e-14
                );
            }
        }
    }

    #[test]
    fn test_shape_errors() {
        let points = make_points(ReferenceCellType::Triangle, &[vec![0.1, 0.2]]);
        let mut data = rlst_dynamic_array3!(f64, [1, 3, 1]);
        assert!(
            tabulate_legendre_polynomials(ReferenceCellType::Triangle, &points, 2, 0, &mut data)
                .is_err()
        );
        let mut data = rlst_dynamic_array3!(f64, [1, 2, 1]);
        assert!(
            tabulate_legendre_polynomials(ReferenceCellType::Interval, &points, 1, 0, &mut data)
                .is_err()
        );
    }

    #[test]
    fn test_legendre_triangle_against_known_polynomials() {
        let points = make_points(
            ReferenceCellType::Triangle,
            &[vec![0.0, 0.0], vec![0.2, 0.3], vec![0.5, 0.1], vec![0.1, 0.8]],
        );
        let mut data = rlst_dynamic_array3!(
            f64,
            legendre_shape(ReferenceCellType::Triangle, &points, 1, 1)
        );
        tabulate_legendre_polynomials(ReferenceCellType::Triangle, &points, 1, 1, &mut data)
            .unwrap();

        for k in 0..points.shape()[0] {
            let x = *points.get([k, 0]).unwrap();
            let y = *points.get([k, 1]).unwrap();

            // 0 => sqrt(2)
            assert_relative_eq!(*data.get([0, 0, k]).unwrap(), f64::sqrt(2.0), epsilon = 1e-12);
            assert_relative_eq!(*data.get([1, 0, k]).unwrap(), 0.0, epsilon = 1e-12);

            // 1 => 2*sqrt(3)*(2x + y - 1)
            assert_relative_eq!(
                *data.get([0, 1, k]).unwrap(),
                2.0 * f64::sqrt(3.0) * (2.0 * x + y - 1.0),
                epsilon = 1e-12
            );
            assert_relative_eq!(
                *data.get([1, 1, k]).unwrap(),
                4.0 * f64::sqrt(3.0),
                epsilon = 1e-12
            );
            assert_relative_eq!(
                *data.get([2, 1, k]).unwrap(),
                2.0 * f64::sqrt(3.0),
                epsilon = 1e-12
            );

            // 2 => 2*(3y - 1)
            assert_relative_eq!(
                *data.get([0, 2, k]).unwrap(),
                2.0 * (3.0 * y - 1.0),
                epsilon = 1e-12
            );
            assert_relative_eq!(*data.get([2, 2, k]).unwrap(), 6.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_legendre_interval_against_known_polynomials() {
        let degree = 3;

        let mut points = rlst_dynamic_array2!(f64, [11, 1]);
        for i in 0..11 {
            *points.get_mut([i, 0]).unwrap() = i as f64 / 10.0;
        }

        let mut data = rlst_dynamic_array3!(
            f64,
            legendre_shape(ReferenceCellType::Interval, &points, degree, 3,)
        );
        tabulate_legendre_polynomials(ReferenceCellType::Interval, &points, degree, 3, &mut data)
            .unwrap();

        for k in 0..points.shape()[0] {
            let x = *points.get([k, 0]).unwrap();

            // 0 => 1
            assert_relative_eq!(*data.get([0, 0, k]).unwrap(), 1.0, epsilon = 1e-12);
            assert_relative_eq!(*data.get([1, 0, k]).unwrap(), 0.0, epsilon = 1e-12);

            // 1 => sqrt(3)*(2x - 1)
            assert_relative_eq!(
                *data.get([0, 1, k]).unwrap(),
                f64::sqrt(3.0) * (2.0 * x - 1.0),
                epsilon = 1e-12
            );
            assert_relative_eq!(
                *data.get([1, 1, k]).unwrap(),
                2.0 * f64::sqrt(3.0),
                epsilon = 1e-12
            );

            // 2 => sqrt(5)*(6x^2 - 6x + 1)
            assert_relative_eq!(
                *data.get([0, 2, k]).unwrap(),
                f64::sqrt(5.0) * (6.0 * x * x - 6.0 * x + 1.0),
                epsilon = 1e-12
            );
            assert_relative_eq!(
                *data.get([2, 2, k]).unwrap(),
                f64::sqrt(5.0) * 12.0,
                epsilon = 1e-12
            );

            // 3 => sqrt(7)*(20x^3 - 30x^2 + 12x - 1)
            assert_relative_eq!(
                *data.get([0, 3, k]).unwrap(),
                f64::sqrt(7.0) * (20.0 * x * x * x - 30.0 * x * x + 12.0 * x - 1.0),
                epsilon = 1e-12
            );
            assert_relative_eq!(
                *data.get([3, 3, k]).unwrap(),
                f64::sqrt(7.0) * 120.0,
                epsilon = 1e-12
            );
        }
    }

    #[test]
    fn test_legendre_quadrilateral_against_known_polynomials() {
        let points = make_points(
            ReferenceCellType::Quadrilateral,
            &[vec![0.0, 0.5], vec![0.3, 0.1], vec![0.9, 0.6]],
        );
        let mut data = rlst_dynamic_array3!(
            f64,
            legendre_shape(ReferenceCellType::Quadrilateral, &points, 2, 1)
        );
        tabulate_legendre_polynomials(ReferenceCellType::Quadrilateral, &points, 2, 1, &mut data)
            .unwrap();

        for k in 0..points.shape()[0] {
            let x = *points.get([k, 0]).unwrap();
            let y = *points.get([k, 1]).unwrap();

            // 4 => 3*(2x - 1)*(2y - 1)
            assert_relative_eq!(
                *data.get([0, 4, k]).unwrap(),
                3.0 * (2.0 * x - 1.0) * (2.0 * y - 1.0),
                epsilon = 1e-12
            );
            assert_relative_eq!(
                *data.get([1, 4, k]).unwrap(),
                6.0 * (2.0 * y - 1.0),
                epsilon = 1e-12
            );
            assert_relative_eq!(
                *data.get([2, 4, k]).unwrap(),
                6.0 * (2.0 * x - 1.0),
                epsilon = 1e-12
            );

            // 7 => sqrt(15)*(2x - 1)*(6y^2 - 6y + 1)
            assert_relative_eq!(
                *data.get([0, 7, k]).unwrap(),
                f64::sqrt(15.0) * (2.0 * x - 1.0) * (6.0 * y * y - 6.0 * y + 1.0),
                epsilon = 1e-12
            );
            assert_relative_eq!(
                *data.get([2, 7, k]).unwrap(),
                f64::sqrt(15.0) * (2.0 * x - 1.0) * (12.0 * y - 6.0),
                epsilon = 1e-12
            );
        }
    }
}
