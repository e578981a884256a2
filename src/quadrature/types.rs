//! Type definitions.
use rlst::{rlst_dynamic_array2, DynamicArray, RandomAccessMut, RlstScalar};

/// Definition of a numerical quadrature rule.
#[derive(Debug, Clone)]
pub struct QuadratureRule {
    /// The dimension d of a single point.
    pub dim: usize,

    /// The polynomial degree integrated exactly by the rule.
    ///
    /// On quadrilaterals and hexahedra this is the degree in each coordinate direction.
    pub degree: usize,

    /// The number of points of the quadrature rule.
    pub npoints: usize,

    /// The weights of the quadrature rule.
    pub weights: Vec<f64>,
    /// The point coordinates of the quadrature rule.
    ///
    /// A single point has the coordinates p_1, p_2, ..., p_d,
    /// with d being the dimension of the point (typically, 1, 2, or 3).
    /// The vector points stores all points in consecutive order.
    /// Hence, the first point starts at position zero, the second point at
    /// position d, and the third point at position 2d.
    pub points: Vec<f64>,
}

impl QuadratureRule {
    /// The coordinates of a point
    pub fn point(&self, index: usize) -> &[f64] {
        &self.points[index * self.dim..(index + 1) * self.dim]
    }

    /// The points as an array of shape \[npoints, dim\]
    pub fn points_array<T: RlstScalar>(&self) -> DynamicArray<T::Real, 2> {
        let mut points = rlst_dynamic_array2!(T::Real, [self.npoints, self.dim]);
        for p in 0..self.npoints {
            for (d, x) in self.point(p).iter().enumerate() {
                *points.get_mut([p, d]).unwrap() = num::cast::<f64, T::Real>(*x).unwrap();
            }
        }
        points
    }
}
