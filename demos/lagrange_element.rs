use ciarlet::ciarlet::lagrange;
use ciarlet::traits::FiniteElement;
use ciarlet::types::{Continuity, ReferenceCellType};
use rlst::{rlst_dynamic_array2, rlst_dynamic_array4, RawAccess};

extern crate blas_src;
extern crate lapack_src;

fn main() {
    // Create a P2 element on a triangle
    let element = lagrange::create::<f64>(ReferenceCellType::Triangle, 2, Continuity::Continuous)
        .unwrap();

    println!("This element has {} basis functions.", element.dim());

    // Create an array to store the basis function values
    let mut basis_values = rlst_dynamic_array4!(f64, element.tabulate_array_shape(0, 1));
    // Create array containing the point [1/3, 1/3]
    let mut points = rlst_dynamic_array2!(f64, [1, 2]);
    points[[0, 0]] = 1.0 / 3.0;
    points[[0, 1]] = 1.0 / 3.0;
    // Tabulate the element's basis functions at the point
    element.tabulate(&points, 0, &mut basis_values).unwrap();
    println!(
        "The values of the basis functions at the point (1/3, 1/3) are: {:?}",
        basis_values.data()
    );

    // Set point to [1, 0]
    points[[0, 0]] = 1.0;
    points[[0, 1]] = 0.0;
    element.tabulate(&points, 0, &mut basis_values).unwrap();
    println!(
        "The values of the basis functions at the point (1, 0) are: {:?}",
        basis_values.data()
    );

    // The DOFs associated with the first edge, and with its closure
    println!("DOFs on edge 0: {:?}", element.entity_dofs(1, 0).unwrap());
    println!(
        "DOFs on the closure of edge 0: {:?}",
        element.entity_closure_dofs(1, 0).unwrap()
    );
}
