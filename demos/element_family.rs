use ciarlet::ciarlet::LagrangeElementFamily;
use ciarlet::traits::{ElementFamily, FiniteElement};
use ciarlet::types::{Continuity, ReferenceCellType};

extern crate blas_src;
extern crate lapack_src;

fn main() {
    // Create the degree 2 Lagrange element family. A family is a set of finite elements with the
    // same family type, degree, and continuity across a set of cells
    let family = LagrangeElementFamily::<f64>::new(2, Continuity::Continuous);

    for cell in [
        ReferenceCellType::Triangle,
        ReferenceCellType::Quadrilateral,
        ReferenceCellType::Tetrahedron,
    ] {
        let element = family.element(cell).unwrap();
        println!(
            "Cell: {:?}, number of basis functions: {}",
            element.cell_type(),
            element.dim()
        );
    }
}
