use ciarlet::ciarlet::CiarletElement;
use ciarlet::dual_set::{DualSet, EntityFunctionals};
use ciarlet::functionals::Functional;
use ciarlet::polynomial_set::PolynomialSet;
use ciarlet::reference_cell;
use ciarlet::traits::FiniteElement;
use ciarlet::types::{Continuity, Family, ReferenceCellType};
use rlst::{rlst_dynamic_array2, RandomAccessByRef, RandomAccessMut};

extern crate blas_src;
extern crate lapack_src;

fn main() {
    // A cubic Hermite element: values and first derivatives at the two vertices of an interval
    let cell = ReferenceCellType::Interval;
    let functionals: EntityFunctionals<f64> = [
        reference_cell::vertices::<f64>(cell)
            .iter()
            .map(|v| {
                vec![
                    Functional::point_evaluation(cell, 3, v).unwrap(),
                    Functional::point_derivative(cell, 3, v, &[1]).unwrap(),
                ]
            })
            .collect(),
        vec![vec![]],
        vec![],
        vec![],
    ];
    let element = CiarletElement::create(
        Family::Custom,
        3,
        PolynomialSet::orthonormal(cell, 3),
        DualSet::new(cell, functionals).unwrap(),
        Continuity::Continuous,
    )
    .unwrap();
    println!(
        "Created a custom element with {} basis functions (dual matrix residual {:e})",
        element.dim(),
        element.solve_residual()
    );

    let mut points = rlst_dynamic_array2!(f64, [5, 1]);
    for p in 0..5 {
        *points.get_mut([p, 0]).unwrap() = p as f64 / 4.0;
    }
    let table = element.tabulate_entity(1, &points, None).unwrap();
    for p in 0..5 {
        let values = (0..element.dim())
            .map(|b| *table[&vec![0]].get([b, 0, p]).unwrap())
            .collect::<Vec<_>>();
        println!("x = {:.2}: {:?}", *points.get([p, 0]).unwrap(), values);
    }
}
