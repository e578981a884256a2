//! Quadrature rules on reference cells
//!
//! Rules are generated on demand: collapsed Gauss-Jacobi rules on simplices, tensor products
//! of Gauss-Legendre rules on quadrilaterals and hexahedra, and Gauss-Lobatto-Legendre rules
//! on the interval.
mod gauss_jacobi;
mod gauss_lobatto_legendre;
pub mod types;

pub use gauss_jacobi::{gauss_jacobi_rule, make_quadrature};
pub use gauss_lobatto_legendre::gauss_lobatto_legendre_rule;
pub use types::QuadratureRule;
