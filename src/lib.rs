//! Construction and tabulation of Ciarlet finite elements
//!
//! An element is built from a [polynomial_set::PolynomialSet] and a [dual_set::DualSet] of
//! [functionals::Functional]s by [ciarlet::CiarletElement::create]. Builders for common
//! families are in the submodules of [ciarlet].
#![cfg_attr(feature = "strict", deny(warnings))]
#![warn(missing_docs)]

pub mod ciarlet;
pub mod dual_set;
pub mod error;
pub mod functionals;
pub mod options;
pub mod polynomial_set;
pub mod polynomials;
pub mod quadrature;
pub mod reference_cell;
pub mod traits;
pub mod types;

pub use error::ElementError;
pub use options::CiarletOptions;
