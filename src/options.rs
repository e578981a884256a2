//! Options for element construction

/// Options for creating a Ciarlet element
#[derive(Debug, Clone)]
pub struct CiarletOptions {
    /// Largest acceptable entry of `C V^T - I` after inverting the dual matrix
    conditioning_tolerance: f64,
    /// Polynomial degree integrated exactly by the quadrature used for integral moments
    moment_quadrature_degree: Option<usize>,
}

impl Default for CiarletOptions {
    fn default() -> Self {
        Self {
            conditioning_tolerance: 1e-8,
            moment_quadrature_degree: None,
        }
    }
}

impl CiarletOptions {
    /// Set the tolerance above which an ill-conditioned dual matrix is reported
    pub fn set_conditioning_tolerance(&mut self, tolerance: f64) {
        self.conditioning_tolerance = tolerance;
    }

    /// Set the quadrature degree used for integral moments
    pub fn set_moment_quadrature_degree(&mut self, degree: usize) {
        self.moment_quadrature_degree = Some(degree);
    }

    /// Tolerance above which an ill-conditioned dual matrix is reported
    pub fn conditioning_tolerance(&self) -> f64 {
        self.conditioning_tolerance
    }

    /// Quadrature degree for integral moments on an expansion set of degree `degree`
    ///
    /// Unless set explicitly, this is `2 * degree`, which is exact for moments of members of
    /// the space against weights of the same degree.
    pub fn moment_quadrature_degree(&self, degree: usize) -> usize {
        self.moment_quadrature_degree.unwrap_or(2 * degree)
    }
}
