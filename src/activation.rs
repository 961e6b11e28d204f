use ndarray::{Array1, ArrayView1};

/// Logistic sigmoid, the only activation used by the network.
pub struct Sigmoid;

impl Sigmoid {
    /// `1 / (1 + e^-x)`. Very large `|x|` saturates to exactly 0 or 1.
    pub fn compute_one(x: f64) -> f64 {
        1.0 / (1.0 + (-x).exp())
    }

    pub fn compute(x: ArrayView1<f64>) -> Array1<f64> {
        x.mapv(Sigmoid::compute_one)
    }

    /// Derivative expressed through the already activated value `s = σ(x)`.
    pub fn derivative_from_output(s: f64) -> f64 {
        s * (1.0 - s)
    }
}
