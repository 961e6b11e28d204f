use ndarray::{Array1, Array2, ArrayView1, ArrayView2, Zip};
use ndarray_rand::rand::{rngs::StdRng, SeedableRng};
use ndarray_rand::rand_distr::Open01;
use ndarray_rand::RandomExt;

use crate::activation::Sigmoid;
use crate::error::{ensure_len, Result};

/// One stage of a fully-connected network.
///
/// `weight` and `momentum` are `(size, prev_size)` matrices: row `i` holds the
/// incoming connections of node `i`. The input layer has `prev_size == 0` and
/// only uses `output`.
#[derive(Debug, Clone, PartialEq)]
pub struct Layer {
    output: Array1<f64>,
    weight: Array2<f64>,
    momentum: Array2<f64>,
    delta: Array1<f64>,
}

impl Layer {
    pub fn new(size: usize, prev_size: usize, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        // Open01 keeps both bounds out of reach: 2 * (0, 1) - 1 = (-1, 1).
        let unit: Array2<f64> = Array2::random_using((size, prev_size), Open01, &mut rng);
        Layer::with_weights(unit.mapv_into(|w| 2.0 * w - 1.0))
    }

    /// Builds a layer around explicit incoming weights of shape `(size, prev_size)`.
    pub fn with_weights(weight: Array2<f64>) -> Self {
        let size = weight.nrows();
        Self {
            output: Array1::zeros(size),
            momentum: Array2::zeros(weight.raw_dim()),
            weight,
            delta: Array1::zeros(size),
        }
    }

    /// Reallocates every buffer for `size` nodes fed by `prev_size` nodes and
    /// draws fresh weights from `seed`. Previous contents are discarded.
    pub fn resize(&mut self, size: usize, prev_size: usize, seed: u64) {
        *self = Layer::new(size, prev_size, seed);
    }

    pub fn size(&self) -> usize {
        self.output.len()
    }

    pub fn prev_size(&self) -> usize {
        self.weight.ncols()
    }

    pub fn output(&self) -> ArrayView1<f64> {
        self.output.view()
    }

    pub fn weight(&self) -> ArrayView2<f64> {
        self.weight.view()
    }

    /// Most recent update applied to each connection.
    pub fn momentum(&self) -> ArrayView2<f64> {
        self.momentum.view()
    }

    pub fn delta(&self) -> ArrayView1<f64> {
        self.delta.view()
    }

    /// Input layer only: takes the external activations verbatim.
    pub fn copy_input(&mut self, input: ArrayView1<f64>) -> Result<()> {
        ensure_len("layer input", self.size(), input.len())?;
        self.output.assign(&input);
        Ok(())
    }

    /// `output[i] = σ(Σ_k weight[i][k] * input[k])`, no bias.
    pub fn calculate_output(&mut self, input: ArrayView1<f64>) -> Result<()> {
        ensure_len("layer activations", self.prev_size(), input.len())?;
        Zip::from(&mut self.output)
            .and(self.weight.rows())
            .for_each(|output, weights| *output = Sigmoid::compute_one(weights.dot(&input)));
        Ok(())
    }

    /// Error signal of the output layer under squared error loss.
    pub fn calculate_output_delta(&mut self, expected: ArrayView1<f64>) -> Result<()> {
        ensure_len("expected output", self.size(), expected.len())?;
        Zip::from(&mut self.delta)
            .and(&self.output)
            .and(&expected)
            .for_each(|delta, &output, &expected| {
                *delta = (expected - output) * Sigmoid::derivative_from_output(output);
            });
        Ok(())
    }

    /// Error signal of a hidden layer, pulled back through `next`'s weights.
    /// `next.delta` must already hold this pass's values.
    pub fn calculate_hidden_delta(&mut self, next: &Layer) -> Result<()> {
        ensure_len("downstream layer", self.size(), next.prev_size())?;
        let propagated = next.weight.t().dot(&next.delta);
        Zip::from(&mut self.delta)
            .and(&self.output)
            .and(&propagated)
            .for_each(|delta, &output, &error| {
                *delta = Sigmoid::derivative_from_output(output) * error;
            });
        Ok(())
    }

    /// Applies `update = eta * delta[i] * input[k] + momentum * previous[i][k]`
    /// to every connection and remembers it for the next call.
    pub fn apply_update(&mut self, input: ArrayView1<f64>, eta: f64, momentum: f64) -> Result<()> {
        ensure_len("update input", self.prev_size(), input.len())?;
        let delta = &self.delta;
        Zip::indexed(&mut self.weight)
            .and(&mut self.momentum)
            .for_each(|(i, k), weight, previous| {
                let alpha = eta * delta[i];
                let update = alpha * input[k] + momentum * *previous;
                *previous = update;
                *weight += update;
            });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use crate::{assert_rel_eq_arr1, assert_rel_eq_arr2, error::Error};

    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{arr1, arr2};

    fn hidden_layer() -> Layer {
        let weights = arr2(&[[1.0, -1.0, 0.5], [2.0, -1.0, 2.0]]);
        Layer::with_weights(weights)
    }

    #[test]
    fn weights_lie_in_open_unit_interval() {
        let layer = Layer::new(8, 16, 7);
        assert_eq!((8, 16), layer.weight().dim());
        assert_eq!(layer.weight().dim(), layer.momentum().dim());
        assert!(layer.weight().iter().all(|w| -1.0 < *w && *w < 1.0));
        assert!(layer.momentum().iter().all(|m| *m == 0.0));
    }

    #[test]
    fn input_layer_has_no_weights() {
        let layer = Layer::new(3, 0, 1);
        assert_eq!(3, layer.size());
        assert_eq!(0, layer.prev_size());
        assert_eq!(0, layer.weight().len());
        assert_eq!(3, layer.delta().len());
    }

    #[test]
    fn resize_discards_previous_state() {
        let mut layer = Layer::new(2, 2, 3);
        layer.copy_input(arr1(&[0.5, 0.5]).view()).unwrap();
        layer.resize(4, 1, 3);
        assert_eq!((4, 1), layer.weight().dim());
        assert_eq!(4, layer.output().len());
        assert_eq!(Layer::new(4, 1, 3), layer);
    }

    #[test]
    fn copy_input_checks_length() {
        let mut layer = Layer::new(2, 0, 0);
        layer.copy_input(arr1(&[0.25, -4.0]).view()).unwrap();
        assert_rel_eq_arr1!(layer.output(), arr1(&[0.25, -4.0]));

        let err = layer.copy_input(arr1(&[1.0]).view()).unwrap_err();
        assert_eq!(
            Error::DimensionMismatch {
                context: "layer input",
                expected: 2,
                actual: 1
            },
            err
        );
    }

    #[test]
    fn layer_forward() {
        let mut layer = hidden_layer();
        layer
            .calculate_output(arr1(&[1.0, 0.5, -0.5]).view())
            .unwrap();
        // z = [0.25, 0.5]
        assert_rel_eq_arr1!(
            layer.output(),
            arr1(&[Sigmoid::compute_one(0.25), Sigmoid::compute_one(0.5)])
        );
        assert_relative_eq!(0.5621765008857981, layer.output()[0], epsilon = 1e-12);
    }

    #[test]
    fn output_delta_combines_error_and_slope() {
        let mut layer = hidden_layer();
        layer
            .calculate_output(arr1(&[1.0, 0.5, -0.5]).view())
            .unwrap();
        layer.calculate_output_delta(arr1(&[1.0, 0.0]).view()).unwrap();

        let expected = layer
            .output()
            .iter()
            .zip([1.0, 0.0])
            .map(|(&o, t)| (t - o) * (o * (1.0 - o)))
            .collect::<Array1<_>>();
        assert_rel_eq_arr1!(layer.delta(), expected);
        assert!(layer.delta()[0] > 0.0);
        assert!(layer.delta()[1] < 0.0);
    }

    #[test]
    fn hidden_delta_follows_downstream_weights() {
        let mut hidden = Layer::with_weights(arr2(&[[0.0], [0.0]]));
        hidden.calculate_output(arr1(&[3.0]).view()).unwrap();
        assert_rel_eq_arr1!(hidden.output(), arr1(&[0.5, 0.5]));

        let mut next = Layer::with_weights(arr2(&[[2.0, -4.0]]));
        next.calculate_output(hidden.output()).unwrap();
        next.calculate_output_delta(arr1(&[1.0]).view()).unwrap();
        let next_delta = next.delta()[0];

        hidden.calculate_hidden_delta(&next).unwrap();
        assert_rel_eq_arr1!(
            hidden.delta(),
            arr1(&[0.25 * 2.0 * next_delta, 0.25 * -4.0 * next_delta])
        );
    }

    #[test]
    fn hidden_delta_rejects_unrelated_layer() {
        let mut hidden = Layer::new(3, 2, 0);
        let next = Layer::new(1, 4, 0);
        assert!(matches!(
            hidden.calculate_hidden_delta(&next),
            Err(Error::DimensionMismatch { expected: 3, actual: 4, .. })
        ));
    }

    #[test]
    fn update_without_momentum_is_gradient_step() {
        let mut layer = Layer::with_weights(arr2(&[[0.5, -0.5]]));
        let input = arr1(&[1.0, 2.0]);
        layer.calculate_output(input.view()).unwrap();
        layer.calculate_output_delta(arr1(&[1.0]).view()).unwrap();
        let delta = layer.delta()[0];

        layer.apply_update(input.view(), 0.1, 0.0).unwrap();
        let step = arr2(&[[0.1 * delta * 1.0, 0.1 * delta * 2.0]]);
        assert_rel_eq_arr2!(layer.momentum(), step);
        assert_rel_eq_arr2!(layer.weight(), arr2(&[[0.5, -0.5]]) + &step);

        // History plays no part when the coefficient is zero.
        layer.apply_update(input.view(), 0.1, 0.0).unwrap();
        assert_rel_eq_arr2!(layer.momentum(), step);
    }

    #[test]
    fn update_carries_momentum() {
        let mut layer = Layer::with_weights(arr2(&[[0.0]]));
        let input = arr1(&[1.0]);
        layer.calculate_output(input.view()).unwrap();
        layer.calculate_output_delta(arr1(&[1.0]).view()).unwrap();
        // σ(0) = 0.5, delta = 0.5 * 0.25
        assert_relative_eq!(0.125, layer.delta()[0]);

        layer.apply_update(input.view(), 1.0, 0.5).unwrap();
        assert_relative_eq!(0.125, layer.momentum()[[0, 0]]);
        layer.apply_update(input.view(), 1.0, 0.5).unwrap();
        assert_relative_eq!(0.125 + 0.0625, layer.momentum()[[0, 0]]);
        assert_relative_eq!(0.125 + 0.1875, layer.weight()[[0, 0]]);
    }
}
