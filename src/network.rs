use log::{debug, trace};
use ndarray::ArrayView1;
use ndarray_rand::rand::{rngs::StdRng, Rng, SeedableRng};

use crate::error::{ensure_len, Error, Result};
use crate::layer::Layer;

/// Fully-connected sigmoid network trained by online backpropagation.
///
/// `layers[0]` is a pass-through input layer; every later layer holds the
/// weights of its incoming connections.
#[derive(Debug, Clone, PartialEq)]
pub struct Network {
    layers: Vec<Layer>,
    seed: u64,
}

impl Network {
    /// Builds a network whose layer `i` has `topology[i]` nodes.
    /// The same `topology` and `seed` always produce the same weights.
    pub fn new(topology: &[usize], seed: u64) -> Result<Self> {
        Ok(Self {
            layers: build_layers(topology, seed)?,
            seed,
        })
    }

    pub fn with_topology(topology: &[usize]) -> Result<Self> {
        Network::new(topology, 0)
    }

    /// Replaces the whole topology and redraws every weight.
    /// On error the network is left untouched.
    pub fn resize(&mut self, topology: &[usize], seed: u64) -> Result<()> {
        self.layers = build_layers(topology, seed)?;
        self.seed = seed;
        Ok(())
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn topology(&self) -> Vec<usize> {
        self.layers.iter().map(Layer::size).collect()
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub fn layer(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    pub fn input_size(&self) -> usize {
        self.layers[0].size()
    }

    pub fn output_size(&self) -> usize {
        self.last().size()
    }

    /// Activations of the last layer as left by the latest `forward`.
    pub fn output(&self) -> ArrayView1<f64> {
        self.last().output()
    }

    /// Propagates `input` through every layer and returns the last layer's
    /// activations. Weights and momentum are not touched.
    pub fn forward(&mut self, input: ArrayView1<f64>) -> Result<ArrayView1<f64>> {
        self.layers[0].copy_input(input)?;
        for i in 1..self.layers.len() {
            let (done, rest) = self.layers.split_at_mut(i);
            rest[0].calculate_output(done[i - 1].output())?;
        }
        Ok(self.output())
    }

    /// Trains on the sample seen by the latest `forward`.
    ///
    /// All deltas are computed from the current weights before any weight
    /// changes, then every weighted layer is updated from the top down.
    pub fn backward(&mut self, expected: ArrayView1<f64>, eta: f64, momentum: f64) -> Result<()> {
        let count = self.layers.len();
        if count < 2 {
            return Err(Error::TooFewLayers { layers: count });
        }
        ensure_len("expected output", self.output_size(), expected.len())?;
        trace!("backward pass: eta={}, momentum={}", eta, momentum);

        self.layers[count - 1].calculate_output_delta(expected)?;

        for i in (1..count - 1).rev() {
            let (lower, upper) = self.layers.split_at_mut(i + 1);
            lower[i].calculate_hidden_delta(&upper[0])?;
        }

        for i in (1..count).rev() {
            let (lower, upper) = self.layers.split_at_mut(i);
            upper[0].apply_update(lower[i - 1].output(), eta, momentum)?;
        }
        Ok(())
    }

    fn last(&self) -> &Layer {
        &self.layers[self.layers.len() - 1]
    }
}

fn build_layers(topology: &[usize], seed: u64) -> Result<Vec<Layer>> {
    if topology.is_empty() {
        return Err(Error::EmptyTopology);
    }
    if let Some(index) = topology.iter().position(|&size| size == 0) {
        return Err(Error::ZeroWidthLayer { index });
    }

    // Each layer takes exactly one draw, in index order.
    let mut seeds = StdRng::seed_from_u64(seed);
    let layers = topology
        .iter()
        .enumerate()
        .map(|(i, &size)| {
            let prev_size = if i == 0 { 0 } else { topology[i - 1] };
            Layer::new(size, prev_size, seeds.gen::<u64>())
        })
        .collect();
    debug!("built network {:?} from seed {}", topology, seed);
    Ok(layers)
}

#[cfg(test)]
mod tests {
    use crate::assert_rel_eq_arr1;

    use super::*;
    use approx::assert_relative_eq;
    use ndarray::{arr1, arr2, Array1};

    #[test]
    fn rejects_degenerate_topologies() {
        assert_eq!(Err(Error::EmptyTopology), Network::new(&[], 0));
        assert_eq!(
            Err(Error::ZeroWidthLayer { index: 1 }),
            Network::new(&[2, 0, 1], 0)
        );
    }

    #[test]
    fn network_shape() {
        let mut network = Network::new(&[3, 4, 2], 11).unwrap();
        assert_eq!(vec![3, 4, 2], network.topology());
        assert_eq!(0, network.layers()[0].prev_size());
        assert_eq!((4, 3), network.layers()[1].weight().dim());
        assert_eq!((2, 4), network.layers()[2].weight().dim());

        let output = network.forward(arr1(&[0.1, 0.2, 0.3]).view()).unwrap();
        assert_eq!(2, output.len());
    }

    #[test]
    fn layers_get_distinct_seeds() {
        let network = Network::new(&[2, 2, 2], 5).unwrap();
        assert_ne!(network.layers()[1].weight(), network.layers()[2].weight());
    }

    #[test]
    fn failed_resize_keeps_network() {
        let mut network = Network::new(&[2, 3, 1], 9).unwrap();
        let before = network.clone();
        assert!(network.resize(&[2, 0], 1).is_err());
        assert_eq!(before, network);

        network.resize(&[1, 1], 4).unwrap();
        assert_eq!(vec![1, 1], network.topology());
        assert_eq!(4, network.seed());
        assert_eq!(Network::new(&[1, 1], 4).unwrap(), network);
    }

    #[test]
    fn forward_rejects_wrong_input_width() {
        let mut network = Network::with_topology(&[3, 1]).unwrap();
        let err = network.forward(arr1(&[1.0, 2.0]).view()).unwrap_err();
        assert_eq!(
            Error::DimensionMismatch {
                context: "layer input",
                expected: 3,
                actual: 2
            },
            err
        );
    }

    #[test]
    fn single_layer_network_passes_input_through() {
        let mut network = Network::with_topology(&[2]).unwrap();
        let output = network.forward(arr1(&[3.0, -1.0]).view()).unwrap();
        assert_rel_eq_arr1!(output, arr1(&[3.0, -1.0]));
        assert_eq!(
            Err(Error::TooFewLayers { layers: 1 }),
            network.backward(arr1(&[1.0, 0.0]).view(), 0.5, 0.0)
        );
    }

    #[test]
    fn backward_rejects_wrong_target_before_mutation() {
        let mut network = Network::new(&[2, 2, 1], 3).unwrap();
        network.forward(arr1(&[1.0, 0.0]).view()).unwrap();
        let before = network.clone();
        assert!(network.backward(arr1(&[1.0, 0.0]).view(), 0.5, 0.9).is_err());
        assert_eq!(before, network);
    }

    #[test]
    fn single_epoch_update_matches_closed_form() {
        let (w, x, y) = (0.3, 0.8, 1.0);
        let mut network = Network::new(&[1, 1], 0).unwrap();
        network.layers[1] = Layer::with_weights(arr2(&[[w]]));

        network.forward(arr1(&[x]).view()).unwrap();
        network.backward(arr1(&[y]).view(), 1.0, 0.0).unwrap();

        let s = 1.0 / (1.0 + f64::exp(-w * x));
        let expected = (y - s) * s * (1.0 - s) * x;
        assert_relative_eq!(expected, network.layers()[1].weight()[[0, 0]] - w, epsilon = 1e-12);
    }

    #[test]
    fn hidden_deltas_use_weights_before_update() {
        let mut network = Network::new(&[2, 3, 2], 21).unwrap();
        let input = arr1(&[0.4, -0.7]);
        let target = arr1(&[0.0, 1.0]);
        network.forward(input.view()).unwrap();

        let mut reference = network.clone();
        let (lower, upper) = reference.layers.split_at_mut(2);
        upper[0].calculate_output_delta(target.view()).unwrap();
        lower[1].calculate_hidden_delta(&upper[0]).unwrap();
        let hidden_delta: Array1<f64> = lower[1].delta().to_owned();

        network.backward(target.view(), 0.5, 0.0).unwrap();
        assert_rel_eq_arr1!(network.layers()[1].delta(), hidden_delta);
    }
}
