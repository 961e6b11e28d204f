use ndarray::{Array2, ArrayView1, Axis};
use ndarray_rand::rand::{rngs::StdRng, seq::index::sample, SeedableRng};

use crate::error::{ensure_len, Result};

/// Sampler produces the order in which a dataset is visited each epoch.
pub enum Sampler {
    /// Round-robin over the rows in storage order.
    Sequential(usize),
    /// A fresh permutation every epoch, reproducible from the seed.
    Random(usize, StdRng),
}

impl Sampler {
    pub fn sample(&mut self) -> Vec<usize> {
        match self {
            Self::Sequential(size) => (0..*size).collect(),
            Self::Random(size, rng) => sample(rng, *size, *size).into_vec(),
        }
    }
}

/// Samples yields one `(input, target)` row pair each time `Iterator::next()`
/// is called. This struct is created in each epoch of a training run.
pub struct Samples<'a> {
    indices: std::vec::IntoIter<usize>,
    input: &'a Array2<f64>,
    target: &'a Array2<f64>,
}

impl<'a> Iterator for Samples<'a> {
    type Item = (ArrayView1<'a, f64>, ArrayView1<'a, f64>);

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.indices.next()?;
        Some((
            self.input.index_axis(Axis(0), index),
            self.target.index_axis(Axis(0), index),
        ))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.indices.size_hint()
    }
}

impl ExactSizeIterator for Samples<'_> {}

/// DataLoader wraps a dataset whose rows are samples: `input` is
/// `(n_samples, n_inputs)` and `target` is `(n_samples, n_outputs)`.
pub struct DataLoader {
    sampler: Sampler,
    input: Array2<f64>,
    target: Array2<f64>,
}

impl DataLoader {
    pub fn new(input: Array2<f64>, target: Array2<f64>) -> Result<Self> {
        ensure_len("target rows", input.nrows(), target.nrows())?;
        Ok(Self {
            sampler: Sampler::Sequential(input.nrows()),
            input,
            target,
        })
    }

    pub fn size(&self) -> usize {
        self.input.nrows()
    }

    pub fn input_width(&self) -> usize {
        self.input.ncols()
    }

    pub fn target_width(&self) -> usize {
        self.target.ncols()
    }

    /// Visit samples in a random order seeded by `seed`.
    pub fn shuffle(mut self, seed: u64) -> Self {
        self.sampler = Sampler::Random(self.size(), StdRng::seed_from_u64(seed));
        self
    }

    /// Create the sample iterator for one epoch.
    pub fn samples(&mut self) -> Samples<'_> {
        Samples {
            indices: self.sampler.sample().into_iter(),
            input: &self.input,
            target: &self.target,
        }
    }
}
