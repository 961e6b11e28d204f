use ndarray::{Array2, Axis};
use ndarray_rand::rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::error::{ensure_len, Result};

/// Split a dataset into train and test rows after a shuffle seeded by `seed`.
/// `test_ratio` is a ratio of the number of test rows to the whole dataset.
/// Returns `(x_train, y_train, x_test, y_test)`.
pub fn train_test_split(
    x: &Array2<f64>,
    y: &Array2<f64>,
    test_ratio: f64,
    seed: u64,
) -> Result<(Array2<f64>, Array2<f64>, Array2<f64>, Array2<f64>)> {
    ensure_len("split targets", x.nrows(), y.nrows())?;

    let mut rng = StdRng::seed_from_u64(seed);
    let mut index = (0..x.nrows()).collect::<Vec<_>>();
    index.shuffle(&mut rng);

    let n_tests = (x.nrows() as f64 * test_ratio.clamp(0.0, 1.0)) as usize;
    let (test_index, train_index) = index.split_at(n_tests);
    Ok((
        x.select(Axis(0), train_index),
        y.select(Axis(0), train_index),
        x.select(Axis(0), test_index),
        y.select(Axis(0), test_index),
    ))
}
