use std::{collections::HashMap, hash::Hash};

use ndarray::{Array2, ArrayView2, Axis};

pub mod activation;
pub mod config;
pub mod data;
pub mod error;
pub mod layer;
pub mod loss;
pub mod metrics;
pub mod network;
pub mod trainer;
pub mod utils;

pub use config::TrainConfig;
pub use error::{Error, Result};
pub use layer::Layer;
pub use network::Network;
pub use trainer::{TrainReport, Trainer};

#[macro_export]
macro_rules! assert_rel_eq_arr1 {
    ($actual:expr, $expected:expr) => {
        assert_eq!($actual.shape(), $expected.shape());
        ndarray::Zip::from(&$actual)
            .and(&$expected)
            .for_each(|v, w| {
                assert_relative_eq!(v, w);
            });
    };
}

#[macro_export]
macro_rules! assert_rel_eq_arr2 {
    ($actual:expr, $expected:expr) => {
        assert_eq!($actual.shape(), $expected.shape());
        ndarray::Zip::from(&$actual)
            .and(&$expected)
            .for_each(|v, w| {
                assert_relative_eq!(v, w);
            });
    };
}

/// Encode labels to one-hot target rows and decode network outputs back to labels.
pub struct OneHotEncoder<Label>
where
    Label: Hash + Eq + Clone,
{
    label_to_id: HashMap<Label, usize>,
    id_to_label: Vec<Label>,
}

impl<Label> OneHotEncoder<Label>
where
    Label: Hash + Eq + Clone,
{
    /// Record labels to convert. The position of a label is its output node.
    pub fn new(label_kinds: &[Label]) -> Self {
        let label_to_id = label_kinds
            .iter()
            .cloned()
            .enumerate()
            .map(|(id, label)| (label, id))
            .collect();
        Self {
            label_to_id,
            id_to_label: label_kinds.to_vec(),
        }
    }

    pub fn n_labels(&self) -> usize {
        self.id_to_label.len()
    }

    pub fn labels(&self) -> &[Label] {
        &self.id_to_label
    }

    /// Encode labels as a 2D matrix whose shape is (n_data, n_labels).
    /// Fails on a label that was not recorded.
    pub fn encode(&self, labels: &[Label]) -> Result<Array2<f64>> {
        let mut one_hot_vecs = Array2::zeros((labels.len(), self.n_labels()));
        for (mut row, label) in one_hot_vecs.rows_mut().into_iter().zip(labels) {
            let id = self.label_to_id.get(label).ok_or(Error::UnknownLabel)?;
            row[*id] = 1.0;
        }
        Ok(one_hot_vecs)
    }

    /// Decode rows of network outputs to labels.
    /// Decoded label is determined by an argmax of each row.
    pub fn decode(&self, outputs: ArrayView2<f64>) -> Vec<Label> {
        outputs
            .lanes(Axis(1))
            .into_iter()
            .map(|row| {
                // argmax of `row`
                row.iter()
                    .enumerate()
                    .fold((0, f64::NEG_INFINITY), |(max_index, max_elem), (index, &elem)| {
                        if elem > max_elem {
                            (index, elem)
                        } else {
                            (max_index, max_elem)
                        }
                    })
                    .0
            })
            .map(|id| self.id_to_label[id].clone())
            .collect()
    }
}
