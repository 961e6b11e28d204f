use log::{debug, info, warn};

use crate::config::TrainConfig;
use crate::data::DataLoader;
use crate::error::{ensure_len, Error, Result};
use crate::loss::mean_squared_error;
use crate::network::Network;

/// Outcome of a training run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainReport {
    /// Number of epochs actually run.
    pub epochs: usize,
    /// Mean loss of the last epoch.
    pub final_loss: f64,
    /// Mean loss of every epoch, in order.
    pub history: Vec<f64>,
}

impl TrainReport {
    pub fn reached(&self, target_loss: f64) -> bool {
        self.final_loss < target_loss
    }
}

/// Runs online training: one forward and one backward pass per sample.
pub struct Trainer {
    config: TrainConfig,
}

impl Trainer {
    pub fn new(config: TrainConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TrainConfig {
        &self.config
    }

    /// Trains `network` on every sample of `loader` for up to `config.epochs`
    /// epochs. The loss of a sample is measured before its own update.
    pub fn train(&self, network: &mut Network, loader: &mut DataLoader) -> Result<TrainReport> {
        check_shapes(network, loader)?;
        let TrainConfig {
            learning_rate,
            momentum,
            epochs,
            target_loss,
            log_interval,
        } = self.config;

        let mut history = Vec::with_capacity(epochs);
        for epoch in 0..epochs {
            let mut total_loss = 0.0;
            for (input, target) in loader.samples() {
                let output = network.forward(input)?;
                total_loss += mean_squared_error(output, target)?;
                network.backward(target, learning_rate, momentum)?;
            }
            let epoch_loss = total_loss / loader.size() as f64;
            history.push(epoch_loss);

            if log_interval > 0 && epoch % log_interval == 0 {
                info!("epoch {}: loss = {}", epoch, epoch_loss);
            }
            if !epoch_loss.is_finite() {
                warn!("loss diverged at epoch {}, stopping", epoch);
                break;
            }
            if target_loss.map_or(false, |target| epoch_loss < target) {
                debug!("target loss reached at epoch {}: {}", epoch, epoch_loss);
                break;
            }
        }

        Ok(TrainReport {
            epochs: history.len(),
            final_loss: history.last().copied().unwrap_or(f64::NAN),
            history,
        })
    }

    /// Mean loss of `network` over `loader` without touching any weight.
    pub fn evaluate(&self, network: &mut Network, loader: &mut DataLoader) -> Result<f64> {
        check_shapes(network, loader)?;
        let mut total_loss = 0.0;
        for (input, target) in loader.samples() {
            let output = network.forward(input)?;
            total_loss += mean_squared_error(output, target)?;
        }
        Ok(total_loss / loader.size() as f64)
    }
}

fn check_shapes(network: &Network, loader: &DataLoader) -> Result<()> {
    if network.len() < 2 {
        return Err(Error::TooFewLayers {
            layers: network.len(),
        });
    }
    if loader.size() == 0 {
        return Err(Error::EmptyDataset);
    }
    ensure_len("dataset inputs", network.input_size(), loader.input_width())?;
    ensure_len("dataset targets", network.output_size(), loader.target_width())
}
