//! Training hyperparameters.
//!
//! `TrainConfig` bundles everything a training run needs besides the network
//! and the data. Start from `TrainConfig::default()` and override fields with
//! the `with_*` methods:
//!
//! ```
//! use ffnet::config::TrainConfig;
//!
//! let config = TrainConfig::default()
//!     .with_learning_rate(0.5)
//!     .with_momentum(0.9)
//!     .with_epochs(5000)
//!     .with_target_loss(0.01);
//! assert!(config.validate().is_ok());
//! ```

use crate::error::{Error, Result};

#[derive(Debug, Clone, PartialEq)]
pub struct TrainConfig {
    /// Step size `eta` applied to every weight update.
    pub learning_rate: f64,

    /// Fraction of the previous update carried into the next one.
    pub momentum: f64,

    /// Upper bound on the number of passes over the data.
    pub epochs: usize,

    /// Stop as soon as the mean epoch loss drops below this value.
    pub target_loss: Option<f64>,

    /// Emit an `info` log line every `log_interval` epochs. 0 disables it.
    pub log_interval: usize,
}

impl Default for TrainConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.5,
            momentum: 0.0,
            epochs: 1000,
            target_loss: None,
            log_interval: 100,
        }
    }
}

impl TrainConfig {
    pub fn with_learning_rate(self, learning_rate: f64) -> Self {
        Self {
            learning_rate,
            ..self
        }
    }

    pub fn with_momentum(self, momentum: f64) -> Self {
        Self { momentum, ..self }
    }

    pub fn with_epochs(self, epochs: usize) -> Self {
        Self { epochs, ..self }
    }

    pub fn with_target_loss(self, target_loss: f64) -> Self {
        Self {
            target_loss: Some(target_loss),
            ..self
        }
    }

    pub fn with_log_interval(self, log_interval: usize) -> Self {
        Self {
            log_interval,
            ..self
        }
    }

    /// Rejects values that cannot drive a meaningful training run.
    pub fn validate(&self) -> Result<()> {
        if !self.learning_rate.is_finite() {
            return Err(Error::InvalidConfig(format!(
                "learning rate must be finite, got {}",
                self.learning_rate
            )));
        }
        if !self.momentum.is_finite() || self.momentum < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "momentum must be finite and non-negative, got {}",
                self.momentum
            )));
        }
        if self.epochs == 0 {
            return Err(Error::InvalidConfig("epochs must be positive".to_string()));
        }
        if let Some(target) = self.target_loss {
            if target.is_nan() || target < 0.0 {
                return Err(Error::InvalidConfig(format!(
                    "target loss must be non-negative, got {}",
                    target
                )));
            }
        }
        Ok(())
    }
}
