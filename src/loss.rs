use ndarray::{ArrayView1, Zip};

use crate::error::{ensure_len, Result};

/// Mean of the squared differences between `output` and `target`.
pub fn mean_squared_error(output: ArrayView1<f64>, target: ArrayView1<f64>) -> Result<f64> {
    ensure_len("loss target", output.len(), target.len())?;
    let n = output.len();
    let squared_sum = Zip::from(&output)
        .and(&target)
        .fold(0.0, |loss, &output, &target| loss + (output - target).powi(2));
    Ok(squared_sum / n as f64)
}
