use ndarray::{ArrayView2, Zip};

use crate::error::{ensure_len, Result};

/// Compute accuracy of the predicted labels `y_pred` to the correct labels `y_true`.
pub fn accuracy<Label>(y_true: &[Label], y_pred: &[Label]) -> f64
where
    Label: Eq,
{
    let n_corrects = y_true
        .iter()
        .zip(y_pred.iter())
        .filter(|(t, p)| t == p)
        .count();
    n_corrects as f64 / y_true.len() as f64
}

/// Fraction of rows whose outputs all fall on the same side of `threshold`
/// as the corresponding targets.
pub fn threshold_accuracy(
    outputs: ArrayView2<f64>,
    targets: ArrayView2<f64>,
    threshold: f64,
) -> Result<f64> {
    ensure_len("target rows", outputs.nrows(), targets.nrows())?;
    ensure_len("target columns", outputs.ncols(), targets.ncols())?;
    let n_corrects = Zip::from(outputs.rows())
        .and(targets.rows())
        .fold(0, |count, output, target| {
            let all_match = Zip::from(&output)
                .and(&target)
                .all(|&o, &t| (o > threshold) == (t > threshold));
            count + all_match as usize
        });
    Ok(n_corrects as f64 / outputs.nrows() as f64)
}

/// Construct confusion matrix from `y_true` and `y_pred`.
/// An item in i-th row and j-th column is the number of predicted j-th label where a true label is
/// i-th one. Pairs containing a label missing from `label_kinds` are ignored.
pub fn confusion_matrix<Label>(
    y_true: &[Label],
    y_pred: &[Label],
    label_kinds: &[Label],
) -> Vec<Vec<usize>>
where
    Label: Eq,
{
    let position = |label: &Label| label_kinds.iter().position(|kind| kind == label);
    let mut matrix = vec![vec![0; label_kinds.len()]; label_kinds.len()];
    for (t, p) in y_true.iter().zip(y_pred.iter()) {
        if let (Some(i), Some(j)) = (position(t), position(p)) {
            matrix[i][j] += 1;
        }
    }
    matrix
}
