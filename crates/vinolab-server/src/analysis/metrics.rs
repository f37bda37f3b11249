//! Evaluation metrics over test-set predictions
//!
//! linfa's `ConfusionMatrix` only covers the labels it observed and reports
//! accuracy as `f32`; the report needs a fixed 0, 1, 2 layout and an `f64`
//! fraction, so both are counted here.

use vinolab_common::WineClass;

/// Counts of true label (row) against predicted label (column), ordered 0, 1, 2
pub type ConfusionMatrix = [[u32; WineClass::COUNT]; WineClass::COUNT];

pub fn confusion_matrix(y_true: &[WineClass], y_pred: &[WineClass]) -> ConfusionMatrix {
    let mut matrix = [[0; WineClass::COUNT]; WineClass::COUNT];
    for (t, p) in y_true.iter().zip(y_pred) {
        matrix[t.index()][p.index()] += 1;
    }
    matrix
}

/// Share of predictions on the diagonal; 0.0 for an empty matrix
pub fn accuracy(matrix: &ConfusionMatrix) -> f64 {
    let total: u32 = matrix.iter().flatten().sum();
    if total == 0 {
        return 0.0;
    }
    let correct: u32 = (0..WineClass::COUNT).map(|i| matrix[i][i]).sum();
    f64::from(correct) / f64::from(total)
}

/// Round half away from zero to `digits` decimal places
pub fn round_to(value: f64, digits: i32) -> f64 {
    let scale = 10f64.powi(digits);
    (value * scale).round() / scale
}
