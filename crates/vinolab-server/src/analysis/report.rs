//! Structured analysis output handed to presenters

use serde::{Deserialize, Serialize};
use vinolab_common::WineClass;

use super::metrics::ConfusionMatrix;

/// Message carried by [`NoDataSignal`]
pub const NO_DATA_MESSAGE: &str = "no data available for analysis";

/// Importance weight of one named feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureImportance {
    pub feature: String,
    pub importance: f64,
}

/// Classification report for the current sample set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Fraction of correctly classified test samples, in [0, 1]
    pub accuracy: f64,
    /// One entry per feature, in column order, rounded to 4 decimals
    pub feature_importances: Vec<FeatureImportance>,
    /// Rows are true labels, columns predicted labels
    pub confusion_matrix: ConfusionMatrix,
    pub labels: [u8; WineClass::COUNT],
    pub train_size: usize,
    pub test_size: usize,
    pub random_state: u64,
}

impl Report {
    /// Importance values without names, in column order
    pub fn importance_values(&self) -> Vec<f64> {
        self.feature_importances.iter().map(|f| f.importance).collect()
    }
}

/// The store holds no samples; nothing to analyse
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NoDataSignal {
    pub message: String,
    pub labels: [u8; WineClass::COUNT],
}

impl Default for NoDataSignal {
    fn default() -> Self {
        Self {
            message: NO_DATA_MESSAGE.to_string(),
            labels: WineClass::labels(),
        }
    }
}

/// Result of a successful analysis call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum AnalysisOutcome {
    NoData(NoDataSignal),
    #[serde(rename = "ok")]
    Report(Report),
}

impl AnalysisOutcome {
    pub fn report(&self) -> Option<&Report> {
        match self {
            AnalysisOutcome::Report(report) => Some(report),
            AnalysisOutcome::NoData(_) => None,
        }
    }

    pub fn is_no_data(&self) -> bool {
        matches!(self, AnalysisOutcome::NoData(_))
    }
}
