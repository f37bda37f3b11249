//! Analysis engine
//!
//! Produces a classification report from a feature matrix snapshot:
//!
//! 1. empty input yields [`AnalysisOutcome::NoData`]
//! 2. stratified 80/20 split with a fixed seed
//! 3. decision tree fit on the training rows with the same seed
//! 4. accuracy, feature importances and confusion matrix on the test rows
//!
//! The engine is pure and synchronous. The same rows in the same order always
//! give the same report, bit for bit.
//!
//! # Example
//!
//! ```
//! use vinolab_server::analysis::{analyze, AnalysisOutcome};
//!
//! let outcome = analyze(&[], &[]).unwrap();
//! assert!(matches!(outcome, AnalysisOutcome::NoData(_)));
//! ```

pub mod metrics;
pub mod report;
pub mod split;
pub mod tree;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use thiserror::Error;
use vinolab_common::{WineClass, FEATURE_COUNT, FEATURE_NAMES};

pub use metrics::ConfusionMatrix;
pub use report::{AnalysisOutcome, FeatureImportance, NoDataSignal, Report};
pub use tree::{DecisionTreeClassifier, TreeFitError};

/// Seed shared by the split and the tree
pub const RANDOM_STATE: u64 = 42;

/// Share of rows held out for evaluation
pub const TEST_FRACTION: f64 = 0.2;

/// Decimal places kept in reported feature importances
pub const IMPORTANCE_DIGITS: i32 = 4;

/// Knobs of one analysis run
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnalysisParams {
    pub test_fraction: f64,
    pub random_state: u64,
}

impl Default for AnalysisParams {
    fn default() -> Self {
        Self {
            test_fraction: TEST_FRACTION,
            random_state: RANDOM_STATE,
        }
    }
}

/// Why a stratified split was impossible
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum InsufficientReason {
    #[error("only class {class} is present, at least two classes are required")]
    SingleClass { class: WineClass },

    #[error("class {class} has {count} sample(s), at least 2 are required")]
    ClassTooSmall { class: WineClass, count: usize },

    #[error("the {subset} subset would hold {size} sample(s) for {classes} classes")]
    SubsetTooSmall {
        subset: &'static str,
        size: usize,
        classes: usize,
    },
}

/// Errors from the analysis engine
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AnalysisError {
    #[error("Insufficient data for analysis: {reason}")]
    InsufficientData {
        reason: InsufficientReason,
        class_counts: [usize; WineClass::COUNT],
    },

    #[error("Feature matrix has {rows} rows but {labels} labels")]
    ShapeMismatch { rows: usize, labels: usize },

    #[error(transparent)]
    ModelFit(#[from] TreeFitError),
}

/// Analyse with the fixed default parameters
pub fn analyze(
    x: &[[f64; FEATURE_COUNT]],
    y: &[WineClass],
) -> Result<AnalysisOutcome, AnalysisError> {
    analyze_with(x, y, &AnalysisParams::default())
}

#[tracing::instrument(skip(x, y), fields(n_samples = x.len()))]
pub fn analyze_with(
    x: &[[f64; FEATURE_COUNT]],
    y: &[WineClass],
    params: &AnalysisParams,
) -> Result<AnalysisOutcome, AnalysisError> {
    if x.len() != y.len() {
        return Err(AnalysisError::ShapeMismatch {
            rows: x.len(),
            labels: y.len(),
        });
    }

    if x.is_empty() {
        tracing::info!("No samples stored, skipping analysis");
        return Ok(AnalysisOutcome::NoData(NoDataSignal::default()));
    }

    let mut rng = ChaCha8Rng::seed_from_u64(params.random_state);
    let split = split::stratified_split(y, params.test_fraction, &mut rng)?;

    let x_train: Vec<[f64; FEATURE_COUNT]> = split.train.iter().map(|&i| x[i]).collect();
    let y_train: Vec<WineClass> = split.train.iter().map(|&i| y[i]).collect();
    let x_test: Vec<[f64; FEATURE_COUNT]> = split.test.iter().map(|&i| x[i]).collect();
    let y_test: Vec<WineClass> = split.test.iter().map(|&i| y[i]).collect();

    let mut model = DecisionTreeClassifier::new(params.random_state);
    model.fit(&x_train, &y_train)?;

    let y_pred = model.predict(&x_test);
    let confusion_matrix = metrics::confusion_matrix(&y_test, &y_pred);
    let accuracy = metrics::accuracy(&confusion_matrix);

    let feature_importances = FEATURE_NAMES
        .iter()
        .zip(model.feature_importances())
        .map(|(name, weight)| FeatureImportance {
            feature: name.to_string(),
            importance: metrics::round_to(weight, IMPORTANCE_DIGITS),
        })
        .collect();

    tracing::info!(
        accuracy,
        train_size = x_train.len(),
        test_size = x_test.len(),
        leaves = model.leaf_count(),
        "Analysis completed"
    );

    Ok(AnalysisOutcome::Report(Report {
        accuracy,
        feature_importances,
        confusion_matrix,
        labels: WineClass::labels(),
        train_size: x_train.len(),
        test_size: x_test.len(),
        random_state: params.random_state,
    }))
}
