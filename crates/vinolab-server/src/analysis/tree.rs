//! Decision-tree classifier
//!
//! A thin layer over [`linfa_trees::DecisionTree`]: Gini impurity, midpoint
//! thresholds, grown until every leaf is pure or too small to split. linfa
//! scans the feature columns in order and keeps the first best split, so the
//! columns are handed to it in a seeded order and `random_state` decides ties
//! between equally good features.

use linfa::prelude::{Dataset, Fit, Predict};
use linfa_trees::{DecisionTree, SplitQuality};
use ndarray::{Array1, Array2};
use rand::{seq::SliceRandom, SeedableRng};
use rand_chacha::ChaCha8Rng;
use thiserror::Error;
use vinolab_common::{WineClass, FEATURE_COUNT};

/// Smallest impurity decrease that still earns a split
const MIN_IMPURITY_DECREASE: f64 = 1e-9;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Decision tree fit failed: {0}")]
pub struct TreeFitError(String);

/// Decision-tree classifier over the three wine features
#[derive(Debug)]
pub struct DecisionTreeClassifier {
    random_state: u64,
    /// Model column `j` holds feature `columns[j]`
    columns: [usize; FEATURE_COUNT],
    model: Option<DecisionTree<f64, usize>>,
}

impl DecisionTreeClassifier {
    pub fn new(random_state: u64) -> Self {
        Self {
            random_state,
            columns: std::array::from_fn(|f| f),
            model: None,
        }
    }

    /// Whether [`fit`](Self::fit) has been called with data
    pub fn is_fitted(&self) -> bool {
        self.model.is_some()
    }

    /// Number of leaves in the fitted tree
    pub fn leaf_count(&self) -> usize {
        self.model.as_ref().map_or(0, |model| model.num_leaves())
    }

    /// Grow the tree on `x`/`y`, replacing any previous fit
    pub fn fit(
        &mut self,
        x: &[[f64; FEATURE_COUNT]],
        y: &[WineClass],
    ) -> Result<(), TreeFitError> {
        debug_assert_eq!(x.len(), y.len());

        let mut rng = ChaCha8Rng::seed_from_u64(self.random_state);
        self.columns.sort_unstable();
        self.columns.shuffle(&mut rng);
        self.model = None;

        if x.is_empty() {
            return Ok(());
        }

        let targets: Array1<usize> = y.iter().map(|class| class.index()).collect();
        let dataset = Dataset::new(self.records(x), targets);

        let model = DecisionTree::<f64, usize>::params()
            .split_quality(SplitQuality::Gini)
            .max_depth(None)
            .min_impurity_decrease(MIN_IMPURITY_DECREASE)
            .fit(&dataset)
            .map_err(|e| TreeFitError(e.to_string()))?;

        tracing::debug!(
            leaves = model.num_leaves(),
            depth = model.max_depth(),
            n_samples = x.len(),
            "Decision tree fitted"
        );

        self.model = Some(model);
        Ok(())
    }

    /// Predict every row; empty before fitting
    pub fn predict(&self, x: &[[f64; FEATURE_COUNT]]) -> Vec<WineClass> {
        let Some(model) = &self.model else {
            return Vec::new();
        };
        if x.is_empty() {
            return Vec::new();
        }

        let predictions: Array1<usize> = model.predict(&self.records(x));
        predictions
            .iter()
            .filter_map(|&index| WineClass::from_index(index))
            .collect()
    }

    /// Predict one row; `None` before fitting
    pub fn predict_one(&self, row: &[f64; FEATURE_COUNT]) -> Option<WineClass> {
        self.predict(std::slice::from_ref(row)).into_iter().next()
    }

    /// Impurity decrease per feature as weighed by linfa, normalised to sum
    /// to 1 and returned in feature order.
    ///
    /// All zeros when the tree never split.
    pub fn feature_importances(&self) -> [f64; FEATURE_COUNT] {
        let mut importances = [0.0; FEATURE_COUNT];
        let Some(model) = &self.model else {
            return importances;
        };

        // linfa divides by the total decrease, which is 0/0 for a single leaf
        for (&feature, weight) in self.columns.iter().zip(model.feature_importance()) {
            if weight.is_finite() {
                importances[feature] = weight;
            }
        }
        importances
    }

    /// Reorder the feature columns of `x` into model column order
    fn records(&self, x: &[[f64; FEATURE_COUNT]]) -> Array2<f64> {
        Array2::from_shape_fn((x.len(), FEATURE_COUNT), |(row, column)| {
            x[row][self.columns[column]]
        })
    }
}
