//! Stratified shuffle split
//!
//! Partitions sample indices into train and test subsets so that each class
//! keeps its share of the data in both, as closely as integer counts allow.
//! All randomness comes from the caller's seeded RNG.

use rand::{seq::SliceRandom, Rng};
use vinolab_common::WineClass;

use super::{AnalysisError, InsufficientReason};

/// Row indices of the train and test subsets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitIndices {
    pub train: Vec<usize>,
    pub test: Vec<usize>,
}

/// Per-class member counts, indexed by label
pub fn class_counts(y: &[WineClass]) -> [usize; WineClass::COUNT] {
    let mut counts = [0; WineClass::COUNT];
    for class in y {
        counts[class.index()] += 1;
    }
    counts
}

/// Split `y` into train/test row indices with `test_fraction` of the rows held out.
///
/// The test subset gets `ceil(test_fraction * n)` rows. Per-class allocation
/// follows the most likely draw of a multivariate hypergeometric with the
/// observed class proportions: floor the proportional share, then hand out
/// the leftover rows to the largest fractional remainders, breaking ties with
/// `rng`.
pub fn stratified_split<R: Rng + ?Sized>(
    y: &[WineClass],
    test_fraction: f64,
    rng: &mut R,
) -> Result<SplitIndices, AnalysisError> {
    let n = y.len();
    let counts = class_counts(y);
    let present: Vec<usize> = (0..WineClass::COUNT).filter(|&c| counts[c] > 0).collect();

    let insufficient = |reason| AnalysisError::InsufficientData {
        reason,
        class_counts: counts,
    };

    if present.len() < 2 {
        let class = present
            .first()
            .and_then(|&c| WineClass::from_index(c))
            .unwrap_or(WineClass::Class0);
        return Err(insufficient(InsufficientReason::SingleClass { class }));
    }

    for &c in &present {
        if counts[c] < 2 {
            let class = WineClass::from_index(c).unwrap_or(WineClass::Class0);
            return Err(insufficient(InsufficientReason::ClassTooSmall {
                class,
                count: counts[c],
            }));
        }
    }

    let n_test = ((test_fraction * n as f64).ceil() as usize).min(n);
    let n_train = n - n_test;
    let n_classes = present.len();

    if n_train < n_classes {
        return Err(insufficient(InsufficientReason::SubsetTooSmall {
            subset: "train",
            size: n_train,
            classes: n_classes,
        }));
    }
    if n_test < n_classes {
        return Err(insufficient(InsufficientReason::SubsetTooSmall {
            subset: "test",
            size: n_test,
            classes: n_classes,
        }));
    }

    let present_counts: Vec<usize> = present.iter().map(|&c| counts[c]).collect();
    let train_alloc = approximate_mode(&present_counts, n_train, rng);
    let remaining: Vec<usize> = present_counts
        .iter()
        .zip(&train_alloc)
        .map(|(&total, &taken)| total - taken)
        .collect();
    let test_alloc = approximate_mode(&remaining, n_test, rng);

    let mut train = Vec::with_capacity(n_train);
    let mut test = Vec::with_capacity(n_test);

    for (slot, &c) in present.iter().enumerate() {
        let mut members: Vec<usize> = (0..n).filter(|&i| y[i].index() == c).collect();
        members.shuffle(rng);
        let (to_train, rest) = members.split_at(train_alloc[slot]);
        train.extend_from_slice(to_train);
        test.extend_from_slice(&rest[..test_alloc[slot]]);
    }

    train.shuffle(rng);
    test.shuffle(rng);

    tracing::debug!(
        n_samples = n,
        n_train = train.len(),
        n_test = test.len(),
        "Stratified split computed"
    );

    Ok(SplitIndices { train, test })
}

/// Spread `n_draws` over classes in proportion to `counts`
fn approximate_mode<R: Rng + ?Sized>(counts: &[usize], n_draws: usize, rng: &mut R) -> Vec<usize> {
    let total: usize = counts.iter().sum();
    if total == 0 {
        return vec![0; counts.len()];
    }

    let continuous: Vec<f64> = counts
        .iter()
        .map(|&c| c as f64 / total as f64 * n_draws as f64)
        .collect();
    let mut floored: Vec<usize> = continuous.iter().map(|v| v.floor() as usize).collect();
    let mut need = n_draws.saturating_sub(floored.iter().sum());

    if need > 0 {
        let remainder: Vec<f64> = continuous
            .iter()
            .zip(&floored)
            .map(|(&v, &f)| v - f as f64)
            .collect();
        let mut values = remainder.clone();
        values.sort_by(|a, b| b.total_cmp(a));
        values.dedup();

        for value in values {
            let tied: Vec<usize> = (0..remainder.len())
                .filter(|&i| remainder[i] == value)
                .collect();
            let add_now = tied.len().min(need);
            for &i in tied.choose_multiple(rng, add_now) {
                floored[i] += 1;
            }
            need -= add_now;
            if need == 0 {
                break;
            }
        }
    }

    floored
}
