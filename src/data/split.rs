//! Reproducible train/validation partition over dataset indices.
//!
//! Nothing is persisted: the partition is recomputed from `(N, val_ratio, seed)`
//! every time a dataset is opened. Validation indices are drawn without
//! replacement by `rand::seq::index::sample` (rand 0.8) driven by
//! `ChaCha8Rng::seed_from_u64(seed)` (rand_chacha 0.3). Changing either crate
//! version or the generator changes which indices are drawn for a given seed,
//! so bump `SPLIT_ALGORITHM` when doing so.

use std::collections::BTreeSet;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::error::{DataError, Result};

pub const SPLIT_ALGORITHM: &str = "chacha8/rand-0.8-index-sample/v1";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitAssignment {
    len: usize,
    validation: BTreeSet<usize>,
}

impl SplitAssignment {
    pub fn assign(len: usize, val_ratio: f64, seed: u64) -> Result<Self> {
        if len == 0 {
            return Err(DataError::InvalidConfig(
                "cannot split an empty dataset".to_string(),
            ));
        }
        if !(val_ratio > 0.0 && val_ratio < 1.0) {
            return Err(DataError::InvalidConfig(format!(
                "val_ratio must be in (0, 1), got {val_ratio}"
            )));
        }

        let val_size = validation_size(len, val_ratio);
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let validation = rand::seq::index::sample(&mut rng, len, val_size)
            .into_iter()
            .collect();

        Ok(Self { len, validation })
    }

    /// Number of indices covered, train and validation together.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn validation_len(&self) -> usize {
        self.validation.len()
    }

    pub fn train_len(&self) -> usize {
        self.len - self.validation.len()
    }

    pub fn is_validation(&self, index: usize) -> bool {
        self.validation.contains(&index)
    }

    pub fn is_train(&self, index: usize) -> bool {
        index < self.len && !self.is_validation(index)
    }

    /// Validation indices in ascending order.
    pub fn validation_indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.validation.iter().copied()
    }

    /// Train indices in ascending order.
    pub fn train_indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.len).filter(move |i| !self.validation.contains(i))
    }
}

/// `max(1, round(len * val_ratio))` clamped to `len`, rounding half to even.
pub(crate) fn validation_size(len: usize, val_ratio: f64) -> usize {
    let size = (len as f64 * val_ratio).round_ties_even() as usize;
    size.max(1).min(len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_inputs_give_same_split() {
        let a = SplitAssignment::assign(1000, 0.2, 42).unwrap();
        let b = SplitAssignment::assign(1000, 0.2, 42).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn different_seeds_give_different_splits() {
        let a = SplitAssignment::assign(1000, 0.2, 1).unwrap();
        let b = SplitAssignment::assign(1000, 0.2, 2).unwrap();
        assert_ne!(
            a.validation_indices().collect::<Vec<_>>(),
            b.validation_indices().collect::<Vec<_>>()
        );
    }

    #[test]
    fn partition_is_complete_and_disjoint() {
        for (len, ratio) in [(1, 0.5), (7, 0.3), (10, 0.2), (257, 0.9)] {
            let split = SplitAssignment::assign(len, ratio, 7).unwrap();
            let val: BTreeSet<usize> = split.validation_indices().collect();
            let train: BTreeSet<usize> = split.train_indices().collect();

            assert!(val.is_disjoint(&train));
            let all: BTreeSet<usize> = val.union(&train).copied().collect();
            assert_eq!(all, (0..len).collect());
            assert_eq!(split.train_len(), train.len());
            assert!(val.iter().all(|&i| i < len));
        }
    }

    #[test]
    fn validation_size_rounds_half_to_even() {
        assert_eq!(validation_size(5, 0.2), 1);
        assert_eq!(validation_size(3, 0.5), 2);
        assert_eq!(validation_size(5, 0.5), 2);
        assert_eq!(validation_size(10, 0.2), 2);
        assert_eq!(validation_size(100, 0.25), 25);
    }

    #[test]
    fn validation_size_never_drops_below_one() {
        assert_eq!(validation_size(3, 0.01), 1);
        let split = SplitAssignment::assign(3, 0.01, 0).unwrap();
        assert_eq!(split.validation_len(), 1);
        assert_eq!(split.train_len(), 2);
    }

    #[test]
    fn single_record_goes_to_validation() {
        let split = SplitAssignment::assign(1, 0.2, 42).unwrap();
        assert!(split.is_validation(0));
        assert!(!split.is_train(0));
        assert_eq!(split.train_len(), 0);
    }

    #[test]
    fn rejects_out_of_range_ratio() {
        for ratio in [0.0, 1.0, -0.1, 1.5, f64::NAN] {
            let err = SplitAssignment::assign(10, ratio, 42).unwrap_err();
            assert!(matches!(err, DataError::InvalidConfig(_)));
        }
    }

    #[test]
    fn rejects_empty_dataset() {
        let err = SplitAssignment::assign(0, 0.2, 42).unwrap_err();
        assert!(matches!(err, DataError::InvalidConfig(_)));
    }
}
