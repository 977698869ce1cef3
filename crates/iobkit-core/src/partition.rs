//! # Partitioning
//!
//! Train/validation splits over whole sentences: fixed ratio, fixed count,
//! random sample and k-fold. Non-positive sizes are not errors; they yield
//! a no-op result carrying a [`SplitWarning`].

use std::fmt;

use oorandom::Rand64;
use tracing::{debug, warn};

use crate::error::{IobError, Result};
use crate::store::TagStore;

/// A split parameter that made the operation a no-op.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SplitWarning {
    /// Validation fraction was zero, negative or NaN.
    NonPositiveFraction(f64),
    /// Training count was zero.
    NonPositiveCount,
    /// Sample size was zero.
    NonPositiveSample,
    /// Fewer than two folds were requested.
    TooFewFolds(usize),
}

impl fmt::Display for SplitWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SplitWarning::NonPositiveFraction(fraction) => write!(
                f,
                "split fraction {fraction} is equal to or less than 0, no split was performed"
            ),
            SplitWarning::NonPositiveCount => write!(
                f,
                "training set size is equal to or less than 0, no split was performed"
            ),
            SplitWarning::NonPositiveSample => write!(
                f,
                "sample size is equal to or less than 0, no split was performed"
            ),
            SplitWarning::TooFewFolds(k) => write!(
                f,
                "fold count {k} is equal to or less than 1, no split was performed"
            ),
        }
    }
}

/// Result of a train/validation split.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct Split {
    pub train: TagStore,
    pub validation: TagStore,
    /// Set when the split was skipped.
    pub warning: Option<SplitWarning>,
}

impl Split {
    fn new(train: TagStore, validation: TagStore) -> Self {
        Self {
            train,
            validation,
            warning: None,
        }
    }

    fn skipped(store: &TagStore, warning: SplitWarning) -> Self {
        warn!("{warning}");
        Self {
            train: store.clone(),
            validation: TagStore::new(),
            warning: Some(warning),
        }
    }

    pub fn is_noop(&self) -> bool {
        self.warning.is_some()
    }
}

/// Result of a random draw without replacement.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct Sample {
    /// Drawn sentences, in draw order.
    pub sample: TagStore,
    /// Sentences not drawn, in original order.
    pub remainder: TagStore,
    pub warning: Option<SplitWarning>,
}

/// One cross-validation fold.
#[derive(Debug, Clone, PartialEq)]
pub struct Fold {
    pub index: usize,
    pub train: TagStore,
    pub validation: TagStore,
}

/// All folds produced by [`TagStore::make_k_folds`].
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub struct Folds {
    pub folds: Vec<Fold>,
    /// Validation window size, `total / k`.
    pub fold_size: usize,
    pub warning: Option<SplitWarning>,
}

impl TagStore {
    /// Validation gets the first `floor(len * fraction)` sentences, train
    /// the rest.
    ///
    /// # Examples
    /// ```
    /// use iobkit_core::TagStore;
    ///
    /// let store: TagStore = "a\tO\n.\tO\nb\tO\n.\tO\nc\tO\n.\tO\n".parse().unwrap();
    /// let split = store.split_by_ratio(0.34);
    /// assert_eq!(split.validation.len(), 1);
    /// assert_eq!(split.train.len(), 2);
    /// ```
    pub fn split_by_ratio(&self, fraction: f64) -> Split {
        if fraction.is_nan() || fraction <= 0.0 {
            return Split::skipped(self, SplitWarning::NonPositiveFraction(fraction));
        }

        let n_valid = ((self.len() as f64 * fraction).floor() as usize).min(self.len());
        Split::new(
            self.slice(n_valid..self.len()),
            self.slice(0..n_valid),
        )
    }

    /// Train gets the first `train_size` sentences, validation the rest.
    pub fn split_by_count(&self, train_size: usize) -> Split {
        if train_size == 0 {
            return Split::skipped(self, SplitWarning::NonPositiveCount);
        }

        let n_train = train_size.min(self.len());
        Split::new(self.slice(0..n_train), self.slice(n_train..self.len()))
    }

    /// Draw `k` sentences uniformly without replacement from a copy of the
    /// store. `self` is left untouched.
    ///
    /// A `k` of zero returns the whole copy as `sample` with an empty
    /// remainder and a warning.
    ///
    /// # Errors
    ///
    /// Returns `IobError::SampleTooLarge` if `k` exceeds the number of
    /// sentences.
    pub fn random_sample(&self, k: usize, rng: &mut Rand64) -> Result<Sample> {
        let mut pool = self.clone();

        if k == 0 {
            let warning = SplitWarning::NonPositiveSample;
            warn!("{warning}");
            return Ok(Sample {
                sample: pool,
                remainder: TagStore::new(),
                warning: Some(warning),
            });
        }

        let sample = pool.take_random(k, rng)?;
        Ok(Sample {
            sample,
            remainder: pool,
            warning: None,
        })
    }

    /// Remove `k` uniformly drawn sentences from `self` and return them in
    /// draw order.
    ///
    /// Each index is drawn from the current pool size and the sentence is
    /// removed before the next draw, so the same seed always yields the
    /// same sample. Remaining sentences keep their relative order.
    ///
    /// # Errors
    ///
    /// Returns `IobError::SampleTooLarge` if `k` exceeds `self.len()`; the
    /// store is not modified in that case.
    pub fn take_random(&mut self, k: usize, rng: &mut Rand64) -> Result<TagStore> {
        if k > self.len() {
            return Err(IobError::SampleTooLarge {
                requested: k,
                available: self.len(),
            });
        }

        let pool = self.sentences_mut();
        let mut sample = TagStore::new();
        for _ in 0..k {
            let index = rng.rand_range(0..pool.len() as u64) as usize;
            sample.push(pool.remove(index));
        }
        Ok(sample)
    }

    /// Contiguous k-fold partitions.
    ///
    /// With `fold_size = len / k`, fold `i` validates on
    /// `[i * fold_size, (i + 1) * fold_size)` and trains on everything
    /// else, except the last fold, which validates on the final
    /// `fold_size` sentences. When `len` is not a multiple of `k` the last
    /// window overlaps the one before it and the sentences between the
    /// interior windows and the tail are never validated.
    pub fn make_k_folds(&self, k: usize) -> Folds {
        if k <= 1 {
            let warning = SplitWarning::TooFewFolds(k);
            warn!("{warning}");
            return Folds {
                folds: Vec::new(),
                fold_size: 0,
                warning: Some(warning),
            };
        }

        let total = self.len();
        let fold_size = total / k;
        debug!(fold_size, total, k, "making folds");
        if fold_size == 0 {
            warn!(total, k, "more folds than sentences, validation sets are empty");
        }

        let folds = (0..k)
            .map(|index| {
                let (train, validation) = if index == 0 {
                    (self.slice(fold_size..total), self.slice(0..fold_size))
                } else if index == k - 1 {
                    (
                        self.slice(0..total - fold_size),
                        self.slice(total - fold_size..total),
                    )
                } else {
                    let start = index * fold_size;
                    let end = start + fold_size;
                    let mut train = self.slice(0..start);
                    train.extend(self.sentences()[end..total].iter().cloned());
                    (train, self.slice(start..end))
                };
                Fold {
                    index,
                    train,
                    validation,
                }
            })
            .collect();

        Folds {
            folds,
            fold_size,
            warning: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support::{numbered_sentence, numbered_store, sentence_id};
    use crate::store::Sentence;

    fn ids(store: &TagStore) -> Vec<usize> {
        store.iter().map(sentence_id).collect()
    }

    #[test]
    fn test_split_by_ratio_sizes() {
        let store = numbered_store(10);
        for fraction in [0.1, 0.25, 0.5, 0.99, 1.0] {
            let split = store.split_by_ratio(fraction);
            let expected = (10.0 * fraction).floor() as usize;
            assert_eq!(split.validation.len(), expected);
            assert_eq!(split.train.len() + split.validation.len(), 10);
            assert!(split.warning.is_none());
        }
    }

    #[test]
    fn test_split_by_ratio_takes_head_for_validation() {
        let split = numbered_store(5).split_by_ratio(0.4);
        assert_eq!(ids(&split.validation), [0, 1]);
        assert_eq!(ids(&split.train), [2, 3, 4]);
    }

    #[test]
    fn test_split_by_ratio_nonpositive_is_noop() {
        let store = numbered_store(4);
        for fraction in [0.0, -0.5, f64::NAN] {
            let split = store.split_by_ratio(fraction);
            assert_eq!(split.train, store);
            assert!(split.validation.is_empty());
            assert!(split.is_noop());
        }
    }

    #[test]
    fn test_split_by_ratio_above_one_clamps() {
        let split = numbered_store(4).split_by_ratio(1.5);
        assert_eq!(split.validation.len(), 4);
        assert!(split.train.is_empty());
    }

    #[test]
    fn test_split_by_count() {
        let split = numbered_store(6).split_by_count(4);
        assert_eq!(ids(&split.train), [0, 1, 2, 3]);
        assert_eq!(ids(&split.validation), [4, 5]);

        let split = numbered_store(3).split_by_count(10);
        assert_eq!(split.train.len(), 3);
        assert!(split.validation.is_empty());
    }

    #[test]
    fn test_split_by_count_zero_warns() {
        let store = numbered_store(3);
        let split = store.split_by_count(0);
        assert_eq!(split.train, store);
        assert!(split.validation.is_empty());
        assert_eq!(split.warning, Some(SplitWarning::NonPositiveCount));
    }

    #[test]
    fn test_random_sample_partitions_store() {
        let store = numbered_store(20);
        let mut rng = Rand64::new(42);
        let result = store.random_sample(7, &mut rng).unwrap();

        assert_eq!(result.sample.len(), 7);
        assert_eq!(result.remainder.len(), 13);
        assert_eq!(store.len(), 20);

        let mut all: Vec<_> = ids(&result.sample)
            .into_iter()
            .chain(ids(&result.remainder))
            .collect();
        all.sort_unstable();
        assert_eq!(all, (0..20).collect::<Vec<_>>());
    }

    #[test]
    fn test_random_sample_remainder_keeps_order() {
        let mut rng = Rand64::new(3);
        let result = numbered_store(15).random_sample(5, &mut rng).unwrap();
        let remainder = ids(&result.remainder);
        assert!(remainder.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_random_sample_is_reproducible() {
        let store = numbered_store(50);
        let a = store.random_sample(10, &mut Rand64::new(7)).unwrap();
        let b = store.random_sample(10, &mut Rand64::new(7)).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_random_sample_draws_from_current_pool() {
        // Mirror the draw sequence by hand: one index per step, bounded by
        // the shrinking pool
        let store = numbered_store(6);
        let mut rng = Rand64::new(11);
        let sample = store.random_sample(6, &mut rng).unwrap().sample;

        let mut expected_rng = Rand64::new(11);
        let mut pool: Vec<usize> = (0..6).collect();
        let expected: Vec<usize> = (0..6)
            .map(|_| {
                let index = expected_rng.rand_range(0..pool.len() as u64) as usize;
                pool.remove(index)
            })
            .collect();

        assert_eq!(ids(&sample), expected);
    }

    #[test]
    fn test_random_sample_zero_warns() {
        let store = numbered_store(3);
        let result = store.random_sample(0, &mut Rand64::new(1)).unwrap();
        assert_eq!(result.sample, store);
        assert!(result.remainder.is_empty());
        assert_eq!(result.warning, Some(SplitWarning::NonPositiveSample));
    }

    #[test]
    fn test_take_random_too_large() {
        let mut store = numbered_store(3);
        let err = store.take_random(4, &mut Rand64::new(1)).unwrap_err();
        assert!(matches!(
            err,
            IobError::SampleTooLarge {
                requested: 4,
                available: 3
            }
        ));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_take_random_drains_self() {
        let mut store = numbered_store(8);
        let taken = store.take_random(3, &mut Rand64::new(5)).unwrap();
        assert_eq!(taken.len(), 3);
        assert_eq!(store.len(), 5);
    }

    #[test]
    fn test_k_folds_too_few() {
        let store = numbered_store(5);
        for k in [0, 1] {
            let folds = store.make_k_folds(k);
            assert!(folds.folds.is_empty());
            assert_eq!(folds.warning, Some(SplitWarning::TooFewFolds(k)));
        }
    }

    #[test]
    fn test_k_folds_even_division_covers_every_sentence_once() {
        let store = numbered_store(12);
        let folds = store.make_k_folds(4);
        assert_eq!(folds.folds.len(), 4);
        assert_eq!(folds.fold_size, 3);

        let mut validated: Vec<_> = folds
            .folds
            .iter()
            .flat_map(|fold| ids(&fold.validation))
            .collect();
        validated.sort_unstable();
        assert_eq!(validated, (0..12).collect::<Vec<_>>());

        for fold in &folds.folds {
            assert_eq!(fold.train.len() + fold.validation.len(), 12);
        }
    }

    #[test]
    fn test_k_folds_ten_by_three_tail_overlap() {
        let folds = numbered_store(10).make_k_folds(3);
        assert_eq!(folds.fold_size, 3);

        let first = &folds.folds[0];
        assert_eq!(ids(&first.validation), [0, 1, 2]);
        assert_eq!(ids(&first.train), [3, 4, 5, 6, 7, 8, 9]);

        let middle = &folds.folds[1];
        assert_eq!(ids(&middle.validation), [3, 4, 5]);
        assert_eq!(ids(&middle.train), [0, 1, 2, 6, 7, 8, 9]);

        // The last fold validates on the true tail rather than 6..9, so
        // sentence 6 is never in any validation set
        let last = &folds.folds[2];
        assert_eq!(ids(&last.validation), [7, 8, 9]);
        assert_eq!(ids(&last.train), [0, 1, 2, 3, 4, 5, 6]);
        assert!(folds.folds.iter().all(|f| !ids(&f.validation).contains(&6)));
    }

    #[test]
    fn test_interior_folds_reconstruct_original_order() {
        let store: TagStore = (0..11).map(|i| numbered_sentence(i, 1 + i % 3)).collect();
        let folds = store.make_k_folds(4);
        let size = folds.fold_size;

        for fold in &folds.folds[1..folds.folds.len() - 1] {
            let cut = fold.index * size;
            let train = fold.train.sentences();
            let rebuilt: Vec<Sentence> = train[..cut]
                .iter()
                .chain(fold.validation.sentences())
                .chain(&train[cut..])
                .cloned()
                .collect();
            assert_eq!(rebuilt, store.sentences());
        }
    }

    #[test]
    fn test_k_folds_more_folds_than_sentences() {
        let folds = numbered_store(2).make_k_folds(5);
        assert_eq!(folds.folds.len(), 5);
        assert!(folds.folds.iter().all(|f| f.validation.is_empty()));
        assert!(folds.folds.iter().all(|f| f.train.len() == 2));
    }
}
