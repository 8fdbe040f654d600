// Dataset combinators - subsets and reproducible splits

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use crate::dataset::Dataset;
use crate::error::{DataError, Result};

// SubsetDataset - view of selected indices

/// A dataset that exposes only the samples at the given indices.
///
/// This is useful for train/val/test splitting.
#[derive(Debug, Clone)]
pub struct SubsetDataset<D: Dataset> {
    inner: D,
    indices: Vec<usize>,
}

impl<D: Dataset> SubsetDataset<D> {
    /// Create a subset of `inner` containing only the samples at `indices`.
    ///
    /// # Errors
    /// Fails with `IndexOutOfRange` if any index is past the end of `inner`.
    pub fn new(inner: D, indices: Vec<usize>) -> Result<Self> {
        let len = inner.len();
        if let Some(&index) = indices.iter().find(|&&i| i >= len) {
            return Err(DataError::IndexOutOfRange { index, len });
        }
        Ok(Self { inner, indices })
    }

    /// Positions in the wrapped dataset, in subset order.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn inner(&self) -> &D {
        &self.inner
    }
}

impl<D: Dataset> Dataset for SubsetDataset<D> {
    type Item = D::Item;

    fn len(&self) -> usize {
        self.indices.len()
    }

    fn get(&self, index: usize) -> Result<D::Item> {
        let inner_index = *self.indices.get(index).ok_or(DataError::IndexOutOfRange {
            index,
            len: self.indices.len(),
        })?;
        self.inner.get(inner_index)
    }

    fn name(&self) -> &str {
        self.inner.name()
    }
}

// train_test_split

/// Shuffle the indices of `dataset` with `seed` and cut them into 2 or 3
/// subsets with the given ratios (which must sum to 1). The last split takes
/// the rounding remainder.
pub fn train_test_split<D>(dataset: D, ratios: &[f64], seed: u64) -> Result<Vec<SubsetDataset<D>>>
where
    D: Dataset + Clone,
{
    if ratios.len() < 2 || ratios.len() > 3 {
        return Err(DataError::config("ratios must have 2 or 3 elements"));
    }
    if ratios.iter().any(|r| !(0.0..=1.0).contains(r)) {
        return Err(DataError::config("ratios must lie in [0, 1]"));
    }
    let sum: f64 = ratios.iter().sum();
    if (sum - 1.0).abs() > 1e-6 {
        return Err(DataError::config(format!(
            "ratios must sum to 1.0, got {sum}"
        )));
    }

    let n = dataset.len();
    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let mut splits = Vec::with_capacity(ratios.len());
    let mut offset = 0;
    for (i, &ratio) in ratios.iter().enumerate() {
        let count = if i == ratios.len() - 1 {
            n - offset
        } else {
            (n as f64 * ratio).round() as usize
        };
        let end = (offset + count).min(n);
        splits.push(SubsetDataset::new(
            dataset.clone(),
            indices[offset..end].to_vec(),
        )?);
        offset = end;
    }

    Ok(splits)
}

// Tests

#[cfg(test)]
mod tests {
    use super::*;

    /// Tiny helper dataset for testing.
    #[derive(Debug, Clone)]
    struct TinyDataset {
        n: usize,
    }

    impl Dataset for TinyDataset {
        type Item = usize;

        fn len(&self) -> usize {
            self.n
        }

        fn get(&self, index: usize) -> Result<usize> {
            if index >= self.n {
                return Err(DataError::IndexOutOfRange { index, len: self.n });
            }
            Ok(index)
        }
    }

    #[test]
    fn subset_maps_indices() {
        let sub = SubsetDataset::new(TinyDataset { n: 10 }, vec![7, 2, 5]).unwrap();
        assert_eq!(sub.len(), 3);
        assert_eq!(sub.get(0).unwrap(), 7);
        assert_eq!(sub.get(2).unwrap(), 5);
        assert!(matches!(
            sub.get(3),
            Err(DataError::IndexOutOfRange { index: 3, len: 3 })
        ));
    }

    #[test]
    fn subset_rejects_bad_indices() {
        let err = SubsetDataset::new(TinyDataset { n: 4 }, vec![0, 4]).unwrap_err();
        assert!(matches!(err, DataError::IndexOutOfRange { index: 4, len: 4 }));
    }

    #[test]
    fn train_test_split_two_way() {
        let splits = train_test_split(TinyDataset { n: 100 }, &[0.8, 0.2], 42).unwrap();
        assert_eq!(splits.len(), 2);
        assert_eq!(splits[0].len(), 80);
        assert_eq!(splits[1].len(), 20);

        let mut all: Vec<usize> = splits
            .iter()
            .flat_map(|s| s.indices().iter().copied())
            .collect();
        all.sort_unstable();
        assert_eq!(all, (0..100).collect::<Vec<_>>());
    }

    #[test]
    fn train_test_split_three_way_remainder() {
        let splits = train_test_split(TinyDataset { n: 11 }, &[0.6, 0.2, 0.2], 1).unwrap();
        let sizes: Vec<usize> = splits.iter().map(|s| s.len()).collect();
        assert_eq!(sizes.iter().sum::<usize>(), 11);
        assert_eq!(sizes[0], 7);
        assert_eq!(sizes[1], 2);
    }

    #[test]
    fn train_test_split_reproducible() {
        let a = train_test_split(TinyDataset { n: 50 }, &[0.5, 0.5], 7).unwrap();
        let b = train_test_split(TinyDataset { n: 50 }, &[0.5, 0.5], 7).unwrap();
        assert_eq!(a[0].indices(), b[0].indices());
        let c = train_test_split(TinyDataset { n: 50 }, &[0.5, 0.5], 8).unwrap();
        assert_ne!(a[0].indices(), c[0].indices());
    }

    #[test]
    fn train_test_split_bad_ratios() {
        assert!(train_test_split(TinyDataset { n: 5 }, &[1.0], 0).is_err());
        assert!(train_test_split(TinyDataset { n: 5 }, &[0.5, 0.6], 0).is_err());
        assert!(train_test_split(TinyDataset { n: 5 }, &[1.5, -0.5], 0).is_err());
    }
}
