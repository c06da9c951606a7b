//! Seeded subset selection: fraction sampling and equal-size sharding.
//!
//! Every function here is pure in `(items, seed, parameters)`. Callers pass
//! sorted input so results do not depend on filesystem listing order.

use crate::types::{DatasetError, DatasetResult};
use data_contracts::SelectionMode;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::ops::Range;

pub fn check_fraction(fraction: f64) -> DatasetResult<()> {
    if fraction.is_nan() || fraction <= 0.0 || fraction > 1.0 {
        return Err(DatasetError::InvalidFraction(fraction));
    }
    Ok(())
}

/// `max(1, floor(fraction * n))`, capped at `n`.
pub fn subset_size(n: usize, fraction: f64) -> usize {
    let k = (n as f64 * fraction).floor() as usize;
    k.max(1).min(n)
}

/// Draw `subset_size(items.len(), fraction)` items uniformly without replacement.
pub fn sample_fraction<T: Clone>(items: &[T], fraction: f64, seed: u64) -> DatasetResult<Vec<T>> {
    check_fraction(fraction)?;
    let k = subset_size(items.len(), fraction);
    let mut rng = StdRng::seed_from_u64(seed);
    Ok(rand::seq::index::sample(&mut rng, items.len(), k)
        .into_iter()
        .map(|i| items[i].clone())
        .collect())
}

/// Sizes of `count` shards over `n` items; the first `n % count` get one extra.
pub fn shard_sizes(n: usize, count: usize) -> DatasetResult<Vec<usize>> {
    if count == 0 {
        return Err(DatasetError::InvalidShardCount);
    }
    let base = n / count;
    let extra = n % count;
    Ok((1..=count)
        .map(|index| base + usize::from(index <= extra))
        .collect())
}

/// Half-open range of the 1-based shard `index` within `n` shuffled items.
pub fn shard_range(n: usize, count: usize, index: usize) -> DatasetResult<Range<usize>> {
    if count == 0 {
        return Err(DatasetError::InvalidShardCount);
    }
    if index == 0 || index > count {
        return Err(DatasetError::ShardIndexOutOfRange { index, count });
    }
    let base = n / count;
    let extra = n % count;
    let before = index - 1;
    let start = before * base + before.min(extra);
    let len = base + usize::from(index <= extra);
    Ok(start..start + len)
}

/// Seeded full shuffle of `items`.
pub fn shuffled<T: Clone>(items: &[T], seed: u64) -> Vec<T> {
    let mut order = items.to_vec();
    let mut rng = StdRng::seed_from_u64(seed);
    order.shuffle(&mut rng);
    order
}

/// Shard `index` (1-based) of `count` after a seeded shuffle of `items`.
pub fn select_shard<T: Clone>(
    items: &[T],
    count: usize,
    index: usize,
    seed: u64,
) -> DatasetResult<Vec<T>> {
    let range = shard_range(items.len(), count, index)?;
    let order = shuffled(items, seed);
    Ok(order[range].to_vec())
}

/// Apply a selection mode to `items`.
pub fn select<T: Clone>(items: &[T], mode: &SelectionMode, seed: u64) -> DatasetResult<Vec<T>> {
    match *mode {
        SelectionMode::Full => Ok(items.to_vec()),
        SelectionMode::Fraction { fraction } => sample_fraction(items, fraction, seed),
        SelectionMode::Shard { count, index } => select_shard(items, count, index, seed),
    }
}
