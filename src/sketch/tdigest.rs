//! T-digest: the default [`RankSketch`](super::RankSketch).
//!
//! Based on "Computing Extremely Accurate Quantiles Using t-Digests" by Ted
//! Dunning. Values are kept as weighted centroids. Neighbouring centroids are
//! merged while they span at most one unit of the scale function
//! `k(q) = δ/(2π)·asin(2q - 1)`, so centroids near the median grow large,
//! centroids near the tails stay small, and at most about `δ` centroids are
//! retained after compression.

use super::RankSketch;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::f64::consts::PI;

/// A weighted point representing a cluster of values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
struct Centroid {
    mean: f64,
    weight: f64,
}

impl Centroid {
    #[must_use]
    const fn new(mean: f64, weight: f64) -> Self {
        Self { mean, weight }
    }

    /// Weight spread into each neighbouring gap; zero for a single point.
    fn half_spread(&self) -> f64 {
        if self.weight > 1.0 { self.weight / 2.0 } else { 0.0 }
    }
}

/// Mergeable approximate distribution with bounded memory.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TDigest {
    /// Compression δ: higher keeps more centroids and is more accurate.
    compression: f64,
    centroids: Vec<Centroid>,
    /// Whether `centroids` is currently sorted by mean.
    sorted: bool,
    total_weight: f64,
    min: f64,
    max: f64,
}

impl TDigest {
    #[must_use]
    pub const fn new(compression: f64) -> Self {
        Self {
            compression,
            centroids: Vec::new(),
            sorted: true,
            total_weight: 0.0,
            min: f64::INFINITY,
            max: f64::NEG_INFINITY,
        }
    }

    /// Add a single value. NaN and infinities are ignored.
    pub fn add(&mut self, value: f64) {
        self.add_weighted(value, 1.0);
    }

    #[allow(clippy::cast_precision_loss)]
    pub fn add_weighted(&mut self, value: f64, weight: f64) {
        if !value.is_finite() || weight <= 0.0 {
            return;
        }
        self.min = self.min.min(value);
        self.max = self.max.max(value);
        self.centroids.push(Centroid::new(value, weight));
        self.sorted = false;
        self.total_weight += weight;

        if self.centroids.len() as f64 > self.compression * 2.0 {
            self.compress();
        }
    }

    /// Merge another digest into this one.
    pub fn merge_digest(&mut self, other: &Self) {
        if other.total_weight == 0.0 {
            return;
        }
        self.min = self.min.min(other.min);
        self.max = self.max.max(other.max);
        self.centroids.extend(other.centroids.iter().cloned());
        self.total_weight += other.total_weight;
        self.sorted = false;
        self.compress();
    }

    /// Sort centroids and merge neighbours that fit within the size bound.
    pub fn compress(&mut self) {
        if self.centroids.is_empty() {
            return;
        }
        sort_by_mean(&mut self.centroids);
        self.sorted = true;

        let mut compressed = Vec::with_capacity(self.centroids.len());
        let mut cumulative = 0.0;
        let mut k_start = self.scale(0.0);
        let mut current = self.centroids[0].clone();

        for centroid in self.centroids.iter().skip(1) {
            let proposed = current.weight + centroid.weight;
            let q = (cumulative + proposed) / self.total_weight;

            if self.scale(q) - k_start <= 1.0 {
                current.mean = current
                    .mean
                    .mul_add(current.weight, centroid.mean * centroid.weight)
                    / proposed;
                current.weight = proposed;
            } else {
                cumulative += current.weight;
                compressed.push(current);
                k_start = self.scale(cumulative / self.total_weight);
                current = centroid.clone();
            }
        }
        compressed.push(current);
        self.centroids = compressed;
    }

    /// The k1 scale function.
    fn scale(&self, q: f64) -> f64 {
        let x = 2.0f64.mul_add(q, -1.0).clamp(-1.0, 1.0);
        self.compression / (2.0 * PI) * x.asin()
    }

    fn sorted_centroids(&self) -> Cow<'_, [Centroid]> {
        if self.sorted {
            Cow::Borrowed(&self.centroids)
        } else {
            let mut copy = self.centroids.clone();
            sort_by_mean(&mut copy);
            Cow::Owned(copy)
        }
    }

    /// Estimated value at rank `q` (0.0 = minimum, 1.0 = maximum), or NaN
    /// when empty.
    ///
    /// Each centroid is centred on the middle of the rank span it covers and
    /// values between centres are linearly interpolated.
    ///
    /// # Examples
    /// ```
    /// use tallybeam::sketch::TDigest;
    /// let mut digest = TDigest::new(100.0);
    /// for i in 1..=100 {
    ///     digest.add(i as f64);
    /// }
    /// assert!((digest.quantile(0.5) - 50.5).abs() < 1.0);
    /// assert_eq!(digest.quantile(1.0), 100.0);
    /// ```
    #[must_use]
    pub fn quantile(&self, q: f64) -> f64 {
        if self.total_weight == 0.0 {
            return f64::NAN;
        }
        let q = q.clamp(0.0, 1.0);
        if q == 0.0 {
            return self.min;
        }
        if q == 1.0 {
            return self.max;
        }

        let target = q * self.total_weight;
        let centroids = self.sorted_centroids();
        let mut cumulative = 0.0;
        let mut prev_mean = self.min;
        let mut prev_position = 0.0;

        for c in centroids.iter() {
            let centre = cumulative + c.weight / 2.0;
            if target < centre {
                let fraction = (target - prev_position) / (centre - prev_position);
                return fraction.mul_add(c.mean - prev_mean, prev_mean);
            }
            prev_mean = c.mean;
            prev_position = centre;
            cumulative += c.weight;
        }

        let fraction = (target - prev_position) / (self.total_weight - prev_position);
        fraction.mul_add(self.max - prev_mean, prev_mean)
    }

    /// Estimated fraction of values strictly below `value`, or NaN when empty.
    ///
    /// A centroid of weight one is a point mass at its mean. A merged centroid
    /// spreads half its weight over the gap to each neighbour, and mass inside
    /// a gap is linearly interpolated.
    #[must_use]
    pub fn cdf_at(&self, value: f64) -> f64 {
        if self.total_weight == 0.0 {
            return f64::NAN;
        }
        if value <= self.min {
            return 0.0;
        }
        if value > self.max {
            return 1.0;
        }

        let centroids = self.sorted_centroids();
        // Weight of every centroid with a mean below `value`.
        let mut cumulative = 0.0;
        let mut left_mean = self.min;
        let mut left_spread = 0.0;

        for c in centroids.iter() {
            let spread = c.half_spread();
            if c.mean >= value {
                let span = c.mean - left_mean;
                let fraction = if span > 0.0 { (value - left_mean) / span } else { 1.0 };
                let below = fraction.mul_add(left_spread + spread, cumulative - left_spread);
                return below / self.total_weight;
            }
            cumulative += c.weight;
            left_mean = c.mean;
            left_spread = spread;
        }

        let span = self.max - left_mean;
        let fraction = if span > 0.0 { (value - left_mean) / span } else { 1.0 };
        fraction.mul_add(left_spread, cumulative - left_spread) / self.total_weight
    }

    /// Number of centroids currently retained.
    #[must_use]
    pub fn centroid_count(&self) -> usize {
        self.centroids.len()
    }

    #[must_use]
    pub const fn compression(&self) -> f64 {
        self.compression
    }
}

impl RankSketch for TDigest {
    #[allow(clippy::cast_precision_loss)]
    fn with_entries(entries: usize) -> Self {
        Self::new(entries.max(1) as f64)
    }

    fn update(&mut self, value: f64) {
        self.add(value);
    }

    fn merge(&mut self, other: &Self) {
        self.merge_digest(other);
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn count(&self) -> u64 {
        self.total_weight as u64
    }

    fn min(&self) -> Option<f64> {
        (self.total_weight > 0.0).then_some(self.min)
    }

    fn max(&self) -> Option<f64> {
        (self.total_weight > 0.0).then_some(self.max)
    }

    fn quantiles(&self, ranks: &[f64]) -> Vec<f64> {
        ranks.iter().map(|&q| self.quantile(q)).collect()
    }

    fn cdf(&self, split_points: &[f64]) -> Vec<f64> {
        if self.total_weight == 0.0 {
            return Vec::new();
        }
        let mut out: Vec<f64> = split_points.iter().map(|&p| self.cdf_at(p)).collect();
        out.push(1.0);
        out
    }
}

fn sort_by_mean(centroids: &mut [Centroid]) {
    centroids.sort_by(|a, b| a.mean.partial_cmp(&b.mean).unwrap_or(Ordering::Equal));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_inputs_stay_exact() {
        let mut d = TDigest::new(1024.0);
        for v in [5.0, 1.0, 3.0, 2.0, 4.0] {
            d.add(v);
        }
        assert_eq!(d.quantile(0.0), 1.0);
        assert_eq!(d.quantile(1.0), 5.0);
        assert!((d.quantile(0.5) - 3.0).abs() < 1e-9);
        assert_eq!(d.centroid_count(), 5);
    }

    #[test]
    fn compress_bounds_centroids() {
        let mut d = TDigest::new(100.0);
        for i in 0..100_000 {
            d.add(f64::from(i));
        }
        d.compress();
        assert!(d.centroid_count() <= 200, "{} centroids", d.centroid_count());
        assert!((d.quantile(0.5) - 50_000.0).abs() < 1_500.0);
    }

    #[test]
    fn ignores_non_finite() {
        let mut d = TDigest::new(100.0);
        d.add(f64::NAN);
        d.add(f64::INFINITY);
        assert_eq!(RankSketch::count(&d), 0);
        assert!(d.quantile(0.5).is_nan());
    }
}
