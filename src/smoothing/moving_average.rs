//! Centered Moving Average
//!
//! Suppresses per-frame pose-detector jitter before any angle or distance is
//! measured. Windows are centered with radius `window / 2` and clamped at
//! the sequence ends: edge samples average only the neighbours that exist,
//! with no zero-padding and no wraparound.
//!
//! Both filters run in O(T) using prefix sums over the series.

use crate::geometry::Point2;

/// Default smoothing window (frames)
pub const DEFAULT_WINDOW: usize = 5;

/// Smooth a gap-free series of points.
///
/// Output length always equals input length. A window of 0 or 1 returns
/// the input unchanged.
pub fn moving_average(series: &[Point2], window: usize) -> Vec<Point2> {
    if window <= 1 {
        return series.to_vec();
    }

    let n = series.len();
    let half = window / 2;

    let mut sum_x = Vec::with_capacity(n + 1);
    let mut sum_y = Vec::with_capacity(n + 1);
    sum_x.push(0.0);
    sum_y.push(0.0);
    for (i, point) in series.iter().enumerate() {
        sum_x.push(sum_x[i] + point.x);
        sum_y.push(sum_y[i] + point.y);
    }

    (0..n)
        .map(|i| {
            let lo = i.saturating_sub(half);
            let hi = (i + half + 1).min(n);
            let count = (hi - lo) as f64;
            Point2::new((sum_x[hi] - sum_x[lo]) / count, (sum_y[hi] - sum_y[lo]) / count)
        })
        .collect()
}

/// Smoothed time-series of positions for one joint.
///
/// `None` marks a frame where the joint was not detected.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Track {
    samples: Vec<Option<Point2>>,
}

impl Track {
    /// Wrap samples without filtering
    pub fn from_samples(samples: Vec<Option<Point2>>) -> Self {
        Self { samples }
    }

    /// Position at a frame, if the joint is available there
    pub fn at(&self, frame: usize) -> Option<Point2> {
        self.samples.get(frame).copied().flatten()
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of frames where the joint is available
    pub fn available_count(&self) -> usize {
        self.samples.iter().filter(|s| s.is_some()).count()
    }

    pub fn samples(&self) -> &[Option<Point2>] {
        &self.samples
    }
}

/// Smooth a joint track that may have undetected frames.
///
/// A frame without a raw sample stays unavailable. A frame with a raw
/// sample averages the available samples inside its window. On a gap-free
/// track the result matches [`moving_average`].
pub fn smooth_track(samples: &[Option<Point2>], window: usize) -> Track {
    if window <= 1 {
        return Track::from_samples(samples.to_vec());
    }

    let n = samples.len();
    let half = window / 2;

    let mut sum_x = Vec::with_capacity(n + 1);
    let mut sum_y = Vec::with_capacity(n + 1);
    let mut seen = Vec::with_capacity(n + 1);
    sum_x.push(0.0);
    sum_y.push(0.0);
    seen.push(0usize);
    for (i, sample) in samples.iter().enumerate() {
        let (x, y, c) = match sample {
            Some(p) => (p.x, p.y, 1),
            None => (0.0, 0.0, 0),
        };
        sum_x.push(sum_x[i] + x);
        sum_y.push(sum_y[i] + y);
        seen.push(seen[i] + c);
    }

    let smoothed = samples
        .iter()
        .enumerate()
        .map(|(i, sample)| {
            sample.map(|_| {
                let lo = i.saturating_sub(half);
                let hi = (i + half + 1).min(n);
                // The sample itself is present, so count >= 1
                let count = (seen[hi] - seen[lo]) as f64;
                Point2::new(
                    (sum_x[hi] - sum_x[lo]) / count,
                    (sum_y[hi] - sum_y[lo]) / count,
                )
            })
        })
        .collect();

    Track::from_samples(smoothed)
}
