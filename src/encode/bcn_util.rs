//! Building blocks shared by the BCn encoders: the endpoint estimator, the
//! variation generator and the quality-tier search budget.

use glam::Vec4;

use crate::{color::Rgb565, CompressionQuality, Rgb24};

/// The principal axis of a set of colors, anchored at their centroid.
///
/// Colors are treated as 4D points. Channels that don't take part are simply
/// left as zero by the caller.
pub(crate) struct ColorLine {
    /// The centroid of the colors
    centroid: Vec4,
    /// The normalized direction of the line, or zero if all colors are the
    /// same.
    d: Vec4,
}
impl ColorLine {
    pub fn new(colors: &[Vec4]) -> Self {
        fn mean(colors: &[Vec4]) -> Vec4 {
            let mut mean = Vec4::ZERO;
            for &color in colors {
                mean += color;
            }
            mean * (1. / colors.len() as f32)
        }
        fn covariance_matrix(colors: &[Vec4], centroid: Vec4) -> [Vec4; 4] {
            let mut cov = [Vec4::ZERO; 4];

            for &p in colors {
                let d = p - centroid;
                cov[0] += d * d.x;
                cov[1] += d * d.y;
                cov[2] += d * d.z;
                cov[3] += d * d.w;
            }

            let n_r = 1.0 / colors.len() as f32;
            cov.map(|row| row * n_r)
        }
        fn largest_eigenvector(matrix: [Vec4; 4]) -> Vec4 {
            // Start from the row of the channel with the most variance. Unlike
            // a fixed start vector, this can't be orthogonal to the dominant
            // eigenvector unless the matrix is zero.
            let diagonal = [matrix[0].x, matrix[1].y, matrix[2].z, matrix[3].w];
            let mut start = 0;
            for (i, &v) in diagonal.iter().enumerate() {
                if v > diagonal[start] {
                    start = i;
                }
            }

            // power iteration
            let mut v = matrix[start].normalize_or_zero();
            for _ in 0..8 {
                let next = Vec4::new(
                    matrix[0].dot(v),
                    matrix[1].dot(v),
                    matrix[2].dot(v),
                    matrix[3].dot(v),
                );
                v = next.normalize_or_zero();
            }
            v
        }

        debug_assert!(!colors.is_empty());

        let centroid = mean(colors);
        let covariance = covariance_matrix(colors, centroid);
        let mut d = largest_eigenvector(covariance);
        if !d.is_finite() {
            d = Vec4::ZERO;
        }

        Self { centroid, d }
    }

    /// Whether all colors are (numerically) the same.
    pub fn is_degenerate(&self) -> bool {
        self.d == Vec4::ZERO
    }

    /// Returns the point along the line at parameter `t`.
    pub fn at(&self, t: f32) -> Vec4 {
        self.centroid + self.d * t
    }
    /// Projects the points onto the line and returns the parameter `t`.
    pub fn project(&self, color: Vec4) -> f32 {
        let diff = color - self.centroid;
        diff.dot(self.d)
    }

    /// The points on the line that the colors with the smallest and largest
    /// projection map to.
    ///
    /// For a degenerate line, both points are the centroid.
    pub fn extremes(&self, colors: &[Vec4]) -> (Vec4, Vec4) {
        if self.is_degenerate() {
            return (self.centroid, self.centroid);
        }

        let mut min_t = f32::INFINITY;
        let mut max_t = f32::NEG_INFINITY;
        for &color in colors {
            let t = self.project(color);
            min_t = min_t.min(t);
            max_t = max_t.max(t);
        }
        (self.at(min_t), self.at(max_t))
    }
}

/// Converts a `0..=255` float vector to bytes, clamping out-of-range values.
pub(crate) fn vec4_to_u8(v: Vec4) -> [u8; 4] {
    let v = (v + Vec4::splat(0.5)).clamp(Vec4::ZERO, Vec4::splat(255.0));
    [v.x as u8, v.y as u8, v.z as u8, v.w as u8]
}

/// Computes the principal axis of the RGB values of the given pixels and
/// returns the 565 colors of the two extreme projections as `(min, max)`.
pub(crate) fn pca_endpoints_565(colors: &[[u8; 3]]) -> (Rgb565, Rgb565) {
    debug_assert!(colors.len() <= 16);

    let mut buffer = [Vec4::ZERO; 16];
    for (point, &[r, g, b]) in buffer.iter_mut().zip(colors) {
        *point = Vec4::new(r as f32, g as f32, b as f32, 0.0);
    }
    let points = &buffer[..colors.len().min(16)];

    let line = ColorLine::new(points);
    let (min, max) = line.extremes(points);

    let to_565 = |v: Vec4| {
        let [r, g, b, _] = vec4_to_u8(v);
        Rgb565::from_rgb24(Rgb24::new(r, g, b))
    };
    (to_565(min), to_565(max))
}

/// The number of variations in one cycle of the pattern for endpoints with
/// `channels` channels.
pub(crate) const fn variation_count(channels: usize) -> usize {
    channels * 8 + 4
}
/// The length of the variation pattern for 565 colors.
pub(crate) const VAR_PATTERN_COUNT: usize = variation_count(3);

/// Returns the `i`-th variation of the endpoint pair `(c0, c1)`.
///
/// The pattern cycles with a period of [`variation_count`]`(N)`. For every
/// channel it nudges `c0`, `c1`, both in the same direction and both in
/// opposite directions by one step. The last 4 entries move all channels of
/// one endpoint at once. Values are clamped to `0..=max`.
pub(crate) fn variate<const N: usize>(
    c0: [u8; N],
    c1: [u8; N],
    max: [u8; N],
    i: usize,
) -> ([u8; N], [u8; N]) {
    const STEPS: [(i8, i8); 8] = [
        (1, 0),
        (-1, 0),
        (0, 1),
        (0, -1),
        (1, 1),
        (-1, -1),
        (1, -1),
        (-1, 1),
    ];

    let nudge = |v: u8, d: i8, max: u8| (v as i16 + d as i16).clamp(0, max as i16) as u8;

    let mut c0 = c0;
    let mut c1 = c1;
    let pattern = i % variation_count(N);
    if pattern < N * 8 {
        let channel = pattern / 8;
        let (d0, d1) = STEPS[pattern % 8];
        c0[channel] = nudge(c0[channel], d0, max[channel]);
        c1[channel] = nudge(c1[channel], d1, max[channel]);
    } else {
        let (d0, d1) = [(1, 0), (-1, 0), (0, 1), (0, -1)][pattern - N * 8];
        for channel in 0..N {
            c0[channel] = nudge(c0[channel], d0, max[channel]);
            c1[channel] = nudge(c1[channel], d1, max[channel]);
        }
    }
    (c0, c1)
}

/// [`variate`] for 565 endpoints.
pub(crate) fn variate_565(c0: Rgb565, c1: Rgb565, i: usize) -> (Rgb565, Rgb565) {
    const MAX: [u8; 3] = [31, 63, 31];
    let (a, b) = variate([c0.r, c0.g, c0.b], [c1.r, c1.g, c1.b], MAX, i);
    (Rgb565::new(a[0], a[1], a[2]), Rgb565::new(b[0], b[1], b[2]))
}

/// How much effort an encoder spends searching for better endpoints.
///
/// Budgets of higher quality tiers always extend the budgets of lower tiers:
/// they try the same candidates in the same order, and then some more. Since
/// a candidate is only accepted if it is strictly better, a higher tier can
/// never produce a worse block.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct SearchBudget {
    /// The maximum number of variations tried after the seed.
    pub max_variations: usize,
    /// The search stops once the error drops below this value.
    pub error_threshold: f32,
    /// Stop once this many consecutive variations didn't improve the error.
    pub stall_limit: Option<usize>,
}
impl SearchBudget {
    /// The budget of the 565 color block encoders.
    pub fn color(quality: CompressionQuality) -> Self {
        match quality {
            CompressionQuality::Fast => Self {
                max_variations: 0,
                error_threshold: f32::INFINITY,
                stall_limit: None,
            },
            CompressionQuality::Balanced => Self {
                max_variations: 48,
                error_threshold: 16.0,
                stall_limit: None,
            },
            CompressionQuality::BestQuality => Self {
                max_variations: 9999,
                error_threshold: 1.0,
                stall_limit: Some(VAR_PATTERN_COUNT),
            },
        }
    }

    /// The budget for optimizing the endpoints of a single BC7 subset.
    pub fn bc7(quality: CompressionQuality) -> Self {
        match quality {
            CompressionQuality::Fast => Self {
                max_variations: 0,
                error_threshold: f32::INFINITY,
                stall_limit: None,
            },
            CompressionQuality::Balanced => Self {
                max_variations: 24,
                error_threshold: 4.0,
                stall_limit: None,
            },
            CompressionQuality::BestQuality => Self {
                max_variations: 256,
                error_threshold: 1.0,
                // each subset uses its own pattern length, see `search`
                stall_limit: Some(usize::MAX),
            },
        }
    }
}

/// How far the gradient encoders (BC3 alpha, BC4 and BC5) search around the
/// value range of a channel.
///
/// Like [`SearchBudget`], higher tiers repeat the sweeps of lower tiers
/// before adding their own, and never stop earlier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct GradientBudget {
    /// The radii of the neighborhood sweeps, in the order they are performed.
    pub sweeps: &'static [u8],
    /// No further sweeps are performed once the error is at most this value.
    pub error_threshold: u32,
}
impl GradientBudget {
    /// The budget of BC4 and the alpha channel of BC3.
    pub fn bc4(quality: CompressionQuality) -> Self {
        match quality {
            CompressionQuality::Fast => Self {
                sweeps: &[3],
                error_threshold: 4,
            },
            CompressionQuality::Balanced => Self {
                sweeps: &[3, 4],
                error_threshold: 4,
            },
            CompressionQuality::BestQuality => Self {
                sweeps: &[3, 4, 8],
                error_threshold: 0,
            },
        }
    }

    /// The budget of each of the two BC5 channels.
    pub fn bc5(quality: CompressionQuality) -> Self {
        match quality {
            CompressionQuality::Fast => Self {
                sweeps: &[3],
                error_threshold: 5,
            },
            CompressionQuality::Balanced => Self {
                sweeps: &[3, 5],
                error_threshold: 1,
            },
            CompressionQuality::BestQuality => Self {
                sweeps: &[3, 5, 8],
                error_threshold: 0,
            },
        }
    }
}

/// Greedy local search over endpoint candidates.
///
/// Starting from `seed`, the `i`-th variation of the current best candidate
/// is evaluated for `i = 0, 1, ...` until the budget is exhausted. A
/// variation replaces the best candidate only if its error is strictly
/// lower.
///
/// `pattern_len` is the period of `variate`. If the budget has a stall
/// limit, the search stops once a full period brought no improvement, since
/// all further variations would be repeats.
pub(crate) fn search<E: Copy>(
    seed: E,
    budget: &SearchBudget,
    pattern_len: usize,
    mut variate: impl FnMut(E, usize) -> E,
    mut evaluate: impl FnMut(E) -> f32,
) -> (E, f32) {
    let mut best = seed;
    let mut best_error = evaluate(seed);

    let stall_limit = budget.stall_limit.map(|limit| limit.min(pattern_len));
    let mut since_last_change = 0;

    for i in 0..budget.max_variations {
        if best_error < budget.error_threshold {
            break;
        }

        let candidate = variate(best, i);
        let error = evaluate(candidate);
        since_last_change += 1;

        if error < best_error {
            best = candidate;
            best_error = error;
            since_last_change = 0;
        }

        if let Some(limit) = stall_limit {
            if since_last_change > limit {
                break;
            }
        }
    }

    (best, best_error)
}

#[inline(always)]
pub(crate) fn diff_sq(a: u8, b: u8) -> u32 {
    let d = a as i32 - b as i32;
    (d * d) as u32
}
