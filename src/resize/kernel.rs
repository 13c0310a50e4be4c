//! Separable resampling kernels.
//!
//! Each algorithm is expressed as a table of taps per destination
//! column (and per destination row): the source indices that feed the
//! output sample and their weights. Indices outside the image are
//! clamped to the nearest edge. A 2-D resample is a horizontal pass
//! over every source row followed by a vertical pass.

use super::quality::Interpolation;
use std::f64::consts::PI;

/// Source contributions to a single destination sample.
type Taps = Vec<(usize, f64)>;

const CUBIC_A: f64 = -0.75;
const AREA_EPSILON: f64 = 1e-3;

/// Resamples interleaved 8-bit samples to `dst_width` x `dst_height`.
///
/// `samples` must hold `width * height * channels` values.
pub(crate) fn resample(
    samples: &[u8],
    width: usize,
    height: usize,
    channels: usize,
    dst_width: usize,
    dst_height: usize,
    interpolation: Interpolation,
) -> Vec<u8> {
    debug_assert_eq!(samples.len(), width * height * channels);

    if interpolation == Interpolation::Area {
        if let (Some(fx), Some(fy)) = (
            integer_factor(width, dst_width),
            integer_factor(height, dst_height),
        ) {
            return block_average(samples, width, channels, dst_width, dst_height, fx, fy);
        }
    }

    // Area averaging only applies when neither axis grows.
    let shrinking = width >= dst_width && height >= dst_height;
    let x_taps = axis_taps(interpolation, width, dst_width, shrinking);
    let y_taps = axis_taps(interpolation, height, dst_height, shrinking);

    let mut rows = vec![0f64; height * dst_width * channels];
    for y in 0..height {
        let src_row = &samples[y * width * channels..(y + 1) * width * channels];
        let dst_row = &mut rows[y * dst_width * channels..(y + 1) * dst_width * channels];
        for (dx, taps) in x_taps.iter().enumerate() {
            for &(sx, weight) in taps {
                for c in 0..channels {
                    dst_row[dx * channels + c] += weight * f64::from(src_row[sx * channels + c]);
                }
            }
        }
    }

    let stride = dst_width * channels;
    let mut out = vec![0u8; dst_height * stride];
    for (dy, taps) in y_taps.iter().enumerate() {
        let dst_row = &mut out[dy * stride..(dy + 1) * stride];
        for (i, value) in dst_row.iter_mut().enumerate() {
            let acc: f64 = taps
                .iter()
                .map(|&(sy, weight)| weight * rows[sy * stride + i])
                .sum();
            *value = saturate(acc);
        }
    }

    out
}

/// Returns `src / dst` when it is a whole number of at least 1.
fn integer_factor(src: usize, dst: usize) -> Option<usize> {
    (dst > 0 && src >= dst && src % dst == 0).then(|| src / dst)
}

/// Averages whole `fx` x `fy` blocks, rounding half up.
fn block_average(
    samples: &[u8],
    width: usize,
    channels: usize,
    dst_width: usize,
    dst_height: usize,
    fx: usize,
    fy: usize,
) -> Vec<u8> {
    let area = (fx * fy) as u64;
    let mut out = Vec::with_capacity(dst_width * dst_height * channels);

    for dy in 0..dst_height {
        for dx in 0..dst_width {
            for c in 0..channels {
                let mut sum = 0u64;
                for sy in dy * fy..(dy + 1) * fy {
                    let row = sy * width;
                    for sx in dx * fx..(dx + 1) * fx {
                        sum += u64::from(samples[(row + sx) * channels + c]);
                    }
                }
                out.push(((sum + area / 2) / area) as u8);
            }
        }
    }

    out
}

/// Builds the tap table for one axis.
fn axis_taps(interpolation: Interpolation, src: usize, dst: usize, shrinking: bool) -> Vec<Taps> {
    let scale = src as f64 / dst as f64;
    (0..dst)
        .map(|d| match interpolation {
            Interpolation::Nearest => nearest_taps(d, src, scale),
            Interpolation::Linear => linear_taps(d, src, scale),
            Interpolation::Area if shrinking => area_taps(d, src, scale),
            Interpolation::Area => area_linear_taps(d, src, dst, scale),
            Interpolation::Cubic => windowed_taps(d, src, scale, 2, cubic_weight),
            Interpolation::Lanczos4 => windowed_taps(d, src, scale, 4, lanczos4_weight),
        })
        .collect()
}

fn nearest_taps(d: usize, src: usize, scale: f64) -> Taps {
    let sx = ((d as f64 * scale).floor() as usize).min(src - 1);
    vec![(sx, 1.0)]
}

/// Two-tap interpolation between `sx` and `sx + 1` with clamped edges.
fn two_taps(sx: isize, fx: f64, src: usize) -> Taps {
    let last = src as isize - 1;
    let (sx, fx) = if sx < 0 {
        (0, 0.0)
    } else if sx >= last {
        (last, 0.0)
    } else {
        (sx, fx)
    };
    let sx = sx as usize;
    if fx == 0.0 {
        vec![(sx, 1.0)]
    } else {
        vec![(sx, 1.0 - fx), (sx + 1, fx)]
    }
}

fn linear_taps(d: usize, src: usize, scale: f64) -> Taps {
    let center = (d as f64 + 0.5) * scale - 0.5;
    let sx = center.floor();
    two_taps(sx as isize, center - sx, src)
}

/// Area interpolation on an axis that grows: linear taps whose
/// fractional offset only becomes non-zero at source pixel borders.
fn area_linear_taps(d: usize, src: usize, dst: usize, scale: f64) -> Taps {
    let inv_scale = dst as f64 / src as f64;
    let sx = (d as f64 * scale).floor();
    let fx = (d as f64 + 1.0) - (sx + 1.0) * inv_scale;
    let fx = if fx <= 0.0 { 0.0 } else { fx - fx.floor() };
    two_taps(sx as isize, fx, src)
}

/// Box filter: every source pixel overlapped by the destination cell,
/// weighted by the overlapped fraction.
fn area_taps(d: usize, src: usize, scale: f64) -> Taps {
    let fsx1 = d as f64 * scale;
    let fsx2 = fsx1 + scale;
    let cell = scale.min(src as f64 - fsx1);

    let sx2 = (fsx2.floor() as usize).min(src - 1);
    let sx1 = (fsx1.ceil() as usize).min(sx2);

    let mut taps = Vec::with_capacity(scale.ceil() as usize + 2);
    if sx1 as f64 - fsx1 > AREA_EPSILON {
        taps.push((sx1 - 1, (sx1 as f64 - fsx1) / cell));
    }
    for sx in sx1..sx2 {
        taps.push((sx, 1.0 / cell));
    }
    if fsx2 - sx2 as f64 > AREA_EPSILON {
        let overlap = (fsx2 - sx2 as f64).min(1.0).min(cell);
        taps.push((sx2, overlap / cell));
    }
    taps
}

/// Symmetric kernel of `radius` taps on each side, normalized to 1.
fn windowed_taps(
    d: usize,
    src: usize,
    scale: f64,
    radius: isize,
    weight: fn(f64) -> f64,
) -> Taps {
    let center = (d as f64 + 0.5) * scale - 0.5;
    let base = center.floor();
    let fx = center - base;
    let base = base as isize;
    let last = src as isize - 1;

    let mut taps: Taps = (1 - radius..=radius)
        .map(|k| {
            let index = (base + k).clamp(0, last) as usize;
            (index, weight(k as f64 - fx))
        })
        .collect();

    let total: f64 = taps.iter().map(|&(_, w)| w).sum();
    if total != 0.0 {
        for tap in &mut taps {
            tap.1 /= total;
        }
    }
    taps
}

/// Keys cubic convolution kernel.
fn cubic_weight(t: f64) -> f64 {
    let t = t.abs();
    if t <= 1.0 {
        ((CUBIC_A + 2.0) * t - (CUBIC_A + 3.0)) * t * t + 1.0
    } else if t < 2.0 {
        ((CUBIC_A * t - 5.0 * CUBIC_A) * t + 8.0 * CUBIC_A) * t - 4.0 * CUBIC_A
    } else {
        0.0
    }
}

/// Lanczos kernel with a = 4.
fn lanczos4_weight(t: f64) -> f64 {
    if t.abs() < f64::EPSILON {
        return 1.0;
    }
    if t.abs() >= 4.0 {
        return 0.0;
    }
    let x = PI * t;
    4.0 * x.sin() * (x / 4.0).sin() / (x * x)
}

#[inline]
fn saturate(value: f64) -> u8 {
    value.round_ties_even().clamp(0.0, 255.0) as u8
}
