//! Orthonormal two-dimensional DCT-II.

use rustdct::{DctPlanner, TransformType2And3};
use std::fmt;
use std::sync::Arc;

/// Square 2-D DCT-II with orthonormal scaling.
///
/// Rows are transformed, the block transposed, rows transformed again
/// and transposed back. The planner output is unnormalized, so each
/// coefficient is scaled by `sqrt(2 / n)` per axis, and by a further
/// `1 / sqrt(2)` on the zero-frequency index of that axis. A constant
/// block of value `v` therefore yields a DC coefficient of `n * v`.
///
/// Runs in single precision throughout; stored fingerprints were made
/// with an f32 transform and bits near the threshold depend on it.
#[derive(Clone)]
pub struct Dct2d {
    size: usize,
    plan: Arc<dyn TransformType2And3<f32>>,
    scale: Vec<f32>,
}

impl Dct2d {
    /// Plans a `size` x `size` transform.
    pub fn new(size: usize) -> Self {
        let mut planner = DctPlanner::new();
        let plan = planner.plan_dct2(size);

        let ac = (2.0 / size as f64).sqrt();
        let scale = (0..size)
            .map(|k| if k == 0 { ac * std::f64::consts::FRAC_1_SQRT_2 } else { ac })
            .map(|s| s as f32)
            .collect();

        Self { size, plan, scale }
    }

    /// Side length of the transform.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Transforms a row-major `size * size` block.
    pub fn forward(&self, block: &[f32]) -> Vec<f32> {
        let n = self.size;
        assert_eq!(block.len(), n * n, "DCT input must be {n}x{n}");

        let mut data = block.to_vec();
        let mut transposed = vec![0f32; n * n];
        let mut scratch = vec![0f32; self.plan.get_scratch_len()];

        for row in data.chunks_exact_mut(n) {
            self.plan.process_dct2_with_scratch(row, &mut scratch);
        }
        transpose::transpose(&data, &mut transposed, n, n);
        for row in transposed.chunks_exact_mut(n) {
            self.plan.process_dct2_with_scratch(row, &mut scratch);
        }
        transpose::transpose(&transposed, &mut data, n, n);

        for (i, v) in data.iter_mut().enumerate() {
            *v *= self.scale[i / n] * self.scale[i % n];
        }
        data
    }
}

impl fmt::Debug for Dct2d {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dct2d").field("size", &self.size).finish()
    }
}
