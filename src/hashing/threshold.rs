//! Bit extraction from the low-frequency block.

use super::fingerprint::{PerceptualHash, HASH_BYTES};

/// Side of the retained low-frequency block.
pub const BLOCK_SIDE: usize = 8;

/// Top-left `BLOCK_SIDE` x `BLOCK_SIDE` DCT coefficients, row-major.
pub type CoefficientBlock = [[f32; BLOCK_SIDE]; BLOCK_SIDE];

/// Copies the top-left corner of a row-major `stride`-wide coefficient grid.
pub fn low_frequency_block(coefficients: &[f32], stride: usize) -> CoefficientBlock {
    let mut block = [[0f32; BLOCK_SIDE]; BLOCK_SIDE];
    for (r, row) in block.iter_mut().enumerate() {
        row.copy_from_slice(&coefficients[r * stride..r * stride + BLOCK_SIDE]);
    }
    block
}

/// Mean of the 63 coefficients other than DC, in f64.
pub fn mean_excluding_dc(block: &CoefficientBlock) -> f64 {
    let sum: f64 = block
        .iter()
        .flatten()
        .skip(1)
        .map(|&v| f64::from(v))
        .sum();
    sum / (BLOCK_SIDE * BLOCK_SIDE - 1) as f64
}

/// One bit per coefficient, set when strictly above the non-DC mean.
///
/// Row `r` becomes byte `r`, column 0 in the most significant bit. The
/// DC coefficient takes part in the comparison even though it is
/// excluded from the mean.
pub fn extract_bits(block: &CoefficientBlock) -> PerceptualHash {
    let mean = mean_excluding_dc(block);
    let mut bytes = [0u8; HASH_BYTES];

    for (byte, row) in bytes.iter_mut().zip(block) {
        for &value in row {
            *byte = (*byte << 1) | u8::from(f64::from(value) > mean);
        }
    }
    PerceptualHash::from_bytes(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dc_excluded_from_mean() {
        let mut block = [[2.0f32; BLOCK_SIDE]; BLOCK_SIDE];
        block[0][0] = 20_000.0;

        assert_eq!(mean_excluding_dc(&block), 2.0);
        // only DC is above the mean; ties are not set
        assert_eq!(extract_bits(&block).to_u64(), 0x8000_0000_0000_0000);
    }

    #[test]
    fn test_row_major_msb_first() {
        let mut block = [[0.0f32; BLOCK_SIDE]; BLOCK_SIDE];
        block[0][0] = -1.0;
        block[1][7] = 5.0;
        block[7][0] = 5.0;

        let hash = extract_bits(&block);
        assert_eq!(hash.as_bytes(), &[0, 0x01, 0, 0, 0, 0, 0, 0x80]);
    }

    #[test]
    fn test_low_frequency_block_takes_corner() {
        let coefficients: Vec<f32> = (0..32 * 32).map(|i| i as f32).collect();
        let block = low_frequency_block(&coefficients, 32);

        assert_eq!(block[0], [0., 1., 2., 3., 4., 5., 6., 7.]);
        assert_eq!(block[7][7], (7 * 32 + 7) as f32);
    }
}
