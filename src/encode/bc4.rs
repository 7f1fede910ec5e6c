//! Single channel gradient encoder. This is used for BC4, both channels of
//! BC5 and the alpha channel of BC3.

use crate::{bits, decode::bc::bc4_palette};

use super::{bcn_util::GradientBudget, chooser::choose_nearest};

/// Encodes 16 channel values as a BC4 block.
pub(crate) fn compress_bc4_block(block: &[u8; 16], budget: &GradientBudget) -> [u8; 8] {
    compress(block, budget).with_indexes()
}

/// Searches the neighborhood of the value range for the endpoints with the
/// lowest squared error.
///
/// Each sweep of radius `r` tries, for `i = r, r - 1, ..., 1`, six
/// candidates that grow, shrink or shift the range `[min, max]` by `i`.
fn compress(block: &[u8; 16], budget: &GradientBudget) -> EndPoints {
    // 0 and 255 can be represented exactly with the inter4 layout, so they
    // don't count towards the range
    let mut min = 255_u8;
    let mut max = 0_u8;
    for &value in block {
        if value != 0 && value != 255 {
            min = min.min(value);
            max = max.max(value);
        }
    }

    if min > max {
        // all values are 0 or 255
        return EndPoints::new(block, 0, 255);
    }

    let mut best = EndPoints::best_layout(block, max, min);
    if best.error == 0 {
        return best;
    }

    for &radius in budget.sweeps {
        for i in (1..=radius as i16).rev() {
            let (max, min) = (max as i16, min as i16);
            let candidates = [
                (max - i, min + i),
                (max + i, min - i),
                (max, min - i),
                (max + i, min),
                (max, min + i),
                (max - i, min),
            ];

            for (high, low) in candidates {
                let high = high.clamp(0, 255) as u8;
                let low = low.clamp(0, 255) as u8;

                let candidate = EndPoints::best_layout(block, high, low);
                if candidate.error < best.error {
                    best = candidate;
                    if best.error == 0 {
                        return best;
                    }
                }
            }
        }

        if best.error <= budget.error_threshold {
            break;
        }
    }

    best
}

#[derive(Debug, Clone, Copy)]
struct EndPoints {
    red0: u8,
    red1: u8,
    indexes: [u8; 16],
    error: u32,
}
impl EndPoints {
    /// Chooses the indexes for the endpoints as they will be stored.
    fn new(block: &[u8; 16], red0: u8, red1: u8) -> Self {
        let palette = bc4_palette(red0, red1).map(|v| [v]);

        let mut indexes = [0; 16];
        let mut error = 0;
        for (&value, index) in block.iter().zip(indexes.iter_mut()) {
            let (i, e) = choose_nearest(&palette, [value]);
            *index = i;
            error += e;
        }

        Self {
            red0,
            red1,
            indexes,
            error,
        }
    }

    /// Tries both the inter6 layout (`red0 > red1`) and the inter4 layout
    /// (`red0 <= red1`) for the given range and returns the better one.
    fn best_layout(block: &[u8; 16], high: u8, low: u8) -> Self {
        let (high, low) = if high >= low { (high, low) } else { (low, high) };

        let inter6 = Self::new(block, high, low);
        if inter6.error == 0 {
            return inter6;
        }
        let inter4 = Self::new(block, low, high);

        if inter4.error < inter6.error {
            inter4
        } else {
            inter6
        }
    }

    fn with_indexes(&self) -> [u8; 8] {
        let mut low = 0;
        let mut high = 0;
        bits::store(&mut low, &mut high, 0, 8, self.red0 as u32);
        bits::store(&mut low, &mut high, 8, 8, self.red1 as u32);
        for (i, &index) in self.indexes.iter().enumerate() {
            bits::store(&mut low, &mut high, 16 + 3 * i as u32, 3, index as u32);
        }
        low.to_le_bytes()
    }
}
