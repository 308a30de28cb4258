//! Deterministic flicker noise
//!
//! The pattern is a function of the pixel index and `now` truncated to a
//! coarse step, so it is stable within a step and changes between steps.

use embassy_time::{Duration, Instant};

/// Largest fraction of a pixel's level the flicker may take away
pub(crate) const FLICKER_DEPTH: f32 = 0.6;

/// One pixel in `TINT_ONE_IN` is tinted toward the blast color
const TINT_ONE_IN: u32 = 3;

/// Flicker sample for one pixel
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct FlickerNoise {
    /// Darkening amount, 0.0-1.0
    pub(crate) dip: f32,
    /// Whether the pixel takes the blast tint
    pub(crate) tinted: bool,
}

/// Simple deterministic hash for noise generation
#[inline]
const fn hash(x: u64) -> u32 {
    // SplitMix64-style mixing, then fold down to u32.
    let mut z = x.wrapping_add(0x9e37_79b9_7f4a_7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58_476d_1ce4_e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d0_49bb_1331_11eb);
    #[allow(clippy::cast_possible_truncation)]
    {
        (z ^ (z >> 31)) as u32
    }
}

/// Seed shared by every pixel rendered at `now`
pub(crate) const fn seed(now: Instant, step: Duration) -> u64 {
    let step_ms = step.as_millis();
    if step_ms == 0 {
        return now.as_millis();
    }
    now.as_millis() / step_ms
}

/// Noise for pixel `index` under `seed`
#[allow(clippy::cast_possible_truncation)]
pub(crate) fn pixel(seed: u64, index: usize) -> FlickerNoise {
    let value = hash(seed.wrapping_mul(0x1_0000).wrapping_add(index as u64));
    FlickerNoise {
        dip: f32::from((value & 0xFF) as u8) / 255.0,
        tinted: (value >> 8) % TINT_ONE_IN == 0,
    }
}
