//! Arm tilt estimation
//!
//! The tilt angle is the direction of gravity in the plane of two
//! accelerometer axes. Smoothing averages the gravity vector over a short
//! window before taking the angle, so readings on either side of the
//! ±180° seam do not cancel out.

use heapless::Deque;

use crate::config::TiltAxes;
use crate::sample::AccelSample;

/// Largest supported moving-average window, in samples
pub const ANGLE_WINDOW_CAPACITY: usize = 32;

/// Tilt angle in degrees, `atan2(opposite, adjacent)`, in `-180.0..=180.0`
pub fn tilt_degrees(sample: &AccelSample, axes: TiltAxes) -> f32 {
    libm::atan2f(sample.axis(axes.opposite), sample.axis(axes.adjacent)).to_degrees()
}

/// Moving average of the gravity vector over the last `window` samples
///
/// Until the window fills, the average covers the samples seen so far.
#[derive(Debug, Clone)]
pub struct AngleFilter {
    samples: Deque<(f32, f32), ANGLE_WINDOW_CAPACITY>,
    window: usize,
}

impl AngleFilter {
    /// Create a filter, `window` is clamped to `1..=ANGLE_WINDOW_CAPACITY`
    pub fn new(window: usize) -> Self {
        Self {
            samples: Deque::new(),
            window: window.clamp(1, ANGLE_WINDOW_CAPACITY),
        }
    }

    /// Add the tilt-plane components of a sample, returns the smoothed
    /// tilt angle in degrees
    pub fn push(&mut self, opposite: f32, adjacent: f32) -> f32 {
        while self.samples.len() >= self.window {
            self.samples.pop_front();
        }
        // Capacity is never exceeded: the loop above leaves room for one.
        let _ = self.samples.push_back((opposite, adjacent));

        // The angle of the sum equals the angle of the mean.
        let (opposite, adjacent) = self
            .samples
            .iter()
            .fold((0.0_f32, 0.0_f32), |(o, a), &(x, y)| (o + x, a + y));
        libm::atan2f(opposite, adjacent).to_degrees()
    }

    /// Feed a sample using the configured axes
    pub fn push_sample(&mut self, sample: &AccelSample, axes: TiltAxes) -> f32 {
        self.push(sample.axis(axes.opposite), sample.axis(axes.adjacent))
    }

    /// Drop all history
    pub fn clear(&mut self) {
        self.samples.clear();
    }
}
