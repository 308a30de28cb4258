//! Error types
//!
//! Configuration errors are fatal and surface once, at startup. Sensor
//! errors are per-read and recovered by the controller.

use thiserror::Error;

/// Rejected configuration
#[derive(Debug, Error, Clone, Copy, PartialEq)]
pub enum ConfigError {
    /// No LEDs to drive
    #[error("pixel count must be non-zero")]
    ZeroPixelCount,

    /// More LEDs than the controller frame buffer holds
    #[error("pixel count {count} exceeds frame capacity {capacity}")]
    TooManyPixels { count: usize, capacity: usize },

    /// Brightness scalar is not within `0.0..=1.0`
    #[error("brightness {0} is outside 0.0..=1.0")]
    BrightnessOutOfRange(f32),

    /// A duration that animation math divides by is zero
    #[error("{0} duration must be non-zero")]
    ZeroDuration(&'static str),

    /// A threshold is NaN, infinite, or negative where only magnitudes make sense
    #[error("{0} threshold is not a usable value")]
    InvalidThreshold(&'static str),

    /// Moving-average window outside the supported range
    #[error("angle window {window} must be within 1..={capacity}")]
    AngleWindow { window: usize, capacity: usize },
}

/// The accelerometer could not provide a sample this tick
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Default)]
#[error("accelerometer sample unavailable")]
pub struct SensorUnavailable;
