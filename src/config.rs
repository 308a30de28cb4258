//! Static controller configuration
//!
//! Every tunable value (thresholds, colors, durations, clip handles) lives
//! here and is handed to the controller once at startup.

use embassy_time::Duration;

use crate::classifier::ANGLE_WINDOW_CAPACITY;
use crate::color::{Rgb, WHITE};
use crate::error::ConfigError;
use crate::sample::Axis;
use crate::state::AudioCue;

/// Opaque handle of an audio clip understood by the audio driver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ClipId(pub u8);

/// Clips played on state changes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioClips {
    pub blast: ClipId,
    pub power_up: ClipId,
    pub power_down: ClipId,
}

impl AudioClips {
    /// Resolve a cue to the clip that plays it
    pub const fn clip_for(&self, cue: AudioCue) -> ClipId {
        match cue {
            AudioCue::Blast => self.blast,
            AudioCue::PowerUp => self.power_up,
            AudioCue::PowerDown => self.power_down,
        }
    }
}

/// Debounce hold durations for the "arm raised" condition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebounceTimings {
    /// How long the arm must stay raised before it counts as raised
    pub raise: Duration,
    /// How long the arm must stay lowered before it counts as lowered
    pub lower: Duration,
}

/// Axes used to derive the tilt angle: `atan2(opposite, adjacent)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TiltAxes {
    pub opposite: Axis,
    pub adjacent: Axis,
}

/// Controller configuration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Configuration {
    /// Number of LEDs in the ring
    pub pixel_count: usize,
    /// Repulsor color
    pub base_color: Rgb,
    /// Tint mixed into the blast flicker
    pub blast_color: Rgb,
    /// Global brightness scalar (0.0-1.0)
    pub brightness: f32,

    pub tilt_axes: TiltAxes,
    /// Tilt angle in degrees at or below which the arm counts as raised
    pub angle_threshold: f32,
    /// Extra degrees a raised arm must tilt past the threshold to read lowered
    pub angle_hysteresis: f32,
    /// Moving-average length for the tilt angle, in samples
    pub angle_window: usize,

    /// Forward (thrust) axis
    pub blast_axis: Axis,
    /// Forward acceleration magnitude that triggers a blast
    pub blast_threshold: f32,
    /// Minimum time between two blasts
    pub blast_cooldown: Duration,

    /// Duration of fade-in and fade-off
    pub fade_duration: Duration,
    /// Duration of the blast flicker
    pub blast_duration: Duration,
    /// Coarse tick the flicker pattern is reseeded on
    pub flicker_step: Duration,
    pub debounce: DebounceTimings,

    /// Tick cadence
    pub poll_period: Duration,
    /// Consecutive failed reads tolerated before the sensor counts as faulted
    pub max_sensor_misses: u32,

    pub clips: AudioClips,
}

impl Configuration {
    /// Tuning of the original glove: 7 pixel white ring, LIS3DH in m/s²
    pub const DEFAULT: Self = Self {
        pixel_count: 7,
        base_color: WHITE,
        blast_color: Rgb { r: 255, g: 200, b: 0 },
        brightness: 0.8,
        tilt_axes: TiltAxes {
            opposite: Axis::Y,
            adjacent: Axis::Z,
        },
        angle_threshold: 35.0,
        angle_hysteresis: 2.0,
        angle_window: 20,
        blast_axis: Axis::X,
        blast_threshold: 6.5,
        blast_cooldown: Duration::from_millis(1000),
        fade_duration: Duration::from_millis(500),
        blast_duration: Duration::from_millis(1500),
        flicker_step: Duration::from_millis(50),
        debounce: DebounceTimings {
            raise: Duration::from_millis(100),
            lower: Duration::from_millis(100),
        },
        poll_period: Duration::from_millis(10),
        max_sensor_misses: 10,
        clips: AudioClips {
            blast: ClipId(0),
            power_up: ClipId(1),
            power_down: ClipId(2),
        },
    };

    /// Check that the animation and classification math is well defined
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.pixel_count == 0 {
            return Err(ConfigError::ZeroPixelCount);
        }
        if !(0.0..=1.0).contains(&self.brightness) {
            return Err(ConfigError::BrightnessOutOfRange(self.brightness));
        }

        let durations = [
            ("fade", self.fade_duration),
            ("blast", self.blast_duration),
            ("flicker step", self.flicker_step),
            ("poll", self.poll_period),
        ];
        for (name, duration) in durations {
            if duration.as_ticks() == 0 {
                return Err(ConfigError::ZeroDuration(name));
            }
        }

        // The tilt angle is signed, so only the threshold needs to be finite.
        if !self.angle_threshold.is_finite() {
            return Err(ConfigError::InvalidThreshold("angle"));
        }
        let thresholds = [
            ("angle hysteresis", self.angle_hysteresis),
            ("blast", self.blast_threshold),
        ];
        for (name, value) in thresholds {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidThreshold(name));
            }
        }

        if self.angle_window == 0 || self.angle_window > ANGLE_WINDOW_CAPACITY {
            return Err(ConfigError::AngleWindow {
                window: self.angle_window,
                capacity: ANGLE_WINDOW_CAPACITY,
            });
        }

        Ok(())
    }
}

impl Default for Configuration {
    fn default() -> Self {
        Self::DEFAULT
    }
}
