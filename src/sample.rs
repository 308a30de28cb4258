//! Accelerometer samples and sources
//!
//! [`AccelerometerSource`] turns any driver implementing the
//! [`accelerometer::Accelerometer`] trait into a [`SampleSource`].

use accelerometer::Accelerometer;
use accelerometer::vector::F32x3;
use embassy_time::Instant;

use crate::SampleSource;
use crate::error::SensorUnavailable;

/// Standard gravity in m/s², for converting normalized (g) readings
pub const STANDARD_GRAVITY: f32 = 9.806_65;

/// Accelerometer axis selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

/// A single timestamped acceleration reading
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccelSample {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub timestamp: Instant,
}

impl AccelSample {
    pub const fn new(x: f32, y: f32, z: f32, timestamp: Instant) -> Self {
        Self { x, y, z, timestamp }
    }

    /// Build a sample from an `accelerometer` vector
    pub const fn from_vector(vector: F32x3, timestamp: Instant) -> Self {
        Self::new(vector.x, vector.y, vector.z, timestamp)
    }

    /// Read a single axis
    pub const fn axis(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }
}

/// Sample source backed by an `accelerometer` driver
///
/// Readings are taken with `accel_norm` (in g) and multiplied by `scale`,
/// so the units match the configured thresholds.
pub struct AccelerometerSource<A> {
    accelerometer: A,
    scale: f32,
}

impl<A: Accelerometer> AccelerometerSource<A> {
    /// Wrap a driver, reporting samples in g
    pub const fn new(accelerometer: A) -> Self {
        Self {
            accelerometer,
            scale: 1.0,
        }
    }

    /// Wrap a driver, reporting samples in m/s²
    pub const fn metric(accelerometer: A) -> Self {
        Self {
            accelerometer,
            scale: STANDARD_GRAVITY,
        }
    }

    /// Release the wrapped driver
    pub fn into_inner(self) -> A {
        self.accelerometer
    }
}

impl<A: Accelerometer> SampleSource for AccelerometerSource<A> {
    fn read(&mut self, now: Instant) -> Result<AccelSample, SensorUnavailable> {
        let vector = self.accelerometer.accel_norm().map_err(|err| {
            log::debug!("accelerometer read failed: {:?}", err);
            SensorUnavailable
        })?;

        Ok(AccelSample::new(
            vector.x * self.scale,
            vector.y * self.scale,
            vector.z * self.scale,
            now,
        ))
    }
}
