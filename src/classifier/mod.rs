//! Gesture classification
//!
//! Turns accelerometer samples into discrete gesture events:
//!
//! | Condition (per tick) | Event |
//! |---|---|
//! | debounced "raised" goes `false -> true` | [`GestureEvent::Activate`] |
//! | debounced "raised" goes `true -> false` | [`GestureEvent::Deactivate`] |
//! | device Active, cooldown over, forward magnitude above threshold | [`GestureEvent::Blast`] |
//!
//! At most one event is emitted per tick. When an angle edge and a thrust
//! coincide, the edge wins and the thrust is retried on the next tick only.

mod tilt;

use embassy_time::{Duration, Instant};
use log::{debug, trace};

use crate::config::{Configuration, TiltAxes};
use crate::debounce::Debouncer;
use crate::sample::{AccelSample, Axis};
use crate::state::DeviceState;

pub use tilt::{ANGLE_WINDOW_CAPACITY, AngleFilter, tilt_degrees};

/// Discrete gesture recognized from arm motion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureEvent {
    /// Arm raised
    Activate,
    /// Arm lowered
    Deactivate,
    /// Forward thrust while active
    Blast,
}

/// Gesture classifier
#[derive(Debug, Clone)]
pub struct GestureClassifier {
    // Configuration
    tilt_axes: TiltAxes,
    angle_threshold: f32,
    angle_hysteresis: f32,
    blast_axis: Axis,
    blast_threshold: f32,
    blast_cooldown: Duration,

    // Internal state
    filter: AngleFilter,
    raised: Debouncer,
    raw_raised: bool,
    angle: f32,
    last_blast: Option<Instant>,
    deferred_blast: bool,
}

impl GestureClassifier {
    pub fn new(config: &Configuration) -> Self {
        Self {
            tilt_axes: config.tilt_axes,
            angle_threshold: config.angle_threshold,
            angle_hysteresis: config.angle_hysteresis,
            blast_axis: config.blast_axis,
            blast_threshold: config.blast_threshold,
            blast_cooldown: config.blast_cooldown,
            filter: AngleFilter::new(config.angle_window),
            raised: Debouncer::with_holds(config.debounce.raise, config.debounce.lower),
            raw_raised: false,
            angle: 0.0,
            last_blast: None,
            deferred_blast: false,
        }
    }

    /// Classify a fresh sample
    ///
    /// `state` is the device state before this tick's transition; blasts
    /// are only emitted while it is [`DeviceState::Active`].
    pub fn classify(
        &mut self,
        sample: &AccelSample,
        state: DeviceState,
        now: Instant,
    ) -> Option<GestureEvent> {
        self.angle = self.filter.push_sample(sample, self.tilt_axes);
        trace!(
            "tilt {} smoothed {}",
            tilt_degrees(sample, self.tilt_axes),
            self.angle
        );
        self.raw_raised = self.is_raised(self.angle);

        let thrust = libm::fabsf(sample.axis(self.blast_axis)) > self.blast_threshold;
        self.decide(thrust, state, now)
    }

    /// Advance the classifier without a new sample
    ///
    /// The debouncer keeps running on the last raw condition, but no thrust
    /// is detected: a repeated sample is not a new movement.
    pub fn hold(&mut self, state: DeviceState, now: Instant) -> Option<GestureEvent> {
        self.decide(false, state, now)
    }

    /// Forget all history, the arm reads lowered
    pub fn reset(&mut self, now: Instant) {
        self.filter.clear();
        self.raised.reset(false, now);
        self.raw_raised = false;
        self.deferred_blast = false;
    }

    /// Last smoothed tilt angle in degrees
    pub const fn angle(&self) -> f32 {
        self.angle
    }

    /// Debounced "arm raised" condition
    pub const fn is_arm_raised(&self) -> bool {
        self.raised.stable()
    }

    fn is_raised(&self, angle: f32) -> bool {
        if self.raw_raised {
            angle <= self.angle_threshold + self.angle_hysteresis
        } else {
            angle <= self.angle_threshold
        }
    }

    fn decide(&mut self, thrust: bool, state: DeviceState, now: Instant) -> Option<GestureEvent> {
        let was_raised = self.raised.stable();
        let raised = self.raised.evaluate(self.raw_raised, now);
        let blast_requested = core::mem::take(&mut self.deferred_blast) || thrust;

        let edge = match (was_raised, raised) {
            (false, true) => Some(GestureEvent::Activate),
            (true, false) => Some(GestureEvent::Deactivate),
            _ => None,
        };

        if let Some(event) = edge {
            if blast_requested {
                debug!("blast deferred behind {:?}", event);
                self.deferred_blast = true;
            }
            return Some(event);
        }

        if blast_requested && self.blast_allowed(state, now) {
            self.last_blast = Some(now);
            return Some(GestureEvent::Blast);
        }

        None
    }

    fn blast_allowed(&self, state: DeviceState, now: Instant) -> bool {
        if state != DeviceState::Active {
            trace!("thrust ignored in {:?}", state);
            return false;
        }
        match self.last_blast {
            Some(last) if now.saturating_duration_since(last) < self.blast_cooldown => {
                debug!("thrust ignored, blast cooling down");
                false
            }
            _ => true,
        }
    }
}
