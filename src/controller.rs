//! Main loop
//!
//! [`Controller::tick`] runs one full cycle: read, classify, transition,
//! render, output. It never blocks and never reads a clock; the caller
//! passes the current time and sleeps for the returned duration.
//!
//! ```ignore
//! let mut controller = Controller::<_, _, _, 16>::new(sensor, ring, audio, &config, now())?;
//!
//! loop {
//!     let report = controller.tick(now());
//!     sleep(report.sleep_duration);
//! }
//! ```

use embassy_time::{Duration, Instant};
use log::{debug, error, info, warn};

use crate::animation::AnimationEngine;
use crate::classifier::{GestureClassifier, GestureEvent};
use crate::color::{PALETTE, Rgb};
use crate::config::{AudioClips, Configuration};
use crate::error::ConfigError;
use crate::sample::AccelSample;
use crate::state::{AudioCue, DeviceState, EffectStateMachine, Transition};
use crate::{AudioDriver, LedDriver, SampleSource};

/// Sensor health as seen by the main loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorHealth {
    /// The last read succeeded
    Nominal,
    /// Reads are failing, the last good sample is being held
    Holding { misses: u32 },
    /// Too many consecutive failures, output is off until the fault is cleared
    Faulted,
}

/// Outcome of a tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub event: Option<GestureEvent>,
    pub transition: Option<Transition>,
    pub state: DeviceState,
    pub health: SensorHealth,
    /// The deadline for the next tick
    pub next_deadline: Instant,
    /// How long to wait until the next tick (zero if behind schedule)
    pub sleep_duration: Duration,
}

/// Gesture effect controller
///
/// Owns the drivers and every piece of mutable state. `MAX_PIXELS` is the
/// frame buffer capacity; the configured pixel count must fit in it.
pub struct Controller<S, L, A, const MAX_PIXELS: usize> {
    // External dependencies and configuration
    source: S,
    leds: L,
    audio: A,
    clips: AudioClips,
    pixel_count: usize,
    poll_period: Duration,
    max_sensor_misses: u32,

    // Internal dependencies
    classifier: GestureClassifier,
    machine: EffectStateMachine,
    engine: AnimationEngine,

    // Internal state
    last_sample: Option<AccelSample>,
    misses: u32,
    faulted: bool,
    always_on: bool,
    palette_index: usize,
    next_tick: Instant,
    frame: [Rgb; MAX_PIXELS],
}

impl<S, L, A, const MAX_PIXELS: usize> Controller<S, L, A, MAX_PIXELS>
where
    S: SampleSource,
    L: LedDriver,
    A: AudioDriver,
{
    /// Create a controller, refusing invalid configuration
    pub fn new(
        source: S,
        leds: L,
        audio: A,
        config: &Configuration,
        now: Instant,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        if config.pixel_count > MAX_PIXELS {
            return Err(ConfigError::TooManyPixels {
                count: config.pixel_count,
                capacity: MAX_PIXELS,
            });
        }

        info!(
            "controller ready: {} pixels, angle threshold {}, blast threshold {}",
            config.pixel_count, config.angle_threshold, config.blast_threshold
        );

        Ok(Self {
            source,
            leds,
            audio,
            clips: config.clips,
            pixel_count: config.pixel_count,
            poll_period: config.poll_period,
            max_sensor_misses: config.max_sensor_misses,
            classifier: GestureClassifier::new(config),
            machine: EffectStateMachine::new(config, now),
            engine: AnimationEngine::new(config),
            last_sample: None,
            misses: 0,
            faulted: false,
            always_on: false,
            palette_index: PALETTE
                .iter()
                .position(|color| *color == config.base_color)
                .unwrap_or(0),
            next_tick: now,
            frame: [Rgb::default(); MAX_PIXELS],
        })
    }

    /// Run one tick and return timing information
    ///
    /// The caller is responsible for waiting until `next_deadline` before
    /// calling `tick` again.
    pub fn tick(&mut self, now: Instant) -> TickReport {
        // Drift correction: if we've fallen too far behind, reset to now
        if now > self.next_tick + self.poll_period * 2 {
            self.next_tick = now;
        }

        let (event, transition) = if self.faulted {
            (None, None)
        } else {
            self.step(now)
        };

        self.show(now);

        self.next_tick += self.poll_period;
        TickReport {
            event,
            transition,
            state: self.machine.state(),
            health: self.health(),
            next_deadline: self.next_tick,
            sleep_duration: self.next_tick.saturating_duration_since(now),
        }
    }

    /// Leave the fault state and resume classification
    pub fn clear_fault(&mut self, now: Instant) {
        if !self.faulted {
            return;
        }
        info!("sensor fault cleared");
        self.faulted = false;
        self.misses = 0;
        self.last_sample = None;
        self.classifier.reset(now);
    }

    /// Lock the ring on, or release the lock
    ///
    /// While locked the device is held `Active` with a solid ring and arm
    /// raise and lower edges are ignored; blasts still fire. Releasing the
    /// lock switches the ring off and restarts arm tracking, so an arm
    /// that is still raised powers up again after the debounce hold.
    pub fn set_always_on(&mut self, on: bool, now: Instant) -> Option<Transition> {
        if on == self.always_on {
            return None;
        }
        if on && self.faulted {
            warn!("always-on refused, sensor is faulted");
            return None;
        }

        self.always_on = on;
        if on {
            info!("always-on engaged");
            self.machine.force_on(now)
        } else {
            info!("always-on released");
            self.classifier.reset(now);
            self.machine.force_off(now)
        }
    }

    /// Set the repulsor color, effective from the next rendered frame
    pub fn set_color(&mut self, color: Rgb) {
        info!("color set to ({}, {}, {})", color.r, color.g, color.b);
        self.machine.set_base_color(color);
    }

    /// Advance to the next palette color and return it
    pub fn cycle_color(&mut self) -> Rgb {
        self.palette_index = (self.palette_index + 1) % PALETTE.len();
        let color = PALETTE[self.palette_index];
        self.set_color(color);
        color
    }

    pub const fn state(&self) -> DeviceState {
        self.machine.state()
    }

    pub const fn is_faulted(&self) -> bool {
        self.faulted
    }

    pub const fn is_always_on(&self) -> bool {
        self.always_on
    }

    pub fn health(&self) -> SensorHealth {
        match (self.faulted, self.misses) {
            (true, _) => SensorHealth::Faulted,
            (false, 0) => SensorHealth::Nominal,
            (false, misses) => SensorHealth::Holding { misses },
        }
    }

    /// The last frame sent to the LEDs
    pub fn frame(&self) -> &[Rgb] {
        &self.frame[..self.pixel_count]
    }

    pub const fn machine(&self) -> &EffectStateMachine {
        &self.machine
    }

    pub const fn classifier(&self) -> &GestureClassifier {
        &self.classifier
    }

    pub fn source_mut(&mut self) -> &mut S {
        &mut self.source
    }

    pub const fn leds(&self) -> &L {
        &self.leds
    }

    pub fn audio_mut(&mut self) -> &mut A {
        &mut self.audio
    }

    pub const fn audio(&self) -> &A {
        &self.audio
    }

    /// Read, classify and transition
    fn step(&mut self, now: Instant) -> (Option<GestureEvent>, Option<Transition>) {
        let state = self.machine.state();
        let event = match self.source.read(now) {
            Ok(sample) => {
                self.misses = 0;
                self.last_sample = Some(sample);
                self.classifier.classify(&sample, state, now)
            }
            Err(err) => {
                self.misses = self.misses.saturating_add(1);
                if self.misses > self.max_sensor_misses {
                    return (None, self.enter_fault(now));
                }
                match self.last_sample {
                    Some(sample) => {
                        let age = now.saturating_duration_since(sample.timestamp);
                        warn!(
                            "{} ({} in a row), holding sample from {} ms ago",
                            err,
                            self.misses,
                            age.as_millis()
                        );
                        self.classifier.hold(state, now)
                    }
                    None => {
                        warn!("{} ({} in a row), no sample to hold", err, self.misses);
                        None
                    }
                }
            }
        };

        let event = match event {
            Some(edge @ (GestureEvent::Activate | GestureEvent::Deactivate)) if self.always_on => {
                debug!("{:?} ignored, always-on", edge);
                None
            }
            other => other,
        };

        let transition = self.machine.update(event, now);
        if let Some(cue) = transition.and_then(|transition| transition.cue) {
            self.play(cue);
        }
        (event, transition)
    }

    fn enter_fault(&mut self, now: Instant) -> Option<Transition> {
        error!(
            "accelerometer failed {} times in a row, switching off",
            self.misses
        );
        self.faulted = true;
        self.always_on = false;
        self.last_sample = None;
        self.classifier.reset(now);
        self.machine.force_off(now)
    }

    /// Fire-and-forget: a busy channel drops the cue
    fn play(&mut self, cue: AudioCue) {
        let clip = self.clips.clip_for(cue);
        if !self.audio.play(clip) {
            warn!(
                "audio cue {:?} dropped (clip {}, channel playing: {})",
                cue,
                clip.0,
                self.audio.is_playing()
            );
        }
    }

    fn show(&mut self, now: Instant) {
        let frame = &mut self.frame[..self.pixel_count];
        self.engine
            .render(self.machine.state(), self.machine.animation(), now, frame);
        self.leds.show(frame);
    }
}
