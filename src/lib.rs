#![no_std]

pub mod animation;
pub mod classifier;
pub mod color;
pub mod config;
pub mod controller;
pub mod debounce;
pub mod error;
#[cfg(feature = "esp32-log")]
pub mod logging;
pub mod math8;
pub mod output;
pub mod sample;
pub mod state;

pub use animation::{AnimationEngine, AnimationKind, AnimationSpec};
pub use classifier::{GestureClassifier, GestureEvent};
pub use config::{AudioClips, ClipId, Configuration, DebounceTimings, TiltAxes};
pub use controller::{Controller, SensorHealth, TickReport};
pub use debounce::Debouncer;
pub use error::{ConfigError, SensorUnavailable};
pub use output::SmartLedsOutput;
pub use sample::{AccelSample, AccelerometerSource, Axis};
pub use state::{AudioCue, DeviceState, EffectStateMachine, Stimulus, Transition};

pub use color::Rgb;
pub use embassy_time::{Duration, Instant};

/// Source of accelerometer samples
///
/// Implement this trait to support different sensors.
pub trait SampleSource {
    /// Read one sample, stamped with `now`
    fn read(&mut self, now: Instant) -> Result<AccelSample, SensorUnavailable>;
}

/// Abstract LED driver trait
///
/// Implement this trait to support different hardware platforms.
/// The controller is generic over this trait.
pub trait LedDriver {
    /// Write colors to the LED ring
    fn show(&mut self, colors: &[Rgb]);
}

/// Abstract audio playback channel
pub trait AudioDriver {
    /// Start playing a clip without waiting for it.
    ///
    /// Returns `false` if the channel is busy and the clip was not started.
    fn play(&mut self, clip: ClipId) -> bool;

    /// Whether a clip is currently playing
    fn is_playing(&self) -> bool;
}
