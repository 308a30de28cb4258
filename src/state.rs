//! Device state machine
//!
//! | State | Activate | Deactivate | Blast | Expired |
//! |---|---|---|---|---|
//! | Idle | Activating | - | - | - |
//! | Activating | - | Deactivating | - | Active |
//! | Active | - | Deactivating | Blasting | - |
//! | Blasting | - | Deactivating | - | Active |
//! | Deactivating | Activating | - | - | Idle |
//!
//! Every pair not listed leaves the state untouched. Each transition
//! replaces the running [`AnimationSpec`]; fades start from the level the
//! replaced animation had at that instant.

use embassy_time::{Duration, Instant};
use log::info;

use crate::animation::AnimationSpec;
use crate::classifier::GestureEvent;
use crate::color::Rgb;
use crate::config::Configuration;

/// Device state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviceState {
    #[default]
    Idle,
    Activating,
    Active,
    Blasting,
    Deactivating,
}

impl DeviceState {
    pub const ALL: [Self; 5] = [
        Self::Idle,
        Self::Activating,
        Self::Active,
        Self::Blasting,
        Self::Deactivating,
    ];
}

/// One-shot sound requested by a transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioCue {
    PowerUp,
    PowerDown,
    Blast,
}

/// Input of the state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stimulus {
    Gesture(GestureEvent),
    /// The running timed animation has completed
    Expired,
}

/// A state change and its side effects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: DeviceState,
    pub to: DeviceState,
    pub cue: Option<AudioCue>,
}

/// Effect state machine - owns the device state and the running animation
#[derive(Debug, Clone)]
pub struct EffectStateMachine {
    state: DeviceState,
    animation: AnimationSpec,
    base_color: Rgb,
    fade_duration: Duration,
    blast_duration: Duration,
}

impl EffectStateMachine {
    pub fn new(config: &Configuration, now: Instant) -> Self {
        Self {
            state: DeviceState::Idle,
            animation: AnimationSpec::off(now, config.base_color),
            base_color: config.base_color,
            fade_duration: config.fade_duration,
            blast_duration: config.blast_duration,
        }
    }

    pub const fn state(&self) -> DeviceState {
        self.state
    }

    pub const fn animation(&self) -> &AnimationSpec {
        &self.animation
    }

    pub const fn base_color(&self) -> Rgb {
        self.base_color
    }

    /// Apply at most one transition for this tick
    ///
    /// A gesture is handled first. Timer expiry is only checked when there
    /// is no gesture or the gesture changed nothing.
    pub fn update(&mut self, event: Option<GestureEvent>, now: Instant) -> Option<Transition> {
        if let Some(event) = event {
            if let Some(transition) = self.handle(Stimulus::Gesture(event), now) {
                return Some(transition);
            }
        }
        self.poll_expiry(now)
    }

    /// Feed `Expired` if the running animation has completed
    pub fn poll_expiry(&mut self, now: Instant) -> Option<Transition> {
        if self.animation.is_expired(now) {
            return self.handle(Stimulus::Expired, now);
        }
        None
    }

    /// Apply a single stimulus, returns `None` when it does not apply
    pub fn handle(&mut self, stimulus: Stimulus, now: Instant) -> Option<Transition> {
        use DeviceState::{Activating, Active, Blasting, Deactivating, Idle};
        use GestureEvent::{Activate, Blast, Deactivate};

        let level = self.animation.level_at(now);
        let color = self.base_color;
        let (next, animation, cue) = match (self.state, stimulus) {
            (Idle | Deactivating, Stimulus::Gesture(Activate)) => (
                Activating,
                AnimationSpec::fade_in(now, self.fade_duration, color, level),
                Some(AudioCue::PowerUp),
            ),
            (Activating | Active | Blasting, Stimulus::Gesture(Deactivate)) => (
                Deactivating,
                AnimationSpec::fade_off(now, self.fade_duration, color, level),
                Some(AudioCue::PowerDown),
            ),
            (Active, Stimulus::Gesture(Blast)) => (
                Blasting,
                AnimationSpec::flicker(now, self.blast_duration, color),
                Some(AudioCue::Blast),
            ),
            (Activating | Blasting, Stimulus::Expired) => {
                (Active, AnimationSpec::solid(now, color), None)
            }
            (Deactivating, Stimulus::Expired) => (Idle, AnimationSpec::off(now, color), None),
            _ => return None,
        };

        Some(self.enter(next, animation, cue))
    }

    /// Drop to `Idle` with the ring dark, without a sound
    ///
    /// Used when the inputs can no longer be trusted.
    pub fn force_off(&mut self, now: Instant) -> Option<Transition> {
        if self.state == DeviceState::Idle {
            return None;
        }
        let animation = AnimationSpec::off(now, self.base_color);
        Some(self.enter(DeviceState::Idle, animation, None))
    }

    /// Jump straight to `Active` with a solid ring, without a sound
    ///
    /// A running blast is left to finish; it returns to `Active` on its own.
    pub fn force_on(&mut self, now: Instant) -> Option<Transition> {
        if matches!(self.state, DeviceState::Active | DeviceState::Blasting) {
            return None;
        }
        let animation = AnimationSpec::solid(now, self.base_color);
        Some(self.enter(DeviceState::Active, animation, None))
    }

    /// Switch the base color, keeping the running animation and its timing
    pub fn set_base_color(&mut self, color: Rgb) {
        self.base_color = color;
        self.animation = self.animation.with_color(color);
    }

    fn enter(
        &mut self,
        next: DeviceState,
        animation: AnimationSpec,
        cue: Option<AudioCue>,
    ) -> Transition {
        let transition = Transition {
            from: self.state,
            to: next,
            cue,
        };
        info!("{:?} -> {:?}", transition.from, transition.to);
        self.state = next;
        self.animation = animation;
        transition
    }
}
