//! Time-based LED animation
//!
//! An [`AnimationSpec`] describes what the ring shows from a start time on.
//! It is created on every state transition and never mutated afterwards.
//! [`AnimationEngine::render`] turns a spec and a time into a frame and
//! is a pure function of its inputs.

mod flicker;

use embassy_time::{Duration, Instant};

use crate::color::{BLACK, Rgb, blend_colors, scale_color};
use crate::config::Configuration;
use crate::math8::level8;
use crate::state::DeviceState;

/// Animation pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationKind {
    /// Ramp from the start level up to full
    FadeIn,
    /// Ramp from the start level down to zero
    FadeOff,
    /// Randomized modulation that settles into solid
    Flicker,
    /// Constant full level
    Solid,
    /// All pixels dark
    Off,
}

/// Immutable description of the running animation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationSpec {
    pub kind: AnimationKind,
    pub start_time: Instant,
    /// Length of timed animations, ignored by `Solid` and `Off`
    pub duration: Duration,
    pub base_color: Rgb,
    /// Relative level (0.0-1.0) at `start_time`, used by fades
    pub from_level: f32,
}

impl AnimationSpec {
    /// Dark ring
    pub const fn off(now: Instant, base_color: Rgb) -> Self {
        Self {
            kind: AnimationKind::Off,
            start_time: now,
            duration: Duration::from_ticks(0),
            base_color,
            from_level: 0.0,
        }
    }

    /// Constant full level
    pub const fn solid(now: Instant, base_color: Rgb) -> Self {
        Self {
            kind: AnimationKind::Solid,
            start_time: now,
            duration: Duration::from_ticks(0),
            base_color,
            from_level: 1.0,
        }
    }

    /// Fade up to full, starting from `from_level`
    pub const fn fade_in(
        now: Instant,
        duration: Duration,
        base_color: Rgb,
        from_level: f32,
    ) -> Self {
        Self {
            kind: AnimationKind::FadeIn,
            start_time: now,
            duration,
            base_color,
            from_level,
        }
    }

    /// Fade down to zero, starting from `from_level`
    pub const fn fade_off(
        now: Instant,
        duration: Duration,
        base_color: Rgb,
        from_level: f32,
    ) -> Self {
        Self {
            kind: AnimationKind::FadeOff,
            start_time: now,
            duration,
            base_color,
            from_level,
        }
    }

    /// Blast flicker
    pub const fn flicker(now: Instant, duration: Duration, base_color: Rgb) -> Self {
        Self {
            kind: AnimationKind::Flicker,
            start_time: now,
            duration,
            base_color,
            from_level: 1.0,
        }
    }

    /// Same animation and timing in another color
    #[must_use]
    pub const fn with_color(self, base_color: Rgb) -> Self {
        Self { base_color, ..self }
    }

    /// Whether the animation ends on its own
    pub const fn is_timed(&self) -> bool {
        matches!(
            self.kind,
            AnimationKind::FadeIn | AnimationKind::FadeOff | AnimationKind::Flicker
        )
    }

    /// Fraction of the duration elapsed at `now`, clamped to `0.0..=1.0`
    #[allow(clippy::cast_precision_loss)]
    pub fn progress(&self, now: Instant) -> f32 {
        let total = self.duration.as_micros();
        if total == 0 {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.start_time).as_micros();
        (elapsed as f32 / total as f32).clamp(0.0, 1.0)
    }

    /// Whether a timed animation has run its full duration
    pub fn is_expired(&self, now: Instant) -> bool {
        self.is_timed() && now.saturating_duration_since(self.start_time) >= self.duration
    }

    /// Relative level (0.0-1.0) of the animation at `now`
    ///
    /// This is the level a replacing fade starts from. For the flicker it
    /// is the average pixel level, the dips averaging half their depth.
    pub fn level_at(&self, now: Instant) -> f32 {
        let progress = self.progress(now);
        match self.kind {
            AnimationKind::Off => 0.0,
            AnimationKind::Solid => 1.0,
            AnimationKind::Flicker => 1.0 - (1.0 - progress) * flicker::FLICKER_DEPTH / 2.0,
            AnimationKind::FadeIn => self.from_level + (1.0 - self.from_level) * progress,
            AnimationKind::FadeOff => self.from_level * (1.0 - progress),
        }
    }
}

/// Renders animation specs into pixel frames
#[derive(Debug, Clone)]
pub struct AnimationEngine {
    brightness: f32,
    blast_color: Rgb,
    flicker_step: Duration,
}

impl AnimationEngine {
    pub fn new(config: &Configuration) -> Self {
        Self {
            brightness: config.brightness,
            blast_color: config.blast_color,
            flicker_step: config.flicker_step,
        }
    }

    /// Fill `frame` with the animation at `now`
    ///
    /// An `Idle` device always renders dark, whatever the spec says.
    pub fn render(
        &self,
        state: DeviceState,
        spec: &AnimationSpec,
        now: Instant,
        frame: &mut [Rgb],
    ) {
        if state == DeviceState::Idle {
            frame.fill(BLACK);
            return;
        }

        match spec.kind {
            AnimationKind::Off => frame.fill(BLACK),
            AnimationKind::Solid | AnimationKind::FadeIn | AnimationKind::FadeOff => {
                let level = level8(self.brightness * spec.level_at(now));
                frame.fill(scale_color(spec.base_color, level));
            }
            AnimationKind::Flicker => self.render_flicker(spec, now, frame),
        }
    }

    fn render_flicker(&self, spec: &AnimationSpec, now: Instant, frame: &mut [Rgb]) {
        // The envelope decays to zero, where the frame equals the solid frame.
        let envelope = 1.0 - spec.progress(now);
        let tint = level8(envelope);
        let seed = flicker::seed(now, self.flicker_step);

        for (index, led) in frame.iter_mut().enumerate() {
            let noise = flicker::pixel(seed, index);
            let color = if noise.tinted {
                blend_colors(spec.base_color, self.blast_color, tint)
            } else {
                spec.base_color
            };
            let level = self.brightness * (1.0 - envelope * flicker::FLICKER_DEPTH * noise.dip);
            *led = scale_color(color, level8(level));
        }
    }
}
