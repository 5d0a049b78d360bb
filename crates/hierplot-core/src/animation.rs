#![forbid(unsafe_code)]

//! Time-based animation primitives.
//!
//! Animations are advanced with explicit [`Duration`] steps supplied by the
//! host loop, so the same inputs always produce the same intermediate values.

use std::time::Duration;

// ---------------------------------------------------------------------------
// Easing functions
// ---------------------------------------------------------------------------

/// Easing function signature: maps `t` in [0, 1] to output in [0, 1].
pub type EasingFn = fn(f32) -> f32;

/// Identity easing (constant velocity).
#[inline]
pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Cubic ease-in-out (slow start and end). Default for tweens.
#[inline]
pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

// ---------------------------------------------------------------------------
// Animation trait
// ---------------------------------------------------------------------------

/// A time-based animation producing values in [0.0, 1.0].
pub trait Animation {
    /// Advance the animation by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has reached its end.
    fn is_complete(&self) -> bool;

    /// Current output value, clamped to [0.0, 1.0].
    fn value(&self) -> f32;

    /// Reset the animation to its initial state.
    fn reset(&mut self);
}

// ---------------------------------------------------------------------------
// Fade
// ---------------------------------------------------------------------------

/// Eased 0..1 progress over a fixed duration. Drives link path morphs and
/// the progress of every [`Tween`].
#[derive(Debug, Clone, Copy)]
pub struct Fade {
    elapsed: Duration,
    duration: Duration,
    easing: EasingFn,
}

impl Fade {
    /// Linear progress over `duration`; zero completes on the first tick.
    pub fn new(duration: Duration) -> Self {
        Self {
            elapsed: Duration::ZERO,
            duration: if duration.is_zero() {
                Duration::from_nanos(1)
            } else {
                duration
            },
            easing: linear,
        }
    }

    /// Set the easing function.
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    /// Elapsed fraction before easing.
    pub fn raw_progress(&self) -> f32 {
        let t = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
        (t as f32).clamp(0.0, 1.0)
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl Animation for Fade {
    fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn value(&self) -> f32 {
        (self.easing)(self.raw_progress())
    }

    fn reset(&mut self) {
        self.elapsed = Duration::ZERO;
    }
}

// ---------------------------------------------------------------------------
// Tween
// ---------------------------------------------------------------------------

/// Interpolates an `f64` between `from` and `to` over a duration.
///
/// [`Animation::value`] returns the eased progress; use [`Tween::current`]
/// for the interpolated value.
#[derive(Debug, Clone, Copy)]
pub struct Tween {
    from: f64,
    to: f64,
    progress: Fade,
}

impl Tween {
    /// Create a tween from `from` to `to` with cubic in-out easing.
    pub fn new(from: f64, to: f64, duration: Duration) -> Self {
        Self {
            from,
            to,
            progress: Fade::new(duration).easing(ease_in_out_cubic),
        }
    }

    /// A tween that is already at rest on `value`.
    pub fn settled(value: f64) -> Self {
        let mut tween = Self::new(value, value, Duration::ZERO);
        tween.progress.tick(Duration::from_nanos(1));
        tween
    }

    /// Set the easing function (builder).
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.progress = self.progress.easing(easing);
        self
    }

    /// Current interpolated value.
    pub fn current(&self) -> f64 {
        if self.progress.is_complete() {
            return self.to;
        }
        let t = f64::from(self.progress.value());
        self.from + (self.to - self.from) * t
    }

    /// The value this tween is heading to.
    pub fn target(&self) -> f64 {
        self.to
    }

    /// Restart towards `to`, starting from the current in-flight value.
    pub fn retarget(&mut self, to: f64, duration: Duration) {
        let from = self.current();
        let easing = self.progress.easing;
        *self = Self::new(from, to, duration).easing(easing);
    }
}

impl Animation for Tween {
    fn tick(&mut self, dt: Duration) {
        self.progress.tick(dt);
    }

    fn is_complete(&self) -> bool {
        self.progress.is_complete()
    }

    fn value(&self) -> f32 {
        self.progress.value()
    }

    fn reset(&mut self) {
        self.progress.reset();
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
