//! Light transformers: time-bounded interpolations of a light's values.
//!
//! While a transformer is active it owns the light's current values. The
//! light asks it for a frame every update and snaps to the transformer's
//! target once it reports completion.

mod addressable;
mod flash;
mod linear;
mod perceptual;

use embassy_time::{Duration, Instant};
pub use addressable::AddressableFade;
pub use flash::FlashTransformer;
pub use linear::LinearFade;
pub use perceptual::PerceptualFade;

use crate::color::ColorValue;

/// Interpolation used for transitions of a light
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TransitionKind {
    /// Perceptual fade in RGB + temperature space
    #[default]
    Perceptual,
    /// Field-wise fade of the color values
    Linear,
}

impl TransitionKind {
    /// Create a fade of this kind
    pub fn create(
        self,
        start: ColorValue,
        target: ColorValue,
        length: Duration,
        now: Instant,
        mireds: (f32, f32),
    ) -> Transition {
        match self {
            Self::Perceptual => Transition::Perceptual(PerceptualFade::new(start, target, length, now, mireds)),
            Self::Linear => Transition::Linear(LinearFade::new(start, target, length, now)),
        }
    }
}

pub trait LightTransformer {
    /// Values the transformer started from
    fn start_values(&self) -> &ColorValue;

    /// Values the light holds once the transformer completes
    fn target_values(&self) -> &ColorValue;

    /// Compute the frame for `now`. `None` keeps the current values.
    fn apply(&mut self, now: Instant, current: &ColorValue) -> Option<ColorValue>;

    fn is_finished(&self, now: Instant) -> bool;

    /// Finish the transformer. Returns values to restore into both the
    /// current and the published state, if the transformer needs that.
    fn stop(&mut self) -> Option<ColorValue> {
        None
    }
}

/// Start time and length of a transformer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Timing {
    start: Instant,
    length: Duration,
}

impl Timing {
    pub const fn new(start: Instant, length: Duration) -> Self {
        Self { start, length }
    }

    pub const fn start(&self) -> Instant {
        self.start
    }

    pub const fn length(&self) -> Duration {
        self.length
    }

    /// Elapsed fraction of the length, clamped to `[0, 1]`
    #[allow(clippy::cast_precision_loss)]
    pub fn progress(&self, now: Instant) -> f32 {
        let length = self.length.as_micros();
        if length == 0 {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.start).as_micros();
        if elapsed >= length {
            return 1.0;
        }
        elapsed as f32 / length as f32
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.start) >= self.length
    }
}

/// Fade between two values
#[derive(Debug, Clone)]
pub enum Transition {
    Perceptual(PerceptualFade),
    Linear(LinearFade),
}

impl LightTransformer for Transition {
    fn start_values(&self) -> &ColorValue {
        match self {
            Self::Perceptual(fade) => fade.start_values(),
            Self::Linear(fade) => fade.start_values(),
        }
    }

    fn target_values(&self) -> &ColorValue {
        match self {
            Self::Perceptual(fade) => fade.target_values(),
            Self::Linear(fade) => fade.target_values(),
        }
    }

    fn apply(&mut self, now: Instant, current: &ColorValue) -> Option<ColorValue> {
        match self {
            Self::Perceptual(fade) => fade.apply(now, current),
            Self::Linear(fade) => fade.apply(now, current),
        }
    }

    fn is_finished(&self, now: Instant) -> bool {
        match self {
            Self::Perceptual(fade) => fade.is_finished(now),
            Self::Linear(fade) => fade.is_finished(now),
        }
    }
}

/// Transformer slot - enum containing every transformer a light can run
#[derive(Debug, Clone)]
pub enum TransformerSlot {
    Transition(Transition),
    Flash(FlashTransformer),
}

impl TransformerSlot {
    pub fn is_flash(&self) -> bool {
        matches!(self, Self::Flash(_))
    }
}

impl LightTransformer for TransformerSlot {
    fn start_values(&self) -> &ColorValue {
        match self {
            Self::Transition(transition) => transition.start_values(),
            Self::Flash(flash) => flash.start_values(),
        }
    }

    fn target_values(&self) -> &ColorValue {
        match self {
            Self::Transition(transition) => transition.target_values(),
            Self::Flash(flash) => flash.target_values(),
        }
    }

    fn apply(&mut self, now: Instant, current: &ColorValue) -> Option<ColorValue> {
        match self {
            Self::Transition(transition) => transition.apply(now, current),
            Self::Flash(flash) => flash.apply(now, current),
        }
    }

    fn is_finished(&self, now: Instant) -> bool {
        match self {
            Self::Transition(transition) => transition.is_finished(now),
            Self::Flash(flash) => flash.is_finished(now),
        }
    }

    fn stop(&mut self) -> Option<ColorValue> {
        match self {
            Self::Transition(transition) => transition.stop(),
            Self::Flash(flash) => flash.stop(),
        }
    }
}
