//! Flash: show a color for a fixed time, then restore the previous one.

use embassy_time::{Duration, Instant};

use super::{LightTransformer, Timing, Transition, TransitionKind};
use crate::color::ColorValue;

#[derive(Debug, Clone)]
pub struct FlashTransformer {
    timing: Timing,
    /// Values restored when the flash ends
    restore: ColorValue,
    target: ColorValue,
    kind: TransitionKind,
    fade_length: Duration,
    mireds: (f32, f32),
    fade: Option<Transition>,
    restoring: bool,
}

impl FlashTransformer {
    /// Create a flash towards `target` that returns to `restore`.
    ///
    /// `fade_length` is capped at half of the flash `length`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        restore: ColorValue,
        target: ColorValue,
        length: Duration,
        now: Instant,
        fade_length: Duration,
        kind: TransitionKind,
        current: ColorValue,
        mireds: (f32, f32),
    ) -> Self {
        let fade_length = fade_length.min(length / 2);
        let fade = kind.create(current, target, fade_length, now, mireds);
        Self {
            timing: Timing::new(now, length),
            restore,
            target,
            kind,
            fade_length,
            mireds,
            fade: Some(fade),
            restoring: false,
        }
    }

    /// Check if the fade back has begun
    pub fn is_restoring(&self) -> bool {
        self.restoring
    }
}

impl LightTransformer for FlashTransformer {
    fn start_values(&self) -> &ColorValue {
        &self.restore
    }

    fn target_values(&self) -> &ColorValue {
        &self.target
    }

    fn apply(&mut self, now: Instant, current: &ColorValue) -> Option<ColorValue> {
        let restore_at = self.timing.start() + (self.timing.length() - self.fade_length);
        if self.fade.is_none() && !self.restoring && now >= restore_at {
            self.fade = Some(self.kind.create(
                *current,
                self.restore,
                self.fade_length,
                now,
                self.mireds,
            ));
            self.restoring = true;
        }

        let fade = self.fade.as_mut()?;
        let frame = fade.apply(now, current);
        if fade.is_finished(now) {
            self.fade = None;
        }
        frame
    }

    fn is_finished(&self, now: Instant) -> bool {
        self.restoring && self.fade.is_none() && self.timing.is_finished(now)
    }

    fn stop(&mut self) -> Option<ColorValue> {
        self.fade = None;
        Some(self.restore)
    }
}
