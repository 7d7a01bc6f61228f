//! Per-pixel fade for addressable strips.
//!
//! Instead of interpolating color values, every pixel keeps moving towards
//! a fixed target color by the fraction of the remaining time that elapsed
//! since the previous frame. Pixels that started at different colors all
//! arrive together.

use embassy_time::{Duration, Instant};

use super::Timing;
use crate::{
    color::{ColorValue, Rgb},
    gamma::smootherstep,
    math8::{scale8, subtract_scaled_difference, to_u8},
};

#[derive(Debug, Clone)]
pub struct AddressableFade {
    timing: Timing,
    target: ColorValue,
    target_color: Rgb,
    last_progress: f32,
}

/// 8-bit color of a value with master brightness applied
fn target_color(values: &ColorValue) -> Rgb {
    let level = values.color_brightness();
    let color = Rgb::new(
        to_u8(level * values.red()),
        to_u8(level * values.green()),
        to_u8(level * values.blue()),
    );
    let scale = to_u8(values.brightness() * values.state());
    Rgb::new(
        scale8(color.r, scale),
        scale8(color.g, scale),
        scale8(color.b, scale),
    )
}

impl AddressableFade {
    pub fn new(target: ColorValue, length: Duration, now: Instant) -> Self {
        Self {
            timing: Timing::new(now, length),
            target,
            target_color: target_color(&target),
            last_progress: 0.0,
        }
    }

    pub fn target_values(&self) -> &ColorValue {
        &self.target
    }

    /// Color every pixel converges to
    pub fn target_color(&self) -> Rgb {
        self.target_color
    }

    /// Advance pixels towards the target. Returns `true` when any were updated.
    pub fn apply(&mut self, now: Instant, leds: &mut [Rgb]) -> bool {
        let p = smootherstep(self.timing.progress(now));
        if p <= self.last_progress || self.last_progress >= 1.0 {
            return false;
        }

        let remaining = (1.0 - p) / (1.0 - self.last_progress);
        #[allow(clippy::cast_possible_truncation)]
        let scale = (256.0 * remaining.max(0.0)) as i32;
        let target = self.target_color;
        for led in leds.iter_mut() {
            *led = Rgb::new(
                subtract_scaled_difference(target.r, led.r, scale),
                subtract_scaled_difference(target.g, led.g, scale),
                subtract_scaled_difference(target.b, led.b, scale),
            );
        }
        self.last_progress = p;
        true
    }

    pub fn is_finished(&self, now: Instant) -> bool {
        self.timing.is_finished(now)
    }
}
