//! Linear fade
//!
//! Field-wise interpolation of two color values with a smoothed progress.

use embassy_time::{Duration, Instant};

use super::{LightTransformer, Timing};
use crate::{color::ColorValue, gamma::smootherstep};

#[derive(Debug, Clone)]
pub struct LinearFade {
    timing: Timing,
    start: ColorValue,
    target: ColorValue,
    from: ColorValue,
    to: ColorValue,
}

impl LinearFade {
    pub fn new(start: ColorValue, target: ColorValue, length: Duration, now: Instant) -> Self {
        let mut from = start;
        from.set_raw(false);
        if !start.is_on() && target.is_on() {
            from = target;
            from.set_brightness(0.0);
        }
        let to = if from.is_on() && !target.is_on() {
            let mut dark = from;
            dark.set_brightness(0.0);
            dark
        } else {
            target
        };

        Self {
            timing: Timing::new(now, length),
            start,
            target,
            from,
            to,
        }
    }
}

impl LightTransformer for LinearFade {
    fn start_values(&self) -> &ColorValue {
        &self.start
    }

    fn target_values(&self) -> &ColorValue {
        &self.target
    }

    fn apply(&mut self, now: Instant, _current: &ColorValue) -> Option<ColorValue> {
        let p = smootherstep(self.timing.progress(now));
        Some(ColorValue::lerp(&self.from, &self.to, p))
    }

    fn is_finished(&self, now: Instant) -> bool {
        self.timing.is_finished(now)
    }
}
