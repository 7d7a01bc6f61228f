//! Perceptual fade
//!
//! Interpolates in RGB + color temperature space. Each channel is moved
//! through the inverse of a fixed gamma curve, so equal steps of progress
//! produce roughly equal steps of perceived brightness. Frames are emitted
//! as raw values.

use embassy_time::{Duration, Instant};

use super::{LightTransformer, Timing};
use crate::{
    color::{ColorValue, RgbCt},
    color_mode::ColorCapability,
    gamma::{DEFAULT_GAMMA, lerp, perceptual_gamma, perceptual_gamma_inverse, smootherstep},
};

#[derive(Debug, Clone)]
pub struct PerceptualFade {
    timing: Timing,
    start: ColorValue,
    target: ColorValue,
    /// Adjusted endpoints actually interpolated between
    from: ColorValue,
    to: ColorValue,
    /// Endpoints in linear perceived space: red, green, blue, white brightness
    from_levels: [f32; 4],
    to_levels: [f32; 4],
    from_ct: f32,
    to_ct: f32,
    mireds: (f32, f32),
}

/// Keep only the channels of the value's own family
fn isolate_channels(value: &mut ColorValue) {
    if value.color_mode().has(ColorCapability::Rgb) {
        value.set_white(0.0);
    } else {
        value.set_rgb(0.0, 0.0, 0.0);
    }
}

fn project(value: &ColorValue, (min, max): (f32, f32)) -> RgbCt {
    if value.is_raw() {
        let (ct, white_brightness) = value.as_raw_ct(min, max);
        RgbCt {
            red: value.red(),
            green: value.green(),
            blue: value.blue(),
            ct,
            white_brightness,
        }
    } else {
        value.as_rgbct(min, max, DEFAULT_GAMMA)
    }
}

fn linear_levels(levels: &RgbCt) -> [f32; 4] {
    [
        perceptual_gamma_inverse(levels.red),
        perceptual_gamma_inverse(levels.green),
        perceptual_gamma_inverse(levels.blue),
        perceptual_gamma_inverse(levels.white_brightness),
    ]
}

impl PerceptualFade {
    pub fn new(
        start: ColorValue,
        target: ColorValue,
        length: Duration,
        now: Instant,
        mireds: (f32, f32),
    ) -> Self {
        let mut from = start;
        if !start.is_on() && target.is_on() {
            // Fade in from black with the target color
            from = target;
            from.set_brightness(0.0);
        }
        if !from.is_raw() {
            isolate_channels(&mut from);
        }

        let mut to = if from.is_on() && !target.is_on() {
            let mut dark = from;
            dark.set_brightness(0.0);
            if dark.is_raw() {
                // Raw channels carry their level directly
                dark.set_rgb(0.0, 0.0, 0.0);
            }
            dark
        } else {
            target
        };
        if !to.is_raw() {
            isolate_channels(&mut to);
        }

        let from_projection = project(&from, mireds);
        let to_projection = project(&to, mireds);

        Self {
            timing: Timing::new(now, length),
            start,
            target,
            from,
            to,
            from_levels: linear_levels(&from_projection),
            to_levels: linear_levels(&to_projection),
            from_ct: from_projection.ct,
            to_ct: to_projection.ct,
            mireds,
        }
    }
}

impl LightTransformer for PerceptualFade {
    fn start_values(&self) -> &ColorValue {
        &self.start
    }

    fn target_values(&self) -> &ColorValue {
        &self.target
    }

    fn apply(&mut self, now: Instant, _current: &ColorValue) -> Option<ColorValue> {
        let p = smootherstep(self.timing.progress(now));
        let channel = |i: usize| perceptual_gamma(lerp(self.from_levels[i], self.to_levels[i], p));
        let ct = lerp(self.from_ct, self.to_ct, p);
        let (min, max) = self.mireds;

        let mut frame = ColorValue::default();
        frame.set_color_mode(self.to.color_mode());
        frame.set_state_level(lerp(self.from.state(), self.to.state(), p));
        frame.set_rgb(channel(0), channel(1), channel(2));
        frame.set_brightness(channel(3));
        frame.set_color_temperature(min + ct * (max - min));
        frame.set_raw(true);
        Some(frame)
    }

    fn is_finished(&self, now: Instant) -> bool {
        self.timing.is_finished(now)
    }
}
