use crate::{
    color_mode::{ColorCapability, ColorMode},
    gamma::{gamma_correct, lerp},
};

/// Full description of a light's color: mode, on/off level and every
/// channel level, each in `[0, 1]` except the color temperature which is in
/// mireds.
///
/// When [`ColorValue::is_raw`] is set the channel fields already hold output
/// levels (transition frames, network frames) and must not be gamma
/// corrected again.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorValue {
    color_mode: ColorMode,
    state: f32,
    brightness: f32,
    color_brightness: f32,
    red: f32,
    green: f32,
    blue: f32,
    white: f32,
    color_temperature: f32,
    cold_white: f32,
    warm_white: f32,
    raw: bool,
}

/// Channel levels of a value projected into the RGB + temperature space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct RgbCt {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    /// Color temperature as a fraction of the mireds range, 0 is coldest
    pub ct: f32,
    pub white_brightness: f32,
}

impl Default for ColorValue {
    fn default() -> Self {
        Self {
            color_mode: ColorMode::Unknown,
            state: 0.0,
            brightness: 1.0,
            color_brightness: 1.0,
            red: 1.0,
            green: 1.0,
            blue: 1.0,
            white: 1.0,
            color_temperature: 0.0,
            cold_white: 1.0,
            warm_white: 1.0,
            raw: false,
        }
    }
}

#[inline]
fn clamp01(value: f32) -> f32 {
    value.clamp(0.0, 1.0)
}

impl ColorValue {
    /// Interpolate every field. The result takes the color mode of `end` and
    /// stays raw only if both ends are raw.
    #[must_use]
    pub fn lerp(start: &Self, end: &Self, t: f32) -> Self {
        Self {
            color_mode: end.color_mode,
            state: lerp(start.state, end.state, t),
            brightness: lerp(start.brightness, end.brightness, t),
            color_brightness: lerp(start.color_brightness, end.color_brightness, t),
            red: lerp(start.red, end.red, t),
            green: lerp(start.green, end.green, t),
            blue: lerp(start.blue, end.blue, t),
            white: lerp(start.white, end.white, t),
            color_temperature: lerp(start.color_temperature, end.color_temperature, t),
            cold_white: lerp(start.cold_white, end.cold_white, t),
            warm_white: lerp(start.warm_white, end.warm_white, t),
            raw: start.raw && end.raw,
        }
    }

    /// Scale RGB so the strongest channel is at full level.
    ///
    /// Black turns into white since the brightness fields carry the level.
    pub fn normalize_color(&mut self) {
        if !self.color_mode.has(ColorCapability::Rgb) {
            return;
        }
        let max = self.red.max(self.green).max(self.blue);
        if max == 0.0 {
            self.red = 1.0;
            self.green = 1.0;
            self.blue = 1.0;
        } else {
            self.red /= max;
            self.green /= max;
            self.blue /= max;
        }
    }

    /// Binary on/off projection
    pub fn as_binary(&self) -> bool {
        self.state >= 1.0
    }

    /// Master brightness output level
    pub fn as_brightness(&self, gamma: f32) -> f32 {
        gamma_correct(self.state * self.brightness, gamma)
    }

    /// RGB output levels. Zero when the mode has no RGB.
    pub fn as_rgb(&self, gamma: f32) -> (f32, f32, f32) {
        if !self.color_mode.has(ColorCapability::Rgb) {
            return (0.0, 0.0, 0.0);
        }
        let level = self.state * self.brightness * self.color_brightness;
        (
            gamma_correct(level * self.red, gamma),
            gamma_correct(level * self.green, gamma),
            gamma_correct(level * self.blue, gamma),
        )
    }

    /// RGB plus white output levels
    pub fn as_rgbw(&self, gamma: f32) -> (f32, f32, f32, f32) {
        let (red, green, blue) = self.as_rgb(gamma);
        let white = if self.color_mode.has(ColorCapability::White) {
            gamma_correct(self.state * self.brightness * self.white, gamma)
        } else {
            0.0
        };
        (red, green, blue, white)
    }

    /// Cold and warm white output levels.
    ///
    /// With `constant_brightness` the sum of both outputs stays at the
    /// requested brightness, otherwise the stronger one does.
    pub fn as_cwww(&self, gamma: f32, constant_brightness: bool) -> (f32, f32) {
        if !self.color_mode.has(ColorCapability::ColdWarmWhite) {
            return (0.0, 0.0);
        }
        let white_level = gamma_correct(self.state * self.brightness * self.white, gamma);
        let cold = gamma_correct(self.cold_white, gamma);
        let warm = gamma_correct(self.warm_white, gamma);
        if constant_brightness {
            let sum = cold + warm;
            if sum <= 0.0 {
                return (0.0, 0.0);
            }
            (white_level * cold / sum, white_level * warm / sum)
        } else {
            let max = cold.max(warm);
            if max <= 0.0 {
                return (0.0, 0.0);
            }
            (white_level * cold / max, white_level * warm / max)
        }
    }

    /// RGB plus cold and warm white output levels
    pub fn as_rgbww(&self, gamma: f32, constant_brightness: bool) -> (f32, f32, f32, f32, f32) {
        let (red, green, blue) = self.as_rgb(gamma);
        let (cold, warm) = self.as_cwww(gamma, constant_brightness);
        (red, green, blue, cold, warm)
    }

    /// Color temperature fraction and white brightness.
    ///
    /// The fraction is 0 at `min_mireds` and 1 at `max_mireds`. In
    /// cold/warm white mode it is derived from the ratio of the two outputs.
    /// `None` when the mode carries no white temperature at all.
    pub fn as_ct(&self, min_mireds: f32, max_mireds: f32, gamma: f32) -> Option<(f32, f32)> {
        let white_level = if self.color_mode.has(ColorCapability::Rgb) {
            self.white
        } else {
            1.0
        };
        if self.color_mode.has(ColorCapability::ColorTemperature) {
            let ct = self.ct_fraction(min_mireds, max_mireds);
            let white_brightness = gamma_correct(self.state * self.brightness * white_level, gamma);
            Some((ct, white_brightness))
        } else if self.color_mode.has(ColorCapability::ColdWarmWhite) {
            let cold = gamma_correct(self.cold_white, gamma);
            let warm = gamma_correct(self.warm_white, gamma);
            let sum = cold + warm;
            let ct = if sum > 0.0 { warm / sum } else { 0.5 };
            let white_brightness = gamma_correct(self.state * self.brightness * white_level, gamma);
            Some((ct, white_brightness))
        } else {
            None
        }
    }

    /// Project into RGB + temperature space.
    ///
    /// Values without a temperature keep the fraction of their stored mireds
    /// and a zero white brightness.
    pub fn as_rgbct(&self, min_mireds: f32, max_mireds: f32, gamma: f32) -> RgbCt {
        let (red, green, blue) = self.as_rgb(gamma);
        let (ct, white_brightness) = self
            .as_ct(min_mireds, max_mireds, gamma)
            .unwrap_or((self.ct_fraction(min_mireds, max_mireds), 0.0));
        RgbCt {
            red,
            green,
            blue,
            ct,
            white_brightness,
        }
    }

    /// Temperature fraction and white brightness of a raw value.
    ///
    /// No gamma and no color mode gating: raw values already hold levels.
    pub fn as_raw_ct(&self, min_mireds: f32, max_mireds: f32) -> (f32, f32) {
        (
            self.ct_fraction(min_mireds, max_mireds),
            clamp01(self.state * self.brightness),
        )
    }

    /// Stored temperature as a fraction of the range
    pub fn ct_fraction(&self, min_mireds: f32, max_mireds: f32) -> f32 {
        let range = max_mireds - min_mireds;
        if range <= 0.0 {
            return 0.5;
        }
        clamp01((self.color_temperature - min_mireds) / range)
    }

    pub const fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    pub fn set_color_mode(&mut self, color_mode: ColorMode) {
        self.color_mode = color_mode;
    }

    /// On/off level. Only transition frames hold values between 0 and 1.
    pub const fn state(&self) -> f32 {
        self.state
    }

    pub fn is_on(&self) -> bool {
        self.state != 0.0
    }

    pub fn set_state(&mut self, on: bool) {
        self.state = if on { 1.0 } else { 0.0 };
    }

    pub fn set_state_level(&mut self, level: f32) {
        self.state = clamp01(level);
    }

    pub const fn brightness(&self) -> f32 {
        self.brightness
    }

    pub fn set_brightness(&mut self, brightness: f32) {
        self.brightness = clamp01(brightness);
    }

    pub const fn color_brightness(&self) -> f32 {
        self.color_brightness
    }

    pub fn set_color_brightness(&mut self, brightness: f32) {
        self.color_brightness = clamp01(brightness);
    }

    pub const fn red(&self) -> f32 {
        self.red
    }

    pub fn set_red(&mut self, red: f32) {
        self.red = clamp01(red);
    }

    pub const fn green(&self) -> f32 {
        self.green
    }

    pub fn set_green(&mut self, green: f32) {
        self.green = clamp01(green);
    }

    pub const fn blue(&self) -> f32 {
        self.blue
    }

    pub fn set_blue(&mut self, blue: f32) {
        self.blue = clamp01(blue);
    }

    pub fn set_rgb(&mut self, red: f32, green: f32, blue: f32) {
        self.set_red(red);
        self.set_green(green);
        self.set_blue(blue);
    }

    pub const fn white(&self) -> f32 {
        self.white
    }

    pub fn set_white(&mut self, white: f32) {
        self.white = clamp01(white);
    }

    /// Color temperature in mireds
    pub const fn color_temperature(&self) -> f32 {
        self.color_temperature
    }

    pub fn set_color_temperature(&mut self, mireds: f32) {
        self.color_temperature = mireds;
    }

    pub const fn cold_white(&self) -> f32 {
        self.cold_white
    }

    pub fn set_cold_white(&mut self, level: f32) {
        self.cold_white = clamp01(level);
    }

    pub const fn warm_white(&self) -> f32 {
        self.warm_white
    }

    pub fn set_warm_white(&mut self, level: f32) {
        self.warm_white = clamp01(level);
    }

    /// Check if channel fields hold output levels
    pub const fn is_raw(&self) -> bool {
        self.raw
    }

    pub fn set_raw(&mut self, raw: bool) {
        self.raw = raw;
    }
}
