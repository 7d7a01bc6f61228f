//! Mixing of the main and aux light values into five PWM channel levels.
//!
//! The shared minimum of red, green and blue is partly moved into the white
//! channels, split between warm and cold by the color temperature. Aux
//! lights that are on add their own color to the split.

use libm::ceilf;
use log::trace;

use crate::{
    color::ColorValue,
    color_mode::ColorCapability,
    traits::{DEFAULT_MAX_MIREDS, DEFAULT_MIN_MIREDS},
};

const DEFAULT_PWM_STEPS: u32 = 1000;

/// Number of distinct duty levels of each PWM channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChannelSteps {
    pub red: u32,
    pub green: u32,
    pub blue: u32,
    pub cold_white: u32,
    pub warm_white: u32,
}

impl Default for ChannelSteps {
    fn default() -> Self {
        Self::uniform(DEFAULT_PWM_STEPS)
    }
}

impl ChannelSteps {
    pub const fn uniform(steps: u32) -> Self {
        Self {
            red: steps,
            green: steps,
            blue: steps,
            cold_white: steps,
            warm_white: steps,
        }
    }

    /// Steps of channels driven at the given PWM frequencies, in Hz.
    ///
    /// A zero frequency keeps the default step count.
    pub const fn from_frequencies(
        red: u32,
        green: u32,
        blue: u32,
        cold_white: u32,
        warm_white: u32,
    ) -> Self {
        Self {
            red: steps_for_frequency(red),
            green: steps_for_frequency(green),
            blue: steps_for_frequency(blue),
            cold_white: steps_for_frequency(cold_white),
            warm_white: steps_for_frequency(warm_white),
        }
    }
}

const fn steps_for_frequency(hz: u32) -> u32 {
    if hz == 0 {
        DEFAULT_PWM_STEPS
    } else {
        1_000_000 / hz
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BlenderConfig {
    /// Fraction of the shared RGB minimum moved into the white channels
    pub max_white_gain: f32,
    /// Scale of the blue channel after blending
    pub max_blue_gain: f32,
    pub min_mireds: f32,
    pub max_mireds: f32,
    pub pwm_steps: ChannelSteps,
}

impl Default for BlenderConfig {
    fn default() -> Self {
        Self {
            max_white_gain: 0.75,
            max_blue_gain: 0.6,
            min_mireds: DEFAULT_MIN_MIREDS,
            max_mireds: DEFAULT_MAX_MIREDS,
            pwm_steps: ChannelSteps::default(),
        }
    }
}

/// Output levels of the five channels, each in `[0, 1]`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ChannelLevels {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub cold_white: f32,
    pub warm_white: f32,
}

impl ChannelLevels {
    pub const OFF: Self = Self {
        red: 0.0,
        green: 0.0,
        blue: 0.0,
        cold_white: 0.0,
        warm_white: 0.0,
    };
}

/// Contribution of an aux light that is on.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct AuxLevels {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub white: f32,
}

impl AuxLevels {
    /// Levels of an aux light's values. `None` while the light is off.
    pub fn from_values(values: &ColorValue, gamma: f32) -> Option<Self> {
        if !values.is_on() {
            return None;
        }
        let (red, green, blue, white) = values.as_rgbw(gamma);
        Some(Self {
            red,
            green,
            blue,
            white,
        })
    }
}

/// Round a level up to the next PWM step
pub fn quantize(level: f32, steps: u32) -> f32 {
    if level <= 0.0 || steps == 0 {
        return level;
    }
    #[allow(clippy::cast_precision_loss)]
    let steps = steps as f32;
    ceilf(level * steps) / steps
}

#[derive(Debug, Clone)]
pub struct Blender {
    config: BlenderConfig,
    /// Last temperature fraction, kept for values without one
    ct: f32,
}

impl Blender {
    pub fn new(config: BlenderConfig) -> Self {
        Self { config, ct: 0.5 }
    }

    pub fn config(&self) -> &BlenderConfig {
        &self.config
    }

    /// Temperature fraction used by the last blend
    pub fn color_temperature_fraction(&self) -> f32 {
        self.ct
    }

    /// Mix main values and aux contributions into channel levels.
    pub fn blend(
        &mut self,
        main: &ColorValue,
        gamma: f32,
        warm: Option<AuxLevels>,
        cold: Option<AuxLevels>,
    ) -> ChannelLevels {
        let (min, max) = (self.config.min_mireds, self.config.max_mireds);

        let (red, green, blue, white_brightness) = if main.is_raw() {
            let (ct, white_brightness) = main.as_raw_ct(min, max);
            self.ct = ct;
            (main.red(), main.green(), main.blue(), white_brightness)
        } else if !main.is_on() {
            (0.0, 0.0, 0.0, 0.0)
        } else if main.color_mode().has(ColorCapability::ColorTemperature) {
            let white_brightness = match main.as_ct(min, max, gamma) {
                Some((ct, white_brightness)) => {
                    self.ct = ct;
                    white_brightness
                }
                None => 0.0,
            };
            (0.0, 0.0, 0.0, white_brightness)
        } else {
            let (red, green, blue) = main.as_rgb(gamma);
            (red, green, blue, 0.0)
        };

        let levels = self.mix(red, green, blue, white_brightness, warm, cold);
        trace!(
            "blend: r {} g {} b {} cw {} ww {}",
            levels.red, levels.green, levels.blue, levels.cold_white, levels.warm_white
        );
        levels
    }

    fn mix(
        &self,
        red: f32,
        green: f32,
        blue: f32,
        white_brightness: f32,
        warm: Option<AuxLevels>,
        cold: Option<AuxLevels>,
    ) -> ChannelLevels {
        let ct = self.ct;
        let min_value = red.min(green).min(blue);
        let moved_white = min_value * self.config.max_white_gain;
        let white_blend = moved_white + white_brightness;

        let mut red = red - min_value;
        let mut green = green - min_value;
        let mut blue = blue - min_value;

        let mut add_aux = |aux: Option<AuxLevels>, share: f32| match aux {
            Some(aux) => {
                let weight = white_brightness * share;
                red += aux.red * weight;
                green += aux.green * weight;
                blue += aux.blue * weight;
                (moved_white + white_brightness * aux.white) * share
            }
            None => white_blend * share,
        };
        let warm_white = add_aux(warm, ct);
        let cold_white = add_aux(cold, 1.0 - ct);

        let blue = blue * self.config.max_blue_gain;
        let steps = &self.config.pwm_steps;
        ChannelLevels {
            red: quantize(red.clamp(0.0, 1.0), steps.red),
            green: quantize(green.clamp(0.0, 1.0), steps.green),
            blue: quantize(blue.clamp(0.0, 1.0), steps.blue),
            cold_white: quantize(cold_white.clamp(0.0, 1.0), steps.cold_white),
            warm_white: quantize(warm_white.clamp(0.0, 1.0), steps.warm_white),
        }
    }
}
