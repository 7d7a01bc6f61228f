//! Light change requests.
//!
//! A [`LightCall`] collects the fields a caller wants to change. It is
//! consumed by [`LightCall::validate`], which resolves it against the light's
//! capabilities and last published state into a [`ValidatedCall`] that the
//! light then performs.

use core::str::FromStr;

use embassy_time::Duration;
use heapless::String;
use log::{info, warn};

use crate::{
    color::ColorValue,
    color_mode::{ColorCapability, ColorMode, ColorModeMask},
    effect::EffectSlot,
    gamma::gamma_uncorrect,
    traits::LightTraits,
};

/// Maximum length of an effect name in a call
pub const MAX_EFFECT_NAME_LEN: usize = 32;

const EFFECT_NAME_NONE: &str = "none";

/// Effect requested by a call
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EffectRequest {
    /// 1-based effect index, 0 is "no effect"
    Index(u32),
    /// Effect name, resolved case-insensitively during validation
    Name(String<MAX_EFFECT_NAME_LEN>),
}

/// Builder of a requested light change.
///
/// Every field is optional; unset fields keep the light's current value.
#[derive(Clone, Debug, PartialEq)]
pub struct LightCall {
    traits: LightTraits,
    remote_color_mode: ColorMode,
    state: Option<bool>,
    transition: Option<Duration>,
    flash: Option<Duration>,
    color_mode: Option<ColorMode>,
    brightness: Option<f32>,
    color_brightness: Option<f32>,
    red: Option<f32>,
    green: Option<f32>,
    blue: Option<f32>,
    white: Option<f32>,
    color_temperature: Option<f32>,
    cold_white: Option<f32>,
    warm_white: Option<f32>,
    effect: Option<EffectRequest>,
    publish: bool,
    save: bool,
}

/// Light side of a validation: what it supports and what it currently shows.
#[derive(Clone, Copy, Debug)]
pub struct CallTarget<'a> {
    /// Light name used in log messages
    pub name: &'a str,
    pub traits: LightTraits,
    /// Last published target values
    pub remote: &'a ColorValue,
    /// Active effect index, 0 when none
    pub active_effect: u32,
    pub effects: &'a [EffectSlot],
    pub default_transition: Duration,
    pub gamma: f32,
}

/// Call resolved against a light. Ready to be performed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValidatedCall {
    values: ColorValue,
    transition: Option<Duration>,
    flash: Option<Duration>,
    effect: Option<u32>,
    publish: bool,
    save: bool,
}

impl ValidatedCall {
    /// Target values of the call
    pub const fn values(&self) -> &ColorValue {
        &self.values
    }

    pub const fn transition(&self) -> Option<Duration> {
        self.transition
    }

    pub const fn flash(&self) -> Option<Duration> {
        self.flash
    }

    /// Effect index to start, 0 stops the active effect
    pub const fn effect(&self) -> Option<u32> {
        self.effect
    }

    pub const fn should_publish(&self) -> bool {
        self.publish
    }

    pub const fn should_save(&self) -> bool {
        self.save
    }
}

macro_rules! setter {
    ($(#[$meta:meta])* $name:ident, $if_supported:ident, $field:ident, $capability:expr) => {
        $(#[$meta])*
        pub fn $name(&mut self, value: f32) -> &mut Self {
            self.$field = Some(value);
            self
        }

        /// Set the field only if the active color mode supports it
        pub fn $if_supported(&mut self, value: f32) -> &mut Self {
            if self.active_color_mode().has($capability) {
                self.$field = Some(value);
            }
            self
        }
    };
}

impl LightCall {
    /// Create an empty call for a light with the given traits.
    ///
    /// `remote_color_mode` is the light's last published color mode, used by
    /// the `*_if_supported` setters when the call sets no mode itself.
    pub fn new(traits: LightTraits, remote_color_mode: ColorMode) -> Self {
        Self {
            traits,
            remote_color_mode,
            state: None,
            transition: None,
            flash: None,
            color_mode: None,
            brightness: None,
            color_brightness: None,
            red: None,
            green: None,
            blue: None,
            white: None,
            color_temperature: None,
            cold_white: None,
            warm_white: None,
            effect: None,
            publish: true,
            save: true,
        }
    }

    /// Color mode the call will most likely resolve to
    fn active_color_mode(&self) -> ColorMode {
        self.color_mode.unwrap_or(self.remote_color_mode)
    }

    pub fn set_state(&mut self, on: bool) -> &mut Self {
        self.state = Some(on);
        self
    }

    pub fn set_transition_length(&mut self, length: Duration) -> &mut Self {
        self.transition = Some(length);
        self
    }

    pub fn set_transition_length_if_supported(&mut self, length: Duration) -> &mut Self {
        if self.active_color_mode().has(ColorCapability::Brightness) {
            self.transition = Some(length);
        }
        self
    }

    pub fn set_flash_length(&mut self, length: Duration) -> &mut Self {
        self.flash = Some(length);
        self
    }

    pub fn set_color_mode(&mut self, color_mode: ColorMode) -> &mut Self {
        self.color_mode = Some(color_mode);
        self
    }

    pub fn set_color_mode_if_supported(&mut self, color_mode: ColorMode) -> &mut Self {
        if self.traits.supports_color_mode(color_mode) {
            self.color_mode = Some(color_mode);
        }
        self
    }

    setter!(
        /// Master brightness in `[0, 1]`. Zero turns the light off.
        set_brightness,
        set_brightness_if_supported,
        brightness,
        ColorCapability::Brightness
    );
    setter!(
        set_color_brightness,
        set_color_brightness_if_supported,
        color_brightness,
        ColorCapability::Rgb
    );
    setter!(set_red, set_red_if_supported, red, ColorCapability::Rgb);
    setter!(set_green, set_green_if_supported, green, ColorCapability::Rgb);
    setter!(set_blue, set_blue_if_supported, blue, ColorCapability::Rgb);
    setter!(set_white, set_white_if_supported, white, ColorCapability::White);
    setter!(
        set_cold_white,
        set_cold_white_if_supported,
        cold_white,
        ColorCapability::ColdWarmWhite
    );
    setter!(
        set_warm_white,
        set_warm_white_if_supported,
        warm_white,
        ColorCapability::ColdWarmWhite
    );

    /// Color temperature in mireds
    pub fn set_color_temperature(&mut self, mireds: f32) -> &mut Self {
        self.color_temperature = Some(mireds);
        self
    }

    /// Set the color temperature if the active mode has a temperature or
    /// separate cold/warm white outputs
    pub fn set_color_temperature_if_supported(&mut self, mireds: f32) -> &mut Self {
        let mode = self.active_color_mode();
        if mode.has_any(ColorCapability::ColorTemperature, ColorCapability::ColdWarmWhite) {
            self.color_temperature = Some(mireds);
        }
        self
    }

    pub fn set_rgb(&mut self, red: f32, green: f32, blue: f32) -> &mut Self {
        self.set_red(red).set_green(green).set_blue(blue)
    }

    pub fn set_rgbw(&mut self, red: f32, green: f32, blue: f32, white: f32) -> &mut Self {
        self.set_rgb(red, green, blue).set_white(white)
    }

    /// Request an effect by 1-based index, 0 stops the active effect
    pub fn set_effect(&mut self, index: u32) -> &mut Self {
        self.effect = Some(EffectRequest::Index(index));
        self
    }

    /// Request an effect by name. `"none"` stops the active effect.
    pub fn set_effect_by_name(&mut self, name: &str) -> &mut Self {
        if name.eq_ignore_ascii_case(EFFECT_NAME_NONE) {
            self.effect = Some(EffectRequest::Index(0));
        } else if let Ok(name) = String::from_str(name) {
            self.effect = Some(EffectRequest::Name(name));
        } else {
            warn!("effect name '{}' is too long, ignoring", name);
        }
        self
    }

    pub fn set_publish(&mut self, publish: bool) -> &mut Self {
        self.publish = publish;
        self
    }

    pub fn set_save(&mut self, save: bool) -> &mut Self {
        self.save = save;
        self
    }

    /// Fill the call from a value, keeping only what the light supports
    pub fn from_color_value(&mut self, values: &ColorValue) -> &mut Self {
        self.set_state(values.is_on());
        self.set_brightness_if_supported(values.brightness());
        self.set_color_brightness_if_supported(values.color_brightness());
        self.set_color_mode_if_supported(values.color_mode());
        self.set_red_if_supported(values.red());
        self.set_green_if_supported(values.green());
        self.set_blue_if_supported(values.blue());
        self.set_white_if_supported(values.white());
        self.set_color_temperature_if_supported(values.color_temperature());
        self.set_cold_white_if_supported(values.cold_white());
        self.set_warm_white_if_supported(values.warm_white());
        self
    }

    pub const fn state(&self) -> Option<bool> {
        self.state
    }

    pub const fn brightness(&self) -> Option<f32> {
        self.brightness
    }

    pub const fn color_mode(&self) -> Option<ColorMode> {
        self.color_mode
    }

    pub const fn transition(&self) -> Option<Duration> {
        self.transition
    }

    pub const fn flash(&self) -> Option<Duration> {
        self.flash
    }

    fn has_rgb(&self) -> bool {
        self.red.is_some() || self.green.is_some() || self.blue.is_some()
    }

    /// Resolve the call against a light.
    ///
    /// Unsupported fields are dropped with a warning, out-of-range values are
    /// clamped, and the color mode is inferred when not given explicitly. The
    /// result is what [`crate::LightState::perform`] executes.
    pub fn validate(mut self, target: &CallTarget<'_>) -> ValidatedCall {
        let name = target.name;
        let traits = &target.traits;

        if let Some(mode) = self.color_mode {
            if !traits.supports_color_mode(mode) {
                warn!("'{}': color mode {} not supported", name, mode);
                self.color_mode = None;
            }
        }

        let color_mode = match self.color_mode {
            Some(mode) => mode,
            None => {
                let mode = self.compute_color_mode(target);
                self.color_mode = Some(mode);
                mode
            }
        };

        self.transform_parameters(target, color_mode);

        let explicit_turn_off = self.state == Some(false);

        if self.brightness == Some(0.0) {
            self.state = Some(false);
            self.brightness = Some(1.0);
        }

        if self.has_rgb() && self.color_brightness.is_none() && target.remote.color_brightness() == 0.0
        {
            self.color_brightness = Some(1.0);
        }

        self.drop_unsupported(name, color_mode);

        let mut values = *target.remote;
        values.set_color_mode(color_mode);
        if let Some(state) = self.state {
            values.set_state(state);
        }
        if let Some(value) = self.brightness {
            values.set_brightness(clamp_field(name, "brightness", value));
        }
        if let Some(value) = self.color_brightness {
            values.set_color_brightness(clamp_field(name, "color brightness", value));
        }
        if let Some(value) = self.red {
            values.set_red(clamp_field(name, "red", value));
        }
        if let Some(value) = self.green {
            values.set_green(clamp_field(name, "green", value));
        }
        if let Some(value) = self.blue {
            values.set_blue(clamp_field(name, "blue", value));
        }
        if let Some(value) = self.white {
            values.set_white(clamp_field(name, "white", value));
        }
        if let Some(value) = self.cold_white {
            values.set_cold_white(clamp_field(name, "cold white", value));
        }
        if let Some(value) = self.warm_white {
            values.set_warm_white(clamp_field(name, "warm white", value));
        }
        if let Some(value) = self.color_temperature {
            let (min, max) = (traits.min_mireds(), traits.max_mireds());
            let clamped = if traits.has_mireds_range() {
                value.clamp(min, max)
            } else {
                value
            };
            if clamped != value {
                warn!(
                    "'{}': color temperature {} out of range [{}, {}]",
                    name, value, min, max
                );
            }
            values.set_color_temperature(clamped);
        }
        values.normalize_color();

        let effect = self.resolve_effect(target);
        let supports_transition = color_mode.has(ColorCapability::Brightness);

        let mut transition = self.transition;
        let mut flash = self.flash;
        let mut effect = effect;

        if flash == Some(Duration::from_ticks(0)) {
            warn!("'{}': flash length must be greater than zero", name);
            flash = None;
        }

        if effect == Some(target.active_effect) {
            effect = None;
        }

        #[allow(clippy::cast_possible_truncation)]
        let effect_count = target.effects.len() as u32;
        if let Some(index) = effect {
            if index > effect_count {
                warn!("'{}': invalid effect index {}", name, index);
                effect = None;
            }
        }

        if effect.is_some() && (transition.is_some() || flash.is_some()) {
            warn!("'{}': effect cannot be used with transition or flash", name);
            transition = None;
            flash = None;
        }

        if flash.is_some() && transition.is_some() {
            warn!("'{}': flash cannot be used with transition", name);
            transition = None;
        }

        if transition.is_none()
            && flash.is_none()
            && effect.is_none_or(|index| index == 0)
            && supports_transition
        {
            transition = Some(target.default_transition);
        }

        if transition == Some(Duration::from_ticks(0)) {
            transition = None;
        }

        if transition.is_some() && !supports_transition {
            warn!("'{}': transitions are not supported", name);
            transition = None;
        }

        let target_state = self.state.unwrap_or(target.remote.is_on());
        if flash.is_none() && !target_state {
            if effect.is_some() {
                warn!("'{}': cannot start an effect when turning off", name);
                effect = None;
            } else if target.active_effect != 0 && explicit_turn_off {
                effect = Some(0);
            }
        }

        ValidatedCall {
            values,
            transition,
            flash,
            effect,
            publish: self.publish,
            save: self.save && flash.is_none(),
        }
    }

    /// Pick the color mode for a call that sets none explicitly
    fn compute_color_mode(&self, target: &CallTarget<'_>) -> ColorMode {
        let supported = target.traits.supported_color_modes();
        if supported.is_empty() {
            return ColorMode::Unknown;
        }
        if supported.len() == 1 {
            return supported.first().unwrap_or(ColorMode::Unknown);
        }

        let current = target.remote.color_mode();
        if self.state == Some(false) {
            return current;
        }

        let suitable = self.suitable_color_modes().intersection(supported);
        if suitable.contains(current) {
            info!("'{}': keeping current color mode {}", target.name, current);
            return current;
        }
        if let Some(mode) = suitable.first() {
            info!("'{}': using color mode {}", target.name, mode);
            return mode;
        }

        let fallback = if current == ColorMode::Unknown {
            supported.first().unwrap_or(ColorMode::Unknown)
        } else {
            current
        };
        warn!(
            "'{}': no color mode suits the requested values, using {}",
            target.name, fallback
        );
        fallback
    }

    /// Modes able to show every field the call sets
    fn suitable_color_modes(&self) -> ColorModeMask {
        use ColorMode::{
            ColdWarmWhite, ColorTemperature, Rgb, RgbColdWarmWhite, RgbColorTemperature, RgbWhite,
            White,
        };

        let has_white = self.white.is_some_and(|v| v > 0.0);
        let has_ct = self.color_temperature.is_some();
        let has_cwww = self.cold_white.is_some_and(|v| v > 0.0)
            || self.warm_white.is_some_and(|v| v > 0.0);
        let has_rgb = self.color_brightness.is_some_and(|v| v > 0.0) || self.has_rgb();

        match (has_rgb, has_white, has_ct, has_cwww) {
            (false, false, false, false) => ColorModeMask::from_modes([
                White,
                ColorTemperature,
                ColdWarmWhite,
                Rgb,
                RgbWhite,
                RgbColorTemperature,
                RgbColdWarmWhite,
            ]),
            (false, true, false, false) => ColorModeMask::from_modes([
                White,
                RgbWhite,
                RgbColorTemperature,
                ColdWarmWhite,
                RgbColdWarmWhite,
            ]),
            (false, false, true, false) => ColorModeMask::from_modes([
                ColorTemperature,
                RgbColorTemperature,
                ColdWarmWhite,
                RgbColdWarmWhite,
            ]),
            (false, true, true, false) => {
                ColorModeMask::from_modes([ColdWarmWhite, RgbColorTemperature, RgbColdWarmWhite])
            }
            (false, false, false, true) => ColorModeMask::from_modes([ColdWarmWhite, RgbColdWarmWhite]),
            (true, false, false, false) => {
                ColorModeMask::from_modes([Rgb, RgbWhite, RgbColorTemperature, RgbColdWarmWhite])
            }
            (true, true, false, false) => {
                ColorModeMask::from_modes([RgbWhite, RgbColorTemperature, RgbColdWarmWhite])
            }
            (true, _, true, false) => {
                ColorModeMask::from_modes([RgbColorTemperature, RgbColdWarmWhite])
            }
            (true, false, false, true) => ColorModeMask::from_modes([RgbColdWarmWhite]),
            _ => ColorModeMask::EMPTY,
        }
    }

    /// Translate temperature and white requests for pure cold/warm lights
    fn transform_parameters(&mut self, target: &CallTarget<'_>, color_mode: ColorMode) {
        let traits = &target.traits;
        if !color_mode.has(ColorCapability::ColdWarmWhite)
            || color_mode.has(ColorCapability::White)
            || color_mode.has(ColorCapability::ColorTemperature)
            || !traits.has_mireds_range()
        {
            return;
        }
        if !(self.white.is_some_and(|v| v > 0.0) || self.color_temperature.is_some()) {
            return;
        }

        if let Some(ct) = self.color_temperature {
            if self.cold_white.is_none() && self.warm_white.is_none() {
                let (min, max) = (traits.min_mireds(), traits.max_mireds());
                let warm_fraction = ((ct - min) / (max - min)).clamp(0.0, 1.0);
                let cold_fraction = 1.0 - warm_fraction;
                let max_fraction = warm_fraction.max(cold_fraction);
                self.cold_white = Some(gamma_uncorrect(cold_fraction / max_fraction, target.gamma));
                self.warm_white = Some(gamma_uncorrect(warm_fraction / max_fraction, target.gamma));
            }
        }
        if let Some(white) = self.white {
            self.brightness = Some(white);
        }
    }

    /// Clear fields the resolved color mode cannot show
    fn drop_unsupported(&mut self, name: &str, color_mode: ColorMode) {
        if self.brightness.is_some_and(|v| v > 0.0) && !color_mode.has(ColorCapability::Brightness)
        {
            warn!("'{}': brightness not supported", name);
            self.brightness = None;
        }

        if self.transition.is_some_and(|t| t.as_ticks() != 0)
            && !color_mode.has(ColorCapability::Brightness)
        {
            warn!("'{}': transitions not supported", name);
            self.transition = None;
        }

        if self.color_brightness.is_some_and(|v| v > 0.0) && !color_mode.has(ColorCapability::Rgb) {
            warn!("'{}': color brightness not supported", name);
            self.color_brightness = None;
        }

        let rgb_requested = [self.red, self.green, self.blue]
            .into_iter()
            .any(|channel| channel.is_some_and(|v| v > 0.0));
        if rgb_requested && !color_mode.has(ColorCapability::Rgb) {
            warn!("'{}': RGB color not supported", name);
            self.red = None;
            self.green = None;
            self.blue = None;
        }

        if self.white.is_some_and(|v| v > 0.0)
            && !color_mode.has_any(ColorCapability::White, ColorCapability::ColdWarmWhite)
        {
            warn!("'{}': white value not supported", name);
            self.white = None;
        }

        if self.color_temperature.is_some()
            && !color_mode.has_any(ColorCapability::ColorTemperature, ColorCapability::ColdWarmWhite)
        {
            warn!("'{}': color temperature not supported", name);
            self.color_temperature = None;
        }

        let cwww_requested =
            self.cold_white.is_some_and(|v| v > 0.0) || self.warm_white.is_some_and(|v| v > 0.0);
        if cwww_requested && !color_mode.has(ColorCapability::ColdWarmWhite) {
            warn!("'{}': cold/warm white not supported", name);
            self.cold_white = None;
            self.warm_white = None;
        }
    }

    fn resolve_effect(&self, target: &CallTarget<'_>) -> Option<u32> {
        match &self.effect {
            None => None,
            Some(EffectRequest::Index(index)) => Some(*index),
            Some(EffectRequest::Name(name)) => {
                let position = target
                    .effects
                    .iter()
                    .position(|slot| slot.name().eq_ignore_ascii_case(name));
                match position {
                    #[allow(clippy::cast_possible_truncation)]
                    Some(i) => Some(i as u32 + 1),
                    None => {
                        warn!("'{}': no such effect '{}'", target.name, name.as_str());
                        None
                    }
                }
            }
        }
    }
}

fn clamp_field(name: &str, field: &str, value: f32) -> f32 {
    let clamped = value.clamp(0.0, 1.0);
    if clamped != value {
        warn!("'{}': {} value {} out of range [0, 1]", name, field, value);
    }
    clamped
}
