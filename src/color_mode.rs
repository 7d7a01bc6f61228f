//! Color capabilities and the color modes built from them.
//!
//! A [`ColorMode`] is a fixed combination of [`ColorCapability`] bits. Sets of
//! modes are stored in a [`ColorModeMask`], a bitset indexed by the position
//! of each mode in a lookup table.

use core::fmt;

/// Independently controllable outputs of a light.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum ColorCapability {
    /// Light can be turned on/off.
    OnOff = 1 << 0,
    /// Master brightness can be controlled.
    Brightness = 1 << 1,
    /// White channel brightness can be controlled separately.
    White = 1 << 2,
    /// Color temperature can be controlled.
    ColorTemperature = 1 << 3,
    /// Cold and warm white outputs can be controlled separately.
    ColdWarmWhite = 1 << 4,
    /// Color can be controlled in RGB.
    Rgb = 1 << 5,
}

const ON_OFF: u8 = ColorCapability::OnOff as u8;
const BRIGHTNESS: u8 = ON_OFF | ColorCapability::Brightness as u8;

/// Mutually exclusive capability combination a light is operating in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum ColorMode {
    /// No color mode configured. Never supported, only active while off.
    #[default]
    Unknown = 0,
    OnOff = ON_OFF,
    Brightness = BRIGHTNESS,
    White = BRIGHTNESS | ColorCapability::White as u8,
    ColorTemperature = BRIGHTNESS | ColorCapability::ColorTemperature as u8,
    ColdWarmWhite = BRIGHTNESS | ColorCapability::ColdWarmWhite as u8,
    Rgb = BRIGHTNESS | ColorCapability::Rgb as u8,
    RgbWhite = BRIGHTNESS | ColorCapability::Rgb as u8 | ColorCapability::White as u8,
    RgbColorTemperature = BRIGHTNESS
        | ColorCapability::Rgb as u8
        | ColorCapability::White as u8
        | ColorCapability::ColorTemperature as u8,
    RgbColdWarmWhite = BRIGHTNESS | ColorCapability::Rgb as u8 | ColorCapability::ColdWarmWhite as u8,
}

/// Canonical mode order. The index of a mode is its bit in a [`ColorModeMask`].
const COLOR_MODE_LOOKUP: [ColorMode; 10] = [
    ColorMode::Unknown,
    ColorMode::OnOff,
    ColorMode::Brightness,
    ColorMode::White,
    ColorMode::ColorTemperature,
    ColorMode::ColdWarmWhite,
    ColorMode::Rgb,
    ColorMode::RgbWhite,
    ColorMode::RgbColorTemperature,
    ColorMode::RgbColdWarmWhite,
];

const MODE_NAME_ON_OFF: &str = "onoff";
const MODE_NAME_BRIGHTNESS: &str = "brightness";
const MODE_NAME_WHITE: &str = "white";
const MODE_NAME_COLOR_TEMPERATURE: &str = "color_temp";
const MODE_NAME_COLD_WARM_WHITE: &str = "cwww";
const MODE_NAME_RGB: &str = "rgb";
const MODE_NAME_RGB_WHITE: &str = "rgbw";
const MODE_NAME_RGB_COLOR_TEMPERATURE: &str = "rgbct";
const MODE_NAME_RGB_COLD_WARM_WHITE: &str = "rgbww";

impl ColorMode {
    /// Raw capability bits of this mode
    pub const fn bits(self) -> u8 {
        self as u8
    }

    /// Check if this mode includes the capability
    pub const fn has(self, capability: ColorCapability) -> bool {
        self as u8 & capability as u8 != 0
    }

    /// Check if this mode includes any of the two capabilities
    pub const fn has_any(self, a: ColorCapability, b: ColorCapability) -> bool {
        self.has(a) || self.has(b)
    }

    pub fn from_raw(value: u8) -> Option<Self> {
        COLOR_MODE_LOOKUP
            .iter()
            .copied()
            .find(|mode| mode.bits() == value)
    }

    /// Name used by the JSON state schema. `None` for [`ColorMode::Unknown`].
    pub const fn as_str(self) -> Option<&'static str> {
        Some(match self {
            Self::Unknown => return None,
            Self::OnOff => MODE_NAME_ON_OFF,
            Self::Brightness => MODE_NAME_BRIGHTNESS,
            Self::White => MODE_NAME_WHITE,
            Self::ColorTemperature => MODE_NAME_COLOR_TEMPERATURE,
            Self::ColdWarmWhite => MODE_NAME_COLD_WARM_WHITE,
            Self::Rgb => MODE_NAME_RGB,
            Self::RgbWhite => MODE_NAME_RGB_WHITE,
            Self::RgbColorTemperature => MODE_NAME_RGB_COLOR_TEMPERATURE,
            Self::RgbColdWarmWhite => MODE_NAME_RGB_COLD_WARM_WHITE,
        })
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            MODE_NAME_ON_OFF => Some(Self::OnOff),
            MODE_NAME_BRIGHTNESS => Some(Self::Brightness),
            MODE_NAME_WHITE => Some(Self::White),
            MODE_NAME_COLOR_TEMPERATURE => Some(Self::ColorTemperature),
            MODE_NAME_COLD_WARM_WHITE => Some(Self::ColdWarmWhite),
            MODE_NAME_RGB => Some(Self::Rgb),
            MODE_NAME_RGB_WHITE => Some(Self::RgbWhite),
            MODE_NAME_RGB_COLOR_TEMPERATURE => Some(Self::RgbColorTemperature),
            MODE_NAME_RGB_COLD_WARM_WHITE => Some(Self::RgbColdWarmWhite),
            _ => None,
        }
    }

    /// Position of the mode in the lookup table
    const fn index(self) -> u32 {
        let mut i = 0;
        while i < COLOR_MODE_LOOKUP.len() {
            if COLOR_MODE_LOOKUP[i] as u8 == self as u8 {
                #[allow(clippy::cast_possible_truncation)]
                return i as u32;
            }
            i += 1;
        }
        0
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Unknown => "Unknown",
            Self::OnOff => "On/Off",
            Self::Brightness => "Brightness",
            Self::White => "White",
            Self::ColorTemperature => "Color temperature",
            Self::ColdWarmWhite => "Cold/warm white",
            Self::Rgb => "RGB",
            Self::RgbWhite => "RGBW",
            Self::RgbColorTemperature => "RGB + color temperature",
            Self::RgbColdWarmWhite => "RGB + cold/warm white",
        })
    }
}

/// Set of color modes.
///
/// Iteration and [`ColorModeMask::first`] follow the lookup table order, not
/// insertion order.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ColorModeMask(u16);

impl ColorModeMask {
    pub const EMPTY: Self = Self(0);

    /// Build a mask from a list of modes
    pub const fn from_modes<const N: usize>(modes: [ColorMode; N]) -> Self {
        let mut mask = Self::EMPTY;
        let mut i = 0;
        while i < N {
            mask = mask.with(modes[i]);
            i += 1;
        }
        mask
    }

    /// Raw bitmask
    pub const fn bits(self) -> u16 {
        self.0
    }

    #[must_use]
    pub const fn with(self, mode: ColorMode) -> Self {
        Self(self.0 | (1 << mode.index()))
    }

    pub fn insert(&mut self, mode: ColorMode) {
        *self = self.with(mode);
    }

    pub const fn contains(self, mode: ColorMode) -> bool {
        self.0 & (1 << mode.index()) != 0
    }

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[must_use]
    pub const fn intersection(self, other: Self) -> Self {
        Self(self.0 & other.0)
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    pub const fn len(self) -> usize {
        self.0.count_ones() as usize
    }

    /// First mode of the set in lookup table order
    pub fn first(self) -> Option<ColorMode> {
        self.iter().next()
    }

    pub fn iter(self) -> impl Iterator<Item = ColorMode> {
        COLOR_MODE_LOOKUP
            .into_iter()
            .filter(move |mode| self.contains(*mode))
    }

    /// Check if any mode of the set has the capability
    pub fn has_capability(self, capability: ColorCapability) -> bool {
        self.iter().any(|mode| mode.has(capability))
    }
}
