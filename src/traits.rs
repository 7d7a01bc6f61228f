//! Static description of what a light supports.

use crate::color_mode::{ColorCapability, ColorMode, ColorModeMask};

/// Default coldest color temperature, in mireds
pub const DEFAULT_MIN_MIREDS: f32 = 150.0;
/// Default warmest color temperature, in mireds
pub const DEFAULT_MAX_MIREDS: f32 = 350.0;

/// Capabilities of a light: supported color modes and temperature range.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LightTraits {
    supported_color_modes: ColorModeMask,
    min_mireds: f32,
    max_mireds: f32,
}

impl LightTraits {
    pub const fn new(supported_color_modes: ColorModeMask) -> Self {
        Self {
            supported_color_modes,
            min_mireds: 0.0,
            max_mireds: 0.0,
        }
    }

    /// Set the color temperature range, in mireds
    #[must_use]
    pub const fn with_mireds(mut self, min_mireds: f32, max_mireds: f32) -> Self {
        self.min_mireds = min_mireds;
        self.max_mireds = max_mireds;
        self
    }

    pub const fn supported_color_modes(&self) -> ColorModeMask {
        self.supported_color_modes
    }

    pub const fn supports_color_mode(&self, mode: ColorMode) -> bool {
        self.supported_color_modes.contains(mode)
    }

    /// Check if any supported mode has the capability
    pub fn supports_capability(&self, capability: ColorCapability) -> bool {
        self.supported_color_modes.has_capability(capability)
    }

    pub const fn min_mireds(&self) -> f32 {
        self.min_mireds
    }

    pub const fn max_mireds(&self) -> f32 {
        self.max_mireds
    }

    /// Check if a usable color temperature range is configured
    pub fn has_mireds_range(&self) -> bool {
        self.min_mireds > 0.0 && self.max_mireds > self.min_mireds
    }

    /// Temperature range, or the default range when none is configured
    pub fn mireds_or_default(&self) -> (f32, f32) {
        if self.has_mireds_range() {
            (self.min_mireds, self.max_mireds)
        } else {
            (DEFAULT_MIN_MIREDS, DEFAULT_MAX_MIREDS)
        }
    }
}
