//! Light effects.
//!
//! Effects do not write outputs. Each update they may return a
//! [`LightCall`] that the owning light performs without publishing or
//! saving. All effects are stored in [`EffectSlot`] to avoid heap
//! allocations.

mod pulse;
mod strobe;

use embassy_time::Instant;
pub use pulse::PulseEffect;
pub use strobe::{MAX_STROBE_STEPS, StrobeEffect, StrobeStep};

use crate::{call::LightCall, color::ColorValue};

/// Maximum number of effects a light can hold
pub const MAX_EFFECTS: usize = 8;

/// What an effect sees of its light during an update.
#[derive(Clone, Debug)]
pub struct EffectContext {
    remote: ColorValue,
    transformer_active: bool,
    blank_call: LightCall,
}

impl EffectContext {
    pub(crate) fn new(remote: ColorValue, transformer_active: bool, blank_call: LightCall) -> Self {
        Self {
            remote,
            transformer_active,
            blank_call,
        }
    }

    /// Last published target of the light
    pub fn remote_values(&self) -> &ColorValue {
        &self.remote
    }

    /// Check if a transition or flash is running
    pub fn is_transformer_active(&self) -> bool {
        self.transformer_active
    }

    /// Empty call for the light
    pub fn make_call(&self) -> LightCall {
        self.blank_call.clone()
    }

    /// Call that turns the light on
    pub fn turn_on(&self) -> LightCall {
        let mut call = self.make_call();
        call.set_state(true);
        call
    }
}

pub trait Effect {
    /// Called when the effect becomes active
    fn start(&mut self, _now: Instant) {}

    /// Produce the next change, if any is due
    fn apply(&mut self, now: Instant, context: &EffectContext) -> Option<LightCall>;

    /// Called when the effect is replaced or cleared
    fn stop(&mut self) {}
}

/// Effect slot - enum containing all possible effects
#[derive(Debug, Clone)]
pub enum EffectSlot {
    /// Alternates between two brightness levels
    Pulse(PulseEffect),
    /// Cycles through a list of colors
    Strobe(StrobeEffect),
}

impl EffectSlot {
    /// User visible name of the effect
    pub fn name(&self) -> &str {
        match self {
            Self::Pulse(effect) => effect.name(),
            Self::Strobe(effect) => effect.name(),
        }
    }

    pub fn start(&mut self, now: Instant) {
        match self {
            Self::Pulse(effect) => effect.start(now),
            Self::Strobe(effect) => effect.start(now),
        }
    }

    pub fn apply(&mut self, now: Instant, context: &EffectContext) -> Option<LightCall> {
        match self {
            Self::Pulse(effect) => effect.apply(now, context),
            Self::Strobe(effect) => effect.apply(now, context),
        }
    }

    pub fn stop(&mut self) {
        match self {
            Self::Pulse(effect) => effect.stop(),
            Self::Strobe(effect) => effect.stop(),
        }
    }
}
