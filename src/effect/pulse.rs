//! Pulse effect
//!
//! Fades the brightness between a high and a low level.

use embassy_time::{Duration, Instant};

use super::{Effect, EffectContext};
use crate::call::LightCall;

const DEFAULT_NAME: &str = "Pulse";
const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Debug, Clone)]
pub struct PulseEffect {
    name: &'static str,
    transition_on: Duration,
    transition_off: Duration,
    update_interval: Duration,
    min_brightness: f32,
    max_brightness: f32,
    rising: bool,
    last_change: Option<Instant>,
}

impl Default for PulseEffect {
    fn default() -> Self {
        Self::new(DEFAULT_NAME)
    }
}

impl PulseEffect {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            transition_on: DEFAULT_INTERVAL,
            transition_off: DEFAULT_INTERVAL,
            update_interval: DEFAULT_INTERVAL,
            min_brightness: 0.0,
            max_brightness: 1.0,
            rising: true,
            last_change: None,
        }
    }

    /// Set fade lengths towards the high and the low level
    #[must_use]
    pub fn with_transitions(mut self, on: Duration, off: Duration) -> Self {
        self.transition_on = on;
        self.transition_off = off;
        self
    }

    /// Set how often the direction flips
    #[must_use]
    pub fn with_update_interval(mut self, interval: Duration) -> Self {
        self.update_interval = interval;
        self
    }

    #[must_use]
    pub fn with_brightness_range(mut self, min: f32, max: f32) -> Self {
        self.min_brightness = min.clamp(0.0, 1.0);
        self.max_brightness = max.clamp(0.0, 1.0);
        self
    }

    pub fn name(&self) -> &str {
        self.name
    }
}

impl Effect for PulseEffect {
    fn start(&mut self, _now: Instant) {
        self.rising = true;
        self.last_change = None;
    }

    fn apply(&mut self, now: Instant, context: &EffectContext) -> Option<LightCall> {
        if let Some(last) = self.last_change {
            if now.saturating_duration_since(last) < self.update_interval {
                return None;
            }
        }

        let (level, length) = if self.rising {
            (self.max_brightness, self.transition_on)
        } else {
            (self.min_brightness, self.transition_off)
        };
        self.rising = !self.rising;
        self.last_change = Some(now);

        let mut call = context.turn_on();
        call.set_brightness_if_supported(level)
            .set_transition_length_if_supported(length)
            .set_publish(false)
            .set_save(false);
        Some(call)
    }
}
