//! Strobe effect
//!
//! Steps through a list of colors, holding each one for its own duration.

use embassy_time::{Duration, Instant};
use heapless::Vec;

use super::{Effect, EffectContext};
use crate::{call::LightCall, color::ColorValue};

/// Maximum number of colors in a strobe sequence
pub const MAX_STROBE_STEPS: usize = 8;

const DEFAULT_NAME: &str = "Strobe";

/// One color of a strobe sequence
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrobeStep {
    pub color: ColorValue,
    /// How long the color is held
    pub duration: Duration,
    /// Fade length into the color
    pub transition: Duration,
}

#[derive(Debug, Clone)]
pub struct StrobeEffect {
    name: &'static str,
    steps: Vec<StrobeStep, MAX_STROBE_STEPS>,
    position: usize,
    last_switch: Option<Instant>,
}

impl StrobeEffect {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            steps: Vec::new(),
            position: 0,
            last_switch: None,
        }
    }

    /// Default sequence: full white and off, 250 ms each
    pub fn with_default_steps(name: &'static str) -> Self {
        let mut on = ColorValue::default();
        on.set_state(true);
        let off = ColorValue::default();
        let hold = Duration::from_millis(250);
        let mut effect = Self::new(name);
        for color in [on, off] {
            let _ = effect.push_step(StrobeStep {
                color,
                duration: hold,
                transition: Duration::from_ticks(0),
            });
        }
        effect
    }

    /// Append a color. Returns the step back when the sequence is full.
    pub fn push_step(&mut self, step: StrobeStep) -> Result<(), StrobeStep> {
        self.steps.push(step)
    }

    pub fn name(&self) -> &str {
        self.name
    }
}

impl Default for StrobeEffect {
    fn default() -> Self {
        Self::with_default_steps(DEFAULT_NAME)
    }
}

impl Effect for StrobeEffect {
    fn start(&mut self, _now: Instant) {
        self.position = 0;
        self.last_switch = None;
    }

    fn apply(&mut self, now: Instant, context: &EffectContext) -> Option<LightCall> {
        if self.steps.is_empty() {
            return None;
        }
        if let Some(last) = self.last_switch {
            let hold = self.steps.get(self.position).map_or(Duration::from_ticks(0), |s| s.duration);
            if now.saturating_duration_since(last) < hold {
                return None;
            }
            self.position = (self.position + 1) % self.steps.len();
        }
        self.last_switch = Some(now);

        let step = self.steps.get(self.position)?;
        let mut call = context.turn_on();
        call.from_color_value(&step.color);
        if !step.color.is_on() {
            // Turning the light off would stop the effect
            call.set_brightness_if_supported(0.0).set_state(true);
        }
        call.set_transition_length_if_supported(step.transition)
            .set_publish(false)
            .set_save(false);
        Some(call)
    }
}
