//! Logical light: published target, live values, transformer and effects.

use embassy_time::{Duration, Instant};
use heapless::Vec;
use log::{debug, error, info, warn};

use crate::{
    call::{CallTarget, LightCall, ValidatedCall},
    color::ColorValue,
    color_mode::{ColorCapability, ColorMode},
    config::LightConfig,
    effect::{EffectContext, EffectSlot, MAX_EFFECTS},
    persistence::{PersistenceStore, RestoreMode, RestoreRecord},
    traits::LightTraits,
    transition::{FlashTransformer, LightTransformer, TransformerSlot},
};

/// Tolerance of the duplicate call check
const SAME_TARGET_TOLERANCE: f32 = 1e-4;

const EFFECT_NAME_NONE: &str = "None";

/// A logical light.
///
/// `remote_values` is the target last reported to the frontend and changes
/// as soon as a call is performed. `current_values` is what the outputs
/// show right now and follows the remote values through transitions.
pub struct LightState {
    config: LightConfig,
    traits: LightTraits,
    current_values: ColorValue,
    remote_values: ColorValue,
    transformer: Option<TransformerSlot>,
    effects: Vec<EffectSlot, MAX_EFFECTS>,
    active_effect: u32,
    next_write: bool,
    changed: bool,
    publish_pending: bool,
    target_reached: bool,
    pending_save: Option<RestoreRecord>,
    raw_active: bool,
}

impl LightState {
    pub fn new(config: LightConfig, traits: LightTraits) -> Self {
        Self {
            config,
            traits,
            current_values: ColorValue::default(),
            remote_values: ColorValue::default(),
            transformer: None,
            effects: Vec::new(),
            active_effect: 0,
            next_write: false,
            changed: false,
            publish_pending: false,
            target_reached: false,
            pending_save: None,
            raw_active: false,
        }
    }

    /// Register an effect. Returns its 1-based index, or the effect back when
    /// the list is full.
    pub fn add_effect(&mut self, effect: EffectSlot) -> Result<u32, EffectSlot> {
        self.effects.push(effect)?;
        #[allow(clippy::cast_possible_truncation)]
        let index = self.effects.len() as u32;
        Ok(index)
    }

    /// Restore the saved state according to the restore mode and apply it.
    pub fn setup(&mut self, store: &impl PersistenceStore, now: Instant) {
        if self.traits.has_mireds_range() {
            let min = self.traits.min_mireds();
            self.remote_values.set_color_temperature(min);
            self.current_values.set_color_temperature(min);
        }

        let mode = self.config.restore_mode;
        let record = match mode {
            RestoreMode::RestoreDefaultOff
            | RestoreMode::RestoreDefaultOn
            | RestoreMode::RestoreInvertedDefaultOff
            | RestoreMode::RestoreInvertedDefaultOn => {
                let inverted = matches!(
                    mode,
                    RestoreMode::RestoreInvertedDefaultOff | RestoreMode::RestoreInvertedDefaultOn
                );
                match self.load_record(store) {
                    Some(mut record) => {
                        if inverted {
                            record.state = !record.state;
                        }
                        record
                    }
                    None => RestoreRecord {
                        state: matches!(
                            mode,
                            RestoreMode::RestoreDefaultOn | RestoreMode::RestoreInvertedDefaultOn
                        ),
                        ..RestoreRecord::default()
                    },
                }
            }
            RestoreMode::RestoreAndOff | RestoreMode::RestoreAndOn => {
                let mut record = self.load_record(store).unwrap_or_default();
                record.state = mode == RestoreMode::RestoreAndOn;
                record
            }
            RestoreMode::AlwaysOff | RestoreMode::AlwaysOn => RestoreRecord {
                state: mode == RestoreMode::AlwaysOn,
                ..RestoreRecord::default()
            },
        };
        debug!(
            "'{}': restoring {:?}: state {}, mode {}, effect {}",
            self.config.name, mode, record.state, record.color_mode, record.effect
        );

        let mut call = self.make_call();
        call.set_color_mode_if_supported(record.color_mode)
            .set_state(record.state)
            .set_brightness_if_supported(record.brightness)
            .set_color_brightness_if_supported(record.color_brightness)
            .set_red_if_supported(record.red)
            .set_green_if_supported(record.green)
            .set_blue_if_supported(record.blue)
            .set_white_if_supported(record.white)
            .set_color_temperature_if_supported(record.color_temperature)
            .set_cold_white_if_supported(record.cold_white)
            .set_warm_white_if_supported(record.warm_white);
        if record.effect == 0 {
            call.set_transition_length_if_supported(Duration::from_ticks(0));
        } else {
            call.set_effect(record.effect);
        }
        self.perform(call, now);
    }

    fn load_record(&self, store: &impl PersistenceStore) -> Option<RestoreRecord> {
        let key = self.config.object_id_hash;
        match store.load(key) {
            Ok(Some(data)) => match RestoreRecord::decode(&data) {
                Ok(record) => Some(record),
                Err(e) => {
                    error!("'{}': discarding saved state: {}", self.config.name, e);
                    None
                }
            },
            Ok(None) => None,
            Err(e) => {
                warn!("'{}': cannot load saved state: {}", self.config.name, e);
                None
            }
        }
    }

    /// Empty call for this light
    pub fn make_call(&self) -> LightCall {
        LightCall::new(self.traits, self.remote_values.color_mode())
    }

    pub fn turn_on(&self) -> LightCall {
        let mut call = self.make_call();
        call.set_state(true);
        call
    }

    pub fn turn_off(&self) -> LightCall {
        let mut call = self.make_call();
        call.set_state(false);
        call
    }

    pub fn toggle(&self) -> LightCall {
        let mut call = self.make_call();
        call.set_state(!self.remote_values.is_on());
        call
    }

    fn call_target(&self) -> CallTarget<'_> {
        CallTarget {
            name: self.config.name,
            traits: self.traits,
            remote: &self.remote_values,
            active_effect: self.active_effect,
            effects: &self.effects,
            default_transition: self.config.default_transition,
            gamma: self.config.gamma,
        }
    }

    /// Validate a call against this light without performing it
    pub fn validate(&self, call: LightCall) -> ValidatedCall {
        call.validate(&self.call_target())
    }

    /// Validate and execute a call
    pub fn perform(&mut self, call: LightCall, now: Instant) {
        let validated = self.validate(call);
        self.perform_validated(&validated, now);
    }

    fn perform_validated(&mut self, call: &ValidatedCall, now: Instant) {
        let values = *call.values();

        if call.flash().is_none() && call.effect().is_none() && self.is_duplicate(&values) {
            debug!("'{}': target already in progress, dropping call", self.config.name);
            return;
        }

        if call.should_publish() {
            debug!(
                "'{}': setting state {}, mode {}, brightness {}",
                self.config.name,
                values.is_on(),
                values.color_mode(),
                values.brightness()
            );
        }

        if let Some(length) = call.flash() {
            self.start_flash(values, length, call.should_publish(), now);
        } else if let Some(length) = call.transition() {
            if call.effect().is_some() {
                self.stop_effect();
            }
            self.start_transition(values, length, call.should_publish(), now);
        } else if let Some(effect) = call.effect() {
            self.start_effect(effect, now);
            self.set_immediately(values, true);
        } else {
            self.set_immediately(values, call.should_publish());
        }

        if call.transition().is_none() {
            self.target_reached = true;
        }
        if call.should_publish() {
            self.publish_pending = true;
        }
        if call.should_save() {
            self.save_remote_values();
        }
    }

    /// Check if a running transition already heads to these values
    fn is_duplicate(&self, values: &ColorValue) -> bool {
        let Some(TransformerSlot::Transition(transition)) = &self.transformer else {
            return false;
        };
        let target = transition.target_values();
        if target.color_mode() != values.color_mode() || target.is_on() != values.is_on() {
            return false;
        }

        let gamma = self.config.gamma;
        let close = |a: f32, b: f32| (a - b).abs() <= SAME_TARGET_TOLERANCE;
        if values.color_mode().has(ColorCapability::ColorTemperature) {
            let (min, max) = self.traits.mireds_or_default();
            match (target.as_ct(min, max, gamma), values.as_ct(min, max, gamma)) {
                (Some((ct_a, wb_a)), Some((ct_b, wb_b))) => close(ct_a, ct_b) && close(wb_a, wb_b),
                _ => false,
            }
        } else {
            let (r_a, g_a, b_a) = target.as_rgb(gamma);
            let (r_b, g_b, b_b) = values.as_rgb(gamma);
            close(r_a, r_b)
                && close(g_a, g_b)
                && close(b_a, b_b)
                && close(target.as_brightness(gamma), values.as_brightness(gamma))
        }
    }

    fn start_transition(&mut self, target: ColorValue, length: Duration, publish: bool, now: Instant) {
        let transition = self.config.transition_kind.create(
            self.current_values,
            target,
            length,
            now,
            self.traits.mireds_or_default(),
        );
        self.transformer = Some(TransformerSlot::Transition(transition));
        if publish {
            self.remote_values = target;
        }
    }

    fn start_flash(&mut self, target: ColorValue, length: Duration, publish: bool, now: Instant) {
        let restore = match &self.transformer {
            Some(transformer) => *transformer.start_values(),
            None => self.remote_values,
        };
        let flash = FlashTransformer::new(
            restore,
            target,
            length,
            now,
            self.config.flash_transition,
            self.config.transition_kind,
            self.current_values,
            self.traits.mireds_or_default(),
        );
        self.transformer = Some(TransformerSlot::Flash(flash));
        if publish {
            self.remote_values = target;
        }
    }

    fn set_immediately(&mut self, target: ColorValue, publish: bool) {
        self.transformer = None;
        self.current_values = target;
        if publish {
            self.remote_values = target;
        }
        self.next_write = true;
    }

    fn start_effect(&mut self, index: u32, now: Instant) {
        self.stop_effect();
        if index == 0 {
            return;
        }
        let Some(effect) = self.effects.get_mut(index as usize - 1) else {
            return;
        };
        info!("'{}': starting effect '{}'", self.config.name, effect.name());
        effect.start(now);
        self.active_effect = index;
    }

    fn stop_effect(&mut self) {
        if self.active_effect == 0 {
            return;
        }
        if let Some(effect) = self.effects.get_mut(self.active_effect as usize - 1) {
            info!("'{}': stopping effect '{}'", self.config.name, effect.name());
            effect.stop();
        }
        self.active_effect = 0;
    }

    fn save_remote_values(&mut self) {
        if !self.config.restore_mode.saves_state() {
            return;
        }
        self.pending_save = Some(RestoreRecord::from_values(
            &self.remote_values,
            self.active_effect,
        ));
    }

    /// Advance effects and transformers.
    ///
    /// Returns `true` when the outputs need to be written.
    pub fn update(&mut self, now: Instant) -> bool {
        if self.active_effect != 0 {
            let context = EffectContext::new(
                self.remote_values,
                self.transformer.is_some(),
                self.make_call(),
            );
            let index = self.active_effect as usize - 1;
            let call = self
                .effects
                .get_mut(index)
                .and_then(|effect| effect.apply(now, &context));
            if let Some(mut call) = call {
                call.set_publish(false).set_save(false);
                self.perform(call, now);
            }
        }

        if let Some(transformer) = self.transformer.as_mut() {
            if let Some(values) = transformer.apply(now, &self.current_values) {
                self.current_values = values;
                self.next_write = true;
            }

            if transformer.is_finished(now) {
                self.current_values = *transformer.target_values();
                if let Some(restored) = transformer.stop() {
                    self.current_values = restored;
                    self.remote_values = restored;
                    self.publish_pending = true;
                }
                self.transformer = None;
                self.target_reached = true;
                self.next_write = true;
            }
        }

        core::mem::take(&mut self.next_write)
    }

    /// Show a raw frame produced outside the light, e.g. by a network stream.
    ///
    /// Stops any transformer. The published values stay untouched.
    pub fn apply_raw_frame(&mut self, mut values: ColorValue) {
        values.set_raw(true);
        self.transformer = None;
        self.current_values = values;
        self.raw_active = true;
        self.next_write = true;
    }

    /// Return to the published values after raw frames
    pub fn release_raw(&mut self) {
        if !self.raw_active {
            return;
        }
        self.raw_active = false;
        self.current_values = self.remote_values;
        self.next_write = true;
    }

    pub fn is_raw_active(&self) -> bool {
        self.raw_active
    }

    /// Record an output write of an aux light
    pub(crate) fn mark_changed(&mut self) {
        self.changed = true;
        self.current_values.set_brightness(1.0);
    }

    pub(crate) fn take_changed(&mut self) -> bool {
        core::mem::take(&mut self.changed)
    }

    pub fn has_changed(&self) -> bool {
        self.changed
    }

    /// Take the "published values changed" event
    pub fn take_publish_request(&mut self) -> bool {
        core::mem::take(&mut self.publish_pending)
    }

    /// Take the "target state reached" event
    pub fn take_target_reached(&mut self) -> bool {
        core::mem::take(&mut self.target_reached)
    }

    /// Take the record waiting to be written to the store
    pub fn take_pending_save(&mut self) -> Option<RestoreRecord> {
        self.pending_save.take()
    }

    pub fn name(&self) -> &'static str {
        self.config.name
    }

    pub fn config(&self) -> &LightConfig {
        &self.config
    }

    pub fn traits(&self) -> &LightTraits {
        &self.traits
    }

    pub fn gamma(&self) -> f32 {
        self.config.gamma
    }

    pub fn current_values(&self) -> &ColorValue {
        &self.current_values
    }

    pub fn remote_values(&self) -> &ColorValue {
        &self.remote_values
    }

    pub fn color_mode(&self) -> ColorMode {
        self.remote_values.color_mode()
    }

    pub fn is_transformer_active(&self) -> bool {
        self.transformer.is_some()
    }

    /// Check if a flash is running
    pub fn is_flashing(&self) -> bool {
        self.transformer.as_ref().is_some_and(TransformerSlot::is_flash)
    }

    pub fn effects(&self) -> &[EffectSlot] {
        &self.effects
    }

    pub fn active_effect_index(&self) -> u32 {
        self.active_effect
    }

    /// Name of the active effect, `"None"` when no effect runs
    pub fn effect_name(&self) -> &str {
        if self.active_effect == 0 {
            return EFFECT_NAME_NONE;
        }
        self.effects
            .get(self.active_effect as usize - 1)
            .map_or(EFFECT_NAME_NONE, EffectSlot::name)
    }
}
