//! A physical bulb: one main light, up to two aux lights and the outputs.

use embassy_time::Instant;
use log::warn;

use crate::{
    blender::{AuxLevels, Blender, BlenderConfig, ChannelLevels},
    call::LightCall,
    color_mode::{ColorMode, ColorModeMask},
    config::LightConfig,
    ddp::{self, FrameError},
    effect::EffectSlot,
    output::RgbwwOutput,
    persistence::PersistenceStore,
    request::RequestQueue,
    state::LightState,
    traits::LightTraits,
    transition::TransitionKind,
};

/// Logical lights of a fixture
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LightId {
    /// RGB + color temperature light driving the outputs
    Main,
    /// Warm white slider
    Warm,
    /// Cold white slider
    Cold,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FixtureConfig {
    pub main: LightConfig,
    pub warm: Option<LightConfig>,
    pub cold: Option<LightConfig>,
    pub blender: BlenderConfig,
}

impl FixtureConfig {
    /// Main light only, default blender
    pub fn new(main: LightConfig) -> Self {
        Self {
            main,
            warm: None,
            cold: None,
            blender: BlenderConfig::default(),
        }
    }

    /// Add warm and cold aux lights with linear transitions
    #[must_use]
    pub fn with_aux_lights(mut self, warm_name: &'static str, cold_name: &'static str) -> Self {
        self.warm = Some(LightConfig::new(warm_name).with_transition_kind(TransitionKind::Linear));
        self.cold = Some(LightConfig::new(cold_name).with_transition_kind(TransitionKind::Linear));
        self
    }

    #[must_use]
    pub fn with_blender(mut self, blender: BlenderConfig) -> Self {
        self.blender = blender;
        self
    }
}

pub struct Fixture<O: RgbwwOutput> {
    main: LightState,
    warm: Option<LightState>,
    cold: Option<LightState>,
    blender: Blender,
    output: O,
}

impl<O: RgbwwOutput> Fixture<O> {
    pub fn new(config: FixtureConfig, output: O) -> Self {
        let main_traits = LightTraits::new(ColorModeMask::from_modes([
            ColorMode::Rgb,
            ColorMode::ColorTemperature,
        ]))
        .with_mireds(config.blender.min_mireds, config.blender.max_mireds);
        let aux_traits = LightTraits::new(ColorModeMask::from_modes([ColorMode::RgbWhite]));

        Self {
            main: LightState::new(config.main, main_traits),
            warm: config.warm.map(|c| LightState::new(c, aux_traits)),
            cold: config.cold.map(|c| LightState::new(c, aux_traits)),
            blender: Blender::new(config.blender),
            output,
        }
    }

    /// Restore every light from the store. Aux lights go first.
    pub fn setup(&mut self, store: &impl PersistenceStore, now: Instant) {
        for aux in [self.warm.as_mut(), self.cold.as_mut()].into_iter().flatten() {
            aux.setup(store, now);
        }
        self.main.setup(store, now);
    }

    pub fn light(&self, id: LightId) -> Option<&LightState> {
        match id {
            LightId::Main => Some(&self.main),
            LightId::Warm => self.warm.as_ref(),
            LightId::Cold => self.cold.as_ref(),
        }
    }

    pub fn light_mut(&mut self, id: LightId) -> Option<&mut LightState> {
        match id {
            LightId::Main => Some(&mut self.main),
            LightId::Warm => self.warm.as_mut(),
            LightId::Cold => self.cold.as_mut(),
        }
    }

    pub fn main(&self) -> &LightState {
        &self.main
    }

    /// Empty call for a light, `None` if the fixture has no such light
    pub fn call(&self, id: LightId) -> Option<LightCall> {
        self.light(id).map(LightState::make_call)
    }

    /// Perform a call on a light. Returns `false` if there is no such light.
    pub fn perform(&mut self, id: LightId, call: LightCall, now: Instant) -> bool {
        match self.light_mut(id) {
            Some(light) => {
                light.perform(call, now);
                true
            }
            None => {
                warn!("call for missing light {:?} dropped", id);
                false
            }
        }
    }

    pub fn add_effect(&mut self, id: LightId, effect: EffectSlot) -> Result<u32, EffectSlot> {
        match self.light_mut(id) {
            Some(light) => light.add_effect(effect),
            None => Err(effect),
        }
    }

    /// Perform every queued request
    pub fn process_requests<const SIZE: usize>(&mut self, queue: &RequestQueue<SIZE>, now: Instant) {
        while let Ok(request) = queue.try_receive() {
            self.perform(request.light, request.call, now);
        }
    }

    /// Show a raw DDP frame on the main light
    pub fn apply_ddp_frame(&mut self, payload: &[u8]) -> Result<(), FrameError> {
        let values = ddp::parse_frame(payload, self.main.remote_values())?;
        self.main.apply_raw_frame(values);
        Ok(())
    }

    /// Advance every light and write the outputs if anything changed.
    ///
    /// Returns `true` when the outputs were written.
    pub fn tick(&mut self, now: Instant) -> bool {
        for aux in [self.warm.as_mut(), self.cold.as_mut()].into_iter().flatten() {
            if aux.update(now) {
                aux.mark_changed();
            }
        }

        let mut write = self.main.update(now);
        let warm_changed = self.warm.as_mut().is_some_and(LightState::take_changed);
        let cold_changed = self.cold.as_mut().is_some_and(LightState::take_changed);
        if warm_changed || cold_changed {
            write = true;
        }

        if write {
            let levels = self.blend();
            self.output.write(&levels);
        }
        write
    }

    /// Channel levels for the current values of all lights
    pub fn blend(&mut self) -> ChannelLevels {
        let aux_levels = |aux: Option<&LightState>| {
            aux.and_then(|light| AuxLevels::from_values(light.current_values(), light.gamma()))
        };
        let warm = aux_levels(self.warm.as_ref());
        let cold = aux_levels(self.cold.as_ref());
        self.blender
            .blend(self.main.current_values(), self.main.gamma(), warm, cold)
    }

    /// Write pending restore records of every light
    pub fn flush_saves(&mut self, store: &mut impl PersistenceStore) {
        let lights = [Some(&mut self.main), self.warm.as_mut(), self.cold.as_mut()];
        for light in lights.into_iter().flatten() {
            let Some(record) = light.take_pending_save() else {
                continue;
            };
            let key = light.config().object_id_hash;
            if let Err(e) = store.save(key, &record.encode()) {
                warn!("'{}': cannot save state: {}", light.name(), e);
            }
        }
    }

    pub fn blender(&self) -> &Blender {
        &self.blender
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut O {
        &mut self.output
    }
}
