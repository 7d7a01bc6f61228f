//! Per-light configuration.

use embassy_time::Duration;

use crate::{gamma::DEFAULT_GAMMA, persistence::RestoreMode, transition::TransitionKind};

/// Default transition length for calls without one
pub const DEFAULT_TRANSITION_LENGTH: Duration = Duration::from_secs(1);

/// FNV-1 hash of a light's object id, used as its persistence key
#[allow(clippy::cast_lossless)]
pub const fn fnv1_hash(s: &str) -> u32 {
    let bytes = s.as_bytes();
    let mut hash: u32 = 2_166_136_261;
    let mut i = 0;
    while i < bytes.len() {
        hash = hash.wrapping_mul(16_777_619);
        hash ^= bytes[i] as u32;
        i += 1;
    }
    hash
}

/// Configuration of a single light.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LightConfig {
    /// Name used in log messages and effect lookups
    pub name: &'static str,
    /// Persistence key
    pub object_id_hash: u32,
    /// Transition length used when a call sets none
    pub default_transition: Duration,
    /// Fade length into and out of a flash
    pub flash_transition: Duration,
    pub gamma: f32,
    pub restore_mode: RestoreMode,
    pub transition_kind: TransitionKind,
}

impl LightConfig {
    /// Create a config with defaults, keyed by the hash of `name`
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            object_id_hash: fnv1_hash(name),
            default_transition: DEFAULT_TRANSITION_LENGTH,
            flash_transition: Duration::from_ticks(0),
            gamma: DEFAULT_GAMMA,
            restore_mode: RestoreMode::AlwaysOff,
            transition_kind: TransitionKind::Perceptual,
        }
    }

    #[must_use]
    pub const fn with_restore_mode(mut self, restore_mode: RestoreMode) -> Self {
        self.restore_mode = restore_mode;
        self
    }

    #[must_use]
    pub const fn with_transition_kind(mut self, kind: TransitionKind) -> Self {
        self.transition_kind = kind;
        self
    }

    #[must_use]
    pub const fn with_default_transition(mut self, length: Duration) -> Self {
        self.default_transition = length;
        self
    }

    #[must_use]
    pub const fn with_flash_transition(mut self, length: Duration) -> Self {
        self.flash_transition = length;
        self
    }

    #[must_use]
    pub const fn with_gamma(mut self, gamma: f32) -> Self {
        self.gamma = gamma;
        self
    }

    /// Override the persistence key
    #[must_use]
    pub const fn with_object_id_hash(mut self, hash: u32) -> Self {
        self.object_id_hash = hash;
        self
    }
}
