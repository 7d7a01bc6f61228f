#![no_std]

pub mod blender;
pub mod call;
pub mod color;
pub mod color_mode;
pub mod config;
pub mod ddp;
pub mod effect;
pub mod fixture;
pub mod frame_scheduler;
pub mod gamma;
#[cfg(feature = "esp32-log")]
pub mod logging;
pub mod math8;
pub mod output;
pub mod persistence;
pub mod request;
pub mod state;
pub mod traits;
pub mod transition;

pub use blender::{AuxLevels, Blender, BlenderConfig, ChannelLevels, ChannelSteps};
pub use call::{CallTarget, LightCall, ValidatedCall};
pub use color::{ColorValue, Rgb};
pub use color_mode::{ColorCapability, ColorMode, ColorModeMask};
pub use config::LightConfig;
pub use effect::{EffectSlot, PulseEffect, StrobeEffect, StrobeStep};
pub use fixture::{Fixture, FixtureConfig, LightId};
pub use frame_scheduler::FrameScheduler;
pub use output::{ChannelOutput, PwmChannels, RgbwwOutput};
pub use persistence::{PersistenceStore, RestoreMode, RestoreRecord};
pub use request::RequestQueue;
pub use state::LightState;
pub use traits::LightTraits;
pub use transition::TransitionKind;

pub use embassy_time::{Duration, Instant};
