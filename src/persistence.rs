//! Power-on restore of a light's state.
//!
//! The published values of a light are encoded into a fixed-size
//! little-endian [`RestoreRecord`] and kept in a [`PersistenceStore`] under
//! the light's object id hash.

use core::fmt;

use heapless::FnvIndexMap;

use crate::{color::ColorValue, color_mode::ColorMode};

const MAGIC_HEADER: u16 = 0xBEEF;
const RECORD_VERSION: u8 = 1;

/// Encoded size of a [`RestoreRecord`]
pub const RECORD_SIZE: usize = 48;

const FLOATS_OFFSET: usize = 8;
const FLOAT_COUNT: usize = 9;
const EFFECT_OFFSET: usize = FLOATS_OFFSET + FLOAT_COUNT * 4;

/// What a light does with its saved state on power up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum RestoreMode {
    /// Restore the saved state, off when nothing is saved
    RestoreDefaultOff,
    /// Restore the saved state, on when nothing is saved
    RestoreDefaultOn,
    /// Restore the inverted saved on/off state, off when nothing is saved
    RestoreInvertedDefaultOff,
    /// Restore the inverted saved on/off state, on when nothing is saved
    RestoreInvertedDefaultOn,
    /// Restore color and brightness, always start off
    RestoreAndOff,
    /// Restore color and brightness, always start on
    RestoreAndOn,
    /// Never restore, start off
    #[default]
    AlwaysOff,
    /// Never restore, start on
    AlwaysOn,
}

impl RestoreMode {
    /// Check if state changes are saved
    pub const fn saves_state(self) -> bool {
        !matches!(self, Self::AlwaysOff | Self::AlwaysOn)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordError {
    TooShort,
    BadMagic,
    UnsupportedVersion(u8),
    UnknownColorMode(u8),
}

impl fmt::Display for RecordError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort => write!(f, "record is shorter than {RECORD_SIZE} bytes"),
            Self::BadMagic => f.write_str("invalid magic header"),
            Self::UnsupportedVersion(v) => write!(f, "unsupported record version {v}"),
            Self::UnknownColorMode(m) => write!(f, "unknown color mode {m}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    Busy,
    Driver,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Busy => f.write_str("store is busy"),
            Self::Driver => f.write_str("storage driver error"),
        }
    }
}

/// Key-value storage for encoded records.
pub trait PersistenceStore {
    /// Load the record stored under `key`, `None` when nothing is stored
    fn load(&self, key: u32) -> Result<Option<[u8; RECORD_SIZE]>, StoreError>;

    fn save(&mut self, key: u32, record: &[u8; RECORD_SIZE]) -> Result<(), StoreError>;
}

/// Saved state of a light.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RestoreRecord {
    pub color_mode: ColorMode,
    pub state: bool,
    pub brightness: f32,
    pub color_brightness: f32,
    pub red: f32,
    pub green: f32,
    pub blue: f32,
    pub white: f32,
    pub color_temperature: f32,
    pub cold_white: f32,
    pub warm_white: f32,
    pub effect: u32,
}

impl Default for RestoreRecord {
    fn default() -> Self {
        Self {
            color_mode: ColorMode::Unknown,
            state: false,
            brightness: 1.0,
            color_brightness: 1.0,
            red: 1.0,
            green: 1.0,
            blue: 1.0,
            white: 1.0,
            color_temperature: 1.0,
            cold_white: 1.0,
            warm_white: 1.0,
            effect: 0,
        }
    }
}

impl RestoreRecord {
    /// Capture published values and the active effect
    pub fn from_values(values: &ColorValue, effect: u32) -> Self {
        Self {
            color_mode: values.color_mode(),
            state: values.is_on(),
            brightness: values.brightness(),
            color_brightness: values.color_brightness(),
            red: values.red(),
            green: values.green(),
            blue: values.blue(),
            white: values.white(),
            color_temperature: values.color_temperature(),
            cold_white: values.cold_white(),
            warm_white: values.warm_white(),
            effect,
        }
    }

    fn floats(&self) -> [f32; FLOAT_COUNT] {
        [
            self.brightness,
            self.color_brightness,
            self.red,
            self.green,
            self.blue,
            self.white,
            self.color_temperature,
            self.cold_white,
            self.warm_white,
        ]
    }

    pub fn encode(&self) -> [u8; RECORD_SIZE] {
        let mut data = [0u8; RECORD_SIZE];
        data[0..2].copy_from_slice(&MAGIC_HEADER.to_le_bytes());
        data[2] = RECORD_VERSION;
        data[3] = self.color_mode.bits();
        data[4] = u8::from(self.state);
        for (i, value) in self.floats().iter().enumerate() {
            let offset = FLOATS_OFFSET + i * 4;
            data[offset..offset + 4].copy_from_slice(&value.to_le_bytes());
        }
        data[EFFECT_OFFSET..EFFECT_OFFSET + 4].copy_from_slice(&self.effect.to_le_bytes());
        data
    }

    pub fn decode(data: &[u8]) -> Result<Self, RecordError> {
        if data.len() < RECORD_SIZE {
            return Err(RecordError::TooShort);
        }
        if u16::from_le_bytes([data[0], data[1]]) != MAGIC_HEADER {
            return Err(RecordError::BadMagic);
        }
        if data[2] != RECORD_VERSION {
            return Err(RecordError::UnsupportedVersion(data[2]));
        }
        let color_mode =
            ColorMode::from_raw(data[3]).ok_or(RecordError::UnknownColorMode(data[3]))?;

        let float = |i: usize| {
            let offset = FLOATS_OFFSET + i * 4;
            f32::from_le_bytes([data[offset], data[offset + 1], data[offset + 2], data[offset + 3]])
        };
        let effect = u32::from_le_bytes([
            data[EFFECT_OFFSET],
            data[EFFECT_OFFSET + 1],
            data[EFFECT_OFFSET + 2],
            data[EFFECT_OFFSET + 3],
        ]);

        Ok(Self {
            color_mode,
            state: data[4] != 0,
            brightness: float(0),
            color_brightness: float(1),
            red: float(2),
            green: float(3),
            blue: float(4),
            white: float(5),
            color_temperature: float(6),
            cold_white: float(7),
            warm_white: float(8),
            effect,
        })
    }
}

/// In-memory store, for hosts without flash and for tests.
///
/// `SIZE` must be a power of two.
#[derive(Debug, Default)]
pub struct MemoryStore<const SIZE: usize> {
    records: FnvIndexMap<u32, [u8; RECORD_SIZE], SIZE>,
}

impl<const SIZE: usize> MemoryStore<SIZE> {
    pub fn new() -> Self {
        Self {
            records: FnvIndexMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl<const SIZE: usize> PersistenceStore for MemoryStore<SIZE> {
    fn load(&self, key: u32) -> Result<Option<[u8; RECORD_SIZE]>, StoreError> {
        Ok(self.records.get(&key).copied())
    }

    fn save(&mut self, key: u32, record: &[u8; RECORD_SIZE]) -> Result<(), StoreError> {
        self.records
            .insert(key, *record)
            .map(|_| ())
            .map_err(|_| StoreError::Driver)
    }
}
