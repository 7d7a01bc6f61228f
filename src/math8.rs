//! 8-bit fixed point helpers for per-pixel fades.

/// Scale a value by `scale / 256`
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub fn scale8(value: u8, scale: u8) -> u8 {
    ((u16::from(value) * (u16::from(scale) + 1)) >> 8) as u8
}

/// Convert a `[0, 1]` float into `[0, 255]`, rounding to nearest
#[inline]
pub fn to_u8(value: f32) -> u8 {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let level = (value.clamp(0.0, 1.0) * 255.0 + 0.5) as u8;
    level
}

/// Move `current` towards `target` keeping `scale / 256` of the remaining
/// difference.
#[inline]
pub fn subtract_scaled_difference(target: u8, current: u8, scale: i32) -> u8 {
    let diff = i32::from(target) - i32::from(current);
    let level = i32::from(target) - (diff * scale) / 256;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let level = level.clamp(0, 255) as u8;
    level
}
