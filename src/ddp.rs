//! Raw color frames from the DDP protocol.
//!
//! Only the first pixel of a frame is shown; the header is 10 bytes and the
//! pixel follows as three RGB bytes.

use core::fmt;

use crate::{color::ColorValue, color_mode::ColorMode};

const HEADER_SIZE: usize = 10;
const MIN_FRAME_SIZE: usize = HEADER_SIZE + 3;
const OFFSET_RANGE: core::ops::Range<usize> = 4..8;

/// Color temperature stamped on raw frames, in mireds
const FRAME_COLOR_TEMPERATURE: f32 = 250.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameError {
    /// Frame shorter than header plus one pixel, carries the actual size
    TooShort(usize),
    /// Data offset of the frame is not zero
    NonZeroOffset,
}

impl fmt::Display for FrameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooShort(size) => write!(f, "frame of {size} bytes is too short"),
            Self::NonZeroOffset => f.write_str("frame data offset is not zero"),
        }
    }
}

/// Decode the first pixel of a frame into a raw value.
///
/// While the light is on the pixel is rescaled so that its strongest channel
/// matches the published brightness.
pub fn parse_frame(payload: &[u8], remote: &ColorValue) -> Result<ColorValue, FrameError> {
    if payload.len() < MIN_FRAME_SIZE {
        return Err(FrameError::TooShort(payload.len()));
    }
    if payload[OFFSET_RANGE].iter().any(|b| *b != 0) {
        return Err(FrameError::NonZeroOffset);
    }

    let pixel = &payload[HEADER_SIZE..MIN_FRAME_SIZE];
    let mut red = f32::from(pixel[0]) / 255.0;
    let mut green = f32::from(pixel[1]) / 255.0;
    let mut blue = f32::from(pixel[2]) / 255.0;

    let max = red.max(green).max(blue);
    if remote.is_on() && max > 0.0 {
        let scale = remote.brightness() / max;
        red *= scale;
        green *= scale;
        blue *= scale;
    }

    let mut values = ColorValue::default();
    values.set_color_mode(ColorMode::Rgb);
    values.set_state(true);
    values.set_rgb(red, green, blue);
    values.set_color_temperature(FRAME_COLOR_TEMPERATURE);
    values.set_brightness(0.0);
    values.set_raw(true);
    Ok(values)
}
