//! Gamma helpers.
//!
//! Two curves live here: the configurable power law used to project
//! brightness values into output levels, and a fixed three-segment curve used
//! by the perceptual transition to interpolate in a roughly linear
//! perceived-brightness space.

/// Default gamma exponent for PWM outputs
pub const DEFAULT_GAMMA: f32 = 2.8;

/// Apply the power law `value ^ gamma`.
///
/// A non-positive gamma disables correction.
pub fn gamma_correct(value: f32, gamma: f32) -> f32 {
    if value <= 0.0 {
        return 0.0;
    }
    if gamma <= 0.0 {
        return value;
    }
    libm::powf(value, gamma)
}

/// Invert [`gamma_correct`]: `value ^ (1 / gamma)`.
pub fn gamma_uncorrect(value: f32, gamma: f32) -> f32 {
    if value <= 0.0 {
        return 0.0;
    }
    if gamma <= 0.0 {
        return value;
    }
    libm::powf(value, 1.0 / gamma)
}

const SEGMENT_IN_1: f32 = 384.0 / 1023.0;
const SEGMENT_IN_2: f32 = 768.0 / 1023.0;
const SEGMENT_OUT_1: f32 = 192.0 / 1023.0;
const SEGMENT_OUT_2: f32 = 576.0 / 1023.0;

/// Piecewise linear approximation of a gamma curve.
///
/// Input and output are clamped to `[0, 1]`.
pub fn perceptual_gamma(value: f32) -> f32 {
    piecewise(value, SEGMENT_IN_1, SEGMENT_IN_2, SEGMENT_OUT_1, SEGMENT_OUT_2)
}

/// Inverse of [`perceptual_gamma`]
pub fn perceptual_gamma_inverse(value: f32) -> f32 {
    piecewise(value, SEGMENT_OUT_1, SEGMENT_OUT_2, SEGMENT_IN_1, SEGMENT_IN_2)
}

fn piecewise(value: f32, in_1: f32, in_2: f32, out_1: f32, out_2: f32) -> f32 {
    if value <= 0.0 {
        0.0
    } else if value <= in_1 {
        value * (out_1 / in_1)
    } else if value <= in_2 {
        (value - in_1) * ((out_2 - out_1) / (in_2 - in_1)) + out_1
    } else if value < 1.0 {
        (value - in_2) * ((1.0 - out_2) / (1.0 - in_2)) + out_2
    } else {
        1.0
    }
}

/// Linear interpolation between `a` and `b`
#[inline]
pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    if t >= 1.0 { b } else { a + (b - a) * t }
}

/// Quintic ease curve `6t^5 - 15t^4 + 10t^3`.
///
/// Zero first and second derivatives at both ends.
pub fn smootherstep(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}
