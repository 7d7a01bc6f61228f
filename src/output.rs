//! Hardware output traits.

use crate::blender::ChannelLevels;

/// Sink for the five blended channel levels.
///
/// Implement this trait to support different hardware platforms.
/// The fixture is generic over this trait.
pub trait RgbwwOutput {
    fn write(&mut self, levels: &ChannelLevels);
}

/// A single PWM channel.
pub trait ChannelOutput {
    /// Set the duty cycle, in `[0, 1]`
    fn set_level(&mut self, level: f32);
}

/// Five independent PWM channels.
pub struct PwmChannels<R, G, B, C, W> {
    pub red: R,
    pub green: G,
    pub blue: B,
    pub cold_white: C,
    pub warm_white: W,
}

impl<R, G, B, C, W> RgbwwOutput for PwmChannels<R, G, B, C, W>
where
    R: ChannelOutput,
    G: ChannelOutput,
    B: ChannelOutput,
    C: ChannelOutput,
    W: ChannelOutput,
{
    fn write(&mut self, levels: &ChannelLevels) {
        self.red.set_level(levels.red);
        self.green.set_level(levels.green);
        self.blue.set_level(levels.blue);
        self.cold_white.set_level(levels.cold_white);
        self.warm_white.set_level(levels.warm_white);
    }
}
