mod value;

use smart_leds::RGB8;
pub use value::{ColorValue, RgbCt};

pub type Rgb = RGB8;
