use smart_leds::RGB8;

pub type Rgb = RGB8;

/// All channels off
pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

/// Grey level with equal channels
pub const fn grey(level: u8) -> Rgb {
    Rgb {
        r: level,
        g: level,
        b: level,
    }
}

/// Scale one channel by a brightness coefficient (0.0-1.0)
///
/// The result is truncated, so `255 * 0.5` gives `127`.
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn scale_channel(value: u8, brightness: f32) -> u8 {
    (f32::from(value) * brightness) as u8
}

/// Scale every channel of a color by a brightness coefficient
#[inline]
pub fn scale_color(color: Rgb, brightness: f32) -> Rgb {
    if brightness >= 1.0 {
        return color;
    }
    Rgb {
        r: scale_channel(color.r, brightness),
        g: scale_channel(color.g, brightness),
        b: scale_channel(color.b, brightness),
    }
}

/// Convert a unit interval level (0.0-1.0) to an 8-bit channel value
#[inline]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn unit_to_u8(level: f32) -> u8 {
    (level * 255.0) as u8
}
