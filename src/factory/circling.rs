//! Spots travelling around a closed strip, one LED per frame

use alloc::vec::Vec;

use crate::frame::{Frame, FrameBuffer, Pixel};

const TRAIL_DECAY: f32 = 0.2;
const MIN_TRAIL_LEVEL: u8 = 5;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CirclingBrightDot {
    pub brightness: u8,
    /// Travel towards higher indices
    pub clockwise: bool,
    /// LEDs covered by the dot and its trail
    pub trail_length: u16,
    /// Dot only, no trail
    pub abrupt: bool,
}

impl Default for CirclingBrightDot {
    fn default() -> Self {
        Self {
            brightness: u8::MAX,
            clockwise: true,
            trail_length: 3,
            abrupt: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CirclingDarkSpot {
    /// Level of the lit background
    pub brightness: u8,
    pub clockwise: bool,
    /// Radius of the soft spot in LEDs
    pub spot_width: u16,
    /// Single dark LED instead of a soft spot
    pub abrupt: bool,
}

impl Default for CirclingDarkSpot {
    fn default() -> Self {
        Self {
            brightness: u8::MAX,
            clockwise: true,
            spot_width: 3,
            abrupt: false,
        }
    }
}

/// Spot position in frame `frame` of a `led_count` frame lap
fn position(frame: u16, led_count: u16, clockwise: bool) -> u16 {
    if clockwise {
        frame
    } else {
        (led_count - frame) % led_count
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn trail_level(brightness: u8, step: u16) -> u8 {
    (f32::from(brightness) * libm::powf(TRAIL_DECAY, f32::from(step))) as u8
}

fn dot_frame(led_count: u16, head: u16, params: &CirclingBrightDot) -> Frame {
    let mut frame = Vec::with_capacity(usize::from(params.trail_length.max(1)));
    frame.push(Pixel::grey(head, params.brightness));
    if params.abrupt {
        return frame;
    }

    let count = u32::from(led_count);
    for step in 1..params.trail_length {
        let level = trail_level(params.brightness, step);
        if level < MIN_TRAIL_LEVEL {
            continue;
        }
        let back = u32::from(step) % count;
        let led = if params.clockwise {
            (u32::from(head) + count - back) % count
        } else {
            (u32::from(head) + back) % count
        };
        // led < led_count
        #[allow(clippy::cast_possible_truncation)]
        let led = led as u16;
        frame.push(Pixel::grey(led, level));
    }
    frame
}

/// `led_count` frames, the dot advances one LED per frame
pub fn circling_bright_dot(led_count: u16, params: &CirclingBrightDot) -> FrameBuffer {
    (0..led_count)
        .map(|i| dot_frame(led_count, position(i, led_count, params.clockwise), params))
        .collect()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn spot_level(background: u8, distance: u16, width: u16) -> u8 {
    let ratio = f32::from(distance) / f32::from(width);
    (f32::from(background) * (ratio * ratio).min(1.0)) as u8
}

fn spot_frame(led_count: u16, center: u16, params: &CirclingDarkSpot) -> Frame {
    (0..led_count)
        .map(|led| {
            let level = if params.abrupt {
                if led == center { 0 } else { params.brightness }
            } else {
                let count = u32::from(led_count);
                let ahead = (u32::from(led) + count - u32::from(center)) % count;
                let distance = ahead.min(count - ahead);
                if distance < u32::from(params.spot_width) {
                    // distance < spot_width <= u16::MAX
                    #[allow(clippy::cast_possible_truncation)]
                    let distance = distance as u16;
                    spot_level(params.brightness, distance, params.spot_width)
                } else {
                    params.brightness
                }
            };
            Pixel::grey(led, level)
        })
        .collect()
}

/// `led_count` frames of a lit strip with a dark spot moving one LED per frame
pub fn circling_dark_spot(led_count: u16, params: &CirclingDarkSpot) -> FrameBuffer {
    (0..led_count)
        .map(|i| spot_frame(led_count, position(i, led_count, params.clockwise), params))
        .collect()
}
