//! Bars centered on the middle LED
//!
//! Heights and distances of `0` mean "derive from the strip length". Soft
//! edges fall off linearly with the distance to the nearest bar end.

use alloc::vec;
use alloc::vec::Vec;

use crate::color::unit_to_u8;
use crate::frame::{Frame, FrameBuffer, Pixel};

const SWEEP_FALLOFF: i32 = 5;
const EXTEND_FALLOFF: i32 = 25;
const RETENTION_FRAME_MS: u16 = 100;

/// Growing or shrinking bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarSweep {
    pub brightness: u8,
    /// First bar height in LEDs, `0` for auto
    pub start_height: u16,
    /// Last bar height in LEDs, `0` for auto
    pub end_height: u16,
    /// Sharp edges instead of a soft falloff
    pub abrupt: bool,
}

impl Default for BarSweep {
    fn default() -> Self {
        Self {
            brightness: u8::MAX,
            start_height: 0,
            end_height: 0,
            abrupt: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtendingBar {
    pub brightness: u8,
    /// Final distance from the middle, `0` for half the strip
    pub end_distance: u16,
    pub abrupt: bool,
}

impl Default for ExtendingBar {
    fn default() -> Self {
        Self {
            brightness: u8::MAX,
            end_distance: 0,
            abrupt: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtinguishingBar {
    pub brightness: u8,
    /// How long the middle LED stays lit before going dark, in 100 ms frames
    pub retention_ms: u16,
    pub abrupt: bool,
}

impl Default for ExtinguishingBar {
    fn default() -> Self {
        Self {
            brightness: u8::MAX,
            retention_ms: 500,
            abrupt: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovingBar {
    pub brightness: u8,
    /// Bar length in LEDs, at least 1
    pub bar_size: u16,
    /// Bar center, `None` for the middle of the strip
    pub center: Option<u16>,
}

impl Default for MovingBar {
    fn default() -> Self {
        Self {
            brightness: u8::MAX,
            bar_size: 1,
            center: None,
        }
    }
}

impl MovingBar {
    /// Same bar shifted by `offset` LEDs, clamped to the strip
    #[must_use]
    pub fn shifted(&self, led_count: u16, offset: i32) -> Self {
        let center = i32::from(self.center.unwrap_or(led_count / 2));
        let last = i32::from(led_count.saturating_sub(1));
        let moved = (center + offset).clamp(0, last);
        Self {
            center: u16::try_from(moved).ok(),
            ..self.clone()
        }
    }
}

/// Light growing away from the middle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grow {
    pub brightness: u8,
    /// Final distance from the middle, `0` for half the strip
    pub end_distance: u16,
    /// Full brightness on the leading LED instead of half
    pub abrupt: bool,
}

impl Default for Grow {
    fn default() -> Self {
        Self {
            brightness: u8::MAX,
            end_distance: 0,
            abrupt: false,
        }
    }
}

/// Strip split in two independently dimmed halves
#[derive(Debug, Clone, PartialEq)]
pub struct HalfFade {
    /// Level of the LEDs from the middle up (0.0-1.0)
    pub top_level: f32,
    /// Level of the LEDs below the middle (0.0-1.0)
    pub bottom_level: f32,
}

impl Default for HalfFade {
    fn default() -> Self {
        Self {
            top_level: 1.0,
            bottom_level: 1.0,
        }
    }
}

fn middle(led_count: u16) -> i32 {
    i32::from(led_count / 2)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn tenth_of(led_count: u16) -> u16 {
    ((f32::from(led_count) * 0.1) as u16).max(1)
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn pixel(led: i32, level: i32) -> Pixel {
    Pixel::grey(led as u16, level.clamp(0, 255) as u8)
}

/// One frame lit between `low` and `high` inclusive
fn bar_frame(
    led_count: u16,
    low: i32,
    high: i32,
    brightness: u8,
    abrupt: bool,
    falloff: i32,
) -> Frame {
    let brightness = i32::from(brightness);
    (0..i32::from(led_count))
        .filter_map(|led| {
            if (low..=high).contains(&led) {
                return Some(pixel(led, brightness));
            }
            if abrupt {
                return None;
            }
            let distance = (led - low).abs().min((led - high).abs());
            Some(pixel(led, brightness - distance * falloff))
        })
        .collect()
}

fn sweep_frame(led_count: u16, height: u16, params: &BarSweep) -> Frame {
    let half = i32::from(height / 2);
    let mid = middle(led_count);
    bar_frame(
        led_count,
        mid - half,
        mid + half,
        params.brightness,
        params.abrupt,
        SWEEP_FALLOFF,
    )
}

/// Bar growing from 10% of the strip to the full strip by default
pub fn growing_bar(led_count: u16, params: &BarSweep) -> FrameBuffer {
    if led_count == 0 {
        return Vec::new();
    }
    let start = match params.start_height {
        0 => tenth_of(led_count),
        height => height,
    };
    let end = match params.end_height {
        0 => led_count,
        height => height,
    };
    (start..=end)
        .map(|height| sweep_frame(led_count, height, params))
        .collect()
}

/// Bar shrinking from the full strip to 10% of it by default
pub fn shrinking_bar(led_count: u16, params: &BarSweep) -> FrameBuffer {
    if led_count == 0 {
        return Vec::new();
    }
    let start = match params.start_height {
        0 => led_count,
        height => height,
    };
    let end = match params.end_height {
        0 => tenth_of(led_count),
        height => height,
    };
    (end..=start)
        .rev()
        .map(|height| sweep_frame(led_count, height, params))
        .collect()
}

pub fn extending_bar(led_count: u16, params: &ExtendingBar) -> FrameBuffer {
    if led_count == 0 {
        return Vec::new();
    }
    let end = match params.end_distance {
        0 => led_count / 2,
        distance => distance,
    };
    let mid = middle(led_count);
    (0..=i32::from(end))
        .map(|extent| {
            bar_frame(
                led_count,
                mid - extent,
                mid + extent,
                params.brightness,
                params.abrupt,
                EXTEND_FALLOFF,
            )
        })
        .collect()
}

/// All on, contract to the middle LED, hold it, then go dark
pub fn extinguishing_bar(led_count: u16, params: &ExtinguishingBar) -> FrameBuffer {
    if led_count == 0 {
        return Vec::new();
    }
    let mid = middle(led_count);
    let retention = usize::from(params.retention_ms / RETENTION_FRAME_MS);
    let mut frames = Vec::with_capacity(usize::from(led_count / 2) + retention + 3);

    frames.push(
        (0..led_count)
            .map(|led| Pixel::grey(led, params.brightness))
            .collect(),
    );
    frames.extend((0..=mid).rev().map(|extent| {
        bar_frame(
            led_count,
            mid - extent,
            mid + extent,
            params.brightness,
            params.abrupt,
            EXTEND_FALLOFF,
        )
    }));

    let hold: Frame = vec![pixel(mid, i32::from(params.brightness))];
    frames.extend(core::iter::repeat_n(hold, retention));

    frames.push((0..led_count).map(|led| Pixel::grey(led, 0)).collect());
    frames
}

/// Single frame, moved by regenerating with [`MovingBar::shifted`]
pub fn moving_bar(led_count: u16, params: &MovingBar) -> FrameBuffer {
    if led_count == 0 {
        return Vec::new();
    }
    let size = i32::from(params.bar_size.max(1));
    let center = i32::from(params.center.unwrap_or(led_count / 2));
    let first = center - size / 2;
    let frame = (first..first + size)
        .filter(|led| (0..i32::from(led_count)).contains(led))
        .map(|led| pixel(led, i32::from(params.brightness)))
        .collect();
    vec![frame]
}

fn grow(led_count: u16, params: &Grow, direction: i32) -> FrameBuffer {
    if led_count == 0 {
        return Vec::new();
    }
    let end = match params.end_distance {
        0 => led_count / 2,
        distance => distance,
    };
    let mid = middle(led_count);
    let full = i32::from(params.brightness);
    let edge = if params.abrupt { full } else { full / 2 };

    (0..=i32::from(end))
        .map(|extent| {
            (0..=extent)
                .map(|step| (step, mid + step * direction))
                .take_while(|(_, led)| (0..i32::from(led_count)).contains(led))
                .map(|(step, led)| pixel(led, if step == extent { edge } else { full }))
                .collect()
        })
        .collect()
}

/// Lit from the middle towards the last LED
pub fn grow_up(led_count: u16, params: &Grow) -> FrameBuffer {
    grow(led_count, params, 1)
}

/// Lit from the middle towards the first LED
pub fn grow_down(led_count: u16, params: &Grow) -> FrameBuffer {
    grow(led_count, params, -1)
}

pub fn half_fade(led_count: u16, params: &HalfFade) -> FrameBuffer {
    if led_count == 0 {
        return Vec::new();
    }
    let mid = led_count / 2;
    let top = unit_to_u8(params.top_level.clamp(0.0, 1.0));
    let bottom = unit_to_u8(params.bottom_level.clamp(0.0, 1.0));
    let frame = (0..led_count)
        .map(|led| Pixel::grey(led, if led < mid { bottom } else { top }))
        .collect();
    vec![frame]
}
