//! Whole strip brightness envelopes

use alloc::vec::Vec;
use core::f32::consts::PI;

use crate::color::unit_to_u8;
use crate::frame::{Frame, FrameBuffer, Pixel};

const DEFAULT_BREATHE_FRAMES: u16 = 90;
const MIN_PULSE_FRAMES: u16 = 10;
const PULSE_FRAMES_AT_UNIT_FREQUENCY: f32 = 60.0;
const PULSE_DECAY_RATE: f32 = 2.5;
const MIN_FREQUENCY: f32 = 0.1;

/// Eased cosine rise and fall
#[derive(Debug, Clone, PartialEq)]
pub struct Breathe {
    /// Lowest level (0.0-1.0)
    pub min_brightness: f32,
    /// Highest level (0.0-1.0)
    pub max_brightness: f32,
    /// Frames in one breath
    pub frame_count: u16,
}

impl Default for Breathe {
    fn default() -> Self {
        Self {
            min_brightness: 0.025,
            max_brightness: 1.0,
            frame_count: DEFAULT_BREATHE_FRAMES,
        }
    }
}

impl Breathe {
    #[must_use]
    pub fn with_range(mut self, min_brightness: f32, max_brightness: f32) -> Self {
        self.min_brightness = min_brightness;
        self.max_brightness = max_brightness;
        self
    }

    #[must_use]
    pub fn with_frame_count(mut self, frame_count: u16) -> Self {
        self.frame_count = frame_count;
        self
    }
}

/// Quick cubic attack followed by an exponential decay
#[derive(Debug, Clone, PartialEq)]
pub struct Pulse {
    pub min_brightness: f32,
    pub max_brightness: f32,
    /// Fraction of the cycle spent rising (0.0-1.0)
    pub attack: f32,
    /// Relative speed, higher means fewer frames and a faster decay
    pub frequency: f32,
}

impl Default for Pulse {
    fn default() -> Self {
        Self {
            min_brightness: 0.015,
            max_brightness: 1.0,
            attack: 0.15,
            frequency: 1.0,
        }
    }
}

impl Pulse {
    #[must_use]
    pub fn with_range(mut self, min_brightness: f32, max_brightness: f32) -> Self {
        self.min_brightness = min_brightness;
        self.max_brightness = max_brightness;
        self
    }

    #[must_use]
    pub fn with_attack(mut self, attack: f32) -> Self {
        self.attack = attack;
        self
    }

    #[must_use]
    pub fn with_frequency(mut self, frequency: f32) -> Self {
        self.frequency = frequency;
        self
    }

    /// `max(10, 60 / frequency)` frames, frequency floored at 0.1
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn frame_count(&self) -> u16 {
        let frames = (PULSE_FRAMES_AT_UNIT_FREQUENCY / self.frequency()) as u16;
        frames.max(MIN_PULSE_FRAMES)
    }

    fn frequency(&self) -> f32 {
        if self.frequency.is_nan() {
            return 1.0;
        }
        self.frequency.max(MIN_FREQUENCY)
    }
}

fn uniform(led_count: u16, level: f32) -> Frame {
    let level = unit_to_u8(level);
    (0..led_count).map(|led| Pixel::grey(led, level)).collect()
}

pub fn breathe(led_count: u16, params: &Breathe) -> FrameBuffer {
    if led_count == 0 {
        return Vec::new();
    }
    let count = f32::from(params.frame_count);
    let span = params.max_brightness - params.min_brightness;

    (0..params.frame_count)
        .map(|i| {
            let t = f32::from(i) / count;
            let eased = 0.5 - 0.5 * libm::cosf(t * PI * 2.0);
            uniform(led_count, params.min_brightness + span * eased)
        })
        .collect()
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn pulse(led_count: u16, params: &Pulse) -> FrameBuffer {
    if led_count == 0 {
        return Vec::new();
    }
    let frame_count = params.frame_count();
    let attack_frames = ((f32::from(frame_count) * params.attack.clamp(0.0, 1.0)) as u16)
        .clamp(1, frame_count);
    let decay_frames = frame_count - attack_frames;
    let decay_rate = PULSE_DECAY_RATE * params.frequency();
    let span = params.max_brightness - params.min_brightness;

    (0..frame_count)
        .map(|i| {
            let level = if i < attack_frames {
                let progress = f32::from(i) / f32::from(attack_frames);
                params.min_brightness + span * progress * progress * progress
            } else {
                let progress = f32::from(i - attack_frames) / f32::from(decay_frames);
                params.max_brightness - span * (1.0 - libm::expf(-decay_rate * progress))
            };
            uniform(led_count, level)
        })
        .collect()
}
