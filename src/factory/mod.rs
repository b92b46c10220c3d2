//! Animation generators with compile-time known variants
//!
//! Every generator is a pure function of the strip length and its
//! parameters. The result is wrapped in an [`Animation`] and handed to the
//! renderer; a generator never sees renderer state, so the buffer being
//! swapped in can't be mutated by its producer.

mod bar;
mod breathe;
mod circling;

pub use bar::{
    BarSweep, ExtendingBar, ExtinguishingBar, Grow, HalfFade, MovingBar, extending_bar,
    extinguishing_bar, grow_down, grow_up, growing_bar, half_fade, moving_bar, shrinking_bar,
};
pub use breathe::{Breathe, Pulse, breathe, pulse};
pub use circling::{CirclingBrightDot, CirclingDarkSpot, circling_bright_dot, circling_dark_spot};

use crate::animation::Animation;
use crate::frame::FrameBuffer;

const ANIMATION_NAME_BREATHE: &str = "breathe";
const ANIMATION_NAME_GROWING_BAR: &str = "growing_bar";
const ANIMATION_NAME_SHRINKING_BAR: &str = "shrinking_bar";
const ANIMATION_NAME_EXTENDING_BAR: &str = "extending_bar";
const ANIMATION_NAME_EXTINGUISHING_BAR: &str = "extinguishing_bar";
const ANIMATION_NAME_MOVING_BAR: &str = "moving_bar";
const ANIMATION_NAME_GROW_UP: &str = "grow_up";
const ANIMATION_NAME_GROW_DOWN: &str = "grow_down";
const ANIMATION_NAME_HALF_FADE: &str = "half_fade";
const ANIMATION_NAME_PULSE: &str = "pulse";
const ANIMATION_NAME_CIRCLING_BRIGHT_DOT: &str = "circling_bright_dot";
const ANIMATION_NAME_CIRCLING_DARK_SPOT: &str = "circling_dark_spot";

const ANIMATION_ID_BREATHE: u8 = 0;
const ANIMATION_ID_GROWING_BAR: u8 = 1;
const ANIMATION_ID_SHRINKING_BAR: u8 = 2;
const ANIMATION_ID_EXTENDING_BAR: u8 = 3;
const ANIMATION_ID_EXTINGUISHING_BAR: u8 = 4;
const ANIMATION_ID_MOVING_BAR: u8 = 5;
const ANIMATION_ID_GROW_UP: u8 = 6;
const ANIMATION_ID_GROW_DOWN: u8 = 7;
const ANIMATION_ID_HALF_FADE: u8 = 8;
const ANIMATION_ID_PULSE: u8 = 9;
const ANIMATION_ID_CIRCLING_BRIGHT_DOT: u8 = 10;
const ANIMATION_ID_CIRCLING_DARK_SPOT: u8 = 11;

/// Known generators that can be requested.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum AnimationId {
    Breathe = ANIMATION_ID_BREATHE,
    GrowingBar = ANIMATION_ID_GROWING_BAR,
    ShrinkingBar = ANIMATION_ID_SHRINKING_BAR,
    ExtendingBar = ANIMATION_ID_EXTENDING_BAR,
    ExtinguishingBar = ANIMATION_ID_EXTINGUISHING_BAR,
    MovingBar = ANIMATION_ID_MOVING_BAR,
    GrowUp = ANIMATION_ID_GROW_UP,
    GrowDown = ANIMATION_ID_GROW_DOWN,
    HalfFade = ANIMATION_ID_HALF_FADE,
    Pulse = ANIMATION_ID_PULSE,
    CirclingBrightDot = ANIMATION_ID_CIRCLING_BRIGHT_DOT,
    CirclingDarkSpot = ANIMATION_ID_CIRCLING_DARK_SPOT,
}

impl AnimationId {
    pub const ALL: [Self; 12] = [
        Self::Breathe,
        Self::GrowingBar,
        Self::ShrinkingBar,
        Self::ExtendingBar,
        Self::ExtinguishingBar,
        Self::MovingBar,
        Self::GrowUp,
        Self::GrowDown,
        Self::HalfFade,
        Self::Pulse,
        Self::CirclingBrightDot,
        Self::CirclingDarkSpot,
    ];

    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            ANIMATION_ID_BREATHE => Self::Breathe,
            ANIMATION_ID_GROWING_BAR => Self::GrowingBar,
            ANIMATION_ID_SHRINKING_BAR => Self::ShrinkingBar,
            ANIMATION_ID_EXTENDING_BAR => Self::ExtendingBar,
            ANIMATION_ID_EXTINGUISHING_BAR => Self::ExtinguishingBar,
            ANIMATION_ID_MOVING_BAR => Self::MovingBar,
            ANIMATION_ID_GROW_UP => Self::GrowUp,
            ANIMATION_ID_GROW_DOWN => Self::GrowDown,
            ANIMATION_ID_HALF_FADE => Self::HalfFade,
            ANIMATION_ID_PULSE => Self::Pulse,
            ANIMATION_ID_CIRCLING_BRIGHT_DOT => Self::CirclingBrightDot,
            ANIMATION_ID_CIRCLING_DARK_SPOT => Self::CirclingDarkSpot,
            _ => return None,
        })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Breathe => ANIMATION_NAME_BREATHE,
            Self::GrowingBar => ANIMATION_NAME_GROWING_BAR,
            Self::ShrinkingBar => ANIMATION_NAME_SHRINKING_BAR,
            Self::ExtendingBar => ANIMATION_NAME_EXTENDING_BAR,
            Self::ExtinguishingBar => ANIMATION_NAME_EXTINGUISHING_BAR,
            Self::MovingBar => ANIMATION_NAME_MOVING_BAR,
            Self::GrowUp => ANIMATION_NAME_GROW_UP,
            Self::GrowDown => ANIMATION_NAME_GROW_DOWN,
            Self::HalfFade => ANIMATION_NAME_HALF_FADE,
            Self::Pulse => ANIMATION_NAME_PULSE,
            Self::CirclingBrightDot => ANIMATION_NAME_CIRCLING_BRIGHT_DOT,
            Self::CirclingDarkSpot => ANIMATION_NAME_CIRCLING_DARK_SPOT,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.as_str() == s)
    }

    /// Human readable name, used as the animation name
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::Breathe => "Breathe",
            Self::GrowingBar => "Growing Bar",
            Self::ShrinkingBar => "Shrinking Bar",
            Self::ExtendingBar => "Extending Bar",
            Self::ExtinguishingBar => "Extinguishing Bar",
            Self::MovingBar => "Moving Bar",
            Self::GrowUp => "Grow Up",
            Self::GrowDown => "Grow Down",
            Self::HalfFade => "Half Fade",
            Self::Pulse => "Pulse",
            Self::CirclingBrightDot => "Circling Bright Dot",
            Self::CirclingDarkSpot => "Circling Dark Spot",
        }
    }

    /// Generator with its default parameters
    pub fn default_shape(self) -> Shape {
        match self {
            Self::Breathe => Shape::Breathe(Breathe::default()),
            Self::GrowingBar => Shape::GrowingBar(BarSweep::default()),
            Self::ShrinkingBar => Shape::ShrinkingBar(BarSweep::default()),
            Self::ExtendingBar => Shape::ExtendingBar(ExtendingBar::default()),
            Self::ExtinguishingBar => Shape::ExtinguishingBar(ExtinguishingBar::default()),
            Self::MovingBar => Shape::MovingBar(MovingBar::default()),
            Self::GrowUp => Shape::GrowUp(Grow::default()),
            Self::GrowDown => Shape::GrowDown(Grow::default()),
            Self::HalfFade => Shape::HalfFade(HalfFade::default()),
            Self::Pulse => Shape::Pulse(Pulse::default()),
            Self::CirclingBrightDot => Shape::CirclingBrightDot(CirclingBrightDot::default()),
            Self::CirclingDarkSpot => Shape::CirclingDarkSpot(CirclingDarkSpot::default()),
        }
    }
}

/// Shape slot - a generator together with its parameters
#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    /// Sinusoidal rise and fall of the whole strip
    Breathe(Breathe),
    /// Centered bar growing from a start to an end height
    GrowingBar(BarSweep),
    /// Centered bar shrinking from a start to an end height
    ShrinkingBar(BarSweep),
    /// Line extending symmetrically from the middle
    ExtendingBar(ExtendingBar),
    /// Full strip contracting to the middle, holding, then going dark
    ExtinguishingBar(ExtinguishingBar),
    /// Single frame bar, moved by regenerating it
    MovingBar(MovingBar),
    /// Light growing from the middle towards the end of the strip
    GrowUp(Grow),
    /// Light growing from the middle towards the start of the strip
    GrowDown(Grow),
    /// Single frame with independently dimmed halves
    HalfFade(HalfFade),
    /// Fast attack, exponential decay
    Pulse(Pulse),
    /// Bright dot with a fading trail circling the strip
    CirclingBrightDot(CirclingBrightDot),
    /// Dark spot circling a lit strip
    CirclingDarkSpot(CirclingDarkSpot),
}

impl Shape {
    pub fn id(&self) -> AnimationId {
        match self {
            Self::Breathe(_) => AnimationId::Breathe,
            Self::GrowingBar(_) => AnimationId::GrowingBar,
            Self::ShrinkingBar(_) => AnimationId::ShrinkingBar,
            Self::ExtendingBar(_) => AnimationId::ExtendingBar,
            Self::ExtinguishingBar(_) => AnimationId::ExtinguishingBar,
            Self::MovingBar(_) => AnimationId::MovingBar,
            Self::GrowUp(_) => AnimationId::GrowUp,
            Self::GrowDown(_) => AnimationId::GrowDown,
            Self::HalfFade(_) => AnimationId::HalfFade,
            Self::Pulse(_) => AnimationId::Pulse,
            Self::CirclingBrightDot(_) => AnimationId::CirclingBrightDot,
            Self::CirclingDarkSpot(_) => AnimationId::CirclingDarkSpot,
        }
    }

    /// Generate the frames for a strip of `led_count` LEDs
    pub fn frames(&self, led_count: u16) -> FrameBuffer {
        match self {
            Self::Breathe(params) => breathe(led_count, params),
            Self::GrowingBar(params) => growing_bar(led_count, params),
            Self::ShrinkingBar(params) => shrinking_bar(led_count, params),
            Self::ExtendingBar(params) => extending_bar(led_count, params),
            Self::ExtinguishingBar(params) => extinguishing_bar(led_count, params),
            Self::MovingBar(params) => moving_bar(led_count, params),
            Self::GrowUp(params) => grow_up(led_count, params),
            Self::GrowDown(params) => grow_down(led_count, params),
            Self::HalfFade(params) => half_fade(led_count, params),
            Self::Pulse(params) => pulse(led_count, params),
            Self::CirclingBrightDot(params) => circling_bright_dot(led_count, params),
            Self::CirclingDarkSpot(params) => circling_dark_spot(led_count, params),
        }
    }

    /// Generate a named animation ready for [`crate::Renderer::set_animation`]
    pub fn build(&self, led_count: u16) -> Animation {
        let frames = self.frames(led_count);
        log::debug!(
            "generated '{}' with {} frames for {} LEDs",
            self.id().display_name(),
            frames.len(),
            led_count
        );
        Animation::new(self.id().display_name(), frames)
    }
}
