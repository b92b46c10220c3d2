//! Frame data model
//!
//! A [`Pixel`] addresses one LED, a [`Frame`] is everything shown at one
//! instant and a [`FrameBuffer`] is the whole animation.

use alloc::vec::Vec;

use crate::color::{Rgb, grey};

/// One LED index with its color
///
/// The index is not checked against the strip length here, out of range
/// pixels are dropped when the frame is written.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Pixel {
    pub index: u16,
    pub color: Rgb,
}

impl Pixel {
    pub const fn new(index: u16, r: u8, g: u8, b: u8) -> Self {
        Self {
            index,
            color: Rgb { r, g, b },
        }
    }

    /// Pixel with equal channels
    pub const fn grey(index: u16, level: u8) -> Self {
        Self {
            index,
            color: grey(level),
        }
    }
}

impl From<(u16, Rgb)> for Pixel {
    fn from((index, color): (u16, Rgb)) -> Self {
        Self { index, color }
    }
}

/// Pixels of one instant, later duplicates of an index win
pub type Frame = Vec<Pixel>;

/// Ordered frames of an animation, index 0 is the entry frame
pub type FrameBuffer = Vec<Frame>;
