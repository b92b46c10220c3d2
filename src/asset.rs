//! JSON animation documents and persisted settings.
//!
//! An animation document looks like
//!
//! ```json
//! { "metadata": { "name": "Test", "total_pixels": 3, "frame_count": 2 },
//!   "frames": [[[0, 255, 0, 0], [1, 0, 255, 0]], [[2, 0, 0, 255]]] }
//! ```
//!
//! where every pixel is an `[index, r, g, b]` tuple.

use alloc::string::String;
use alloc::vec;
use alloc::vec::Vec;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::animation::Animation;
use crate::frame::{Frame, FrameBuffer, Pixel};
use crate::renderer::RendererConfig;

#[derive(Debug, Error)]
pub enum AssetError {
    /// Not JSON, or a field is missing or has the wrong type
    #[error("malformed document: {0}")]
    Json(serde_json::Error),
    /// A pixel is not an `[index, r, g, b]` tuple
    #[error("frame {frame}, pixel {pixel}: expected 4 values, got {len}")]
    PixelArity {
        frame: usize,
        pixel: usize,
        len: usize,
    },
    /// A pixel index or channel does not fit its type
    #[error("frame {frame}, pixel {pixel}: value {value} out of range")]
    ValueOutOfRange {
        frame: usize,
        pixel: usize,
        value: u64,
    },
}

impl From<serde_json::Error> for AssetError {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct Metadata {
    name: String,
    total_pixels: u16,
    frame_count: u16,
}

#[derive(Debug, Serialize, Deserialize)]
struct Document {
    metadata: Metadata,
    frames: Vec<Vec<Vec<u64>>>,
}

fn parse_pixel(values: &[u64], frame: usize, pixel: usize) -> Result<Pixel, AssetError> {
    let &[index, r, g, b] = values else {
        return Err(AssetError::PixelArity {
            frame,
            pixel,
            len: values.len(),
        });
    };
    let out_of_range = |value| AssetError::ValueOutOfRange {
        frame,
        pixel,
        value,
    };
    let channel = |value: u64| u8::try_from(value).map_err(|_| out_of_range(value));

    Ok(Pixel::new(
        u16::try_from(index).map_err(|_| out_of_range(index))?,
        channel(r)?,
        channel(g)?,
        channel(b)?,
    ))
}

/// Parse an animation document
pub fn parse_animation(json: &str) -> Result<Animation, AssetError> {
    let document: Document = serde_json::from_str(json)?;

    let frames = document
        .frames
        .iter()
        .enumerate()
        .map(|(frame, pixels)| {
            pixels
                .iter()
                .enumerate()
                .map(|(pixel, values)| parse_pixel(values, frame, pixel))
                .collect::<Result<Frame, _>>()
        })
        .collect::<Result<FrameBuffer, _>>()?;

    let Metadata {
        name,
        total_pixels,
        frame_count,
    } = document.metadata;
    if usize::from(frame_count) != frames.len() {
        log::warn!(
            "animation '{}' declares {} frames but has {}",
            name,
            frame_count,
            frames.len()
        );
    }
    log::info!(
        "loaded animation '{}' with {} frames and a total of {} pixels",
        name,
        frames.len(),
        total_pixels
    );

    Ok(Animation::new(name, frames))
}

/// Parse an animation document, falling back to the `NONE` sentinel
pub fn load_animation(json: &str) -> Animation {
    parse_animation(json).unwrap_or_else(|err| {
        log::warn!("failed to load animation: {}", err);
        Animation::none()
    })
}

/// Number of LEDs addressed by the animation, highest index plus one
fn addressed_pixels(frames: &FrameBuffer) -> u16 {
    frames
        .iter()
        .flatten()
        .map(|pixel| pixel.index.saturating_add(1))
        .max()
        .unwrap_or(0)
}

/// Write an animation as a document [`parse_animation`] reads back
pub fn to_json(animation: &Animation) -> Result<String, AssetError> {
    let frames = animation.frames();
    let document = Document {
        metadata: Metadata {
            name: String::from(animation.name()),
            total_pixels: addressed_pixels(frames),
            frame_count: u16::try_from(frames.len()).unwrap_or(u16::MAX),
        },
        frames: frames
            .iter()
            .map(|frame| {
                frame
                    .iter()
                    .map(|pixel| {
                        let Pixel { index, color } = *pixel;
                        vec![
                            u64::from(index),
                            u64::from(color.r),
                            u64::from(color.g),
                            u64::from(color.b),
                        ]
                    })
                    .collect()
            })
            .collect(),
    };
    Ok(serde_json::to_string(&document)?)
}

/// Serialize renderer settings for persistence
pub fn config_to_json(config: &RendererConfig) -> Result<String, AssetError> {
    Ok(serde_json::to_string(config)?)
}

/// Read persisted renderer settings, missing fields take their defaults
pub fn config_from_json(json: &str) -> Result<RendererConfig, AssetError> {
    Ok(serde_json::from_str(json)?)
}
