#![no_std]

extern crate alloc;

pub mod animation;
pub mod asset;
pub mod color;
pub mod command;
pub mod delay;
pub mod driver;
pub mod factory;
pub mod frame;
#[cfg(feature = "esp32-log")]
pub mod logger;
pub mod playback;
pub mod renderer;

pub use animation::{Animation, NONE_NAME, name_hash};
pub use asset::{AssetError, load_animation, parse_animation};
pub use command::{Command, CommandProcessor, CommandQueue, CommandSender, QueueFull};
pub use delay::{
    BlockingSleep, DEFAULT_CHECK_INTERVAL, DEFAULT_CHECK_INTERVAL_MS, MAX_DELAY_MS, Sleep,
    interruptible_delay, interruptible_delay_with,
};
pub use driver::SmartLedsDriver;
pub use factory::{AnimationId, Shape};
pub use frame::{Frame, FrameBuffer, Pixel};
pub use playback::{AbortReason, PassOutcome, Playback, PlaybackPhase, play_pass, play_pass_with};
pub use renderer::{AnimationIdentity, RenderState, Renderer, RendererConfig};

pub use color::Rgb;
pub use embassy_time::{Duration, Instant};

/// Abstract LED driver trait
///
/// Implement this trait to support different hardware platforms.
/// The renderer is generic over this trait.
pub trait OutputDriver {
    /// Write colors to the LED strip
    fn write(&mut self, colors: &[Rgb]);
}
