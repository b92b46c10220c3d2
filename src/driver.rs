//! Adapters from [`OutputDriver`] to LED strip drivers.

use core::fmt::Debug;

use smart_leds::SmartLedsWrite;

use crate::OutputDriver;
use crate::color::Rgb;

/// Drives any `smart-leds` writer (WS2812 over SPI/RMT, APA102, ...).
///
/// Hardware errors are not part of the playback model: a failed write is
/// logged and the next frame is attempted as usual.
pub struct SmartLedsDriver<W> {
    writer: W,
}

impl<W> SmartLedsDriver<W> {
    pub const fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Give the wrapped writer back
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W> OutputDriver for SmartLedsDriver<W>
where
    W: SmartLedsWrite,
    W::Color: From<Rgb>,
    W::Error: Debug,
{
    fn write(&mut self, colors: &[Rgb]) {
        if let Err(err) = self.writer.write(colors.iter().copied()) {
            log::warn!("LED strip write failed: {:?}", err);
        }
    }
}
