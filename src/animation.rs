//! Named frame buffers with a cheap identity hash

use alloc::string::String;

use crate::frame::FrameBuffer;

/// Name of the sentinel animation ("nothing loaded" / "load failed")
pub const NONE_NAME: &str = "NONE";

/// djb2 digest of a name
///
/// Used to compare animation identity once per frame without touching the
/// string. Distinct names may collide.
pub const fn name_hash(name: &str) -> u32 {
    let bytes = name.as_bytes();
    let mut hash: u32 = 5381;
    let mut i = 0;
    while i < bytes.len() {
        hash = (hash << 5).wrapping_add(hash).wrapping_add(bytes[i] as u32);
        i += 1;
    }
    hash
}

/// A named sequence of frames
///
/// Mutators replace whole fields, a reader never sees a partially
/// updated buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Animation {
    name: String,
    name_hash: u32,
    frames: FrameBuffer,
}

impl Default for Animation {
    fn default() -> Self {
        Self::none()
    }
}

impl Animation {
    pub fn new(name: impl Into<String>, frames: FrameBuffer) -> Self {
        let name = name.into();
        Self {
            name_hash: name_hash(&name),
            name,
            frames,
        }
    }

    /// Animation without frames
    pub fn named(name: impl Into<String>) -> Self {
        Self::new(name, FrameBuffer::new())
    }

    /// The sentinel animation
    pub fn none() -> Self {
        Self::named(NONE_NAME)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn name_hash(&self) -> u32 {
        self.name_hash
    }

    pub fn frames(&self) -> &FrameBuffer {
        &self.frames
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Whether there is nothing to play
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Whether this is the sentinel animation
    pub fn is_none(&self) -> bool {
        self.name_hash == name_hash(NONE_NAME) && self.name == NONE_NAME
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        let name = name.into();
        self.name_hash = name_hash(&name);
        self.name = name;
    }

    pub fn set_frames(&mut self, frames: FrameBuffer) {
        log::debug!(
            "setting {} frames for animation '{}'",
            frames.len(),
            self.name
        );
        self.frames = frames;
    }

    /// Reset to the sentinel animation
    pub fn clear(&mut self) {
        *self = Self::none();
    }

    /// Consume the animation, keeping its frames
    pub fn into_frames(self) -> FrameBuffer {
        self.frames
    }
}
