//! Bounded command queue for the control path.
//!
//! Producers that must not block (interrupt handlers, button callbacks)
//! push a [`Command`] and return; the control task drains the queue with a
//! [`CommandProcessor`], which performs the blocking renderer calls such as
//! the animation hand-off. Built on `critical-section` and
//! `heapless::Deque`, so it is interrupt safe and allocation free.

use core::cell::RefCell;

use critical_section::Mutex;
use heapless::Deque;
use thiserror::Error;

use crate::OutputDriver;
use crate::animation::Animation;
use crate::factory::Shape;
use crate::renderer::Renderer;

/// Request to change what the renderer plays or how
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Hand a ready animation to the renderer
    SetAnimation(Animation),
    /// Generate an animation for the current LED count, then hand it over
    Generate(Shape),
    SetBrightness(f32),
    SetSpeed(f32),
    SetLedCount(u16),
    SetRepeat(bool),
    SetFrameDelay(u16),
    /// Stop playback and cut the current frame short
    Stop,
    /// Resume the current animation
    Resume,
}

/// Returned by [`CommandQueue::try_send`] when the queue is full, carries
/// the rejected command back.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("command queue is full")]
pub struct QueueFull(pub Command);

/// A bounded, interrupt safe command queue.
pub struct CommandQueue<const SIZE: usize> {
    inner: Mutex<RefCell<Deque<Command, SIZE>>>,
}

impl<const SIZE: usize> CommandQueue<SIZE> {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(RefCell::new(Deque::new())),
        }
    }

    /// Lightweight handle for producers
    pub const fn sender(&self) -> CommandSender<'_, SIZE> {
        CommandSender { queue: self }
    }

    pub fn try_send(&self, command: Command) -> Result<(), QueueFull> {
        critical_section::with(|cs| {
            let mut queue = self.inner.borrow(cs).borrow_mut();
            queue.push_back(command).map_err(QueueFull)
        })
    }

    /// Oldest pending command, if any
    pub fn try_receive(&self) -> Option<Command> {
        critical_section::with(|cs| self.inner.borrow(cs).borrow_mut().pop_front())
    }

    pub fn len(&self) -> usize {
        critical_section::with(|cs| self.inner.borrow(cs).borrow().len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<const SIZE: usize> Default for CommandQueue<SIZE> {
    fn default() -> Self {
        Self::new()
    }
}

/// A sender handle for a [`CommandQueue`].
#[derive(Clone, Copy)]
pub struct CommandSender<'a, const SIZE: usize> {
    queue: &'a CommandQueue<SIZE>,
}

impl<const SIZE: usize> CommandSender<'_, SIZE> {
    pub fn try_send(&self, command: Command) -> Result<(), QueueFull> {
        self.queue.try_send(command)
    }
}

/// Applies queued commands to a renderer
pub struct CommandProcessor<'a, const SIZE: usize> {
    queue: &'a CommandQueue<SIZE>,
}

impl<'a, const SIZE: usize> CommandProcessor<'a, SIZE> {
    pub const fn new(queue: &'a CommandQueue<SIZE>) -> Self {
        Self { queue }
    }

    /// Drain every pending command (non-blocking apart from hand-offs).
    ///
    /// Returns the number of commands applied.
    pub fn process_pending<D: OutputDriver, const MAX_LEDS: usize>(
        &mut self,
        renderer: &Renderer<D, MAX_LEDS>,
    ) -> usize {
        let mut applied = 0;
        while let Some(command) = self.queue.try_receive() {
            apply(renderer, command);
            applied += 1;
        }
        applied
    }
}

/// Apply one command to the renderer
pub fn apply<D: OutputDriver, const MAX_LEDS: usize>(
    renderer: &Renderer<D, MAX_LEDS>,
    command: Command,
) {
    log::trace!("applying {:?}", CommandKind(&command));
    match command {
        Command::SetAnimation(animation) => renderer.set_animation(animation),
        Command::Generate(shape) => renderer.set_animation(shape.build(renderer.led_count())),
        Command::SetBrightness(brightness) => renderer.set_peak_brightness(brightness),
        Command::SetSpeed(speed) => renderer.set_speed(speed),
        Command::SetLedCount(led_count) => renderer.set_led_count(led_count),
        Command::SetRepeat(repeat) => renderer.set_repeat(repeat),
        Command::SetFrameDelay(delay_ms) => renderer.set_frame_delay_ms(delay_ms),
        Command::Stop => renderer.stop(),
        Command::Resume => renderer.set_running(true),
    }
}

/// Logs a command without dumping its frames
struct CommandKind<'a>(&'a Command);

impl core::fmt::Debug for CommandKind<'_> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self.0 {
            Command::SetAnimation(animation) => write!(f, "SetAnimation({:?})", animation.name()),
            Command::Generate(shape) => write!(f, "Generate({})", shape.id().as_str()),
            other => core::fmt::Debug::fmt(other, f),
        }
    }
}
