//! Playback loop.
//!
//! A pass plays the current animation once, frame by frame, re-reading the
//! renderer state before every frame and giving up as soon as the animation
//! is swapped, playback is stopped or a frame delay is interrupted.
//! Repeating is the caller's job: [`Playback`] simply starts another pass,
//! so cancellation is checked between passes as well as within them.
//!
//! # Usage
//!
//! ```ignore
//! static RENDERER: ... = ...;
//!
//! // playback task, yielding to the scheduler between delay chunks
//! Playback::with_sleep(&RENDERER, |duration: Duration| task_delay(duration)).run();
//! ```

use embassy_time::Duration;

use crate::OutputDriver;
use crate::delay::{BlockingSleep, DEFAULT_CHECK_INTERVAL, Sleep};
use crate::frame::FrameBuffer;
use crate::renderer::{AnimationIdentity, PlaybackSnapshot, RenderState, Renderer};

/// Why a pass ended before its last frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbortReason {
    /// The current animation was replaced mid-pass
    AnimationSwapped,
    /// Playback was stopped
    Stopped,
    /// A frame delay was cut short by the early exit flag
    Interrupted,
}

/// Phase of a playback pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackPhase {
    /// Nothing to play, or the pass has run out of frames
    Idle,
    /// Writing frames
    Playing,
    /// The pass was abandoned, terminal
    Aborting(AbortReason),
}

/// Result of one pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassOutcome {
    /// Not running, or the animation has no frames
    Idle,
    /// Every frame was written
    Completed { frames: usize },
    /// The pass stopped early after writing `frames` frames
    Aborted { reason: AbortReason, frames: usize },
}

/// One pass over the current animation
///
/// Owns a private copy of the frames, so nothing the control context does
/// can change the buffer being played.
pub struct Pass<'a, D: OutputDriver, const MAX_LEDS: usize, S: Sleep = BlockingSleep> {
    renderer: &'a Renderer<D, MAX_LEDS>,
    sleep: S,
    frames: FrameBuffer,
    next: usize,
    previous: AnimationIdentity,
    state: RenderState,
    phase: PlaybackPhase,
}

impl<'a, D: OutputDriver, const MAX_LEDS: usize> Pass<'a, D, MAX_LEDS, BlockingSleep> {
    /// Start a pass, or `None` if the renderer is not running or its
    /// animation is empty.
    pub fn begin(renderer: &'a Renderer<D, MAX_LEDS>) -> Option<Self> {
        Self::begin_with(renderer, BlockingSleep)
    }
}

impl<'a, D: OutputDriver, const MAX_LEDS: usize, S: Sleep> Pass<'a, D, MAX_LEDS, S> {
    /// [`Pass::begin`] sleeping frame delays through `sleep`
    pub fn begin_with(renderer: &'a Renderer<D, MAX_LEDS>, sleep: S) -> Option<Self> {
        let PlaybackSnapshot { state, frames } = renderer.playback_snapshot()?;
        Some(Self {
            renderer,
            sleep,
            frames,
            next: 0,
            previous: state.animation_identity(),
            state,
            phase: PlaybackPhase::Playing,
        })
    }

    pub const fn phase(&self) -> PlaybackPhase {
        self.phase
    }

    /// Number of frames written so far
    pub const fn frames_played(&self) -> usize {
        self.next
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    /// Play the next frame.
    ///
    /// Returns the outcome once the pass is over, `None` while frames
    /// remain.
    pub fn step(&mut self) -> Option<PassOutcome> {
        if let PlaybackPhase::Aborting(reason) = self.phase {
            return Some(self.aborted(reason));
        }
        if self.phase == PlaybackPhase::Idle {
            return Some(PassOutcome::Completed { frames: self.next });
        }

        let Some(frame) = self.frames.get(self.next) else {
            return Some(self.complete());
        };

        self.state = self.renderer.output_state();
        if self.state.animation_identity() != self.previous {
            return Some(self.abort(AbortReason::AnimationSwapped));
        }
        if !self.state.running {
            return Some(self.abort(AbortReason::Stopped));
        }

        self.renderer
            .write_frame(frame, self.state.peak_brightness, self.state.led_count);
        self.next += 1;

        if self
            .renderer
            .interruptible_delay_with(self.state.frame_duration(), &mut self.sleep)
        {
            self.renderer.set_early_exit(false);
            return Some(self.abort(AbortReason::Interrupted));
        }

        self.previous = self.state.animation_identity();
        None
    }

    /// Play the remaining frames
    pub fn finish(mut self) -> PassOutcome {
        loop {
            if let Some(outcome) = self.step() {
                return outcome;
            }
        }
    }

    fn complete(&mut self) -> PassOutcome {
        // swapped during the last frame delay, the new animation keeps running
        if !self.renderer.finish_pass(self.previous) {
            return self.abort(AbortReason::AnimationSwapped);
        }
        self.phase = PlaybackPhase::Idle;
        PassOutcome::Completed { frames: self.next }
    }

    fn abort(&mut self, reason: AbortReason) -> PassOutcome {
        self.phase = PlaybackPhase::Aborting(reason);
        self.aborted(reason)
    }

    const fn aborted(&self, reason: AbortReason) -> PassOutcome {
        PassOutcome::Aborted {
            reason,
            frames: self.next,
        }
    }
}

/// Run a single pass over the current animation
pub fn play_pass<D: OutputDriver, const MAX_LEDS: usize>(
    renderer: &Renderer<D, MAX_LEDS>,
) -> PassOutcome {
    play_pass_with(renderer, BlockingSleep)
}

/// [`play_pass`] sleeping frame delays through `sleep`
pub fn play_pass_with<D: OutputDriver, const MAX_LEDS: usize, S: Sleep>(
    renderer: &Renderer<D, MAX_LEDS>,
    sleep: S,
) -> PassOutcome {
    match Pass::begin_with(renderer, sleep) {
        Some(pass) => pass.finish(),
        None => PassOutcome::Idle,
    }
}

/// Drives passes forever on the playback context.
///
/// Every wait, frame delays and the idle interval alike, goes through the
/// [`Sleep`] it was built with.
pub struct Playback<'a, D: OutputDriver, const MAX_LEDS: usize, S: Sleep = BlockingSleep> {
    renderer: &'a Renderer<D, MAX_LEDS>,
    idle_wait: Duration,
    sleep: S,
}

impl<'a, D: OutputDriver, const MAX_LEDS: usize> Playback<'a, D, MAX_LEDS, BlockingSleep> {
    /// Busy-waits with [`BlockingSleep`], polling every
    /// [`DEFAULT_CHECK_INTERVAL`] while idle.
    pub const fn new(renderer: &'a Renderer<D, MAX_LEDS>) -> Self {
        Self {
            renderer,
            idle_wait: DEFAULT_CHECK_INTERVAL,
            sleep: BlockingSleep,
        }
    }
}

impl<'a, D: OutputDriver, const MAX_LEDS: usize, S: Sleep> Playback<'a, D, MAX_LEDS, S> {
    pub fn with_sleep(renderer: &'a Renderer<D, MAX_LEDS>, sleep: S) -> Self {
        Self {
            renderer,
            idle_wait: DEFAULT_CHECK_INTERVAL,
            sleep,
        }
    }

    #[must_use]
    pub fn with_idle_wait(mut self, idle_wait: Duration) -> Self {
        self.idle_wait = idle_wait;
        self
    }

    /// Run one pass.
    ///
    /// With nothing to play, waits one idle interval instead. A pending
    /// early exit is consumed when there is no frame delay left for it to
    /// cut short.
    pub fn tick(&mut self) -> PassOutcome {
        let sleep = &mut self.sleep;
        let outcome = play_pass_with(self.renderer, |duration: Duration| sleep.sleep(duration));
        match outcome {
            PassOutcome::Idle => {
                self.renderer.set_early_exit(false);
                self.sleep.sleep(self.idle_wait);
            }
            PassOutcome::Aborted {
                reason: AbortReason::Stopped,
                frames,
            } => {
                self.renderer.set_early_exit(false);
                log::debug!("pass stopped after {} frames", frames);
            }
            PassOutcome::Aborted { reason, frames } => {
                log::debug!("pass aborted after {} frames: {:?}", frames, reason);
            }
            PassOutcome::Completed { frames } => {
                log::trace!("pass completed, {} frames", frames);
            }
        }
        outcome
    }

    /// Tick while `keep_running` holds
    pub fn run_while(&mut self, mut keep_running: impl FnMut() -> bool) {
        while keep_running() {
            self.tick();
        }
    }

    /// Tick forever
    pub fn run(&mut self) -> ! {
        loop {
            self.tick();
        }
    }

    pub const fn renderer(&self) -> &'a Renderer<D, MAX_LEDS> {
        self.renderer
    }
}
