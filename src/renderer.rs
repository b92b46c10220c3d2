use alloc::string::String;
use core::cell::RefCell;

use critical_section::Mutex;
use embassy_time::Duration;
use serde::{Deserialize, Serialize};

use crate::OutputDriver;
use crate::animation::Animation;
use crate::color::{BLACK, Rgb, scale_color};
use crate::delay::{
    BlockingSleep, DEFAULT_CHECK_INTERVAL, Sleep, interruptible_delay_with, saturating_millis,
};
use crate::frame::{Frame, FrameBuffer};

/// Lowest accepted playback speed, keeps the frame delay finite
pub const MIN_SPEED: f32 = 0.1;

/// Playback settings
///
/// Used to build a [`Renderer`] and to persist its settings between boots.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Number of LEDs driven, clamped to `1..=MAX_LEDS`
    pub led_count: u16,
    /// Delay between frames at speed 1.0
    pub frame_delay_ms: u16,
    /// Grace period of the animation hand-off
    pub repeat_delay_ms: u16,
    /// Playback speed multiplier
    pub speed: f32,
    /// Brightness coefficient applied to every channel (0.0-1.0)
    pub peak_brightness: f32,
    /// Restart the animation after the last frame
    pub repeat: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            led_count: 10,
            frame_delay_ms: 50,
            repeat_delay_ms: 50,
            speed: 1.0,
            peak_brightness: 0.40,
            repeat: true,
        }
    }
}

/// Identity of the current animation as seen by the playback loop
///
/// The generation changes on every replacement, so two animations whose
/// name hashes collide (or a regenerated animation reusing its name) are
/// still told apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationIdentity {
    pub name_hash: u32,
    pub generation: u32,
}

/// Snapshot of every renderer setting, captured in one critical section
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderState {
    pub running: bool,
    pub repeat: bool,
    pub early_exit: bool,
    pub led_count: u16,
    pub frame_delay_ms: u16,
    pub repeat_delay_ms: u16,
    pub speed: f32,
    pub peak_brightness: f32,
    pub current_animation_name_hash: u32,
    pub animation_generation: u32,
}

impl RenderState {
    /// Frame delay adjusted by the playback speed
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn frame_duration(&self) -> Duration {
        let millis = f32::from(self.frame_delay_ms) / self.speed;
        Duration::from_millis(millis as u64)
    }

    pub const fn animation_identity(&self) -> AnimationIdentity {
        AnimationIdentity {
            name_hash: self.current_animation_name_hash,
            generation: self.animation_generation,
        }
    }
}

/// Everything a playback pass needs, taken under one lock acquisition
#[derive(Debug, Clone)]
pub struct PlaybackSnapshot {
    pub state: RenderState,
    pub frames: FrameBuffer,
}

struct Inner<D, const MAX_LEDS: usize> {
    running: bool,
    repeat: bool,
    early_exit: bool,
    led_count: u16,
    frame_delay_ms: u16,
    repeat_delay_ms: u16,
    speed: f32,
    peak_brightness: f32,

    animation: Animation,
    generation: u32,

    driver: D,
    staging: [Rgb; MAX_LEDS],
}

impl<D: OutputDriver, const MAX_LEDS: usize> Inner<D, MAX_LEDS> {
    fn state(&self) -> RenderState {
        RenderState {
            running: self.running,
            repeat: self.repeat,
            early_exit: self.early_exit,
            led_count: self.led_count,
            frame_delay_ms: self.frame_delay_ms,
            repeat_delay_ms: self.repeat_delay_ms,
            speed: self.speed,
            peak_brightness: self.peak_brightness,
            current_animation_name_hash: self.animation.name_hash(),
            animation_generation: self.generation,
        }
    }

    fn apply(&mut self, config: &RendererConfig) {
        self.led_count = clamp_led_count::<MAX_LEDS>(config.led_count);
        self.frame_delay_ms = config.frame_delay_ms;
        self.repeat_delay_ms = config.repeat_delay_ms;
        self.speed = clamp_speed(config.speed);
        self.peak_brightness = clamp_brightness(config.peak_brightness);
        self.repeat = config.repeat;
    }

    /// Stage a frame and flush it to the driver once
    fn write_frame(&mut self, frame: &Frame, brightness: f32, led_count: u16) {
        let brightness = clamp_brightness(brightness);
        let count = usize::from(led_count).min(MAX_LEDS);
        let leds = &mut self.staging[..count];
        leds.fill(BLACK);

        for pixel in frame {
            if let Some(led) = leds.get_mut(usize::from(pixel.index)) {
                *led = scale_color(pixel.color, brightness);
            }
        }

        self.driver.write(leds);
    }

    fn blank(&mut self) {
        let leds = &mut self.staging[..usize::from(self.led_count)];
        leds.fill(BLACK);
        self.driver.write(leds);
    }
}

/// Shared playback state
///
/// One instance is created at startup and shared by reference between the
/// control context and the playback context. All state, the current
/// animation and the output driver live behind a single critical-section
/// lock; no operation ever holds a second lock.
pub struct Renderer<D: OutputDriver, const MAX_LEDS: usize> {
    inner: Mutex<RefCell<Inner<D, MAX_LEDS>>>,
}

impl<D: OutputDriver, const MAX_LEDS: usize> Renderer<D, MAX_LEDS> {
    /// Create a renderer that is not running and holds the `NONE` animation
    pub fn new(driver: D, config: &RendererConfig) -> Self {
        const { assert!(MAX_LEDS > 0, "renderer needs at least one LED") };

        let mut inner = Inner {
            running: false,
            repeat: config.repeat,
            early_exit: false,
            led_count: 1,
            frame_delay_ms: 0,
            repeat_delay_ms: 0,
            speed: 1.0,
            peak_brightness: 0.0,
            animation: Animation::none(),
            generation: 0,
            driver,
            staging: [BLACK; MAX_LEDS],
        };
        inner.apply(config);

        Self {
            inner: Mutex::new(RefCell::new(inner)),
        }
    }

    fn with<R>(&self, f: impl FnOnce(&mut Inner<D, MAX_LEDS>) -> R) -> R {
        critical_section::with(|cs| f(&mut self.inner.borrow(cs).borrow_mut()))
    }

    /// Largest LED count this renderer accepts
    pub const fn max_led_count() -> u16 {
        max_led_count::<MAX_LEDS>()
    }

    /// Replace the current animation.
    ///
    /// Two phases: playback is stopped, the early exit flag cuts an
    /// in-flight frame delay short and the caller blocks for
    /// `repeat_delay_ms` so the pass can leave. Then the animation is
    /// swapped and playback resumes, all under one lock acquisition.
    pub fn set_animation(&self, animation: Animation) {
        self.set_animation_with(animation, &mut BlockingSleep);
    }

    /// [`Self::set_animation`] waiting out the grace period through `sleep`
    pub fn set_animation_with(&self, animation: Animation, sleep: &mut impl Sleep) {
        let grace = self.with(|inner| {
            inner.running = false;
            inner.early_exit = true;
            Duration::from_millis(u64::from(inner.repeat_delay_ms))
        });

        sleep.sleep(grace);

        log::info!(
            "setting animation '{}' with {} frames",
            animation.name(),
            animation.frame_count()
        );
        let previous = self.with(|inner| {
            inner.generation = inner.generation.wrapping_add(1);
            inner.running = true;
            // the interrupted pass has left by now
            inner.early_exit = false;
            core::mem::replace(&mut inner.animation, animation)
        });
        // freed outside the critical section
        drop(previous);
    }

    /// Close a pass that played every frame of `identity`.
    ///
    /// A one-shot animation stops here. Returns `false`, leaving playback
    /// untouched, if the animation was replaced while the pass was running.
    pub fn finish_pass(&self, identity: AnimationIdentity) -> bool {
        self.with(|inner| {
            if inner.state().animation_identity() != identity {
                return false;
            }
            if !inner.repeat {
                inner.running = false;
            }
            true
        })
    }

    /// Drop the current animation in favor of the `NONE` sentinel
    pub fn clear_animation(&self) {
        self.with(|inner| {
            inner.running = false;
            inner.early_exit = true;
            inner.animation.clear();
            inner.generation = inner.generation.wrapping_add(1);
        });
    }

    pub fn set_peak_brightness(&self, brightness: f32) {
        let brightness = clamp_brightness(brightness);
        self.with(|inner| {
            inner.peak_brightness = brightness;
            inner.early_exit = true;
        });
        log::debug!("peak brightness set to {}", brightness);
    }

    pub fn peak_brightness(&self) -> f32 {
        self.with(|inner| inner.peak_brightness)
    }

    pub fn set_speed(&self, speed: f32) {
        let speed = clamp_speed(speed);
        self.with(|inner| {
            inner.speed = speed;
            inner.early_exit = true;
        });
        log::debug!("speed set to {}", speed);
    }

    pub fn speed(&self) -> f32 {
        self.with(|inner| inner.speed)
    }

    pub fn set_led_count(&self, led_count: u16) {
        let led_count = clamp_led_count::<MAX_LEDS>(led_count);
        self.with(|inner| {
            inner.led_count = led_count;
            inner.early_exit = true;
        });
        log::debug!("LED count set to {}", led_count);
    }

    pub fn led_count(&self) -> u16 {
        self.with(|inner| inner.led_count)
    }

    pub fn set_frame_delay_ms(&self, delay_ms: u16) {
        self.with(|inner| {
            inner.frame_delay_ms = delay_ms;
            inner.early_exit = true;
        });
    }

    pub fn set_repeat_delay_ms(&self, delay_ms: u16) {
        self.with(|inner| {
            inner.repeat_delay_ms = delay_ms;
            inner.early_exit = true;
        });
    }

    /// Enabling repeat also re-arms a finished animation
    pub fn set_repeat(&self, repeat: bool) {
        self.with(|inner| {
            inner.repeat = repeat;
            if repeat {
                inner.running = true;
            }
        });
    }

    pub fn repeat(&self) -> bool {
        self.with(|inner| inner.repeat)
    }

    pub fn set_running(&self, running: bool) {
        self.with(|inner| inner.running = running);
    }

    pub fn is_running(&self) -> bool {
        self.with(|inner| inner.running)
    }

    /// Stop playback and cut any in-flight frame delay short
    pub fn stop(&self) {
        self.with(|inner| {
            inner.running = false;
            inner.early_exit = true;
        });
    }

    pub fn set_early_exit(&self, early_exit: bool) {
        self.with(|inner| inner.early_exit = early_exit);
    }

    pub fn early_exit(&self) -> bool {
        self.with(|inner| inner.early_exit)
    }

    /// Atomic snapshot of every setting and the current animation identity
    pub fn output_state(&self) -> RenderState {
        self.with(|inner| inner.state())
    }

    /// State plus a copy of the frames, or `None` if there is nothing to play
    pub fn playback_snapshot(&self) -> Option<PlaybackSnapshot> {
        self.with(|inner| {
            if !inner.running || inner.animation.is_empty() {
                return None;
            }
            Some(PlaybackSnapshot {
                state: inner.state(),
                frames: inner.animation.frames().clone(),
            })
        })
    }

    pub fn is_animation_empty(&self) -> bool {
        self.with(|inner| inner.animation.is_empty())
    }

    /// Deep copy of the current frames
    pub fn current_animation_frames(&self) -> FrameBuffer {
        self.with(|inner| inner.animation.frames().clone())
    }

    pub fn current_animation_name(&self) -> String {
        self.with(|inner| String::from(inner.animation.name()))
    }

    /// Current settings, suitable for persisting
    pub fn config(&self) -> RendererConfig {
        self.with(|inner| RendererConfig {
            led_count: inner.led_count,
            frame_delay_ms: inner.frame_delay_ms,
            repeat_delay_ms: inner.repeat_delay_ms,
            speed: inner.speed,
            peak_brightness: inner.peak_brightness,
            repeat: inner.repeat,
        })
    }

    /// Replace every setting at once
    pub fn apply_config(&self, config: &RendererConfig) {
        self.with(|inner| {
            inner.apply(config);
            inner.early_exit = true;
        });
    }

    /// Sleep `total_ms` in `chunk_ms` steps, returning `true` early once
    /// the early exit flag is observed.
    ///
    /// Both values are saturated to [`crate::delay::MAX_DELAY_MS`].
    pub fn interruptible_delay(&self, total_ms: u64, chunk_ms: u64) -> bool {
        interruptible_delay_with(
            &mut BlockingSleep,
            saturating_millis(total_ms),
            saturating_millis(chunk_ms),
            || self.early_exit(),
        )
    }

    /// [`Self::interruptible_delay`] with the default check interval
    pub fn interruptible_delay_for(&self, total: Duration) -> bool {
        self.interruptible_delay_with(total, &mut BlockingSleep)
    }

    /// Sleep `total` through `sleep` in default check intervals
    pub fn interruptible_delay_with(&self, total: Duration, sleep: &mut impl Sleep) -> bool {
        interruptible_delay_with(sleep, total, DEFAULT_CHECK_INTERVAL, || self.early_exit())
    }

    /// Write one frame to the strip.
    ///
    /// Pixels at or beyond `led_count` are dropped, channels are scaled by
    /// `brightness` and the driver is flushed once.
    pub fn write_frame(&self, frame: &Frame, brightness: f32, led_count: u16) {
        self.with(|inner| inner.write_frame(frame, brightness, led_count));
    }

    /// Turn every LED off
    pub fn clear(&self) {
        self.with(Inner::blank);
    }
}

impl<D: OutputDriver, const MAX_LEDS: usize> Drop for Renderer<D, MAX_LEDS> {
    fn drop(&mut self) {
        self.inner.get_mut().get_mut().blank();
        log::debug!("renderer dropped, strip cleared");
    }
}

#[allow(clippy::cast_possible_truncation)]
const fn max_led_count<const MAX_LEDS: usize>() -> u16 {
    if MAX_LEDS > u16::MAX as usize {
        u16::MAX
    } else {
        MAX_LEDS as u16
    }
}

fn clamp_led_count<const MAX_LEDS: usize>(led_count: u16) -> u16 {
    led_count.clamp(1, max_led_count::<MAX_LEDS>())
}

fn clamp_speed(speed: f32) -> f32 {
    if speed.is_nan() {
        return 1.0;
    }
    speed.max(MIN_SPEED)
}

fn clamp_brightness(brightness: f32) -> f32 {
    if brightness.is_nan() {
        return 0.0;
    }
    brightness.clamp(0.0, 1.0)
}
