#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Instant;

use led_strip_player::{OutputDriver, Renderer, RendererConfig, Rgb};

pub const MAX_LEDS: usize = 64;

pub type TestRenderer = Renderer<Recorder, MAX_LEDS>;

/// Driver keeping every write with its timestamp
#[derive(Clone, Default)]
pub struct Recorder {
    writes: Arc<Mutex<Vec<(Instant, Vec<Rgb>)>>>,
}

impl Recorder {
    pub fn writes(&self) -> Vec<(Instant, Vec<Rgb>)> {
        self.writes.lock().unwrap().clone()
    }

    pub fn frames(&self) -> Vec<Vec<Rgb>> {
        self.writes().into_iter().map(|(_, colors)| colors).collect()
    }

    pub fn count(&self) -> usize {
        self.writes.lock().unwrap().len()
    }
}

impl OutputDriver for Recorder {
    fn write(&mut self, colors: &[Rgb]) {
        self.writes
            .lock()
            .unwrap()
            .push((Instant::now(), colors.to_vec()));
    }
}

/// Fast settings: no hand-off grace, 1 ms frames, full brightness
pub fn fast_config() -> RendererConfig {
    RendererConfig {
        led_count: 3,
        frame_delay_ms: 1,
        repeat_delay_ms: 0,
        speed: 1.0,
        peak_brightness: 1.0,
        repeat: false,
    }
}

pub fn renderer(config: &RendererConfig) -> (TestRenderer, Recorder) {
    let recorder = Recorder::default();
    (Renderer::new(recorder.clone(), config), recorder)
}

pub fn rgb(r: u8, g: u8, b: u8) -> Rgb {
    Rgb { r, g, b }
}

pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
