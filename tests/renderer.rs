mod support;

mod tests {
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;
    use std::time::{Duration, Instant};

    use led_strip_player::delay::saturating_millis;
    use led_strip_player::renderer::MIN_SPEED;
    use led_strip_player::{Animation, MAX_DELAY_MS, NONE_NAME, Pixel, RendererConfig};

    use crate::support::{MAX_LEDS, fast_config, renderer, rgb};

    #[test]
    fn test_new_renderer_is_idle() {
        let (renderer, recorder) = renderer(&RendererConfig::default());
        let state = renderer.output_state();

        assert!(!state.running);
        assert!(!state.early_exit);
        assert!(state.repeat);
        assert_eq!(state.led_count, 10);
        assert_eq!(state.frame_delay_ms, 50);
        assert_eq!(state.repeat_delay_ms, 50);
        assert!((state.peak_brightness - 0.40).abs() < f32::EPSILON);
        assert_eq!(renderer.current_animation_name(), NONE_NAME);
        assert!(renderer.is_animation_empty());
        assert!(renderer.playback_snapshot().is_none());
        assert_eq!(recorder.count(), 0);
    }

    #[test]
    fn test_settings_are_clamped() {
        let (renderer, _recorder) = renderer(&fast_config());

        renderer.set_peak_brightness(1.5);
        assert!((renderer.peak_brightness() - 1.0).abs() < f32::EPSILON);
        renderer.set_peak_brightness(-0.2);
        assert_eq!(renderer.peak_brightness(), 0.0);
        renderer.set_peak_brightness(f32::NAN);
        assert_eq!(renderer.peak_brightness(), 0.0);

        renderer.set_speed(0.0);
        assert!((renderer.speed() - MIN_SPEED).abs() < f32::EPSILON);
        renderer.set_speed(f32::NAN);
        assert!((renderer.speed() - 1.0).abs() < f32::EPSILON);

        renderer.set_led_count(0);
        assert_eq!(renderer.led_count(), 1);
        renderer.set_led_count(500);
        assert_eq!(renderer.led_count(), MAX_LEDS as u16);
    }

    #[test]
    fn test_setting_mutators_raise_early_exit() {
        let (renderer, _recorder) = renderer(&fast_config());
        let mutators: [&dyn Fn(); 6] = [
            &|| renderer.set_peak_brightness(0.5),
            &|| renderer.set_speed(2.0),
            &|| renderer.set_led_count(5),
            &|| renderer.set_frame_delay_ms(20),
            &|| renderer.set_repeat_delay_ms(20),
            &|| renderer.apply_config(&fast_config()),
        ];

        for mutate in mutators {
            renderer.set_early_exit(false);
            mutate();
            assert!(renderer.early_exit());
        }
    }

    #[test]
    fn test_frame_duration_follows_speed() {
        let (renderer, _recorder) = renderer(&RendererConfig {
            frame_delay_ms: 100,
            ..fast_config()
        });
        renderer.set_speed(2.0);
        assert_eq!(
            renderer.output_state().frame_duration(),
            embassy_time::Duration::from_millis(50)
        );
        renderer.set_speed(0.5);
        assert_eq!(
            renderer.output_state().frame_duration(),
            embassy_time::Duration::from_millis(200)
        );
    }

    #[test]
    fn test_enabling_repeat_rearms_playback() {
        let (renderer, _recorder) = renderer(&fast_config());
        assert!(!renderer.is_running());
        renderer.set_repeat(false);
        assert!(!renderer.is_running());
        renderer.set_repeat(true);
        assert!(renderer.is_running());
        assert!(renderer.repeat());
    }

    #[test]
    fn test_write_frame_drops_pixels_past_led_count() {
        let (renderer, recorder) = renderer(&fast_config());
        let frame = vec![
            Pixel::new(2, 10, 20, 30),
            Pixel::new(3, 255, 255, 255),
            Pixel::new(40, 255, 255, 255),
        ];

        renderer.write_frame(&frame, 1.0, 3);

        let frames = recorder.frames();
        assert_eq!(frames.len(), 1);
        assert_eq!(
            frames[0],
            vec![rgb(0, 0, 0), rgb(0, 0, 0), rgb(10, 20, 30)]
        );
    }

    #[test]
    fn test_write_frame_scales_and_blanks() {
        let (renderer, recorder) = renderer(&fast_config());
        renderer.write_frame(&vec![Pixel::new(0, 255, 100, 1)], 1.0, 3);
        renderer.write_frame(
            &vec![Pixel::new(1, 255, 255, 255), Pixel::new(1, 255, 100, 3)],
            0.5,
            3,
        );

        let frames = recorder.frames();
        assert_eq!(frames[0][0], rgb(255, 100, 1));
        // previous frame does not bleed through, last duplicate wins
        assert_eq!(
            frames[1],
            vec![rgb(0, 0, 0), rgb(127, 50, 1), rgb(0, 0, 0)]
        );
    }

    #[test]
    fn test_set_animation_hands_off() {
        let (renderer, _recorder) = renderer(&RendererConfig {
            repeat_delay_ms: 30,
            ..fast_config()
        });
        let before = renderer.output_state().animation_identity();

        let started = Instant::now();
        renderer.set_animation(Animation::new("Test", vec![vec![Pixel::grey(0, 1)]]));
        assert!(started.elapsed() >= Duration::from_millis(30));

        let state = renderer.output_state();
        assert!(state.running);
        assert!(!state.early_exit);
        assert_eq!(renderer.current_animation_name(), "Test");
        assert_ne!(state.animation_identity(), before);
        assert_eq!(renderer.current_animation_frames().len(), 1);

        let snapshot = renderer.playback_snapshot().unwrap();
        assert_eq!(snapshot.frames, renderer.current_animation_frames());
        assert_eq!(snapshot.state.animation_identity(), state.animation_identity());
    }

    #[test]
    fn test_hand_off_raises_early_exit_during_grace() {
        let (renderer, _recorder) = renderer(&RendererConfig {
            repeat_delay_ms: 40,
            ..fast_config()
        });
        renderer.set_running(true);

        let mut grace = Vec::new();
        let mut sleep = |duration: led_strip_player::Duration| {
            let state = renderer.output_state();
            assert!(!state.running);
            assert!(state.early_exit);
            grace.push(duration.as_millis());
        };
        renderer.set_animation_with(Animation::named("Test"), &mut sleep);

        assert_eq!(grace, vec![40]);
        assert!(renderer.is_running());
        assert!(!renderer.early_exit());
        assert_eq!(renderer.current_animation_name(), "Test");
    }

    #[test]
    fn test_finish_pass_only_stops_current_animation() {
        let (renderer, _recorder) = renderer(&fast_config());
        renderer.set_animation(Animation::new("A", vec![vec![]]));
        let played = renderer.output_state().animation_identity();

        assert!(renderer.finish_pass(played));
        assert!(!renderer.is_running());

        renderer.set_animation(Animation::new("B", vec![vec![]]));
        assert!(!renderer.finish_pass(played));
        assert!(renderer.is_running());

        renderer.set_repeat(true);
        let current = renderer.output_state().animation_identity();
        assert!(renderer.finish_pass(current));
        assert!(renderer.is_running());
    }

    #[test]
    fn test_same_name_gets_new_identity() {
        let (renderer, _recorder) = renderer(&fast_config());
        renderer.set_animation(Animation::new("Test", vec![vec![]]));
        let first = renderer.output_state().animation_identity();
        renderer.set_animation(Animation::new("Test", vec![vec![]]));
        let second = renderer.output_state().animation_identity();

        assert_eq!(first.name_hash, second.name_hash);
        assert_ne!(first, second);
    }

    #[test]
    fn test_clear_animation() {
        let (renderer, _recorder) = renderer(&fast_config());
        renderer.set_animation(Animation::new("Test", vec![vec![]]));
        renderer.clear_animation();

        assert!(!renderer.is_running());
        assert!(renderer.early_exit());
        assert_eq!(renderer.current_animation_name(), NONE_NAME);
        assert!(renderer.playback_snapshot().is_none());
    }

    #[test]
    fn test_config_round_trip() {
        let config = RendererConfig {
            led_count: 200,
            frame_delay_ms: 33,
            repeat_delay_ms: 7,
            speed: 3.0,
            peak_brightness: 0.75,
            repeat: false,
        };
        let (renderer, _recorder) = renderer(&fast_config());
        renderer.apply_config(&config);

        assert_eq!(
            renderer.config(),
            RendererConfig {
                led_count: MAX_LEDS as u16,
                ..config
            }
        );
    }

    #[test]
    fn test_snapshot_is_atomic() {
        let a = RendererConfig {
            led_count: 5,
            frame_delay_ms: 10,
            repeat_delay_ms: 11,
            speed: 1.0,
            peak_brightness: 0.25,
            repeat: true,
        };
        let b = RendererConfig {
            led_count: 50,
            frame_delay_ms: 100,
            repeat_delay_ms: 110,
            speed: 4.0,
            peak_brightness: 0.75,
            repeat: false,
        };
        let (renderer, _recorder) = renderer(&a);
        let done = AtomicBool::new(false);

        thread::scope(|s| {
            s.spawn(|| {
                for i in 0..20_000 {
                    renderer.apply_config(if i % 2 == 0 { &b } else { &a });
                }
                done.store(true, Ordering::Release);
            });

            while !done.load(Ordering::Acquire) {
                let state = renderer.output_state();
                let seen = RendererConfig {
                    led_count: state.led_count,
                    frame_delay_ms: state.frame_delay_ms,
                    repeat_delay_ms: state.repeat_delay_ms,
                    speed: state.speed,
                    peak_brightness: state.peak_brightness,
                    repeat: state.repeat,
                };
                assert!(seen == a || seen == b, "torn snapshot: {:?}", seen);
            }
        });
    }

    #[test]
    fn test_delay_runs_to_completion() {
        let (renderer, _recorder) = renderer(&fast_config());
        let started = Instant::now();
        assert!(!renderer.interruptible_delay(30, 10));
        assert!(started.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn test_delay_returns_immediately_when_flag_set() {
        let (renderer, _recorder) = renderer(&fast_config());
        renderer.set_early_exit(true);
        let started = Instant::now();
        assert!(renderer.interruptible_delay(1000, 10));
        assert!(renderer.interruptible_delay_for(led_strip_player::Duration::from_secs(1)));
        assert!(started.elapsed() < Duration::from_millis(100));
    }

    #[test]
    fn test_huge_delay_saturates() {
        let (renderer, _recorder) = renderer(&fast_config());
        renderer.set_early_exit(true);
        assert!(renderer.interruptible_delay(u64::MAX, u64::MAX));

        assert_eq!(saturating_millis(u64::MAX), saturating_millis(MAX_DELAY_MS));
        assert_eq!(saturating_millis(250).as_millis(), 250);
    }

    #[test]
    fn test_delay_cancellation_latency() {
        let (renderer, _recorder) = renderer(&fast_config());

        thread::scope(|s| {
            let started = Instant::now();
            s.spawn(|| {
                thread::sleep(Duration::from_millis(50));
                renderer.set_early_exit(true);
            });

            assert!(renderer.interruptible_delay(1000, 10));
            let elapsed = started.elapsed();
            assert!(elapsed >= Duration::from_millis(50));
            assert!(elapsed < Duration::from_millis(300), "took {:?}", elapsed);
        });
    }

    #[test]
    fn test_drop_blanks_strip() {
        let (renderer, recorder) = renderer(&fast_config());
        renderer.write_frame(&vec![Pixel::grey(0, 255)], 1.0, 3);
        drop(renderer);

        let frames = recorder.frames();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[1], vec![rgb(0, 0, 0); 3]);
    }
}
