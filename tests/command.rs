mod support;

mod tests {
    use led_strip_player::factory::Breathe;
    use led_strip_player::{
        Animation, Command, CommandProcessor, CommandQueue, NONE_NAME, QueueFull, Shape,
    };

    use crate::support::{fast_config, renderer};

    #[test]
    fn test_queue_is_bounded_fifo() {
        let queue = CommandQueue::<2>::new();
        assert!(queue.is_empty());

        queue.try_send(Command::Stop).unwrap();
        queue.sender().try_send(Command::SetLedCount(4)).unwrap();
        assert_eq!(queue.len(), 2);
        assert_eq!(
            queue.try_send(Command::Resume),
            Err(QueueFull(Command::Resume))
        );

        assert_eq!(queue.try_receive(), Some(Command::Stop));
        assert_eq!(queue.try_receive(), Some(Command::SetLedCount(4)));
        assert_eq!(queue.try_receive(), None);
    }

    #[test]
    fn test_processor_applies_settings() {
        let (renderer, _recorder) = renderer(&fast_config());
        let queue = CommandQueue::<8>::new();
        let mut processor = CommandProcessor::new(&queue);

        for command in [
            Command::SetBrightness(0.5),
            Command::SetSpeed(2.0),
            Command::SetLedCount(7),
            Command::SetFrameDelay(40),
            Command::SetRepeat(true),
        ] {
            queue.try_send(command).unwrap();
        }
        assert_eq!(processor.process_pending(&renderer), 5);
        assert!(queue.is_empty());

        let state = renderer.output_state();
        assert!((state.peak_brightness - 0.5).abs() < f32::EPSILON);
        assert!((state.speed - 2.0).abs() < f32::EPSILON);
        assert_eq!(state.led_count, 7);
        assert_eq!(state.frame_delay_ms, 40);
        assert!(state.repeat);
        assert!(state.running);
        assert!(state.early_exit);

        assert_eq!(processor.process_pending(&renderer), 0);
    }

    #[test]
    fn test_stop_and_resume() {
        let (renderer, _recorder) = renderer(&fast_config());
        let queue = CommandQueue::<4>::new();
        let mut processor = CommandProcessor::new(&queue);
        renderer.set_animation(Animation::new("Test", vec![vec![]]));

        queue.try_send(Command::Stop).unwrap();
        processor.process_pending(&renderer);
        assert!(!renderer.is_running());
        assert!(renderer.early_exit());

        queue.try_send(Command::Resume).unwrap();
        processor.process_pending(&renderer);
        assert!(renderer.is_running());
    }

    #[test]
    fn test_generate_hands_off_new_animation() {
        let (renderer, _recorder) = renderer(&fast_config());
        let queue = CommandQueue::<4>::new();
        assert_eq!(renderer.current_animation_name(), NONE_NAME);

        let shape = Shape::Breathe(Breathe::default().with_frame_count(12));
        queue.try_send(Command::Generate(shape)).unwrap();
        CommandProcessor::new(&queue).process_pending(&renderer);

        assert_eq!(renderer.current_animation_name(), "Breathe");
        let frames = renderer.current_animation_frames();
        assert_eq!(frames.len(), 12);
        assert!(frames.iter().all(|frame| frame.len() == 3));
        assert!(renderer.is_running());
    }

    #[test]
    fn test_set_animation_command() {
        let (renderer, _recorder) = renderer(&fast_config());
        let queue = CommandQueue::<1>::new();
        queue
            .try_send(Command::SetAnimation(Animation::named("Loaded")))
            .unwrap();
        CommandProcessor::new(&queue).process_pending(&renderer);
        assert_eq!(renderer.current_animation_name(), "Loaded");
    }
}
