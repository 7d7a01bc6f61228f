mod tests {
    use embassy_time::{Duration, Instant};
    use myrtio_rgbww_composer::{
        AuxLevels, ChannelLevels, EffectSlot, Fixture, FixtureConfig, FrameScheduler, LightCall, LightConfig,
        LightId, PulseEffect, RequestQueue, RestoreMode, RgbwwOutput, persistence::MemoryStore,
    };

    #[derive(Default)]
    struct RecordingOutput {
        writes: usize,
        last: ChannelLevels,
    }

    impl RgbwwOutput for RecordingOutput {
        fn write(&mut self, levels: &ChannelLevels) {
            self.writes += 1;
            self.last = *levels;
        }
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    fn main_only() -> Fixture<RecordingOutput> {
        Fixture::new(
            FixtureConfig::new(LightConfig::new("Bulb")),
            RecordingOutput::default(),
        )
    }

    fn with_aux() -> Fixture<RecordingOutput> {
        Fixture::new(
            FixtureConfig::new(LightConfig::new("Bulb")).with_aux_lights("Warm White", "Cold White"),
            RecordingOutput::default(),
        )
    }

    fn set_now(
        fixture: &mut Fixture<RecordingOutput>,
        id: LightId,
        f: impl FnOnce(&mut LightCall),
    ) {
        let mut call = fixture.call(id).unwrap();
        call.set_state(true)
            .set_transition_length(Duration::from_ticks(0));
        f(&mut call);
        assert!(fixture.perform(id, call, Instant::from_millis(0)));
    }

    #[test]
    fn test_white_rgb_splits_into_white_channels() {
        let mut fixture = main_only();
        set_now(&mut fixture, LightId::Main, |call| {
            call.set_rgb(1.0, 1.0, 1.0);
        });

        assert!(fixture.tick(Instant::from_millis(0)));
        let levels = fixture.output().last;
        assert_eq!((levels.red, levels.green, levels.blue), (0.0, 0.0, 0.0));
        assert!(approx(levels.warm_white, 0.375));
        assert!(approx(levels.cold_white, 0.375));

        assert!(!fixture.tick(Instant::from_millis(20)));
        assert_eq!(fixture.output().writes, 1);
    }

    #[test]
    fn test_warm_aux_tints_white_share() {
        let mut fixture = with_aux();
        set_now(&mut fixture, LightId::Main, |call| {
            call.set_color_temperature(250.0);
        });
        set_now(&mut fixture, LightId::Warm, |call| {
            call.set_rgbw(1.0, 0.0, 0.0, 0.0);
        });

        assert!(fixture.tick(Instant::from_millis(0)));
        assert_eq!(fixture.output().writes, 1);
        assert!(approx(fixture.blender().color_temperature_fraction(), 0.5));

        let levels = fixture.output().last;
        assert!(approx(levels.red, 0.5));
        assert!(approx(levels.warm_white, 0.0));
        assert!(approx(levels.cold_white, 0.5));
    }

    #[test]
    fn test_aux_change_forces_write_at_full_brightness() {
        let mut fixture = with_aux();
        set_now(&mut fixture, LightId::Main, |call| {
            call.set_color_temperature(350.0);
        });
        fixture.tick(Instant::from_millis(0));
        assert!(!fixture.tick(Instant::from_millis(20)));

        set_now(&mut fixture, LightId::Cold, |call| {
            call.set_brightness(0.3);
        });
        assert!(fixture.tick(Instant::from_millis(40)));
        assert_eq!(fixture.output().writes, 2);

        let cold = fixture.light(LightId::Cold).unwrap();
        assert_eq!(cold.current_values().brightness(), 1.0);
        assert_eq!(cold.remote_values().brightness(), 0.3);
        assert!(!cold.has_changed());
    }

    #[test]
    fn test_color_temperature_midpoint_splits_evenly() {
        let mut fixture = with_aux();
        set_now(&mut fixture, LightId::Main, |call| {
            call.set_color_temperature(250.0);
        });

        assert!(fixture.tick(Instant::from_millis(0)));
        let levels = fixture.output().last;
        assert_eq!((levels.red, levels.green, levels.blue), (0.0, 0.0, 0.0));
        assert!(levels.warm_white > 0.0);
        assert_eq!(levels.warm_white, levels.cold_white);
    }

    #[test]
    fn test_warmest_temperature_gives_warm_aux_full_weight() {
        let mut fixture = with_aux();
        set_now(&mut fixture, LightId::Main, |call| {
            call.set_color_temperature(350.0);
        });
        assert!(fixture.tick(Instant::from_millis(0)));
        assert!(!fixture.tick(Instant::from_millis(20)));

        set_now(&mut fixture, LightId::Warm, |call| {
            call.set_rgbw(1.0, 0.5, 0.25, 0.8);
        });
        assert!(fixture.tick(Instant::from_millis(40)));
        assert_eq!(fixture.output().writes, 2);
        assert_eq!(fixture.blender().color_temperature_fraction(), 1.0);

        let warm = fixture.light(LightId::Warm).unwrap();
        let aux = AuxLevels::from_values(warm.current_values(), warm.gamma()).unwrap();
        let levels = fixture.output().last;
        let close = |a: f32, b: f32| (a - b).abs() < 2e-3;
        assert!(close(levels.red, aux.red));
        assert!(close(levels.green, aux.green));
        assert!(close(levels.blue, aux.blue * 0.6));
        assert!(close(levels.warm_white, aux.white));
        assert_eq!(levels.cold_white, 0.0);
    }

    #[test]
    fn test_turn_off_during_fade_in_reaches_black() {
        let mut fixture = main_only();
        let mut call = fixture.call(LightId::Main).unwrap();
        call.set_state(true)
            .set_rgb(1.0, 0.0, 0.0)
            .set_transition_length(Duration::from_secs(1));
        assert!(fixture.perform(LightId::Main, call, Instant::from_millis(0)));

        fixture.tick(Instant::from_millis(0));
        assert!(fixture.tick(Instant::from_millis(600)));
        let halfway = fixture.output().last.red;
        assert!(halfway > 0.0);

        let mut call = fixture.call(LightId::Main).unwrap();
        call.set_state(false)
            .set_transition_length(Duration::from_secs(1));
        assert!(fixture.perform(LightId::Main, call, Instant::from_millis(600)));

        fixture.tick(Instant::from_millis(900));
        let fading = fixture.output().last.red;
        assert!(fading < halfway);

        fixture.tick(Instant::from_millis(1400));
        let nearly_off = fixture.output().last.red;
        assert!(nearly_off < fading);

        fixture.tick(Instant::from_millis(1600));
        assert_eq!(fixture.output().last, ChannelLevels::OFF);
        assert!(!fixture.main().current_values().is_on());
    }

    #[test]
    fn test_missing_aux_light() {
        let mut fixture = main_only();
        assert!(fixture.call(LightId::Warm).is_none());
        assert!(fixture.light(LightId::Cold).is_none());

        let call = fixture.call(LightId::Main).unwrap();
        assert!(!fixture.perform(LightId::Warm, call, Instant::from_millis(0)));
        assert!(
            fixture
                .add_effect(LightId::Cold, EffectSlot::Pulse(PulseEffect::default()))
                .is_err()
        );
        assert_eq!(
            fixture.add_effect(LightId::Main, EffectSlot::Pulse(PulseEffect::default())).ok(),
            Some(1)
        );
    }

    #[test]
    fn test_saved_state_survives_restart() {
        let config = LightConfig::new("Bulb").with_restore_mode(RestoreMode::RestoreDefaultOff);
        let mut store: MemoryStore<4> = MemoryStore::new();

        let mut fixture = Fixture::new(FixtureConfig::new(config), RecordingOutput::default());
        fixture.setup(&store, Instant::from_millis(0));
        set_now(&mut fixture, LightId::Main, |call| {
            call.set_rgb(0.0, 0.0, 1.0);
        });
        fixture.flush_saves(&mut store);
        assert_eq!(store.len(), 1);

        let mut restarted = Fixture::new(FixtureConfig::new(config), RecordingOutput::default());
        restarted.setup(&store, Instant::from_millis(0));
        let values = restarted.main().remote_values();
        assert!(values.is_on());
        assert_eq!((values.red(), values.green(), values.blue()), (0.0, 0.0, 1.0));
    }

    #[test]
    fn test_requests_are_drained() {
        let mut fixture = main_only();
        let queue: RequestQueue<4> = RequestQueue::new();

        let mut call = fixture.call(LightId::Main).unwrap();
        call.set_state(true);
        queue.try_send(LightId::Main, call).unwrap();
        let call = fixture.call(LightId::Warm);
        assert!(call.is_none());
        assert_eq!(queue.len(), 1);

        fixture.process_requests(&queue, Instant::from_millis(0));
        assert!(queue.is_empty());
        assert!(fixture.main().remote_values().is_on());
    }

    #[test]
    fn test_queue_rejects_when_full() {
        let fixture = main_only();
        let queue: RequestQueue<1> = RequestQueue::new();
        let sender = queue.sender();

        let call = fixture.call(LightId::Main).unwrap();
        assert!(sender.try_send(LightId::Main, call.clone()).is_ok());
        let rejected = sender.try_send(LightId::Main, call).unwrap_err();
        assert_eq!(rejected.0.light, LightId::Main);
    }

    #[test]
    fn test_ddp_frame_drives_outputs() {
        let mut fixture = main_only();
        let mut payload = [0u8; 13];
        payload[10] = 255;

        fixture.apply_ddp_frame(&payload).unwrap();
        assert!(fixture.main().is_raw_active());
        assert!(!fixture.main().remote_values().is_on());

        assert!(fixture.tick(Instant::from_millis(0)));
        let levels = fixture.output().last;
        assert!(approx(levels.red, 1.0));
        assert_eq!(levels.green, 0.0);
        assert_eq!(levels.cold_white, 0.0);
        assert_eq!(levels.warm_white, 0.0);

        assert!(fixture.apply_ddp_frame(&payload[..5]).is_err());
    }

    #[test]
    fn test_scheduler_paces_ticks() {
        let queue: RequestQueue<4> = RequestQueue::new();
        let mut scheduler = FrameScheduler::new(main_only(), &queue);

        let result = scheduler.tick(Instant::from_millis(0));
        assert_eq!(result.next_deadline, Instant::from_millis(20));
        assert_eq!(result.sleep_duration, Duration::from_millis(20));
        assert!(!result.wrote_output);

        let result = scheduler.tick(Instant::from_millis(25));
        assert_eq!(result.next_deadline, Instant::from_millis(40));
        assert_eq!(result.sleep_duration, Duration::from_millis(15));

        let result = scheduler.tick(Instant::from_millis(200));
        assert_eq!(result.next_deadline, Instant::from_millis(220));
    }

    #[test]
    fn test_scheduler_processes_requests() {
        let queue: RequestQueue<4> = RequestQueue::new();
        let mut scheduler = FrameScheduler::new(main_only(), &queue);

        let mut call = scheduler.fixture().call(LightId::Main).unwrap();
        call.set_state(true)
            .set_transition_length(Duration::from_ticks(0));
        queue.try_send(LightId::Main, call).unwrap();

        let result = scheduler.tick(Instant::from_millis(0));
        assert!(result.wrote_output);
        assert!(scheduler.fixture().main().current_values().is_on());
        assert_eq!(scheduler.fixture().output().writes, 1);
    }
}
