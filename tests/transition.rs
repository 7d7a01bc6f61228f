mod tests {
    use embassy_time::{Duration, Instant};
    use myrtio_rgbww_composer::{
        ColorMode, ColorValue,
        gamma::{perceptual_gamma, perceptual_gamma_inverse, smootherstep},
        transition::{
            FlashTransformer, LightTransformer, LinearFade, PerceptualFade, Timing,
            TransitionKind,
        },
    };

    const MIREDS: (f32, f32) = (150.0, 350.0);

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-4
    }

    fn rgb(red: f32, green: f32, blue: f32) -> ColorValue {
        let mut value = ColorValue::default();
        value.set_color_mode(ColorMode::Rgb);
        value.set_state(true);
        value.set_rgb(red, green, blue);
        value
    }

    fn warm_white() -> ColorValue {
        let mut value = ColorValue::default();
        value.set_color_mode(ColorMode::ColorTemperature);
        value.set_state(true);
        value.set_color_temperature(350.0);
        value
    }

    #[test]
    fn test_timing_progress() {
        let timing = Timing::new(Instant::from_millis(100), Duration::from_millis(200));
        assert_eq!(timing.progress(Instant::from_millis(50)), 0.0);
        assert!(approx(timing.progress(Instant::from_millis(200)), 0.5));
        assert_eq!(timing.progress(Instant::from_millis(400)), 1.0);
        assert!(!timing.is_finished(Instant::from_millis(299)));
        assert!(timing.is_finished(Instant::from_millis(300)));

        let instant = Timing::new(Instant::from_millis(0), Duration::from_ticks(0));
        assert_eq!(instant.progress(Instant::from_millis(0)), 1.0);
    }

    #[test]
    fn test_smootherstep_shape() {
        assert_eq!(smootherstep(0.0), 0.0);
        assert_eq!(smootherstep(1.0), 1.0);
        assert!(approx(smootherstep(0.5), 0.5));
        assert!(smootherstep(0.1) < 0.1);
        assert!(smootherstep(0.9) > 0.9);
    }

    #[test]
    fn test_perceptual_gamma_segments() {
        assert_eq!(perceptual_gamma(0.0), 0.0);
        assert_eq!(perceptual_gamma(1.0), 1.0);
        assert!(approx(perceptual_gamma(384.0 / 1023.0), 192.0 / 1023.0));
        assert!(approx(perceptual_gamma(768.0 / 1023.0), 576.0 / 1023.0));
        assert!(approx(perceptual_gamma_inverse(576.0 / 1023.0), 768.0 / 1023.0));
        assert_eq!(perceptual_gamma(-0.5), 0.0);
    }

    #[test]
    fn test_perceptual_fade_turns_on_from_black() {
        let mut off = warm_white();
        off.set_state(false);
        let now = Instant::from_millis(0);
        let mut fade =
            PerceptualFade::new(off, warm_white(), Duration::from_millis(1000), now, MIREDS);

        let first = fade.apply(now, &off).unwrap();
        assert!(first.is_raw());
        assert!(first.is_on());
        assert_eq!(first.brightness(), 0.0);

        let middle = fade.apply(Instant::from_millis(500), &first).unwrap();
        assert!(middle.brightness() > 0.0 && middle.brightness() < 1.0);
        assert!(approx(middle.color_temperature(), 350.0));

        let end = Instant::from_millis(1000);
        let last = fade.apply(end, &middle).unwrap();
        assert!(approx(last.brightness(), 1.0));
        assert!(fade.is_finished(end));
        assert_eq!(fade.target_values(), &warm_white());
    }

    #[test]
    fn test_perceptual_fade_moves_temperature() {
        let mut cold = warm_white();
        cold.set_color_temperature(150.0);
        let now = Instant::from_millis(0);
        let mut fade =
            PerceptualFade::new(cold, warm_white(), Duration::from_millis(100), now, MIREDS);

        let start = fade.apply(now, &cold).unwrap();
        assert!(approx(start.color_temperature(), 150.0));
        let middle = fade.apply(Instant::from_millis(50), &start).unwrap();
        assert!(approx(middle.color_temperature(), 250.0));
    }

    #[test]
    fn test_perceptual_fade_turns_off_keeping_color() {
        let red = rgb(1.0, 0.0, 0.0);
        let mut off = red;
        off.set_state(false);
        let now = Instant::from_millis(0);
        let mut fade = PerceptualFade::new(red, off, Duration::from_millis(100), now, MIREDS);

        let middle = fade.apply(Instant::from_millis(50), &red).unwrap();
        assert!(middle.red() > 0.0 && middle.red() < 1.0);
        assert_eq!(middle.green(), 0.0);

        let last = fade.apply(Instant::from_millis(100), &middle).unwrap();
        assert_eq!(last.red(), 0.0);
        assert!(!fade.target_values().is_on());
    }

    #[test]
    fn test_linear_fade_midpoint() {
        let mut from = rgb(1.0, 1.0, 1.0);
        from.set_brightness(0.2);
        let mut to = from;
        to.set_brightness(0.8);
        let mut fade = LinearFade::new(from, to, Duration::from_millis(100), Instant::from_millis(0));

        let middle = fade.apply(Instant::from_millis(50), &from).unwrap();
        assert!(approx(middle.brightness(), 0.5));
        assert!(!middle.is_raw());
        assert!(fade.is_finished(Instant::from_millis(100)));
    }

    #[test]
    fn test_flash_holds_then_restores() {
        let restore = rgb(1.0, 0.0, 0.0);
        let target = rgb(0.0, 1.0, 0.0);
        let mut flash = FlashTransformer::new(
            restore,
            target,
            Duration::from_millis(1000),
            Instant::from_millis(0),
            Duration::from_ticks(0),
            TransitionKind::Perceptual,
            restore,
            MIREDS,
        );

        let shown = flash.apply(Instant::from_millis(0), &restore).unwrap();
        assert!(shown.green() > 0.9);
        assert_eq!(flash.apply(Instant::from_millis(500), &shown), None);
        assert!(!flash.is_finished(Instant::from_millis(500)));

        let end = Instant::from_millis(1000);
        let back = flash.apply(end, &shown).unwrap();
        assert!(back.red() > 0.9);
        assert!(flash.is_restoring());
        assert!(flash.is_finished(end));
        assert_eq!(flash.stop(), Some(restore));
    }

    #[test]
    fn test_flash_fade_is_capped_at_half_length() {
        let restore = rgb(1.0, 0.0, 0.0);
        let target = rgb(0.0, 0.0, 1.0);
        let mut flash = FlashTransformer::new(
            restore,
            target,
            Duration::from_millis(200),
            Instant::from_millis(0),
            Duration::from_millis(500),
            TransitionKind::Linear,
            restore,
            MIREDS,
        );

        let at_fade_end = flash.apply(Instant::from_millis(100), &restore).unwrap();
        assert!(approx(at_fade_end.blue(), 1.0));
        assert!(!flash.is_restoring());

        let restoring = flash.apply(Instant::from_millis(101), &at_fade_end);
        assert!(restoring.is_some());
        assert!(flash.is_restoring());
    }
}
