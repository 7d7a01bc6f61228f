mod tests {
    use embassy_time::{Duration, Instant};
    use myrtio_rgbww_composer::{
        ColorMode, ColorModeMask, ColorValue, EffectSlot, LightConfig, LightState, LightTraits,
        PulseEffect, StrobeEffect, StrobeStep,
    };

    fn rgb_light() -> LightState {
        let traits = LightTraits::new(ColorModeMask::from_modes([
            ColorMode::Rgb,
            ColorMode::ColorTemperature,
        ]))
        .with_mireds(150.0, 350.0);
        let mut light = LightState::new(LightConfig::new("Effects"), traits);

        let mut call = light.turn_on();
        call.set_rgb(1.0, 0.0, 0.0)
            .set_transition_length(Duration::from_ticks(0));
        light.perform(call, Instant::from_millis(0));
        light.update(Instant::from_millis(0));
        light
    }

    fn start_effect(light: &mut LightState, effect: EffectSlot) {
        let index = light.add_effect(effect).unwrap();
        let mut call = light.make_call();
        call.set_effect(index);
        light.perform(call, Instant::from_millis(0));
        assert_eq!(light.active_effect_index(), index);
    }

    #[test]
    fn test_pulse_alternates_levels() {
        let mut light = rgb_light();
        let pulse = PulseEffect::new("Breathe")
            .with_transitions(Duration::from_millis(50), Duration::from_millis(50))
            .with_update_interval(Duration::from_millis(100))
            .with_brightness_range(0.2, 0.9);
        start_effect(&mut light, EffectSlot::Pulse(pulse));
        assert_eq!(light.effect_name(), "Breathe");

        light.update(Instant::from_millis(0));
        assert!(light.is_transformer_active());
        light.update(Instant::from_millis(50));
        assert_eq!(light.current_values().brightness(), 0.9);

        light.update(Instant::from_millis(100));
        light.update(Instant::from_millis(150));
        assert_eq!(light.current_values().brightness(), 0.2);

        light.update(Instant::from_millis(200));
        light.update(Instant::from_millis(250));
        assert_eq!(light.current_values().brightness(), 0.9);

        assert_eq!(light.remote_values().brightness(), 1.0);
        assert_eq!(light.active_effect_index(), 1);
    }

    #[test]
    fn test_strobe_cycles_without_stopping() {
        let mut light = rgb_light();
        start_effect(&mut light, EffectSlot::Strobe(StrobeEffect::default()));

        assert!(light.update(Instant::from_millis(0)));
        assert!(light.current_values().is_on());
        assert!(!light.update(Instant::from_millis(100)));

        assert!(light.update(Instant::from_millis(250)));
        assert!(!light.current_values().is_on());
        assert_eq!(light.active_effect_index(), 1);
        assert!(light.remote_values().is_on());

        assert!(light.update(Instant::from_millis(500)));
        assert!(light.current_values().is_on());
    }

    #[test]
    fn test_strobe_custom_steps() {
        let mut light = rgb_light();
        let mut blue = ColorValue::default();
        blue.set_color_mode(ColorMode::Rgb);
        blue.set_state(true);
        blue.set_rgb(0.0, 0.0, 1.0);
        let mut green = blue;
        green.set_rgb(0.0, 1.0, 0.0);

        let mut strobe = StrobeEffect::new("Police");
        for (color, millis) in [(blue, 100), (green, 300)] {
            strobe
                .push_step(StrobeStep {
                    color,
                    duration: Duration::from_millis(millis),
                    transition: Duration::from_ticks(0),
                })
                .unwrap();
        }
        start_effect(&mut light, EffectSlot::Strobe(strobe));

        light.update(Instant::from_millis(0));
        assert_eq!(light.current_values().blue(), 1.0);
        light.update(Instant::from_millis(100));
        assert_eq!(light.current_values().green(), 1.0);
        light.update(Instant::from_millis(300));
        assert_eq!(light.current_values().green(), 1.0);
        light.update(Instant::from_millis(400));
        assert_eq!(light.current_values().blue(), 1.0);
    }

    #[test]
    fn test_strobe_sequence_is_bounded() {
        let mut strobe = StrobeEffect::new("Long");
        let step = StrobeStep {
            color: ColorValue::default(),
            duration: Duration::from_millis(10),
            transition: Duration::from_ticks(0),
        };
        for _ in 0..myrtio_rgbww_composer::effect::MAX_STROBE_STEPS {
            strobe.push_step(step).unwrap();
        }
        assert!(strobe.push_step(step).is_err());
    }
}
