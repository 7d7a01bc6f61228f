mod tests {
    use myrtio_rgbww_composer::{
        ColorMode, ColorValue,
        ddp::{FrameError, parse_frame},
    };

    fn frame(pixel: [u8; 3]) -> [u8; 13] {
        let mut payload = [0u8; 13];
        payload[0] = 0x41;
        payload[3] = 0x01;
        payload[10..13].copy_from_slice(&pixel);
        payload
    }

    #[test]
    fn test_frame_while_off_keeps_pixel_levels() {
        let values = parse_frame(&frame([255, 51, 0]), &ColorValue::default()).unwrap();
        assert_eq!(values.color_mode(), ColorMode::Rgb);
        assert!(values.is_on());
        assert!(values.is_raw());
        assert_eq!(values.red(), 1.0);
        assert!((values.green() - 0.2).abs() < 1e-6);
        assert_eq!(values.blue(), 0.0);
        assert_eq!(values.color_temperature(), 250.0);
    }

    #[test]
    fn test_frame_scaled_to_published_brightness() {
        let mut remote = ColorValue::default();
        remote.set_state(true);
        remote.set_brightness(0.5);

        let values = parse_frame(&frame([0, 102, 51]), &remote).unwrap();
        assert_eq!(values.red(), 0.0);
        assert!((values.green() - 0.5).abs() < 1e-6);
        assert!((values.blue() - 0.25).abs() < 1e-6);
    }

    #[test]
    fn test_black_frame_is_not_scaled() {
        let mut remote = ColorValue::default();
        remote.set_state(true);
        let values = parse_frame(&frame([0, 0, 0]), &remote).unwrap();
        assert_eq!((values.red(), values.green(), values.blue()), (0.0, 0.0, 0.0));
    }

    #[test]
    fn test_invalid_frames() {
        let remote = ColorValue::default();
        assert_eq!(
            parse_frame(&[0u8; 12], &remote),
            Err(FrameError::TooShort(12))
        );

        let mut payload = frame([1, 2, 3]);
        payload[7] = 3;
        assert_eq!(parse_frame(&payload, &remote), Err(FrameError::NonZeroOffset));
    }
}
