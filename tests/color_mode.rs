mod tests {
    use myrtio_rgbww_composer::{ColorCapability, ColorMode, ColorModeMask};

    #[test]
    fn test_color_mode_from_raw() {
        assert_eq!(ColorMode::from_raw(35), Some(ColorMode::Rgb));
        assert_eq!(ColorMode::from_raw(47), Some(ColorMode::RgbColorTemperature));
        assert_eq!(ColorMode::from_raw(0), Some(ColorMode::Unknown));
        assert_eq!(ColorMode::from_raw(2), None);
    }

    #[test]
    fn test_color_mode_names() {
        assert_eq!(ColorMode::ColorTemperature.as_str(), Some("color_temp"));
        assert_eq!(ColorMode::RgbColdWarmWhite.as_str(), Some("rgbww"));
        assert_eq!(ColorMode::Unknown.as_str(), None);
        assert_eq!(ColorMode::parse_from_str("rgbct"), Some(ColorMode::RgbColorTemperature));
        assert_eq!(ColorMode::parse_from_str("hsv"), None);
    }

    #[test]
    fn test_color_mode_capabilities() {
        let mode = ColorMode::RgbColorTemperature;
        assert!(mode.has(ColorCapability::Rgb));
        assert!(mode.has(ColorCapability::White));
        assert!(mode.has(ColorCapability::ColorTemperature));
        assert!(!mode.has(ColorCapability::ColdWarmWhite));
        assert!(!ColorMode::ColorTemperature.has(ColorCapability::Rgb));
        assert!(!ColorMode::Unknown.has(ColorCapability::OnOff));
    }

    #[test]
    fn test_mask_first_follows_lookup_order() {
        let mask = ColorModeMask::from_modes([ColorMode::RgbWhite, ColorMode::Rgb]);
        assert_eq!(mask.first(), Some(ColorMode::Rgb));
        assert_eq!(mask.len(), 2);

        let mask = ColorModeMask::from_modes([ColorMode::Rgb, ColorMode::ColorTemperature]);
        assert_eq!(mask.first(), Some(ColorMode::ColorTemperature));
    }

    #[test]
    fn test_mask_set_operations() {
        let a = ColorModeMask::from_modes([ColorMode::Rgb, ColorMode::White]);
        let b = ColorModeMask::from_modes([ColorMode::White, ColorMode::ColorTemperature]);

        let both = a.intersection(b);
        assert!(both.contains(ColorMode::White));
        assert!(!both.contains(ColorMode::Rgb));
        assert_eq!(a.union(b).len(), 3);
        assert!(ColorModeMask::EMPTY.is_empty());
        assert_eq!(ColorModeMask::EMPTY.first(), None);
    }

    #[test]
    fn test_mask_capability_query() {
        let mask = ColorModeMask::from_modes([ColorMode::Rgb, ColorMode::ColorTemperature]);
        assert!(mask.has_capability(ColorCapability::ColorTemperature));
        assert!(mask.has_capability(ColorCapability::Brightness));
        assert!(!mask.has_capability(ColorCapability::White));
    }
}
