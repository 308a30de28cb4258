mod tests {
    use repulsor_fx::classifier::{AngleFilter, tilt_degrees};
    use repulsor_fx::{
        AccelSample, Configuration, DebounceTimings, DeviceState, Duration, GestureClassifier,
        GestureEvent, Instant, TiltAxes,
    };

    const G: f32 = 9.8;

    fn at(ms: u64) -> Instant {
        Instant::from_millis(ms)
    }

    fn config() -> Configuration {
        Configuration {
            angle_window: 1,
            angle_hysteresis: 0.0,
            debounce: DebounceTimings {
                raise: Duration::from_millis(100),
                lower: Duration::from_millis(100),
            },
            ..Configuration::DEFAULT
        }
    }

    fn instant_config() -> Configuration {
        Configuration {
            debounce: DebounceTimings {
                raise: Duration::from_ticks(0),
                lower: Duration::from_ticks(0),
            },
            ..config()
        }
    }

    /// Gravity along Z: tilt 0 degrees
    fn raised(ms: u64) -> AccelSample {
        AccelSample::new(0.0, 0.0, G, at(ms))
    }

    /// Gravity along Y: tilt 90 degrees
    fn lowered(ms: u64) -> AccelSample {
        AccelSample::new(0.0, G, 0.0, at(ms))
    }

    fn tilted(degrees: f32, ms: u64) -> AccelSample {
        let radians = degrees.to_radians();
        AccelSample::new(0.0, G * radians.sin(), G * radians.cos(), at(ms))
    }

    fn thrust(mut sample: AccelSample, x: f32) -> AccelSample {
        sample.x = x;
        sample
    }

    /// Drive a classifier to a debounced "raised" at t=100
    fn raised_classifier(state: DeviceState) -> GestureClassifier {
        let mut classifier = GestureClassifier::new(&config());
        for ms in (0..=100).step_by(10) {
            classifier.classify(&raised(ms), state, at(ms));
        }
        assert!(classifier.is_arm_raised());
        classifier
    }

    #[test]
    fn test_tilt_degrees() {
        let axes = Configuration::DEFAULT.tilt_axes;
        assert!(tilt_degrees(&raised(0), axes).abs() < 1e-3);
        assert!((tilt_degrees(&lowered(0), axes) - 90.0).abs() < 1e-3);
        assert!((tilt_degrees(&AccelSample::new(0.0, G, G, at(0)), axes) - 45.0).abs() < 1e-3);
        assert!((tilt_degrees(&AccelSample::new(0.0, -G, G, at(0)), axes) + 45.0).abs() < 1e-3);
    }

    #[test]
    fn test_tilt_axes_are_configurable() {
        let axes = TiltAxes {
            opposite: repulsor_fx::Axis::X,
            adjacent: repulsor_fx::Axis::Y,
        };
        let sample = AccelSample::new(G, 0.0, 0.0, at(0));
        assert!((tilt_degrees(&sample, axes) - 90.0).abs() < 1e-3);
    }

    #[test]
    fn test_angle_filter_averages_gravity_vector() {
        let mut filter = AngleFilter::new(4);
        assert!((filter.push(1.0, 0.0) - 90.0).abs() < 1e-3);
        assert!((filter.push(1.0, 0.0) - 90.0).abs() < 1e-3);
        assert!((filter.push(0.0, 1.0) - 63.435).abs() < 1e-2);
        assert!((filter.push(0.0, 1.0) - 45.0).abs() < 1e-3);
        assert!((filter.push(0.0, 1.0) - 18.435).abs() < 1e-2);
        assert!(filter.push(0.0, 1.0).abs() < 1e-3);

        filter.clear();
        assert!((filter.push(1.0, 1.0) - 45.0).abs() < 1e-3);
    }

    #[test]
    fn test_angle_filter_across_half_turn() {
        let mut filter = AngleFilter::new(4);
        filter.push(0.05, -1.0);
        let angle = filter.push(-0.05, -1.0);
        assert!((angle.abs() - 180.0).abs() < 1e-3, "smoothed to {angle}");
    }

    #[test]
    fn test_angle_filter_clamps_window() {
        let mut filter = AngleFilter::new(0);
        filter.push(1.0, 0.0);
        assert!(filter.push(0.0, 1.0).abs() < 1e-3);
    }

    #[test]
    fn test_activate_once_after_hold() {
        let mut classifier = GestureClassifier::new(&config());
        let mut events = Vec::new();

        for ms in (0..=1000).step_by(10) {
            if let Some(event) = classifier.classify(&raised(ms), DeviceState::Idle, at(ms)) {
                events.push((ms, event));
            }
        }

        assert_eq!(events, vec![(100, GestureEvent::Activate)]);
    }

    #[test]
    fn test_deactivate_once_after_hold() {
        let mut classifier = raised_classifier(DeviceState::Idle);
        let mut events = Vec::new();

        for ms in (200..=1000).step_by(10) {
            if let Some(event) = classifier.classify(&lowered(ms), DeviceState::Active, at(ms)) {
                events.push((ms, event));
            }
        }

        assert_eq!(events, vec![(300, GestureEvent::Deactivate)]);
        assert!(!classifier.is_arm_raised());
    }

    #[test]
    fn test_short_raise_is_ignored() {
        let mut classifier = GestureClassifier::new(&config());

        for ms in (0..=50).step_by(10) {
            assert_eq!(classifier.classify(&raised(ms), DeviceState::Idle, at(ms)), None);
        }
        for ms in (60..=500).step_by(10) {
            assert_eq!(classifier.classify(&lowered(ms), DeviceState::Idle, at(ms)), None);
        }
    }

    #[test]
    fn test_blast_only_while_active() {
        for state in DeviceState::ALL {
            let mut classifier = GestureClassifier::new(&config());
            assert_eq!(classifier.classify(&lowered(0), state, at(0)), None);

            let event = classifier.classify(&thrust(lowered(10), 8.0), state, at(10));
            if state == DeviceState::Active {
                assert_eq!(event, Some(GestureEvent::Blast), "{state:?}");
            } else {
                assert_eq!(event, None, "{state:?}");
            }
        }
    }

    #[test]
    fn test_blast_uses_magnitude() {
        let mut classifier = GestureClassifier::new(&config());
        let event = classifier.classify(&thrust(lowered(0), -8.0), DeviceState::Active, at(0));
        assert_eq!(event, Some(GestureEvent::Blast));
    }

    #[test]
    fn test_blast_below_threshold() {
        let mut classifier = GestureClassifier::new(&config());
        let event = classifier.classify(&thrust(lowered(0), 6.5), DeviceState::Active, at(0));
        assert_eq!(event, None);
    }

    #[test]
    fn test_blast_cooldown() {
        let mut classifier = GestureClassifier::new(&config());
        let active = DeviceState::Active;

        assert_eq!(
            classifier.classify(&thrust(lowered(0), 8.0), active, at(0)),
            Some(GestureEvent::Blast)
        );
        assert_eq!(classifier.classify(&thrust(lowered(500), 8.0), active, at(500)), None);
        assert_eq!(classifier.classify(&thrust(lowered(999), 8.0), active, at(999)), None);
        assert_eq!(
            classifier.classify(&thrust(lowered(1000), 8.0), active, at(1000)),
            Some(GestureEvent::Blast)
        );
    }

    #[test]
    fn test_ignored_thrust_does_not_start_cooldown() {
        let mut classifier = GestureClassifier::new(&config());

        assert_eq!(
            classifier.classify(&thrust(lowered(0), 8.0), DeviceState::Activating, at(0)),
            None
        );
        assert_eq!(
            classifier.classify(&thrust(lowered(10), 8.0), DeviceState::Active, at(10)),
            Some(GestureEvent::Blast)
        );
    }

    #[test]
    fn test_angle_edge_defers_blast_one_tick() {
        let mut classifier = raised_classifier(DeviceState::Active);
        let active = DeviceState::Active;

        assert_eq!(classifier.classify(&lowered(1000), active, at(1000)), None);
        assert_eq!(classifier.classify(&lowered(1050), active, at(1050)), None);
        assert_eq!(
            classifier.classify(&thrust(lowered(1100), 8.0), active, at(1100)),
            Some(GestureEvent::Deactivate)
        );
        assert_eq!(
            classifier.classify(&lowered(1110), active, at(1110)),
            Some(GestureEvent::Blast)
        );
        assert_eq!(classifier.classify(&lowered(1120), active, at(1120)), None);
    }

    #[test]
    fn test_deferred_blast_is_dropped_when_not_active() {
        let mut classifier = raised_classifier(DeviceState::Active);

        classifier.classify(&lowered(1000), DeviceState::Active, at(1000));
        assert_eq!(
            classifier.classify(&thrust(lowered(1100), 8.0), DeviceState::Active, at(1100)),
            Some(GestureEvent::Deactivate)
        );
        assert_eq!(
            classifier.classify(&lowered(1110), DeviceState::Deactivating, at(1110)),
            None
        );
        assert_eq!(classifier.classify(&lowered(1120), DeviceState::Active, at(1120)), None);
    }

    #[test]
    fn test_hold_never_blasts() {
        let mut classifier = GestureClassifier::new(&config());

        classifier.classify(&thrust(lowered(0), 8.0), DeviceState::Idle, at(0));
        for ms in (10..=200).step_by(10) {
            assert_eq!(classifier.hold(DeviceState::Active, at(ms)), None);
        }
    }

    #[test]
    fn test_hold_keeps_debouncing() {
        let mut classifier = GestureClassifier::new(&config());

        assert_eq!(classifier.classify(&raised(0), DeviceState::Idle, at(0)), None);
        assert_eq!(classifier.hold(DeviceState::Idle, at(50)), None);
        assert_eq!(
            classifier.hold(DeviceState::Idle, at(100)),
            Some(GestureEvent::Activate)
        );
    }

    #[test]
    fn test_hysteresis() {
        let config = Configuration {
            angle_hysteresis: 5.0,
            ..instant_config()
        };
        let mut classifier = GestureClassifier::new(&config);
        let idle = DeviceState::Idle;

        assert_eq!(
            classifier.classify(&tilted(30.0, 0), idle, at(0)),
            Some(GestureEvent::Activate)
        );
        assert_eq!(classifier.classify(&tilted(38.0, 10), idle, at(10)), None);
        assert!(classifier.is_arm_raised());
        assert_eq!(
            classifier.classify(&tilted(41.0, 20), idle, at(20)),
            Some(GestureEvent::Deactivate)
        );
        assert_eq!(classifier.classify(&tilted(38.0, 30), idle, at(30)), None);
        assert_eq!(
            classifier.classify(&tilted(34.0, 40), idle, at(40)),
            Some(GestureEvent::Activate)
        );
    }

    #[test]
    fn test_angle_below_threshold_reads_raised() {
        let mut classifier = GestureClassifier::new(&instant_config());
        assert_eq!(
            classifier.classify(&tilted(34.9, 0), DeviceState::Idle, at(0)),
            Some(GestureEvent::Activate)
        );
    }

    #[test]
    fn test_smoothing_rejects_single_spike() {
        let config = Configuration {
            angle_window: 4,
            ..instant_config()
        };
        let mut classifier = GestureClassifier::new(&config);
        let idle = DeviceState::Idle;

        for ms in [0, 10, 20] {
            assert_eq!(classifier.classify(&lowered(ms), idle, at(ms)), None);
        }
        assert_eq!(classifier.classify(&raised(30), idle, at(30)), None);
        // atan2(3g, g)
        assert!((classifier.angle() - 71.565).abs() < 1e-2);
        assert_eq!(classifier.classify(&lowered(40), idle, at(40)), None);
    }

    #[test]
    fn test_upside_down_noise_stays_lowered() {
        let mut classifier = GestureClassifier::new(&Configuration::DEFAULT);

        for step in 0..100u64 {
            let noise = if step % 2 == 0 { 0.05 } else { -0.05 };
            let ms = step * 10;
            let sample = AccelSample::new(0.0, noise, -G, at(ms));
            let event = classifier.classify(&sample, DeviceState::Idle, at(ms));
            assert_eq!(event, None, "at {ms} ms, angle {}", classifier.angle());
        }
        assert!(classifier.angle().abs() > 170.0);
        assert!(!classifier.is_arm_raised());
    }

    #[test]
    fn test_reset_forgets_raised_arm() {
        let mut classifier = raised_classifier(DeviceState::Idle);

        classifier.reset(at(200));
        assert!(!classifier.is_arm_raised());
        assert_eq!(classifier.classify(&raised(210), DeviceState::Idle, at(210)), None);
        assert_eq!(
            classifier.classify(&raised(310), DeviceState::Idle, at(310)),
            Some(GestureEvent::Activate)
        );
    }
}
