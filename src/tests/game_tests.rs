#[cfg(test)]
mod tests {
    use crate::game::*;

    #[test]
    fn test_board_dimensions() {
        assert_eq!(BOARD_WIDTH, 10);
        assert_eq!(BOARD_HEIGHT, 20);
    }

    #[test]
    fn test_scoring_constants() {
        assert_eq!(POINTS_PER_LOCK, 10);
        assert_eq!(POINTS_PER_CLEARED_ROW, 100);
    }

    #[test]
    fn test_level_bounds() {
        assert_eq!(STARTING_LEVEL, 1);
        assert_eq!(MAX_LEVEL, 10);
    }

    #[test]
    fn test_drop_interval_shrinks_with_level() {
        // Level 1 uses the base interval
        assert!((drop_interval_secs(1) - 0.8).abs() < f32::EPSILON);

        // Each level shaves a fixed step
        assert!((drop_interval_secs(2) - 0.74).abs() < 0.0001);
        assert!((drop_interval_secs(5) - 0.56).abs() < 0.0001);

        // The interval never drops below the floor
        assert!((drop_interval_secs(11) - 0.2).abs() < f32::EPSILON);
        assert!((drop_interval_secs(100) - 0.2).abs() < f32::EPSILON);

        // Monotonic up to the floor
        for level in 1..MAX_LEVEL {
            assert!(drop_interval_secs(level + 1) <= drop_interval_secs(level));
        }
    }

    #[test]
    fn test_input_window_grows_with_level() {
        assert!((input_window_secs(1) - 10.0).abs() < f32::EPSILON);
        assert!((input_window_secs(2) - 11.0).abs() < f32::EPSILON);
        assert!((input_window_secs(3) - 11.0).abs() < f32::EPSILON);
        assert!((input_window_secs(10) - 15.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_challenge_timing_constants() {
        assert_eq!(SYMBOL_COUNT, 5);
        assert_eq!(COUNTDOWN_STEPS, 3);
        assert!(COUNTDOWN_STEP_SECS > 0.0);
        assert!(DEMO_ON_SECS > DEMO_GAP_SECS);
        assert!(LINE_CLEAR_FLASH_SECS > 0.0);
        assert!(ANIMATION_SECS > 0.0);
    }
}
