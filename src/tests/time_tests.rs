#[cfg(test)]
mod tests {
    use crate::Time;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_time_starts_with_zero_delta() {
        let time = Time::new();
        assert!((time.delta_seconds() - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_update_measures_elapsed_time() {
        let mut time = Time::new();
        thread::sleep(Duration::from_millis(15));
        time.update();

        assert!(time.delta_seconds() >= 0.014);
        assert!(time.delta_seconds() < 1.0);
    }

    #[test]
    fn test_consecutive_updates_reset_the_window() {
        let mut time = Time::new();
        thread::sleep(Duration::from_millis(15));
        time.update();
        time.update();

        // The second update measures almost no elapsed time
        assert!(time.delta_seconds() < 0.01);
    }
}
