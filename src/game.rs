#![warn(clippy::all, clippy::pedantic)]
#![allow(
    // Allow precision loss when deriving float timings from integer millisecond constants
    clippy::cast_precision_loss
)]

// Game board dimensions
pub const BOARD_WIDTH: usize = 10;
pub const BOARD_HEIGHT: usize = 20;

// Level progression
pub const STARTING_LEVEL: u32 = 1;
pub const MAX_LEVEL: u32 = 10; // Clearing the level-10 challenge wins the game

// Scoring
pub const POINTS_PER_LOCK: u32 = 10; // Flat bonus for every locked piece
pub const POINTS_PER_CLEARED_ROW: u32 = 100; // Per row destroyed by a won challenge

// Piece descent timing. The interval shrinks by a fixed step per level and
// never drops below the floor.
pub const BASE_DROP_INTERVAL_MS: u32 = 800;
pub const DROP_INTERVAL_STEP_MS: u32 = 60;
pub const MIN_DROP_INTERVAL_MS: u32 = 200;

// Phase pauses around the memory challenge
pub const LINE_CLEAR_FLASH_SECS: f32 = 1.5; // Pending rows pulse before the challenge opens
pub const ANIMATION_SECS: f32 = 2.0; // Explosion / petrification display time

// Memory challenge tuning
pub const SYMBOL_COUNT: u8 = 5;
pub const COUNTDOWN_STEPS: u8 = 3;
pub const COUNTDOWN_STEP_SECS: f32 = 0.5;
pub const DEMO_LEAD_IN_SECS: f32 = 0.5;
pub const DEMO_ON_SECS: f32 = 0.6;
pub const DEMO_GAP_SECS: f32 = 0.3;
pub const WAITING_SECS: f32 = 0.5;
pub const INPUT_BASE_SECS: u32 = 10;
pub const RESULT_SUCCESS_SECS: f32 = 1.0;
pub const RESULT_FAILURE_SECS: f32 = 2.0;
pub const RESULT_TIMEOUT_SECS: f32 = 1.5;

// Player name length cap for the menu entry field
pub const MAX_NAME_LEN: usize = 10;

/// Seconds between automatic descent steps at the given level.
#[must_use]
pub fn drop_interval_secs(level: u32) -> f32 {
    let reduction = DROP_INTERVAL_STEP_MS * level.saturating_sub(1);
    let ms = BASE_DROP_INTERVAL_MS
        .saturating_sub(reduction)
        .max(MIN_DROP_INTERVAL_MS);
    ms as f32 / 1000.0
}

/// Length of the challenge input window in seconds, growing with level.
#[must_use]
pub fn input_window_secs(level: u32) -> f32 {
    (INPUT_BASE_SECS + level / 2) as f32
}
