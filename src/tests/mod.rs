#![warn(clippy::all, clippy::pedantic)]

// Test modules
pub mod app_tests;
pub mod config_tests;
pub mod game_tests;
pub mod integration_tests;
pub mod leaderboard_tests;
pub mod persistence_tests;
pub mod share_tests;
pub mod sound_tests;
pub mod time_tests;

// Import test utilities
#[cfg(test)]
pub mod test_utils {
    use crate::Time;
    use crate::components::{
        Board, GameState, Input, Position, ScreenShake, Tetromino, TetrominoType,
    };
    use crate::persistence::Storage;
    use crate::sound::AudioState;
    use bevy_ecs::prelude::*;
    use std::path::PathBuf;

    // Unique scratch directory so parallel tests never share files
    #[must_use]
    pub fn temp_storage_dir() -> PathBuf {
        std::env::temp_dir().join(format!("tetracube-test-{}", fastrand::u64(..)))
    }

    // Helper function to create a test world with every game resource
    #[must_use]
    pub fn create_test_world() -> World {
        let mut world = World::new();
        world.insert_resource(GameState::default());

        world.insert_resource(Input {
            hard_drop_released: true,
            ..Input::default()
        });

        world.insert_resource(ScreenShake::default());
        world.insert_resource(Board::new(crate::game::BOARD_WIDTH, crate::game::BOARD_HEIGHT));
        world.insert_resource(Time::new());
        world.insert_resource(Storage::open(temp_storage_dir()));
        world.insert_resource(AudioState::new());

        world
    }

    // Helper to fill a board with a specific pattern for testing
    pub fn fill_test_board(board: &mut Board, pattern: &[(usize, usize, TetrominoType)]) {
        for (x, y, tetromino_type) in pattern {
            if *x < board.width && *y < board.height {
                board.cells[*x][*y] = Some(*tetromino_type);
            }
        }
    }

    // Helper to fill a whole row with one cell type
    pub fn fill_row(board: &mut Board, y: usize, tetromino_type: TetrominoType) {
        for x in 0..board.width {
            board.cells[x][y] = Some(tetromino_type);
        }
    }

    // Helper to place a specific active piece in the world
    pub fn spawn_piece_at(
        world: &mut World,
        tetromino_type: TetrominoType,
        x: i32,
        y: i32,
    ) -> Entity {
        world
            .spawn((Tetromino::new(tetromino_type), Position { x, y }))
            .id()
    }
}
