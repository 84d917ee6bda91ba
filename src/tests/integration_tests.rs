#[cfg(test)]
mod tests {
    use crate::components::{
        Board, GamePhase, GameState, Input, Tetromino, TetrominoType,
    };
    use crate::game::{
        ANIMATION_SECS, LINE_CLEAR_FLASH_SECS, POINTS_PER_CLEARED_ROW, RESULT_TIMEOUT_SECS,
    };
    use crate::leaderboard::SavedProgress;
    use crate::minigame::{Minigame, MinigamePhase};
    use crate::persistence::Storage;
    use crate::systems::{game_tick_system, input_system, spawn_tetromino};
    use crate::tests::test_utils::{create_test_world, fill_row, spawn_piece_at};
    use bevy_ecs::prelude::World;

    /// Runs game ticks until the challenge reaches its input phase.
    fn tick_to_challenge_input(world: &mut World) {
        for _ in 0..10_000 {
            if let Some(minigame) = world.get_resource::<Minigame>() {
                if minigame.phase == MinigamePhase::Input {
                    return;
                }
            }
            game_tick_system(world, 0.05);
        }
        panic!("challenge never opened its input window");
    }

    fn press_symbol(world: &mut World, symbol: u8) {
        {
            let mut input = world.resource_mut::<Input>();
            input.minigame_press = Some(symbol);
        }
        game_tick_system(world, 0.01);
    }

    // Scenario: one locked piece completes a row at level 1, which meets the
    // threshold and summons the challenge.
    #[test]
    fn test_full_row_at_level_one_triggers_challenge() {
        let mut world = create_test_world();

        {
            let mut board = world.resource_mut::<Board>();
            fill_row(&mut board, 19, TetrominoType::J);
            board.cells[4][19] = None;
            board.cells[5][19] = None;
        }

        spawn_piece_at(&mut world, TetrominoType::O, 4, 18);
        {
            let mut input = world.resource_mut::<Input>();
            input.hard_drop = true;
        }
        input_system(&mut world);

        assert_eq!(world.resource::<GameState>().phase, GamePhase::LineClear);

        // The flash pause runs its fixed course, then the challenge opens
        game_tick_system(&mut world, LINE_CLEAR_FLASH_SECS + 0.1);
        assert_eq!(world.resource::<GameState>().phase, GamePhase::Minigame);

        let minigame = world.resource::<Minigame>();
        assert_eq!(minigame.level, 1);
        assert_eq!(minigame.pending_rows, 1);
        assert_eq!(minigame.sequence.len(), 1);
    }

    // Scenario: the level-2 challenge is answered correctly, the two pending
    // rows explode, content shifts down and the level advances.
    #[test]
    fn test_won_challenge_clears_rows_and_levels_up() {
        let mut world = create_test_world();

        {
            let mut game_state = world.resource_mut::<GameState>();
            game_state.level = 2;
            game_state.pending_rows = vec![18, 19];
            game_state.enter_phase(GamePhase::Minigame);
        }
        {
            let mut board = world.resource_mut::<Board>();
            fill_row(&mut board, 18, TetrominoType::Pending);
            fill_row(&mut board, 19, TetrominoType::Pending);
            board.cells[0][17] = Some(TetrominoType::T); // survivor above the pile
        }

        tick_to_challenge_input(&mut world);

        // No adjacent repeats at level 2, and a known sequence for the test
        {
            let mut minigame = world.resource_mut::<Minigame>();
            assert_eq!(minigame.sequence.len(), 2);
            assert_ne!(minigame.sequence[0], minigame.sequence[1]);
            minigame.sequence = vec![0, 1];
        }

        let score_before = world.resource::<GameState>().score;

        press_symbol(&mut world, 0);
        press_symbol(&mut world, 1);

        // Let the result display delay run out, then the explosion animation
        for _ in 0..60 {
            game_tick_system(&mut world, 0.05);
            if world.resource::<GameState>().phase == GamePhase::Animating {
                break;
            }
        }
        assert_eq!(world.resource::<GameState>().phase, GamePhase::Animating);
        game_tick_system(&mut world, ANIMATION_SECS + 0.1);

        let game_state = world.resource::<GameState>();
        assert_eq!(game_state.phase, GamePhase::Playing);
        assert_eq!(game_state.level, 3);
        assert!(game_state.pending_rows.is_empty());
        assert_eq!(
            game_state.score,
            score_before + 2 * POINTS_PER_CLEARED_ROW
        );

        // The survivor shifted down by the two cleared rows
        let board = world.resource::<Board>();
        assert_eq!(board.cells[0][19], Some(TetrominoType::T));
        assert_eq!(board.cells[0][17], None);

        // Play resumed with a fresh piece
        let pieces = world
            .query::<&Tetromino>()
            .iter(&world)
            .count();
        assert_eq!(pieces, 1);
    }

    // Scenario: the challenge times out, the pending rows petrify in place
    // and play resumes at the same level.
    #[test]
    fn test_timed_out_challenge_petrifies_rows() {
        let mut world = create_test_world();

        {
            let mut game_state = world.resource_mut::<GameState>();
            game_state.level = 2;
            game_state.pending_rows = vec![18, 19];
            game_state.enter_phase(GamePhase::Minigame);
        }
        {
            let mut board = world.resource_mut::<Board>();
            fill_row(&mut board, 18, TetrominoType::Pending);
            fill_row(&mut board, 19, TetrominoType::Pending);
        }

        tick_to_challenge_input(&mut world);

        // Run the whole input window down without pressing anything
        let window = world.resource::<Minigame>().input_window();
        game_tick_system(&mut world, window + 0.1);
        game_tick_system(&mut world, RESULT_TIMEOUT_SECS + 0.1);

        assert_eq!(world.resource::<GameState>().phase, GamePhase::Animating);

        game_tick_system(&mut world, ANIMATION_SECS + 0.1);

        let game_state = world.resource::<GameState>();
        assert_eq!(game_state.phase, GamePhase::Playing);
        assert_eq!(game_state.level, 2); // no level change on failure
        assert!(game_state.pending_rows.is_empty());

        let board = world.resource::<Board>();
        for y in [18, 19] {
            for x in 0..board.width {
                assert_eq!(board.cells[x][y], Some(TetrominoType::Stone));
            }
        }

        // The engine was torn down with the round
        assert!(world.get_resource::<Minigame>().is_none());
    }

    // Clearing the final level's challenge wins the run instead of starting
    // another level.
    #[test]
    fn test_last_level_success_is_victory() {
        let mut world = create_test_world();

        {
            let mut game_state = world.resource_mut::<GameState>();
            game_state.player_name = "ada".to_string();
            game_state.level = crate::game::MAX_LEVEL;
            game_state.score = 5000;
            game_state.exploding_rows = (10..20).collect();
            game_state.last_outcome = Some(crate::minigame::Outcome::Success);
            game_state.enter_phase(GamePhase::Animating);
        }
        {
            let mut board = world.resource_mut::<Board>();
            for y in 10..20 {
                fill_row(&mut board, y, TetrominoType::Pending);
            }
        }

        game_tick_system(&mut world, ANIMATION_SECS + 0.1);

        let game_state = world.resource::<GameState>();
        assert_eq!(game_state.phase, GamePhase::Victory);
        assert_eq!(game_state.level, crate::game::MAX_LEVEL); // level does not overflow

        let storage = world.resource::<Storage>();
        assert_eq!(storage.leaderboard.entries.len(), 1);
        assert_eq!(storage.leaderboard.entries[0].level, crate::game::MAX_LEVEL);

        // No piece falls on the victory screen
        let pieces = world.query::<&Tetromino>().iter(&world).count();
        assert_eq!(pieces, 0);
    }

    // Scenario: a blocked spawn position ends the run, finalizes the
    // leaderboard and discards the resume snapshot.
    #[test]
    fn test_blocked_spawn_ends_the_run() {
        let mut world = create_test_world();

        {
            let mut game_state = world.resource_mut::<GameState>();
            game_state.player_name = "ada".to_string();
            game_state.score = 340;
        }
        {
            let mut storage = world.resource_mut::<Storage>();
            storage.save_snapshot(SavedProgress {
                player_name: "ada".to_string(),
                level: 1,
                score: 340,
                game_time: 60,
            });
        }
        {
            let mut board = world.resource_mut::<Board>();
            for y in 0..4 {
                fill_row(&mut board, y, TetrominoType::Stone);
            }
        }

        spawn_tetromino(&mut world);

        let game_state = world.resource::<GameState>();
        assert_eq!(game_state.phase, GamePhase::GameOver);

        let storage = world.resource::<Storage>();
        assert!(!storage.has_snapshot());
        assert_eq!(storage.leaderboard.entries.len(), 1);
        assert_eq!(storage.leaderboard.entries[0].score, 340);
        assert_eq!(storage.leaderboard.entries[0].name, "ada");
    }

    // A failed round followed by filling the stone board top ends the game
    // through the normal spawn-collision path.
    #[test]
    fn test_wrong_press_fails_the_round() {
        let mut world = create_test_world();

        {
            let mut game_state = world.resource_mut::<GameState>();
            game_state.level = 3;
            game_state.pending_rows = vec![17, 18, 19];
            game_state.enter_phase(GamePhase::Minigame);
        }
        {
            let mut board = world.resource_mut::<Board>();
            for y in [17, 18, 19] {
                fill_row(&mut board, y, TetrominoType::Pending);
            }
        }

        tick_to_challenge_input(&mut world);

        {
            let mut minigame = world.resource_mut::<Minigame>();
            minigame.sequence = vec![0, 1, 0];
        }

        press_symbol(&mut world, 0);
        press_symbol(&mut world, 3); // wrong

        // The round is already resolved; remaining symbols are never needed
        let minigame = world.resource::<Minigame>();
        assert_eq!(minigame.phase, MinigamePhase::Result);
        assert_eq!(minigame.player_sequence.len(), 2);
    }
}
