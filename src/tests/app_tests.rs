#[cfg(test)]
mod tests {
    use crate::app::App;
    use crate::components::{Board, GameState, Position, Tetromino};
    use crate::menu_types::MenuState;

    #[test]
    fn test_new_app_starts_on_the_menu() {
        let app = App::new();
        assert_eq!(app.menu.state, MenuState::MainMenu);
        assert!(!app.should_quit);
        assert!(app.menu.player_name.is_empty());
    }

    #[test]
    fn test_start_refused_without_name() {
        let mut app = App::new();
        assert!(!app.start_game());
        assert_eq!(app.menu.state, MenuState::MainMenu);
    }

    #[test]
    fn test_start_game_enters_play_with_a_piece() {
        let mut app = App::new();
        app.menu.player_name = "ada".to_string();

        assert!(app.start_game());
        assert_eq!(app.menu.state, MenuState::Game);

        let pieces = app
            .world
            .query::<(&Tetromino, &Position)>()
            .iter(&app.world)
            .count();
        assert_eq!(pieces, 1);

        let game_state = app.world.resource::<GameState>();
        assert_eq!(game_state.player_name, "ada");
        assert_eq!(game_state.score, 0);
        assert_eq!(game_state.level, 1);
    }

    #[test]
    fn test_whitespace_name_is_refused() {
        let mut app = App::new();
        app.menu.player_name = "   ".to_string();
        assert!(!app.start_game());
    }

    #[test]
    fn test_reset_clears_board_and_entities() {
        let mut app = App::new();
        app.menu.player_name = "ada".to_string();
        app.start_game();

        {
            let mut board = app.world.resource_mut::<Board>();
            board.cells[0][19] = Some(crate::components::TetrominoType::I);
        }

        app.reset();

        let board = app.world.resource::<Board>();
        assert!(board.cells[0][19].is_none());

        let pieces = app
            .world
            .query::<&Tetromino>()
            .iter(&app.world)
            .count();
        assert_eq!(pieces, 0);
    }

    #[test]
    fn test_back_to_menu_clears_the_run() {
        let mut app = App::new();
        app.menu.player_name = "ada".to_string();
        app.start_game();

        app.back_to_menu();
        assert_eq!(app.menu.state, MenuState::MainMenu);

        let pieces = app
            .world
            .query::<&Tetromino>()
            .iter(&app.world)
            .count();
        assert_eq!(pieces, 0);
    }

    #[test]
    fn test_render_blocks_merge_board_and_piece() {
        let mut app = App::new();
        app.menu.player_name = "ada".to_string();
        app.start_game();

        {
            let mut board = app.world.resource_mut::<Board>();
            board.cells[0][19] = Some(crate::components::TetrominoType::Stone);
        }

        let blocks = app.get_render_blocks();

        // One board cell plus the four cells of the active piece
        assert_eq!(blocks.len(), 5);
        assert!(
            blocks
                .iter()
                .any(|(pos, t)| pos.x == 0
                    && pos.y == 19
                    && *t == crate::components::TetrominoType::Stone)
        );
    }
}
