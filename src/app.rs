#![warn(clippy::all, clippy::pedantic)]
#![allow(
    // Allow truncation when casting from usize to i32 since board dimensions are always small enough to fit in i32
    clippy::cast_possible_truncation,
    // Allow potential wrapping when casting between types as board coordinates are within reasonable ranges
    clippy::cast_possible_wrap
)]

use bevy_ecs::prelude::*;
use log::info;
use std::error;

use crate::Time;
use crate::components::{Board, GameState, Input, Position, ScreenShake, Tetromino, TetrominoType};
use crate::game::{BOARD_HEIGHT, BOARD_WIDTH};
use crate::menu_types::{Menu, MenuState};
use crate::minigame::Minigame;
use crate::persistence::Storage;
use crate::sound::{AudioState, SoundEffect};
use crate::systems::spawn_tetromino;

pub type AppResult<T> = std::result::Result<T, Box<dyn error::Error>>;

pub struct App {
    pub world: World,
    pub should_quit: bool,
    pub menu: Menu,
}

impl App {
    #[must_use]
    pub fn new() -> Self {
        let mut world = World::new();
        world.insert_resource(Time::new());
        world.insert_resource(AudioState::new());
        world.insert_resource(Input::default());
        world.insert_resource(GameState::default());
        world.insert_resource(ScreenShake::default());
        world.insert_resource(Board::new(BOARD_WIDTH, BOARD_HEIGHT));
        world.insert_resource(Storage::load());

        Self {
            world,
            should_quit: false,
            menu: Menu::new(),
        }
    }

    /// The merged display grid: static board cells plus the active piece
    /// overlay. Exploding rows are carried separately in `GameState`.
    pub fn get_render_blocks(&mut self) -> Vec<(Position, TetrominoType)> {
        let mut blocks = Vec::new();

        if let Some(board) = self.world.get_resource::<Board>() {
            for x in 0..board.width {
                for y in 0..board.height {
                    if let Some(tetromino_type) = board.cells[x][y] {
                        blocks.push((
                            Position {
                                x: x as i32,
                                y: y as i32,
                            },
                            tetromino_type,
                        ));
                    }
                }
            }
        }

        let piece_blocks: Vec<_> = self
            .world
            .query::<(&Tetromino, &Position)>()
            .iter(&self.world)
            .flat_map(|(tetromino, pos)| {
                let mut cells = Vec::new();
                for (r, row) in tetromino.shape.iter().enumerate() {
                    for (c, &occupied) in row.iter().enumerate() {
                        if occupied != 0 {
                            cells.push((
                                Position {
                                    x: pos.x + c as i32,
                                    y: pos.y + r as i32,
                                },
                                tetromino.tetromino_type,
                            ));
                        }
                    }
                }
                cells
            })
            .collect();

        blocks.extend(piece_blocks);
        blocks
    }

    /// Clears the run state: board, entities, input, timers. Audio and
    /// storage survive a reset.
    pub fn reset(&mut self) {
        self.world.clear_entities();
        self.world.remove_resource::<Minigame>();

        let mut game_state = GameState::default();
        game_state.player_name.clone_from(&self.menu.player_name);
        self.world.insert_resource(game_state);

        self.world
            .insert_resource(Board::new(BOARD_WIDTH, BOARD_HEIGHT));
        self.world.insert_resource(ScreenShake::default());

        self.world.insert_resource(Input {
            hard_drop_released: true,
            ..Input::default()
        });
    }

    /// Starts a new run. Refused while the name field is empty.
    pub fn start_game(&mut self) -> bool {
        if self.menu.player_name.trim().is_empty() {
            return false;
        }

        info!("Starting new game for {}", self.menu.player_name);
        self.reset();
        self.menu.state = MenuState::Game;

        spawn_tetromino(&mut self.world);

        let audio_state = self.world.resource::<AudioState>();
        audio_state.play_sound(SoundEffect::GameStart);

        true
    }

    /// Resumes the saved run, if there is one, onto a fresh board.
    pub fn resume_game(&mut self) -> bool {
        let Some(progress) = self
            .world
            .resource::<Storage>()
            .snapshot
            .clone()
        else {
            return false;
        };

        info!(
            "Resuming game for {} at level {}",
            progress.player_name, progress.level
        );

        self.menu.player_name.clone_from(&progress.player_name);
        self.reset();

        {
            let mut game_state = self.world.resource_mut::<GameState>();
            game_state.level = progress.level;
            game_state.score = progress.score;
            game_state.game_time = progress.game_time;
        }

        self.menu.state = MenuState::Game;
        spawn_tetromino(&mut self.world);

        let audio_state = self.world.resource::<AudioState>();
        audio_state.play_sound(SoundEffect::GameStart);

        true
    }

    /// Back to the main menu after a finished (or abandoned) run.
    pub fn back_to_menu(&mut self) {
        self.world.clear_entities();
        self.world.remove_resource::<Minigame>();
        self.menu.state = MenuState::MainMenu;
        self.menu.selected_option = crate::menu_types::MenuOption::NewGame;
    }

    #[must_use]
    pub fn has_snapshot(&self) -> bool {
        self.world.resource::<Storage>().has_snapshot()
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
