#![warn(clippy::all, clippy::pedantic)]
#![allow(
    // Allow truncation when casting from usize to i32 since board dimensions are always small enough to fit in i32
    clippy::cast_possible_truncation,
    // Allow sign loss when going from signed to unsigned types since we validate values are non-negative before casting
    clippy::cast_sign_loss,
    // Allow precision loss when casting between numeric types since exact precision isn't critical in this game
    clippy::cast_precision_loss,
    // Allow potential wrapping when casting between types of same size as we validate values are in range
    clippy::cast_possible_wrap,
    // Allow more than 3 bools in structs for game states and input handling where bools represent distinct flags
    clippy::struct_excessive_bools
)]

use bevy_ecs::prelude::*;
use crossterm::event::KeyEvent;

use crate::game::STARTING_LEVEL;
use crate::minigame::Outcome;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TetrominoType {
    I,
    J,
    L,
    O,
    S,
    T,
    Z,
    /// A completed row waiting for the memory challenge. Board-cell tag only.
    Pending,
    /// A petrified row. Board-cell tag only, never clears through play.
    Stone,
}

impl TetrominoType {
    /// Uniform choice among the seven spawnable shapes.
    #[must_use]
    pub fn random() -> Self {
        match fastrand::u8(0..7) {
            0 => TetrominoType::I,
            1 => TetrominoType::J,
            2 => TetrominoType::L,
            3 => TetrominoType::O,
            4 => TetrominoType::S,
            5 => TetrominoType::T,
            _ => TetrominoType::Z,
        }
    }

    /// A fresh owned occupancy matrix for this shape. Always square.
    /// `Pending` and `Stone` are degenerate 1x1 tags that never spawn.
    #[must_use]
    pub fn template(self) -> Vec<Vec<u8>> {
        match self {
            TetrominoType::I => vec![
                vec![0, 1, 0, 0],
                vec![0, 1, 0, 0],
                vec![0, 1, 0, 0],
                vec![0, 1, 0, 0],
            ],
            TetrominoType::J => vec![vec![0, 1, 0], vec![0, 1, 0], vec![1, 1, 0]],
            TetrominoType::L => vec![vec![0, 1, 0], vec![0, 1, 0], vec![0, 1, 1]],
            TetrominoType::O => vec![vec![1, 1], vec![1, 1]],
            TetrominoType::S => vec![vec![0, 1, 1], vec![1, 1, 0], vec![0, 0, 0]],
            TetrominoType::T => vec![vec![1, 1, 1], vec![0, 1, 0], vec![0, 0, 0]],
            TetrominoType::Z => vec![vec![1, 1, 0], vec![0, 1, 1], vec![0, 0, 0]],
            TetrominoType::Pending | TetrominoType::Stone => vec![vec![1]],
        }
    }

    #[must_use]
    pub fn get_color(self) -> ratatui::style::Color {
        match self {
            TetrominoType::I => ratatui::style::Color::Cyan,
            TetrominoType::J => ratatui::style::Color::Blue,
            TetrominoType::L => ratatui::style::Color::LightRed,
            TetrominoType::O => ratatui::style::Color::Yellow,
            TetrominoType::S => ratatui::style::Color::Green,
            TetrominoType::T => ratatui::style::Color::Magenta,
            TetrominoType::Z => ratatui::style::Color::Red,
            TetrominoType::Pending => ratatui::style::Color::LightYellow,
            TetrominoType::Stone => ratatui::style::Color::DarkGray,
        }
    }
}

/// 90 degree clockwise rotation of a square occupancy matrix:
/// `out[i][j] = in[N-1-j][i]`.
#[must_use]
pub fn rotate_matrix(shape: &[Vec<u8>]) -> Vec<Vec<u8>> {
    let n = shape.len();
    let mut out = vec![vec![0u8; n]; n];
    for (i, row) in out.iter_mut().enumerate() {
        for (j, cell) in row.iter_mut().enumerate() {
            *cell = shape[n - 1 - j][i];
        }
    }
    out
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

/// The falling piece. Owns its shape matrix so rotation never touches the
/// shared templates in `TetrominoType::template`.
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct Tetromino {
    pub tetromino_type: TetrominoType,
    pub shape: Vec<Vec<u8>>,
    pub rotation: usize,
}

impl Tetromino {
    #[must_use]
    pub fn new(tetromino_type: TetrominoType) -> Self {
        Self {
            tetromino_type,
            shape: tetromino_type.template(),
            rotation: 0,
        }
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.shape.first().map_or(0, Vec::len)
    }

    /// The shape this piece would have after a clockwise rotation.
    #[must_use]
    pub fn rotated_shape(&self) -> Vec<Vec<u8>> {
        rotate_matrix(&self.shape)
    }

    /// Commits a previously validated rotation.
    pub fn apply_rotation(&mut self, shape: Vec<Vec<u8>>) {
        self.shape = shape;
        self.rotation = (self.rotation + 1) % 4;
    }
}

#[derive(Resource, Debug, Clone)]
pub struct Board {
    pub width: usize,
    pub height: usize,
    pub cells: Vec<Vec<Option<TetrominoType>>>,
}

impl Board {
    #[must_use]
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            cells: vec![vec![None; height]; width],
        }
    }

    pub fn clear(&mut self) {
        for x in 0..self.width {
            for y in 0..self.height {
                self.cells[x][y] = None;
            }
        }
    }

    /// True when the shape fits at `position`: inside the horizontal bounds,
    /// above the floor, and on no occupied cell. Rows above the top are legal
    /// so freshly spawned pieces may overhang the board.
    #[must_use]
    pub fn is_valid_position(&self, position: Position, shape: &[Vec<u8>]) -> bool {
        for (r, row) in shape.iter().enumerate() {
            for (c, &occupied) in row.iter().enumerate() {
                if occupied == 0 {
                    continue;
                }

                let x = position.x + c as i32;
                let y = position.y + r as i32;

                if x < 0 || x >= self.width as i32 || y >= self.height as i32 {
                    return false;
                }

                if y >= 0 && self.cells[x as usize][y as usize].is_some() {
                    return false;
                }
            }
        }

        true
    }

    /// Writes the piece into the grid tagged with its type. Cells that ended
    /// up above row 0 are discarded.
    pub fn lock_tetromino(&mut self, position: Position, tetromino: &Tetromino) {
        for (r, row) in tetromino.shape.iter().enumerate() {
            for (c, &occupied) in row.iter().enumerate() {
                if occupied == 0 {
                    continue;
                }

                let x = position.x + c as i32;
                let y = position.y + r as i32;

                if x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32 {
                    self.cells[x as usize][y as usize] = Some(tetromino.tetromino_type);
                }
            }
        }
    }

    fn row_is_full(&self, y: usize) -> bool {
        (0..self.width).all(|x| self.cells[x][y].is_some())
    }

    fn row_contains(&self, y: usize, tetromino_type: TetrominoType) -> bool {
        (0..self.width).any(|x| self.cells[x][y] == Some(tetromino_type))
    }

    /// Retags every fully occupied row to `Pending`, skipping rows that hold
    /// stone or are pending already. Returns ALL pending row indices on the
    /// board, old and new, in ascending order. Calling this again without an
    /// intervening lock yields the same list.
    pub fn flag_pending_rows(&mut self) -> Vec<usize> {
        let mut pending = Vec::new();

        for y in 0..self.height {
            let already_pending = self.row_contains(y, TetrominoType::Pending);

            if !already_pending
                && self.row_is_full(y)
                && !self.row_contains(y, TetrominoType::Stone)
            {
                for x in 0..self.width {
                    self.cells[x][y] = Some(TetrominoType::Pending);
                }
                pending.push(y);
            } else if already_pending {
                pending.push(y);
            }
        }

        pending
    }

    /// Removes the listed rows, shifts everything above them down and refills
    /// the top with empty rows. Works for any set of indices regardless of
    /// order: rows are retained in one pass rather than spliced one by one.
    pub fn clear_rows(&mut self, rows: &[usize]) {
        let kept: Vec<usize> = (0..self.height).filter(|y| !rows.contains(y)).collect();
        let removed = self.height - kept.len();

        for x in 0..self.width {
            let column: Vec<Option<TetrominoType>> =
                kept.iter().map(|&y| self.cells[x][y]).collect();

            for y in 0..removed {
                self.cells[x][y] = None;
            }
            for (i, cell) in column.into_iter().enumerate() {
                self.cells[x][removed + i] = cell;
            }
        }
    }

    /// Retags every occupied cell in the listed rows to `Stone`. Row contents
    /// and positions are otherwise untouched.
    pub fn petrify_rows(&mut self, rows: &[usize]) {
        for &y in rows {
            if y >= self.height {
                continue;
            }
            for x in 0..self.width {
                if self.cells[x][y].is_some() {
                    self.cells[x][y] = Some(TetrominoType::Stone);
                }
            }
        }
    }
}

/// The in-game phase machine. The menu screens live outside of this, in
/// `menu_types::MenuState`; these phases only apply while a run is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GamePhase {
    #[default]
    Playing,
    /// Pending rows pulse before the challenge opens. Fixed duration.
    LineClear,
    /// The memory challenge owns the screen. Gameplay is suspended.
    Minigame,
    /// Rows explode or petrify. Fixed duration.
    Animating,
    GameOver,
    Victory,
}

#[derive(Debug, Resource, Clone)]
pub struct GameState {
    pub phase: GamePhase,
    pub score: u32,
    pub level: u32,
    pub game_time: u32,
    pub player_name: String,
    /// Ascending indices of rows currently tagged pending on the board.
    pub pending_rows: Vec<usize>,
    /// Rows currently shown exploding during a success animation.
    pub exploding_rows: Vec<usize>,
    /// Outcome of the last resolved challenge, consumed when animation ends.
    pub last_outcome: Option<Outcome>,
    pub drop_timer: f32,
    pub phase_timer: f32,
    pub second_accum: f32,
    /// Set when score or level changed and the resume snapshot needs writing.
    pub progress_dirty: bool,
    pub last_key: Option<KeyEvent>,
}

impl Default for GameState {
    fn default() -> Self {
        Self {
            phase: GamePhase::Playing,
            score: 0,
            level: STARTING_LEVEL,
            game_time: 0,
            player_name: String::new(),
            pending_rows: Vec::new(),
            exploding_rows: Vec::new(),
            last_outcome: None,
            drop_timer: 0.0,
            phase_timer: 0.0,
            second_accum: 0.0,
            progress_dirty: false,
            last_key: None,
        }
    }
}

impl GameState {
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn add_score(&mut self, points: u32) {
        self.score += points;
        self.progress_dirty = true;
    }

    pub fn advance_level(&mut self) {
        self.level += 1;
        self.progress_dirty = true;
    }

    pub fn enter_phase(&mut self, phase: GamePhase) {
        self.phase = phase;
        self.phase_timer = 0.0;
    }

    #[must_use]
    pub fn drop_interval(&self) -> f32 {
        crate::game::drop_interval_secs(self.level)
    }

    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self.phase, GamePhase::GameOver | GamePhase::Victory)
    }
}

// Particle system for visual effects
#[derive(Debug, Clone, Component)]
pub struct Particle {
    pub x: f32,
    pub y: f32,
    pub velocity: (f32, f32),
    pub color: ratatui::style::Color,
    pub lifetime: f32,
    pub size: f32,
}

// Screen shake effect
#[derive(Debug, Clone, Resource, Default)]
pub struct ScreenShake {
    pub intensity: f32,
    pub duration: f32,
    pub current_offset: (i16, i16),
    pub is_active: bool,
}

// Input state for keyboard controls. Flags are set by the event pump and
// consumed by the systems on the next game tick.
#[derive(Resource, Debug, Clone, Default)]
pub struct Input {
    pub left: bool,
    pub right: bool,
    pub down: bool,
    pub rotate: bool,
    pub hard_drop: bool,
    pub hard_drop_released: bool, // Track if the hard drop key has been released
    pub minigame_press: Option<u8>, // Challenge pad symbol pressed this tick
}

impl Input {
    /// Clears per-tick intents while keeping key-release tracking.
    pub fn clear_intents(&mut self) {
        let was_hard_drop_released = self.hard_drop_released;
        *self = Self::default();
        self.hard_drop_released = was_hard_drop_released;
    }
}
