#![warn(clippy::all, clippy::pedantic)]
#![allow(
    // Allow truncation when casting from usize to i32 since board dimensions are always small enough to fit in i32
    clippy::cast_possible_truncation,
    // Allow potential wrapping when casting between types as board coordinates are within reasonable ranges
    clippy::cast_possible_wrap
)]

use bevy_ecs::prelude::*;
use log::{debug, error, info, trace};
use std::time::{SystemTime, UNIX_EPOCH};

use crate::components::{Board, GamePhase, GameState, Input, Position, Tetromino, TetrominoType};
use crate::game::{
    ANIMATION_SECS, BOARD_WIDTH, LINE_CLEAR_FLASH_SECS, MAX_LEVEL, POINTS_PER_CLEARED_ROW,
    POINTS_PER_LOCK,
};
use crate::leaderboard::{SavedProgress, ScoreEntry};
use crate::minigame::{Minigame, MinigameEvent, Outcome};
use crate::particles;
use crate::persistence::Storage;
use crate::screenshake;
use crate::sound::{AudioState, SoundEffect};

/// Spawns the next piece at the top center of the board. A spawn position
/// that already collides ends the run.
pub fn spawn_tetromino(world: &mut World) {
    // Stale movement intents must not leak onto the fresh piece
    if let Some(mut input) = world.get_resource_mut::<Input>() {
        input.clear_intents();
    }

    let tetromino = Tetromino::new(TetrominoType::random());
    let position = Position {
        x: BOARD_WIDTH as i32 / 2 - tetromino.width() as i32 / 2,
        y: 0,
    };

    let spawn_blocked = {
        let board = world.resource::<Board>();
        !board.is_valid_position(position, &tetromino.shape)
    };

    if spawn_blocked {
        info!("Spawn position blocked, game over");
        handle_game_over(world);
        return;
    }

    world.spawn((tetromino, position));
}

fn active_piece(world: &mut World) -> Option<(Entity, Tetromino, Position)> {
    let mut query = world.query::<(Entity, &Tetromino, &Position)>();
    query
        .iter(world)
        .next()
        .map(|(entity, tetromino, position)| (entity, tetromino.clone(), *position))
}

/// Applies the player's movement intents to the falling piece. Intents are
/// only honored while the run is in the `Playing` phase.
pub fn input_system(world: &mut World) {
    let phase = world.resource::<GameState>().phase;
    if phase != GamePhase::Playing {
        return;
    }

    let input = world.resource::<Input>().clone();
    {
        let mut input = world.resource_mut::<Input>();
        input.clear_intents();
    }

    let Some((entity, tetromino, mut position)) = active_piece(world) else {
        return;
    };

    if input.hard_drop {
        handle_hard_drop(world, entity, &tetromino, position);
        return;
    }

    // Horizontal movement
    if input.left || input.right {
        let dx = if input.left { -1 } else { 1 };
        let new_position = Position {
            x: position.x + dx,
            y: position.y,
        };

        let can_move = {
            let board = world.resource::<Board>();
            board.is_valid_position(new_position, &tetromino.shape)
        };

        if can_move {
            world.entity_mut(entity).insert(new_position);
            position = new_position;
            let audio_state = world.resource::<AudioState>();
            audio_state.play_sound(SoundEffect::Move);
        }
    }

    // Soft drop: one row down, locking on contact
    if input.down {
        let new_position = Position {
            x: position.x,
            y: position.y + 1,
        };

        let can_move_down = {
            let board = world.resource::<Board>();
            board.is_valid_position(new_position, &tetromino.shape)
        };

        if can_move_down {
            world.entity_mut(entity).insert(new_position);
            position = new_position;
            let mut game_state = world.resource_mut::<GameState>();
            game_state.drop_timer = 0.0;
        } else {
            lock_active_piece(world, entity, position, &tetromino);
            return;
        }
    }

    // Rotation, with a single-column wall kick retry
    if input.rotate {
        let rotated = tetromino.rotated_shape();

        let fits_in_place = {
            let board = world.resource::<Board>();
            board.is_valid_position(position, &rotated)
        };

        let committed_position = if fits_in_place {
            Some(position)
        } else {
            // Kick toward the board center: +1 from the left half, -1 otherwise
            let offset = if position.x < BOARD_WIDTH as i32 / 2 {
                1
            } else {
                -1
            };
            let kicked = Position {
                x: position.x + offset,
                y: position.y,
            };
            let board = world.resource::<Board>();
            if board.is_valid_position(kicked, &rotated) {
                Some(kicked)
            } else {
                None
            }
        };

        // Both attempts collided: the rotation is rejected and no cue fires
        if let Some(new_position) = committed_position {
            let mut new_tetromino = tetromino.clone();
            new_tetromino.apply_rotation(rotated);
            world.entity_mut(entity).insert((new_tetromino, new_position));

            let audio_state = world.resource::<AudioState>();
            audio_state.play_sound(SoundEffect::Rotate);
        }
    }
}

/// Walks the piece down to its resting row and locks it there immediately.
fn handle_hard_drop(world: &mut World, entity: Entity, tetromino: &Tetromino, position: Position) {
    let final_position = {
        let board = world.resource::<Board>();
        let mut final_y = position.y;

        loop {
            let next = Position {
                x: position.x,
                y: final_y + 1,
            };
            if !board.is_valid_position(next, &tetromino.shape) {
                break;
            }
            final_y += 1;
        }

        Position {
            x: position.x,
            y: final_y,
        }
    };

    debug!(
        "Hard drop from row {} to row {}",
        position.y, final_position.y
    );

    world.entity_mut(entity).insert(final_position);
    lock_active_piece(world, entity, final_position, tetromino);
}

/// Advances the run by one game tick, dispatching on the current phase.
pub fn game_tick_system(world: &mut World, delta_seconds: f32) {
    trace!("Game tick with delta: {delta_seconds}");

    // Visual effects advance regardless of phase
    particles::update_particles(world, delta_seconds);
    screenshake::update_screen_shake(world, delta_seconds);

    let phase = world.resource::<GameState>().phase;
    match phase {
        GamePhase::Playing => playing_tick(world, delta_seconds),
        GamePhase::LineClear => line_clear_tick(world, delta_seconds),
        GamePhase::Minigame => minigame_tick(world, delta_seconds),
        GamePhase::Animating => animating_tick(world, delta_seconds),
        GamePhase::GameOver | GamePhase::Victory => {}
    }
}

fn playing_tick(world: &mut World, delta_seconds: f32) {
    // Wall-clock seconds for the HUD and the leaderboard tie-breaker
    {
        let mut game_state = world.resource_mut::<GameState>();
        game_state.second_accum += delta_seconds;
        while game_state.second_accum >= 1.0 {
            game_state.second_accum -= 1.0;
            game_state.game_time += 1;
        }
    }

    save_progress_if_dirty(world);

    // Automatic descent
    let should_drop = {
        let mut game_state = world.resource_mut::<GameState>();
        game_state.drop_timer += delta_seconds;

        let drop_interval = game_state.drop_interval();
        trace!(
            "Drop timer: {}, interval: {}",
            game_state.drop_timer, drop_interval
        );

        let should_drop = game_state.drop_timer >= drop_interval;
        if should_drop {
            game_state.drop_timer = 0.0;
        }
        should_drop
    };

    if !should_drop {
        return;
    }

    let Some((entity, tetromino, position)) = active_piece(world) else {
        debug!("No active piece, spawning a new one");
        spawn_tetromino(world);
        return;
    };

    let new_position = Position {
        x: position.x,
        y: position.y + 1,
    };

    let can_move_down = {
        let board = world.resource::<Board>();
        board.is_valid_position(new_position, &tetromino.shape)
    };

    if can_move_down {
        world.entity_mut(entity).insert(new_position);
    } else {
        lock_active_piece(world, entity, position, &tetromino);
    }
}

/// Materializes the piece into the board, flags completed rows and decides
/// whether the pending pile is big enough to summon the challenge.
fn lock_active_piece(
    world: &mut World,
    entity: Entity,
    position: Position,
    tetromino: &Tetromino,
) {
    info!(
        "Locking piece at ({}, {}), type {:?}",
        position.x, position.y, tetromino.tetromino_type
    );

    {
        let mut board = world.resource_mut::<Board>();
        board.lock_tetromino(position, tetromino);
    }

    particles::spawn_lock_particles(world, position, tetromino);
    world.resource::<AudioState>().play_sound(SoundEffect::Lock);

    let pending = {
        let mut board = world.resource_mut::<Board>();
        board.flag_pending_rows()
    };

    let (previous_count, level) = {
        let game_state = world.resource::<GameState>();
        (game_state.pending_rows.len(), game_state.level)
    };

    if pending.len() > previous_count {
        world
            .resource::<AudioState>()
            .play_sound(SoundEffect::LineFlagged);
    }

    let challenge_due = pending.len() >= level as usize;

    {
        let mut game_state = world.resource_mut::<GameState>();
        game_state.add_score(POINTS_PER_LOCK);
        game_state.pending_rows = pending;
    }

    world.despawn(entity);

    if challenge_due {
        info!("Pending rows reached the level threshold, challenge due");
        let mut game_state = world.resource_mut::<GameState>();
        game_state.enter_phase(GamePhase::LineClear);
    } else {
        spawn_tetromino(world);
    }
}

fn line_clear_tick(world: &mut World, delta_seconds: f32) {
    let open_challenge = {
        let mut game_state = world.resource_mut::<GameState>();
        game_state.phase_timer += delta_seconds;

        if game_state.phase_timer >= LINE_CLEAR_FLASH_SECS {
            game_state.enter_phase(GamePhase::Minigame);
            true
        } else {
            false
        }
    };

    if open_challenge {
        let (level, pending_count) = {
            let game_state = world.resource::<GameState>();
            (game_state.level, game_state.pending_rows.len())
        };

        // Always a fresh round, keyed by level and pending count
        world.insert_resource(Minigame::new(level, pending_count));
    }
}

fn minigame_tick(world: &mut World, delta_seconds: f32) {
    let (level, pending_count) = {
        let game_state = world.resource::<GameState>();
        (game_state.level, game_state.pending_rows.len())
    };

    // A missing or stale round (wrong key) is replaced wholesale
    let needs_fresh = world
        .get_resource::<Minigame>()
        .is_none_or(|minigame| !minigame.matches(level, pending_count));
    if needs_fresh {
        world.insert_resource(Minigame::new(level, pending_count));
    }

    let press = world.resource_mut::<Input>().minigame_press.take();

    let (events, outcome) = {
        let mut minigame = world.resource_mut::<Minigame>();

        if let Some(symbol) = press {
            minigame.press(symbol);
        }

        if let Err(e) = minigame.tick(delta_seconds) {
            // The player is never punished for an orchestration failure
            error!("Challenge error, falling back to success: {e}");
            minigame.force_success();
        }

        (minigame.drain_events(), minigame.take_outcome())
    };

    {
        let audio_state = world.resource::<AudioState>();
        for event in events {
            match event {
                MinigameEvent::CountdownTick(_) => {
                    audio_state.play_sound(SoundEffect::CountdownBeep);
                }
                MinigameEvent::SymbolLit(symbol) | MinigameEvent::Pressed(symbol) => {
                    audio_state.play_sound(SoundEffect::SimonTone(symbol));
                }
                MinigameEvent::Resolved(Outcome::Success) => {
                    audio_state.play_sound(SoundEffect::SimonSuccess);
                }
                MinigameEvent::Resolved(Outcome::Failure) => {
                    audio_state.play_sound(SoundEffect::SimonFail);
                }
                MinigameEvent::SymbolDark | MinigameEvent::InputOpen | MinigameEvent::TimedOut => {}
            }
        }
    }

    if let Some(outcome) = outcome {
        resolve_minigame(world, outcome);
    }
}

/// Applies the challenge outcome to the board and starts the resolution
/// animation. Removing the engine here is the teardown that cancels its
/// timeline.
fn resolve_minigame(world: &mut World, outcome: Outcome) {
    world.remove_resource::<Minigame>();

    let pending = world.resource::<GameState>().pending_rows.clone();
    info!("Challenge outcome {outcome:?} over {} rows", pending.len());

    match outcome {
        Outcome::Success => {
            {
                let mut game_state = world.resource_mut::<GameState>();
                game_state.add_score(POINTS_PER_CLEARED_ROW * pending.len() as u32);
                game_state.exploding_rows.clone_from(&pending);
                game_state.last_outcome = Some(Outcome::Success);
                game_state.enter_phase(GamePhase::Animating);
            }

            world
                .resource::<AudioState>()
                .play_sound(SoundEffect::Explosion);
            particles::spawn_explosion_particles(world, BOARD_WIDTH, &pending);
        }
        Outcome::Failure => {
            {
                let mut board = world.resource_mut::<Board>();
                board.petrify_rows(&pending);
            }

            {
                let mut game_state = world.resource_mut::<GameState>();
                game_state.pending_rows.clear();
                game_state.last_outcome = Some(Outcome::Failure);
                game_state.enter_phase(GamePhase::Animating);
            }

            particles::spawn_petrify_particles(world, BOARD_WIDTH, &pending);
        }
    }
}

fn animating_tick(world: &mut World, delta_seconds: f32) {
    let finished = {
        let mut game_state = world.resource_mut::<GameState>();
        game_state.phase_timer += delta_seconds;
        game_state.phase_timer >= ANIMATION_SECS
    };

    if !finished {
        return;
    }

    let outcome = world.resource_mut::<GameState>().last_outcome.take();

    match outcome {
        Some(Outcome::Success) => {
            let rows = world.resource::<GameState>().exploding_rows.clone();

            {
                let mut board = world.resource_mut::<Board>();
                board.clear_rows(&rows);
            }

            let victory = {
                let mut game_state = world.resource_mut::<GameState>();
                game_state.exploding_rows.clear();
                game_state.pending_rows.clear();

                if game_state.level + 1 > MAX_LEVEL {
                    game_state.enter_phase(GamePhase::Victory);
                    true
                } else {
                    game_state.advance_level();
                    game_state.enter_phase(GamePhase::Playing);
                    false
                }
            };

            if victory {
                info!("All levels cleared, victory");
                finalize_run(world);
            } else {
                spawn_tetromino(world);
            }
        }
        // The rows were petrified when the challenge resolved; play resumes
        // at the unchanged level.
        Some(Outcome::Failure) | None => {
            let mut game_state = world.resource_mut::<GameState>();
            game_state.enter_phase(GamePhase::Playing);
            drop(game_state);
            spawn_tetromino(world);
        }
    }
}

fn handle_game_over(world: &mut World) {
    {
        let mut game_state = world.resource_mut::<GameState>();
        game_state.enter_phase(GamePhase::GameOver);
    }

    world
        .resource::<AudioState>()
        .play_sound(SoundEffect::GameOver);
    screenshake::trigger_screen_shake(world, 2.5, 0.6);

    finalize_run(world);
}

/// Terminal bookkeeping shared by game over and victory: the run goes onto
/// the leaderboard and the resume snapshot is discarded.
fn finalize_run(world: &mut World) {
    let (name, score, level, time_seconds) = {
        let game_state = world.resource::<GameState>();
        (
            game_state.player_name.clone(),
            game_state.score,
            game_state.level,
            game_state.game_time,
        )
    };

    let date = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| elapsed.as_secs());
    let entry = ScoreEntry::new(&name, score, level, time_seconds, date);

    let mut storage = world.resource_mut::<Storage>();
    let rank = storage.leaderboard.add_entry(entry);
    storage.save_leaderboard();
    storage.clear_snapshot();

    match rank {
        Some(rank) => info!("Run finished with {score} points, leaderboard rank {rank}"),
        None => info!("Run finished with {score} points, below the leaderboard"),
    }
}

/// Best-effort resume snapshot, written when score or level changed.
fn save_progress_if_dirty(world: &mut World) {
    let progress = {
        let mut game_state = world.resource_mut::<GameState>();
        if !game_state.progress_dirty {
            return;
        }
        game_state.progress_dirty = false;

        SavedProgress {
            player_name: game_state.player_name.clone(),
            level: game_state.level,
            score: game_state.score,
            game_time: game_state.game_time,
        }
    };

    let mut storage = world.resource_mut::<Storage>();
    storage.save_snapshot(progress);
}
