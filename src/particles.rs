#![warn(clippy::all, clippy::pedantic)]
#![allow(
    // Allow truncation when casting from usize to i32 since particle coordinates are always small enough to fit in i32
    clippy::cast_possible_truncation,
    // Allow precision loss when casting between numeric types since exact precision isn't critical for particle effects
    clippy::cast_precision_loss,
    // Allow potential wrapping when casting between types of same size as we validate values are in range
    clippy::cast_possible_wrap,
    // Allow defining constants after statements in functions as it's clearer to define them near where they're used
    clippy::items_after_statements
)]

use bevy_ecs::prelude::*;
use log::debug;
use ratatui::style::Color;

use crate::components::{Particle, Position, Tetromino};
use crate::screenshake;

fn spawn_particle(
    world: &mut World,
    position: Position,
    velocity: (f32, f32),
    color: Color,
    lifetime: f32,
    size: f32,
) {
    world.spawn(Particle {
        x: position.x as f32,
        y: position.y as f32,
        velocity,
        color,
        lifetime,
        size,
    });
}

pub fn spawn_lock_particles(world: &mut World, position: Position, tetromino: &Tetromino) {
    debug!(
        "Spawning lock particles at position ({}, {})",
        position.x, position.y
    );

    let color = tetromino.tetromino_type.get_color();
    let shape = tetromino.shape.clone();

    const PARTICLES_PER_BLOCK: usize = 4;

    for (r, row) in shape.iter().enumerate() {
        for (c, &occupied) in row.iter().enumerate() {
            if occupied == 0 {
                continue;
            }

            let block_pos = Position {
                x: position.x + c as i32,
                y: position.y + r as i32,
            };

            for _ in 0..PARTICLES_PER_BLOCK {
                // Random velocity (with upward bias for collision effect)
                let vx = (fastrand::f32() - 0.5) * 4.0;
                let vy = (fastrand::f32() - 0.7) * 4.0; // Bias upward

                spawn_particle(
                    world,
                    block_pos,
                    (vx, vy),
                    color,
                    fastrand::f32() * 0.6 + 0.2, // lifetime: 0.2 to 0.8 seconds
                    fastrand::f32() * 0.8 + 0.2,
                ); // size: 0.2 to 1.0
            }
        }
    }
}

/// Burst along every exploding row after a won challenge.
pub fn spawn_explosion_particles(world: &mut World, board_width: usize, rows: &[usize]) {
    debug!("Spawning explosion particles for {} rows", rows.len());

    for &y in rows {
        for x in 0..board_width {
            let particle_pos = Position {
                x: x as i32,
                y: y as i32,
            };

            let particles_per_cell = 3 + rows.len();

            for _ in 0..particles_per_cell {
                // Horizontal bias for velocity
                let vx = (fastrand::f32() - 0.5) * 8.0;
                let vy = (fastrand::f32() - 0.5) * 3.0; // Less vertical movement

                let color = match fastrand::u8(0..3) {
                    0 => Color::LightYellow,
                    1 => Color::LightRed,
                    _ => Color::White,
                };

                spawn_particle(
                    world,
                    particle_pos,
                    (vx, vy),
                    color,
                    fastrand::f32() * 0.9 + 0.4, // lifetime: 0.4 to 1.3 seconds
                    fastrand::f32() * 0.6 + 0.3, // size: 0.3 to 0.9
                );
            }
        }
    }

    screenshake::trigger_screen_shake(world, 2.0 + rows.len() as f32 * 0.5, 0.5);
}

/// Gray dust drifting off rows as they petrify after a lost challenge.
pub fn spawn_petrify_particles(world: &mut World, board_width: usize, rows: &[usize]) {
    debug!("Spawning petrify particles for {} rows", rows.len());

    for &y in rows {
        for x in 0..board_width {
            let particle_pos = Position {
                x: x as i32,
                y: y as i32,
            };

            for _ in 0..2 {
                let vx = (fastrand::f32() - 0.5) * 1.5;
                let vy = fastrand::f32() * 1.5; // Dust settles downward

                spawn_particle(
                    world,
                    particle_pos,
                    (vx, vy),
                    Color::DarkGray,
                    fastrand::f32() * 0.8 + 0.4,
                    fastrand::f32() * 0.4 + 0.2,
                );
            }
        }
    }

    screenshake::trigger_screen_shake(world, 1.2, 0.3);
}

pub fn update_particles(world: &mut World, delta_seconds: f32) {
    // First update lifetimes and collect expired particles
    let mut entities_to_despawn = Vec::new();

    for (entity, mut particle) in world.query::<(Entity, &mut Particle)>().iter_mut(world) {
        particle.lifetime -= delta_seconds;

        if particle.lifetime <= 0.0 {
            entities_to_despawn.push(entity);
        }
    }

    for entity in entities_to_despawn {
        world.despawn(entity);
    }

    // Move the remaining particles along their velocity
    for (_, mut particle) in world.query::<(Entity, &mut Particle)>().iter_mut(world) {
        let (vx, vy) = particle.velocity;
        particle.x += vx * delta_seconds;
        particle.y += vy * delta_seconds;
    }
}
