#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_possible_wrap
)]

use crate::app::App;
use crate::components::{GamePhase, GameState, Particle, ScreenShake, TetrominoType};
use crate::game::{BOARD_HEIGHT, BOARD_WIDTH, MAX_LEVEL};
use crate::leaderboard::format_time;
use crate::menu;
use crate::menu_types::MenuState;
use crate::minigame::{Minigame, MinigamePhase};
use crate::persistence::Storage;
use crate::share::share_text;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap},
};

const PAD_COLORS: [Color; 5] = [
    Color::Green,   // top
    Color::Red,     // left
    Color::Yellow,  // center
    Color::Blue,    // right
    Color::Magenta, // bottom
];

pub fn render(f: &mut Frame, app: &mut App) {
    if app.menu.state != MenuState::Game {
        menu::render(f, app);
        return;
    }

    // Get screen shake offset if active
    let (shake_x, shake_y) = {
        let screen_shake = app.world.resource::<ScreenShake>();
        (screen_shake.current_offset.0, screen_shake.current_offset.1)
    };

    // Apply screen shake to the entire frame
    let original_area = f.area();
    let shake_area = Rect {
        x: (i32::from(original_area.x) + i32::from(shake_x)).max(0) as u16,
        y: (i32::from(original_area.y) + i32::from(shake_y)).max(0) as u16,
        width: original_area.width,
        height: original_area.height,
    };

    // Calculate required board space
    let cell_width = 2; // Each cell is 2 characters wide
    let board_width = BOARD_WIDTH as u16 * cell_width + 2; // +2 for borders
    let board_height = BOARD_HEIGHT as u16 + 2; // +2 for borders

    let min_info_width = 24u16;
    let min_total_width = board_width + min_info_width;

    if f.area().width < min_total_width || f.area().height < board_height + 3 {
        let warning = Paragraph::new(
            "Terminal too small!\nPlease resize your terminal\nto continue playing.",
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Tetracube"));
        f.render_widget(warning, centered_rect(50, 30, f.area()));
        return;
    }

    let main_layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(board_width),
            Constraint::Min(min_info_width),
        ])
        .split(shake_area);

    let game_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),            // Title
            Constraint::Length(board_height), // Game board (fixed height)
            Constraint::Fill(1),              // Flexible spacing below
        ])
        .split(main_layout[0]);

    let title = Paragraph::new("TETRACUBE")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(title, game_layout[0]);

    render_game_board(f, app, game_layout[1]);
    render_info_panel(f, app, main_layout[1]);

    // Phase overlays sit on top of the board
    let phase = app.world.resource::<GameState>().phase;
    let full_area = f.area();
    match phase {
        GamePhase::Minigame => render_minigame_overlay(f, app, full_area),
        GamePhase::GameOver => render_end_overlay(f, app, false),
        GamePhase::Victory => render_end_overlay(f, app, true),
        _ => {}
    }
}

fn render_game_board(f: &mut Frame, app: &mut App, area: Rect) {
    let cell_width = 2; // Each cell is 2 characters wide

    let inner_area = Block::default().borders(Borders::ALL).inner(area);
    f.render_widget(Block::default().borders(Borders::ALL), area);

    let (phase, phase_timer, exploding_rows, pending_rows) = {
        let game_state = app.world.resource::<GameState>();
        (
            game_state.phase,
            game_state.phase_timer,
            game_state.exploding_rows.clone(),
            game_state.pending_rows.clone(),
        )
    };

    // Pending rows pulse while the board is frozen before the challenge
    let pulse_on = (phase_timer * 4.0) as i32 % 2 == 0;

    let blocks = app.get_render_blocks();

    for (position, tetromino_type) in blocks {
        if position.y < 0 {
            continue; // Spawn overhang stays off screen
        }

        let x = position.x as u16;
        let y = position.y as u16;

        if x < BOARD_WIDTH as u16 && y < BOARD_HEIGHT as u16 {
            let block_x = inner_area.left() + x * cell_width;
            let block_y = inner_area.top() + y;

            if block_x >= inner_area.right() || block_y >= inner_area.bottom() {
                continue;
            }

            let row = position.y as usize;
            let color = if phase == GamePhase::Animating && exploding_rows.contains(&row) {
                if pulse_on { Color::White } else { Color::LightRed }
            } else if phase == GamePhase::LineClear
                && tetromino_type == TetrominoType::Pending
                && !pulse_on
            {
                Color::White
            } else {
                tetromino_type.get_color()
            };

            let symbol = if tetromino_type == TetrominoType::Stone {
                "▓"
            } else {
                "█"
            };

            for dx in 0..cell_width {
                if let Some(cell) = f.buffer_mut().cell_mut((block_x + dx, block_y)) {
                    cell.set_symbol(symbol);
                    cell.set_fg(color);
                    cell.set_bg(Color::Black);
                }
            }
        }
    }

    render_particles(f, app, inner_area);

    // Pending progress marker under the board frame
    let game_state = app.world.resource::<GameState>();
    if !pending_rows.is_empty() && !game_state.is_terminal() {
        let marker = format!(" {} / {} rows ", pending_rows.len(), game_state.level);
        let marker_area = Rect {
            x: area.x + 1,
            y: area.bottom().saturating_sub(1),
            width: (marker.len() as u16).min(area.width.saturating_sub(2)),
            height: 1,
        };
        f.render_widget(
            Paragraph::new(marker).style(Style::default().fg(Color::LightYellow)),
            marker_area,
        );
    }
}

fn render_info_panel(f: &mut Frame, app: &mut App, area: Rect) {
    let info_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title
            Constraint::Length(6), // Stats
            Constraint::Length(7), // Leaderboard
            Constraint::Min(6),    // Controls
        ])
        .split(area);

    let info_title = Paragraph::new("INFO")
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(info_title, info_layout[0]);

    let game_state = app.world.resource::<GameState>();
    let stats = format!(
        "Player: {}\nScore: {}\nLevel: {} / {}\nRows: {} / {}\nTime: {}",
        game_state.player_name,
        game_state.score,
        game_state.level,
        MAX_LEVEL,
        game_state.pending_rows.len(),
        game_state.level,
        format_time(game_state.game_time),
    );
    let stats_widget = Paragraph::new(stats)
        .block(Block::default().borders(Borders::NONE))
        .wrap(Wrap { trim: true });
    f.render_widget(stats_widget, info_layout[1]);

    // Best runs so far
    let storage = app.world.resource::<Storage>();
    let mut ranking = String::new();
    for (i, entry) in storage.leaderboard.entries.iter().take(5).enumerate() {
        ranking.push_str(&format!(
            "{}. {} {} ({})\n",
            i + 1,
            entry.name,
            entry.score,
            entry.time
        ));
    }
    if ranking.is_empty() {
        ranking.push_str("No records yet.");
    }
    let ranking_widget = Paragraph::new(ranking)
        .block(Block::default().borders(Borders::TOP).title("BEST"))
        .wrap(Wrap { trim: true });
    f.render_widget(ranking_widget, info_layout[2]);

    let controls = Paragraph::new(
        "Controls:\n\
        ←/→: Move left/right\n\
        ↓: Soft drop\n\
        Enter: Hard drop\n\
        ↑/Space: Rotate\n\
        Q: Quit\n\
        ",
    )
    .block(Block::default().borders(Borders::TOP))
    .wrap(Wrap { trim: true });
    f.render_widget(controls, info_layout[3]);
}

// Render all particles
fn render_particles(f: &mut Frame, app: &mut App, area: Rect) {
    let particles_data: Vec<Particle> = app
        .world
        .query::<&Particle>()
        .iter(&app.world)
        .cloned()
        .collect();

    for particle in particles_data {
        if particle.x < 0.0 || particle.y < 0.0 {
            continue;
        }

        let x = particle.x as u16;
        let y = particle.y as u16;

        if x < BOARD_WIDTH as u16 && y < BOARD_HEIGHT as u16 {
            let particle_x = area.left() + x * 2;
            let particle_y = area.top() + y;

            if particle_x < area.right() && particle_y < area.bottom() {
                // Different particle size based on the size attribute
                let particle_symbol = if particle.size > 0.7 {
                    "█"
                } else if particle.size > 0.4 {
                    "▓"
                } else {
                    "▒"
                };

                if let Some(cell) = f.buffer_mut().cell_mut((particle_x, particle_y)) {
                    cell.set_symbol(particle_symbol);
                    cell.set_fg(particle.color);
                }
            }
        }
    }
}

/// The challenge popup: status line, countdown overlay, cross-layout pad and
/// the input timer bar.
fn render_minigame_overlay(f: &mut Frame, app: &mut App, area: Rect) {
    let Some(minigame) = app.world.get_resource::<Minigame>() else {
        return;
    };

    let popup = centered_rect(44, 70, area);
    f.render_widget(Clear, popup);
    f.render_widget(
        Block::default()
            .borders(Borders::ALL)
            .title(" CUBE CHALLENGE ")
            .border_style(Style::default().fg(Color::Magenta)),
        popup,
    );

    let inner = Block::default().borders(Borders::ALL).inner(popup);
    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Level + status
            Constraint::Length(1), // Timer bar
            Constraint::Min(11),   // Pad
            Constraint::Length(1), // Hint
        ])
        .split(inner);

    let status = match minigame.phase {
        MinigamePhase::Init | MinigamePhase::CountdownPre => "Watch closely...",
        MinigamePhase::Demo => "Memorize the pattern",
        MinigamePhase::Waiting => "Processing...",
        MinigamePhase::CountdownPost => "Your turn in...",
        MinigamePhase::Input => "Repeat the pattern now!",
        MinigamePhase::Result => match minigame.outcome {
            Some(crate::minigame::Outcome::Success) => "CORRECT! Destroying rows...",
            Some(crate::minigame::Outcome::Failure) => "WRONG! Petrifying rows...",
            None => "...",
        },
    };
    let header = Paragraph::new(format!(
        "Level {} - sequence of {}\n{}",
        minigame.level,
        minigame.sequence.len(),
        status
    ))
    .alignment(Alignment::Center);
    f.render_widget(header, layout[0]);

    if minigame.phase == MinigamePhase::Input {
        let window = minigame.input_window();
        let ratio = f64::from((minigame.time_left / window).clamp(0.0, 1.0));
        let color = if minigame.time_left < 4.0 {
            Color::Red
        } else {
            Color::Cyan
        };
        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(color))
            .ratio(ratio)
            .label(format!("{:.0}s", minigame.time_left.max(0.0)));
        f.render_widget(gauge, layout[1]);
    }

    render_pad(f, minigame, layout[2]);

    let hint = Paragraph::new("W/A/Space/D/S or 1-5")
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::DarkGray));
    f.render_widget(hint, layout[3]);

    // Big countdown overlay on top of the pad
    if minigame.countdown_value > 0 {
        let digit = Paragraph::new(format!("{}", minigame.countdown_value))
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::White).add_modifier(Modifier::BOLD));
        let digit_area = Rect {
            x: layout[2].x + layout[2].width / 2,
            y: layout[2].y + layout[2].height / 2,
            width: 1,
            height: 1,
        };
        f.render_widget(digit, digit_area);
    }
}

/// Five buttons in a cross: top, left, center, right, bottom.
fn render_pad(f: &mut Frame, minigame: &Minigame, area: Rect) {
    let button_width = (area.width / 3).min(10);
    let button_height = (area.height / 3).max(1);

    // Grid coordinates (col, row) of each symbol
    let slots: [(u16, u16); 5] = [(1, 0), (0, 1), (1, 1), (2, 1), (1, 2)];

    let grid_width = button_width * 3 + 2;
    let grid_left = area.x + (area.width.saturating_sub(grid_width)) / 2;

    for (symbol, (col, row)) in slots.into_iter().enumerate() {
        let rect = Rect {
            x: grid_left + col * (button_width + 1),
            y: area.y + row * button_height,
            width: button_width,
            height: button_height,
        };

        let lit = minigame.active_symbol == Some(symbol as u8);
        let base = PAD_COLORS[symbol];
        let style = if lit {
            Style::default().bg(Color::White).fg(base)
        } else {
            Style::default().bg(base).fg(Color::Black)
        };

        let label = format!("{}", symbol + 1);
        let button = Paragraph::new(label)
            .alignment(Alignment::Center)
            .style(style);
        f.render_widget(button, rect);
    }
}

/// Game-over / victory screen with the share text.
fn render_end_overlay(f: &mut Frame, app: &mut App, victory: bool) {
    let game_state = app.world.resource::<GameState>();
    let popup = centered_rect(60, 50, f.area());
    f.render_widget(Clear, popup);

    let (title, color) = if victory {
        (" CHALLENGE COMPLETE ", Color::Green)
    } else {
        (" MISSION FAILED ", Color::Red)
    };

    let share = share_text(
        &game_state.player_name,
        game_state.score,
        game_state.level,
        victory,
    );

    let body = format!(
        "\nFinal score: {}\nLevel reached: {}\nTime: {}\n\n{}\n\nPress Enter for menu",
        game_state.score,
        game_state.level,
        format_time(game_state.game_time),
        share
    );

    let widget = Paragraph::new(body)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(title)
                .border_style(Style::default().fg(color)),
        );
    f.render_widget(widget, popup);
}

/// Helper function to create a centered rect using up certain percentage of the available rect
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
