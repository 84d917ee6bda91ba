#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::cast_possible_truncation)]

use crate::app::App;
use crate::menu_types::{MenuOption, MenuState, OptionsOption};
use crate::persistence::Storage;
use crate::sound::AudioState;
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};

const TITLE: &str = "\
▀█▀ █▀▀ ▀█▀ █▀▄ ▄▀▄ █▀▀ █ █ █▀▄ █▀▀
 █  █▀▀  █  █▀▄ █▀█ █   █ █ █▀▄ █▀▀
 ▀  ▀▀▀  ▀  ▀ ▀ ▀ ▀ ▀▀▀ ▀▀▀ ▀▀  ▀▀▀";

pub fn render(f: &mut Frame, app: &mut App) {
    match app.menu.state {
        MenuState::MainMenu => render_main_menu(f, app),
        MenuState::Options => render_options_menu(f, app),
        MenuState::Game => {}
    }
}

fn render_main_menu(f: &mut Frame, app: &App) {
    let area = f.area();

    let layout = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(46), Constraint::Length(30)])
        .split(area);

    let column = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Title
            Constraint::Length(3), // Name entry
            Constraint::Min(8),    // Options
        ])
        .split(layout[0]);

    let title = Paragraph::new(TITLE)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Cyan));
    f.render_widget(title, column[0]);

    let name = if app.menu.player_name.is_empty() {
        Line::from(Span::styled(
            "type your name_",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Line::from(Span::styled(
            format!("{}_", app.menu.player_name),
            Style::default().fg(Color::White),
        ))
    };
    let name_field = Paragraph::new(name)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" PILOT "));
    f.render_widget(name_field, centered_line(column[1], 30));

    let has_resume = app.has_snapshot();
    let mut rows: Vec<Line> = Vec::new();

    let push_option = |label: String, option: MenuOption, rows: &mut Vec<Line>| {
        let selected = app.menu.selected_option == option;
        let style = if selected {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().fg(Color::Gray)
        };
        let marker = if selected { "▶ " } else { "  " };
        rows.push(Line::from(Span::styled(format!("{marker}{label}"), style)));
        rows.push(Line::raw(""));
    };

    push_option("NEW GAME".to_string(), MenuOption::NewGame, &mut rows);
    if has_resume {
        let saved = app.world.resource::<Storage>();
        if let Some(progress) = &saved.snapshot {
            push_option(
                format!("RESUME ({} pts, level {})", progress.score, progress.level),
                MenuOption::Resume,
                &mut rows,
            );
        }
    }
    push_option("OPTIONS".to_string(), MenuOption::Options, &mut rows);
    push_option("QUIT".to_string(), MenuOption::Quit, &mut rows);

    let options = Paragraph::new(rows).alignment(Alignment::Center);
    f.render_widget(options, column[2]);

    render_leaderboard_panel(f, app, layout[1]);
}

fn render_options_menu(f: &mut Frame, app: &App) {
    let area = centered_line(f.area(), 40);
    let audio_state = app.world.resource::<AudioState>();

    let entry = |label: String, option: OptionsOption| -> Line {
        let selected = app.menu.options_selected == option;
        let style = if selected {
            Style::default().fg(Color::Black).bg(Color::Cyan)
        } else {
            Style::default().fg(Color::Gray)
        };
        let marker = if selected { "▶ " } else { "  " };
        Line::from(Span::styled(format!("{marker}{label}"), style))
    };

    let on_off = |enabled: bool| if enabled { "ON" } else { "OFF" };
    let volume_percent = (audio_state.get_volume() * 100.0).round() as u16;

    let rows = vec![
        Line::raw(""),
        entry(
            format!("Music: {}", on_off(audio_state.is_music_enabled())),
            OptionsOption::MusicToggle,
        ),
        Line::raw(""),
        entry(
            format!("Sound: {}", on_off(audio_state.is_sound_enabled())),
            OptionsOption::SoundToggle,
        ),
        Line::raw(""),
        entry(
            format!("Volume up ({volume_percent}%)"),
            OptionsOption::VolumeUp,
        ),
        Line::raw(""),
        entry("Volume down".to_string(), OptionsOption::VolumeDown),
        Line::raw(""),
        entry("Back".to_string(), OptionsOption::Back),
    ];

    let widget = Paragraph::new(rows)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title(" OPTIONS "));
    f.render_widget(widget, area);
}

fn render_leaderboard_panel(f: &mut Frame, app: &App, area: Rect) {
    let storage = app.world.resource::<Storage>();

    let mut text = String::new();
    for (i, entry) in storage.leaderboard.entries.iter().enumerate() {
        text.push_str(&format!(
            "{:>2}. {:<10} {:>6}\n    lvl {} in {}\n",
            i + 1,
            entry.name,
            entry.score,
            entry.level,
            entry.time
        ));
    }
    if text.is_empty() {
        text.push_str("No records yet.");
    }

    let widget = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title(" RANKING "))
        .wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}

/// A horizontally centered strip of the given width inside `area`.
fn centered_line(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y,
        width,
        height: area.height,
    }
}
