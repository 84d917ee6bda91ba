#![warn(clippy::all, clippy::pedantic)]

use std::io;
use std::os::fd::AsRawFd;
use std::time::{Duration, Instant};

use crossterm::event::KeyCode;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEvent},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use log::{debug, error, info};
use ratatui::{Terminal, prelude::*};

use tetracube::Time;
use tetracube::app::{App, AppResult};
use tetracube::components::{GamePhase, GameState, Input};
use tetracube::config;
use tetracube::menu_types::{MenuOption, MenuState, OptionsOption};
use tetracube::sound::AudioState;
use tetracube::systems;
use tetracube::ui;

fn main() -> AppResult<()> {
    // Create log file and redirect stderr to it
    let log_path = "tetracube.log";
    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open(log_path)?;

    // Redirect stderr to the log file so panics and cpal noise stay off the screen
    let stderr_handle = std::io::stderr();
    let stderr_fd = stderr_handle.as_raw_fd();
    let log_file_fd = log_file.as_raw_fd();

    // Safety: We're redirecting stderr to our log file using standard POSIX operations
    unsafe {
        libc::dup2(log_file_fd, stderr_fd);
    }

    // Configure the logger to use stderr (which is now redirected to our file)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp(None)
        .format_module_path(false)
        .init();

    info!("Starting Tetracube");

    // Initialize configuration system
    if let Err(e) = config::load() {
        error!("Failed to load configuration: {e:?}");
        // Continue with default configuration
    } else {
        info!("Configuration loaded successfully");
    }

    // Terminal initialization
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app and run it
    let tick_rate = Duration::from_millis(33); // ~30 FPS
    let game_tick_rate = Duration::from_millis(50); // Game logic updates less often

    let app = App::new();
    let res = run_app(&mut terminal, app, tick_rate, game_tick_rate);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        error!("Game error: {err:?}");
    }

    Ok(())
}

fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    mut app: App,
    tick_rate: Duration,
    game_tick_rate: Duration,
) -> AppResult<()> {
    let mut last_render = Instant::now();
    let mut last_game_tick = Instant::now();

    // Explicitly flush any pending input events that might be in the buffer
    while crossterm::event::poll(Duration::from_millis(0))? {
        let _ = event::read()?;
    }

    // Set the hard_drop_released flag to true initially
    {
        let mut input = app.world.resource_mut::<Input>();
        input.hard_drop_released = true;
    }

    debug!("Resources initialized");

    // Flag to track if we've already warned about audio device issues
    let mut audio_error_logged = false;

    loop {
        // Draw the UI
        if last_render.elapsed() >= tick_rate {
            terminal.draw(|f| ui::render(f, &mut app))?;
            last_render = Instant::now();
        }

        // Check if any systems need updating
        if last_game_tick.elapsed() >= game_tick_rate {
            let delta_seconds = last_game_tick.elapsed().as_secs_f32();
            last_game_tick = Instant::now();

            // Update time resource
            {
                let mut time = app.world.resource_mut::<Time>();
                time.update();
            }

            // Check audio system status
            let audio_unavailable = {
                let audio_state = app.world.resource::<AudioState>();
                !audio_state.is_audio_available()
            };

            // If audio device is unavailable and we haven't logged it yet, log it once
            if audio_unavailable && !audio_error_logged {
                error!("Audio device is unavailable. Continuing without sound.");
                audio_error_logged = true;
            }

            // Exit if needed
            if app.should_quit {
                return Ok(());
            }

            // Only run game systems while a run is on screen
            if app.menu.state == MenuState::Game {
                systems::input_system(&mut app.world);
                systems::game_tick_system(&mut app.world, delta_seconds);
            }
        }

        // Process keyboard input
        if crossterm::event::poll(Duration::from_millis(5))? {
            if let Event::Key(key) = event::read()? {
                debug!("Key event: {key:?}");

                // Check for key release events
                if key.kind == event::KeyEventKind::Release {
                    // Track key releases for key-repeat prevention
                    let mut input = app.world.resource_mut::<Input>();
                    if key.code == KeyCode::Enter {
                        input.hard_drop_released = true;
                    }
                    continue; // Skip the rest of the input processing for release events
                }

                match app.menu.state {
                    MenuState::MainMenu => handle_main_menu_key(&mut app, key),
                    MenuState::Options => handle_options_key(&mut app, key),
                    MenuState::Game => handle_game_key(&mut app, key),
                }
            }
        }
    }
}

/// Main menu: arrows navigate, characters type the pilot name.
fn handle_main_menu_key(app: &mut App, key: KeyEvent) {
    let has_resume = app.has_snapshot();

    match key.code {
        KeyCode::Up => app.menu.prev_option(has_resume),
        KeyCode::Down => app.menu.next_option(has_resume),
        KeyCode::Backspace => app.menu.pop_name_char(),
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Enter => match app.menu.selected_option {
            MenuOption::NewGame => {
                // Refused silently while the name field is empty
                let _ = app.start_game();
            }
            MenuOption::Resume => {
                let _ = app.resume_game();
            }
            MenuOption::Options => app.menu.state = MenuState::Options,
            MenuOption::Quit => app.should_quit = true,
        },
        KeyCode::Char(c) => app.menu.push_name_char(c),
        _ => {}
    }
}

fn handle_options_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Up | KeyCode::Char('w') => app.menu.prev_option(false),
        KeyCode::Down | KeyCode::Char('s') => app.menu.next_option(false),
        KeyCode::Esc => app.menu.state = MenuState::MainMenu,
        KeyCode::Left => adjust_volume(app, -0.1),
        KeyCode::Right => adjust_volume(app, 0.1),
        KeyCode::Enter | KeyCode::Char(' ') => {
            match app.menu.options_selected {
                OptionsOption::MusicToggle => {
                    let mut audio_state = app.world.resource_mut::<AudioState>();
                    audio_state.toggle_music();
                }
                OptionsOption::SoundToggle => {
                    let mut audio_state = app.world.resource_mut::<AudioState>();
                    audio_state.toggle_sound();
                }
                OptionsOption::VolumeUp => adjust_volume(app, 0.1),
                OptionsOption::VolumeDown => adjust_volume(app, -0.1),
                OptionsOption::Back => app.menu.state = MenuState::MainMenu,
            }
            persist_audio_settings(app);
        }
        _ => {}
    }
}

fn adjust_volume(app: &mut App, delta: f32) {
    let mut audio_state = app.world.resource_mut::<AudioState>();
    let volume = audio_state.get_volume();
    audio_state.set_volume((volume + delta).clamp(0.0, 1.0));
}

/// Best-effort write of the audio settings back to the config file.
fn persist_audio_settings(app: &App) {
    let audio_state = app.world.resource::<AudioState>();
    let mut config = config::current();
    config.audio.music_enabled = audio_state.is_music_enabled();
    config.audio.sound_enabled = audio_state.is_sound_enabled();
    config.audio.volume = audio_state.get_volume();

    if let Err(e) = config::save(&config) {
        error!("Failed to persist audio settings: {e:?}");
    }
}

fn handle_game_key(app: &mut App, key: KeyEvent) {
    // Allow quitting with 'q' regardless of game state
    if key.code == KeyCode::Char('q') {
        app.should_quit = true;
        return;
    }

    // Audio hotkeys work in every phase
    match key.code {
        KeyCode::Char('m') => {
            let mut audio_state = app.world.resource_mut::<AudioState>();
            audio_state.toggle_music();
            return;
        }
        KeyCode::Char('+') | KeyCode::Char('=') => {
            adjust_volume(app, 0.1);
            return;
        }
        KeyCode::Char('-') | KeyCode::Char('_') => {
            adjust_volume(app, -0.1);
            return;
        }
        _ => {}
    }

    let phase = app.world.resource::<GameState>().phase;

    match phase {
        GamePhase::GameOver | GamePhase::Victory => {
            if key.code == KeyCode::Enter || key.code == KeyCode::Esc {
                app.back_to_menu();
            }
        }
        GamePhase::Minigame => {
            if let Some(symbol) = minigame_symbol(key.code) {
                let mut input = app.world.resource_mut::<Input>();
                input.minigame_press = Some(symbol);
            }
        }
        GamePhase::Playing => {
            let mut input = app.world.resource_mut::<Input>();
            match key.code {
                KeyCode::Left | KeyCode::Char('a') => {
                    input.left = true;
                    input.right = false;
                }
                KeyCode::Right | KeyCode::Char('d') => {
                    input.right = true;
                    input.left = false;
                }
                KeyCode::Down | KeyCode::Char('s') => input.down = true,
                KeyCode::Up | KeyCode::Char('w' | ' ') => {
                    input.rotate = true;
                }
                KeyCode::Enter => {
                    // Only set hard_drop to true if the key was previously released
                    if input.hard_drop_released {
                        input.hard_drop = true;
                        input.hard_drop_released = false; // Mark as not released until we see a release event
                    }
                }
                _ => (),
            }
        }
        // The board is frozen while rows flash or resolve
        GamePhase::LineClear | GamePhase::Animating => {}
    }

    // Update last key in game state
    let mut game_state = app.world.resource_mut::<GameState>();
    game_state.last_key = Some(key);
}

/// Challenge pad mapping: the cross directions or the digit row.
fn minigame_symbol(code: KeyCode) -> Option<u8> {
    match code {
        KeyCode::Up | KeyCode::Char('w' | '1') => Some(0),
        KeyCode::Left | KeyCode::Char('a' | '2') => Some(1),
        KeyCode::Char(' ' | 'x' | '3') => Some(2),
        KeyCode::Right | KeyCode::Char('d' | '4') => Some(3),
        KeyCode::Down | KeyCode::Char('s' | '5') => Some(4),
        _ => None,
    }
}
