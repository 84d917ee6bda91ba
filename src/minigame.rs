#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::cast_precision_loss)]

use bevy_ecs::prelude::Resource;
use log::debug;
use std::fmt;

use crate::game::{
    COUNTDOWN_STEPS, COUNTDOWN_STEP_SECS, DEMO_GAP_SECS, DEMO_LEAD_IN_SECS, DEMO_ON_SECS,
    RESULT_FAILURE_SECS, RESULT_SUCCESS_SECS, RESULT_TIMEOUT_SECS, SYMBOL_COUNT, WAITING_SECS,
    input_window_secs,
};

/// Phases of the memory challenge, in strict linear order. There is no way
/// back; a new round means a new `Minigame` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinigamePhase {
    Init,
    CountdownPre,
    Demo,
    Waiting,
    CountdownPost,
    Input,
    Result,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    Failure,
}

/// Observable moments the front end turns into cues. Drained every tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MinigameEvent {
    CountdownTick(u8),
    SymbolLit(u8),
    SymbolDark,
    InputOpen,
    Pressed(u8),
    TimedOut,
    Resolved(Outcome),
}

/// Internal orchestration failures. These never fail the player: the caller
/// converts them into an automatic success.
#[derive(Debug)]
pub enum MinigameError {
    MissingSymbol(usize),
}

impl fmt::Display for MinigameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MinigameError::MissingSymbol(index) => {
                write!(f, "sequence has no symbol at position {index}")
            }
        }
    }
}

impl std::error::Error for MinigameError {}

/// One round of the memory challenge. Created fresh whenever the game enters
/// the challenge, keyed by level and pending-row count; dropping the value is
/// the teardown that cancels every outstanding timer.
#[derive(Resource, Debug, Clone)]
pub struct Minigame {
    pub level: u32,
    pub pending_rows: usize,
    pub sequence: Vec<u8>,
    pub player_sequence: Vec<u8>,
    pub phase: MinigamePhase,
    /// Countdown overlay value, 3..=1 while counting, 0 otherwise.
    pub countdown_value: u8,
    /// Symbol currently lit on the pad, during demo playback or a press.
    pub active_symbol: Option<u8>,
    /// Seconds left in the input window.
    pub time_left: f32,
    pub outcome: Option<Outcome>,
    phase_timer: f32,
    demo_index: usize,
    result_delay: f32,
    delivered: bool,
    events: Vec<MinigameEvent>,
}

impl Minigame {
    #[must_use]
    pub fn new(level: u32, pending_rows: usize) -> Self {
        let sequence = generate_sequence(level);
        debug!("New challenge round: level {level}, {pending_rows} pending rows");

        Self {
            level,
            pending_rows,
            sequence,
            player_sequence: Vec::new(),
            phase: MinigamePhase::Init,
            countdown_value: 0,
            active_symbol: None,
            time_left: 0.0,
            outcome: None,
            phase_timer: 0.0,
            demo_index: 0,
            result_delay: 0.0,
            delivered: false,
            events: Vec::new(),
        }
    }

    /// Whether this round was built for the given key. A mismatch means the
    /// round is stale and must be replaced.
    #[must_use]
    pub fn matches(&self, level: u32, pending_rows: usize) -> bool {
        self.level == level && self.pending_rows == pending_rows
    }

    #[must_use]
    pub fn input_window(&self) -> f32 {
        input_window_secs(self.level)
    }

    /// Advances the phase timeline by `delta` seconds. All timing lives here;
    /// there are no scheduled callbacks to leak past a teardown.
    pub fn tick(&mut self, delta: f32) -> Result<(), MinigameError> {
        self.phase_timer += delta;

        match self.phase {
            MinigamePhase::Init => {
                self.start_countdown(MinigamePhase::CountdownPre);
            }
            MinigamePhase::CountdownPre => {
                if self.countdown_step() {
                    self.phase = MinigamePhase::Demo;
                    self.phase_timer = 0.0;
                    self.demo_index = 0;
                }
            }
            MinigamePhase::Demo => self.demo_step()?,
            MinigamePhase::Waiting => {
                if self.phase_timer >= WAITING_SECS {
                    self.start_countdown(MinigamePhase::CountdownPost);
                }
            }
            MinigamePhase::CountdownPost => {
                if self.countdown_step() {
                    self.phase = MinigamePhase::Input;
                    self.phase_timer = 0.0;
                    self.time_left = self.input_window();
                    self.events.push(MinigameEvent::InputOpen);
                }
            }
            MinigamePhase::Input => {
                self.time_left -= delta;
                if self.time_left <= 0.0 {
                    self.time_left = 0.0;
                    self.events.push(MinigameEvent::TimedOut);
                    self.resolve(Outcome::Failure, RESULT_TIMEOUT_SECS);
                }
            }
            MinigamePhase::Result => {}
        }

        Ok(())
    }

    /// Feeds one pad press. Ignored outside the input window. The first wrong
    /// symbol ends the round immediately; a complete match wins it.
    pub fn press(&mut self, symbol: u8) {
        if self.phase != MinigamePhase::Input {
            return;
        }

        self.events.push(MinigameEvent::Pressed(symbol));
        self.player_sequence.push(symbol);

        let index = self.player_sequence.len() - 1;
        if self.sequence.get(index) != Some(&symbol) {
            self.resolve(Outcome::Failure, RESULT_FAILURE_SECS);
            return;
        }

        if self.player_sequence.len() == self.sequence.len() {
            self.resolve(Outcome::Success, RESULT_SUCCESS_SECS);
        }
    }

    /// Fail-safe for orchestration errors: the player is never punished for a
    /// crash inside the challenge, the round auto-wins instead.
    pub fn force_success(&mut self) {
        self.resolve(Outcome::Success, 0.0);
    }

    /// The resolved outcome, once, after the result display delay has run.
    pub fn take_outcome(&mut self) -> Option<Outcome> {
        if self.phase == MinigamePhase::Result
            && !self.delivered
            && self.phase_timer >= self.result_delay
        {
            self.delivered = true;
            return self.outcome;
        }
        None
    }

    pub fn drain_events(&mut self) -> Vec<MinigameEvent> {
        std::mem::take(&mut self.events)
    }

    fn start_countdown(&mut self, phase: MinigamePhase) {
        self.phase = phase;
        self.phase_timer = 0.0;
        self.countdown_value = COUNTDOWN_STEPS;
        self.events.push(MinigameEvent::CountdownTick(COUNTDOWN_STEPS));
    }

    /// One countdown update. Returns true when the countdown has finished.
    fn countdown_step(&mut self) -> bool {
        if self.phase_timer < COUNTDOWN_STEP_SECS {
            return false;
        }

        self.phase_timer -= COUNTDOWN_STEP_SECS;
        self.countdown_value -= 1;

        if self.countdown_value == 0 {
            true
        } else {
            self.events.push(MinigameEvent::CountdownTick(self.countdown_value));
            false
        }
    }

    fn demo_step(&mut self) -> Result<(), MinigameError> {
        if self.active_symbol.is_some() {
            if self.phase_timer >= DEMO_ON_SECS {
                self.active_symbol = None;
                self.demo_index += 1;
                self.phase_timer = 0.0;
                self.events.push(MinigameEvent::SymbolDark);
            }
            return Ok(());
        }

        let gap = if self.demo_index == 0 {
            DEMO_LEAD_IN_SECS
        } else {
            DEMO_GAP_SECS
        };

        if self.phase_timer < gap {
            return Ok(());
        }

        if self.demo_index >= self.sequence.len() {
            self.phase = MinigamePhase::Waiting;
            self.phase_timer = 0.0;
            return Ok(());
        }

        let symbol = *self
            .sequence
            .get(self.demo_index)
            .ok_or(MinigameError::MissingSymbol(self.demo_index))?;
        self.active_symbol = Some(symbol);
        self.phase_timer = 0.0;
        self.events.push(MinigameEvent::SymbolLit(symbol));

        Ok(())
    }

    fn resolve(&mut self, outcome: Outcome, delay: f32) {
        self.phase = MinigamePhase::Result;
        self.phase_timer = 0.0;
        self.result_delay = delay;
        self.outcome = Some(outcome);
        self.active_symbol = None;
        self.events.push(MinigameEvent::Resolved(outcome));
        debug!("Challenge resolved: {outcome:?}");
    }
}

/// Generates the round's sequence: one symbol per level, uniform over the
/// pad, with consecutive repeats redrawn whenever the sequence is longer
/// than one.
#[must_use]
pub fn generate_sequence(level: u32) -> Vec<u8> {
    let mut sequence = Vec::with_capacity(level as usize);
    let mut last: Option<u8> = None;

    for _ in 0..level {
        let mut symbol = fastrand::u8(0..SYMBOL_COUNT);
        while level > 1 && last == Some(symbol) {
            symbol = fastrand::u8(0..SYMBOL_COUNT);
        }
        sequence.push(symbol);
        last = Some(symbol);
    }

    sequence
}
