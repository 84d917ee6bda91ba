#![warn(clippy::all, clippy::pedantic)]

use serde::{Deserialize, Serialize};

/// Maximum number of leaderboard entries to keep
pub const MAX_ENTRIES: usize = 10;

/// A single finished run on the leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
    /// Highest level reached
    pub level: u32,
    /// Formatted `m:ss` time for display
    pub time: String,
    /// Raw seconds, used as the tie-breaker
    pub time_seconds: u32,
    /// Unix timestamp of the run
    pub date: u64,
}

impl ScoreEntry {
    #[must_use]
    pub fn new(name: &str, score: u32, level: u32, time_seconds: u32, date: u64) -> Self {
        Self {
            name: if name.trim().is_empty() {
                "Anonymous".to_string()
            } else {
                name.trim().to_string()
            },
            score,
            level,
            time: format_time(time_seconds),
            time_seconds,
            date,
        }
    }

    /// True when `self` ranks above `other`: higher score first, faster run
    /// on equal scores.
    #[must_use]
    pub fn outranks(&self, other: &Self) -> bool {
        if self.score != other.score {
            self.score > other.score
        } else {
            self.time_seconds < other.time_seconds
        }
    }
}

/// Capped top-10 ranking, score descending, ties broken by ascending time.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Leaderboard {
    pub entries: Vec<ScoreEntry>,
}

impl Leaderboard {
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Inserts the entry at its rank and trims to the cap. Returns the
    /// 1-indexed rank achieved, or `None` when the entry fell off the end.
    pub fn add_entry(&mut self, entry: ScoreEntry) -> Option<usize> {
        let position = self
            .entries
            .iter()
            .position(|existing| entry.outranks(existing))
            .unwrap_or(self.entries.len());

        self.entries.insert(position, entry);
        self.entries.truncate(MAX_ENTRIES);

        if position < MAX_ENTRIES {
            Some(position + 1)
        } else {
            None
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn top_score(&self) -> Option<u32> {
        self.entries.first().map(|entry| entry.score)
    }
}

/// The in-progress snapshot written for resume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedProgress {
    pub player_name: String,
    pub level: u32,
    pub score: u32,
    pub game_time: u32,
}

/// Formats whole seconds as `m:ss`.
#[must_use]
pub fn format_time(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
