use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Lowest value the hidden target (and any valid guess) can take.
pub const MIN_GUESS: u8 = 1;
/// Highest value the hidden target (and any valid guess) can take.
pub const MAX_GUESS: u8 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum GameStatus {
    Ready,   // Idle, showing the leaderboard
    Playing, // Target set, accepting guesses
    Won,     // Round finished, showing the result
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum Hint {
    TooLow,  // Guess was below the target, go higher
    TooHigh, // Guess was above the target, go lower
    Correct,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GuessEntry {
    pub value: u8,
    pub hint: Hint,
    /// 1-based position of this guess within the round.
    pub sequence: u32,
}

/// A finished round as persisted by the record store.
///
/// Field names are the wire contract of the hosted `game_records` table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GameRecord {
    pub name: String,
    pub attempts: u32,
    pub time_seconds: f64,
    /// Assigned by the store on insert (RFC 3339).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[ts(optional)]
    pub created_at: Option<String>,
}

impl GameRecord {
    pub fn new(name: impl Into<String>, attempts: u32, time_seconds: f64) -> Self {
        Self {
            name: name.into(),
            attempts,
            time_seconds,
            created_at: None,
        }
    }

    pub fn score(&self) -> Score {
        Score {
            attempts: self.attempts,
            time_seconds: self.time_seconds,
        }
    }
}

/// The part of a record that ranking looks at.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Score {
    pub attempts: u32,
    pub time_seconds: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct WinSummary {
    pub player_name: String,
    pub target: u8,
    pub attempts: u32,
    pub time_seconds: f64,
    /// Whether this round beat the leader known before it was saved.
    pub new_best: bool,
}

/// Serializable view of a session. The target is never included; it is only
/// revealed through `last_win` once the round is over.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SessionSnapshot {
    pub status: GameStatus,
    pub player_name: String,
    pub attempts: u32,
    pub guesses: Vec<GuessEntry>, // Oldest first, reverse for display
    pub elapsed_seconds: f64,
    pub message: String,
    pub leaderboard: Vec<GameRecord>,
    pub last_win: Option<WinSummary>,
}

impl SessionSnapshot {
    pub fn best_record(&self) -> Option<&GameRecord> {
        self.leaderboard.first()
    }
}
