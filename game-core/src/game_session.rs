use game_types::{
    GameRecord, GameStatus, GuessEntry, Hint, SessionError, SessionSnapshot, WinSummary,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

use crate::record_store::{load_best, load_top, save_record};
use crate::{GameEvent, GameEventBus, GameEventHandler, InputValidator, RecordStore, ScoringEngine};

pub const DEFAULT_LEADERBOARD_SIZE: u64 = 10;

const READY_MESSAGE: &str = "Guess the number between 1 and 100!";
const PLAYING_MESSAGE: &str = "Good luck! Enter a number.";

#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// How many ranked records to keep on display
    pub leaderboard_size: u64,
    /// Fixed RNG seed for reproducible targets; random when unset
    pub seed: Option<u64>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            leaderboard_size: DEFAULT_LEADERBOARD_SIZE,
            seed: None,
        }
    }
}

/// One player's game: READY -> PLAYING -> WON -> READY.
///
/// Every win is written to the record store and the leaderboard is re-read
/// afterwards. Elapsed time is computed on read while playing, so there is no
/// ticker to start or stop.
pub struct GameSession {
    status: GameStatus,
    player_name: String,
    target: Option<u8>,
    guesses: Vec<GuessEntry>,
    started_at: Option<Instant>,
    final_time: Option<f64>,
    message: String,
    leaderboard: Vec<GameRecord>,
    last_win: Option<WinSummary>,
    store: Arc<dyn RecordStore>,
    event_bus: GameEventBus,
    rng: StdRng,
    leaderboard_size: u64,
}

impl GameSession {
    pub fn new(store: Arc<dyn RecordStore>, settings: SessionSettings) -> Self {
        let rng = match settings.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };

        Self {
            status: GameStatus::Ready,
            player_name: String::new(),
            target: None,
            guesses: Vec::new(),
            started_at: None,
            final_time: None,
            message: READY_MESSAGE.to_string(),
            leaderboard: Vec::new(),
            last_win: None,
            store,
            event_bus: GameEventBus::new(),
            rng,
            leaderboard_size: settings.leaderboard_size,
        }
    }

    pub fn add_event_handler(&mut self, handler: Box<dyn GameEventHandler>) {
        self.event_bus.add_handler(handler);
    }

    /// READY -> PLAYING. Draws a fresh target and starts the clock.
    pub fn start_game(&mut self, player_name: &str) -> Result<(), SessionError> {
        self.ensure_status(GameStatus::Ready, "start a game")?;
        let name = InputValidator::validate_player_name(player_name)?;
        let target = ScoringEngine::generate_target_with(&mut self.rng);
        self.begin_round(name, target);
        Ok(())
    }

    fn begin_round(&mut self, player_name: String, target: u8) {
        info!("{} started a new game", player_name);

        self.player_name = player_name.clone();
        self.target = Some(target);
        self.guesses.clear();
        self.started_at = Some(Instant::now());
        self.final_time = None;
        self.last_win = None;
        self.message = PLAYING_MESSAGE.to_string();
        self.status = GameStatus::Playing;

        self.event_bus.publish(GameEvent::GameStarted { player_name });
    }

    /// Evaluate one guess. Invalid input leaves the session untouched.
    pub async fn submit_guess(&mut self, raw: &str) -> Result<Hint, SessionError> {
        self.ensure_status(GameStatus::Playing, "submit a guess")?;
        let Some(target) = self.target else {
            return Err(self.invalid_state("submit a guess"));
        };
        let guess = InputValidator::parse_guess(raw)?;

        let hint = ScoringEngine::evaluate_guess(guess, target);
        self.guesses.push(GuessEntry {
            value: guess,
            hint,
            sequence: self.guesses.len() as u32 + 1,
        });
        let attempts = self.attempts();
        debug!(
            "{} guessed {} ({:?}), attempt {}",
            self.player_name, guess, hint, attempts
        );

        self.event_bus.publish(GameEvent::GuessEvaluated {
            guess,
            hint,
            attempts,
        });

        if hint == Hint::Correct {
            self.finish_round(target).await;
        } else {
            self.message = ScoringEngine::hint_message(hint, target);
        }

        Ok(hint)
    }

    async fn finish_round(&mut self, target: u8) {
        let attempts = self.attempts();
        let time_seconds = ScoringEngine::round_time(self.live_elapsed());

        self.status = GameStatus::Won;
        self.final_time = Some(time_seconds);
        self.message = ScoringEngine::hint_message(Hint::Correct, target);

        info!(
            "{} found {} in {} attempts ({}s)",
            self.player_name, target, attempts, time_seconds
        );
        self.event_bus.publish(GameEvent::GameWon {
            player_name: self.player_name.clone(),
            target,
            attempts,
            time_seconds,
        });

        let record = GameRecord::new(self.player_name.clone(), attempts, time_seconds);
        // Other sessions may have written since our last refresh
        let previous_best = load_best(self.store.as_ref())
            .await
            .map(|best| best.score());
        self.last_win = Some(WinSummary {
            player_name: self.player_name.clone(),
            target,
            attempts,
            time_seconds,
            new_best: ScoringEngine::is_new_best(&record.score(), previous_best.as_ref()),
        });

        if save_record(self.store.as_ref(), &record).await {
            self.event_bus.publish(GameEvent::RecordSaved { record });
        } else {
            self.event_bus.publish(GameEvent::RecordDropped { record });
        }

        self.refresh_leaderboard().await;
    }

    /// WON -> READY. Also allowed from READY, where it only refreshes the leaderboard.
    pub async fn reset_game(&mut self) -> Result<(), SessionError> {
        if self.status == GameStatus::Playing {
            return Err(self.invalid_state("reset the game"));
        }

        self.status = GameStatus::Ready;
        self.player_name.clear();
        self.target = None;
        self.guesses.clear();
        self.started_at = None;
        self.final_time = None;
        self.last_win = None;
        self.message = READY_MESSAGE.to_string();

        self.event_bus.publish(GameEvent::GameReset);
        self.refresh_leaderboard().await;
        Ok(())
    }

    /// Re-read the top records. An unreachable store yields an empty board.
    pub async fn refresh_leaderboard(&mut self) {
        self.leaderboard = load_top(self.store.as_ref(), self.leaderboard_size).await;
        self.event_bus.publish(GameEvent::LeaderboardRefreshed {
            entries: self.leaderboard.len(),
        });
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    pub fn attempts(&self) -> u32 {
        self.guesses.len() as u32
    }

    /// Guesses in the order they were made
    pub fn guesses(&self) -> &[GuessEntry] {
        &self.guesses
    }

    pub fn history_most_recent_first(&self) -> impl Iterator<Item = &GuessEntry> {
        self.guesses.iter().rev()
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn leaderboard(&self) -> &[GameRecord] {
        &self.leaderboard
    }

    pub fn best_record(&self) -> Option<&GameRecord> {
        self.leaderboard.first()
    }

    pub fn last_win(&self) -> Option<&WinSummary> {
        self.last_win.as_ref()
    }

    /// Seconds since the round started; frozen once won, zero when idle
    pub fn elapsed_seconds(&self) -> f64 {
        match self.status {
            GameStatus::Ready => 0.0,
            GameStatus::Playing => self.live_elapsed(),
            GameStatus::Won => self.final_time.unwrap_or_default(),
        }
    }

    fn live_elapsed(&self) -> f64 {
        self.started_at
            .map(|started| started.elapsed().as_secs_f64())
            .unwrap_or_default()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            status: self.status,
            player_name: self.player_name.clone(),
            attempts: self.attempts(),
            guesses: self.guesses.clone(),
            elapsed_seconds: self.elapsed_seconds(),
            message: self.message.clone(),
            leaderboard: self.leaderboard.clone(),
            last_win: self.last_win.clone(),
        }
    }

    fn ensure_status(&self, expected: GameStatus, operation: &str) -> Result<(), SessionError> {
        if self.status == expected {
            Ok(())
        } else {
            Err(self.invalid_state(operation))
        }
    }

    fn invalid_state(&self, operation: &str) -> SessionError {
        SessionError::InvalidState {
            operation: operation.to_string(),
            current_state: self.status,
        }
    }
}
