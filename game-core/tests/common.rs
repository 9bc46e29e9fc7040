#![allow(dead_code)]

use game_core::{
    GameEvent, GameEventHandler, GameSession, InMemoryRecordStore, RecordStore, ScoringEngine,
    SessionSettings,
};
use game_types::{GameStatus, Hint};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::{Arc, Mutex};

pub const TEST_SEED: u64 = 7;

/// The first target a session seeded with `seed` will draw
pub fn first_target_for_seed(seed: u64) -> u8 {
    ScoringEngine::generate_target_with(&mut StdRng::seed_from_u64(seed))
}

/// Creates a seeded session over the given store
pub fn create_seeded_session(store: Arc<dyn RecordStore>, seed: u64) -> GameSession {
    GameSession::new(
        store,
        SessionSettings {
            seed: Some(seed),
            ..SessionSettings::default()
        },
    )
}

/// Creates a seeded session over a fresh in-memory store
pub fn create_test_session() -> (GameSession, Arc<InMemoryRecordStore>) {
    let store = Arc::new(InMemoryRecordStore::new());
    let session = create_seeded_session(store.clone(), TEST_SEED);
    (session, store)
}

/// Plays the current round to a win by bisection, returning the guesses used
pub async fn play_to_win(session: &mut GameSession) -> Vec<u8> {
    let (mut low, mut high) = (1u8, 100u8);
    let mut guesses = Vec::new();

    while session.status() == GameStatus::Playing {
        let guess = low + (high - low) / 2;
        guesses.push(guess);
        match session.submit_guess(&guess.to_string()).await.unwrap() {
            Hint::TooLow => low = guess + 1,
            Hint::TooHigh => high = guess - 1,
            Hint::Correct => break,
        }
    }

    guesses
}

/// Event collector for testing event emissions
#[derive(Clone)]
pub struct EventCollector {
    events: Arc<Mutex<Vec<GameEvent>>>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn get_events(&self) -> Vec<GameEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.events.lock().unwrap().clear();
    }

    pub fn count(&self, check_fn: impl Fn(&GameEvent) -> bool) -> usize {
        self.events.lock().unwrap().iter().filter(|e| check_fn(e)).count()
    }
}

impl GameEventHandler for EventCollector {
    fn handle_event(&mut self, event: GameEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Asserts that a session is in a specific state
pub fn assert_session_state(
    session: &GameSession,
    expected_status: GameStatus,
    expected_attempts: u32,
) {
    assert_eq!(
        session.status(),
        expected_status,
        "Expected status {:?}, got {:?}",
        expected_status,
        session.status()
    );
    assert_eq!(
        session.attempts(),
        expected_attempts,
        "Expected {} attempts, got {}",
        expected_attempts,
        session.attempts()
    );
}
