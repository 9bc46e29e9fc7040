use game_types::{GameRecord, Hint};

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    GameStarted {
        player_name: String,
    },
    GuessEvaluated {
        guess: u8,
        hint: Hint,
        attempts: u32,
    },
    /// Published exactly once per win; presentation hooks its celebration here.
    GameWon {
        player_name: String,
        target: u8,
        attempts: u32,
        time_seconds: f64,
    },
    RecordSaved {
        record: GameRecord,
    },
    RecordDropped {
        record: GameRecord,
    },
    LeaderboardRefreshed {
        entries: usize,
    },
    GameReset,
}

/// Event handler trait for processing game events
pub trait GameEventHandler: Send {
    fn handle_event(&mut self, event: GameEvent);
}

/// Simple event bus for distributing game events
pub struct GameEventBus {
    handlers: Vec<Box<dyn GameEventHandler>>,
}

impl GameEventBus {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn add_handler(&mut self, handler: Box<dyn GameEventHandler>) {
        self.handlers.push(handler);
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    pub fn publish(&mut self, event: GameEvent) {
        for handler in &mut self.handlers {
            handler.handle_event(event.clone());
        }
    }
}

impl Default for GameEventBus {
    fn default() -> Self {
        Self::new()
    }
}
