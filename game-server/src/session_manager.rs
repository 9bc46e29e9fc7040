use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::info;
use uuid::Uuid;

use game_core::{GameSession, RecordStore, SessionSettings};
use game_types::{Hint, SessionError, SessionSnapshot};

pub type SessionId = Uuid;

#[derive(Debug, Error)]
pub enum SessionManagerError {
    #[error("session {0} not found")]
    NotFound(SessionId),
    #[error(transparent)]
    Session(#[from] SessionError),
}

struct ActiveSession {
    game: GameSession,
    last_activity: Instant,
}

impl ActiveSession {
    fn touch(&mut self) -> &mut GameSession {
        self.last_activity = Instant::now();
        &mut self.game
    }

    fn is_expired(&self, timeout: Duration) -> bool {
        self.last_activity.elapsed() > timeout
    }
}

/// Hosts one independent [`GameSession`] per client.
///
/// Each session has its own lock, so requests for one session are handled one
/// at a time while other sessions (and slow store calls on them) proceed freely.
pub struct SessionManager {
    sessions: RwLock<HashMap<SessionId, Arc<Mutex<ActiveSession>>>>,
    store: Arc<dyn RecordStore>,
    settings: SessionSettings,
}

impl SessionManager {
    pub fn new(store: Arc<dyn RecordStore>, settings: SessionSettings) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            store,
            settings,
        }
    }

    pub fn store(&self) -> Arc<dyn RecordStore> {
        self.store.clone()
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    pub async fn create_session(&self) -> (SessionId, SessionSnapshot) {
        let mut game = GameSession::new(self.store.clone(), self.settings.clone());
        game.refresh_leaderboard().await;
        let snapshot = game.snapshot();

        let session_id = Uuid::new_v4();
        let active = ActiveSession {
            game,
            last_activity: Instant::now(),
        };

        {
            let mut sessions = self.sessions.write().await;
            sessions.insert(session_id, Arc::new(Mutex::new(active)));
        }

        info!("Created session {}", session_id);
        (session_id, snapshot)
    }

    async fn session(
        &self,
        session_id: SessionId,
    ) -> Result<Arc<Mutex<ActiveSession>>, SessionManagerError> {
        let sessions = self.sessions.read().await;
        sessions
            .get(&session_id)
            .cloned()
            .ok_or(SessionManagerError::NotFound(session_id))
    }

    pub async fn snapshot(
        &self,
        session_id: SessionId,
    ) -> Result<SessionSnapshot, SessionManagerError> {
        let session = self.session(session_id).await?;
        let active = session.lock().await;
        Ok(active.game.snapshot())
    }

    pub async fn start_game(
        &self,
        session_id: SessionId,
        player_name: &str,
    ) -> Result<SessionSnapshot, SessionManagerError> {
        let session = self.session(session_id).await?;
        let mut active = session.lock().await;
        let game = active.touch();
        game.start_game(player_name)?;
        Ok(game.snapshot())
    }

    pub async fn submit_guess(
        &self,
        session_id: SessionId,
        raw_guess: &str,
    ) -> Result<(Hint, SessionSnapshot), SessionManagerError> {
        let session = self.session(session_id).await?;
        let mut active = session.lock().await;
        let game = active.touch();
        let hint = game.submit_guess(raw_guess).await?;
        Ok((hint, game.snapshot()))
    }

    pub async fn reset_game(
        &self,
        session_id: SessionId,
    ) -> Result<SessionSnapshot, SessionManagerError> {
        let session = self.session(session_id).await?;
        let mut active = session.lock().await;
        let game = active.touch();
        game.reset_game().await?;
        Ok(game.snapshot())
    }

    pub async fn remove_session(&self, session_id: SessionId) -> bool {
        let removed = self.sessions.write().await.remove(&session_id).is_some();
        if removed {
            info!("Removed session {}", session_id);
        }
        removed
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Drop sessions idle for longer than `timeout`. Sessions busy handling a request are kept.
    pub async fn cleanup_inactive_sessions(&self, timeout: Duration) -> usize {
        let mut sessions_to_remove = Vec::new();

        {
            let sessions = self.sessions.read().await;
            for (session_id, session) in sessions.iter() {
                if let Ok(active) = session.try_lock() {
                    if active.is_expired(timeout) {
                        sessions_to_remove.push(*session_id);
                    }
                }
            }
        }

        if !sessions_to_remove.is_empty() {
            let mut sessions = self.sessions.write().await;
            for session_id in &sessions_to_remove {
                if sessions.remove(session_id).is_some() {
                    info!("Removed inactive session {}", session_id);
                }
            }
        }

        sessions_to_remove.len()
    }
}
