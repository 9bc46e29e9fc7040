use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use warp::Filter;
use warp::http::StatusCode;

use crate::config::{Config, StoreBackend};
use crate::session_manager::{SessionId, SessionManager, SessionManagerError};
use game_core::{InMemoryRecordStore, RecordStore, load_top};
use game_persistence::connection::connect_and_migrate;
use game_persistence::{RecordRepository, RestRecordStore};
use game_types::{GameRecord, Hint, SessionError, SessionSnapshot};

pub mod config;
pub mod session_manager;

/// Largest leaderboard page a client may ask for
pub const MAX_LEADERBOARD_LIMIT: u64 = 100;

#[derive(Deserialize)]
struct LeaderboardQuery {
    limit: Option<u64>,
}

#[derive(Deserialize)]
struct StartRequest {
    player_name: String,
}

#[derive(Deserialize)]
struct GuessRequest {
    /// Raw input as typed; numbers are accepted too
    guess: serde_json::Value,
}

#[derive(Serialize, Deserialize)]
pub struct CreatedSessionResponse {
    pub session_id: SessionId,
    pub state: SessionSnapshot,
}

#[derive(Serialize, Deserialize)]
pub struct GuessResponse {
    pub hint: Hint,
    pub state: SessionSnapshot,
}

#[derive(Serialize, Deserialize)]
pub struct LeaderboardResponse {
    pub records: Vec<GameRecord>,
}

/// Open the record store selected by the config
pub async fn build_record_store(config: &Config) -> anyhow::Result<Arc<dyn RecordStore>> {
    let store: Arc<dyn RecordStore> = match config.record_store {
        StoreBackend::Sqlite => {
            let db = connect_and_migrate(&config.database_url).await?;
            Arc::new(RecordRepository::new(db))
        }
        StoreBackend::Rest => {
            let url = config.record_store_url.as_deref().unwrap_or_default();
            let key = config.record_store_key.as_deref().unwrap_or_default();
            Arc::new(RestRecordStore::new(
                url,
                key,
                Duration::from_secs(config.record_store_timeout_seconds),
            )?)
        }
        StoreBackend::Memory => Arc::new(InMemoryRecordStore::new()),
    };

    Ok(store)
}

pub fn create_routes(
    session_manager: Arc<SessionManager>,
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let session_manager_filter = warp::any().map({
        let session_manager = session_manager.clone();
        move || session_manager.clone()
    });

    let create_session = warp::path("sessions")
        .and(warp::path::end())
        .and(warp::post())
        .and(session_manager_filter.clone())
        .and_then(handle_create_session);

    let session_state = warp::path!("sessions" / SessionId)
        .and(warp::get())
        .and(session_manager_filter.clone())
        .and_then(handle_session_state);

    let start_game = warp::path!("sessions" / SessionId / "start")
        .and(warp::post())
        .and(warp::body::json::<StartRequest>())
        .and(session_manager_filter.clone())
        .and_then(handle_start_game);

    let submit_guess = warp::path!("sessions" / SessionId / "guess")
        .and(warp::post())
        .and(warp::body::json::<GuessRequest>())
        .and(session_manager_filter.clone())
        .and_then(handle_submit_guess);

    let reset_game = warp::path!("sessions" / SessionId / "reset")
        .and(warp::post())
        .and(session_manager_filter.clone())
        .and_then(handle_reset_game);

    let delete_session = warp::path!("sessions" / SessionId)
        .and(warp::delete())
        .and(session_manager_filter.clone())
        .and_then(handle_delete_session);

    let leaderboard = warp::path("leaderboard")
        .and(warp::get())
        .and(warp::query::<LeaderboardQuery>())
        .and(session_manager_filter.clone())
        .and_then(handle_leaderboard_request);

    // Health check endpoint
    let health = warp::path("health")
        .and(warp::get())
        .map(|| warp::reply::with_status("OK", StatusCode::OK));

    // CORS configuration
    let cors = warp::cors()
        .allow_any_origin()
        .allow_headers(vec!["content-type"])
        .allow_methods(vec!["GET", "POST", "DELETE"]);

    create_session
        .or(session_state)
        .or(start_game)
        .or(submit_guess)
        .or(reset_game)
        .or(delete_session)
        .or(leaderboard)
        .or(health)
        .with(cors)
        .with(warp::log("number_quest"))
}

fn error_reply(err: SessionManagerError) -> warp::reply::WithStatus<warp::reply::Json> {
    let status = match &err {
        SessionManagerError::NotFound(_) => StatusCode::NOT_FOUND,
        SessionManagerError::Session(SessionError::Validation(_)) => StatusCode::BAD_REQUEST,
        SessionManagerError::Session(SessionError::InvalidState { .. }) => StatusCode::CONFLICT,
    };

    warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "error": err.to_string()
        })),
        status,
    )
}

fn json_reply<T: Serialize>(
    body: &T,
    status: StatusCode,
) -> warp::reply::WithStatus<warp::reply::Json> {
    warp::reply::with_status(warp::reply::json(body), status)
}

async fn handle_create_session(
    session_manager: Arc<SessionManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let (session_id, state) = session_manager.create_session().await;
    Ok(json_reply(
        &CreatedSessionResponse { session_id, state },
        StatusCode::CREATED,
    ))
}

async fn handle_session_state(
    session_id: SessionId,
    session_manager: Arc<SessionManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    match session_manager.snapshot(session_id).await {
        Ok(state) => Ok(json_reply(&state, StatusCode::OK)),
        Err(err) => Ok(error_reply(err)),
    }
}

async fn handle_start_game(
    session_id: SessionId,
    request: StartRequest,
    session_manager: Arc<SessionManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    match session_manager
        .start_game(session_id, &request.player_name)
        .await
    {
        Ok(state) => Ok(json_reply(&state, StatusCode::OK)),
        Err(err) => Ok(error_reply(err)),
    }
}

async fn handle_submit_guess(
    session_id: SessionId,
    request: GuessRequest,
    session_manager: Arc<SessionManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let raw_guess = match request.guess {
        serde_json::Value::String(text) => text,
        other => other.to_string(),
    };

    match session_manager.submit_guess(session_id, &raw_guess).await {
        Ok((hint, state)) => Ok(json_reply(&GuessResponse { hint, state }, StatusCode::OK)),
        Err(err) => Ok(error_reply(err)),
    }
}

async fn handle_reset_game(
    session_id: SessionId,
    session_manager: Arc<SessionManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    match session_manager.reset_game(session_id).await {
        Ok(state) => Ok(json_reply(&state, StatusCode::OK)),
        Err(err) => Ok(error_reply(err)),
    }
}

async fn handle_delete_session(
    session_id: SessionId,
    session_manager: Arc<SessionManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    if session_manager.remove_session(session_id).await {
        Ok(json_reply(
            &serde_json::json!({ "removed": session_id }),
            StatusCode::OK,
        ))
    } else {
        Ok(error_reply(SessionManagerError::NotFound(session_id)))
    }
}

async fn handle_leaderboard_request(
    query: LeaderboardQuery,
    session_manager: Arc<SessionManager>,
) -> Result<impl warp::Reply, warp::Rejection> {
    let limit = query
        .limit
        .unwrap_or(session_manager.settings().leaderboard_size)
        .clamp(1, MAX_LEADERBOARD_LIMIT);

    let store = session_manager.store();
    let records = load_top(store.as_ref(), limit).await;
    Ok(json_reply(&LeaderboardResponse { records }, StatusCode::OK))
}
