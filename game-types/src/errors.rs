use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use crate::GameStatus;

/// Bad user input. Always recoverable: re-prompt, nothing was mutated.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum ValidationError {
    #[error("empty name")]
    EmptyName,
    #[error("name is longer than {max} characters")]
    NameTooLong { max: u32 },
    #[error("out of range or not a number: {raw:?}")]
    NotANumber { raw: String },
    #[error("out of range or not a number: {value}")]
    OutOfRange {
        #[ts(type = "number")]
        value: i64,
    },
}

/// Failure talking to the record store. Callers degrade instead of failing.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum StoreError {
    #[error("database error: {message}")]
    Database { message: String },
    #[error("request failed: {message}")]
    Request { message: String },
    #[error("store responded with status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
    #[error("could not decode store response: {message}")]
    Decode { message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum SessionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("cannot {operation} while the game is {current_state:?}")]
    InvalidState {
        operation: String,
        current_state: GameStatus,
    },
}
