use game_types::{MAX_GUESS, MIN_GUESS, ValidationError};
use std::num::{IntErrorKind, ParseIntError};

/// Longest player name accepted, in characters
pub const MAX_NAME_LENGTH: usize = 32;

pub struct InputValidator;

impl InputValidator {
    /// Validate a player name, returning the trimmed name to store
    pub fn validate_player_name(raw: &str) -> Result<String, ValidationError> {
        let name = raw.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName);
        }
        if name.chars().count() > MAX_NAME_LENGTH {
            return Err(ValidationError::NameTooLong {
                max: MAX_NAME_LENGTH as u32,
            });
        }
        Ok(name.to_string())
    }

    /// Parse raw guess text into a value in 1..=100
    pub fn parse_guess(raw: &str) -> Result<u8, ValidationError> {
        let trimmed = raw.trim();
        // Integers too wide for i64 are still integers, just out of range
        let value: i64 = trimmed.parse().map_err(|e: ParseIntError| match e.kind() {
            IntErrorKind::PosOverflow => ValidationError::OutOfRange { value: i64::MAX },
            IntErrorKind::NegOverflow => ValidationError::OutOfRange { value: i64::MIN },
            _ => ValidationError::NotANumber {
                raw: trimmed.to_string(),
            },
        })?;

        if value < MIN_GUESS as i64 || value > MAX_GUESS as i64 {
            return Err(ValidationError::OutOfRange { value });
        }

        Ok(value as u8)
    }
}
