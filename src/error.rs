use chrono::NaiveDate;
use thiserror::Error;

use crate::models::MIN_HISTORY;

/// Everything that can end a load attempt or a round.
///
/// All variants are terminal to the attempt and surfaced to the player
/// verbatim; nothing is retried automatically. `NoMoreData` is the normal
/// end-of-series condition, not a failure.
#[derive(Debug, Error)]
pub enum GameError {
    #[error("Please enter a ticker symbol.")]
    EmptySymbol,

    #[error("Invalid symbol '{0}'. Please try another.")]
    InvalidSymbol(String),

    #[error("API limit reached. Please wait a minute and try again.")]
    RateLimited,

    #[error("Network error fetching data: {0}")]
    Network(String),

    #[error("Insufficient history for this symbol ({got} points, need {MIN_HISTORY}). Try another.")]
    InsufficientHistory { got: usize },

    #[error("Could not find a valid start date. Try again.")]
    NoValidStartDate,

    #[error("Start date {0} not found in series")]
    StartDateNotFound(NaiveDate),

    #[error("No more data available.")]
    NoMoreData,

    #[error("No game in progress. Load a ticker first.")]
    NoActiveGame,
}

impl From<reqwest::Error> for GameError {
    fn from(err: reqwest::Error) -> Self {
        GameError::Network(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GameError>;
