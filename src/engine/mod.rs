//! Round Engine: the pure transformations behind one game.
//!
//! Everything here operates on an immutable [`Series`] snapshot and returns
//! values; score and index mutation belong to the controller. Randomness is
//! an injected [`Rng`] so tests can seed a `StdRng` and replay a game.

use chrono::{Datelike, Duration, NaiveDate, Weekday};
use rand::Rng;

use crate::error::{GameError, Result};
use crate::models::{Direction, Outcome, PricePoint, Series};

/// Start dates must be at least this many calendar days old
pub const MIN_START_AGE_DAYS: i64 = 7;
/// ... and at most this many
pub const MAX_START_AGE_DAYS: i64 = 100;
/// Trading days of lookback shown before the start date
pub const LOOKBACK_POINTS: usize = 7;

fn is_weekday(date: NaiveDate) -> bool {
    !matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Pick a random start date for a new game.
///
/// Candidates are the series dates falling within `[today - 100d, today - 7d]`
/// that are weekdays; the draw is uniform over that candidate list. The
/// weekday filter is a heuristic proxy for "likely a trading day" and is
/// deliberately blind to exchange holidays.
pub fn select_start_date<R: Rng>(
    series: &Series,
    today: NaiveDate,
    rng: &mut R,
) -> Result<NaiveDate> {
    let min_date = today - Duration::days(MAX_START_AGE_DAYS);
    let max_date = today - Duration::days(MIN_START_AGE_DAYS);

    let candidates: Vec<NaiveDate> = series
        .iter()
        .map(|p| p.date)
        .filter(|d| *d >= min_date && *d <= max_date)
        .filter(|d| is_weekday(*d))
        .collect();

    if candidates.is_empty() {
        return Err(GameError::NoValidStartDate);
    }
    Ok(candidates[rng.gen_range(0..candidates.len())])
}

/// Slice the lookback window ending at `start_date`.
///
/// Returns up to [`LOOKBACK_POINTS`] points of history plus the start date
/// itself (fewer near the beginning of the series), and the start date's
/// index in the series.
pub fn build_initial_window(
    series: &Series,
    start_date: NaiveDate,
) -> Result<(&[PricePoint], usize)> {
    let start_idx = series
        .position_of(start_date)
        .ok_or(GameError::StartDateNotFound(start_date))?;

    let window_start = start_idx.saturating_sub(LOOKBACK_POINTS);
    Ok((&series.points()[window_start..=start_idx], start_idx))
}

/// Judge one up/down call against the next chronological point.
///
/// Strictly-greater counts as up; an unchanged close counts as "did not go
/// up", so ties resolve in Down's favor. Fails with `NoMoreData` once
/// `current_index` is the last index.
pub fn evaluate_prediction(
    series: &Series,
    current_index: usize,
    direction: Direction,
) -> Result<Outcome> {
    let baseline = series.get(current_index).ok_or(GameError::NoMoreData)?;
    let next = series.get(current_index + 1).ok_or(GameError::NoMoreData)?;

    let went_up = next.close > baseline.close;
    let correct = (direction == Direction::Up) == went_up;

    Ok(Outcome {
        correct,
        revealed: next.clone(),
        new_index: current_index + 1,
    })
}
