use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Minimum usable points a symbol must have before a game can start.
/// Checked at ingestion, before any session exists.
pub const MIN_HISTORY: usize = 30;

/// One daily closing-price observation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Ascending-by-date sequence of closing prices for one ticker
///
/// Construction sorts by date and drops duplicate dates, so the
/// ascending/no-duplicates invariant holds for the life of the series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Series(Vec<PricePoint>);

impl Series {
    pub fn new(mut points: Vec<PricePoint>) -> Self {
        points.sort_by_key(|p| p.date);
        points.dedup_by_key(|p| p.date);
        Series(points)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&PricePoint> {
        self.0.get(index)
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.0
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PricePoint> {
        self.0.iter()
    }

    /// Index of the point with this exact date, if present
    pub fn position_of(&self, date: NaiveDate) -> Option<usize> {
        self.0.binary_search_by_key(&date, |p| p.date).ok()
    }

    pub fn last_index(&self) -> Option<usize> {
        self.0.len().checked_sub(1)
    }
}

/// Which way the player thinks the next close goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
}

/// Result of evaluating one prediction against the next unrevealed point
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub correct: bool,
    pub revealed: PricePoint,
    pub new_index: usize,
}

/// One active game: a symbol, its full series, and the player's progress.
/// Replaced wholesale on every ticker load.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameSession {
    pub id: Uuid,
    pub symbol: String,
    pub series: Series,
    /// Index of the last revealed point
    pub current_index: usize,
    pub score: u32,
}

impl GameSession {
    pub fn new(symbol: String, series: Series, start_index: usize) -> Self {
        Self {
            id: Uuid::new_v4(),
            symbol,
            series,
            current_index: start_index,
            score: 0,
        }
    }

    /// The last revealed point, i.e. "today" from the player's perspective
    pub fn current_point(&self) -> Option<&PricePoint> {
        self.series.get(self.current_index)
    }

    /// True once there is no further point to reveal
    pub fn is_exhausted(&self) -> bool {
        self.current_index + 1 >= self.series.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_series_sorts_ascending() {
        let series = Series::new(vec![
            PricePoint { date: d("2024-03-06"), close: 12.0 },
            PricePoint { date: d("2024-03-04"), close: 10.0 },
            PricePoint { date: d("2024-03-05"), close: 11.0 },
        ]);

        let dates: Vec<_> = series.iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![d("2024-03-04"), d("2024-03-05"), d("2024-03-06")]);
    }

    #[test]
    fn test_series_drops_duplicate_dates() {
        let series = Series::new(vec![
            PricePoint { date: d("2024-03-04"), close: 10.0 },
            PricePoint { date: d("2024-03-04"), close: 99.0 },
            PricePoint { date: d("2024-03-05"), close: 11.0 },
        ]);

        assert_eq!(series.len(), 2);
        assert_eq!(series.get(0).unwrap().close, 10.0);
    }

    #[test]
    fn test_position_of() {
        let series = Series::new(vec![
            PricePoint { date: d("2024-03-04"), close: 10.0 },
            PricePoint { date: d("2024-03-06"), close: 12.0 },
        ]);

        assert_eq!(series.position_of(d("2024-03-06")), Some(1));
        assert_eq!(series.position_of(d("2024-03-05")), None);
    }

    #[test]
    fn test_session_exhaustion() {
        let series = Series::new(vec![
            PricePoint { date: d("2024-03-04"), close: 10.0 },
            PricePoint { date: d("2024-03-05"), close: 11.0 },
        ]);

        let mut session = GameSession::new("TEST".to_string(), series, 0);
        assert!(!session.is_exhausted());

        session.current_index = 1;
        assert!(session.is_exhausted());
        assert_eq!(session.current_point().unwrap().close, 11.0);
    }
}
