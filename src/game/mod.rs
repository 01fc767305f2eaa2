//! Game controller: owns the session, validates state transitions, and
//! drives the chart. All price logic lives in [`crate::engine`]; this module
//! only sequences it.

use chrono::{NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::api::MarketDataClient;
use crate::chart::ChartRenderer;
use crate::engine;
use crate::error::{GameError, Result};
use crate::models::{Direction, GameSession, PricePoint};

/// Lifecycle of one game. `Loading` falls back to `Idle` on any failure;
/// `Ended` is terminal until the next load.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameState {
    Idle,
    Loading,
    Active,
    Ended,
}

/// What one prediction produced, for display
#[derive(Debug, Clone)]
pub struct RoundResult {
    pub correct: bool,
    pub revealed: PricePoint,
    pub score: u32,
    /// True when the reveal consumed the last point; the game is over,
    /// but as a normal end of data rather than an error.
    pub series_exhausted: bool,
}

pub struct GameController<M, C> {
    client: M,
    chart: C,
    rng: StdRng,
    state: GameState,
    session: Option<GameSession>,
}

impl<M: MarketDataClient, C: ChartRenderer> GameController<M, C> {
    pub fn new(client: M, chart: C) -> Self {
        Self::with_seed(client, chart, rand::random())
    }

    /// Seeded constructor for reproducible start-date selection
    pub fn with_seed(client: M, chart: C, seed: u64) -> Self {
        Self {
            client,
            chart,
            rng: StdRng::seed_from_u64(seed),
            state: GameState::Idle,
            session: None,
        }
    }

    pub fn state(&self) -> GameState {
        self.state
    }

    pub fn session(&self) -> Option<&GameSession> {
        self.session.as_ref()
    }

    pub fn chart(&self) -> &C {
        &self.chart
    }

    /// Load a ticker and start a fresh game on a random recent trading day.
    ///
    /// Any failure (client or start-date selection) drops back to `Idle`
    /// with no session; the previous game, if any, is gone either way.
    pub async fn load_ticker(&mut self, symbol_text: &str) -> Result<()> {
        self.load_ticker_as_of(symbol_text, Utc::now().date_naive())
            .await
    }

    /// Same as [`load_ticker`](Self::load_ticker) with an explicit "today",
    /// so tests can pin the start-date window.
    pub async fn load_ticker_as_of(&mut self, symbol_text: &str, today: NaiveDate) -> Result<()> {
        let symbol = symbol_text.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(GameError::EmptySymbol);
        }

        self.state = GameState::Loading;
        self.session = None;

        let started = async {
            let series = self.client.fetch_daily_series(&symbol).await?;
            let start_date = engine::select_start_date(&series, today, &mut self.rng)?;
            let (window, start_idx) = engine::build_initial_window(&series, start_date)?;

            let labels: Vec<String> = window.iter().map(|p| p.date.to_string()).collect();
            let values: Vec<f64> = window.iter().map(|p| p.close).collect();
            self.chart.render(&labels, &values);

            Ok(GameSession::new(symbol, series, start_idx))
        }
        .await;

        match started {
            Ok(session) => {
                tracing::info!(
                    session_id = %session.id,
                    symbol = %session.symbol,
                    start_date = %session.series.points()[session.current_index].date,
                    points = session.series.len(),
                    "game started"
                );
                self.session = Some(session);
                self.state = GameState::Active;
                Ok(())
            }
            Err(e) => {
                self.state = GameState::Idle;
                Err(e)
            }
        }
    }

    /// Evaluate one up/down call, then apply score/index and extend the chart.
    ///
    /// Score and index only move after a successful evaluation, so a
    /// `NoMoreData` attempt leaves the session untouched (but ends the game).
    pub fn submit_prediction(&mut self, direction: Direction) -> Result<RoundResult> {
        if self.state != GameState::Active {
            return Err(GameError::NoActiveGame);
        }
        let session = self.session.as_mut().ok_or(GameError::NoActiveGame)?;

        let outcome = match engine::evaluate_prediction(
            &session.series,
            session.current_index,
            direction,
        ) {
            Ok(outcome) => outcome,
            Err(e) => {
                if matches!(e, GameError::NoMoreData) {
                    self.state = GameState::Ended;
                }
                return Err(e);
            }
        };

        if outcome.correct {
            session.score += 1;
        }
        session.current_index = outcome.new_index;
        self.chart
            .append_point(&outcome.revealed.date.to_string(), outcome.revealed.close);

        let series_exhausted = session.is_exhausted();
        if series_exhausted {
            self.state = GameState::Ended;
        }

        tracing::debug!(
            correct = outcome.correct,
            score = session.score,
            index = session.current_index,
            exhausted = series_exhausted,
            "round evaluated"
        );

        Ok(RoundResult {
            correct: outcome.correct,
            revealed: outcome.revealed,
            score: session.score,
            series_exhausted,
        })
    }

    /// Player-initiated end. The session stays readable until the next load.
    pub fn end_game(&mut self) -> Result<u32> {
        if self.state != GameState::Active {
            return Err(GameError::NoActiveGame);
        }
        let score = self.session.as_ref().map(|s| s.score).unwrap_or(0);
        self.state = GameState::Ended;
        tracing::info!(score, "game ended by player");
        Ok(score)
    }
}
