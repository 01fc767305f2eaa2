// Core modules
pub mod api;
pub mod chart;
pub mod config;
pub mod engine;
pub mod error;
pub mod game;
pub mod models;

// Re-export commonly used types
pub use api::{AlphaVantageClient, MarketDataClient};
pub use chart::{ChartRenderer, TerminalChart};
pub use config::Config;
pub use error::{GameError, Result};
pub use game::{GameController, GameState, RoundResult};
pub use models::{Direction, GameSession, PricePoint, Series};
