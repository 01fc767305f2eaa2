use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};

use updown::api::AlphaVantageClient;
use updown::chart::TerminalChart;
use updown::config::Config;
use updown::game::{GameController, GameState, RoundResult};
use updown::models::Direction;

/// Guess whether a stock's next daily close goes up or down.
#[derive(Parser, Debug)]
#[command(name = "updown", version, about)]
struct Cli {
    /// Ticker symbol to load immediately (otherwise use `load <SYMBOL>`)
    symbol: Option<String>,

    /// Seed for start-date selection, for reproducible games
    #[arg(long)]
    seed: Option<u64>,

    /// Chart height in rows
    #[arg(long, default_value_t = 12)]
    chart_height: usize,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    setup_logging();

    let cli = Cli::parse();
    let config = Config::from_env()?;

    let client = match config.base_url {
        Some(base) => AlphaVantageClient::with_base_url(config.api_key, base)?,
        None => AlphaVantageClient::new(config.api_key)?,
    };
    let chart = TerminalChart::new(cli.chart_height);

    let mut game = match cli.seed {
        Some(seed) => GameController::with_seed(client, chart, seed),
        None => GameController::new(client, chart),
    };

    println!("updown — higher or lower?");
    println!("Commands: load <SYMBOL>, u[p], d[own], end, help, quit\n");

    if let Some(symbol) = cli.symbol {
        load(&mut game, &symbol).await;
    }

    let stdin = BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        print_prompt(&game);
        let Some(line) = lines.next_line().await? else {
            break;
        };

        let input = line.trim();
        let (command, arg) = match input.split_once(char::is_whitespace) {
            Some((c, a)) => (c, a.trim()),
            None => (input, ""),
        };

        match command.to_lowercase().as_str() {
            "" => {}
            "quit" | "q" | "exit" => break,
            "help" | "?" => {
                println!("Commands: load <SYMBOL>, u[p], d[own], end, quit");
            }
            "load" => load(&mut game, arg).await,
            "u" | "up" => predict(&mut game, Direction::Up),
            "d" | "down" => predict(&mut game, Direction::Down),
            "end" => match game.end_game() {
                Ok(score) => println!("Game ended. Final score: {}", score),
                Err(e) => println!("{}", e),
            },
            // A bare ticker works like `load <SYMBOL>`
            other if other.chars().all(|c| c.is_ascii_alphanumeric() || c == '.') => {
                load(&mut game, input).await
            }
            _ => println!("Unknown command. Try `help`."),
        }
    }

    Ok(())
}

async fn load(game: &mut GameController<AlphaVantageClient, TerminalChart>, symbol: &str) {
    println!("Loading…");
    match game.load_ticker(symbol).await {
        Ok(()) => print_stats(game),
        Err(e) => println!("{}", e),
    }
}

fn predict(game: &mut GameController<AlphaVantageClient, TerminalChart>, direction: Direction) {
    match game.submit_prediction(direction) {
        Ok(result) => {
            print_round(&result);
            print_stats(game);
            if result.series_exhausted {
                println!("No more data available. Final score: {}", result.score);
            }
        }
        Err(e) => println!("{}", e),
    }
}

fn print_round(result: &RoundResult) {
    let verdict = if result.correct { "Correct!" } else { "Wrong." };
    println!(
        "{} Next close: ${:.2} ({}).",
        verdict, result.revealed.close, result.revealed.date
    );
}

fn print_stats(game: &GameController<AlphaVantageClient, TerminalChart>) {
    if let Some(session) = game.session() {
        if let Some(point) = session.current_point() {
            println!(
                "[{}] {} close ${:.2} | score {}",
                session.symbol, point.date, point.close, session.score
            );
        }
    }
}

fn print_prompt(game: &GameController<AlphaVantageClient, TerminalChart>) {
    use std::io::Write;
    let marker = match game.state() {
        GameState::Active => "guess",
        GameState::Ended => "done",
        _ => "ticker",
    };
    print!("{}> ", marker);
    let _ = std::io::stdout().flush();
}

fn setup_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "updown=warn".to_string()),
        )
        .init();
}
