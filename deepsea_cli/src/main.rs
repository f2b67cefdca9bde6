use std::time::Duration;

use clap::{Parser, Subcommand};
use sqlx::{sqlite::SqlitePoolOptions, Row, SqlitePool};
use tracing::{info, warn};

use deepsea_core::{
    config::{AUTO_SPIN_DELAY_MS, DEFAULT_BET, INITIAL_BALANCE},
    format_korean_currency, spin, spin_with_seed, verify_grid, EngineConfig, PayMode, RandSource,
    Session, SpecialEvent,
};

#[derive(Parser)]
#[command(name = "deepsea-cli", about = "Admin CLI for the Deep Sea Arcade server")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    /// Database URL, default sqlite://deepsea.db
    #[arg(long, value_parser, env = "DATABASE_URL")]
    database_url: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// View last N log entries
    ViewLogs {
        #[arg(default_value_t = 20)]
        n: i64,
    },
    /// Export spins to CSV path
    ExportCsv { path: String },
    /// Change the RTP / volatility the server spins with
    SetParams {
        #[arg(long)]
        rtp: f64,
        #[arg(long)]
        volatility: f64,
        /// Credit only the best line of each spin
        #[arg(long)]
        highest_line: bool,
    },
    /// Re-run a logged spin from its seed and compare the grid
    Replay { id: i64 },
    /// Measure return over many spins, no database needed
    Simulate {
        #[arg(long, default_value_t = 100_000)]
        spins: u64,
        #[arg(long, default_value_t = DEFAULT_BET)]
        bet: f64,
        #[arg(long, default_value_t = 100.0)]
        rtp: f64,
        #[arg(long, default_value_t = 5.0)]
        volatility: f64,
        #[arg(long)]
        highest_line: bool,
        #[arg(long)]
        seed: Option<u64>,
    },
    /// Play an offline session on auto until broke or the round limit
    Autoplay {
        #[arg(long, default_value_t = INITIAL_BALANCE)]
        balance: f64,
        #[arg(long, default_value_t = DEFAULT_BET)]
        bet: f64,
        #[arg(long, default_value_t = 50)]
        rounds: u32,
        #[arg(long, default_value_t = AUTO_SPIN_DELAY_MS)]
        delay_ms: u64,
        #[arg(long, default_value_t = 100.0)]
        rtp: f64,
        #[arg(long, default_value_t = 5.0)]
        volatility: f64,
    },
}

async fn get_pool(url: Option<String>) -> anyhow::Result<SqlitePool> {
    let url = url.unwrap_or_else(|| "sqlite://deepsea.db".into());
    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect(&url)
        .await?;
    Ok(pool)
}

fn pay_mode(highest_line: bool) -> PayMode {
    if highest_line {
        PayMode::HighestLine
    } else {
        PayMode::AllLines
    }
}

fn simulate(spins: u64, bet: f64, config: &EngineConfig, seed: Option<u64>) {
    let mut source = RandSource::seeded(seed.unwrap_or_else(deepsea_core::fresh_seed));
    let mut total_bet = 0.0;
    let mut total_win = 0.0;
    let mut hits = 0u64;
    let mut shark = 0u64;
    let mut whale = 0u64;
    let mut big = 0u64;
    for _ in 0..spins {
        let out = spin(config, bet, &mut source);
        total_bet += bet;
        total_win += out.total_win;
        if out.total_win > 0.0 {
            hits += 1;
        }
        match out.special_event {
            Some(SpecialEvent::SharkJackpot) => shark += 1,
            Some(SpecialEvent::WhaleJackpot) => whale += 1,
            Some(SpecialEvent::BigWin) => big += 1,
            None => {}
        }
    }
    let n = spins.max(1) as f64;
    println!(
        "spins={} rtp={:.2}% hit_rate={:.2}% shark={} whale={} big_win={}",
        spins,
        if total_bet > 0.0 { total_win / total_bet * 100.0 } else { 0.0 },
        hits as f64 / n * 100.0,
        shark,
        whale,
        big
    );
}

async fn autoplay(
    balance: f64,
    bet: f64,
    rounds: u32,
    delay_ms: u64,
    config: EngineConfig,
) -> anyhow::Result<()> {
    let mut session = Session::new(balance, config);
    session.set_bet(bet)?;
    let mut source = RandSource::new(rand::thread_rng());
    let mut played = 0u32;
    let mut specials = 0u32;
    while played < rounds {
        // one round at a time; the delay only starts after it settles
        let report = session.autoplay(&mut source, 1, |_, out, s| {
            println!(
                "#{:>4} win={:<10} balance={}{}",
                played + 1,
                out.total_win,
                format_korean_currency(s.balance),
                out.special_event
                    .map(|e| format!(" [{}]", e.as_str()))
                    .unwrap_or_default()
            );
        });
        played += report.rounds;
        specials += report.special_events;
        match report.stopped_by {
            deepsea_core::AutoplayStop::RoundLimit => {}
            stop => {
                info!(?stop, "autoplay stopped");
                break;
            }
        }
        if played < rounds {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
        }
    }
    println!(
        "rounds={} special events={} final balance={}",
        played,
        specials,
        format_korean_currency(session.balance)
    );
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Simulate {
            spins,
            bet,
            rtp,
            volatility,
            highest_line,
            seed,
        } => {
            let config = EngineConfig::new(rtp, volatility).with_pay_mode(pay_mode(highest_line));
            if let Err(e) = config.validate() {
                warn!("{e}; simulating anyway");
            }
            simulate(spins, bet, &config, seed);
        }
        Commands::Autoplay {
            balance,
            bet,
            rounds,
            delay_ms,
            rtp,
            volatility,
        } => {
            let config = EngineConfig::new(rtp, volatility);
            config.validate()?;
            autoplay(balance, bet, rounds, delay_ms, config).await?;
        }
        Commands::SetParams {
            rtp,
            volatility,
            highest_line,
        } => {
            let config = EngineConfig::new(rtp, volatility).with_pay_mode(pay_mode(highest_line));
            config.validate()?;
            let pool = get_pool(cli.database_url).await?;
            sqlx::query("UPDATE params SET rtp = ?, volatility = ?, pay_mode = ? WHERE id = 1")
                .bind(config.rtp)
                .bind(config.volatility)
                .bind(config.pay_mode.as_str())
                .execute(&pool)
                .await?;
            println!(
                "Params set: rtp={} volatility={} pay_mode={}",
                config.rtp,
                config.volatility,
                config.pay_mode.as_str()
            );
        }
        Commands::ViewLogs { n } => {
            let pool = get_pool(cli.database_url).await?;
            let rows = sqlx::query("SELECT id, ts, nonce, rtp, volatility, bet, total_win, special_event FROM spins ORDER BY id DESC LIMIT ?")
                .bind(n)
                .fetch_all(&pool).await?;
            for r in rows {
                let id: i64 = r.get("id");
                let ts: String = r.get("ts");
                let nonce: i64 = r.get("nonce");
                let rtp: f64 = r.get("rtp");
                let volatility: f64 = r.get("volatility");
                let bet: f64 = r.get("bet");
                let total_win: f64 = r.get("total_win");
                let special_event: Option<String> = r.get("special_event");
                println!(
                    "#{:>6} {} nonce={} rtp={} vol={} bet={} win={} {}",
                    id,
                    ts,
                    nonce,
                    rtp,
                    volatility,
                    bet,
                    total_win,
                    special_event.unwrap_or_default()
                );
            }
        }
        Commands::ExportCsv { path } => {
            let pool = get_pool(cli.database_url).await?;
            let mut wtr = csv::Writer::from_path(&path)?;
            wtr.write_record([
                "id",
                "ts",
                "nonce",
                "seed",
                "rtp",
                "volatility",
                "pay_mode",
                "bet",
                "result_reels_json",
                "total_win",
                "special_event",
            ])?;
            let rows = sqlx::query("SELECT id, ts, nonce, seed, rtp, volatility, pay_mode, bet, result_reels_json, total_win, special_event FROM spins ORDER BY id ASC")
                .fetch_all(&pool).await?;
            let total = rows.len();
            for r in &rows {
                wtr.write_record(&[
                    r.get::<i64, _>("id").to_string(),
                    r.get::<String, _>("ts"),
                    r.get::<i64, _>("nonce").to_string(),
                    (r.get::<i64, _>("seed") as u64).to_string(),
                    r.get::<f64, _>("rtp").to_string(),
                    r.get::<f64, _>("volatility").to_string(),
                    r.get::<String, _>("pay_mode"),
                    r.get::<f64, _>("bet").to_string(),
                    r.get::<String, _>("result_reels_json"),
                    r.get::<f64, _>("total_win").to_string(),
                    r.get::<Option<String>, _>("special_event").unwrap_or_default(),
                ])?;
            }
            wtr.flush()?;
            println!("Exported {} rows to {}", total, path);
        }
        Commands::Replay { id } => {
            let pool = get_pool(cli.database_url).await?;
            let r = sqlx::query("SELECT seed, rtp, volatility, pay_mode, bet, result_reels_json, total_win FROM spins WHERE id = ?")
                .bind(id)
                .fetch_one(&pool)
                .await?;
            let seed = r.get::<i64, _>("seed") as u64;
            let pay_mode: PayMode = r.get::<String, _>("pay_mode").parse()?;
            let config = EngineConfig::new(r.get("rtp"), r.get("volatility")).with_pay_mode(pay_mode);
            let bet: f64 = r.get("bet");
            let stored: Vec<Vec<u8>> = serde_json::from_str(&r.get::<String, _>("result_reels_json"))?;
            let logged_win: f64 = r.get("total_win");

            let grid_ok = verify_grid(&config, seed, &stored);
            let replayed = spin_with_seed(&config, bet, seed);
            let win_ok = replayed.total_win == logged_win;
            println!(
                "spin #{} seed={} grid={} win={} (logged {}, replayed {})",
                id,
                seed,
                if grid_ok { "match" } else { "MISMATCH" },
                if win_ok { "match" } else { "MISMATCH" },
                logged_win,
                replayed.total_win
            );
            if !(grid_ok && win_ok) {
                anyhow::bail!("spin #{id} does not replay");
            }
        }
    }

    Ok(())
}
