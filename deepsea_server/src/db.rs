use anyhow::Context;
use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;

use deepsea_core::{EngineConfig, PayMode, SpinOutcome};
use deepsea_shared::WinLineDto;

// DB schema is defined in migrations (see migrations/ folder)

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StoredParams {
    pub rtp: f64,
    pub volatility: f64,
    pub pay_mode: String,
    pub nonce: i64,
}

impl StoredParams {
    pub fn engine_config(&self) -> anyhow::Result<EngineConfig> {
        let pay_mode: PayMode = self.pay_mode.parse()?;
        Ok(EngineConfig::new(self.rtp, self.volatility).with_pay_mode(pay_mode))
    }
}

pub async fn init_db(db: &SqlitePool) -> anyhow::Result<()> {
    sqlx::migrate!("./migrations").run(db).await?;
    // refuse to serve with a params row the engine would reject
    let p = get_params(db).await?;
    p.engine_config()?
        .validate()
        .context("stored params out of range")?;
    Ok(())
}

pub async fn get_params(pool: &SqlitePool) -> anyhow::Result<StoredParams> {
    let row = sqlx::query_as::<_, StoredParams>(
        "SELECT rtp, volatility, pay_mode, nonce FROM params WHERE id = 1",
    )
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn set_params(pool: &SqlitePool, p: &StoredParams) -> anyhow::Result<()> {
    sqlx::query("UPDATE params SET rtp = ?, volatility = ?, pay_mode = ?, nonce = ? WHERE id = 1")
        .bind(p.rtp)
        .bind(p.volatility)
        .bind(&p.pay_mode)
        .bind(p.nonce)
        .execute(pool)
        .await?;
    Ok(())
}

/// Append a spin to the log. Returns the row id.
pub async fn log_spin(
    pool: &SqlitePool,
    nonce: i64,
    seed: u64,
    config: &EngineConfig,
    bet: f64,
    outcome: &SpinOutcome,
) -> anyhow::Result<i64> {
    let reels_json = serde_json::to_string(&outcome.grid.to_indices())?;
    let wins: Vec<WinLineDto> = outcome.win_lines.iter().map(WinLineDto::from).collect();
    let wins_json = serde_json::to_string(&wins)?;
    let special_event = outcome.special_event.map(|e| e.as_str());
    let ts = chrono::Utc::now().to_rfc3339();
    let res = sqlx::query(
        "INSERT INTO spins (ts, nonce, seed, rtp, volatility, pay_mode, bet, result_reels_json, wins_json, total_win, special_event) \
         VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
    )
    .bind(ts)
    .bind(nonce)
    // stored as the same 64 bits; read back with `as u64`
    .bind(seed as i64)
    .bind(config.rtp)
    .bind(config.volatility)
    .bind(config.pay_mode.as_str())
    .bind(bet)
    .bind(reels_json)
    .bind(wins_json)
    .bind(outcome.total_win)
    .bind(special_event)
    .execute(pool)
    .await?;
    Ok(res.last_insert_rowid())
}

#[cfg(test)]
mod tests {
    use super::*;
    use deepsea_core::spin_with_seed;
    use sqlx::{sqlite::SqlitePoolOptions, Row};

    async fn memory_pool() -> SqlitePool {
        // one connection, otherwise every connection sees its own empty db
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        init_db(&pool).await.unwrap();
        pool
    }

    #[tokio::test]
    async fn default_params_are_seeded() {
        let pool = memory_pool().await;
        let p = get_params(&pool).await.unwrap();
        assert_eq!(p.engine_config().unwrap(), EngineConfig::default());
        assert_eq!(p.nonce, 0);
    }

    #[tokio::test]
    async fn params_round_trip() {
        let pool = memory_pool().await;
        let mut p = get_params(&pool).await.unwrap();
        p.rtp = 150.0;
        p.volatility = 8.0;
        p.pay_mode = PayMode::HighestLine.as_str().to_string();
        p.nonce = 12;
        set_params(&pool, &p).await.unwrap();
        let back = get_params(&pool).await.unwrap();
        assert_eq!(
            back.engine_config().unwrap(),
            EngineConfig::new(150.0, 8.0).with_pay_mode(PayMode::HighestLine)
        );
        assert_eq!(back.nonce, 12);
    }

    #[tokio::test]
    async fn logged_spin_replays() {
        let pool = memory_pool().await;
        let config = EngineConfig::default();
        let seed = u64::MAX - 5;
        let outcome = spin_with_seed(&config, 100.0, seed);
        let id = log_spin(&pool, 1, seed, &config, 100.0, &outcome)
            .await
            .unwrap();
        let row = sqlx::query("SELECT seed, result_reels_json, total_win FROM spins WHERE id = ?")
            .bind(id)
            .fetch_one(&pool)
            .await
            .unwrap();
        let stored_seed = row.get::<i64, _>("seed") as u64;
        assert_eq!(stored_seed, seed);
        let reels: Vec<Vec<u8>> =
            serde_json::from_str(&row.get::<String, _>("result_reels_json")).unwrap();
        assert!(deepsea_core::verify_grid(&config, stored_seed, &reels));
        assert_eq!(row.get::<f64, _>("total_win"), outcome.total_win);
    }
}
