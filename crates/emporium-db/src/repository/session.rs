//! # Player Session Repository
//!
//! Database operations for player sessions and their wallets.
//!
//! Settlement returns the buyer's new wallet instead of writing it; the
//! caller persists it here with `update_wallet` once the transaction has
//! succeeded.

use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::generate_id;
use emporium_core::{Currency, PlayerSession};

const SESSION_COLUMNS: &str = "id, market_id, player_name, \
                               wallet_gold, wallet_silver, wallet_copper, \
                               created_at, updated_at";

/// Repository for player session database operations.
#[derive(Debug, Clone)]
pub struct PlayerSessionRepository {
    pool: SqlitePool,
}

impl PlayerSessionRepository {
    /// Creates a new PlayerSessionRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PlayerSessionRepository { pool }
    }

    /// Creates a session for a player joining a market, with their starting
    /// wallet.
    pub async fn create(
        &self,
        market_id: &str,
        player_name: &str,
        wallet: Currency,
    ) -> DbResult<PlayerSession> {
        let now = Utc::now();
        let session = PlayerSession {
            id: generate_id(),
            market_id: market_id.to_string(),
            player_name: player_name.to_string(),
            wallet_gold: wallet.gold,
            wallet_silver: wallet.silver,
            wallet_copper: wallet.copper,
            created_at: now,
            updated_at: now,
        };

        debug!(
            id = %session.id,
            market_id = %market_id,
            player = %player_name,
            "Creating player session"
        );

        sqlx::query(
            r#"
            INSERT INTO player_sessions (
                id, market_id, player_name,
                wallet_gold, wallet_silver, wallet_copper,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&session.id)
        .bind(&session.market_id)
        .bind(&session.player_name)
        .bind(session.wallet_gold)
        .bind(session.wallet_silver)
        .bind(session.wallet_copper)
        .bind(session.created_at)
        .bind(session.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(session)
    }

    /// Gets a session by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<PlayerSession>> {
        let session = sqlx::query_as::<_, PlayerSession>(&format!(
            "SELECT {SESSION_COLUMNS} FROM player_sessions WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(session)
    }

    /// Lists the players in a market, by join time.
    pub async fn list_by_market(&self, market_id: &str) -> DbResult<Vec<PlayerSession>> {
        let sessions = sqlx::query_as::<_, PlayerSession>(&format!(
            "SELECT {SESSION_COLUMNS} FROM player_sessions WHERE market_id = ?1 ORDER BY created_at"
        ))
        .bind(market_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(sessions)
    }

    /// Overwrites the session's wallet.
    pub async fn update_wallet(&self, id: &str, wallet: Currency) -> DbResult<()> {
        debug!(id = %id, wallet = %wallet, "Updating player wallet");

        let result = sqlx::query(
            r#"
            UPDATE player_sessions SET
                wallet_gold = ?2, wallet_silver = ?3, wallet_copper = ?4, updated_at = ?5
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(wallet.gold)
        .bind(wallet.silver)
        .bind(wallet.copper)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Player session", id));
        }

        Ok(())
    }

    /// Removes a session (the player left the market).
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM player_sessions WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Player session", id));
        }

        debug!(id = %id, "Deleted player session");
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
