//! Per-user OAuth token storage.

use chrono::Utc;
use spotiford_core::ActorId;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;

/// OAuth token of a linked account
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredToken {
    pub actor: ActorId,
    pub access_token: String,
    pub token_type: String,
    pub expires_in: i64,
    pub refresh_token: Option<String>,
    pub scope: String,
    /// Unix timestamp (seconds) after which the access token is invalid
    pub expires_at: i64,
}

impl StoredToken {
    /// Whether the token expires within `margin_secs` of `now`.
    pub fn expires_within(&self, now: i64, margin_secs: i64) -> bool {
        self.expires_at - margin_secs <= now
    }
}

/// Token repository for database operations
pub struct TokenRepository;

impl TokenRepository {
    /// Check whether the user has linked an account
    pub async fn has_user(pool: &SqlitePool, actor: ActorId) -> DbResult<bool> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE discord_id = ?")
            .bind(actor_key(actor))
            .fetch_one(pool)
            .await?;

        Ok(count != 0)
    }

    /// Load the stored token for a user
    pub async fn get(pool: &SqlitePool, actor: ActorId) -> DbResult<Option<StoredToken>> {
        let row = sqlx::query_as::<_, TokenRow>(
            "SELECT discord_id, access_token, token_type, expires_in, refresh_token, scope, expires_at
             FROM users
             WHERE discord_id = ?",
        )
        .bind(actor_key(actor))
        .fetch_optional(pool)
        .await?;

        Ok(row.map(StoredToken::from))
    }

    /// Insert or replace the token for a user
    pub async fn upsert(pool: &SqlitePool, token: &StoredToken) -> DbResult<()> {
        let now = Utc::now().timestamp();

        sqlx::query(
            "INSERT INTO users (discord_id, access_token, token_type, expires_in, refresh_token, scope, expires_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)
             ON CONFLICT(discord_id) DO UPDATE SET
                access_token = excluded.access_token,
                token_type = excluded.token_type,
                expires_in = excluded.expires_in,
                refresh_token = excluded.refresh_token,
                scope = excluded.scope,
                expires_at = excluded.expires_at,
                updated_at = excluded.updated_at",
        )
        .bind(actor_key(token.actor))
        .bind(&token.access_token)
        .bind(&token.token_type)
        .bind(token.expires_in)
        .bind(&token.refresh_token)
        .bind(&token.scope)
        .bind(token.expires_at)
        .bind(now)
        .execute(pool)
        .await?;

        debug!("Stored token for user {}", token.actor);
        Ok(())
    }
}

// Discord snowflakes stay below 2^63, so the signed column holds them losslessly.
fn actor_key(actor: ActorId) -> i64 {
    actor.get() as i64
}

#[derive(Debug, sqlx::FromRow)]
struct TokenRow {
    discord_id: i64,
    access_token: String,
    token_type: String,
    expires_in: i64,
    refresh_token: Option<String>,
    scope: String,
    expires_at: i64,
}

impl From<TokenRow> for StoredToken {
    fn from(row: TokenRow) -> Self {
        StoredToken {
            actor: ActorId(row.discord_id as u64),
            access_token: row.access_token,
            token_type: row.token_type,
            expires_in: row.expires_in,
            refresh_token: row.refresh_token,
            scope: row.scope,
            expires_at: row.expires_at,
        }
    }
}
