//! Test helpers for the token store.

use crate::{db::TokenDbPool, error::DbResult, sqlite_runtime::create_in_memory_pool};

/// Create an in-memory token store for testing
pub async fn create_test_token_pool() -> DbResult<TokenDbPool> {
    let pool = create_in_memory_pool(1).await?;

    TokenDbPool::run_migrations(&pool).await?;

    Ok(TokenDbPool::from_pool(pool))
}
