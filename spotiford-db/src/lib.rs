//! spotiford-db: SQLite token store for linked Spotify accounts.
//!
//! Each Discord user who completed the OAuth flow owns one row holding the
//! access and refresh tokens. The gateway reads it to answer "is this user
//! linked" and to authorize calls made on that user's behalf.

pub mod db;
pub mod error;
mod sqlite_runtime;
pub mod tokens;

// Re-export commonly used types
pub use db::TokenDbPool;
pub use error::{DbError, DbResult};
pub use tokens::{StoredToken, TokenRepository};

// Re-export test helpers when running tests or when test-helpers feature is enabled
#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers;
