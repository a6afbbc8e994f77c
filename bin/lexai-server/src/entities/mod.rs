//! Persistence gateway.
//!
//! [`ChatStore`] and [`SessionStore`] define the interface for persisting
//! chat sessions and their append-only message logs. The default backing is
//! SQLite through the sqlx `Any` driver; to move to Postgres or MySQL, swap
//! the connection URL — nothing here names a concrete database.
//!
//! All trait methods use `impl Future` in their signatures (stable since
//! Rust 1.75) so no extra `async-trait` crate is required for the stores.
//!
//! Records cross this boundary as the concrete tagged types in [`dao`];
//! role and mode strings coming back from the database are parsed, and a
//! row that fails to parse is a decode error, not a silently coerced value.

pub mod chat;
pub mod dao;
pub mod session;

pub use chat::ChatStore;
pub use dao::{ChatMessage, ChatSession, NewChat};
pub use session::SessionStore;

use std::str::FromStr;

/// Database-agnostic store over a sqlx `Any` pool.
#[derive(Clone, Debug)]
pub struct AnyStore {
    pool: sqlx::Pool<sqlx::Any>,
}

impl AnyStore {
    /// Open (or create) the database at `url` and run pending migrations.
    ///
    /// `url` should be a sqlx-compatible URL, e.g. `"sqlite://lexai.db"`.
    /// The migrations path is resolved relative to `CARGO_MANIFEST_DIR` at
    /// compile time and embedded into the binary.
    pub async fn connect(url: &str) -> Result<Self, sqlx::Error> {
        sqlx::any::install_default_drivers();
        let options = sqlx::any::AnyConnectOptions::from_str(url)?;
        let pool = sqlx::AnyPool::connect_with(options).await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }

    /// Fresh in-memory SQLite store for tests. A single connection keeps
    /// the in-memory database alive for the pool's lifetime.
    #[cfg(test)]
    pub(crate) async fn connect_in_memory() -> Result<Self, sqlx::Error> {
        sqlx::any::install_default_drivers();
        let options = sqlx::any::AnyConnectOptions::from_str("sqlite::memory:")?;
        let pool = sqlx::any::AnyPoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        sqlx::migrate!("./migrations").run(&pool).await?;
        Ok(Self { pool })
    }
}
