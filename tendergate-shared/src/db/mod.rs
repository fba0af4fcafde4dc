/// Database layer for Tendergate
///
/// This module provides connection pooling and migration running for the
/// Postgres status store. Models live in the `models` module at crate root.
///
/// # Example
///
/// ```no_run
/// use tendergate_shared::db::pool::{create_pool, DatabaseConfig};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let config = DatabaseConfig {
///         url: std::env::var("DATABASE_URL")?,
///         ..Default::default()
///     };
///
///     let pool = create_pool(config).await?;
///     Ok(())
/// }
/// ```

pub mod migrations;
pub mod pool;
