//! # Tendergate API Server
//!
//! Main binary: loads configuration, connects to Postgres, runs migrations,
//! selects the mailer, and serves the Axum application.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p tendergate-api
//! ```

use std::sync::Arc;

use tendergate_api::{
    app::{build_router, AppState},
    config::Config,
};
use tendergate_shared::{
    db::{migrations::run_migrations, pool::create_pool, pool::DatabaseConfig},
    mail::{Mailer, NoopMailer, SmtpMailer},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tendergate_api=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    tracing::info!(
        "Tendergate API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let pool = create_pool(DatabaseConfig {
        url: config.database.url.clone(),
        max_connections: config.database.max_connections,
        ..Default::default()
    })
    .await?;

    run_migrations(&pool).await?;

    let mailer: Arc<dyn Mailer> = match &config.mail {
        Some(mail_config) => {
            tracing::info!(host = %mail_config.smtp_host, "using SMTP mailer");
            Arc::new(SmtpMailer::new(mail_config)?)
        }
        None => {
            tracing::warn!("SMTP_HOST not set, confirmation mails will be logged, not sent");
            Arc::new(NoopMailer)
        }
    };

    let bind_address = config.bind_address();
    let state = AppState::new(pool, config, mailer);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
