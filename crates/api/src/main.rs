use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use masterclass_api::config::ServerConfig;
use masterclass_api::router::build_app_router;
use masterclass_api::state::AppState;
use masterclass_db::repositories::SessionRepo;
use masterclass_db::DbPool;
use masterclass_events::{EmailConfig, EmailScheduler, Mailer, SchedulerConfig, SmtpMailer};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "masterclass_api=debug,masterclass_events=info,tower_http=debug".into());
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(host = %config.host, port = %config.port, "Loaded server configuration");

    // --- Database ---
    let pool = masterclass_db::create_pool(&config.database_url, config.db_max_connections)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    masterclass_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    masterclass_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    match SessionRepo::cleanup_expired(&pool).await {
        Ok(removed) => tracing::info!(removed, "Expired sessions purged"),
        Err(e) => tracing::warn!(error = %e, "Session cleanup failed"),
    }

    // --- Email delivery ---
    let cancel = CancellationToken::new();
    let email_handle = start_email_scheduler(&pool, &config, cancel.clone());

    // --- Router ---
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");

    cancel.cancel();
    if let Some(handle) = email_handle {
        let limit = Duration::from_secs(config.shutdown_timeout_secs);
        if tokio::time::timeout(limit, handle).await.is_err() {
            tracing::warn!("Email scheduler did not stop in time");
        } else {
            tracing::info!("Email scheduler stopped");
        }
    }

    tracing::info!("Graceful shutdown complete");
}

/// Spawn the email scheduler when SMTP is configured.
///
/// Without `SMTP_HOST` queued emails stay pending.
fn start_email_scheduler(
    pool: &DbPool,
    config: &ServerConfig,
    cancel: CancellationToken,
) -> Option<JoinHandle<()>> {
    let Some(email_config) = EmailConfig::from_env() else {
        tracing::warn!("SMTP_HOST not set, email delivery disabled");
        return None;
    };

    let mailer: Arc<dyn Mailer> = match SmtpMailer::new(&email_config) {
        Ok(mailer) => Arc::new(mailer),
        Err(e) => {
            tracing::error!(error = %e, "Invalid SMTP configuration, email delivery disabled");
            return None;
        }
    };

    let scheduler = EmailScheduler::new(
        pool.clone(),
        mailer,
        SchedulerConfig {
            poll_interval: Duration::from_secs(config.email_poll_interval_secs),
            ..SchedulerConfig::default()
        },
    );
    tracing::info!(
        smtp_host = %email_config.smtp_host,
        poll_secs = config.email_poll_interval_secs,
        "Email scheduler started"
    );

    Some(tokio::spawn(async move {
        scheduler.run(cancel).await;
    }))
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
