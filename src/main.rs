mod auth;
mod catalog;
mod clock;
mod config;
mod error;
mod extract;
mod handlers;
mod mailer;
mod metrics;
mod models;
mod rate_limit;
mod state;
mod stats;
mod telemetry;

use anyhow::Context;
use clap::Parser;
use reqwest::Url;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use tokio::signal;
use tracing::{info, warn};

use crate::auth::UserInfoProvider;
use crate::clock::SystemClock;
use crate::config::Args;
use crate::mailer::{LogMailer, Mailer, SmtpMailer};
use crate::rate_limit::{RateLimiter, window_from_secs};
use crate::state::AppState;
use crate::stats::StatsAggregator;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // parse cli arguments
    let args = Args::parse();
    telemetry::init_tracing(args.log_json);

    let base_url = Url::parse(&args.base_url).context("invalid --base-url")?;
    let userinfo_url = Url::parse(&args.userinfo_url).context("invalid --userinfo-url")?;

    let mailer: Arc<dyn Mailer> = match args.smtp_credentials() {
        Some((user, password)) => {
            info!(host = %args.smtp_host, port = args.smtp_port, "Invitations sent over SMTP");
            Arc::new(SmtpMailer::new(&args.smtp_host, args.smtp_port, user, password)?)
        }
        None => {
            warn!("EMAIL_USER/EMAIL_PASSWORD not set, invitations will only be logged");
            Arc::new(LogMailer)
        }
    };

    let rate_window = window_from_secs(args.rate_window).context("--rate-window out of range")?;

    // creating shared state
    let state = Arc::new(AppState {
        rate_limiter: RateLimiter::new(args.rate_limit, rate_window, Arc::new(SystemClock)),
        stats: StatsAggregator::fixture(),
        mailer,
        identity: Arc::new(UserInfoProvider::new(reqwest::Client::new(), userinfo_url)),
        base_url,
        admin_emails: args.admin_list(),
        next_submission_id: AtomicU64::new(0),
    });

    let app = handlers::router(state);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    info!(port = args.port, "Survey service running");
    info!(base_url = %args.base_url, "Invitation links point here");
    info!(
        rate_limit = args.rate_limit,
        rate_window_secs = args.rate_window,
        "Registration rate limit"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Survey service stopped");
    Ok(())
}

// Wait for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
