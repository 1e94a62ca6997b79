use std::sync::Arc;
use std::time::Duration;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::{self, TraceLayer};
use tracing::Level;
use tracing_subscriber::EnvFilter;

use coinpair::config::Config;
use coinpair::json_ledger::JsonFileLedger;
use coinpair::middleware::rate_limit::RateLimiter;
use coinpair::verifier::{TokenVerifier, VerifierConfig};
use coinpair::{build_app, AppState};

fn build_cors(config: &Config) -> CorsLayer {
    let origins: Vec<_> = config
        .cors_origins
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(AllowMethods::any())
        .allow_headers(AllowHeaders::any())
}

/// Background job: drop idle rate-limit buckets.
async fn rate_limit_cleanup_job(limiter: RateLimiter) {
    let mut interval = tokio::time::interval(Duration::from_secs(10 * 60));

    loop {
        interval.tick().await;
        limiter.cleanup().await;
    }
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::from_env();

    let verifier = Arc::new(TokenVerifier::new(VerifierConfig::new(
        config.secret_text.clone(),
        config.salt.clone(),
    )));
    let ledger = Arc::new(JsonFileLedger::new(config.ledger_path.clone()));
    tracing::info!("Ledger backed by {}", config.ledger_path);

    let rate_limiter = RateLimiter::new(config.rate_limit_burst, config.rate_limit_per_minute);

    let cors = build_cors(&config);

    let state = AppState {
        verifier,
        ledger,
        rate_limiter: rate_limiter.clone(),
        pairing_code: config.pairing_code.clone(),
        admin_password: config.admin_password.clone(),
    };

    let app = build_app(state)
        .layer(RequestBodyLimitLayer::new(config.max_payload_bytes))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(trace::DefaultMakeSpan::new().level(Level::INFO))
                .on_request(trace::DefaultOnRequest::new().level(Level::INFO))
                .on_response(
                    trace::DefaultOnResponse::new()
                        .level(Level::INFO)
                        .latency_unit(tower_http::LatencyUnit::Millis),
                ),
        )
        .layer(cors);

    tokio::spawn(rate_limit_cleanup_job(rate_limiter));

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!("Starting server on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("Failed to bind");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutting down...");
}
