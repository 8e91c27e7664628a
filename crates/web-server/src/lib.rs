use axum::{routing::get, Router};
use configuration::Config;
use focus_core::{BuilderSettings, FocusPackBuilder, RandomStability};
use providers::{InMemoryCandleSource, PatternMatcher};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{AllowHeaders, AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

pub mod error;
pub mod handlers;

/// The shared application state that all handlers can access.
pub struct AppState {
    pub builder: FocusPackBuilder,
}

/// Wires the configured providers into a focus-pack builder.
///
/// The candle fixture is loaded once here; both the candle source and the
/// built-in matcher read from the same series.
pub fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let source = InMemoryCandleSource::from_json_file(
        &config.data.symbol,
        &config.data.timeframe,
        &config.data.candles_path,
    )?;
    let matcher = PatternMatcher::new(&config.data.symbol, source.candles().to_vec());

    let builder = FocusPackBuilder::new(
        Arc::new(source),
        Arc::new(matcher),
        Arc::new(RandomStability),
        BuilderSettings {
            timeframe: config.data.timeframe.clone(),
            oversample_factor: config.matcher.oversample_factor,
        },
    );

    Ok(Arc::new(AppState { builder }))
}

/// The main function to configure and run the web server.
pub async fn run_server(addr: SocketAddr, state: Arc<AppState>) -> anyhow::Result<()> {
    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::any())
        .allow_methods(Any)
        .allow_headers(AllowHeaders::any());

    // --- DEFINE THE APPLICATION ROUTES ---
    let app = Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/focus-pack", get(handlers::get_focus_pack))
        .route("/api/focus-pack/all", get(handlers::get_focus_pack_all))
        .route("/api/focus-pack/validate", get(handlers::validate_focus_packs))
        .with_state(state)
        .layer(cors)
        // This middleware will automatically log information about every
        // incoming request.
        .layer(TraceLayer::new_for_http());

    tracing::info!("Web server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
