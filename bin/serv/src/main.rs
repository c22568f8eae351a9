use axum::{Router, middleware, routing::get};
use cc_api::{config::ApiConfig, state::ApiState};
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ApiConfig::from_env()?;

    cc_api::tracing::init_tracing(&config.env);

    let metrics_handle = cc_api::metrics::init_metrics()?;

    let pool = cc_db::ensure_db_and_migrate(&config.database_url, config.db_max_connections).await?;
    tracing::info!("database ready");

    let state = ApiState::new(config.clone(), pool);

    let _job_handles = cc_api::jobs::start_background_jobs(state.pool.clone());

    let cors = cc_api::middleware::cors::create_cors_layer(&config.parsed_allowed_origins());

    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(
            DefaultMakeSpan::new()
                .level(Level::INFO)
                .include_headers(true),
        )
        .on_response(DefaultOnResponse::new().level(Level::INFO));

    // Scraped separately, so it gets its own state
    let metrics_app = Router::new()
        .route("/metrics", get(cc_api::metrics::metrics_handler))
        .with_state(metrics_handle);

    let app = cc_api::router::router()
        .with_state(state)
        .merge(metrics_app)
        .layer(cors)
        .layer(trace_layer)
        .layer(middleware::from_fn(cc_api::metrics::track_metrics))
        .layer(middleware::from_fn(
            cc_api::middleware::request_id::request_id_middleware,
        ));

    let app = cc_api::middleware::security_headers::apply_security_headers(app, config.env.clone());

    let address = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&address).await?;
    tracing::info!(%address, environment = ?config.env, "server listening");
    axum::serve(listener, app).await?;

    Ok(())
}
