use std::env;
use std::fs;
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    http::{header, HeaderValue},
    middleware::from_fn,
    routing::{delete, get, post, put},
    Router,
};
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::GovernorLayer;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use church_site::media::ImgbbUploader;
use church_site::store::HttpStore;
use church_site::{auth, routes, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if it exists
    dotenvy::dotenv().ok();

    // Ensure critical environment variables are set
    env::var("JWT_SECRET").expect("JWT_SECRET must be set");
    env::var("ADMIN_PASSWORD").expect("ADMIN_PASSWORD must be set");

    // Initialize Tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "church_site=info,tower_http=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting church site...");

    let index_template = fs::read_to_string("static/index.html")?;
    let admin_template = fs::read_to_string("static/admin.html")?;

    // Content store (hosted document database)
    let store_url = env::var("CONTENT_STORE_URL").expect("CONTENT_STORE_URL must be set");
    let store = Arc::new(HttpStore::new(&store_url));

    // Image host
    let imgbb_key = env::var("IMGBB_API_KEY").expect("IMGBB_API_KEY must be set");
    let imgbb_endpoint = env::var("IMGBB_ENDPOINT")
        .unwrap_or_else(|_| "https://api.imgbb.com/1/upload".to_string());
    let media = Arc::new(ImgbbUploader::new(&imgbb_endpoint, &imgbb_key));

    let state = AppState::new(store, media, index_template, admin_template);

    let governor_config = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(
                env::var("RATE_LIMIT_PER_SECOND")
                    .ok()
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(1200),
            )
            .burst_size(
                env::var("RATE_LIMIT_BURST")
                    .ok()
                    .and_then(|v| v.parse::<u32>().ok())
                    .unwrap_or(2400),
            )
            .finish()
            .expect("governor config"),
    );

    let cors = {
        let env_mode = env::var("RUST_ENV").unwrap_or_else(|_| "development".to_string());
        let origins = env::var("ALLOWED_ORIGINS")
            .ok()
            .map(|v| {
                v.split(',')
                    .filter_map(|s| {
                        let trimmed = s.trim();
                        if trimmed.is_empty() {
                            return None;
                        }
                        match trimmed.parse::<HeaderValue>() {
                            Ok(value) => Some(value),
                            Err(_) => {
                                tracing::warn!(
                                    "Ignoring invalid ALLOWED_ORIGINS entry: {}",
                                    trimmed
                                );
                                None
                            }
                        }
                    })
                    .collect::<Vec<_>>()
            })
            .filter(|origins| !origins.is_empty())
            .unwrap_or_else(|| {
                if env_mode == "production" {
                    panic!("ALLOWED_ORIGINS must contain at least one valid origin in production")
                }
                vec![
                    HeaderValue::from_static("http://localhost:8080"),
                    HeaderValue::from_static("http://127.0.0.1:8080"),
                ]
            });

        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([
                axum::http::Method::GET,
                axum::http::Method::POST,
                axum::http::Method::PUT,
                axum::http::Method::DELETE,
                axum::http::Method::OPTIONS,
            ])
            .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
            .allow_credentials(true)
    };

    // Router Setup
    let app = Router::new()
        // Public site
        .route("/", get(routes::pages::public_page))
        .route("/health", get(health_check))
        .route("/partials/sermons", get(routes::pages::sermons_fragment))
        .route("/partials/devotional", get(routes::pages::devotional_fragment))
        .route("/partials/events", get(routes::pages::events_fragment))
        .route("/partials/testimonies", get(routes::pages::testimonies_fragment))
        .route("/api/prayers", post(routes::prayers::submit_prayer))
        .route("/api/testimonies", post(routes::testimonies::submit_testimony))
        // Admin dashboard
        .route("/admin", get(routes::pages::admin_page))
        .route("/admin/partials/stats", get(routes::pages::admin_stats_fragment))
        .route("/admin/partials/sermons", get(routes::pages::admin_sermons_fragment))
        .route(
            "/admin/partials/devotionals",
            get(routes::pages::admin_devotionals_fragment),
        )
        .route("/admin/partials/events", get(routes::pages::admin_events_fragment))
        .route(
            "/admin/partials/testimonies",
            get(routes::pages::admin_testimonies_fragment),
        )
        .route("/admin/partials/prayers", get(routes::pages::admin_prayers_fragment))
        // Admin API
        .route("/api/admin/sermons", post(routes::sermons::create_sermon))
        .route("/api/admin/devotionals", post(routes::devotionals::create_devotional))
        .route("/api/admin/events", post(routes::events::create_event))
        .route(
            "/api/admin/settings/giving",
            get(routes::settings::load_giving).put(routes::settings::save_giving),
        )
        .route("/api/admin/stats", get(routes::admin::stats))
        .route("/api/admin/{collection}/{id}", delete(routes::admin::delete_item))
        .route(
            "/api/admin/{collection}/{id}/status",
            put(routes::admin::update_status),
        )
        // Auth Routes
        .route("/auth/login", post(auth::login))
        .route("/auth/logout", post(auth::logout))
        .route_service("/login.html", ServeFile::new("static/login.html"))
        .nest_service("/assets", ServeDir::new("static/assets"))
        .layer(from_fn(auth::require_auth))
        .layer(cors)
        .layer(GovernorLayer::new(governor_config))
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .with_state(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], 8080));
    tracing::info!("listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("signal received, starting graceful shutdown");
}

async fn health_check() -> &'static str {
    "OK"
}
