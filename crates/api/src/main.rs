//! PaperScope REST API
//!
//! The single entry point for all external API requests. Handles:
//! - Paper catalog reads and writes (single and batch)
//! - Reviews and reviewer queues
//! - Author portfolios and analytics
//! - LLM-backed recommendations
//! - Observability (logging, metrics, request ids)

mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusBuilder;
use paperscope_common::{
    config::AppConfig,
    db::{DbPool, Repository},
    metrics,
    recommend::{GeminiRecommender, Recommender},
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub repo: Repository,
    pub recommender: Option<Arc<dyn Recommender>>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {e}");
        e
    })?;
    let config = Arc::new(config);

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.observability.log_level));
    let fmt = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true);
    if config.observability.json_logging {
        fmt.json().init();
    } else {
        fmt.init();
    }

    info!("Starting PaperScope API v{}", paperscope_common::VERSION);

    // Initialize metrics
    metrics::register_metrics();
    if config.observability.metrics_port > 0 {
        let addr = SocketAddr::from(([0, 0, 0, 0], config.observability.metrics_port));
        PrometheusBuilder::new()
            .with_http_listener(addr)
            .install()?;
        info!("Prometheus exporter listening on {}", addr);
    }

    // Initialize database connection
    let db = DbPool::new(&config.database).await?;
    let repo = Repository::new(db);

    // The recommendation feature stays off unless fully configured
    let recommender: Option<Arc<dyn Recommender>> = if config.recommend.is_configured() {
        match GeminiRecommender::new(config.recommend.clone()) {
            Ok(rec) => {
                info!(model = %config.recommend.model, "Recommendation service enabled");
                Some(Arc::new(rec))
            }
            Err(e) => {
                warn!(error = %e, "Recommendation service misconfigured, disabling");
                None
            }
        }
    } else {
        info!("Recommendation service not configured");
        None
    };

    let state = AppState {
        config: config.clone(),
        repo,
        recommender,
    };

    // Build the router
    let app = create_router(state);

    // Start the server
    let addr = SocketAddr::from((
        config
            .server
            .host
            .parse::<std::net::IpAddr>()
            .unwrap_or_else(|_| [0, 0, 0, 0].into()),
        config.server.port,
    ));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Create the main application router
fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Request ID propagation
    let request_id = SetRequestIdLayer::x_request_id(MakeRequestUuid);
    let propagate_id = PropagateRequestIdLayer::x_request_id();

    let api_routes = Router::new()
        // Health
        .route("/health", get(handlers::health::health))
        // Auth
        .route("/auth/login", post(handlers::auth::login))
        // Papers
        .route("/papers", get(handlers::papers::list_papers))
        .route(
            "/papers/{id}",
            get(handlers::papers::get_paper)
                .put(handlers::papers::update_paper)
                .delete(handlers::papers::delete_paper),
        )
        .route(
            "/papers/with-authors",
            post(handlers::papers::create_paper_with_authors),
        )
        .route(
            "/papers/batch-with-authors",
            post(handlers::papers::batch_create_papers),
        )
        // Reviews
        .route(
            "/papers/{id}/reviews",
            get(handlers::reviews::list_reviews).post(handlers::reviews::submit_review),
        )
        // Recommendations & AI drafts
        .route(
            "/papers/{id}/recommendations",
            get(handlers::recommendations::recommendations),
        )
        .route("/ai-drafts", post(handlers::recommendations::create_ai_draft))
        // Reference lists
        .route("/venues", get(handlers::venues::list_venues))
        .route("/venues/recent", get(handlers::venues::recent_venues))
        .route("/projects", get(handlers::catalog::list_projects))
        .route("/datasets", get(handlers::catalog::list_datasets))
        .route("/users", get(handlers::catalog::list_users))
        // Per-user review views
        .route(
            "/users/{id}/papers-in-review",
            get(handlers::reviews::papers_in_review),
        )
        .route(
            "/users/{id}/assigned-reviews",
            get(handlers::reviews::assigned_reviews),
        )
        // Authors
        .route(
            "/authors/{id}/portfolio",
            get(handlers::authors::portfolio),
        )
        .route("/authors/{id}/insights", get(handlers::authors::insights))
        // Reviewers
        .route("/reviewers/top", get(handlers::reviewers::top_reviewers))
        .route(
            "/reviewable-papers",
            get(handlers::reviewers::reviewable_papers),
        )
        // Analytical queries
        .route("/advanced/query1", get(handlers::advanced::query1))
        .route("/advanced/query2", get(handlers::advanced::query2))
        .route("/advanced/query3", get(handlers::advanced::query3))
        .route("/advanced/query4", get(handlers::advanced::query4));

    Router::new()
        .nest("/api", api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(request_id)
        .layer(propagate_id)
        .with_state(state)
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, starting shutdown..."),
        _ = terminate => info!("Received SIGTERM, starting shutdown..."),
    }
}
