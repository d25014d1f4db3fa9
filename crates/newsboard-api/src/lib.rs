pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::Config;
use crate::handlers::ws;
use crate::routes::{health, newspapers, posts, seed, summaries, threads};
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        threads::thread_titles,
        threads::thread_posts,
        newspapers::newspaper_list,
        posts::new_post,
        summaries::create_summary,
        summaries::queue_summary,
        summaries::list_summaries,
        summaries::suggest_post,
        seed::create_posts,
        seed::create_news,
        ws::thread_socket,
    ),
    components(schemas(
        health::HealthResponse,
        routes::ThreadResponse,
        routes::PostResponse,
        threads::ThreadTitlesResponse,
        newspapers::NewspaperResponse,
        posts::NewPostResponse,
        summaries::SummaryRequest,
        summaries::QueuedResponse,
        summaries::SummaryListResponse,
        summaries::SuggestRequest,
        summaries::SuggestResponse,
        seed::SeedPostsResponse,
        seed::SeedNewsResponse,
    )),
    tags(
        (name = "health"),
        (name = "threads"),
        (name = "newspapers"),
        (name = "posts"),
        (name = "summaries"),
        (name = "seed")
    )
)]
pub struct ApiDoc;

pub fn build_router(state: Arc<AppState>) -> Router {
    let mut api_routes = Router::new()
        // Health
        .route("/health", get(health::health_check))
        // Editions and threads
        .route("/thread-titles", get(threads::thread_titles))
        .route("/thread-posts", get(threads::thread_posts))
        .route("/newspaper-list", get(newspapers::newspaper_list))
        // Posts
        .route("/new-posts", get(posts::new_post))
        // Summaries
        .route("/thread-summary", post(summaries::create_summary))
        .route("/thread-summary/queue", post(summaries::queue_summary))
        .route("/get-summary", get(summaries::list_summaries))
        .route("/thread-post-suggest", post(summaries::suggest_post));

    if state.config.server.enable_seed_routes {
        api_routes = api_routes
            .route("/create-posts", get(seed::create_posts))
            .route("/create-news", get(seed::create_news));
    }

    // Timeout and compression do not apply to the long-lived socket
    let api_routes = api_routes
        .layer(TimeoutLayer::new(Duration::from_secs(
            state.config.server.request_timeout_secs,
        )))
        .layer(CompressionLayer::new());

    Router::new()
        .merge(api_routes)
        .route("/ws", get(ws::thread_socket))
        .merge(SwaggerUi::new("/api/docs").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(axum_middleware::from_fn(middleware::logging::log_request))
        .layer(build_cors_layer(&state.config))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn build_cors_layer(config: &Config) -> CorsLayer {
    if !config.cors.enabled {
        return CorsLayer::permissive();
    }

    let cors = CorsLayer::new()
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers(Any);

    if config.cors.origins.iter().any(|o| o == "*") {
        cors.allow_origin(Any)
    } else {
        let origins: Vec<axum::http::HeaderValue> = config
            .cors
            .origins
            .iter()
            .filter_map(|origin| origin.parse().ok())
            .collect();
        cors.allow_origin(AllowOrigin::list(origins))
    }
}
