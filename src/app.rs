use std::net::SocketAddr;

use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderValue, Method, StatusCode, Uri},
    middleware as layers,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use serde::Serialize;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::{applications, auth, categories, gigs, middleware, state::AppState, users};

pub fn build_app(state: AppState) -> Router {
    let auth_routes = auth::router().layer(layers::from_fn_with_state(
        state.clone(),
        middleware::auth_rate_limit,
    ));

    let api = Router::new()
        .nest("/auth", auth_routes)
        .nest("/users", users::router())
        .nest("/gigs", gigs::router())
        .nest("/applications", applications::router())
        .nest("/categories", categories::router())
        .route("/health", get(health));

    Router::new()
        .nest("/api", api)
        .fallback(not_found)
        .with_state(state.clone())
        .layer(cors_layer(state.config.cors_origin.as_deref()))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri)
                })
                .on_response(
                    |res: &axum::http::Response<_>,
                     _latency: std::time::Duration,
                     span: &tracing::Span| {
                        let status = res.status();
                        span.record("status", tracing::field::display(status));
                        if status.is_server_error() {
                            tracing::error!(%status, "response");
                        } else {
                            tracing::info!(%status, "response");
                        }
                    },
                ),
        )
        .layer(layers::from_fn(middleware::security_headers))
        .layer(layers::from_fn(middleware::request_id))
        .layer(layers::from_fn_with_state(state, middleware::rate_limit))
        .layer(DefaultBodyLimit::max(10 * 1024 * 1024))
}

fn cors_layer(origin: Option<&str>) -> CorsLayer {
    match origin {
        Some(origin) if origin != "*" => {
            let cors = CorsLayer::new()
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::PATCH,
                ])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);
            match origin.parse::<HeaderValue>() {
                Ok(value) => cors.allow_origin(value),
                Err(_) => cors,
            }
        }
        _ => CorsLayer::permissive(),
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: String,
    uptime_seconds: u64,
}

async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "OK",
        timestamp: OffsetDateTime::now_utc()
            .format(&Rfc3339)
            .unwrap_or_default(),
        uptime_seconds: state.started.elapsed().as_secs(),
    })
}

async fn not_found(uri: Uri) -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "error": "Route not found",
            "path": uri.path(),
        })),
    )
}

pub async fn serve(app: Router) -> anyhow::Result<()> {
    let addr: SocketAddr = format!(
        "{}:{}",
        std::env::var("APP_HOST").unwrap_or_else(|_| "0.0.0.0".into()),
        std::env::var("APP_PORT").unwrap_or_else(|_| "5000".into())
    )
    .parse()?;

    tracing::info!("listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;
    Ok(())
}
