use std::net::SocketAddr;

use axum::{
    extract::{Request, State},
    http::StatusCode,
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::{catch_panic::CatchPanicLayer, cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::error::{panic_response, ErrorReport};
use crate::state::AppState;
use crate::{courses, users};

pub fn build_app(state: AppState) -> Router {
    let routes = Router::new()
        .nest(
            "/api",
            Router::new()
                .merge(users::router())
                .merge(courses::router()),
        )
        .route("/", get(welcome).fallback(route_not_found));
    with_layers(routes, state)
}

/// Wraps `routes` with the 404 fallback, error handling and request tracing.
fn with_layers(routes: Router<AppState>, state: AppState) -> Router {
    routes
        .fallback(route_not_found)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn_with_state(state.clone(), log_errors))
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    tracing::info_span!("http_request", %method, uri = %uri, status = tracing::field::Empty)
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
}

async fn welcome() -> Json<serde_json::Value> {
    Json(json!({ "message": "Welcome to the REST API project!" }))
}

pub(crate) async fn route_not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "message": "Route Not Found" })))
}

async fn log_errors(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let res = next.run(req).await;
    if state.config.enable_global_error_logging {
        if let Some(report) = res.extensions().get::<ErrorReport>() {
            tracing::error!(status = %res.status(), error = %report.0, "global error handler");
        }
    }
    res
}

/// A bound listener plus the router it will serve.
pub struct Server {
    listener: TcpListener,
    app: Router,
}

impl Server {
    pub async fn bind(config: &AppConfig, state: AppState) -> anyhow::Result<Self> {
        let addr: SocketAddr = config.bind_addr().parse()?;
        let listener = TcpListener::bind(addr).await?;
        Ok(Self {
            listener,
            app: build_app(state),
        })
    }

    pub fn local_addr(&self) -> std::io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    pub async fn run(self) -> anyhow::Result<()> {
        tracing::info!("listening on {}", self.local_addr()?);
        axum::serve(self.listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
