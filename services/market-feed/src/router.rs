//! HTTP/WS router assembly

use axum::http::HeaderValue;
use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::handlers::{health, impact, pairs, snapshot, ws};
use crate::state::AppState;

pub fn create_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route("/health", get(health::get_health))
        .route("/pairs", get(pairs::list_pairs))
        .route("/venues", get(pairs::list_venues))
        .route("/snapshot", get(snapshot::get_snapshot))
        .route("/impact", get(impact::get_impact));

    Router::new()
        .nest("/api", api_routes)
        .route("/ws", get(ws::ws_handler))
        .layer(cors_layer(&state.config.cors_origin))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve the router until `close` resolves, then finish in-flight requests
/// and close subscriber sockets instead of resetting them.
pub async fn serve_until(
    listener: TcpListener,
    app: Router,
    close: oneshot::Receiver<()>,
) -> std::io::Result<()> {
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            // Resolves on the signal or if the sender side is dropped.
            let _ = close.await;
        })
        .await
}

fn cors_layer(origin: &str) -> CorsLayer {
    if origin == "*" {
        return CorsLayer::permissive();
    }
    match origin.parse::<HeaderValue>() {
        Ok(value) => CorsLayer::new().allow_origin(value).allow_methods(Any),
        Err(_) => {
            warn!(origin, "invalid CORS_ORIGIN, falling back to permissive");
            CorsLayer::permissive()
        }
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use crate::config::{supported_pairs, Config};

    use super::*;

    #[tokio::test]
    async fn serve_finishes_after_the_close_signal() {
        let state = AppState::new(Config::default(), supported_pairs());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let (close_tx, close_rx) = oneshot::channel();

        let server = tokio::spawn(serve_until(listener, create_router(state), close_rx));
        close_tx.send(()).unwrap();

        tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .expect("server kept running after close")
            .unwrap()
            .unwrap();
    }

    #[tokio::test]
    async fn serve_finishes_when_the_close_sender_is_dropped() {
        let state = AppState::new(Config::default(), supported_pairs());
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let (close_tx, close_rx) = oneshot::channel::<()>();

        let server = tokio::spawn(serve_until(listener, create_router(state), close_rx));
        drop(close_tx);

        tokio::time::timeout(Duration::from_secs(5), server)
            .await
            .expect("server kept running after sender drop")
            .unwrap()
            .unwrap();
    }
}
