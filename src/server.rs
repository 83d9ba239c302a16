//! HTTP adapter exposing the board over plain-text routes.

use crate::board::{Board, BoardError, Coordinate};
use axum::extract::{Path, Request, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower::ServiceBuilder;
use tracing::{info, warn};

/// Builds the play surface around a shared board.
///
/// Every route answers `text/plain` in the board's view wire format, so the
/// same responses drive both a web UI and command-line probing with curl.
pub fn router(board: Arc<Board>) -> Router {
    Router::new()
        .route("/look/{player}", get(look))
        .route("/flip/{player}/{row}/{col}", get(flip))
        .route("/watch/{player}", get(watch))
        .layer(ServiceBuilder::new().map_request(log_request))
        .with_state(board)
}

/// Binds the endpoint and serves the board until the process exits.
///
/// # Errors
///
/// Returns the bind or accept-loop failure.
pub async fn serve(board: Arc<Board>, host: &str, port: u16) -> anyhow::Result<()> {
    let app = router(board);
    let listener = tokio::net::TcpListener::bind((host, port)).await?;
    info!(addr = %listener.local_addr()?, "board server listening");
    axum::serve(listener, app).await?;
    Ok(())
}

fn log_request(req: Request) -> Request {
    info!(method = %req.method(), uri = %req.uri(), "incoming request");
    req
}

async fn look(State(board): State<Arc<Board>>, Path(player): Path<String>) -> String {
    board.view(&player)
}

async fn flip(
    State(board): State<Arc<Board>>,
    Path((player, row, col)): Path<(String, usize, usize)>,
) -> Result<String, (StatusCode, String)> {
    match board.flip(Coordinate::new(row, col), &player).await {
        Ok(()) => Ok(board.view(&player)),
        Err(err @ BoardError::OutOfBounds { .. }) => {
            warn!(%err, player, "rejected flip");
            Err((StatusCode::NOT_FOUND, err.to_string()))
        }
        Err(err) => Err((StatusCode::BAD_REQUEST, err.to_string())),
    }
}

async fn watch(State(board): State<Arc<Board>>, Path(player): Path<String>) -> String {
    board.wait_for_change(&player).await
}
