use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    routing::{delete, get, post},
    Json, Router,
};
use clubsite_core::{
    records::{Collection, Document},
    sync::SyncReport,
};

use super::confirm_delete;
use crate::{error::ApiResult, main_lib::AppState, models::SyncStatusResponse};

/// Runs a pass now and reports what it pushed.
async fn sync_now(State(state): State<Arc<AppState>>) -> Json<SyncReport> {
    Json(state.sync.run_pass().await)
}

async fn sync_status(State(state): State<Arc<AppState>>) -> Json<SyncStatusResponse> {
    Json(SyncStatusResponse::new(
        state.sync.connectivity().is_online(),
        state.queue.pending_counts(),
    ))
}

/// Drops everything pending for one collection and returns what was dropped.
async fn discard_pending(
    Path(collection): Path<String>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<Vec<Document>>> {
    let collection: Collection = collection.parse()?;
    confirm_delete(&state, &headers)?;
    let drained = state.queue.drain(collection);
    tracing::warn!(
        "Discarded {} pending {} record(s)",
        drained.len(),
        collection
    );
    Ok(Json(drained))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sync", post(sync_now))
        .route("/sync/status", get(sync_status))
        .route("/sync/pending/{collection}", delete(discard_pending))
}
