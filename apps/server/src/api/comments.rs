use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    routing::{delete, post},
    Json, Router,
};
use clubsite_core::records::{Collection, Comment, NewComment};

use super::confirm_delete;
use crate::{
    error::ApiResult,
    main_lib::AppState,
    models::{DeleteResponse, PublishedResponse},
};

async fn create_comment(
    State(state): State<Arc<AppState>>,
    Json(input): Json<NewComment>,
) -> ApiResult<Json<PublishedResponse<Comment>>> {
    let published = state.publish.post_comment(input).await?;
    Ok(Json(published.into()))
}

async fn delete_comment(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<DeleteResponse>> {
    confirm_delete(&state, &headers)?;
    let outcome = state.publish.delete(Collection::Comments, &id).await?;
    Ok(Json(outcome.into()))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/comments", post(create_comment))
        .route("/comments/{id}", delete(delete_comment))
}
