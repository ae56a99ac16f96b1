use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::Response,
    routing::get,
    Json, Router,
};
use clubsite_core::records::{Collection, NewNewsletter, Newsletter};

use super::{confirm_delete, feed_response};
use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
    models::{DeleteResponse, PublishedResponse, SearchQuery},
};

async fn list_newsletters(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> ApiResult<Response> {
    let feed = state.feed.newsletters(query.q.as_deref()).await?;
    Ok(feed_response(feed))
}

async fn get_newsletter(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Newsletter>> {
    state
        .feed
        .newsletter(&id)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("Newsletter {} not found", id)))
}

async fn list_newsletter_comments(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Response> {
    let feed = state.feed.comments(&id).await?;
    Ok(feed_response(feed))
}

async fn create_newsletter(
    State(state): State<Arc<AppState>>,
    Json(input): Json<NewNewsletter>,
) -> ApiResult<Json<PublishedResponse<Newsletter>>> {
    let published = state.publish.publish_newsletter(input).await?;
    Ok(Json(published.into()))
}

async fn delete_newsletter(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<DeleteResponse>> {
    confirm_delete(&state, &headers)?;
    let outcome = state.publish.delete(Collection::Newsletters, &id).await?;
    Ok(Json(outcome.into()))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/newsletters", get(list_newsletters).post(create_newsletter))
        .route("/newsletters/{id}", get(get_newsletter).delete(delete_newsletter))
        .route("/newsletters/{id}/comments", get(list_newsletter_comments))
}
