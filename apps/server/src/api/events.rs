use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    response::Response,
    routing::{delete, get},
    Json, Router,
};
use clubsite_core::records::{Collection, Event, NewEvent};

use super::{confirm_delete, feed_response};
use crate::{
    error::ApiResult,
    main_lib::AppState,
    models::{DeleteResponse, PublishedResponse},
};

async fn list_events(State(state): State<Arc<AppState>>) -> ApiResult<Response> {
    let feed = state.feed.events().await?;
    Ok(feed_response(feed))
}

async fn create_event(
    State(state): State<Arc<AppState>>,
    Json(input): Json<NewEvent>,
) -> ApiResult<Json<PublishedResponse<Event>>> {
    let published = state.publish.publish_event(input).await?;
    Ok(Json(published.into()))
}

async fn delete_event(
    Path(id): Path<String>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> ApiResult<Json<DeleteResponse>> {
    confirm_delete(&state, &headers)?;
    let outcome = state.publish.delete(Collection::Events, &id).await?;
    Ok(Json(outcome.into()))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/events", get(list_events).post(create_event))
        .route("/events/{id}", delete(delete_event))
}
