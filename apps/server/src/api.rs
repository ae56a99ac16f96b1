use std::sync::Arc;

use axum::{
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json, Router,
};
use clubsite_core::feed::{Feed, FeedSource};
use serde::Serialize;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{config::Config, error::ApiResult, main_lib::AppState};

pub mod comments;
pub mod documents;
pub mod events;
pub mod health;
pub mod newsletters;
pub mod sync;

/// Request header carrying the delete confirmation phrase.
pub const DELETE_PHRASE_HEADER: &str = "x-delete-phrase";

/// Response header telling the client whether a listing came from the remote
/// store or from the local queue.
pub const FEED_SOURCE_HEADER: &str = "x-feed-source";

pub(crate) fn feed_response<T: Serialize>(feed: Feed<T>) -> Response {
    let source = match feed.source {
        FeedSource::Remote => "remote",
        FeedSource::Local => "local",
    };
    (
        [(
            HeaderName::from_static(FEED_SOURCE_HEADER),
            HeaderValue::from_static(source),
        )],
        Json(feed.items),
    )
        .into_response()
}

pub(crate) fn confirm_delete(state: &AppState, headers: &HeaderMap) -> ApiResult<()> {
    let supplied = headers
        .get(DELETE_PHRASE_HEADER)
        .and_then(|value| value.to_str().ok());
    state.delete_gate.check(supplied)?;
    Ok(())
}

pub fn app_router(state: Arc<AppState>, config: &Config) -> Router {
    let cors = if config.cors_allow.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins = config
            .cors_allow
            .iter()
            .filter_map(|o| match o.parse::<HeaderValue>() {
                Ok(origin) => Some(origin),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin '{}'", o);
                    None
                }
            })
            .collect::<Vec<_>>();
        CorsLayer::new().allow_origin(origins)
    };
    let cors = cors.allow_methods(Any).allow_headers(Any);

    let site = Router::new()
        .merge(newsletters::router())
        .merge(events::router())
        .merge(comments::router())
        .merge(sync::router());

    let v1 = Router::new()
        .merge(health::router())
        .merge(documents::router());

    Router::new()
        .nest("/api/v1", v1)
        .nest("/api", site)
        .with_state(state)
        .layer(cors)
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            config.request_timeout,
        ))
        .layer(TraceLayer::new_for_http())
}
