//! Raw document API. Lets another server use this one as its remote store
//! (see `clubsite_remote::HttpDocumentStore`). Requests go straight to the
//! backing store; nothing here touches the local queue.

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use clubsite_core::records::{Collection, Document};
use serde_json::Value;

use crate::{
    error::{ApiError, ApiResult},
    main_lib::AppState,
    models::DocumentQuery,
};

async fn list_documents(
    Path(collection): Path<String>,
    Query(query): Query<DocumentQuery>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<Document>>> {
    let collection: Collection = collection.parse()?;
    let order_by = query
        .order_by
        .unwrap_or_else(|| collection.order_field().to_string());
    let documents = match (query.field, query.value) {
        (Some(field), Some(value)) => {
            state
                .remote
                .query_where(collection, &field, &value, &order_by)
                .await?
        }
        (None, None) => state.remote.query_ordered_desc(collection, &order_by).await?,
        _ => {
            return Err(ApiError::BadRequest(
                "'field' and 'value' must be given together".into(),
            ))
        }
    };
    Ok(Json(documents))
}

async fn put_document(
    Path((collection, id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
    Json(mut document): Json<Document>,
) -> ApiResult<Json<Document>> {
    let collection: Collection = collection.parse()?;
    match document.get("id") {
        None => {
            document.insert("id".into(), Value::String(id.clone()));
        }
        Some(Value::String(existing)) if existing == &id => {}
        Some(_) => {
            return Err(ApiError::BadRequest(format!(
                "Document id does not match '{}'",
                id
            )))
        }
    }
    state
        .remote
        .upsert(collection, &id, document.clone())
        .await?;
    Ok(Json(document))
}

async fn delete_document(
    Path((collection, id)): Path<(String, String)>,
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    let collection: Collection = collection.parse()?;
    state.remote.delete(collection, &id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/documents/{collection}", get(list_documents))
        .route(
            "/documents/{collection}/{id}",
            put(put_document).delete(delete_document),
        )
}
