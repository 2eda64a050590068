use std::sync::Arc;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, Query, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Json, Response};
use axum::Extension;
use dcv_service::{FsDicomService, ServiceResult};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::info;

use crate::auth::{ensure_allowed, Action, Identity};
use crate::error::{ServerError, ServerResult};
use crate::router::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct AttributeQuery {
    pub file_id: Option<String>,
    pub tag: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ConvertQuery {
    pub file_id: Option<String>,
}

/// Run a service call on the blocking pool.
async fn blocking<T, F>(state: &AppState, f: F) -> ServerResult<T>
where
    T: Send + 'static,
    F: FnOnce(&FsDicomService) -> ServiceResult<T> + Send + 'static,
{
    let service = Arc::clone(&state.service);
    let result = tokio::task::spawn_blocking(move || f(&service))
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))?;
    Ok(result?)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Health check handler.
pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// `POST /upload` with a multipart `file` field. Admin only.
pub async fn upload(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ServerResult<Json<Value>> {
    ensure_allowed(state.auth.as_ref(), &identity, Action::Upload).await?;

    let no_file = || ServerError::BadRequest("No file provided".into());
    let mut multipart = multipart.map_err(|_| no_file())?;
    let mut data = None;
    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some("file") {
            data = Some(field.bytes().await?);
            break;
        }
    }
    let data = data.ok_or_else(no_file)?;

    let file_id = blocking(&state, move |svc| svc.ingest_bytes(&data)).await?;
    info!(user = %identity.name, %file_id, "upload stored");
    Ok(Json(json!({
        "message": "File uploaded successfully",
        "file_id": file_id.to_hex(),
    })))
}

/// `GET /attribute?file_id=..&tag=GGGG,EEEE`
pub async fn attribute(
    State(state): State<AppState>,
    Query(query): Query<AttributeQuery>,
) -> ServerResult<Json<Value>> {
    let (Some(file_id), Some(tag)) = (non_empty(query.file_id), non_empty(query.tag)) else {
        return Err(ServerError::BadRequest("Missing file_id or tag".into()));
    };
    let value = blocking(&state, move |svc| svc.get_attribute(&file_id, &tag)).await?;
    Ok(Json(json!({ "attribute": value })))
}

/// `GET /convert?file_id=..` returning `image/png`.
pub async fn convert(
    State(state): State<AppState>,
    Query(query): Query<ConvertQuery>,
) -> ServerResult<Response> {
    let Some(file_id) = non_empty(query.file_id) else {
        return Err(ServerError::BadRequest("Missing file_id".into()));
    };
    let png = blocking(&state, move |svc| svc.convert_to_image(&file_id)).await?;
    Ok(([(CONTENT_TYPE, "image/png")], png).into_response())
}
