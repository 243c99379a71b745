//! Contact CRUD handlers. Payload validation happens here; id checks and store calls live in ContactService.

use crate::error::AppError;
use crate::response;
use crate::service::validation::{body_to_map, body_violation};
use crate::service::ContactValidator;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::IntoResponse,
    Json,
};
use serde_json::{Map, Value};

fn json_object(body: Result<Json<Value>, JsonRejection>) -> Result<Map<String, Value>, AppError> {
    let Json(value) = body.map_err(|rejection| {
        tracing::debug!(%rejection, "unreadable request body");
        body_violation()
    })?;
    body_to_map(value)
}

pub async fn list(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let contacts = state.contacts.list().await?;
    Ok(response::ok(contacts))
}

pub async fn create(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let body = json_object(body)?;
    let new = ContactValidator::validate_create(&body)?;
    let contact = state.contacts.create(new).await?;
    Ok(response::created(contact))
}

pub async fn read(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let contact = state.contacts.get(&id).await?;
    Ok(response::ok(contact))
}

/// The payload is validated before the id, so an empty body is reported even for a malformed id.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let body = json_object(body)?;
    let patch = ContactValidator::validate_update(&body)?;
    let contact = state.contacts.update(&id, patch).await?;
    Ok(response::ok(contact))
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let count = state.contacts.delete(&id).await?;
    Ok(response::deleted(count))
}
