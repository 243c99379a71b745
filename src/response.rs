//! Success response helpers. Contacts are returned bare, without an envelope.

use axum::{http::StatusCode, Json};
use serde::Serialize;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeleteReceipt {
    pub message: &'static str,
    pub deleted_count: u64,
}

pub fn created<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::CREATED, Json(data))
}

pub fn ok<T: Serialize>(data: T) -> (StatusCode, Json<T>) {
    (StatusCode::OK, Json(data))
}

pub fn deleted(deleted_count: u64) -> (StatusCode, Json<DeleteReceipt>) {
    (
        StatusCode::OK,
        Json(DeleteReceipt {
            message: "Contact deleted successfully",
            deleted_count,
        }),
    )
}
