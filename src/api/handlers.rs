use axum::{
    body::Bytes,
    extract::{
        rejection::{PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::Value;
use std::sync::Arc;
use tracing::error;

use crate::api::types::*;
use crate::error::DocdbError;

use super::router::AppState;

/// Error wrapper for API handlers
pub enum ApiError {
    Docdb(DocdbError),
    BadRequest(String),
}

impl From<DocdbError> for ApiError {
    fn from(e: DocdbError) -> Self {
        ApiError::Docdb(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match self {
            ApiError::Docdb(e) => {
                if !e.is_client_error() {
                    error!(kind = e.kind(), error = %e, "Request failed");
                }
                e.to_string()
            }
            ApiError::BadRequest(msg) => msg,
        };

        (StatusCode::BAD_REQUEST, Json(ApiResponse::error(message))).into_response()
    }
}

/// Create a document from the JSON object in the request body
pub async fn add_document(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<impl IntoResponse, ApiError> {
    let value: Value = serde_json::from_slice(&body)
        .map_err(|e| ApiError::BadRequest(format!("Invalid JSON body: {}", e)))?;

    let id = state.db.add_document(value)?;

    Ok(Json(ApiResponse::ok(AddDocumentResponse { id })))
}

/// Search documents with a filter expression
pub async fn search_documents(
    State(state): State<Arc<AppState>>,
    params: Result<Query<SearchParams>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Query(params) = params.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let outcome = state.db.search(&params.q, params.allow_index())?;

    Ok(Json(ApiResponse::ok(SearchResponse::from(outcome))))
}

/// Get a document by ID
pub async fn get_document(
    State(state): State<Arc<AppState>>,
    id: Result<Path<String>, PathRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Path(id) = id.map_err(|e| ApiError::BadRequest(e.body_text()))?;
    let document = state.db.get_document(&id)?;

    Ok(Json(ApiResponse::ok(GetDocumentResponse { document })))
}

/// Health check endpoint
pub async fn health_check(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let documents = state.db.document_count()?;

    Ok(Json(ApiResponse::ok(HealthResponse {
        version: crate::VERSION.to_string(),
        documents,
    })))
}

/// Prometheus metrics endpoint
pub async fn metrics(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let buffer = state
        .db
        .metrics()
        .encode_text()
        .map_err(|e| DocdbError::Internal(e.to_string()))?;

    Ok((
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        buffer,
    ))
}
