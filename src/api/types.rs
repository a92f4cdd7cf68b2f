use serde::{Deserialize, Serialize};

use crate::models::*;

/// Envelope wrapping every API response
///
/// ```json
/// { "status": "ok", "body": { "id": "..." } }
/// { "status": "error", "error": "Query parse error: ..." }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub body: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(body: T) -> Self {
        Self {
            status: "ok".to_string(),
            body: Some(body),
            error: None,
        }
    }
}

impl ApiResponse<()> {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            body: None,
            error: Some(message.into()),
        }
    }
}

/// Query parameters of `GET /docs`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchParams {
    /// Filter expression; empty matches everything
    #[serde(default)]
    pub q: String,
    /// `true` bypasses the index
    #[serde(default, rename = "skipIndex")]
    pub skip_index: Option<String>,
}

impl SearchParams {
    pub fn allow_index(&self) -> bool {
        self.skip_index.as_deref() != Some("true")
    }
}

/// Response body of `POST /docs`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddDocumentResponse {
    pub id: DocumentId,
}

/// Response body of `GET /docs`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub documents: Vec<SearchHit>,
    pub count: usize,
    pub strategy: SearchStrategy,
}

impl From<SearchOutcome> for SearchResponse {
    fn from(outcome: SearchOutcome) -> Self {
        Self {
            count: outcome.hits.len(),
            documents: outcome.hits,
            strategy: outcome.strategy,
        }
    }
}

/// Response body of `GET /docs/:id`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetDocumentResponse {
    pub document: Document,
}

/// Response body of `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub version: String,
    pub documents: usize,
}
