use thiserror::Error;

/// Main error type for docdb operations
#[derive(Error, Debug)]
pub enum DocdbError {
    #[error("Query parse error: {0}")]
    QueryParse(String),

    #[error("Document not found: {0}")]
    DocumentNotFound(String),

    #[error("Invalid document: {0}")]
    InvalidDocument(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Encoding error: {0}")]
    Encoding(#[from] bincode::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type alias for docdb operations
pub type Result<T> = std::result::Result<T, DocdbError>;

impl DocdbError {
    /// Stable tag used in API error payloads and logs
    pub fn kind(&self) -> &'static str {
        match self {
            DocdbError::QueryParse(_) => "query_parse_error",
            DocdbError::DocumentNotFound(_) => "document_not_found",
            DocdbError::InvalidDocument(_) => "invalid_document",
            DocdbError::Storage(_) => "storage_error",
            DocdbError::Decode(_) => "decode_error",
            DocdbError::Encoding(_) => "encoding_error",
            DocdbError::Io(_) => "io_error",
            DocdbError::Internal(_) => "internal_error",
        }
    }

    /// Errors caused by the caller's input rather than by the store
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            DocdbError::QueryParse(_)
                | DocdbError::DocumentNotFound(_)
                | DocdbError::InvalidDocument(_)
        )
    }
}
