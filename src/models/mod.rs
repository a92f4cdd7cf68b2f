pub mod document;
pub mod search;
pub mod value;

pub use document::{document_from_value, new_document_id, Document, DocumentId};
pub use search::{ReindexReport, SearchHit, SearchOutcome, SearchStrategy};
pub use value::{numeric_value, render_value};
