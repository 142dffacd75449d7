use chrono::{DateTime, Utc};
use serde::Serialize;

/// A book in the catalog. Read-only from the order service's perspective.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: String,
    pub name: String,
    pub price: f64,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Payload for adding a book to the catalog.
#[derive(Debug, Clone)]
pub struct BookCreate {
    pub name: String,
    pub price: f64,
    pub description: Option<String>,
}

/// Payload for updating a book.
#[derive(Debug, Clone, Default)]
pub struct BookPatch {
    pub name: Option<String>,
    pub price: Option<f64>,
    pub description: Option<String>,
}
