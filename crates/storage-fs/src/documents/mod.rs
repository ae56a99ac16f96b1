//! Document stores implementing `RemoteStore` locally.
//!
//! Both keep each collection as an insertion-ordered list. An upsert of an
//! existing id replaces the document in place; a new id is appended.

mod file_store;
mod memory_store;
mod model;

pub use file_store::FileDocumentStore;
pub use memory_store::MemoryDocumentStore;

use clubsite_core::records::{document_id, field_equals, sort_desc_by_field, Document};

fn upsert_into(documents: &mut Vec<Document>, id: &str, document: Document) {
    match documents.iter_mut().find(|d| document_id(d) == Some(id)) {
        Some(existing) => *existing = document,
        None => documents.push(document),
    }
}

/// Returns false when no document had `id`.
fn remove_from(documents: &mut Vec<Document>, id: &str) -> bool {
    let before = documents.len();
    documents.retain(|d| document_id(d) != Some(id));
    documents.len() != before
}

fn ordered(mut documents: Vec<Document>, order_field: &str) -> Vec<Document> {
    sort_desc_by_field(&mut documents, order_field);
    documents
}

fn filtered(documents: Vec<Document>, field: &str, value: &str, order_field: &str) -> Vec<Document> {
    let matching = documents
        .into_iter()
        .filter(|d| field_equals(d, field, value))
        .collect();
    ordered(matching, order_field)
}
