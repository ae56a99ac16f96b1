use clubsite_core::records::{Collection, Document};
use serde_json::{Map, Value};

/// On-disk shape of a collection file: `{"<collection>": [ ...documents ]}`.
pub(super) fn decode_collection_file(
    collection: Collection,
    raw: &[u8],
) -> serde_json::Result<Vec<Document>> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(Vec::new());
    }
    let mut root: Map<String, Value> = serde_json::from_slice(raw)?;
    let documents = match root.remove(collection.as_str()) {
        Some(Value::Array(items)) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(map) => Some(map),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    };
    Ok(documents)
}

pub(super) fn encode_collection_file(
    collection: Collection,
    documents: &[Document],
) -> serde_json::Result<String> {
    let mut root = Map::new();
    root.insert(
        collection.as_str().to_string(),
        Value::Array(documents.iter().cloned().map(Value::Object).collect()),
    );
    serde_json::to_string_pretty(&Value::Object(root))
}
