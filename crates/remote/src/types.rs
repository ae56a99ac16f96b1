//! Wire types for the document API.

use serde::{Deserialize, Serialize};

/// Query string of `GET /api/v1/documents/{collection}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentQuery {
    pub order_by: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl DocumentQuery {
    pub fn ordered(order_by: &str) -> Self {
        Self {
            order_by: order_by.to_string(),
            ..Self::default()
        }
    }

    pub fn matching(field: &str, value: &str, order_by: &str) -> Self {
        Self {
            order_by: order_by.to_string(),
            field: Some(field.to_string()),
            value: Some(value.to_string()),
        }
    }

    pub(crate) fn to_query_string(&self) -> String {
        let mut query = format!("orderBy={}", urlencoding::encode(&self.order_by));
        if let (Some(field), Some(value)) = (&self.field, &self.value) {
            query.push_str(&format!(
                "&field={}&value={}",
                urlencoding::encode(field),
                urlencoding::encode(value)
            ));
        }
        query
    }
}

/// Error body returned by the server.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: u16,
    pub message: String,
}
