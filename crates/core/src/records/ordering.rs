//! Newest-first ordering shared by every store and by the local fallback.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate};
use serde_json::Value;

use super::records_model::Document;

/// Sort key for a document field. Missing values sort last, then values that
/// are not dates (compared as text), then instants.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
enum OrderKey {
    Missing,
    Text(String),
    Instant(i64),
}

fn order_key(document: &Document, field: &str) -> OrderKey {
    let raw = match document.get(field) {
        Some(Value::String(s)) => s.as_str(),
        Some(Value::Number(n)) => return n.as_i64().map_or(OrderKey::Missing, OrderKey::Instant),
        _ => return OrderKey::Missing,
    };
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return OrderKey::Instant(at.timestamp_millis());
    }
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(midnight) = day.and_hms_opt(0, 0, 0) {
            return OrderKey::Instant(midnight.and_utc().timestamp_millis());
        }
    }
    OrderKey::Text(raw.to_string())
}

/// Compares two documents newest first on `field`.
pub fn compare_desc(a: &Document, b: &Document, field: &str) -> Ordering {
    order_key(b, field).cmp(&order_key(a, field))
}

/// Sorts newest first on `field`. The sort is stable: ties keep their
/// incoming order.
pub fn sort_desc_by_field(documents: &mut [Document], field: &str) {
    documents.sort_by(|a, b| compare_desc(a, b, field));
}

/// True when `document[field]` is a string equal to `value`.
pub fn field_equals(document: &Document, field: &str, value: &str) -> bool {
    document.get(field).and_then(Value::as_str) == Some(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    fn doc(id: &str, date: &str) -> Document {
        match json!({ "id": id, "date": date }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    fn ids(documents: &[Document]) -> Vec<&str> {
        documents
            .iter()
            .map(|d| d["id"].as_str().unwrap())
            .collect()
    }

    #[test]
    fn sorts_iso_timestamps_newest_first() {
        let mut docs = vec![
            doc("a", "2024-01-01T08:00:00.000Z"),
            doc("b", "2024-03-01T08:00:00.000Z"),
            doc("c", "2024-02-01T08:00:00.000Z"),
        ];
        sort_desc_by_field(&mut docs, "date");
        assert_eq!(ids(&docs), vec!["b", "c", "a"]);
    }

    #[test]
    fn compares_instants_not_strings() {
        // Offsets make the string order disagree with the instant order.
        let mut docs = vec![
            doc("utc", "2024-01-01T10:00:00Z"),
            doc("plus_two", "2024-01-01T11:00:00+02:00"),
        ];
        sort_desc_by_field(&mut docs, "date");
        assert_eq!(ids(&docs), vec!["utc", "plus_two"]);
    }

    #[test]
    fn plain_dates_and_missing_fields() {
        let mut docs = vec![doc("day", "2024-01-02"), doc("none", "")];
        docs[1].remove("date");
        docs.push(doc("stamp", "2024-01-01T23:00:00.000Z"));
        sort_desc_by_field(&mut docs, "date");
        assert_eq!(ids(&docs), vec!["day", "stamp", "none"]);
    }

    #[test]
    fn ties_keep_incoming_order() {
        let mut docs = vec![
            doc("first", "2024-01-01T00:00:00.000Z"),
            doc("second", "2024-01-01T00:00:00.000Z"),
        ];
        sort_desc_by_field(&mut docs, "date");
        assert_eq!(ids(&docs), vec!["first", "second"]);
    }

    proptest! {
        #[test]
        fn sorted_output_is_non_increasing_and_stable(millis in proptest::collection::vec(0i64..5, 0..20)) {
            let mut docs: Vec<Document> = millis
                .iter()
                .enumerate()
                .map(|(i, m)| {
                    let at = DateTime::from_timestamp_millis(*m).unwrap();
                    doc(&i.to_string(), &at.to_rfc3339())
                })
                .collect();
            sort_desc_by_field(&mut docs, "date");
            for pair in docs.windows(2) {
                let a = order_key(&pair[0], "date");
                let b = order_key(&pair[1], "date");
                prop_assert!(a >= b);
                if a == b {
                    let ia: usize = pair[0]["id"].as_str().unwrap().parse().unwrap();
                    let ib: usize = pair[1]["id"].as_str().unwrap().parse().unwrap();
                    prop_assert!(ia < ib);
                }
            }
        }
    }
}
