use super::*;
use crate::errors::{Error, ValidationError};
use chrono::{TimeZone, Utc};
use serde_json::json;

fn now() -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 1, 12, 30, 0).unwrap()
}

#[test]
fn collection_names_buckets_and_order_fields() {
    assert_eq!(Collection::Newsletters.as_str(), "newsletters");
    assert_eq!(Collection::Events.bucket_key(), "hishk_events");
    assert_eq!(Collection::Comments.bucket_key(), "hishk_comments");
    assert_eq!(Collection::Newsletters.order_field(), "timestamp");
    assert_eq!(Collection::Comments.order_field(), "date");
    assert_eq!("events".parse::<Collection>().unwrap(), Collection::Events);
    assert!(matches!(
        "applications".parse::<Collection>(),
        Err(Error::NotFound(_))
    ));
}

#[test]
fn newsletter_requires_title_date_content() {
    let input = NewNewsletter {
        title: Some("T".into()),
        date: Some("2024-01-01".into()),
        content: Some("   ".into()),
        ..Default::default()
    };
    match input.validate() {
        Err(Error::Validation(ValidationError::MissingField(field))) => {
            assert_eq!(field, "content")
        }
        other => panic!("expected missing content, got {:?}", other),
    }
}

#[test]
fn newsletter_defaults_applied() {
    let input = NewNewsletter {
        title: Some("T".into()),
        author: Some("  ".into()),
        date: Some("2024-01-01".into()),
        content: Some("C".into()),
        ..Default::default()
    };
    input.validate().unwrap();
    let record = input.into_record("1700000000000".into(), now());
    assert_eq!(record.author, "Anonymous");
    assert_eq!(record.image_url, "");
    assert_eq!(record.video_url, "");
    assert_eq!(record.timestamp, "2024-01-01T12:30:00.000Z");
}

#[test]
fn newsletter_document_uses_camel_case() {
    let record = Newsletter {
        id: "1".into(),
        title: "T".into(),
        author: "A".into(),
        date: "2024-01-01".into(),
        content: "C".into(),
        image_url: "img".into(),
        video_url: String::new(),
        timestamp: "2024-01-01T00:00:00.000Z".into(),
    };
    let document = record.to_document().unwrap();
    assert_eq!(document["imageUrl"], json!("img"));
    assert_eq!(document_id(&document), Some("1"));
    assert_eq!(Newsletter::from_document(document).unwrap(), record);
}

#[test]
fn minimal_newsletter_document_reads_with_defaults() {
    let document = match json!({
        "id": "1700000000000",
        "title": "T",
        "date": "2024-01-01",
        "content": "C"
    }) {
        serde_json::Value::Object(map) => map,
        _ => unreachable!(),
    };
    let record = Newsletter::from_document(document).unwrap();
    assert_eq!(record.author, "Anonymous");
    assert!(record.timestamp.is_empty());
}

#[test]
fn newsletter_search_matches_author_title_content() {
    let record = NewNewsletter {
        title: Some("Spring Debate".into()),
        date: Some("2024-01-01".into()),
        content: Some("Motion on history".into()),
        ..Default::default()
    }
    .into_record("1".into(), now());
    assert!(record.matches("debate"));
    assert!(record.matches("HISTORY"));
    assert!(record.matches("anonym"));
    assert!(!record.matches("poetry"));
}

#[test]
fn event_splits_hosts_and_tags() {
    let input: NewEvent = serde_json::from_value(json!({
        "name": "Quiz",
        "date": "2024-02-02",
        "startTime": "16:00",
        "endTime": "17:00",
        "hosts": " Ana , Ben,",
        "description": "Trivia",
        "tags": "fun, history"
    }))
    .unwrap();
    input.validate().unwrap();
    let event = input.into_record("2".into(), now());
    assert_eq!(event.hosts, vec!["Ana", "Ben"]);
    assert_eq!(event.tags, vec!["fun", "history"]);
    assert_eq!(event.location, "TBD");
    assert_eq!(event.registrations, 0);
    assert_eq!(event.capacity, None);
}

#[test]
fn event_input_accepts_lists_and_numeric_strings() {
    let input: NewEvent = serde_json::from_value(json!({
        "name": "Quiz",
        "date": "2024-02-02",
        "startTime": "16:00",
        "endTime": "17:00",
        "hosts": ["Ana", " ", "Ben"],
        "description": "Trivia",
        "tags": [],
        "capacity": "50"
    }))
    .unwrap();
    let event = input.into_record("2".into(), now());
    assert_eq!(event.hosts, vec!["Ana", "Ben"]);
    assert!(event.tags.is_empty());
    assert_eq!(event.capacity, Some(50));
}

#[test]
fn event_input_treats_blank_capacity_as_unset() {
    for capacity in [json!(""), json!(null), json!("lots"), json!(-3)] {
        let input: NewEvent = serde_json::from_value(json!({ "capacity": capacity })).unwrap();
        assert_eq!(input.capacity, None);
    }
    let input: NewEvent = serde_json::from_value(json!({ "capacity": 25 })).unwrap();
    assert_eq!(input.capacity, Some(25));
}

#[test]
fn null_required_field_is_a_validation_error() {
    let input: NewNewsletter = serde_json::from_value(json!({
        "title": null,
        "date": "2024-01-01",
        "content": "C"
    }))
    .unwrap();
    assert!(matches!(
        input.validate(),
        Err(Error::Validation(ValidationError::MissingField(f))) if f == "title"
    ));

    let input: NewComment =
        serde_json::from_value(json!({ "newsletterId": null, "content": "hi" })).unwrap();
    assert!(matches!(
        input.validate(),
        Err(Error::Validation(ValidationError::MissingField(f))) if f == "newsletterId"
    ));
}

#[test]
fn event_document_with_string_hosts_and_capacity_reads() {
    let document = match json!({
        "id": "1700000000001",
        "name": "Quiz",
        "date": "2024-02-02",
        "startTime": "16:00",
        "endTime": "17:00",
        "hosts": "Ana, Ben",
        "description": "Trivia",
        "tags": ["fun"],
        "location": "",
        "capacity": "",
        "formUrl": null,
        "timestamp": "2024-01-01T10:00:00.000Z"
    }) {
        serde_json::Value::Object(map) => map,
        _ => unreachable!(),
    };
    let event = Event::from_document(document).unwrap();
    assert_eq!(event.hosts, vec!["Ana", "Ben"]);
    assert_eq!(event.tags, vec!["fun"]);
    assert_eq!(event.capacity, None);
    assert_eq!(event.form_url, "");
    assert_eq!(event.registrations, 0);

    let document = match json!({ "id": "2", "name": "Talk", "capacity": "40", "hosts": null }) {
        serde_json::Value::Object(map) => map,
        _ => unreachable!(),
    };
    let event = Event::from_document(document).unwrap();
    assert_eq!(event.capacity, Some(40));
    assert!(event.hosts.is_empty());
}

#[test]
fn newsletter_document_with_null_fields_reads() {
    let document = match json!({
        "id": "3",
        "title": "T",
        "author": null,
        "date": "2024-01-01",
        "content": "C",
        "imageUrl": null
    }) {
        serde_json::Value::Object(map) => map,
        _ => unreachable!(),
    };
    let record = Newsletter::from_document(document).unwrap();
    assert_eq!(record.image_url, "");
    assert!(record.matches("anonymous"));
}

#[test]
fn event_requires_hosts() {
    let input = NewEvent {
        name: Some("Quiz".into()),
        date: Some("2024-02-02".into()),
        start_time: Some("16:00".into()),
        end_time: Some("17:00".into()),
        description: Some("Trivia".into()),
        ..Default::default()
    };
    assert!(matches!(
        input.validate(),
        Err(Error::Validation(ValidationError::MissingField(f))) if f == "hosts"
    ));
}

#[test]
fn comment_trims_content_and_stamps_date() {
    let input = NewComment {
        newsletter_id: Some("n1".into()),
        author: None,
        content: Some("  nice read  ".into()),
    };
    input.validate().unwrap();
    let comment = input.into_record("3".into(), now());
    assert_eq!(comment.content, "nice read");
    assert_eq!(comment.author, "Anonymous");
    assert_eq!(comment.date, "2024-01-01T12:30:00.000Z");
}
