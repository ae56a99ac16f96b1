//! Records module - newsletters, events and comments, plus the id and
//! ordering rules every store shares.

mod ordering;
mod record_ids;
mod records_model;

pub use ordering::{compare_desc, field_equals, sort_desc_by_field};
pub use record_ids::IdGenerator;
pub use records_model::{
    document_id, format_timestamp, Collection, Comment, Document, Event, NewComment, NewEvent,
    NewNewsletter, Newsletter, Record,
};

#[cfg(test)]
mod records_model_tests;
