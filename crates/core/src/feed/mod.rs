//! Feed module - the read path for newsletters, events and comments.

mod feed_model;
mod feed_service;

pub use feed_model::{Feed, FeedSource};
pub use feed_service::FeedService;
