//! Publish module - the write path and the delete confirmation gate.

mod delete_gate;
mod publish_model;
mod publish_service;

pub use delete_gate::DeleteGate;
pub use publish_model::{DeleteOutcome, PublishOutcome, Published};
pub use publish_service::PublishService;
