//! Local queue - pending records staged in a key-value bucket store.

mod local_queue;
mod queue_traits;

pub use local_queue::LocalQueue;
pub use queue_traits::BucketStore;
