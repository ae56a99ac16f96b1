mod file_store;
mod memory_store;

pub use file_store::FileBucketStore;
pub use memory_store::MemoryBucketStore;
