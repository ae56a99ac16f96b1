use crate::errors::Result;

/// Whole-value key-value storage backing the local queue, in the manner of
/// browser local storage: each key holds one serialized bucket.
pub trait BucketStore: Send + Sync {
    fn read(&self, key: &str) -> Result<Option<String>>;
    fn write(&self, key: &str, value: &str) -> Result<()>;
    fn delete(&self, key: &str) -> Result<()>;
}
