use serde::Serialize;

/// Where a listing came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedSource {
    Remote,
    /// The remote store was unreachable; items are the local queue snapshot.
    Local,
}

/// A newest-first listing ready to render.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Feed<T> {
    pub items: Vec<T>,
    pub source: FeedSource,
}

impl<T> Feed<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
