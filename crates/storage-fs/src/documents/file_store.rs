use std::{
    fs,
    io::ErrorKind,
    path::{Path, PathBuf},
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use clubsite_core::{
    errors::Error,
    records::{Collection, Document},
    remote::RemoteStore,
    Result,
};
use log::{debug, info};
use tokio::task;

use super::model::{decode_collection_file, encode_collection_file};
use super::{filtered, ordered, remove_from, upsert_into};
use crate::errors::StorageError;

/// File-backed alternative to a hosted document database: one JSON file per
/// collection under a data directory (`newsletters.json`, `events.json`,
/// `comments.json`).
///
/// File I/O runs on the blocking thread pool. Failures here are local I/O
/// problems, reported as `Error::Storage`, never `RemoteUnavailable`.
#[derive(Debug, Clone)]
pub struct FileDocumentStore {
    files: Arc<CollectionFiles>,
}

#[derive(Debug)]
struct CollectionFiles {
    dir: PathBuf,
    lock: Mutex<()>,
}

impl FileDocumentStore {
    /// Opens the store, creating the directory and any missing collection
    /// files with an empty list.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|e| StorageError::io(&dir, e))?;
        let files = CollectionFiles {
            dir,
            lock: Mutex::new(()),
        };
        for collection in Collection::ALL {
            let path = files.path_for(collection);
            if !path.exists() {
                write_file(&path, &encode_collection_file(collection, &[])?)?;
                info!("Initialized {}", path.display());
            }
        }
        Ok(Self {
            files: Arc::new(files),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.files.dir
    }

    async fn blocking<F, T>(&self, op: F) -> Result<T>
    where
        F: FnOnce(&CollectionFiles) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let files = Arc::clone(&self.files);
        task::spawn_blocking(move || op(&files))
            .await
            .map_err(|e| Error::Unexpected(format!("Document store task failed: {}", e)))?
    }
}

impl CollectionFiles {
    fn path_for(&self, collection: Collection) -> PathBuf {
        self.dir.join(format!("{}.json", collection.as_str()))
    }

    fn load_locked(&self, collection: Collection) -> Result<Vec<Document>> {
        let path = self.path_for(collection);
        let raw = match fs::read(&path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(StorageError::io(path, e).into()),
        };
        decode_collection_file(collection, &raw)
            .map_err(|e| StorageError::malformed(&path, e).into())
    }

    fn persist_locked(&self, collection: Collection, documents: &[Document]) -> Result<()> {
        let json = encode_collection_file(collection, documents)?;
        write_file(&self.path_for(collection), &json)
    }

    fn read(&self, collection: Collection) -> Result<Vec<Document>> {
        let _guard = self.lock.lock().map_err(|_| StorageError::LockPoisoned)?;
        self.load_locked(collection)
    }

    fn with_collection<F, T>(&self, collection: Collection, op: F) -> Result<T>
    where
        F: FnOnce(&mut Vec<Document>) -> Result<T>,
    {
        let _guard = self.lock.lock().map_err(|_| StorageError::LockPoisoned)?;
        let mut documents = self.load_locked(collection)?;
        let value = op(&mut documents)?;
        self.persist_locked(collection, &documents)?;
        Ok(value)
    }
}

fn write_file(path: &Path, contents: &str) -> Result<()> {
    fs::write(path, contents).map_err(|e| StorageError::io(path, e))?;
    Ok(())
}

#[async_trait]
impl RemoteStore for FileDocumentStore {
    async fn upsert(&self, collection: Collection, id: &str, document: Document) -> Result<()> {
        let owned_id = id.to_string();
        self.blocking(move |files| {
            files.with_collection(collection, |documents| {
                upsert_into(documents, &owned_id, document);
                Ok(())
            })
        })
        .await?;
        debug!("Stored {} {} in {}", collection, id, self.dir().display());
        Ok(())
    }

    async fn delete(&self, collection: Collection, id: &str) -> Result<()> {
        let id = id.to_string();
        self.blocking(move |files| {
            files.with_collection(collection, |documents| {
                if remove_from(documents, &id) {
                    Ok(())
                } else {
                    Err(Error::not_found(format!("{} {}", collection, id)))
                }
            })
        })
        .await
    }

    async fn query_ordered_desc(
        &self,
        collection: Collection,
        order_field: &str,
    ) -> Result<Vec<Document>> {
        let documents = self.blocking(move |files| files.read(collection)).await?;
        Ok(ordered(documents, order_field))
    }

    async fn query_where(
        &self,
        collection: Collection,
        field: &str,
        value: &str,
        order_field: &str,
    ) -> Result<Vec<Document>> {
        let documents = self.blocking(move |files| files.read(collection)).await?;
        Ok(filtered(documents, field, value, order_field))
    }

    async fn ping(&self) -> Result<()> {
        if self.dir().is_dir() {
            Ok(())
        } else {
            Err(Error::Storage(format!(
                "Data directory {} is missing",
                self.dir().display()
            )))
        }
    }
}
