use std::path::{Path, PathBuf};

use serde::{Serialize, de::DeserializeOwned};
use tokio::{
    fs,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use super::StoreError;

/// An entity persisted as one element of a JSON array file.
pub trait Record: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    fn id(&self) -> &str;
}

/// Result of [`Collection::update_unless`].
#[derive(Debug, PartialEq)]
pub enum GuardedUpdate<T> {
    Applied(T),
    Missing,
    Conflict,
}

/// Ordered, id-keyed records mirrored to a single JSON file.
///
/// Reads are served from memory. Every mutation rewrites the whole file while
/// the write lock is held, so snapshots reach disk in mutation order. A failed
/// write does not undo the in-memory change.
pub struct Collection<T> {
    name: &'static str,
    path: PathBuf,
    records: RwLock<Vec<T>>,
}

impl<T: Record> Collection<T> {
    pub fn new(name: &'static str, path: PathBuf, records: Vec<T>) -> Self {
        Self {
            name,
            path,
            records: RwLock::new(records),
        }
    }

    /// Reads the backing file. `Ok(None)` when it does not exist yet.
    pub async fn read_file(path: &Path) -> Result<Option<Vec<T>>, StoreError> {
        let raw = match fs::read(path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(source) => {
                return Err(StoreError::Io {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };
        let records = serde_json::from_slice(&raw).map_err(|source| StoreError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(Some(records))
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn all(&self) -> Vec<T> {
        self.records.read().await.clone()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    pub async fn get(&self, id: &str) -> Option<T> {
        self.records
            .read()
            .await
            .iter()
            .find(|r| r.id() == id)
            .cloned()
    }

    pub async fn find<P>(&self, predicate: P) -> Option<T>
    where
        P: Fn(&T) -> bool,
    {
        self.records
            .read()
            .await
            .iter()
            .find(|r| predicate(*r))
            .cloned()
    }

    pub async fn filter<P>(&self, predicate: P) -> Vec<T>
    where
        P: Fn(&T) -> bool,
    {
        self.records
            .read()
            .await
            .iter()
            .filter(|r| predicate(*r))
            .cloned()
            .collect()
    }

    /// Appends a record, or replaces the one with the same id in place.
    pub async fn upsert(&self, record: T) -> Result<T, StoreError> {
        let mut records = self.records.write().await;
        match records.iter_mut().find(|r| r.id() == record.id()) {
            Some(existing) => *existing = record.clone(),
            None => records.push(record.clone()),
        }
        self.flush(&records).await?;
        Ok(record)
    }

    /// Appends `record` unless an existing record `conflicts` with it. The
    /// check and the insert happen under one write lock. `Ok(None)` on conflict.
    pub async fn insert_unless<P>(&self, record: T, conflicts: P) -> Result<Option<T>, StoreError>
    where
        P: Fn(&T) -> bool,
    {
        let mut records = self.records.write().await;
        if records.iter().any(|r| conflicts(r)) {
            return Ok(None);
        }
        records.push(record.clone());
        self.flush(&records).await?;
        Ok(Some(record))
    }

    /// Applies `change` to the record with `id`. `Ok(None)` when it is unknown.
    pub async fn update<F, R>(&self, id: &str, change: F) -> Result<Option<(T, R)>, StoreError>
    where
        F: FnOnce(&mut T) -> R,
    {
        let mut records = self.records.write().await;
        let Some(record) = records.iter_mut().find(|r| r.id() == id) else {
            return Ok(None);
        };
        let outcome = change(record);
        let updated = record.clone();
        self.flush(&records).await?;
        Ok(Some((updated, outcome)))
    }

    /// Applies `change` to the record with `id` unless another record
    /// `conflicts`. The check and the change happen under one write lock.
    pub async fn update_unless<P, F>(
        &self,
        id: &str,
        conflicts: P,
        change: F,
    ) -> Result<GuardedUpdate<T>, StoreError>
    where
        P: Fn(&T) -> bool,
        F: FnOnce(&mut T),
    {
        let mut records = self.records.write().await;
        if records.iter().any(|r| r.id() != id && conflicts(r)) {
            return Ok(GuardedUpdate::Conflict);
        }
        let Some(record) = records.iter_mut().find(|r| r.id() == id) else {
            return Ok(GuardedUpdate::Missing);
        };
        change(record);
        let updated = record.clone();
        self.flush(&records).await?;
        Ok(GuardedUpdate::Applied(updated))
    }

    pub async fn remove(&self, id: &str) -> Result<Option<T>, StoreError> {
        let mut records = self.records.write().await;
        let Some(index) = records.iter().position(|r| r.id() == id) else {
            return Ok(None);
        };
        let removed = records.remove(index);
        self.flush(&records).await?;
        Ok(Some(removed))
    }

    /// Swaps the in-memory records without touching disk.
    pub async fn replace_all(&self, fresh: Vec<T>) {
        *self.records.write().await = fresh;
    }

    pub(crate) async fn read_guard(&self) -> RwLockReadGuard<'_, Vec<T>> {
        self.records.read().await
    }

    pub(crate) async fn write_guard(&self) -> RwLockWriteGuard<'_, Vec<T>> {
        self.records.write().await
    }

    /// Serializes the full collection and replaces the file.
    pub(crate) async fn flush(&self, records: &[T]) -> Result<(), StoreError> {
        let json = serde_json::to_vec_pretty(records).map_err(StoreError::Serialize)?;
        let tmp = self.path.with_extension("json.tmp");
        fs::write(&tmp, &json).await.map_err(|source| StoreError::Io {
            path: tmp.clone(),
            source,
        })?;
        fs::rename(&tmp, &self.path)
            .await
            .map_err(|source| StoreError::Io {
                path: self.path.clone(),
                source,
            })?;
        tracing::debug!(collection = self.name, records = records.len(), "collection flushed");
        Ok(())
    }
}
