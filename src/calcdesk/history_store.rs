//! Saved work-experience history.
//!
//! Users can keep the totals produced by the experience calculator. Records
//! belong to an owner (the signed-in user's uid) and are reached through the
//! [`ExperienceStore`] trait:
//!
//! - **save** appends one record,
//! - **query** returns an owner's records newest first,
//! - **subscribe** yields the full list again every time it changes,
//! - **delete_many** / **clear** remove records in batches.
//!
//! Two implementations ship with the crate. [`InMemoryExperienceStore`] keeps
//! everything in process and publishes snapshots on a `tokio::sync::watch`
//! channel. [`LocalExperienceStore`] mirrors the same data to a JSON-lines file
//! on disk, one [`SavedExperience`] per line:
//!
//! ```text
//! {"id":"5b0e...","ownerId":"u1","name":"Acme","years":2,"months":3,"days":4,"createdAt":"2025-07-01T12:00:00Z"}
//! ```
//!
//! Writes never block the calculators: [`spawn_save`] hands a record to a
//! background task and only logs failures.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::error::Error;
use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::calcdesk::dates::DateSpan;

/// File name used inside the local history directory.
pub const LOCAL_HISTORY_FILE: &str = "experiences.jsonl";

/// One saved work-experience total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedExperience {
    pub id: String,
    pub owner_id: String,
    pub name: String,
    pub years: u32,
    pub months: u32,
    pub days: u32,
    pub created_at: DateTime<Utc>,
}

impl SavedExperience {
    /// A new record stamped with a random id and the current time.
    pub fn new(owner_id: impl Into<String>, name: impl Into<String>, span: DateSpan) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            owner_id: owner_id.into(),
            name: name.into(),
            years: span.years,
            months: span.months,
            days: span.days,
            created_at: Utc::now(),
        }
    }

    pub fn span(&self) -> DateSpan {
        DateSpan::new(self.years, self.months, self.days)
    }
}

/// Failures of the history store.
#[derive(Debug)]
pub enum StoreError {
    Io(io::Error),
    Serialization(serde_json::Error),
    /// A record with the same id is already stored.
    DuplicateId(String),
    /// The store's internal lock was poisoned by a panicking writer.
    Poisoned,
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(e) => write!(f, "History store I/O error: {}", e),
            StoreError::Serialization(e) => write!(f, "History store serialization error: {}", e),
            StoreError::DuplicateId(id) => write!(f, "History record {} already exists", id),
            StoreError::Poisoned => write!(f, "History store lock poisoned"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            StoreError::Io(e) => Some(e),
            StoreError::Serialization(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for StoreError {
    fn from(e: io::Error) -> Self {
        StoreError::Io(e)
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(e: serde_json::Error) -> Self {
        StoreError::Serialization(e)
    }
}

/// Append/query/subscribe/batch-delete collection of saved experiences.
#[async_trait]
pub trait ExperienceStore: Send + Sync {
    async fn save(&self, record: SavedExperience) -> Result<(), StoreError>;

    /// The owner's records, newest first.
    async fn query(&self, owner_id: &str) -> Result<Vec<SavedExperience>, StoreError>;

    /// Live view of the owner's records. Subscribing again restarts the
    /// sequence from the current snapshot.
    async fn subscribe(&self, owner_id: &str) -> Result<ExperienceSubscription, StoreError>;

    /// Remove the given ids, returning how many were actually removed.
    async fn delete_many(&self, ids: &[String]) -> Result<usize, StoreError>;

    /// Remove every record of one owner.
    async fn clear(&self, owner_id: &str) -> Result<usize, StoreError> {
        let ids: Vec<String> = self
            .query(owner_id)
            .await?
            .into_iter()
            .map(|record| record.id)
            .collect();
        self.delete_many(&ids).await
    }
}

type Snapshot = Arc<Vec<SavedExperience>>;

/// Stream of full-list snapshots for one owner.
///
/// The first call to [`ExperienceSubscription::next`] returns the list as it
/// was when subscribing; every later call waits for the next change.
pub struct ExperienceSubscription {
    owner_id: String,
    receiver: watch::Receiver<Snapshot>,
    primed: bool,
}

impl ExperienceSubscription {
    fn new(owner_id: &str, receiver: watch::Receiver<Snapshot>) -> Self {
        Self {
            owner_id: owner_id.to_string(),
            receiver,
            primed: false,
        }
    }

    /// Next snapshot, or `None` once the store has been dropped.
    pub async fn next(&mut self) -> Option<Vec<SavedExperience>> {
        if self.primed {
            self.receiver.changed().await.ok()?;
        }
        self.primed = true;
        let snapshot = self.receiver.borrow_and_update().clone();
        Some(owned_by(&snapshot, &self.owner_id))
    }

    pub fn owner_id(&self) -> &str {
        &self.owner_id
    }
}

fn owned_by(records: &[SavedExperience], owner_id: &str) -> Vec<SavedExperience> {
    let mut owned: Vec<SavedExperience> = records
        .iter()
        .filter(|record| record.owner_id == owner_id)
        .cloned()
        .collect();
    owned.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    owned
}

/// Process-local store publishing snapshots on a watch channel.
#[derive(Clone)]
pub struct InMemoryExperienceStore {
    records: Arc<Mutex<Vec<SavedExperience>>>,
    snapshots: Arc<watch::Sender<Snapshot>>,
}

impl InMemoryExperienceStore {
    pub fn new() -> Self {
        Self::with_records(Vec::new())
    }

    fn with_records(records: Vec<SavedExperience>) -> Self {
        let (sender, _) = watch::channel(Arc::new(records.clone()));
        Self {
            records: Arc::new(Mutex::new(records)),
            snapshots: Arc::new(sender),
        }
    }

    fn publish(&self, records: &[SavedExperience]) {
        self.snapshots.send_replace(Arc::new(records.to_vec()));
    }

    fn insert(&self, record: SavedExperience) -> Result<(), StoreError> {
        let mut records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        if records.iter().any(|existing| existing.id == record.id) {
            return Err(StoreError::DuplicateId(record.id));
        }
        records.push(record);
        self.publish(&records);
        Ok(())
    }

    fn contains(&self, id: &str) -> Result<bool, StoreError> {
        let records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(records.iter().any(|record| record.id == id))
    }

    /// How many records removing `ids` would drop, and what would remain.
    /// Nothing is changed.
    fn without(&self, ids: &[String]) -> Result<(usize, Vec<SavedExperience>), StoreError> {
        let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        let remaining: Vec<SavedExperience> = records
            .iter()
            .filter(|record| !wanted.contains(record.id.as_str()))
            .cloned()
            .collect();
        Ok((records.len() - remaining.len(), remaining))
    }

    /// Remove ids, publishing a snapshot when anything changed.
    fn remove(&self, ids: &[String]) -> Result<usize, StoreError> {
        let wanted: HashSet<&str> = ids.iter().map(String::as_str).collect();
        let mut records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        let before = records.len();
        records.retain(|record| !wanted.contains(record.id.as_str()));
        let removed = before - records.len();
        if removed > 0 {
            self.publish(&records);
        }
        Ok(removed)
    }

    fn owned(&self, owner_id: &str) -> Result<Vec<SavedExperience>, StoreError> {
        let records = self.records.lock().map_err(|_| StoreError::Poisoned)?;
        Ok(owned_by(&records, owner_id))
    }
}

impl Default for InMemoryExperienceStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ExperienceStore for InMemoryExperienceStore {
    async fn save(&self, record: SavedExperience) -> Result<(), StoreError> {
        self.insert(record)
    }

    async fn query(&self, owner_id: &str) -> Result<Vec<SavedExperience>, StoreError> {
        self.owned(owner_id)
    }

    async fn subscribe(&self, owner_id: &str) -> Result<ExperienceSubscription, StoreError> {
        Ok(ExperienceSubscription::new(owner_id, self.snapshots.subscribe()))
    }

    async fn delete_many(&self, ids: &[String]) -> Result<usize, StoreError> {
        self.remove(ids)
    }
}

/// Disk-backed store: a JSON-lines file mirrored by an in-memory index.
///
/// Saves append a single line; deletions rewrite the file. The file is
/// written before the index changes, so a failed write leaves both untouched.
pub struct LocalExperienceStore {
    inner: InMemoryExperienceStore,
    file_path: PathBuf,
    // Serialises file writes.
    file_lock: Mutex<()>,
}

impl LocalExperienceStore {
    /// Open (or create) the history file inside `dir`.
    pub fn open(dir: &Path) -> Result<Self, StoreError> {
        fs::create_dir_all(dir)?;
        let file_path = dir.join(LOCAL_HISTORY_FILE);
        let records = if file_path.exists() {
            load_records(&file_path)?
        } else {
            Vec::new()
        };
        log::debug!(
            "LocalExperienceStore::open: {} records from {}",
            records.len(),
            file_path.display()
        );
        Ok(Self {
            inner: InMemoryExperienceStore::with_records(records),
            file_path,
            file_lock: Mutex::new(()),
        })
    }

    pub fn file_path(&self) -> &Path {
        &self.file_path
    }
}

fn load_records(path: &Path) -> Result<Vec<SavedExperience>, StoreError> {
    let reader = BufReader::new(fs::File::open(path)?);
    let mut records = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<SavedExperience>(&line) {
            Ok(record) => records.push(record),
            Err(e) => log::warn!(
                "LocalExperienceStore: skipping unreadable line in {}: {}",
                path.display(),
                e
            ),
        }
    }
    Ok(records)
}

#[async_trait]
impl ExperienceStore for LocalExperienceStore {
    async fn save(&self, record: SavedExperience) -> Result<(), StoreError> {
        let line = serde_json::to_string(&record)?;

        let _guard = self.file_lock.lock().map_err(|_| StoreError::Poisoned)?;
        if self.inner.contains(&record.id)? {
            return Err(StoreError::DuplicateId(record.id));
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.file_path)?;
        writeln!(file, "{}", line)?;
        self.inner.insert(record)
    }

    async fn query(&self, owner_id: &str) -> Result<Vec<SavedExperience>, StoreError> {
        self.inner.owned(owner_id)
    }

    async fn subscribe(&self, owner_id: &str) -> Result<ExperienceSubscription, StoreError> {
        self.inner.subscribe(owner_id).await
    }

    async fn delete_many(&self, ids: &[String]) -> Result<usize, StoreError> {
        let _guard = self.file_lock.lock().map_err(|_| StoreError::Poisoned)?;
        let (removed, remaining) = self.inner.without(ids)?;
        if removed == 0 {
            return Ok(0);
        }

        let mut contents = String::new();
        for record in &remaining {
            contents.push_str(&serde_json::to_string(record)?);
            contents.push('\n');
        }
        fs::write(&self.file_path, contents)?;
        self.inner.remove(ids)
    }
}

/// Save `record` on a background task. Failures are logged, not returned to
/// the caller's flow; await the handle to observe them anyway.
pub fn spawn_save(
    store: Arc<dyn ExperienceStore>,
    record: SavedExperience,
) -> JoinHandle<Result<(), StoreError>> {
    tokio::spawn(async move {
        let id = record.id.clone();
        let result = store.save(record).await;
        if let Err(e) = &result {
            log::error!("spawn_save: could not save experience {}: {}", id, e);
        }
        result
    })
}
