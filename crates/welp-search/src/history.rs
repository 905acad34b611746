//! Per-identity search history: append-only storage with subscriptions, and
//! the capped recent-searches list fed from a subscription.

use std::collections::{HashMap, VecDeque};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use tokio::io::AsyncWriteExt;
use tokio::sync::broadcast;
use welp_core::HistoryEntry;

use crate::error::HistoryError;

/// Most entries the recent-searches list shows.
pub const RECENT_SEARCH_CAP: usize = 10;

const LIVE_CAPACITY: usize = 64;

/// Append-only history keyed by an opaque per-identity key.
pub trait HistoryStore {
    fn push(
        &self,
        owner_key: &str,
        entry: HistoryEntry,
    ) -> impl Future<Output = Result<(), HistoryError>> + Send;

    /// Existing entries in insertion order, followed by anything pushed
    /// after the call.
    fn subscribe(
        &self,
        owner_key: &str,
    ) -> impl Future<Output = Result<HistorySubscription, HistoryError>> + Send;
}

pub struct HistorySubscription {
    backlog: VecDeque<HistoryEntry>,
    live: broadcast::Receiver<HistoryEntry>,
}

impl HistorySubscription {
    fn new(backlog: Vec<HistoryEntry>, live: broadcast::Receiver<HistoryEntry>) -> Self {
        Self {
            backlog: backlog.into(),
            live,
        }
    }

    /// Waits for the next entry. `None` once the store is gone.
    pub async fn next(&mut self) -> Option<HistoryEntry> {
        if let Some(entry) = self.backlog.pop_front() {
            return Some(entry);
        }
        loop {
            match self.live.recv().await {
                Ok(entry) => return Some(entry),
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "history subscriber lagged");
                }
                Err(broadcast::error::RecvError::Closed) => return None,
            }
        }
    }

    /// Next entry if one is available without waiting.
    pub fn try_next(&mut self) -> Option<HistoryEntry> {
        if let Some(entry) = self.backlog.pop_front() {
            return Some(entry);
        }
        loop {
            match self.live.try_recv() {
                Ok(entry) => return Some(entry),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    tracing::warn!(skipped, "history subscriber lagged");
                }
                Err(
                    broadcast::error::TryRecvError::Empty | broadcast::error::TryRecvError::Closed,
                ) => return None,
            }
        }
    }
}

struct Channel {
    entries: Vec<HistoryEntry>,
    live: broadcast::Sender<HistoryEntry>,
}

impl Channel {
    fn new() -> Self {
        let (live, _) = broadcast::channel(LIVE_CAPACITY);
        Self {
            entries: Vec::new(),
            live,
        }
    }
}

/// History held in process memory; lost on exit.
#[derive(Default)]
pub struct MemoryHistoryStore {
    channels: Mutex<HashMap<String, Channel>>,
}

impl MemoryHistoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries stored for `owner_key`.
    #[must_use]
    pub fn len(&self, owner_key: &str) -> usize {
        let channels = self.channels.lock().unwrap_or_else(PoisonError::into_inner);
        channels.get(owner_key).map_or(0, |c| c.entries.len())
    }
}

impl HistoryStore for MemoryHistoryStore {
    async fn push(&self, owner_key: &str, entry: HistoryEntry) -> Result<(), HistoryError> {
        check_owner_key(owner_key)?;
        let mut channels = self.channels.lock().unwrap_or_else(PoisonError::into_inner);
        let channel = channels
            .entry(owner_key.to_string())
            .or_insert_with(Channel::new);
        channel.entries.push(entry.clone());
        // No subscribers is not an error.
        let _ = channel.live.send(entry);
        Ok(())
    }

    async fn subscribe(&self, owner_key: &str) -> Result<HistorySubscription, HistoryError> {
        check_owner_key(owner_key)?;
        let mut channels = self.channels.lock().unwrap_or_else(PoisonError::into_inner);
        let channel = channels
            .entry(owner_key.to_string())
            .or_insert_with(Channel::new);
        Ok(HistorySubscription::new(
            channel.entries.clone(),
            channel.live.subscribe(),
        ))
    }
}

/// History stored as one JSON Lines file per owner under a root directory.
pub struct JsonlHistoryStore {
    root: PathBuf,
    // Held across file I/O so a subscriber never misses or repeats an entry
    // appended while its backlog is being read.
    live: tokio::sync::Mutex<HashMap<String, broadcast::Sender<HistoryEntry>>>,
}

impl JsonlHistoryStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            live: tokio::sync::Mutex::new(HashMap::new()),
        }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, owner_key: &str) -> PathBuf {
        self.root.join(format!("{owner_key}.jsonl"))
    }

    async fn read_entries(path: &Path) -> Result<Vec<HistoryEntry>, HistoryError> {
        let contents = match tokio::fs::read_to_string(path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut entries = Vec::new();
        for (line_no, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<HistoryEntry>(line) {
                Ok(entry) => entries.push(entry),
                Err(e) => tracing::warn!(
                    path = %path.display(),
                    line = line_no + 1,
                    error = %e,
                    "skipping malformed history line"
                ),
            }
        }
        Ok(entries)
    }
}

impl HistoryStore for JsonlHistoryStore {
    async fn push(&self, owner_key: &str, entry: HistoryEntry) -> Result<(), HistoryError> {
        check_owner_key(owner_key)?;
        let mut line = serde_json::to_string(&entry)?;
        line.push('\n');

        let live = self.live.lock().await;
        tokio::fs::create_dir_all(&self.root).await?;
        let path = self.path_for(owner_key);
        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await?;

        tracing::debug!(path = %path.display(), id = %entry.id, "appended history entry");
        if let Some(sender) = live.get(owner_key) {
            let _ = sender.send(entry);
        }
        Ok(())
    }

    async fn subscribe(&self, owner_key: &str) -> Result<HistorySubscription, HistoryError> {
        check_owner_key(owner_key)?;
        let mut live = self.live.lock().await;
        let backlog = Self::read_entries(&self.path_for(owner_key)).await?;
        let receiver = live
            .entry(owner_key.to_string())
            .or_insert_with(|| broadcast::channel(LIVE_CAPACITY).0)
            .subscribe();
        Ok(HistorySubscription::new(backlog, receiver))
    }
}

/// Owner keys become file names, so only a conservative alphabet is allowed.
fn check_owner_key(owner_key: &str) -> Result<(), HistoryError> {
    let valid = !owner_key.is_empty()
        && owner_key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(HistoryError::InvalidOwnerKey(owner_key.to_string()))
    }
}

/// The recent-searches list shown to a signed-in user.
///
/// Keeps the first [`RECENT_SEARCH_CAP`] entries it is offered; later ones
/// are ignored.
#[derive(Debug, Clone, Default)]
pub struct RecentSearches {
    entries: Vec<HistoryEntry>,
}

impl RecentSearches {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns whether the entry was kept.
    pub fn offer(&mut self, entry: HistoryEntry) -> bool {
        if self.entries.len() >= RECENT_SEARCH_CAP {
            tracing::trace!(id = %entry.id, "recent searches full, ignoring entry");
            return false;
        }
        self.entries.push(entry);
        true
    }

    /// Pulls everything `subscription` has ready. Returns how many were kept.
    pub fn drain(&mut self, subscription: &mut HistorySubscription) -> usize {
        let mut kept = 0;
        while let Some(entry) = subscription.try_next() {
            if self.offer(entry) {
                kept += 1;
            }
        }
        kept
    }

    #[must_use]
    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    #[must_use]
    pub fn label(&self, index: usize) -> Option<String> {
        self.entries.get(index).map(HistoryEntry::label)
    }

    #[must_use]
    pub fn labels(&self) -> Vec<String> {
        self.entries.iter().map(HistoryEntry::label).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
#[path = "history_test.rs"]
mod tests;
