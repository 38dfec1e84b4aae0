//! URL queue for kumo
//!
//! The queue is the crawl's single source of truth about which URLs exist
//! and where each one is in its lifecycle. It enforces at-most-one item per
//! fingerprint, preserves insertion order (which, combined with depth-ordered
//! discovery, yields breadth-first traversal), and can snapshot itself to
//! JSON so an interrupted crawl resumes where it left off.

mod item;

pub use item::{ItemStatus, QueueItem, StateData};

use std::collections::HashMap;
use std::path::Path;

use url::Url;

use crate::url::fingerprint;
use crate::{CrawlError, Result};

/// Ordered, deduplicating store of [`QueueItem`]s
#[derive(Debug, Default)]
pub struct Queue {
    /// Items in insertion order; never shrinks
    items: Vec<QueueItem>,

    /// Fingerprint to index into `items`
    index: HashMap<String, usize>,

    /// Count of items currently in the `Queued` status
    queued: usize,

    /// Everything before this index is known not to be `Queued`
    scan_from: usize,
}

impl Queue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Proposes a URL to the queue; the single dedup gate
    ///
    /// If the fingerprint is new, an item is created in the `Queued` status
    /// and `(item, true)` is returned. If it already exists, the existing
    /// item is returned with `false` and nothing changes: duplicates are a
    /// normal outcome of crawling a densely linked graph, not an error.
    pub fn add(&mut self, url: Url, referrer: Option<Url>, depth: u32) -> (&QueueItem, bool) {
        let key = fingerprint(&url);

        if let Some(&idx) = self.index.get(&key) {
            tracing::trace!("Ignoring duplicate proposal for {}", key);
            return (&self.items[idx], false);
        }

        let item = QueueItem::new(url, referrer, depth);
        tracing::debug!("Queued {} at depth {}", item.url, item.depth);

        let idx = self.items.len();
        self.items.push(item);
        self.index.insert(key, idx);
        self.queued += 1;
        (&self.items[idx], true)
    }

    /// Whether a URL's fingerprint is already known to the queue
    pub fn exists(&self, url: &Url) -> bool {
        self.index.contains_key(&fingerprint(url))
    }

    /// Total number of items, any status
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of items still waiting for dispatch
    pub fn count_queued(&self) -> usize {
        self.queued
    }

    /// Number of items currently in the given status
    pub fn count_status(&self, status: ItemStatus) -> usize {
        self.items.iter().filter(|i| i.status == status).count()
    }

    /// Looks up an item by fingerprint
    pub fn get(&self, fingerprint: &str) -> Option<&QueueItem> {
        self.index.get(fingerprint).map(|&idx| &self.items[idx])
    }

    /// Looks up an item by URL
    pub fn get_by_url(&self, url: &Url) -> Option<&QueueItem> {
        self.get(&fingerprint(url))
    }

    /// Iterates items in insertion order
    pub fn items(&self) -> impl Iterator<Item = &QueueItem> {
        self.items.iter()
    }

    /// Fingerprint of the oldest item still in the `Queued` status
    ///
    /// Items only ever leave `Queued` (the graph has no way back in), so a
    /// monotonic cursor skips the settled prefix instead of rescanning it.
    pub fn next_queued(&mut self) -> Option<String> {
        while self.scan_from < self.items.len() {
            let item = &self.items[self.scan_from];
            if item.status == ItemStatus::Queued {
                return Some(item.fingerprint());
            }
            self.scan_from += 1;
        }
        None
    }

    /// Applies a validated status transition to an item
    ///
    /// Returns the updated item so callers can snapshot it for events.
    pub fn update_status(&mut self, fingerprint: &str, status: ItemStatus) -> Result<&QueueItem> {
        let idx = *self
            .index
            .get(fingerprint)
            .ok_or_else(|| CrawlError::UnknownItem {
                fingerprint: fingerprint.to_string(),
            })?;

        let item = &mut self.items[idx];
        let was_queued = item.status == ItemStatus::Queued;
        item.transition(status)?;
        if was_queued {
            self.queued -= 1;
        }
        Ok(&self.items[idx])
    }

    /// Mutable access to an item's response metadata
    pub fn state_data_mut(&mut self, fingerprint: &str) -> Option<&mut StateData> {
        let idx = *self.index.get(fingerprint)?;
        Some(&mut self.items[idx].state_data)
    }

    /// Writes the queue to disk as a JSON snapshot
    pub fn freeze<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(&self.items)?;
        std::fs::write(path, json)?;
        tracing::debug!("Froze queue with {} items", self.items.len());
        Ok(())
    }

    /// Restores a queue from a JSON snapshot
    ///
    /// Items that were mid-flight when the snapshot was taken (`Spooled` or
    /// `Downloading`) come back as `Queued` so the interrupted work is
    /// re-eligible; terminal items stay terminal and keep holding their
    /// fingerprints for dedup.
    pub fn defrost<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let mut items: Vec<QueueItem> = serde_json::from_str(&json)?;

        let mut index = HashMap::with_capacity(items.len());
        let mut queued = 0;
        for (idx, item) in items.iter_mut().enumerate() {
            if matches!(item.status, ItemStatus::Spooled | ItemStatus::Downloading) {
                item.status = ItemStatus::Queued;
                item.fetched = false;
            }
            if item.status == ItemStatus::Queued {
                queued += 1;
            }
            index.insert(item.fingerprint(), idx);
        }

        tracing::debug!("Defrosted queue with {} items ({} queued)", items.len(), queued);
        Ok(Self {
            items,
            index,
            queued,
            scan_from: 0,
        })
    }
}
