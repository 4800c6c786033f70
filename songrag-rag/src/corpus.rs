//! The catalog corpus and the store that publishes the live version of it.
//!
//! A [`Corpus`] never changes after construction. Replacing the catalog goes
//! through [`CorpusStore::replace`], which publishes a new corpus with a higher
//! version so that indexes built from the old one can be detected as stale.

use std::ops::Index;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::RwLock;
use tracing::info;

use crate::record::Record;

/// An immutable, ordered collection of catalog records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Corpus {
    records: Vec<Record>,
    version: u64,
}

impl Corpus {
    /// Create a version-0 corpus. Each record's `id` is set to its position.
    pub fn new(records: Vec<Record>) -> Self {
        Self::with_version(records, 0)
    }

    fn with_version(mut records: Vec<Record>, version: u64) -> Self {
        for (position, record) in records.iter_mut().enumerate() {
            record.id = position;
        }
        Self { records, version }
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, id: usize) -> Option<&Record> {
        self.records.get(id)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }
}

impl Index<usize> for Corpus {
    type Output = Record;

    fn index(&self, id: usize) -> &Record {
        &self.records[id]
    }
}

impl<'a> IntoIterator for &'a Corpus {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Holds the live [`Corpus`].
///
/// Readers take an `Arc` snapshot; [`replace`](CorpusStore::replace) swaps in a
/// new corpus and bumps the version. Nothing is mutated in place.
#[derive(Debug)]
pub struct CorpusStore {
    current: RwLock<Arc<Corpus>>,
    version: AtomicU64,
}

impl CorpusStore {
    /// Create a store whose live corpus is `records` at version 0.
    pub fn new(records: Vec<Record>) -> Self {
        Self { current: RwLock::new(Arc::new(Corpus::new(records))), version: AtomicU64::new(0) }
    }

    /// Snapshot of the live corpus.
    pub async fn current(&self) -> Arc<Corpus> {
        self.current.read().await.clone()
    }

    /// Version of the live corpus.
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::Acquire)
    }

    /// Publish a new corpus built from `records` and return it.
    pub async fn replace(&self, records: Vec<Record>) -> Arc<Corpus> {
        let mut current = self.current.write().await;
        let version = current.version() + 1;
        let corpus = Arc::new(Corpus::with_version(records, version));
        *current = corpus.clone();
        self.version.store(version, Ordering::Release);
        info!(version, record_count = corpus.len(), "corpus replaced");
        corpus
    }
}

impl Default for CorpusStore {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}
