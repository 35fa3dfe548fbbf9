//! Storage layer for selfeval.
//!
//! Submissions and admin annotations are kept as two JSON documents in a
//! key-value area ([`KeyValueStore`]) and are always read and written
//! wholesale. There is no locking: two writers interleaving a
//! read-modify-write cycle lose one of the writes.
//!
//! The rest of the crate talks to storage through the
//! [`SubmissionRepository`] and [`AnnotationRepository`] capabilities, so the
//! wizard and the report can run against an in-memory store in tests.

pub mod kv;
pub mod migrations;
pub mod schema;
pub mod sqlite;

use std::collections::BTreeMap;

use chrono::Utc;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{Error, Result};
use crate::survey::{Annotation, Submission};

pub use kv::{KeyValueStore, MemoryKv};
pub use sqlite::SqliteKv;

/// Key holding the JSON array of submissions.
pub const SUBMISSIONS_KEY: &str = "avaliacoes";

/// Key holding the JSON map of admin annotations.
pub const ANNOTATIONS_KEY: &str = "admin_comments";

/// Load, append and clear completed submissions.
pub trait SubmissionRepository {
    /// Load every stored submission.
    ///
    /// Never fails: a missing or unparseable document is logged and yields an
    /// empty collection, and individual records that cannot be read are
    /// logged and skipped.
    fn load_all(&self) -> Vec<Submission>;

    /// Append a submission.
    ///
    /// The store assigns a fresh, unique id and the creation timestamp,
    /// overwriting whatever the caller set. Returns the stored record.
    ///
    /// # Errors
    ///
    /// Returns an error if the existing document cannot be parsed (it is left
    /// untouched) or the backend rejects the write.
    fn append_one(&self, submission: Submission) -> Result<Submission>;

    /// Remove every submission. Returns how many were removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn clear_all(&self) -> Result<usize>;
}

/// Read and write admin annotations.
pub trait AnnotationRepository {
    /// Load every annotation, keyed by respondent identifier.
    ///
    /// Never fails; see [`SubmissionRepository::load_all`].
    fn load_annotations(&self) -> BTreeMap<String, Annotation>;

    /// Write the annotation for `key`, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns an error if the existing document cannot be parsed or the
    /// backend rejects the write.
    fn annotate(&self, key: &str, comment: &str, author: &str) -> Result<Annotation>;
}

/// Survey store over any key-value backend.
#[derive(Debug)]
pub struct SurveyStore<K> {
    kv: K,
}

/// Survey store persisted in `SQLite`.
pub type SqliteSurveyStore = SurveyStore<SqliteKv>;

/// Survey store kept in memory.
pub type MemorySurveyStore = SurveyStore<MemoryKv>;

impl<K: KeyValueStore> SurveyStore<K> {
    /// Wrap a key-value backend.
    pub fn new(kv: K) -> Self {
        Self { kv }
    }

    /// The underlying backend.
    #[must_use]
    pub fn kv(&self) -> &K {
        &self.kv
    }

    /// Read and parse the document under `key`, treating absence as empty.
    fn read_strict<T: DeserializeOwned + Default>(&self, key: &str) -> Result<T> {
        match self.kv.get(key)? {
            None => Ok(T::default()),
            Some(raw) if raw.trim().is_empty() => Ok(T::default()),
            Some(raw) => serde_json::from_str(&raw).map_err(|source| Error::StoreCorrupt {
                key: key.to_string(),
                source,
            }),
        }
    }

    /// Like [`Self::read_strict`], but logs failures and falls back to empty.
    fn read_soft<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        self.read_strict(key).unwrap_or_else(|err| {
            warn!(key, error = %err, "Failed to load stored document, using empty collection");
            T::default()
        })
    }

    fn write<T: serde::Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<()> {
        let raw = serde_json::to_string(value)?;
        self.kv.set(key, &raw)
    }
}

impl MemorySurveyStore {
    /// Create an empty in-memory store.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::new(MemoryKv::new())
    }
}

impl SqliteSurveyStore {
    /// Open or create a store at the given database path.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or migrated.
    pub fn open(path: impl AsRef<std::path::Path>) -> Result<Self> {
        Ok(Self::new(SqliteKv::open(path)?))
    }
}

impl<K: KeyValueStore> SubmissionRepository for SurveyStore<K> {
    fn load_all(&self) -> Vec<Submission> {
        let records: Vec<Value> = self.read_soft(SUBMISSIONS_KEY);
        let total = records.len();
        let submissions: Vec<Submission> = records
            .into_iter()
            .enumerate()
            .filter_map(|(index, record)| match serde_json::from_value(record) {
                Ok(submission) => Some(submission),
                Err(err) => {
                    warn!(index, error = %err, "Skipping unreadable stored submission");
                    None
                }
            })
            .collect();
        debug!(count = submissions.len(), skipped = total - submissions.len(), "Loaded submissions");
        submissions
    }

    fn append_one(&self, mut submission: Submission) -> Result<Submission> {
        // Existing records are carried over as raw JSON so that ones this
        // version cannot read survive the rewrite.
        let mut submissions: Vec<Value> = self.read_strict(SUBMISSIONS_KEY)?;

        submission.id = Uuid::new_v4().to_string();
        submission.created_at = Utc::now();
        submissions.push(serde_json::to_value(&submission)?);

        self.write(SUBMISSIONS_KEY, &submissions)?;
        info!(
            id = %submission.id,
            sector = %submission.sector,
            total = submissions.len(),
            "Stored submission"
        );
        Ok(submission)
    }

    fn clear_all(&self) -> Result<usize> {
        let count = self.load_all().len();
        self.kv.remove(SUBMISSIONS_KEY)?;
        info!(count, "Cleared all submissions");
        Ok(count)
    }
}

impl<K: KeyValueStore> AnnotationRepository for SurveyStore<K> {
    fn load_annotations(&self) -> BTreeMap<String, Annotation> {
        self.read_soft(ANNOTATIONS_KEY)
    }

    fn annotate(&self, key: &str, comment: &str, author: &str) -> Result<Annotation> {
        let mut annotations: BTreeMap<String, Annotation> = self.read_strict(ANNOTATIONS_KEY)?;

        let annotation = Annotation {
            comment: comment.to_string(),
            date: Utc::now(),
            author: author.to_string(),
        };
        if annotations
            .insert(key.to_string(), annotation.clone())
            .is_some()
        {
            debug!(key, "Replacing existing annotation");
        }

        self.write(ANNOTATIONS_KEY, &annotations)?;
        Ok(annotation)
    }
}
