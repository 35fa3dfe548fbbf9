//! Printable receipts for completed submissions.
//!
//! A receipt is a small JSON document with the fields a respondent would
//! keep for their records. Writing one is best effort: failures are reported
//! to the caller but never undo the stored submission.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::survey::Submission;

/// Writes a receipt for a stored submission.
pub trait ReceiptWriter {
    /// Write the receipt. Returns where it was written, or `None` when this
    /// writer does not produce files.
    ///
    /// # Errors
    ///
    /// Returns an error if the receipt cannot be written.
    fn write(&self, submission: &Submission) -> Result<Option<PathBuf>>;
}

/// Outcome of writing a receipt after a successful submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReceiptStatus {
    /// The receipt was written to this path.
    Written(PathBuf),
    /// Receipts are disabled.
    Skipped,
    /// Writing failed; the submission is still stored.
    Failed(String),
}

impl ReceiptStatus {
    /// Run `writer` and fold its result into a status.
    pub fn from_writer(writer: &dyn ReceiptWriter, submission: &Submission) -> Self {
        match writer.write(submission) {
            Ok(Some(path)) => Self::Written(path),
            Ok(None) => Self::Skipped,
            Err(err) => {
                tracing::error!(id = %submission.id, error = %err, "Failed to write receipt");
                Self::Failed(err.to_string())
            }
        }
    }
}

/// Receipt writer used when receipts are disabled.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopReceiptWriter;

impl ReceiptWriter for NoopReceiptWriter {
    fn write(&self, _submission: &Submission) -> Result<Option<PathBuf>> {
        Ok(None)
    }
}

/// Writes `<id>.json` receipts into a directory.
#[derive(Debug, Clone)]
pub struct JsonReceiptWriter {
    dir: PathBuf,
}

#[derive(Debug, Serialize)]
struct Receipt<'a> {
    id: &'a str,
    name: &'a str,
    sector: &'a str,
    date: String,
    overall_score: String,
    skills: Vec<ReceiptLine<'a>>,
}

#[derive(Debug, Serialize)]
struct ReceiptLine<'a> {
    skill: &'a str,
    rating: &'a str,
}

impl JsonReceiptWriter {
    /// Create a writer targeting `dir`. The directory is created on first
    /// write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Directory receipts are written to.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn receipt_path(&self, submission: &Submission) -> PathBuf {
        let stem: String = submission
            .id
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' { c } else { '_' })
            .collect();
        self.dir.join(format!("{stem}.json"))
    }
}

impl ReceiptWriter for JsonReceiptWriter {
    fn write(&self, submission: &Submission) -> Result<Option<PathBuf>> {
        if submission.id.is_empty() {
            return Err(Error::internal("cannot write a receipt for an unsaved submission"));
        }

        fs::create_dir_all(&self.dir).map_err(|source| Error::DirectoryCreate {
            path: self.dir.clone(),
            source,
        })?;

        let skills = submission
            .skills
            .iter()
            .map(|(skill, rating)| ReceiptLine {
                skill: skill.label(),
                rating: rating.level().map_or("-", |level| level.as_str()),
            })
            .collect();

        let receipt = Receipt {
            id: &submission.id,
            name: &submission.name,
            sector: submission.sector.label(),
            date: submission.created_at.format("%d/%m/%Y %H:%M").to_string(),
            overall_score: format!("{:.1}", submission.overall_score),
            skills,
        };

        let path = self.receipt_path(submission);
        let json = serde_json::to_string_pretty(&receipt)?;
        fs::write(&path, json).map_err(|err| Error::receipt(&path, err.to_string()))?;

        info!(path = %path.display(), "Wrote receipt");
        debug!(id = %submission.id, "Receipt written for submission");
        Ok(Some(path))
    }
}
