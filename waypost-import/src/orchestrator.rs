//! Import orchestrator
//!
//! Drives a batch of files through decode, normalize and upsert. Files are
//! processed sequentially and independently: one bad file records an error
//! against its path and the batch moves on. Each file's upserts run inside
//! a single transaction, so a file either commits as a unit or leaves no
//! trace.

use crate::decoders;
use crate::normalize::{self, RowOutcome};
use crate::store::{self, UpsertOutcome};
use anyhow::Result;
use sqlx::SqlitePool;
use std::path::{Path, PathBuf};
use tracing::{debug, error, info};

/// Per-file outcome counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FileStats {
    /// Newly created records; this is the file's reported import count
    pub created: u64,
    /// Existing records fully replaced
    pub updated: u64,
    /// Row-level skips (data-quality filter)
    pub skipped: u64,
    /// Entity-level rejections at the store boundary
    pub rejected: u64,
}

/// One processed file: either its counts or the recorded failure message
#[derive(Debug, Clone)]
pub struct FileReport {
    pub path: PathBuf,
    pub outcome: Result<FileStats, String>,
}

/// Batch result across all files
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    pub files: Vec<FileReport>,
    /// Running total of newly created records across the batch
    pub total_created: u64,
}

impl ImportReport {
    /// True when every given file failed at file level
    pub fn all_failed(&self) -> bool {
        !self.files.is_empty() && self.files.iter().all(|f| f.outcome.is_err())
    }
}

/// Sequential batch importer over a shared pool
pub struct ImportOrchestrator {
    pool: SqlitePool,
}

impl ImportOrchestrator {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Import the given files, optionally clearing the store first.
    ///
    /// The clear runs before any file is touched. No failure of a single
    /// file escapes this method; each is recorded against its path.
    pub async fn run(&self, paths: &[PathBuf], clear: bool) -> Result<ImportReport> {
        if clear {
            let removed = store::clear_all(&self.pool).await?;
            info!("cleared {} existing records before import", removed);
        }

        let mut report = ImportReport::default();

        for path in paths {
            match self.import_file(path).await {
                Ok(stats) => {
                    info!(
                        path = %path.display(),
                        created = stats.created,
                        updated = stats.updated,
                        skipped = stats.skipped,
                        rejected = stats.rejected,
                        "imported file"
                    );
                    report.total_created += stats.created;
                    report.files.push(FileReport {
                        path: path.clone(),
                        outcome: Ok(stats),
                    });
                }
                Err(e) => {
                    error!(path = %path.display(), "import failed: {}", e);
                    report.files.push(FileReport {
                        path: path.clone(),
                        outcome: Err(e.to_string()),
                    });
                }
            }
        }

        info!("batch complete: {} records imported", report.total_created);
        Ok(report)
    }

    /// Process one file to completion inside its own transaction
    async fn import_file(&self, path: &Path) -> Result<FileStats> {
        // Decode and normalize fully before opening the transaction, so a
        // file-level parse failure happens before any write
        let raw_rows = decoders::decode_file(path)?;

        let mut stats = FileStats::default();
        let mut records = Vec::new();
        for raw in &raw_rows {
            let outcome = match raw {
                Ok(record) => normalize::normalize(record),
                Err(reason) => RowOutcome::Skip(*reason),
            };
            match outcome {
                RowOutcome::Record(record) => records.push(record),
                RowOutcome::Skip(reason) => {
                    debug!(path = %path.display(), "skipping row: {}", reason);
                    stats.skipped += 1;
                }
            }
        }

        let mut tx = self.pool.begin().await?;
        for record in &records {
            match store::upsert(&mut tx, record).await? {
                UpsertOutcome::Created => stats.created += 1,
                UpsertOutcome::Updated => stats.updated += 1,
                UpsertOutcome::Rejected => stats.rejected += 1,
            }
        }
        tx.commit().await?;

        Ok(stats)
    }
}
