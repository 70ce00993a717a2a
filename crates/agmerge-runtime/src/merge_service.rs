use crate::{Error, Result};
use agmerge_engine::{OtherEventsPolicy, SessionData, extract_session_data, merge_session_data};
use agmerge_io::{discover_session_files, read_session_log, session_output_path, write_session};
use agmerge_types::SummaryData;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Minimum number of primary fragments worth merging
pub const MIN_FRAGMENTS: usize = 2;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeOptions {
    pub other_events: OtherEventsPolicy,
    /// Run the whole pipeline but leave the directory untouched
    pub dry_run: bool,
}

/// What a merged (or would-be merged) session looks like
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergeReport {
    pub session_id: String,
    pub output_path: PathBuf,
    /// Primary fragments in merge order
    pub fragments: Vec<PathBuf>,
    /// Raw companions paired with `fragments`; discovered, not merged
    pub raw_companions: Vec<PathBuf>,
    pub message_count: usize,
    pub other_event_count: usize,
    pub dropped_lines: usize,
    pub unreadable_files: usize,
    pub totals: SummaryData,
    pub dry_run: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum MergeOutcome {
    /// Fewer than two fragments: nothing to do, nothing written
    Skipped { files_found: usize },
    Merged(MergeReport),
}

impl MergeOutcome {
    pub fn is_merged(&self) -> bool {
        matches!(self, MergeOutcome::Merged(_))
    }
}

/// Merges the session fragments of one directory into a single session file
#[derive(Debug, Clone, Default)]
pub struct MergeService {
    options: MergeOptions,
}

impl MergeService {
    pub fn new(options: MergeOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &MergeOptions {
        &self.options
    }

    /// Merge with a fresh session id and the current time
    pub fn merge_directory(&self, dir: &Path) -> Result<MergeOutcome> {
        let session_id = Uuid::new_v4().to_string();
        self.merge_directory_as(dir, &session_id, Utc::now())
    }

    /// Merge using a caller-chosen identity and synthesis time.
    ///
    /// Unreadable fragments and malformed lines are logged and skipped; the
    /// only hard failures are a missing directory and a failed write.
    pub fn merge_directory_as(
        &self,
        dir: &Path,
        session_id: &str,
        merged_at: DateTime<Utc>,
    ) -> Result<MergeOutcome> {
        ensure_directory(dir)?;

        let files = discover_session_files(dir)?;
        if files.primary.len() < MIN_FRAGMENTS {
            tracing::info!(
                dir = %dir.display(),
                files_found = files.primary.len(),
                "No merge needed"
            );
            return Ok(MergeOutcome::Skipped {
                files_found: files.primary.len(),
            });
        }

        let mut fragments: Vec<SessionData> = Vec::with_capacity(files.primary.len());
        let mut dropped_lines = 0;
        let mut unreadable_files = 0;
        for path in &files.primary {
            let log = read_session_log(path);
            dropped_lines += log.dropped.len();
            if log.read_error.is_some() {
                unreadable_files += 1;
            }
            fragments.push(extract_session_data(log.records));
        }

        let merged =
            merge_session_data(&fragments, session_id, merged_at, self.options.other_events);

        let output_path = if self.options.dry_run {
            session_output_path(dir, session_id)
        } else {
            write_session(dir, session_id, merged.records())?
        };

        tracing::info!(
            session_id,
            fragments = files.primary.len(),
            messages = merged.messages.len(),
            dry_run = self.options.dry_run,
            "Merged session fragments"
        );

        Ok(MergeOutcome::Merged(MergeReport {
            session_id: merged.session_id,
            output_path,
            fragments: files.primary,
            raw_companions: files.raw,
            message_count: merged.messages.len(),
            other_event_count: merged.other_events.len(),
            dropped_lines,
            unreadable_files,
            totals: merged.totals,
            dry_run: self.options.dry_run,
        }))
    }
}

fn ensure_directory(dir: &Path) -> Result<()> {
    if !dir.exists() {
        return Err(Error::DirectoryNotFound(dir.to_path_buf()));
    }
    if !dir.is_dir() {
        return Err(Error::NotADirectory(dir.to_path_buf()));
    }
    Ok(())
}
