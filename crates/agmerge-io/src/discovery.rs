use crate::Result;
use crate::naming::{
    FragmentRole, classify_file_name, session_id_from_file_name, session_id_from_path,
};
use crate::reader::read_start_time;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Fragment files found in one directory
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SessionFiles {
    /// Primary fragments, ordered by embedded session start time
    pub primary: Vec<PathBuf>,
    /// Raw companions of `primary`, in the same order (missing companions are skipped)
    pub raw: Vec<PathBuf>,
}

/// Scan `dir` (non-recursively) for session fragments.
///
/// Primary files are ordered by the timestamp of their first `session_start`
/// record, not by name or mtime: session ids are random, so file names carry
/// no chronology. Files without a start record sort first. Equal start times
/// keep file-name order.
pub fn discover_session_files(dir: &Path) -> Result<SessionFiles> {
    let mut primary = Vec::new();
    let mut raw_by_id: HashMap<String, PathBuf> = HashMap::new();

    for entry in WalkDir::new(dir)
        .min_depth(1)
        .max_depth(1)
        .follow_links(true)
        .sort_by_file_name()
    {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) if err.depth() == 0 => return Err(err.into()),
            Err(err) => {
                tracing::warn!(error = %err, "Skipping unreadable directory entry");
                continue;
            }
        };

        if !entry.file_type().is_file() {
            continue;
        }

        let Some(name) = entry.file_name().to_str() else {
            continue;
        };

        match classify_file_name(name) {
            Some(FragmentRole::Primary) => primary.push(entry.path().to_path_buf()),
            Some(FragmentRole::Raw) => {
                if let Some(id) = session_id_from_file_name(name) {
                    raw_by_id.insert(id.to_string(), entry.path().to_path_buf());
                }
            }
            None => {}
        }
    }

    primary.sort_by_cached_key(|path| read_start_time(path));

    let raw = primary
        .iter()
        .filter_map(|path| session_id_from_path(path))
        .filter_map(|id| raw_by_id.remove(id))
        .collect();

    tracing::debug!(
        dir = %dir.display(),
        primary = primary.len(),
        orphan_raw = raw_by_id.len(),
        "Discovered session files"
    );

    Ok(SessionFiles { primary, raw })
}
