use crate::Result;
use crate::naming::primary_file_name;
use agmerge_types::Record;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Where the file for `session_id` lives inside `dir`
pub fn session_output_path(dir: &Path, session_id: &str) -> PathBuf {
    dir.join(primary_file_name(session_id))
}

/// Write records as JSONL to `path`, all or nothing.
///
/// Content goes to a temporary file in the same directory which replaces
/// `path` only once everything has been flushed. On error the temporary file
/// is removed and `path` is left as it was. An existing `path` is overwritten.
pub fn write_records<'a, I>(path: &Path, records: I) -> Result<()>
where
    I: IntoIterator<Item = &'a Record>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        for record in records {
            serde_json::to_writer(&mut writer, record)?;
            writer.write_all(b"\n")?;
        }
        writer.flush()?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path)?;

    Ok(())
}

/// Write a session as `session_<id>.jsonl` inside `dir` and return its path
pub fn write_session<'a, I>(dir: &Path, session_id: &str, records: I) -> Result<PathBuf>
where
    I: IntoIterator<Item = &'a Record>,
{
    let path = session_output_path(dir, session_id);
    write_records(&path, records)?;
    tracing::debug!(path = %path.display(), "Wrote session file");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use agmerge_types::RecordKind;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_write_session_one_record_per_line() {
        let dir = TempDir::new().unwrap();
        let records = vec![
            Record::marker(RecordKind::SessionStart, "2025-01-01T00:00:00Z", "merged"),
            Record::parse_line(r#"{"type":"user","content":"hi","session_id":"merged"}"#)
                .unwrap(),
            Record::marker(RecordKind::SessionEnd, "2025-01-01T00:00:01Z", "merged"),
        ];

        let path = write_session(dir.path(), "merged", &records).unwrap();

        assert_eq!(path, dir.path().join("session_merged.jsonl"));
        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[1],
            r#"{"type":"user","content":"hi","session_id":"merged"}"#
        );
        assert!(content.ends_with('\n'));
    }

    #[test]
    fn test_write_overwrites_existing_file() {
        let dir = TempDir::new().unwrap();
        let path = session_output_path(dir.path(), "same");
        fs::write(&path, "old content\n").unwrap();

        let records = vec![Record::marker(RecordKind::SessionEnd, "", "same")];
        write_session(dir.path(), "same", &records).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(!content.contains("old content"));
        assert_eq!(content.lines().count(), 1);
    }

    #[test]
    fn test_write_into_missing_directory_fails_without_output() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("missing");

        let result = write_session(&missing, "x", std::iter::empty());

        assert!(result.is_err());
        assert!(!missing.exists());
    }

    #[test]
    fn test_no_temporary_files_left_behind() {
        let dir = TempDir::new().unwrap();
        let records = vec![Record::marker(RecordKind::SessionStart, "", "tidy")];
        write_session(dir.path(), "tidy", &records).unwrap();

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["session_tidy.jsonl".to_string()]);
    }
}
