use std::path::Path;

pub const FILE_PREFIX: &str = "session_";
pub const FILE_SUFFIX: &str = ".jsonl";
pub const RAW_SUFFIX: &str = "_raw.jsonl";

/// Which half of a fragment pair a file is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FragmentRole {
    /// `session_<id>.jsonl`, the file that gets merged
    Primary,
    /// `session_<id>_raw.jsonl`, paired with a primary by `<id>`
    Raw,
}

/// Classify a file name against the `session_*.jsonl` pattern
pub fn classify_file_name(name: &str) -> Option<FragmentRole> {
    if !name.starts_with(FILE_PREFIX) || !name.ends_with(FILE_SUFFIX) {
        return None;
    }
    if name.len() < FILE_PREFIX.len() + FILE_SUFFIX.len() {
        return None;
    }

    if name.contains(RAW_SUFFIX) {
        Some(FragmentRole::Raw)
    } else {
        Some(FragmentRole::Primary)
    }
}

/// Session identifier embedded in a fragment file name
pub fn session_id_from_file_name(name: &str) -> Option<&str> {
    let rest = name.strip_prefix(FILE_PREFIX)?;
    match classify_file_name(name)? {
        FragmentRole::Raw => rest.strip_suffix(RAW_SUFFIX),
        FragmentRole::Primary => rest.strip_suffix(FILE_SUFFIX),
    }
}

pub fn session_id_from_path(path: &Path) -> Option<&str> {
    path.file_name()
        .and_then(|name| name.to_str())
        .and_then(session_id_from_file_name)
}

pub fn primary_file_name(session_id: &str) -> String {
    format!("{}{}{}", FILE_PREFIX, session_id, FILE_SUFFIX)
}

pub fn raw_file_name(session_id: &str) -> String {
    format!("{}{}{}", FILE_PREFIX, session_id, RAW_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_file_name() {
        assert_eq!(
            classify_file_name("session_abc.jsonl"),
            Some(FragmentRole::Primary)
        );
        assert_eq!(
            classify_file_name("session_abc_raw.jsonl"),
            Some(FragmentRole::Raw)
        );
        assert_eq!(classify_file_name("session_abc.json"), None);
        assert_eq!(classify_file_name("notes.jsonl"), None);
        assert_eq!(classify_file_name("session.jsonl"), None);
    }

    #[test]
    fn test_session_id_from_file_name() {
        assert_eq!(
            session_id_from_file_name("session_1b2c-3d.jsonl"),
            Some("1b2c-3d")
        );
        assert_eq!(
            session_id_from_file_name("session_1b2c-3d_raw.jsonl"),
            Some("1b2c-3d")
        );
        assert_eq!(session_id_from_file_name("other.jsonl"), None);
    }

    #[test]
    fn test_file_names_round_trip() {
        assert_eq!(primary_file_name("xyz"), "session_xyz.jsonl");
        assert_eq!(raw_file_name("xyz"), "session_xyz_raw.jsonl");
        assert_eq!(
            session_id_from_path(Path::new("/tmp/logs/session_xyz_raw.jsonl")),
            Some("xyz")
        );
    }
}
