use std::path::{Path, PathBuf};

use tokio::fs;

use crate::record::ArchiveRecord;
use crate::{info_time, Result};

#[inline]
pub fn archive_path(out_dir: &Path, archive_id: u32) -> PathBuf {
    out_dir.join(format!("archive_{archive_id}.json"))
}

/// Writes the record as pretty JSON to `{out_dir}/archive_{id}.json`,
/// creating the directory if needed and overwriting any previous file.
pub async fn save_archive(record: &ArchiveRecord, archive_id: u32, out_dir: &Path) -> Result<PathBuf> {
    fs::create_dir_all(out_dir).await?;

    let path = archive_path(out_dir, archive_id);
    let json = serde_json::to_string_pretty(record)?;
    fs::write(&path, json).await?;
    info_time!("Saved archive {}", archive_id);

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{DebugInfo, ExtractionStatus};

    fn record(title: &str) -> ArchiveRecord {
        ArchiveRecord {
            title: title.into(),
            date: "2024-01-01T00:00:00+00:00".into(),
            text_content: String::new(),
            links: Vec::new(),
            debug_info: DebugInfo {
                source_url: "https://bytes.dev/archives/9".into(),
                extraction_status: ExtractionStatus::Failed,
            },
        }
    }

    #[test]
    fn path_is_derived_from_id() {
        assert_eq!(
            archive_path(Path::new("archives"), 12),
            PathBuf::from("archives/archive_12.json")
        );
    }

    #[tokio::test]
    async fn creates_dir_and_keeps_non_ascii_literal() {
        let tmp = tempfile::tempdir().unwrap();
        let out_dir = tmp.path().join("nested").join("archives");

        let path = save_archive(&record("Čas za ☕"), 9, &out_dir).await.unwrap();

        assert_eq!(path, out_dir.join("archive_9.json"));
        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.contains("\"title\": \"Čas za ☕\""));
        assert!(written.contains("\n  \"debugInfo\": {"));
        assert!(written.contains("\"extractionStatus\": \"failed\""));
    }

    #[tokio::test]
    async fn overwrites_existing_file() {
        let tmp = tempfile::tempdir().unwrap();

        save_archive(&record("first"), 1, tmp.path()).await.unwrap();
        let path = save_archive(&record("second"), 1, tmp.path()).await.unwrap();

        let saved: ArchiveRecord =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(saved.title, "second");
    }

    #[tokio::test]
    async fn write_failure_is_returned() {
        let tmp = tempfile::tempdir().unwrap();
        let blocker = tmp.path().join("not_a_dir");
        std::fs::write(&blocker, "file").unwrap();

        assert!(save_archive(&record("x"), 1, &blocker).await.is_err());
    }
}
