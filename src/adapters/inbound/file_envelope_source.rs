use crate::common::{Envelope, EnvelopeSource};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs::File;
use tokio::io::{AsyncBufReadExt, BufReader, Lines};

/// Replays a recorded channel stored as JSON Lines (one envelope per line).
/// Blank lines are skipped.
pub struct FileEnvelopeSource {
    path: PathBuf,
    lines: Lines<BufReader<File>>,
    line_number: u64,
}

impl FileEnvelopeSource {
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let path = path.as_ref().to_path_buf();
        let file = File::open(&path)
            .await
            .map_err(|e| format!("Failed to open replay file {}: {}", path.display(), e))?;
        Ok(Self {
            path,
            lines: BufReader::new(file).lines(),
            line_number: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl EnvelopeSource for FileEnvelopeSource {
    async fn next_envelope(&mut self) -> Result<Option<Envelope>, String> {
        while let Some(line) = self
            .lines
            .next_line()
            .await
            .map_err(|e| format!("Failed to read line: {}", e))?
        {
            self.line_number += 1;
            if line.trim().is_empty() {
                continue;
            }
            let envelope = Envelope::from_json(&line).map_err(|e| {
                format!(
                    "Failed to decode envelope at line {}: {}",
                    self.line_number, e
                )
            })?;
            return Ok(Some(envelope));
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_replay_file_yields_envelopes_in_order() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("replay.jsonl");
        let content = concat!(
            r#"{"eventType":"MOBILES_UPDATED","mobiles":{},"timestampMs":1}"#,
            "\n\n",
            r#"{"eventType":"MOBILES_DELETED","mobiles":{"4":{"id":4}},"timestampMs":2}"#,
            "\n"
        );
        tokio::fs::write(&path, content).await.unwrap();

        let mut source = FileEnvelopeSource::open(&path).await.unwrap();
        let first = source.next_envelope().await.unwrap().unwrap();
        let second = source.next_envelope().await.unwrap().unwrap();

        assert_eq!(first.event_type, "MOBILES_UPDATED");
        assert_eq!(second.timestamp_ms, 2);
        assert!(source.next_envelope().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_bad_line_reports_its_number() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("broken.jsonl");
        tokio::fs::write(&path, "not json\n").await.unwrap();

        let mut source = FileEnvelopeSource::open(&path).await.unwrap();
        let err = source.next_envelope().await.unwrap_err();
        assert!(err.contains("line 1"));
    }
}
