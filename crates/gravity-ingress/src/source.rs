//! Feed sources: where raw feed bytes come from.
//!
//! The core pipeline is synchronous and I/O free; a [`FeedSource`] does the
//! single read before it runs.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use gravity_core::obs::FeedSpan;
use gravity_core::{FeedDecoder, VerifiedFeed};
use tracing::debug;

use crate::error::Result;

/// Anything that can produce one raw activity-feed document.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Human-readable origin, attached to the decode span.
    fn describe(&self) -> String;

    /// Read the raw feed bytes.
    async fn fetch(&self) -> Result<Vec<u8>>;
}

/// A feed previously dumped to a local JSON file.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl FeedSource for FileSource {
    fn describe(&self) -> String {
        self.path.display().to_string()
    }

    async fn fetch(&self) -> Result<Vec<u8>> {
        let bytes = tokio::fs::read(&self.path).await?;
        debug!(path = %self.path.display(), bytes = bytes.len(), "read feed file");
        Ok(bytes)
    }
}

/// Fetch from `source`, then decode and validate against `checklist`.
pub async fn fetch_and_validate<S: AsRef<str>>(
    source: &dyn FeedSource,
    decoder: &FeedDecoder<'_>,
    checklist: &[S],
) -> Result<VerifiedFeed> {
    let bytes = source.fetch().await?;
    let _span = FeedSpan::enter(&source.describe());
    Ok(decoder.decode_and_validate(&bytes, checklist)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::IngressError;
    use std::io::Write;

    #[tokio::test]
    async fn test_file_source_reads_bytes() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"[{"id": "1", "type": "WatchEvent", "payload": {"action": "started"}}]"#)
            .unwrap();

        let source = FileSource::new(file.path());
        assert_eq!(source.describe(), file.path().display().to_string());

        let verified = fetch_and_validate(&source, &FeedDecoder::default(), &["WatchEvent"])
            .await
            .unwrap();
        assert_eq!(verified.get("WatchEvent").unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileSource::new(dir.path().join("absent.json"));
        assert!(matches!(source.fetch().await, Err(IngressError::Io(_))));
    }
}
