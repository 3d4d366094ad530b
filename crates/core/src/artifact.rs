//! Artifact files: the indented JSON rendering of a payload on disk.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::payload::{text, Ticket};

#[derive(Debug, Error)]
pub enum ArtifactError {
    /// The compacted payload could not be re-rendered.
    #[error("Could not convert payload to indented JSON")]
    Render(#[source] serde_json::Error),

    /// The artifact file could not be written.
    #[error("Unable to create {}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Render compacted JSON with two-space indentation and a trailing newline.
///
/// Only whitespace is changed; the input is checked but not decoded.
pub fn render_indented(compact: &str) -> Result<String, ArtifactError> {
    let raw = text::parse_raw(compact.as_bytes()).map_err(ArtifactError::Render)?;
    let mut rendered = text::indent(raw.get(), text::INDENT);
    rendered.push('\n');
    Ok(rendered)
}

/// Writes `<data_dir>/<ticket>.json`, replacing any previous file for the
/// same ticket.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    data_dir: PathBuf,
}

impl ArtifactWriter {
    /// The directory must already exist; it is checked at startup.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Path of the artifact for `ticket`, as configured (may be relative).
    pub fn path_for(&self, ticket: &Ticket) -> PathBuf {
        self.data_dir.join(ticket.file_name())
    }

    /// Write the rendered payload and return the absolute artifact path.
    pub async fn write(&self, ticket: &Ticket, contents: &str) -> Result<PathBuf, ArtifactError> {
        let path = self.path_for(ticket);
        let path = std::path::absolute(&path).map_err(|source| ArtifactError::Write {
            path: path.clone(),
            source,
        })?;

        tokio::fs::write(&path, contents)
            .await
            .map_err(|source| ArtifactError::Write {
                path: path.clone(),
                source,
            })?;

        debug!(path = %path.display(), bytes = contents.len(), "Wrote artifact");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_indented() {
        let rendered = render_indented(r#"{"ticket":"AB12","x":1,"list":[1,2]}"#).unwrap();
        assert_eq!(
            rendered,
            "{\n  \"ticket\": \"AB12\",\n  \"x\": 1,\n  \"list\": [\n    1,\n    2\n  ]\n}\n"
        );
    }

    #[test]
    fn test_render_keeps_number_and_escape_spelling() {
        let rendered =
            render_indented(r#"{"ticket":"AB12","n":1E2,"s":"\u00e9\/","o":{}}"#).unwrap();
        assert_eq!(
            rendered,
            "{\n  \"ticket\": \"AB12\",\n  \"n\": 1E2,\n  \"s\": \"\\u00e9\\/\",\n  \"o\": {}\n}\n"
        );
    }

    #[test]
    fn test_render_empty_input_fails() {
        let err = render_indented("").unwrap_err();
        assert!(matches!(err, ArtifactError::Render(_)));
    }

    #[tokio::test]
    async fn test_write_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ArtifactWriter::new(dir.path());
        let ticket = Ticket::parse("AB12").unwrap();

        let path = writer.write(&ticket, "{}\n").await.unwrap();

        assert!(path.is_absolute());
        assert_eq!(path, dir.path().join("AB12.json"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "{}\n");
    }

    #[tokio::test]
    async fn test_write_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ArtifactWriter::new(dir.path());
        let ticket = Ticket::parse("AB12").unwrap();

        writer.write(&ticket, "first\n").await.unwrap();
        let path = writer.write(&ticket, "second\n").await.unwrap();

        assert_eq!(std::fs::read_to_string(path).unwrap(), "second\n");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_write_to_missing_directory_fails() {
        let dir = tempfile::tempdir().unwrap();
        let writer = ArtifactWriter::new(dir.path().join("missing"));
        let ticket = Ticket::parse("AB12").unwrap();

        let err = writer.write(&ticket, "{}\n").await.unwrap_err();
        assert!(matches!(err, ArtifactError::Write { .. }));
        assert!(err.to_string().starts_with("Unable to create "));
        assert!(err.to_string().ends_with("AB12.json"));
    }
}
