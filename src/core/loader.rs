//! Loader - bridge to the external archive loader
//!
//! Archives are opened by the `aura` Python package (`aura.rag.AuraRAGLoader`).
//! A small bridge script runs under the configured interpreter and streams
//! the archive back as JSON lines:
//!
//! ```text
//! {"count": 2}
//! {"id": "a", "text": "...", "meta": {"source": "a.md"}}
//! {"id": "b", "text": null, "meta": {}}
//! ```
//!
//! Records are decoded lazily while the ranker iterates.

use std::io::{BufRead, BufReader, Lines};
use std::path::Path;
use std::process::{Child, ChildStdout, Command, Stdio};

use serde::Deserialize;
use thiserror::Error;

use super::archive::{Archive, Documents};
use super::document::Document;
use super::forward::exit_code;

/// Exit status the bridge uses when `aura.rag` cannot be imported
const UNAVAILABLE_EXIT: i32 = 3;

const BRIDGE_SCRIPT: &str = r#"
import json, sys
try:
    from aura.rag import AuraRAGLoader
except ImportError:
    sys.exit(3)
loader = AuraRAGLoader(sys.argv[1])
try:
    out = sys.stdout
    out.write(json.dumps({"count": len(loader)}) + "\n")
    out.flush()
    for doc_id, text, meta in loader.iterate_texts():
        record = {"id": str(doc_id), "text": text, "meta": dict(meta) if meta else {}}
        out.write(json.dumps(record, default=str) + "\n")
    out.flush()
finally:
    loader.close()
"#;

#[derive(Debug, Error)]
pub enum LoaderError {
    #[error("aura-core not installed. Run: pip install auralith-aura")]
    Unavailable,

    #[error("archive loader exited with code {code}")]
    Failed { code: i32 },

    #[error("malformed record from archive loader: {0}")]
    Protocol(#[from] serde_json::Error),

    #[error("archive loader I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Opens archives for reading
pub trait ArchiveLoader {
    fn open(&self, path: &Path) -> Result<Box<dyn Archive>, LoaderError>;
}

#[derive(Deserialize)]
struct Header {
    count: usize,
}

/// Loader backed by the `aura` Python package
#[derive(Debug, Clone)]
pub struct PythonLoader {
    python: String,
}

impl PythonLoader {
    pub fn new(python: impl Into<String>) -> Self {
        Self {
            python: python.into(),
        }
    }

    pub fn open_archive(&self, path: &Path) -> Result<BridgeArchive, LoaderError> {
        tracing::debug!(python = %self.python, archive = %path.display(), "starting archive loader");

        let mut child = Command::new(&self.python)
            .arg("-c")
            .arg(BRIDGE_SCRIPT)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| match e.kind() {
                std::io::ErrorKind::NotFound => LoaderError::Unavailable,
                _ => LoaderError::Io(e),
            })?;

        let stdout = match child.stdout.take() {
            Some(stdout) => stdout,
            None => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(LoaderError::Io(std::io::Error::other(
                    "loader stdout not captured",
                )));
            }
        };
        let mut archive = BridgeArchive {
            child,
            lines: Some(BufReader::new(stdout).lines()),
            count: 0,
            closed: false,
        };

        let first = archive.lines.as_mut().and_then(|lines| lines.next());
        match first {
            Some(Ok(line)) => {
                let header: Header = serde_json::from_str(&line)?;
                archive.count = header.count;
                tracing::debug!(documents = header.count, "archive opened");
                Ok(archive)
            }
            Some(Err(e)) => Err(LoaderError::Io(e)),
            None => {
                archive.closed = true;
                archive.lines = None;
                let code = exit_code(archive.child.wait()?);
                if code == UNAVAILABLE_EXIT {
                    Err(LoaderError::Unavailable)
                } else {
                    Err(LoaderError::Failed { code })
                }
            }
        }
    }
}

impl ArchiveLoader for PythonLoader {
    fn open(&self, path: &Path) -> Result<Box<dyn Archive>, LoaderError> {
        Ok(Box::new(self.open_archive(path)?))
    }
}

/// Archive streamed from a running loader process
pub struct BridgeArchive {
    child: Child,
    lines: Option<Lines<BufReader<ChildStdout>>>,
    count: usize,
    closed: bool,
}

impl Archive for BridgeArchive {
    fn len(&self) -> usize {
        self.count
    }

    fn documents(&mut self) -> Documents<'_> {
        let Some(lines) = self.lines.as_mut() else {
            return Box::new(std::iter::empty::<anyhow::Result<Document>>());
        };

        Box::new(
            lines
                .filter(|line| !matches!(line, Ok(l) if l.trim().is_empty()))
                .map(|line| -> anyhow::Result<Document> {
                    let line = line.map_err(LoaderError::Io)?;
                    let doc: Document =
                        serde_json::from_str(&line).map_err(LoaderError::Protocol)?;
                    Ok(doc)
                }),
        )
    }

    fn close(&mut self) -> anyhow::Result<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        // Dropping the pipe unblocks a loader that is still writing.
        self.lines = None;

        let code = exit_code(self.child.wait()?);
        tracing::debug!(code, "archive loader exited");
        if code != 0 {
            return Err(LoaderError::Failed { code }.into());
        }
        Ok(())
    }
}

impl Drop for BridgeArchive {
    fn drop(&mut self) {
        if !self.closed {
            self.lines = None;
            let _ = self.child.kill();
            let _ = self.child.wait();
        }
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;
    use crate::core::ranker::{Query, Ranker};
    use std::os::unix::fs::PermissionsExt;

    /// Write an executable shell script standing in for the interpreter
    fn fake_python(dir: &Path, body: &str) -> String {
        let path = dir.join("python");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path.to_string_lossy().into_owned()
    }

    #[test]
    fn test_streams_documents() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let python = fake_python(
            dir.path(),
            r#"cat <<'JSON'
{"count": 3}
{"id": "a", "text": "rust is fast", "meta": {}}
{"id": "b", "text": "go is simple", "meta": {"source": "b.txt"}}
{"id": "c", "text": null, "meta": {}}
JSON"#,
        );

        let mut archive = PythonLoader::new(python).open(Path::new("kb.aura"))?;
        assert_eq!(archive.len(), 3);

        let ranking = Ranker::new().rank_archive(&Query::parse("is fast"), archive.as_mut())?;
        archive.close()?;

        assert_eq!(ranking.total_matches, 2);
        assert_eq!(ranking.results[0].id(), "a");
        assert_eq!(ranking.results[1].document.label(), "b.txt");
        Ok(())
    }

    #[test]
    fn test_import_error_is_unavailable() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let python = fake_python(dir.path(), "exit 3");

        let err = PythonLoader::new(python)
            .open_archive(Path::new("kb.aura"))
            .err()
            .unwrap();
        assert!(matches!(err, LoaderError::Unavailable));
        Ok(())
    }

    #[test]
    fn test_missing_interpreter_is_unavailable() {
        let err = PythonLoader::new("/nonexistent/python3")
            .open_archive(Path::new("kb.aura"))
            .err()
            .unwrap();
        assert!(matches!(err, LoaderError::Unavailable));
    }

    #[test]
    fn test_loader_crash_before_header() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let python = fake_python(dir.path(), "exit 2");

        let err = PythonLoader::new(python)
            .open_archive(Path::new("kb.aura"))
            .err()
            .unwrap();
        assert!(matches!(err, LoaderError::Failed { code: 2 }));
        Ok(())
    }

    #[test]
    fn test_malformed_record() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let python = fake_python(dir.path(), "printf '{\"count\": 1}\\nnot json\\n'");

        let mut archive = PythonLoader::new(python).open(Path::new("kb.aura"))?;
        let result = Ranker::new().rank_archive(&Query::parse("x"), archive.as_mut());
        assert!(result.is_err());
        archive.close()?;
        Ok(())
    }

    #[test]
    fn test_failure_after_scan_reported_on_close() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let python = fake_python(dir.path(), "echo '{\"count\": 0}'\nexit 5");

        let mut archive = PythonLoader::new(python).open(Path::new("kb.aura"))?;
        assert_eq!(archive.documents().count(), 0);
        assert!(archive.close().is_err());
        Ok(())
    }
}
