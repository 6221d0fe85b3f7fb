//! Archive abstraction
//!
//! An archive is an ordered, read-only collection of documents. Its
//! lifecycle belongs to whoever opened it; consumers only iterate.
//!
//! ```text
//! ┌───────────────────────────────────────┐
//! │              Archive                  │
//! │  ┌───────────────┬────────────────┐   │
//! │  │ MemoryArchive │ BridgeArchive  │   │
//! │  │   (Vec)       │ (aura loader)  │   │
//! │  └───────────────┴────────────────┘   │
//! └───────────────────────────────────────┘
//! ```

use anyhow::Result;

use super::document::Document;

/// Lazy sequence of documents yielded by an archive
pub type Documents<'a> = Box<dyn Iterator<Item = Result<Document>> + 'a>;

/// Read-only document archive
pub trait Archive {
    /// Number of documents reported by the archive
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate documents in archive order.
    ///
    /// An archive is scanned at most once; a second call may yield nothing.
    fn documents(&mut self) -> Documents<'_>;

    /// Release the archive. Must be called once the scan is finished.
    fn close(&mut self) -> Result<()>;
}

/// Archive held entirely in memory
#[derive(Debug, Clone, Default)]
pub struct MemoryArchive {
    docs: Vec<Document>,
}

impl MemoryArchive {
    pub fn new(docs: Vec<Document>) -> Self {
        Self { docs }
    }
}

impl Archive for MemoryArchive {
    fn len(&self) -> usize {
        self.docs.len()
    }

    fn documents(&mut self) -> Documents<'_> {
        Box::new(self.docs.iter().cloned().map(Ok))
    }

    fn close(&mut self) -> Result<()> {
        Ok(())
    }
}
