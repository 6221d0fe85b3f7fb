//! aura-gemini - Aura knowledge base helper for agent shells
//!
//! Thin dispatcher over the external `aura` toolchain: `compile`, `info`
//! and `memory` forward to it, `query` ranks archive documents by keyword
//! overlap.
//!
//! ## Key Concepts
//!
//! - **Archive**: read-only document collection opened by the external loader
//! - **Relevance**: count of query terms (with multiplicity) found in the text
//! - **Forwarding**: external commands run with inherited stdio, exit code kept

pub mod cli;
pub mod config;
pub mod core;

pub use core::archive::{Archive, MemoryArchive};
pub use core::document::Document;
pub use core::loader::{ArchiveLoader, PythonLoader};
pub use core::ranker::{Query, Ranker, Ranking, ScoredResult};
