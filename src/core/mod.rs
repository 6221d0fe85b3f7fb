//! Core module - Business logic
//!
//! Document model, archive access, ranking and process forwarding.

pub mod archive;
pub mod document;
pub mod forward;
pub mod loader;
pub mod ranker;
