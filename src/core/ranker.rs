//! Ranker - keyword-overlap relevance
//!
//! Scores each document by how many query terms (with multiplicity) occur
//! as substrings of its lowercased text. No index, no statistics: one
//! linear pass over the archive.

use anyhow::Result;
use serde::Serialize;

use super::archive::Archive;
use super::document::{Document, Metadata};

/// Number of results returned unless configured otherwise
pub const DEFAULT_LIMIT: usize = 5;

/// Lowercased, whitespace-split query. Duplicate terms are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    terms: Vec<String>,
}

impl Query {
    pub fn parse(text: &str) -> Self {
        let terms = text
            .to_lowercase()
            .split_whitespace()
            .map(str::to_string)
            .collect();
        Self { terms }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Count of terms found in `text`. `text` must already be lowercased.
    fn score(&self, text: &str) -> usize {
        self.terms
            .iter()
            .filter(|term| text.contains(term.as_str()))
            .count()
    }
}

/// A document that matched at least one term
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredResult {
    pub score: usize,
    pub document: Document,
}

impl ScoredResult {
    pub fn id(&self) -> &str {
        &self.document.id
    }

    pub fn metadata(&self) -> &Metadata {
        &self.document.metadata
    }
}

/// Top results plus the number of documents that matched at all
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Ranking {
    pub results: Vec<ScoredResult>,
    pub total_matches: usize,
}

impl Ranking {
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Ranker {
    limit: usize,
}

impl Default for Ranker {
    fn default() -> Self {
        Self {
            limit: DEFAULT_LIMIT,
        }
    }
}

impl Ranker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Rank a document sequence against `query`.
    ///
    /// Documents without text are skipped. Equal scores keep their
    /// iteration order (the sort is stable).
    pub fn rank<I>(&self, query: &Query, documents: I) -> Result<Ranking>
    where
        I: IntoIterator<Item = Result<Document>>,
    {
        let mut results = Vec::new();

        for doc in documents {
            let doc = doc?;
            let Some(text) = doc.searchable_text() else {
                continue;
            };
            let score = query.score(&text.to_lowercase());
            if score > 0 {
                results.push(ScoredResult {
                    score,
                    document: doc,
                });
            }
        }

        results.sort_by(|a, b| b.score.cmp(&a.score));

        let total_matches = results.len();
        results.truncate(self.limit);

        tracing::debug!(
            terms = query.terms().len(),
            total_matches,
            shown = results.len(),
            "ranked archive"
        );

        Ok(Ranking {
            results,
            total_matches,
        })
    }

    /// Scan an opened archive once
    pub fn rank_archive(&self, query: &Query, archive: &mut dyn Archive) -> Result<Ranking> {
        self.rank(query, archive.documents())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::archive::MemoryArchive;

    fn ok(docs: Vec<Document>) -> impl Iterator<Item = Result<Document>> {
        docs.into_iter().map(Ok)
    }

    #[test]
    fn test_query_parse_keeps_duplicates() {
        let q = Query::parse("  The the\tCAT ");
        assert_eq!(q.terms(), ["the", "the", "cat"]);
        assert!(Query::parse("   ").is_empty());
    }

    #[test]
    fn test_score_counts_multiplicity() -> Result<()> {
        let ranking = Ranker::new().rank(
            &Query::parse("the the cat"),
            ok(vec![Document::new("a", "the cat sat")]),
        )?;
        assert_eq!(ranking.results[0].score, 3);
        Ok(())
    }

    #[test]
    fn test_substring_and_case_insensitive() -> Result<()> {
        let ranking = Ranker::new().rank(
            &Query::parse("RUST"),
            ok(vec![Document::new("a", "Trusted Rustaceans")]),
        )?;
        assert_eq!(ranking.total_matches, 1);
        assert_eq!(ranking.results[0].score, 1);
        Ok(())
    }

    #[test]
    fn test_scenario_order_and_total() -> Result<()> {
        let mut archive = MemoryArchive::new(vec![
            Document::new("a", "rust is fast"),
            Document::new("b", "go is simple").with_metadata("source", "b.txt"),
        ]);
        let ranking = Ranker::new().rank_archive(&Query::parse("is fast"), &mut archive)?;

        assert_eq!(ranking.total_matches, 2);
        assert_eq!(ranking.results[0].id(), "a");
        assert_eq!(ranking.results[0].score, 2);
        assert_eq!(ranking.results[1].id(), "b");
        assert_eq!(ranking.results[1].score, 1);
        assert_eq!(ranking.results[1].document.label(), "b.txt");
        Ok(())
    }

    #[test]
    fn test_empty_text_never_ranked() -> Result<()> {
        let ranking = Ranker::new().rank(
            &Query::parse("anything"),
            ok(vec![Document::empty("a"), Document::new("b", "")]),
        )?;
        assert!(ranking.is_empty());
        assert_eq!(ranking.total_matches, 0);
        Ok(())
    }

    #[test]
    fn test_empty_query_matches_nothing() -> Result<()> {
        let ranking = Ranker::new().rank(
            &Query::parse(""),
            ok(vec![Document::new("a", "some text")]),
        )?;
        assert!(ranking.is_empty());
        Ok(())
    }

    #[test]
    fn test_empty_archive() -> Result<()> {
        let mut archive = MemoryArchive::default();
        let ranking = Ranker::new().rank_archive(&Query::parse("x"), &mut archive)?;
        assert_eq!(ranking, Ranking::default());
        Ok(())
    }

    #[test]
    fn test_limit_and_total_matches() -> Result<()> {
        let docs = (0..12)
            .map(|i| Document::new(format!("d{i}"), "needle"))
            .collect();
        let ranking = Ranker::new().rank(&Query::parse("needle"), ok(docs))?;
        assert_eq!(ranking.results.len(), DEFAULT_LIMIT);
        assert_eq!(ranking.total_matches, 12);

        let docs = (0..12)
            .map(|i| Document::new(format!("d{i}"), "needle"))
            .collect();
        let ranking = Ranker::new()
            .with_limit(2)
            .rank(&Query::parse("needle"), ok(docs))?;
        assert_eq!(ranking.results.len(), 2);
        Ok(())
    }

    #[test]
    fn test_zero_limit_still_counts_matches() -> Result<()> {
        let ranking = Ranker::new()
            .with_limit(0)
            .rank(&Query::parse("x"), ok(vec![Document::new("a", "x")]))?;
        assert!(ranking.results.is_empty());
        assert_eq!(ranking.total_matches, 1);
        Ok(())
    }

    #[test]
    fn test_ties_keep_iteration_order() -> Result<()> {
        let docs = vec![
            Document::new("first", "alpha"),
            Document::new("best", "alpha beta"),
            Document::new("second", "alpha"),
            Document::new("third", "alpha"),
        ];
        let ranking = Ranker::new().rank(&Query::parse("alpha beta"), ok(docs.clone()))?;
        let ids: Vec<&str> = ranking.results.iter().map(|r| r.id()).collect();
        assert_eq!(ids, ["best", "first", "second", "third"]);

        let again = Ranker::new().rank(&Query::parse("alpha beta"), ok(docs))?;
        assert_eq!(ranking, again);
        Ok(())
    }

    #[test]
    fn test_document_error_aborts_scan() {
        let docs = vec![
            Ok(Document::new("a", "x")),
            Err(anyhow::anyhow!("bad record")),
        ];
        assert!(Ranker::new().rank(&Query::parse("x"), docs).is_err());
    }
}
