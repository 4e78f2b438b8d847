//! Reverse lookup: case-insensitive substring search over descriptions.

use crate::index::types::DescriptionCorpus;
use memchr::memmem::Finder;
use serde::Serialize;

/// A corpus entry whose description contains the search term
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchResult {
    /// Position of the entry in the corpus
    pub position: usize,
    pub sku: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// Empty term: no search was run
    Skipped,
    Matches(Vec<MatchResult>),
}

impl SearchOutcome {
    pub fn is_skipped(&self) -> bool {
        matches!(self, SearchOutcome::Skipped)
    }

    pub fn matches(&self) -> &[MatchResult] {
        match self {
            SearchOutcome::Skipped => &[],
            SearchOutcome::Matches(matches) => matches,
        }
    }

    pub fn into_matches(self) -> Vec<MatchResult> {
        match self {
            SearchOutcome::Skipped => Vec::new(),
            SearchOutcome::Matches(matches) => matches,
        }
    }
}

/// Find every description containing `term`, ignoring case, in corpus order.
///
/// The term is matched literally. An empty term means "no search" and
/// returns [`SearchOutcome::Skipped`] rather than the whole corpus.
pub fn search_descriptions(corpus: &DescriptionCorpus, term: &str) -> SearchOutcome {
    if term.is_empty() {
        return SearchOutcome::Skipped;
    }

    let folded = term.to_lowercase();
    let finder = Finder::new(folded.as_bytes());

    let matches = corpus
        .iter_folded()
        .filter(|(_, _, description)| finder.find(description.as_bytes()).is_some())
        .map(|(position, entry, _)| MatchResult {
            position,
            sku: entry.sku.clone(),
            description: entry.description.clone(),
        })
        .collect();

    SearchOutcome::Matches(matches)
}
