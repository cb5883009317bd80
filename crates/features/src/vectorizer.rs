//! Term-count vectorization over a capped vocabulary.
//!
//! ## Algorithm
//! 1. Tokens are runs of two or more word characters (letters, digits, `_`)
//! 2. Stop words are dropped
//! 3. The vocabulary keeps the `max_features` terms with the highest corpus
//!    count; ties go to the alphabetically smaller term
//! 4. Kept terms are indexed alphabetically, and every document becomes a
//!    sparse count vector over that index
//!
//! No step involves randomness or hash iteration order, so the same corpus
//! always yields the same vocabulary and vectors.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use tracing::debug;

pub const DEFAULT_MAX_FEATURES: usize = 5000;

/// Terms in index order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vocabulary {
    terms: Vec<String>,
}

impl Vocabulary {
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    pub fn index_of(&self, term: &str) -> Option<usize> {
        self.terms.binary_search_by(|t| t.as_str().cmp(term)).ok()
    }
}

/// Sparse term counts, sorted by term index
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TermCounts {
    pub entries: Vec<(usize, u32)>,
}

impl TermCounts {
    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    /// Euclidean norm
    pub fn norm(&self) -> f64 {
        self.entries
            .iter()
            .map(|&(_, c)| (c as f64) * (c as f64))
            .sum::<f64>()
            .sqrt()
    }
}

/// Bag-of-words vectorizer with an English stop-word list
#[derive(Debug, Clone)]
pub struct CountVectorizer {
    max_features: usize,
    stop_words: HashSet<String>,
}

impl Default for CountVectorizer {
    fn default() -> Self {
        Self::new()
    }
}

impl CountVectorizer {
    pub fn new() -> Self {
        Self {
            max_features: DEFAULT_MAX_FEATURES,
            stop_words: stop_words::get(stop_words::LANGUAGE::English).into_iter().collect(),
        }
    }

    pub fn with_max_features(mut self, max_features: usize) -> Self {
        self.max_features = max_features;
        self
    }

    pub fn with_stop_words<I: IntoIterator<Item = String>>(mut self, words: I) -> Self {
        self.stop_words = words.into_iter().collect();
        self
    }

    /// Word tokens of one document, stop words removed
    pub fn analyze<'a>(&self, doc: &'a str) -> Vec<&'a str> {
        doc.split(|c: char| !(c.is_alphanumeric() || c == '_'))
            .filter(|token| token.chars().count() >= 2)
            .filter(|token| !self.stop_words.contains(*token))
            .collect()
    }

    /// Select the vocabulary for a corpus
    pub fn fit(&self, docs: &[String]) -> Vocabulary {
        let mut counts: HashMap<&str, u64> = HashMap::new();
        for doc in docs {
            for token in self.analyze(doc) {
                *counts.entry(token).or_default() += 1;
            }
        }

        let mut ranked: Vec<(&str, u64)> = counts.into_iter().collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        ranked.truncate(self.max_features);

        let mut terms: Vec<String> = ranked.into_iter().map(|(term, _)| term.to_string()).collect();
        terms.sort();

        debug!(terms = terms.len(), max_features = self.max_features, "Fitted vocabulary");
        Vocabulary { terms }
    }

    /// Count vectors for every document, in input order
    pub fn transform(&self, vocabulary: &Vocabulary, docs: &[String]) -> Vec<TermCounts> {
        docs.par_iter()
            .map(|doc| {
                let mut counts: BTreeMap<usize, u32> = BTreeMap::new();
                for token in self.analyze(doc) {
                    if let Some(index) = vocabulary.index_of(token) {
                        *counts.entry(index).or_default() += 1;
                    }
                }
                TermCounts {
                    entries: counts.into_iter().collect(),
                }
            })
            .collect()
    }

    pub fn fit_transform(&self, docs: &[String]) -> (Vocabulary, Vec<TermCounts>) {
        let vocabulary = self.fit(docs);
        let vectors = self.transform(&vocabulary, docs);
        (vocabulary, vectors)
    }
}
