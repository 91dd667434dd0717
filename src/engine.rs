//! TF-IDF vector search over a corpus snapshot.
//!
//! [`SearchEngine::build`] snapshots the corpus documents in id order,
//! tokenizes them, drops stop words, and computes an L2-normalized sparse
//! TF-IDF vector per document. [`SearchEngine::search`] scores a query by
//! cosine similarity (a dot product of unit vectors) against every
//! document vector and returns the top-k hits with deterministic
//! tie-breaking.
//!
//! The engine never observes corpus insertions made after `build`; callers
//! needing freshness rebuild explicitly.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use regex::Regex;
use serde::Serialize;

use crate::corpus::Corpus;
use crate::models::DocId;

/// Tokens are maximal runs of lowercase letters and digits.
const TOKEN_PATTERN: &str = r"[a-z0-9]+";

/// Maximum characters in the body excerpt carried by each hit.
const EXCERPT_CHARS: usize = 200;

/// Default stop-word set, applied to documents and queries alike.
pub const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "an", "the", "is", "it", "in", "on", "of", "to", "and", "or", "for", "with", "this",
    "that", "be", "are", "was", "were", "been", "being", "have", "has", "had", "do", "does",
    "did", "will", "would", "could", "should", "may", "might", "can", "shall", "not", "no",
    "but", "if", "at", "by", "from", "as", "into", "about", "up", "out", "so", "its", "you",
    "your", "i", "my", "we", "our", "they", "them", "their", "he", "she", "his", "her",
];

/// Hook applied to each document body and to the query before tokenization.
pub type Preprocessor = Box<dyn Fn(&str) -> String>;

/// One ranked search result.
#[derive(Debug, Clone, Serialize)]
pub struct RankedHit {
    /// Cosine similarity in `[0.0, 1.0]`.
    pub score: f64,
    pub id: DocId,
    pub title: String,
    pub author: String,
    pub date: String,
    pub kind: String,
    pub url: String,
    /// Body excerpt, truncated with an ellipsis marker when needed.
    pub excerpt: String,
}

/// Sparse vector as parallel arrays of ascending column indices and values.
#[derive(Debug, Clone)]
struct SparseVec {
    indices: Vec<u32>,
    values: Vec<f64>,
}

impl SparseVec {
    fn from_weights(mut weights: Vec<(u32, f64)>) -> Self {
        weights.sort_by_key(|(idx, _)| *idx);
        Self {
            indices: weights.iter().map(|(idx, _)| *idx).collect(),
            values: weights.iter().map(|(_, v)| *v).collect(),
        }
    }

    /// Dot product by merging the two sorted index lists.
    fn dot(&self, other: &SparseVec) -> f64 {
        let mut sum = 0.0;
        let (mut i, mut j) = (0, 0);
        while i < self.indices.len() && j < other.indices.len() {
            match self.indices[i].cmp(&other.indices[j]) {
                Ordering::Equal => {
                    sum += self.values[i] * other.values[j];
                    i += 1;
                    j += 1;
                }
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
            }
        }
        sum
    }

    fn l2_normalize(&mut self) {
        let norm: f64 = self.values.iter().map(|v| v * v).sum::<f64>().sqrt();
        if norm > 0.0 {
            for v in &mut self.values {
                *v /= norm;
            }
        }
    }
}

/// Frozen index built from one corpus snapshot.
struct Index {
    /// term → column index. Fixed once built; query terms outside it
    /// contribute nothing.
    vocabulary: HashMap<String, u32>,
    /// Smoothed IDF weight per column.
    idf: Vec<f64>,
    /// One unit-length vector per document, row order matching `doc_ids`.
    doc_vectors: Vec<SparseVec>,
    /// Authoritative mapping from matrix row back to document id.
    doc_ids: Vec<DocId>,
}

/// A TF-IDF search engine over a [`Corpus`] snapshot.
pub struct SearchEngine {
    stop_words: HashSet<String>,
    preprocessor: Option<Preprocessor>,
    token_re: Regex,
    index: Option<Index>,
}

impl SearchEngine {
    /// Engine with the default English stop-word set and no preprocessor.
    pub fn new() -> Self {
        Self::with_stop_words(ENGLISH_STOP_WORDS.iter().map(|w| w.to_string()))
    }

    pub fn with_stop_words(stop_words: impl IntoIterator<Item = String>) -> Self {
        Self {
            stop_words: stop_words.into_iter().collect(),
            preprocessor: None,
            token_re: Regex::new(TOKEN_PATTERN).expect("static token pattern"),
            index: None,
        }
    }

    /// Install a preprocessing hook applied to every body and query before
    /// tokenization. [`Corpus::clean_text`] is the usual choice.
    pub fn with_preprocessor(mut self, hook: impl Fn(&str) -> String + 'static) -> Self {
        self.preprocessor = Some(Box::new(hook));
        self
    }

    pub fn is_built(&self) -> bool {
        self.index.is_some()
    }

    /// Number of documents in the current snapshot, if built.
    pub fn indexed_docs(&self) -> Option<usize> {
        self.index.as_ref().map(|idx| idx.doc_ids.len())
    }

    /// Snapshot the corpus and (re)build the index, discarding any
    /// previous one.
    pub fn build(&mut self, corpus: &Corpus) {
        let doc_ids: Vec<DocId> = corpus.iter().map(|(id, _)| id).collect();
        let tokenized: Vec<Vec<String>> = corpus
            .iter()
            .map(|(_, doc)| self.prepare(&doc.body))
            .collect();

        let mut vocabulary: HashMap<String, u32> = HashMap::new();
        let mut df: Vec<u64> = Vec::new();
        for tokens in &tokenized {
            let unique: HashSet<&str> = tokens.iter().map(String::as_str).collect();
            for term in unique {
                match vocabulary.get(term) {
                    Some(&idx) => df[idx as usize] += 1,
                    None => {
                        vocabulary.insert(term.to_string(), df.len() as u32);
                        df.push(1);
                    }
                }
            }
        }

        // Smoothed IDF: ln((1 + N) / (1 + df)) + 1. Rarer terms weigh more,
        // and no term ever gets a zero or negative weight.
        let n = doc_ids.len() as f64;
        let idf: Vec<f64> = df
            .iter()
            .map(|&d| ((1.0 + n) / (1.0 + d as f64)).ln() + 1.0)
            .collect();

        let doc_vectors: Vec<SparseVec> = tokenized
            .iter()
            .map(|tokens| {
                let mut v = Self::vectorize(tokens, &vocabulary, &idf);
                v.l2_normalize();
                v
            })
            .collect();

        self.index = Some(Index {
            vocabulary,
            idf,
            doc_vectors,
            doc_ids,
        });
    }

    /// Rank documents against `query` by cosine similarity, returning up
    /// to `top_n` hits ordered by score descending, then id ascending.
    ///
    /// Builds the index from `corpus` first if it has never been built.
    /// Query terms outside the frozen vocabulary contribute zero weight;
    /// if either vector is all-zero the similarity is zero.
    pub fn search(&mut self, corpus: &Corpus, query: &str, top_n: usize) -> Vec<RankedHit> {
        if self.index.is_none() {
            self.build(corpus);
        }
        let Some(index) = self.index.as_ref() else {
            return Vec::new();
        };

        let tokens = self.prepare(query);
        let mut query_vec = Self::vectorize(&tokens, &index.vocabulary, &index.idf);
        query_vec.l2_normalize();

        let mut scored: Vec<(f64, DocId)> = index
            .doc_ids
            .iter()
            .zip(&index.doc_vectors)
            .map(|(&id, doc_vec)| (query_vec.dot(doc_vec), id))
            .collect();
        scored.sort_by(|a, b| {
            b.0.partial_cmp(&a.0)
                .unwrap_or(Ordering::Equal)
                .then(a.1.cmp(&b.1))
        });
        scored.truncate(top_n);

        scored
            .into_iter()
            .filter_map(|(score, id)| {
                corpus.get(id).map(|doc| RankedHit {
                    score,
                    id,
                    title: doc.title.clone(),
                    author: doc.author.clone(),
                    date: doc.date.clone(),
                    kind: doc.kind().label().to_string(),
                    url: doc.url.clone(),
                    excerpt: doc.excerpt(EXCERPT_CHARS),
                })
            })
            .collect()
    }

    /// Preprocess, lowercase, tokenize, and drop stop words.
    fn prepare(&self, text: &str) -> Vec<String> {
        let text = match &self.preprocessor {
            Some(hook) => hook(text),
            None => text.to_string(),
        };
        let lowered = text.to_lowercase();
        self.token_re
            .find_iter(&lowered)
            .map(|m| m.as_str().to_string())
            .filter(|tok| !self.stop_words.contains(tok))
            .collect()
    }

    /// Raw-count TF times IDF for every token found in the vocabulary.
    fn vectorize(tokens: &[String], vocabulary: &HashMap<String, u32>, idf: &[f64]) -> SparseVec {
        let mut counts: HashMap<u32, f64> = HashMap::new();
        for token in tokens {
            if let Some(&idx) = vocabulary.get(token) {
                *counts.entry(idx).or_insert(0.0) += 1.0;
            }
        }
        let weights: Vec<(u32, f64)> = counts
            .into_iter()
            .map(|(idx, count)| (idx, count * idf[idx as usize]))
            .collect();
        SparseVec::from_weights(weights)
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Document, DocumentKind};

    fn corpus_of(bodies: &[&str]) -> Corpus {
        let mut corpus = Corpus::new("c");
        for (i, body) in bodies.iter().enumerate() {
            corpus.add_document(Document::new(
                format!("doc {}", i),
                format!("author {}", i),
                "2023",
                "u",
                *body,
                DocumentKind::Generic,
            ));
        }
        corpus
    }

    #[test]
    fn sparse_dot_merges_sorted_indices() {
        let a = SparseVec::from_weights(vec![(0, 1.0), (2, 2.0), (5, 3.0)]);
        let b = SparseVec::from_weights(vec![(2, 4.0), (5, 1.0), (7, 9.0)]);
        assert!((a.dot(&b) - 11.0).abs() < 1e-12);
    }

    #[test]
    fn l2_normalize_produces_unit_length() {
        let mut v = SparseVec::from_weights(vec![(0, 3.0), (1, 4.0)]);
        v.l2_normalize();
        let norm: f64 = v.values.iter().map(|x| x * x).sum::<f64>().sqrt();
        assert!((norm - 1.0).abs() < 1e-12);
    }

    #[test]
    fn document_as_query_is_its_own_best_match() {
        let bodies = [
            "climate change discussion climate serious issue",
            "deep learning neural networks climate patterns",
            "random environment weather daily life",
        ];
        let corpus = corpus_of(&bodies);
        let mut engine = SearchEngine::new();
        engine.build(&corpus);

        for (i, body) in bodies.iter().enumerate() {
            let hits = engine.search(&corpus, body, 3);
            assert_eq!(hits[0].id, i, "doc {} should rank itself first", i);
            assert!((hits[0].score - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn search_before_build_triggers_implicit_build() {
        let corpus = corpus_of(&["climate change", "neural networks"]);
        let mut engine = SearchEngine::new();
        assert!(!engine.is_built());
        let hits = engine.search(&corpus, "climate", 5);
        assert!(engine.is_built());
        assert_eq!(hits[0].id, 0);
        assert!(hits[0].score > hits[1].score);
    }

    #[test]
    fn snapshot_does_not_observe_later_insertions() {
        let mut corpus = corpus_of(&["climate change", "neural networks"]);
        let mut engine = SearchEngine::new();
        engine.build(&corpus);
        assert_eq!(engine.indexed_docs(), Some(2));

        corpus.add_document(Document::new(
            "late",
            "late author",
            "2025",
            "u",
            "climate climate climate",
            DocumentKind::Generic,
        ));
        let hits = engine.search(&corpus, "climate", 5);
        assert_eq!(hits.len(), 2, "new document invisible until rebuild");

        engine.build(&corpus);
        let hits = engine.search(&corpus, "climate", 5);
        assert_eq!(hits.len(), 3);
        assert_eq!(hits[0].id, 2);
    }

    #[test]
    fn unknown_query_terms_contribute_zero() {
        let corpus = corpus_of(&["climate change", "neural networks"]);
        let mut engine = SearchEngine::new();
        let hits = engine.search(&corpus, "zyzzyva quux", 5);
        assert_eq!(hits.len(), 2);
        for hit in &hits {
            assert_eq!(hit.score, 0.0);
        }
        // Zero scores fall back to ascending-id order.
        assert_eq!(hits[0].id, 0);
        assert_eq!(hits[1].id, 1);
    }

    #[test]
    fn stop_words_are_discarded_from_documents_and_queries() {
        let corpus = corpus_of(&["the the the climate", "neural networks"]);
        let mut engine = SearchEngine::new();
        let hits = engine.search(&corpus, "the", 5);
        for hit in &hits {
            assert_eq!(hit.score, 0.0, "stop word alone should match nothing");
        }
    }

    #[test]
    fn rarer_terms_weigh_more() {
        // "shared" appears everywhere, "rare" in one document only.
        let corpus = corpus_of(&["shared rare", "shared common", "shared common"]);
        let mut engine = SearchEngine::new();
        let hits = engine.search(&corpus, "rare", 3);
        assert_eq!(hits[0].id, 0);
        assert!(hits[0].score > hits[1].score);
    }

    #[test]
    fn top_n_truncates_and_ties_break_by_ascending_id() {
        let corpus = corpus_of(&["alpha beta", "alpha beta", "alpha beta", "gamma delta"]);
        let mut engine = SearchEngine::new();
        let hits = engine.search(&corpus, "alpha beta", 2);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].id, 0);
        assert_eq!(hits[1].id, 1);
    }

    #[test]
    fn preprocessor_hook_applies_to_query_and_documents() {
        let corpus = corpus_of(&["Climate, CHANGE!!", "neural networks"]);
        let mut engine = SearchEngine::new().with_preprocessor(Corpus::clean_text);
        let hits = engine.search(&corpus, "climate change", 2);
        assert_eq!(hits[0].id, 0);
        assert!((hits[0].score - 1.0).abs() < 1e-9);
    }

    #[test]
    fn empty_corpus_yields_no_hits() {
        let corpus = Corpus::new("empty");
        let mut engine = SearchEngine::new();
        assert!(engine.search(&corpus, "anything", 5).is_empty());
    }

    #[test]
    fn hit_rows_carry_display_projection() {
        let mut corpus = Corpus::new("c");
        let long_body = "climate ".repeat(50);
        corpus.add_document(Document::new(
            "Climate post",
            "alice",
            "2023",
            "https://example.com/1",
            long_body.trim_end(),
            DocumentKind::Reddit { comment_count: 3 },
        ));
        let mut engine = SearchEngine::new();
        let hits = engine.search(&corpus, "climate", 1);
        let hit = &hits[0];
        assert_eq!(hit.title, "Climate post");
        assert_eq!(hit.author, "alice");
        assert_eq!(hit.kind, "reddit");
        assert_eq!(hit.url, "https://example.com/1");
        assert!(hit.excerpt.ends_with("..."));
        assert_eq!(hit.excerpt.chars().count(), EXCERPT_CHARS + 3);
    }
}
