//! Author aggregation: who wrote what, and derived per-author statistics.
//!
//! The [`AuthorIndex`] only indexes documents — ownership stays with the
//! corpus store. Each [`Author`] records the ids of its documents together
//! with their body lengths, which is all the derived statistics need.

use indexmap::IndexMap;
use serde::Serialize;

use crate::models::{DocId, Document};

/// One author identity and its production.
#[derive(Debug, Clone)]
pub struct Author {
    name: String,
    doc_count: usize,
    /// Document id → body length in characters.
    production: IndexMap<DocId, usize>,
}

impl Author {
    fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            doc_count: 0,
            production: IndexMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn doc_count(&self) -> usize {
        self.doc_count
    }

    /// Mean body length (in characters) of this author's documents, or
    /// zero when the author has no documents.
    pub fn average_document_length(&self) -> f64 {
        if self.doc_count == 0 {
            return 0.0;
        }
        let total: usize = self.production.values().sum();
        total as f64 / self.doc_count as f64
    }

    /// Unchecked insertion: the count is incremented on every call, so
    /// recording the same id twice double-counts.
    fn record(&mut self, id: DocId, body_chars: usize) {
        self.production.insert(id, body_chars);
        self.doc_count += 1;
    }
}

/// Flat projection of an [`Author`] for the display layer.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorSummary {
    pub name: String,
    pub doc_count: usize,
    pub average_length: f64,
}

impl Author {
    pub fn summary(&self) -> AuthorSummary {
        AuthorSummary {
            name: self.name.clone(),
            doc_count: self.doc_count,
            average_length: self.average_document_length(),
        }
    }
}

/// Maps author identity to [`Author`], creating records lazily on first
/// registration. Authors are never deleted — there is no document-removal
/// operation anywhere in the store.
#[derive(Debug, Clone, Default)]
pub struct AuthorIndex {
    authors: IndexMap<String, Author>,
}

impl AuthorIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a document under its author identity.
    pub fn register(&mut self, id: DocId, document: &Document) {
        self.authors
            .entry(document.author.clone())
            .or_insert_with(|| Author::new(&document.author))
            .record(id, document.body.chars().count());
    }

    pub fn len(&self) -> usize {
        self.authors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.authors.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Author> {
        self.authors.get(name)
    }

    /// Authors in first-registered order.
    pub fn iter(&self) -> impl Iterator<Item = &Author> {
        self.authors.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DocumentKind;

    fn doc(author: &str, body: &str) -> Document {
        Document::new("t", author, "2023", "u", body, DocumentKind::Generic)
    }

    #[test]
    fn lazy_creation_and_counts() {
        let mut index = AuthorIndex::new();
        assert!(index.is_empty());

        index.register(0, &doc("alice", "abcd"));
        index.register(1, &doc("bob", "xy"));
        index.register(2, &doc("alice", "ab"));

        assert_eq!(index.len(), 2);
        assert_eq!(index.get("alice").map(Author::doc_count), Some(2));
        assert_eq!(index.get("bob").map(Author::doc_count), Some(1));
    }

    #[test]
    fn average_length_is_mean_of_body_chars() {
        let mut index = AuthorIndex::new();
        index.register(0, &doc("alice", "abcd"));
        index.register(1, &doc("alice", "ab"));
        let alice = index.get("alice").unwrap();
        assert!((alice.average_document_length() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_author_average_is_zero_not_an_error() {
        let author = Author::new("nobody");
        assert_eq!(author.average_document_length(), 0.0);
    }

    #[test]
    fn double_registration_double_counts() {
        let mut index = AuthorIndex::new();
        let d = doc("alice", "abcd");
        index.register(0, &d);
        index.register(0, &d);
        let alice = index.get("alice").unwrap();
        assert_eq!(alice.doc_count(), 2);
        // The production map deduplicates the id, so the average drops.
        assert!((alice.average_document_length() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn unknown_author_lookup_is_none() {
        let index = AuthorIndex::new();
        assert!(index.get("ghost").is_none());
    }
}
