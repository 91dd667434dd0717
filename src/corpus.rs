//! The corpus store: document ownership, author aggregation, persistence,
//! occurrence search, concordance, and lexical frequency statistics.
//!
//! A [`Corpus`] is an ordinary value — callers needing a shared instance
//! pass a handle around explicitly. Documents enter through a single
//! mutation path, [`Corpus::add_document`], which assigns the next
//! sequential id, updates the author index, and invalidates the cached
//! full-text concatenation. Nothing ever removes a document.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use indexmap::IndexMap;
use regex::{Regex, RegexBuilder};
use serde::Serialize;

use crate::author::{AuthorIndex, AuthorSummary};
use crate::factory::DocumentFactory;
use crate::models::{DocId, Document, DocumentKind};

/// Header of the persisted tab-separated corpus format.
const TSV_HEADER: &str = "id\ttitre\tauteur\tdate\turl\ttexte\ttype\tnb_comments\tcoauthors";
const TSV_COLUMNS: usize = 9;

/// Sort key accepted by [`Corpus::sort_by`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Date,
    Title,
}

impl FromStr for SortField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "date" => Ok(SortField::Date),
            "title" => Ok(SortField::Title),
            other => bail!("unknown sort field: {}. Use date or title.", other),
        }
    }
}

/// One row of [`Corpus::list_by_type`] output.
#[derive(Debug, Clone, Serialize)]
pub struct TypeListing {
    pub id: DocId,
    pub kind: String,
    pub headline: String,
}

/// One concordance row: left context, matched text, right context.
#[derive(Debug, Clone, Serialize)]
pub struct ConcordanceRow {
    pub left: String,
    pub matched: String,
    pub right: String,
}

/// One vocabulary row: a term with its corpus-wide term frequency and its
/// document frequency.
#[derive(Debug, Clone, Serialize)]
pub struct VocabEntry {
    pub term: String,
    pub tf: u64,
    pub df: u64,
}

/// Result of [`Corpus::vocabulary_stats`].
#[derive(Debug, Clone, Serialize)]
pub struct VocabularyStats {
    /// Number of distinct terms across the whole corpus.
    pub distinct_terms: usize,
    /// The top-n terms by corpus term frequency, descending. Frequency ties
    /// keep first-encountered order, so output is deterministic.
    pub top: Vec<VocabEntry>,
}

/// An in-memory document collection with author aggregation and a lazily
/// cached concatenation of all bodies.
#[derive(Debug)]
pub struct Corpus {
    name: String,
    documents: IndexMap<DocId, Document>,
    authors: AuthorIndex,
    next_id: DocId,
    /// Memoized join of all bodies, rebuilt on first read after any
    /// insertion cleared it.
    full_text: RefCell<Option<String>>,
}

impl Corpus {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            documents: IndexMap::new(),
            authors: AuthorIndex::new(),
            next_id: 0,
            full_text: RefCell::new(None),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn doc_count(&self) -> usize {
        self.documents.len()
    }

    pub fn author_count(&self) -> usize {
        self.authors.len()
    }

    pub fn get(&self, id: DocId) -> Option<&Document> {
        self.documents.get(&id)
    }

    /// Documents in insertion (id) order.
    pub fn iter(&self) -> impl Iterator<Item = (DocId, &Document)> {
        self.documents.iter().map(|(id, doc)| (*id, doc))
    }

    pub fn author(&self, name: &str) -> Option<&crate::author::Author> {
        self.authors.get(name)
    }

    /// Per-author projections in first-registered order.
    pub fn author_summaries(&self) -> Vec<AuthorSummary> {
        self.authors.iter().map(|a| a.summary()).collect()
    }

    /// Projection for a single author, or `None` for an unknown identity.
    /// Unknown authors are a reported condition, not an error.
    pub fn author_summary(&self, name: &str) -> Option<AuthorSummary> {
        self.authors.get(name).map(|a| a.summary())
    }

    /// Insert a document, assigning the next sequential identifier.
    ///
    /// Updates the author index (creating the author lazily) and
    /// invalidates the cached concatenation. Accepts any well-formed
    /// document; there is no failure path.
    pub fn add_document(&mut self, document: Document) -> DocId {
        let id = self.next_id;
        self.authors.register(id, &document);
        self.documents.insert(id, document);
        self.next_id += 1;
        *self.full_text.borrow_mut() = None;
        id
    }

    /// First `limit` documents from a stable sort over the whole corpus.
    /// Equal keys keep insertion order.
    pub fn sort_by(&self, field: SortField, limit: usize) -> Vec<(DocId, &Document)> {
        let mut docs: Vec<(DocId, &Document)> = self.iter().collect();
        match field {
            SortField::Date => docs.sort_by(|a, b| a.1.date.cmp(&b.1.date)),
            SortField::Title => docs.sort_by(|a, b| a.1.title.cmp(&b.1.title)),
        }
        docs.truncate(limit);
        docs
    }

    /// Straight projection of every document in insertion order: id, type
    /// label, headline.
    pub fn list_by_type(&self) -> Vec<TypeListing> {
        self.iter()
            .map(|(id, doc)| TypeListing {
                id,
                kind: doc.kind().label().to_string(),
                headline: doc.to_string(),
            })
            .collect()
    }

    /// Serialize the corpus to the tab-separated persisted format.
    ///
    /// Fields are written raw: a literal `;` inside a co-author name, or a
    /// tab/newline inside a body, is not escaped. Known format limitation.
    pub fn save(&self, path: &Path) -> Result<()> {
        let mut out = String::from(TSV_HEADER);
        out.push('\n');
        for (id, doc) in self.iter() {
            let (nb_comments, coauthors) = match doc.kind() {
                DocumentKind::Reddit { comment_count } => (*comment_count, String::new()),
                DocumentKind::Arxiv { co_authors } => (0, co_authors.join(";")),
                DocumentKind::Generic => (0, String::new()),
            };
            out.push_str(&format!(
                "{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}\n",
                id,
                doc.title,
                doc.author,
                doc.date,
                doc.url,
                doc.body,
                doc.kind().label(),
                nb_comments,
                coauthors
            ));
        }
        fs::write(path, out).with_context(|| format!("writing corpus to {}", path.display()))
    }

    /// Load rows from the persisted format, reconstructing each document
    /// through `factory` and re-inserting it with [`Corpus::add_document`].
    ///
    /// Identifiers are reassigned sequentially; the saved `id` column is
    /// ignored. Rows missing a column fail the whole load; extra columns
    /// are ignored.
    pub fn load(&mut self, path: &Path, factory: &dyn DocumentFactory) -> Result<()> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading corpus from {}", path.display()))?;
        for (line_no, line) in raw.lines().enumerate().skip(1) {
            let line = line.trim_end_matches('\r');
            if line.is_empty() {
                continue;
            }
            let fields: Vec<&str> = line.split('\t').collect();
            if fields.len() < TSV_COLUMNS {
                bail!(
                    "line {}: expected {} columns, found {}",
                    line_no + 1,
                    TSV_COLUMNS,
                    fields.len()
                );
            }
            let comment_count = if fields[7].is_empty() {
                0
            } else {
                fields[7]
                    .parse::<i64>()
                    .with_context(|| format!("line {}: bad nb_comments value", line_no + 1))?
            };
            let co_authors: Vec<String> = fields[8]
                .split(';')
                .filter(|c| !c.is_empty())
                .map(str::to_string)
                .collect();
            let doc = factory.create(
                fields[6], fields[1], fields[2], fields[3], fields[4], fields[5],
                comment_count, co_authors,
            );
            self.add_document(doc);
        }
        Ok(())
    }

    /// Every occurrence of `pattern` (case-insensitive regex) across the
    /// joined corpus text, in left-to-right order.
    ///
    /// Bodies are joined with a single space, so a pattern can spuriously
    /// match across two unrelated documents. Accepted limitation of the
    /// concatenation strategy.
    pub fn search(&self, pattern: &str) -> Result<Vec<String>> {
        let re = self.compile(pattern)?;
        Ok(self.with_full_text(|text| {
            re.find_iter(text).map(|m| m.as_str().to_string()).collect()
        }))
    }

    /// Left-context/match/right-context triples for every occurrence of
    /// `pattern`. Context windows hold up to `context` characters and are
    /// clipped at the ends of the joined text, never padded.
    pub fn concordance(&self, pattern: &str, context: usize) -> Result<Vec<ConcordanceRow>> {
        let re = self.compile(pattern)?;
        Ok(self.with_full_text(|text| {
            re.find_iter(text)
                .map(|m| {
                    let mut left: Vec<char> =
                        text[..m.start()].chars().rev().take(context).collect();
                    left.reverse();
                    let right: String = text[m.end()..].chars().take(context).collect();
                    ConcordanceRow {
                        left: left.into_iter().collect(),
                        matched: m.as_str().to_string(),
                        right,
                    }
                })
                .collect()
        }))
    }

    /// Normalize text for lexical statistics: lowercase, strip everything
    /// outside the unaccented Latin alphabet (digits, punctuation, and
    /// accented letters all become spaces), collapse whitespace, trim.
    ///
    /// Pure and idempotent; also useful as the search engine's
    /// preprocessing hook.
    pub fn clean_text(text: &str) -> String {
        let lowered = text.to_lowercase();
        let stripped: String = lowered
            .chars()
            .map(|c| if c.is_ascii_alphabetic() { c } else { ' ' })
            .collect();
        stripped.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Corpus-wide term frequency and document frequency over the cleaned
    /// vocabulary, returning the `top_n` terms by term frequency.
    pub fn vocabulary_stats(&self, top_n: usize) -> VocabularyStats {
        // IndexMap keeps first-encountered order, which is the tie-break
        // rule for equal frequencies.
        let mut tf: IndexMap<String, u64> = IndexMap::new();
        let mut df: HashMap<String, u64> = HashMap::new();

        for (_, doc) in self.iter() {
            let cleaned = Self::clean_text(&doc.body);
            let mut seen: HashSet<&str> = HashSet::new();
            for word in cleaned.split_whitespace() {
                *tf.entry(word.to_string()).or_insert(0) += 1;
                if seen.insert(word) {
                    *df.entry(word.to_string()).or_insert(0) += 1;
                }
            }
        }

        let distinct_terms = tf.len();
        let mut top: Vec<VocabEntry> = tf
            .into_iter()
            .map(|(term, count)| {
                let doc_freq = df.get(&term).copied().unwrap_or(0);
                VocabEntry {
                    term,
                    tf: count,
                    df: doc_freq,
                }
            })
            .collect();
        // Stable sort: ties keep the insertion order collected above.
        top.sort_by(|a, b| b.tf.cmp(&a.tf));
        top.truncate(top_n);

        VocabularyStats {
            distinct_terms,
            top,
        }
    }

    fn compile(&self, pattern: &str) -> Result<Regex> {
        RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .with_context(|| format!("invalid search pattern: {}", pattern))
    }

    fn with_full_text<R>(&self, f: impl FnOnce(&str) -> R) -> R {
        let mut cache = self.full_text.borrow_mut();
        let text = cache.get_or_insert_with(|| {
            let bodies: Vec<&str> = self.documents.values().map(|d| d.body.as_str()).collect();
            bodies.join(" ")
        });
        f(text)
    }
}

impl fmt::Display for Corpus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Corpus '{}': {} documents, {} authors",
            self.name,
            self.doc_count(),
            self.author_count()
        )
    }
}
