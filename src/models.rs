//! Core data models used throughout corpuscope.
//!
//! A [`Document`] is an immutable record of a textual item; its
//! [`DocumentKind`] discriminant carries the variant-specific payload
//! (comment count for social posts, co-author list for preprints). The
//! discriminant is fixed at construction time — only the payload counters
//! are mutable, through the explicit setters below.

use serde::Serialize;
use std::fmt;

/// Identifier assigned by a [`Corpus`](crate::corpus::Corpus) at insertion.
///
/// Identifiers are sequential from zero, never reused, never renumbered.
pub type DocId = usize;

/// Variant tag plus variant-specific payload for a [`Document`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum DocumentKind {
    /// Plain web text with no extra fields.
    Generic,
    /// Social-media post carrying a comment count.
    ///
    /// The count is stored as given; the factory boundary is deliberately
    /// permissive and negative values pass through unchecked.
    Reddit { comment_count: i64 },
    /// Academic preprint carrying an ordered co-author list.
    ///
    /// Duplicate names are permitted.
    Arxiv { co_authors: Vec<String> },
}

impl DocumentKind {
    /// Stable lowercase label, matching the `type` column of the persisted
    /// corpus format.
    pub fn label(&self) -> &'static str {
        match self {
            DocumentKind::Generic => "generic",
            DocumentKind::Reddit { .. } => "reddit",
            DocumentKind::Arxiv { .. } => "arxiv",
        }
    }
}

/// A single textual item in a corpus.
#[derive(Debug, Clone, Serialize)]
pub struct Document {
    pub title: String,
    /// Author identity, used as the join key into the author index.
    pub author: String,
    /// Publication date, kept as an opaque orderable token (e.g. `"2023"`),
    /// never parsed as a calendar date.
    pub date: String,
    pub url: String,
    /// Full text body. May be empty, never absent.
    pub body: String,
    kind: DocumentKind,
}

impl Document {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        date: impl Into<String>,
        url: impl Into<String>,
        body: impl Into<String>,
        kind: DocumentKind,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            date: date.into(),
            url: url.into(),
            body: body.into(),
            kind,
        }
    }

    pub fn kind(&self) -> &DocumentKind {
        &self.kind
    }

    /// Update the comment count. No-op on non-Reddit documents.
    pub fn set_comment_count(&mut self, count: i64) {
        if let DocumentKind::Reddit { comment_count } = &mut self.kind {
            *comment_count = count;
        }
    }

    /// Append a co-author. No-op on non-Arxiv documents.
    pub fn add_co_author(&mut self, name: impl Into<String>) {
        if let DocumentKind::Arxiv { co_authors } = &mut self.kind {
            co_authors.push(name.into());
        }
    }

    /// Body excerpt truncated to `max_chars` characters, with an ellipsis
    /// marker when truncation happened.
    pub fn excerpt(&self, max_chars: usize) -> String {
        if self.body.chars().count() > max_chars {
            let mut out: String = self.body.chars().take(max_chars).collect();
            out.push_str("...");
            out
        } else {
            self.body.clone()
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DocumentKind::Generic => write!(f, "{} ({})", self.title, self.date),
            DocumentKind::Reddit { comment_count } => write!(
                f,
                "[Reddit] {} ({}) - {} comments",
                self.title, self.date, comment_count
            ),
            DocumentKind::Arxiv { co_authors } => {
                if co_authors.is_empty() {
                    write!(f, "[Arxiv] {} ({}) - {}", self.title, self.date, self.author)
                } else {
                    write!(
                        f,
                        "[Arxiv] {} ({}) - {}, {}",
                        self.title,
                        self.date,
                        self.author,
                        co_authors.join(", ")
                    )
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_labels() {
        assert_eq!(DocumentKind::Generic.label(), "generic");
        assert_eq!(DocumentKind::Reddit { comment_count: 3 }.label(), "reddit");
        assert_eq!(DocumentKind::Arxiv { co_authors: vec![] }.label(), "arxiv");
    }

    #[test]
    fn comment_count_setter_only_touches_reddit() {
        let mut reddit = Document::new(
            "t",
            "a",
            "2023",
            "u",
            "b",
            DocumentKind::Reddit { comment_count: 0 },
        );
        reddit.set_comment_count(42);
        assert_eq!(reddit.kind(), &DocumentKind::Reddit { comment_count: 42 });

        let mut generic = Document::new("t", "a", "2023", "u", "b", DocumentKind::Generic);
        generic.set_comment_count(42);
        assert_eq!(generic.kind(), &DocumentKind::Generic);
    }

    #[test]
    fn co_author_append_keeps_order_and_duplicates() {
        let mut doc = Document::new(
            "t",
            "Dr. Smith",
            "2024",
            "u",
            "b",
            DocumentKind::Arxiv {
                co_authors: vec!["Dr. Johnson".to_string()],
            },
        );
        doc.add_co_author("Dr. Lee");
        doc.add_co_author("Dr. Lee");
        assert_eq!(
            doc.kind(),
            &DocumentKind::Arxiv {
                co_authors: vec![
                    "Dr. Johnson".to_string(),
                    "Dr. Lee".to_string(),
                    "Dr. Lee".to_string()
                ],
            }
        );
    }

    #[test]
    fn excerpt_truncates_with_marker() {
        let doc = Document::new("t", "a", "2023", "u", "abcdef", DocumentKind::Generic);
        assert_eq!(doc.excerpt(4), "abcd...");
        assert_eq!(doc.excerpt(6), "abcdef");
        assert_eq!(doc.excerpt(10), "abcdef");
    }

    #[test]
    fn display_headlines() {
        let reddit = Document::new(
            "Climate change is real",
            "RedditUser123",
            "2023",
            "u",
            "b",
            DocumentKind::Reddit { comment_count: 42 },
        );
        assert_eq!(
            reddit.to_string(),
            "[Reddit] Climate change is real (2023) - 42 comments"
        );

        let arxiv = Document::new(
            "Deep Learning for Climate Models",
            "Dr. Smith",
            "2024",
            "u",
            "b",
            DocumentKind::Arxiv {
                co_authors: vec!["Dr. Johnson".to_string(), "Dr. Lee".to_string()],
            },
        );
        assert_eq!(
            arxiv.to_string(),
            "[Arxiv] Deep Learning for Climate Models (2024) - Dr. Smith, Dr. Johnson, Dr. Lee"
        );
    }
}
