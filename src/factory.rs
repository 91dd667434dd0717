//! Factory boundary for constructing document variants from a type tag.
//!
//! [`Corpus::load`](crate::corpus::Corpus::load) reconstructs documents
//! through this trait, so any conforming implementation can be substituted
//! for the default one.

use crate::models::{Document, DocumentKind};

/// Constructs the correct [`Document`] variant from a raw type tag plus
/// caller-supplied fields.
///
/// No validation beyond variant selection is performed: a negative comment
/// count or a duplicate co-author is accepted as-is.
pub trait DocumentFactory {
    #[allow(clippy::too_many_arguments)]
    fn create(
        &self,
        type_tag: &str,
        title: &str,
        author: &str,
        date: &str,
        url: &str,
        body: &str,
        comment_count: i64,
        co_authors: Vec<String>,
    ) -> Document;
}

/// Default factory: case-insensitive match on `"reddit"` / `"arxiv"`,
/// anything else (including an empty tag) yields a generic document.
pub struct DefaultFactory;

impl DocumentFactory for DefaultFactory {
    fn create(
        &self,
        type_tag: &str,
        title: &str,
        author: &str,
        date: &str,
        url: &str,
        body: &str,
        comment_count: i64,
        co_authors: Vec<String>,
    ) -> Document {
        let kind = match type_tag.to_ascii_lowercase().as_str() {
            "reddit" => DocumentKind::Reddit { comment_count },
            "arxiv" => DocumentKind::Arxiv { co_authors },
            _ => DocumentKind::Generic,
        };
        Document::new(title, author, date, url, body, kind)
    }
}
