//! # corpuscope
//!
//! An in-memory corpus toolkit for heterogeneous short documents
//! (social-media posts, academic preprints, generic web text). Three
//! retrieval modes are supported over a single document collection:
//!
//! 1. **Concordance** — exact/regex occurrence search with clipped
//!    context windows;
//! 2. **Lexical statistics** — corpus-wide term frequency and document
//!    frequency over a cleaned vocabulary;
//! 3. **Ranked search** — TF-IDF weighted sparse vectors scored by cosine
//!    similarity with deterministic top-k tie-breaking.
//!
//! Documents enter through a [`factory::DocumentFactory`], are registered
//! in a [`corpus::Corpus`] (which maintains the author index and a cached
//! full-text view), and the corpus is handed to an
//! [`engine::SearchEngine`] which builds its own frozen snapshot index.
//! Data flows one way: corpus → engine; the engine never mutates the
//! store.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`models`] | `Document` and its variant discriminant |
//! | [`factory`] | Type-tag to variant dispatch |
//! | [`author`] | Author aggregation and derived statistics |
//! | [`corpus`] | The document store: add, sort, save/load, search, concordance, stats |
//! | [`engine`] | TF-IDF sparse matrix and cosine-ranked queries |
//! | [`config`] | TOML configuration for the CLI |

pub mod author;
pub mod config;
pub mod corpus;
pub mod engine;
pub mod factory;
pub mod models;

pub use corpus::{Corpus, SortField};
pub use engine::SearchEngine;
pub use factory::{DefaultFactory, DocumentFactory};
pub use models::{DocId, Document, DocumentKind};
