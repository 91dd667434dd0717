//! TOML configuration for the `corp` CLI.
//!
//! Every field has a default, and a missing file falls back to the
//! defaults entirely, so the binary works out of the box.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub corpus: CorpusConfig,
    #[serde(default)]
    pub retrieval: RetrievalConfig,
    #[serde(default)]
    pub engine: EngineConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct CorpusConfig {
    /// Display label for loaded corpora.
    #[serde(default = "default_name")]
    pub name: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RetrievalConfig {
    /// Default result count for `stats` and `rank`.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
    /// Default concordance context width, in characters.
    #[serde(default = "default_context")]
    pub context: usize,
    /// Default row count for `sort`.
    #[serde(default = "default_sort_limit")]
    pub sort_limit: usize,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct EngineConfig {
    /// Stop words for the ranked search engine. Empty means the built-in
    /// English list.
    #[serde(default)]
    pub stop_words: Vec<String>,
}

fn default_name() -> String {
    "Corpus".to_string()
}
fn default_top_n() -> usize {
    10
}
fn default_context() -> usize {
    30
}
fn default_sort_limit() -> usize {
    5
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            name: default_name(),
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            top_n: default_top_n(),
            context: default_context(),
            sort_limit: default_sort_limit(),
        }
    }
}

impl Config {
    /// Parse the config at `path`, or return defaults if it does not exist.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        toml::from_str(&raw).with_context(|| format!("parsing config at {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_for_missing_sections() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.corpus.name, "Corpus");
        assert_eq!(config.retrieval.top_n, 10);
        assert_eq!(config.retrieval.context, 30);
        assert!(config.engine.stop_words.is_empty());
    }

    #[test]
    fn partial_sections_keep_remaining_defaults() {
        let config: Config = toml::from_str(
            r#"
[corpus]
name = "articles"

[retrieval]
top_n = 3
"#,
        )
        .unwrap();
        assert_eq!(config.corpus.name, "articles");
        assert_eq!(config.retrieval.top_n, 3);
        assert_eq!(config.retrieval.context, 30);
    }

    #[test]
    fn missing_file_falls_back_to_defaults() {
        let config = Config::load(Path::new("/nonexistent/corp.toml")).unwrap();
        assert_eq!(config.retrieval.sort_limit, 5);
    }
}
