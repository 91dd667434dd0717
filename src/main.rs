//! # corpuscope CLI (`corp`)
//!
//! The `corp` binary is the display layer over the corpuscope library. It
//! loads a corpus from a tab-separated file and prints search results,
//! concordance rows, vocabulary statistics, and ranked hits as tabular
//! text. It never mutates a corpus beyond loading it.
//!
//! ## Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `corp info <file>` | Corpus name plus document/author counts |
//! | `corp list <file>` | Every document with its id and type |
//! | `corp sort <file> --by date\|title` | First n documents by date or title |
//! | `corp author <file> <name>` | Per-author document count and average length |
//! | `corp search <file> <pattern>` | Case-insensitive regex occurrences |
//! | `corp concordance <file> <pattern>` | Left/match/right context rows |
//! | `corp stats <file>` | Top terms by frequency with document frequency |
//! | `corp rank <file> "<query>"` | TF-IDF cosine-ranked search |
//!
//! All commands accept a global `--config` flag pointing to a TOML file;
//! missing files fall back to built-in defaults.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use corpuscope::config::Config;
use corpuscope::{Corpus, DefaultFactory, SearchEngine, SortField};

#[derive(Parser)]
#[command(
    name = "corp",
    about = "corpuscope — concordance, lexical statistics, and TF-IDF ranked search over a document corpus",
    version
)]
struct Cli {
    /// Path to configuration file (TOML). Missing file means defaults.
    #[arg(long, global = true, default_value = "./corp.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the corpus summary line: name, document count, author count.
    Info {
        /// Corpus file in the tab-separated persisted format.
        file: PathBuf,
    },

    /// List every document in insertion order with its id and type.
    List { file: PathBuf },

    /// Show the first documents sorted by date or title.
    Sort {
        file: PathBuf,
        /// Sort key: `date` or `title`.
        #[arg(long, default_value = "date")]
        by: String,
        /// Number of rows to show.
        #[arg(short = 'n', long)]
        limit: Option<usize>,
    },

    /// Show document count and average document length for one author.
    Author { file: PathBuf, name: String },

    /// Find every occurrence of a case-insensitive regex pattern.
    Search { file: PathBuf, pattern: String },

    /// Show each pattern occurrence with its surrounding context.
    Concordance {
        file: PathBuf,
        pattern: String,
        /// Context width in characters on each side.
        #[arg(long)]
        context: Option<usize>,
    },

    /// Show the top terms by corpus frequency with document frequency.
    Stats {
        file: PathBuf,
        /// Number of terms to show.
        #[arg(short = 'n', long)]
        top: Option<usize>,
    },

    /// Rank documents against a free-text query by cosine similarity.
    Rank {
        file: PathBuf,
        query: String,
        /// Number of hits to show.
        #[arg(short = 'n', long)]
        top: Option<usize>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load(&cli.config)?;

    match cli.command {
        Commands::Info { file } => {
            let corpus = load_corpus(&config, &file)?;
            println!("{}", corpus);
        }
        Commands::List { file } => {
            let corpus = load_corpus(&config, &file)?;
            for row in corpus.list_by_type() {
                println!("id={} | type={} | {}", row.id, row.kind, row.headline);
            }
        }
        Commands::Sort { file, by, limit } => {
            let corpus = load_corpus(&config, &file)?;
            let field: SortField = by.parse()?;
            let limit = limit.unwrap_or(config.retrieval.sort_limit);
            for (id, doc) in corpus.sort_by(field, limit) {
                println!("id={} | {}", id, doc);
            }
        }
        Commands::Author { file, name } => {
            let corpus = load_corpus(&config, &file)?;
            match corpus.author_summary(&name) {
                Some(summary) => {
                    println!("Author: {} — {} document(s)", summary.name, summary.doc_count);
                    println!("Average document length: {:.1} chars", summary.average_length);
                }
                None => println!("Unknown author: {}", name),
            }
        }
        Commands::Search { file, pattern } => {
            let corpus = load_corpus(&config, &file)?;
            let hits = corpus.search(&pattern)?;
            if hits.is_empty() {
                println!("No matches.");
            }
            for (i, hit) in hits.iter().enumerate() {
                println!("{:>4}  {}", i + 1, hit);
            }
        }
        Commands::Concordance {
            file,
            pattern,
            context,
        } => {
            let corpus = load_corpus(&config, &file)?;
            let context = context.unwrap_or(config.retrieval.context);
            let rows = corpus.concordance(&pattern, context)?;
            if rows.is_empty() {
                println!("No matches.");
            }
            for row in rows {
                println!(
                    "{:>width$} | {} | {}",
                    row.left,
                    row.matched,
                    row.right,
                    width = context
                );
            }
        }
        Commands::Stats { file, top } => {
            let corpus = load_corpus(&config, &file)?;
            let stats = corpus.vocabulary_stats(top.unwrap_or(config.retrieval.top_n));
            println!("Distinct terms: {}", stats.distinct_terms);
            println!("{:<20} {:>8} {:>8}", "term", "tf", "df");
            for entry in stats.top {
                println!("{:<20} {:>8} {:>8}", entry.term, entry.tf, entry.df);
            }
        }
        Commands::Rank { file, query, top } => {
            let corpus = load_corpus(&config, &file)?;
            let mut engine = build_engine(&config);
            let hits = engine.search(&corpus, &query, top.unwrap_or(config.retrieval.top_n));
            if hits.iter().all(|h| h.score == 0.0) {
                println!("No relevant documents.");
            } else {
                for hit in hits {
                    println!(
                        "{:.4}  id={} [{}] {} — {} ({})",
                        hit.score, hit.id, hit.kind, hit.title, hit.author, hit.date
                    );
                    println!("        {}", hit.excerpt);
                }
            }
        }
    }

    Ok(())
}

fn load_corpus(config: &Config, file: &Path) -> Result<Corpus> {
    let mut corpus = Corpus::new(&config.corpus.name);
    corpus.load(file, &DefaultFactory)?;
    Ok(corpus)
}

fn build_engine(config: &Config) -> SearchEngine {
    let engine = if config.engine.stop_words.is_empty() {
        SearchEngine::new()
    } else {
        SearchEngine::with_stop_words(config.engine.stop_words.iter().cloned())
    };
    engine.with_preprocessor(Corpus::clean_text)
}
