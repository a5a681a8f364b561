use anyhow::Result;
use clap::{Parser, Subcommand};
use engine::persist::StorePaths;
use engine::{IndexBuilder, Stopwords};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, EnvFilter};
use walkdir::WalkDir;

mod extract;

#[derive(Parser)]
#[command(name = "indexer")]
#[command(about = "Build the TF-IDF inverted index from a document collection", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild the index store from a corpus directory
    Build {
        /// Directory holding the collection (.html and .txt documents)
        #[arg(long)]
        corpus: String,
        /// Output store directory
        #[arg(long)]
        store: String,
        /// Stopword list, one term per line
        #[arg(long)]
        stopwords: String,
    },
}

fn main() -> Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Build { corpus, store, stopwords } => build(&corpus, &store, &stopwords),
    }
}

fn build(corpus: &str, store: &str, stopwords: &str) -> Result<()> {
    let stopwords = Stopwords::load(Path::new(stopwords))?;
    let mut builder = IndexBuilder::new(stopwords);

    let mut files: Vec<PathBuf> = WalkDir::new(corpus)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.into_path())
        .filter(|path| {
            path.is_file()
                && matches!(
                    path.extension().and_then(|ext| ext.to_str()),
                    Some("html" | "htm" | "txt")
                )
        })
        .collect();
    files.sort();

    for path in files {
        let Some(id) = path.file_stem().and_then(|stem| stem.to_str()).map(str::to_string)
        else {
            continue;
        };
        match read_document(&path) {
            Ok(text) => builder.add_document(id, &text),
            Err(err) => {
                tracing::warn!(path = %path.display(), %err, "skipping unreadable document");
            }
        }
    }

    let stats = builder.write_store(&StorePaths::new(store))?;
    tracing::info!(documents = stats.documents, terms = stats.terms, store, "index build complete");
    Ok(())
}

fn read_document(path: &Path) -> Result<String> {
    let raw = fs::read(path)?;
    let is_html = matches!(path.extension().and_then(|ext| ext.to_str()), Some("html" | "htm"));
    Ok(if is_html {
        extract::html_to_text(&raw)
    } else {
        extract::decode_bytes(&raw)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use engine::persist;
    use tempfile::TempDir;

    #[test]
    fn build_indexes_a_mixed_corpus() {
        let dir = TempDir::new().unwrap();
        let corpus = dir.path().join("corpus");
        fs::create_dir(&corpus).unwrap();
        fs::write(
            corpus.join("docA.html"),
            b"<html><body>campe\xf3n del torneo</body></html>",
        )
        .unwrap();
        fs::write(corpus.join("docB.txt"), "torneo de tenis").unwrap();
        let stopwords = dir.path().join("stopwords.txt");
        fs::write(&stopwords, "de\ndel\n").unwrap();
        let store = dir.path().join("store");

        build(
            corpus.to_str().unwrap(),
            store.to_str().unwrap(),
            stopwords.to_str().unwrap(),
        )
        .unwrap();

        let paths = StorePaths::new(&store);
        let idf = persist::load_idf(&paths).unwrap();
        let terms: Vec<&str> = idf.keys().map(String::as_str).collect();
        assert!(terms.contains(&"campeón"));
        assert!(terms.contains(&"torneo"));
        assert!(terms.contains(&"tenis"));
        assert!(!terms.contains(&"de"));
        assert!(!terms.contains(&"del"));
    }
}
