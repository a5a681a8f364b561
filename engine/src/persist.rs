//! On-disk store layout and table I/O.
//!
//! The builder is the sole writer, the query engine a read-only consumer.
//! The store is rebuilt wholesale, never patched. Layout under the root:
//!
//! ```text
//! vocabulary.txt       term, document frequency, idf
//! postings.txt         term, document, weight (runs sorted by term)
//! postings_index.txt   term, first postings line (1-based), run length
//! tok/<doc>.tok        term, raw frequency, normalized frequency
//! wtd/<doc>.wtd        term, weight
//! ```

use crate::error::{BuildError, QueryError};
use crate::index::{DirectoryEntry, Posting, TermFrequencies, Vocabulary};
use crate::record;
use std::collections::{BTreeMap, HashMap};
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

pub struct StorePaths {
    pub root: PathBuf,
}

impl StorePaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    pub fn vocabulary(&self) -> PathBuf {
        self.root.join("vocabulary.txt")
    }
    pub fn postings(&self) -> PathBuf {
        self.root.join("postings.txt")
    }
    pub fn directory(&self) -> PathBuf {
        self.root.join("postings_index.txt")
    }
    pub fn tok_dir(&self) -> PathBuf {
        self.root.join("tok")
    }
    pub fn wtd_dir(&self) -> PathBuf {
        self.root.join("wtd")
    }
    pub fn tok(&self, doc: &str) -> PathBuf {
        self.tok_dir().join(format!("{doc}.tok"))
    }
    pub fn wtd(&self, doc: &str) -> PathBuf {
        self.wtd_dir().join(format!("{doc}.wtd"))
    }
}

fn create(path: &Path) -> Result<BufWriter<File>, BuildError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| BuildError::access(path, source))
}

fn open(path: &Path) -> Result<BufReader<File>, QueryError> {
    File::open(path)
        .map(BufReader::new)
        .map_err(|source| QueryError::access(path, source))
}

pub fn write_vocabulary(
    paths: &StorePaths,
    vocabulary: &Vocabulary,
    total_docs: u32,
) -> Result<(), BuildError> {
    let path = paths.vocabulary();
    let mut out = create(&path)?;
    for (term, df) in vocabulary.iter() {
        let idf = crate::index::idf(total_docs, df);
        let line = record::VOCABULARY.encode(&[term, &df.to_string(), &idf.to_string()]);
        writeln!(out, "{line}").map_err(|source| BuildError::access(&path, source))?;
    }
    out.flush().map_err(|source| BuildError::access(&path, source))
}

/// Raw term frequencies for one document, plus each frequency normalized by
/// the document's maximum. A document with no admissible terms produces an
/// empty table.
pub fn write_raw_frequencies(
    paths: &StorePaths,
    doc: &str,
    frequencies: &TermFrequencies,
) -> Result<(), BuildError> {
    let path = paths.tok(doc);
    let mut out = create(&path)?;
    let max = frequencies.values().copied().max().unwrap_or(1) as f64;
    for (term, &freq) in frequencies {
        let normalized = freq as f64 / max;
        let line =
            record::RAW_FREQUENCIES.encode(&[term, &freq.to_string(), &normalized.to_string()]);
        writeln!(out, "{line}").map_err(|source| BuildError::access(&path, source))?;
    }
    out.flush().map_err(|source| BuildError::access(&path, source))
}

pub fn write_weights(
    paths: &StorePaths,
    doc: &str,
    weights: &BTreeMap<String, f64>,
) -> Result<(), BuildError> {
    let path = paths.wtd(doc);
    let mut out = create(&path)?;
    for (term, weight) in weights {
        let line = record::WEIGHTS.encode(&[term, &weight.to_string()]);
        writeln!(out, "{line}").map_err(|source| BuildError::access(&path, source))?;
    }
    out.flush().map_err(|source| BuildError::access(&path, source))
}

/// Write the postings table and its directory together, so the directory's
/// start offsets and counts partition the table exactly.
pub fn write_postings(
    paths: &StorePaths,
    postings: &BTreeMap<String, Vec<Posting>>,
) -> Result<(), BuildError> {
    let postings_path = paths.postings();
    let directory_path = paths.directory();
    let mut postings_out = create(&postings_path)?;
    let mut directory_out = create(&directory_path)?;
    let mut line_no: u64 = 1;
    for (term, run) in postings {
        for posting in run {
            let line = record::POSTINGS.encode(&[term, &posting.doc, &posting.weight.to_string()]);
            writeln!(postings_out, "{line}")
                .map_err(|source| BuildError::access(&postings_path, source))?;
        }
        let line = record::DIRECTORY.encode(&[
            term,
            &line_no.to_string(),
            &run.len().to_string(),
        ]);
        writeln!(directory_out, "{line}")
            .map_err(|source| BuildError::access(&directory_path, source))?;
        line_no += run.len() as u64;
    }
    postings_out
        .flush()
        .map_err(|source| BuildError::access(&postings_path, source))?;
    directory_out
        .flush()
        .map_err(|source| BuildError::access(&directory_path, source))
}

/// Term to idf, from the vocabulary table.
pub fn load_idf(paths: &StorePaths) -> Result<BTreeMap<String, f64>, QueryError> {
    let path = paths.vocabulary();
    let reader = open(&path)?;
    let mut idf = BTreeMap::new();
    for (index, line) in reader.lines().enumerate() {
        let line_no = index as u64 + 1;
        let line = line.map_err(|source| QueryError::access(&path, source))?;
        let fields = decode(record::VOCABULARY, &line, line_no)?;
        let value = parse_f64(record::VOCABULARY.table, line_no, fields[2])?;
        idf.insert(fields[0].to_string(), value);
    }
    Ok(idf)
}

/// Term to posting-run location, from the postings directory.
pub fn load_directory(
    paths: &StorePaths,
) -> Result<BTreeMap<String, DirectoryEntry>, QueryError> {
    let path = paths.directory();
    let reader = open(&path)?;
    let mut directory = BTreeMap::new();
    for (index, line) in reader.lines().enumerate() {
        let line_no = index as u64 + 1;
        let line = line.map_err(|source| QueryError::access(&path, source))?;
        let fields = decode(record::DIRECTORY, &line, line_no)?;
        let start = parse_u64(record::DIRECTORY.table, line_no, fields[1])?;
        let count = parse_u64(record::DIRECTORY.table, line_no, fields[2])?;
        directory.insert(fields[0].to_string(), DirectoryEntry { start, count });
    }
    Ok(directory)
}

/// Read only the posting runs named by `blocks` in one pass over the
/// postings table, seeking by the directory's line offsets instead of
/// decoding the whole table. `blocks` must be sorted by start line.
pub fn read_posting_blocks(
    paths: &StorePaths,
    blocks: &[DirectoryEntry],
) -> Result<Vec<(String, Posting)>, QueryError> {
    debug_assert!(blocks.windows(2).all(|w| w[0].start <= w[1].start));
    let path = paths.postings();
    let reader = open(&path)?;
    let mut rows = Vec::new();
    let mut blocks = blocks.iter().peekable();
    for (index, line) in reader.lines().enumerate() {
        let line_no = index as u64 + 1;
        while let Some(block) = blocks.peek() {
            if line_no >= block.start + block.count {
                blocks.next();
            } else {
                break;
            }
        }
        let Some(block) = blocks.peek() else { break };
        let line = line.map_err(|source| QueryError::access(&path, source))?;
        if line_no < block.start {
            continue;
        }
        let fields = decode(record::POSTINGS, &line, line_no)?;
        let weight = parse_f64(record::POSTINGS.table, line_no, fields[2])?;
        rows.push((
            fields[0].to_string(),
            Posting { doc: fields[1].to_string(), weight },
        ));
    }
    Ok(rows)
}

/// Squared vector norm of one document, from its weight table.
pub fn document_norm_sq(paths: &StorePaths, doc: &str) -> Result<f64, QueryError> {
    let path = paths.wtd(doc);
    let reader = open(&path)?;
    let mut norm_sq = 0.0;
    for (index, line) in reader.lines().enumerate() {
        let line_no = index as u64 + 1;
        let line = line.map_err(|source| QueryError::access(&path, source))?;
        let fields = decode(record::WEIGHTS, &line, line_no)?;
        let weight = parse_f64(record::WEIGHTS.table, line_no, fields[1])?;
        norm_sq += weight * weight;
    }
    Ok(norm_sq)
}

/// Document id to url, from a `id url` space-separated file. The id's
/// source-file suffix is stripped and the id clipped to the document column
/// width so it matches the ids used in postings.
pub fn load_urls(path: &Path) -> Result<HashMap<String, String>, QueryError> {
    let reader = open(path)?;
    let mut urls = HashMap::new();
    for line in reader.lines() {
        let line = line.map_err(|source| QueryError::access(path, source))?;
        let mut parts = line.split_whitespace();
        let (Some(id), Some(url)) = (parts.next(), parts.next()) else {
            if !line.trim().is_empty() {
                tracing::warn!(line = %line.trim(), "skipping malformed url mapping");
            }
            continue;
        };
        let id = record::clip_doc_id(id.strip_suffix(".html").unwrap_or(id));
        urls.insert(id.to_string(), url.to_string());
    }
    Ok(urls)
}

fn decode<'a>(
    schema: record::Schema,
    line: &'a str,
    line_no: u64,
) -> Result<Vec<&'a str>, QueryError> {
    schema
        .decode(line)
        .map_err(|reason| QueryError::Format { table: schema.table, line: line_no, reason })
}

fn parse_f64(table: &'static str, line: u64, value: &str) -> Result<f64, QueryError> {
    value.parse().map_err(|_| QueryError::Format {
        table,
        line,
        reason: format!("invalid number `{value}`"),
    })
}

fn parse_u64(table: &'static str, line: u64, value: &str) -> Result<u64, QueryError> {
    value.parse().map_err(|_| QueryError::Format {
        table,
        line,
        reason: format!("invalid count `{value}`"),
    })
}
