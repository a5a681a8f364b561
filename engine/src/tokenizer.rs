use lazy_static::lazy_static;
use regex::Regex;
use std::collections::HashSet;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Longest admissible term, in characters. Matches the term column width of
/// the store tables, so no stored term is ever truncated.
pub const MAX_TERM_CHARS: usize = 30;

lazy_static! {
    static ref URLS: Regex = Regex::new(
        r"(?:http|ftp|https)://[\w-]+(?:\.[\w-]+)+(?:[\w.,@?^=%&:/~+#-]*[\w@?^=%&/~+#-])?"
    )
    .expect("valid regex");
    // Tokens mixing letters and digits are noise (hex ids, session tokens)
    // and are removed outright rather than split.
    static ref MIXED_ALNUM: Regex =
        Regex::new(r"[a-z]+\d+[\w@]*|\d+[a-z]+[\w@]*").expect("valid regex");
    static ref SYMBOLS: Regex = Regex::new(r"[^a-z0-9ñáéíóú\s]").expect("valid regex");
}

/// Numeric character references that survive text extraction, mapped to the
/// Spanish characters they stand for. The inverted exclamation mark is
/// dropped. Space-equivalent codes collapse to a single space.
const CHAR_REFERENCES: &[(&str, &str)] = &[
    ("&nbsp;", " "),
    ("&#160;", " "),
    ("&#32;", " "),
    ("&#x20", " "),
    ("&#225", "á"),
    ("&#193", "á"),
    ("&#233", "é"),
    ("&#201", "é"),
    ("&#237", "í"),
    ("&#205", "í"),
    ("&#243", "ó"),
    ("&#211", "ó"),
    ("&#250", "ú"),
    ("&#218", "ú"),
    ("&#241", "ñ"),
    ("&#209", "ñ"),
    ("&#161;", ""),
];

/// Terms excluded from indexing and querying regardless of frequency.
/// Loaded from a one-term-per-line file.
#[derive(Debug, Default, Clone)]
pub struct Stopwords(HashSet<String>);

impl Stopwords {
    pub fn load(path: &Path) -> io::Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        let mut set = HashSet::new();
        for line in reader.lines() {
            let term = line?.trim().to_string();
            if !term.is_empty() {
                set.insert(term);
            }
        }
        Ok(Self(set))
    }

    pub fn none() -> Self {
        Self::default()
    }

    pub fn contains(&self, term: &str) -> bool {
        self.0.contains(term)
    }
}

impl FromIterator<String> for Stopwords {
    fn from_iter<I: IntoIterator<Item = String>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Tokenize extracted document text into admissible terms, repeats preserved.
///
/// Applies the full pipeline: lowercasing, URL removal, character-reference
/// decoding, then the shared term filter of [`tokenize_query`]. Indexing and
/// querying must agree on the filter or vocabulary lookups silently miss.
pub fn tokenize(text: &str, stopwords: &Stopwords) -> Vec<String> {
    let text = text.to_lowercase();
    let mut text = URLS.replace_all(&text, "").into_owned();
    for (reference, replacement) in CHAR_REFERENCES {
        text = text.replace(reference, replacement);
    }
    let text = text.replace(['\n', '\r'], " ");
    tokenize_query(&text, stopwords)
}

/// Tokenize a query string as received: strip symbols, drop letter-digit
/// mixtures, split on whitespace, and keep admissible terms. The query path
/// skips the document normalizer entirely.
pub fn tokenize_query(text: &str, stopwords: &Stopwords) -> Vec<String> {
    let stripped = SYMBOLS.replace_all(text, " ");
    let stripped = MIXED_ALNUM.replace_all(&stripped, "");
    stripped
        .split_whitespace()
        .filter(|token| admissible(token, stopwords))
        .map(str::to_string)
        .collect()
}

fn admissible(token: &str, stopwords: &Stopwords) -> bool {
    !token.is_empty()
        && token.chars().count() <= MAX_TERM_CHARS
        && !stopwords.contains(token)
        && !is_short_non_numeric(token)
}

/// Tokens of one or two characters are dropped unless they parse entirely
/// as an integer ("7" and "42" survive, "a" and "ab" do not).
fn is_short_non_numeric(token: &str) -> bool {
    token.chars().count() <= 2 && token.parse::<u32>().is_err()
}
