//! Fixed-width record layout shared by every store table.
//!
//! One record per line. Fields are left-justified and space-padded to their
//! column width; each non-terminal field is followed by a single separator
//! space, the terminal field by the line break. Values longer than their
//! column are truncated. Widths are counted in characters, not bytes, since
//! terms may carry accented characters.
//!
//! Encoder and decoder both derive their offsets from the same [`Schema`],
//! so the writer's stride and the reader's substring ranges cannot drift.

#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub name: &'static str,
    pub width: usize,
}

#[derive(Debug, Clone, Copy)]
pub struct Schema {
    pub table: &'static str,
    pub fields: &'static [Field],
}

const TERM: Field = Field { name: "term", width: 30 };

/// Width of the document column in the postings table. Document ids are
/// clipped to this everywhere (postings, per-document table filenames, url
/// keys) so a long id never refers to different documents in different
/// tables.
pub const MAX_DOC_CHARS: usize = 31;

/// Clip a document id to the stored column width, whole characters only.
pub fn clip_doc_id(id: &str) -> &str {
    match id.char_indices().nth(MAX_DOC_CHARS) {
        Some((byte, _)) => &id[..byte],
        None => id,
    }
}

/// term, document frequency, idf.
pub const VOCABULARY: Schema = Schema {
    table: "vocabulary",
    fields: &[
        TERM,
        Field { name: "document_frequency", width: 12 },
        Field { name: "idf", width: 20 },
    ],
};

/// term, raw frequency, frequency normalized by the document's max.
pub const RAW_FREQUENCIES: Schema = Schema {
    table: "raw_frequencies",
    fields: &[
        TERM,
        Field { name: "raw_frequency", width: 12 },
        Field { name: "normalized_frequency", width: 20 },
    ],
};

/// term, tf-idf weight for one document.
pub const WEIGHTS: Schema = Schema {
    table: "weights",
    fields: &[TERM, Field { name: "weight", width: 20 }],
};

/// term, document id, weight.
pub const POSTINGS: Schema = Schema {
    table: "postings",
    fields: &[
        TERM,
        Field { name: "document", width: MAX_DOC_CHARS },
        Field { name: "weight", width: 20 },
    ],
};

/// term, 1-based first line in the postings table, run length.
pub const DIRECTORY: Schema = Schema {
    table: "postings_directory",
    fields: &[
        TERM,
        Field { name: "start_line", width: 12 },
        Field { name: "count", width: 12 },
    ],
};

impl Schema {
    /// Encode one record as a line, without the trailing newline.
    pub fn encode(&self, values: &[&str]) -> String {
        debug_assert_eq!(values.len(), self.fields.len());
        let mut line = String::new();
        for (i, (field, value)) in self.fields.iter().zip(values).enumerate() {
            if i > 0 {
                line.push(' ');
            }
            push_padded(&mut line, value, field.width);
        }
        line
    }

    /// Split a line back into trimmed field values.
    ///
    /// The terminal field may be shorter than its nominal width (a value that
    /// exactly filled the column loses nothing; padding is all that can be
    /// missing). Any earlier field cut short is a malformed record.
    pub fn decode<'a>(&self, line: &'a str) -> Result<Vec<&'a str>, String> {
        let mut values = Vec::with_capacity(self.fields.len());
        let mut offset = 0;
        for field in self.fields {
            let slice = char_range(line, offset, field.width)
                .ok_or_else(|| format!("line too short for field `{}`", field.name))?;
            values.push(slice.trim());
            offset += field.width + 1;
        }
        Ok(values)
    }
}

fn push_padded(line: &mut String, value: &str, width: usize) {
    let mut written = 0;
    for ch in value.chars() {
        if written == width {
            break;
        }
        line.push(ch);
        written += 1;
    }
    for _ in written..width {
        line.push(' ');
    }
}

/// Slice `width` characters starting at character `offset`, or to the end of
/// the string if it runs out first. `None` when the string ends before
/// `offset`.
fn char_range(s: &str, offset: usize, width: usize) -> Option<&str> {
    let begin = if offset == 0 {
        0
    } else {
        s.char_indices().nth(offset)?.0
    };
    let end = s[begin..]
        .char_indices()
        .nth(width)
        .map(|(b, _)| begin + b)
        .unwrap_or(s.len());
    Some(&s[begin..end])
}
