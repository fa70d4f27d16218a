//! Classification of input lines into header and data lines.

use super::tokenize::{split_fields, FORMAT_COLUMN};

/// Prefix of the column header line that names the samples.
pub const COLUMN_HEADER_PREFIX: &str = "#CHROM";

/// One data line together with its 1-based line number.
///
/// `text` is not trimmed; a leading tab marks an empty `CHROM` column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawLine<'a> {
    pub lineno: usize,
    pub text: &'a str,
}

/// Result of classifying the input text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassifiedLines<'a> {
    /// Sample names from the `#CHROM` header line, empty if there is none.
    pub sample_names: Vec<String>,
    /// Whether a `#CHROM` header line was seen.
    pub has_column_header: bool,
    /// Data lines in input order.
    pub data_lines: Vec<RawLine<'a>>,
    /// Number of `##` meta lines.
    pub meta_lines: usize,
    /// Value of `##fileformat=`, if any.
    pub file_format: Option<String>,
}

/// Split `text` into header information and data lines.
///
/// Blank lines are dropped.  Lines starting with `#` (after trimming) are header
/// lines; the first `#CHROM` line provides the sample names.
pub fn classify(text: &str) -> ClassifiedLines<'_> {
    let mut result = ClassifiedLines::default();

    for (idx, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        if let Some(meta) = trimmed.strip_prefix("##") {
            result.meta_lines += 1;
            if let Some(file_format) = meta.strip_prefix("fileformat=") {
                result.file_format = Some(file_format.to_string());
            }
        } else if trimmed.starts_with(COLUMN_HEADER_PREFIX) {
            if result.has_column_header {
                tracing::warn!("ignoring repeated column header in line {}", idx + 1);
                continue;
            }
            result.has_column_header = true;
            result.sample_names = split_fields(trimmed)
                .into_iter()
                .skip(FORMAT_COLUMN + 1)
                .map(str::to_string)
                .collect();
        } else if trimmed.starts_with('#') {
            tracing::trace!("skipping comment in line {}", idx + 1);
        } else {
            result.data_lines.push(RawLine {
                lineno: idx + 1,
                text: line,
            });
        }
    }

    tracing::debug!(
        "classified input: {} meta lines, file format {:?}, {} samples, {} data lines",
        result.meta_lines,
        &result.file_format,
        result.sample_names.len(),
        result.data_lines.len()
    );

    result
}
