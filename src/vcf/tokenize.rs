//! Splitting of one data line into the fixed VCF columns and the sample block.

/// Minimal number of columns of a usable record (`CHROM` to `ALT`).
pub const MIN_COLUMNS: usize = 5;

/// Index of the `FORMAT` column; sample columns follow it.
pub const FORMAT_COLUMN: usize = 8;

/// Split a line into fields.
///
/// Tab is the delimiter if the line contains one.  Otherwise, the line is split
/// on runs of whitespace so that hand-edited or copy-pasted text still works.
pub fn split_fields(line: &str) -> Vec<&str> {
    let line = line.trim_end_matches(['\r', '\n']);
    if line.contains('\t') {
        line.split('\t').map(str::trim).collect()
    } else {
        line.split_whitespace().collect()
    }
}

/// The eight fixed VCF columns.  Only `CHROM` to `ALT` are mandatory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixedColumns<'a> {
    pub chrom: &'a str,
    pub pos: &'a str,
    pub id: Option<&'a str>,
    pub reference: &'a str,
    /// Comma-separated alternate alleles, not yet expanded.
    pub alternate: &'a str,
    pub quality: Option<&'a str>,
    pub filter: Option<&'a str>,
    pub info: Option<&'a str>,
}

/// The `FORMAT` column and the raw sample columns.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SampleBlock<'a> {
    pub format: &'a str,
    pub samples: Vec<&'a str>,
}

/// One tokenized data line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord<'a> {
    pub fixed: FixedColumns<'a>,
    pub sample_block: Option<SampleBlock<'a>>,
}

/// Supporting code for `RawRecord`.
pub(crate) mod record {
    /// Error type for `RawRecord::tokenize()`.
    #[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
    pub enum Error {
        #[error("expected at least {expected} columns (CHROM..ALT) but found {found}")]
        TooFewColumns { expected: usize, found: usize },
    }
}

impl<'a> RawRecord<'a> {
    /// Tokenize one data line.
    ///
    /// # Errors
    ///
    /// Returns an error if the line has fewer than `MIN_COLUMNS` fields.
    pub fn tokenize(line: &'a str) -> Result<Self, record::Error> {
        let fields = split_fields(line);
        if fields.len() < MIN_COLUMNS {
            return Err(record::Error::TooFewColumns {
                expected: MIN_COLUMNS,
                found: fields.len(),
            });
        }

        let optional = |idx: usize| fields.get(idx).copied().filter(|s| !s.is_empty());

        let fixed = FixedColumns {
            chrom: fields[0],
            pos: fields[1],
            id: optional(2),
            reference: fields[3],
            alternate: fields[4],
            quality: optional(5),
            filter: optional(6),
            info: optional(7),
        };
        let sample_block = optional(FORMAT_COLUMN).map(|format| SampleBlock {
            format,
            samples: fields[FORMAT_COLUMN + 1..].to_vec(),
        });

        Ok(Self {
            fixed,
            sample_block,
        })
    }
}
