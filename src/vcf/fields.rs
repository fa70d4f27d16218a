//! Decoders for the `INFO` column and the `FORMAT`/sample columns.

use indexmap::IndexMap;

use super::tokenize::SampleBlock;

/// Placeholder for missing values.
pub const MISSING: &str = ".";

/// Value of one `INFO` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InfoValue {
    /// Bare key without `=`; presence means true.
    Flag,
    /// `KEY=VALUE` entry.
    Value(String),
}

impl InfoValue {
    /// The value string, `None` for flags.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            InfoValue::Flag => None,
            InfoValue::Value(value) => Some(value.as_str()),
        }
    }
}

/// Decoded `INFO` column in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InfoMap {
    entries: IndexMap<String, InfoValue>,
}

impl InfoMap {
    /// Decode the semicolon-separated `INFO` column.
    pub fn decode(info: Option<&str>) -> Self {
        let mut entries = IndexMap::new();
        for token in info.unwrap_or_default().split(';').map(str::trim) {
            if token.is_empty() || token == MISSING {
                continue;
            }
            match token.split_once('=') {
                Some((key, value)) => {
                    entries.insert(key.trim().to_string(), InfoValue::Value(value.to_string()))
                }
                None => entries.insert(token.to_string(), InfoValue::Flag),
            };
        }
        Self { entries }
    }

    /// Look up `key`; exact match first, then ASCII case-insensitive.
    pub fn get(&self, key: &str) -> Option<&InfoValue> {
        self.entries.get(key).or_else(|| {
            self.entries
                .iter()
                .find(|(k, _)| k.eq_ignore_ascii_case(key))
                .map(|(_, v)| v)
        })
    }

    /// Non-empty, non-missing value of `key`.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.get(key)
            .and_then(InfoValue::as_str)
            .map(str::trim)
            .filter(|value| !value.is_empty() && *value != MISSING)
    }
}

/// `FORMAT` key to value mapping of one sample.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SampleFieldMap {
    /// Sample name from the `#CHROM` header.
    pub sample: String,
    fields: IndexMap<String, String>,
}

impl SampleFieldMap {
    /// Zip the `FORMAT` keys with the colon-separated sample column.
    ///
    /// Missing trailing values and `.` leave the key absent.
    pub fn decode(sample: &str, format: &str, column: &str) -> Self {
        let fields = format
            .split(':')
            .zip(column.split(':'))
            .filter(|(_, value)| !value.is_empty() && *value != MISSING)
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        Self {
            sample: sample.to_string(),
            fields,
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(String::as_str)
    }
}

/// Decode the sample columns of one record.
///
/// Sample columns are only interpreted when the `#CHROM` header named them;
/// columns without a name are ignored.
pub fn decode_samples(
    block: Option<&SampleBlock<'_>>,
    sample_names: &[String],
) -> Vec<SampleFieldMap> {
    let Some(block) = block else {
        return Vec::new();
    };
    if block.samples.len() != sample_names.len() {
        tracing::trace!(
            "record has {} sample columns but header names {} samples",
            block.samples.len(),
            sample_names.len()
        );
    }
    sample_names
        .iter()
        .zip(block.samples.iter())
        .map(|(name, column)| SampleFieldMap::decode(name, block.format, column))
        .collect()
}
