use crate::vcf::{normalize::coercion, tokenize::record, validate::canonical_variant};

/// Failure of a whole parser invocation; the only error callers see.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("no valid variants found in VCF input")]
    NoVariantsFound,
}

/// Problems confined to one line or variant.  These are logged and recovered
/// from inside the parser and never escape it.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RowError {
    #[error("malformed line: {0}")]
    MalformedLine(#[from] record::Error),
    #[error("field coercion failure: {0}")]
    FieldCoercion(#[from] coercion::Error),
    #[error("schema violation: {0}")]
    SchemaViolation(#[from] canonical_variant::Error),
}
