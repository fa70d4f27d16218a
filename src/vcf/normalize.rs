//! Mapping of decoded fields from the supported annotation conventions onto
//! one canonical shape.

use indexmap::IndexMap;

use super::conf::{InfoSource, ParseConfig, VafSource};
use super::expand::ExpandedAllele;
use super::fields::{InfoMap, SampleFieldMap, MISSING};
use super::tokenize::FixedColumns;
use crate::err::RowError;

/// Filter value of records passing all filters.
pub const FILTER_PASS: &str = "PASS";

/// Variant after normalization, before schema validation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftVariant {
    /// Input line the variant came from.
    pub lineno: usize,
    pub chromosome: String,
    /// `None` if `POS` is not an integer.
    pub position: Option<u64>,
    pub reference: String,
    pub alternate: String,
    pub gene: Option<String>,
    pub hgvs_notation: Option<String>,
    pub consequence: Option<String>,
    pub variant_allele_frequency: Option<f64>,
    pub quality: Option<f64>,
    pub filter_status: Option<String>,
}

/// Supporting code for numeric sub field parsing.
pub(crate) mod coercion {
    /// Error type for numeric sub field parsing.
    #[derive(thiserror::Error, Debug, Clone, PartialEq)]
    pub enum Error {
        #[error("{field}: {value:?} is not a number")]
        NotANumber { field: &'static str, value: String },
        #[error("{field}: {value:?} is not a non-negative integer")]
        NotAnInteger { field: &'static str, value: String },
        #[error("{field}: {value} is not finite")]
        NotFinite { field: &'static str, value: f64 },
        #[error("{field}: {value} is not in [0, 1]")]
        OutOfRange { field: &'static str, value: f64 },
    }
}

/// Capability of extracting one annotation value from an `INFO` column.
pub trait InfoExtractor {
    /// Extract the value for the variant with the given alternate allele.
    fn extract(&self, info: &InfoMap, alternate: &str) -> Option<String>;
}

impl InfoExtractor for InfoSource {
    fn extract(&self, info: &InfoMap, alternate: &str) -> Option<String> {
        match self {
            InfoSource::Key { key } => info.value(key).map(str::to_string),
            InfoSource::Subfield { key, index } => {
                let entry = select_entry(info.value(key)?, alternate);
                entry
                    .split('|')
                    .nth(*index)
                    .map(str::trim)
                    .filter(|value| !value.is_empty())
                    .map(str::to_string)
            }
        }
    }
}

/// Pick the comma-separated `ANN`/`CSQ` entry for `alternate`.
///
/// The first sub field of each entry is the allele; fall back to the first
/// entry if no entry names `alternate`.
fn select_entry<'a>(raw: &'a str, alternate: &str) -> &'a str {
    raw.split(',')
        .find(|entry| entry.split('|').next().map(str::trim) == Some(alternate))
        .unwrap_or_else(|| raw.split(',').next().unwrap_or(raw))
}

/// Return the first value any of `sources` yields.
pub fn first_hit<E: InfoExtractor>(sources: &[E], info: &InfoMap, alternate: &str) -> Option<String> {
    sources
        .iter()
        .find_map(|source| source.extract(info, alternate))
}

/// Pick the value for the 1-based `allele_index` from a comma-separated list.
///
/// A single value applies to all alleles.
fn per_allele(raw: &str, allele_index: usize) -> Option<&str> {
    let values = raw.split(',').map(str::trim).collect::<Vec<_>>();
    let value = if values.len() == 1 {
        values[0]
    } else {
        *values.get(allele_index.checked_sub(1)?)?
    };
    Some(value).filter(|value| !value.is_empty() && *value != MISSING)
}

fn parse_number(field: &'static str, value: &str) -> Result<f64, coercion::Error> {
    let number = value
        .parse::<f64>()
        .map_err(|_| coercion::Error::NotANumber {
            field,
            value: value.to_string(),
        })?;
    if number.is_finite() {
        Ok(number)
    } else {
        Err(coercion::Error::NotFinite {
            field,
            value: number,
        })
    }
}

fn parse_frequency(field: &'static str, value: &str) -> Result<f64, coercion::Error> {
    let frequency = parse_number(field, value)?;
    if (0.0..=1.0).contains(&frequency) {
        Ok(frequency)
    } else {
        Err(coercion::Error::OutOfRange {
            field,
            value: frequency,
        })
    }
}

impl VafSource {
    /// Resolve the frequency of the allele with 1-based `allele_index`.
    ///
    /// Returns `None` if the source is not present for the record.
    pub fn resolve(
        &self,
        info: &InfoMap,
        samples: &[SampleFieldMap],
        allele_index: usize,
    ) -> Option<Result<f64, coercion::Error>> {
        let first_sample = samples.first();
        match self {
            VafSource::InfoAf => {
                let value = per_allele(info.value("AF")?, allele_index)?;
                Some(parse_frequency("INFO/AF", value))
            }
            VafSource::SampleVaf => {
                let value = per_allele(first_sample?.get("VAF")?, allele_index)?;
                Some(parse_frequency("FORMAT/VAF", value))
            }
            VafSource::SampleAf => {
                let value = per_allele(first_sample?.get("AF")?, allele_index)?;
                Some(parse_frequency("FORMAT/AF", value))
            }
            VafSource::SampleAd => {
                let depths = first_sample?
                    .get("AD")?
                    .split(',')
                    .map(str::trim)
                    .collect::<Vec<_>>();
                let (ref_depth, alt_depth) = (depths.first()?, depths.get(allele_index)?);
                allele_depth_ratio(ref_depth, alt_depth).transpose()
            }
        }
    }
}

/// Compute `alt / (ref + alt)`; `Ok(None)` for zero total depth.
fn allele_depth_ratio(ref_depth: &str, alt_depth: &str) -> Result<Option<f64>, coercion::Error> {
    let parse_depth = |value: &str| {
        value
            .parse::<u64>()
            .map(|depth| depth as f64)
            .map_err(|_| coercion::Error::NotAnInteger {
                field: "FORMAT/AD",
                value: value.to_string(),
            })
    };
    let ref_depth = parse_depth(ref_depth)?;
    let alt_depth = parse_depth(alt_depth)?;
    let total = ref_depth + alt_depth;
    Ok((total > 0.0).then(|| alt_depth / total))
}

/// Helper that turns decoded records into `DraftVariant`s.
#[derive(Debug, Clone)]
pub struct Normalizer<'c> {
    config: &'c ParseConfig,
    chrom_map: Option<IndexMap<String, usize>>,
}

impl<'c> Normalizer<'c> {
    pub fn new(config: &'c ParseConfig) -> Self {
        Self {
            config,
            chrom_map: config
                .normalize_chromosome
                .then(crate::common::build_chrom_map),
        }
    }

    /// Build the draft variant for one expanded allele.
    pub fn normalize(
        &self,
        lineno: usize,
        fixed: &FixedColumns<'_>,
        allele: &ExpandedAllele<'_>,
        info: &InfoMap,
        samples: &[SampleFieldMap],
    ) -> DraftVariant {
        let alternate = allele.alternate;
        let chromosome = match &self.chrom_map {
            Some(chrom_map) => crate::common::canonicalize_chrom(chrom_map, fixed.chrom),
            None => fixed.chrom.to_string(),
        };
        let position = fixed
            .pos
            .parse::<u64>()
            .map_err(|_| coercion::Error::NotAnInteger {
                field: "POS",
                value: fixed.pos.to_string(),
            });

        DraftVariant {
            lineno,
            chromosome,
            position: ok_or_log(lineno, position),
            reference: fixed.reference.to_string(),
            alternate: alternate.to_string(),
            gene: first_hit(&self.config.gene, info, alternate),
            hgvs_notation: first_hit(&self.config.hgvs_notation, info, alternate),
            consequence: first_hit(&self.config.consequence, info, alternate),
            variant_allele_frequency: self.variant_allele_frequency(
                lineno,
                info,
                samples,
                allele.index,
            ),
            quality: fixed
                .quality
                .filter(|qual| *qual != MISSING)
                .and_then(|qual| ok_or_log(lineno, parse_number("QUAL", qual))),
            filter_status: fixed
                .filter
                .filter(|filter| *filter != MISSING && *filter != FILTER_PASS)
                .map(str::to_string),
        }
    }

    fn variant_allele_frequency(
        &self,
        lineno: usize,
        info: &InfoMap,
        samples: &[SampleFieldMap],
        allele_index: usize,
    ) -> Option<f64> {
        self.config
            .variant_allele_frequency
            .iter()
            .find_map(|source| match source.resolve(info, samples, allele_index)? {
                Ok(vaf) => Some(vaf),
                Err(e) => {
                    tracing::debug!("line {}: {} ({} skipped)", lineno, RowError::from(e), source);
                    None
                }
            })
    }
}

/// Unwrap `Ok` values and log coercion failures.
fn ok_or_log<T>(lineno: usize, result: Result<T, coercion::Error>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            tracing::debug!("line {}: {}", lineno, RowError::from(e));
            None
        }
    }
}
