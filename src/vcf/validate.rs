//! Schema validation of draft variants.

use super::fields::MISSING;
use super::normalize::DraftVariant;
use super::schema::{CanonicalVariant, CanonicalVariantBuilder};
use crate::err::{ParseError, RowError};

/// Supporting code for `CanonicalVariant::try_from()`.
pub(crate) mod canonical_variant {
    /// Error type for `CanonicalVariant::try_from()`.
    #[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
    pub enum Error {
        #[error("missing chromosome")]
        MissingChromosome,
        #[error("position is not an integer >= 1")]
        InvalidPosition,
        #[error("missing reference allele")]
        MissingReference,
        #[error("missing alternate allele")]
        MissingAlternate,
        #[error("could not build variant: {0}")]
        Builder(String),
    }
}

fn is_missing(value: &str) -> bool {
    value.is_empty() || value == MISSING
}

impl TryFrom<DraftVariant> for CanonicalVariant {
    type Error = canonical_variant::Error;

    fn try_from(draft: DraftVariant) -> Result<Self, Self::Error> {
        if draft.chromosome.is_empty() {
            return Err(canonical_variant::Error::MissingChromosome);
        }
        let position = draft
            .position
            .filter(|&pos| pos >= 1)
            .ok_or(canonical_variant::Error::InvalidPosition)?;
        if is_missing(&draft.reference) {
            return Err(canonical_variant::Error::MissingReference);
        }
        if is_missing(&draft.alternate) {
            return Err(canonical_variant::Error::MissingAlternate);
        }

        CanonicalVariantBuilder::default()
            .chromosome(draft.chromosome)
            .position(position)
            .reference(draft.reference)
            .alternate(draft.alternate)
            .gene(draft.gene)
            .hgvs_notation(draft.hgvs_notation)
            .consequence(draft.consequence)
            .variant_allele_frequency(draft.variant_allele_frequency)
            .quality(draft.quality)
            .filter_status(draft.filter_status)
            .build()
            .map_err(|e| canonical_variant::Error::Builder(e.to_string()))
    }
}

/// Validate all drafts, dropping the invalid ones.
///
/// # Errors
///
/// Returns `ParseError::NoVariantsFound` if no draft passes validation.
pub fn validate(drafts: Vec<DraftVariant>) -> Result<Vec<CanonicalVariant>, ParseError> {
    let total = drafts.len();
    let variants = drafts
        .into_iter()
        .filter_map(|draft| {
            let lineno = draft.lineno;
            match CanonicalVariant::try_from(draft) {
                Ok(variant) => Some(variant),
                Err(e) => {
                    tracing::warn!("dropping variant from line {}: {}", lineno, RowError::from(e));
                    None
                }
            }
        })
        .collect::<Vec<_>>();

    tracing::debug!("{} of {} draft variants passed validation", variants.len(), total);

    if variants.is_empty() {
        Err(ParseError::NoVariantsFound)
    } else {
        Ok(variants)
    }
}
