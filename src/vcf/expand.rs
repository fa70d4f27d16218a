//! Expansion of multi-allelic records into one allele per variant.

use itertools::Itertools;

use super::conf::{GenotypeMatching, ParseConfig};
use super::fields::{SampleFieldMap, MISSING};
use super::tokenize::FixedColumns;

/// Allele of a spanning deletion.
pub const SPANNING_DELETION: &str = "*";

/// One alternate allele of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedAllele<'a> {
    /// 1-based index into the `ALT` column; 0 would be the reference.
    pub index: usize,
    pub alternate: &'a str,
}

impl GenotypeMatching {
    /// Whether `gt` takes part in allele filtering.
    ///
    /// With `Tokens`, a `GT` without any called allele (e.g., `./.`) is ignored.
    /// With `Substring`, every present `GT` value counts.
    pub fn has_call(&self, gt: &str) -> bool {
        match self {
            GenotypeMatching::Tokens => gt_indices(gt).next().is_some(),
            GenotypeMatching::Substring => true,
        }
    }

    /// Whether `gt` calls the allele with the given 1-based `index`.
    pub fn calls(&self, gt: &str, index: usize) -> bool {
        match self {
            GenotypeMatching::Tokens => gt_indices(gt).any(|i| i == index),
            GenotypeMatching::Substring => gt.contains(&index.to_string()),
        }
    }
}

/// Allele indices of a `GT` value, skipping no-calls.
fn gt_indices(gt: &str) -> impl Iterator<Item = usize> + '_ {
    gt.split(['/', '|'])
        .filter_map(|token| token.trim().parse::<usize>().ok())
}

/// Expand the `ALT` column into one allele per entry, in `ALT` order.
///
/// The missing allele `.` yields no entry.  If any sample has a `GT` that
/// takes part in filtering (see `GenotypeMatching::has_call()`), only alleles
/// called in at least one such sample are kept.  Without genotype evidence all
/// alleles are kept.
pub fn expand_alleles<'a>(
    fixed: &FixedColumns<'a>,
    samples: &[SampleFieldMap],
    config: &ParseConfig,
) -> Vec<ExpandedAllele<'a>> {
    let matching = config.genotype_matching;
    let genotypes = samples
        .iter()
        .filter_map(|sample| sample.get("GT"))
        .filter(|gt| matching.has_call(gt))
        .collect::<Vec<_>>();

    let alleles = fixed
        .alternate
        .split(',')
        .map(str::trim)
        .enumerate()
        .map(|(i, alternate)| ExpandedAllele {
            index: i + 1,
            alternate,
        })
        .filter(|allele| !allele.alternate.is_empty() && allele.alternate != MISSING)
        .filter(|allele| {
            let skip = config.skip_spanning_deletions && allele.alternate == SPANNING_DELETION;
            if skip {
                tracing::trace!("skipping spanning deletion allele at {}:{}", fixed.chrom, fixed.pos);
            }
            !skip
        })
        .filter(|allele| {
            genotypes.is_empty() || genotypes.iter().any(|gt| matching.calls(gt, allele.index))
        })
        .collect::<Vec<_>>();

    tracing::trace!(
        "{}:{} ALT={} GT=[{}] -> [{}]",
        fixed.chrom,
        fixed.pos,
        fixed.alternate,
        genotypes.iter().join(","),
        alleles.iter().map(|allele| allele.alternate).join(",")
    );

    alleles
}
