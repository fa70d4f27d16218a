//! Parser configuration.

use std::path::Path;

use crate::common::io::open_read_maybe_gz;

/// SnpEff annotation INFO key.
pub const ANN: &str = "ANN";
/// VEP annotation INFO key.
pub const CSQ: &str = "CSQ";

/// Position of the consequence in `ANN`/`CSQ` entries.
pub const SUBFIELD_CONSEQUENCE: usize = 1;
/// Position of the gene symbol in `ANN`/`CSQ` entries.
pub const SUBFIELD_GENE: usize = 3;
/// Position of the coding HGVS notation in `ANN` entries.
pub const SUBFIELD_HGVS_C: usize = 9;

/// How a `GT` value is checked for calling an alternate allele.
#[derive(
    serde::Serialize,
    serde::Deserialize,
    PartialEq,
    Eq,
    Hash,
    Debug,
    Clone,
    Copy,
    Default,
    clap::ValueEnum,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum GenotypeMatching {
    /// Split on `/` and `|` and compare allele indices as integers.
    #[default]
    Tokens,
    /// Look for the decimal allele index anywhere in the `GT` string.
    Substring,
}

/// Source for the variant allele frequency.
#[derive(
    serde::Serialize,
    serde::Deserialize,
    PartialEq,
    Eq,
    Hash,
    Debug,
    Clone,
    Copy,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum VafSource {
    /// `INFO/AF`.
    InfoAf,
    /// `FORMAT/VAF` of the first sample.
    SampleVaf,
    /// `FORMAT/AF` of the first sample.
    SampleAf,
    /// `alt / (ref + alt)` from `FORMAT/AD` of the first sample.
    SampleAd,
}

/// Where to find one annotation value in the `INFO` column.
#[derive(serde::Serialize, serde::Deserialize, PartialEq, Eq, Hash, Debug, Clone)]
#[serde(untagged)]
pub enum InfoSource {
    /// The `index`-th pipe-separated sub field of `key`, e.g., `ANN` or `CSQ`.
    Subfield { key: String, index: usize },
    /// The plain value of `key`.
    Key { key: String },
}

impl InfoSource {
    pub fn key(key: &str) -> Self {
        InfoSource::Key {
            key: key.to_string(),
        }
    }

    pub fn subfield(key: &str, index: usize) -> Self {
        InfoSource::Subfield {
            key: key.to_string(),
            index,
        }
    }
}

/// Configuration of one parser run.
#[derive(serde::Serialize, serde::Deserialize, PartialEq, Eq, Debug, Clone)]
#[serde(default)]
pub struct ParseConfig {
    /// Sources for the gene symbol, first hit wins.
    pub gene: Vec<InfoSource>,
    /// Sources for the HGVS notation, first hit wins.
    pub hgvs_notation: Vec<InfoSource>,
    /// Sources for the consequence, first hit wins.
    pub consequence: Vec<InfoSource>,
    /// Sources for the variant allele frequency, first hit wins.
    pub variant_allele_frequency: Vec<VafSource>,
    /// How to use `GT` for selecting alternate alleles.
    pub genotype_matching: GenotypeMatching,
    /// Whether to drop `*` (spanning deletion) alleles.
    pub skip_spanning_deletions: bool,
    /// Whether to canonicalize chromosome names (`chr1` to `1`).
    pub normalize_chromosome: bool,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            gene: vec![
                InfoSource::key("GENE"),
                InfoSource::subfield(ANN, SUBFIELD_GENE),
                InfoSource::subfield(CSQ, SUBFIELD_GENE),
            ],
            hgvs_notation: vec![
                InfoSource::key("HGVS"),
                InfoSource::key("HGVSC"),
                InfoSource::subfield(ANN, SUBFIELD_HGVS_C),
            ],
            consequence: vec![
                InfoSource::key("EFFECT"),
                InfoSource::key("CONSEQUENCE"),
                InfoSource::subfield(ANN, SUBFIELD_CONSEQUENCE),
                InfoSource::subfield(CSQ, SUBFIELD_CONSEQUENCE),
            ],
            variant_allele_frequency: vec![
                VafSource::InfoAf,
                VafSource::SampleVaf,
                VafSource::SampleAd,
            ],
            genotype_matching: Default::default(),
            skip_spanning_deletions: true,
            normalize_chromosome: false,
        }
    }
}

impl ParseConfig {
    /// Load configuration from a JSON file; missing fields take default values.
    pub fn from_path<P>(path: P) -> Result<Self, anyhow::Error>
    where
        P: AsRef<Path>,
    {
        let reader = open_read_maybe_gz(path.as_ref())?;
        serde_json::from_reader(reader).map_err(|e| {
            anyhow::anyhow!(
                "could not parse configuration {:?}: {}",
                path.as_ref(),
                e
            )
        })
    }
}

#[cfg(test)]
mod test {
    use std::io::Write;

    use pretty_assertions::assert_eq;
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn partial_json_keeps_defaults() -> Result<(), anyhow::Error> {
        let config: ParseConfig = serde_json::from_str(
            r#"{
                "gene": [{"key": "SYMBOL"}, {"key": "CSQ", "index": 3}],
                "genotype_matching": "substring"
            }"#,
        )?;

        assert_eq!(
            config.gene,
            vec![InfoSource::key("SYMBOL"), InfoSource::subfield(CSQ, 3)]
        );
        assert_eq!(config.genotype_matching, GenotypeMatching::Substring);
        assert_eq!(config.consequence, ParseConfig::default().consequence);
        assert!(config.skip_spanning_deletions);

        Ok(())
    }

    #[test]
    fn from_path() -> Result<(), anyhow::Error> {
        let tmp_dir = temp_testdir::TempDir::default();
        let path = tmp_dir.join("config.json");
        {
            let mut f = std::fs::File::create(&path)?;
            f.write_all(br#"{"variant_allele_frequency": ["sample-ad", "info-af"]}"#)?;
        }

        let config = ParseConfig::from_path(&path)?;

        assert_eq!(
            config.variant_allele_frequency,
            vec![VafSource::SampleAd, VafSource::InfoAf]
        );

        Ok(())
    }

    #[test]
    fn from_path_invalid_json() -> Result<(), anyhow::Error> {
        let tmp_dir = temp_testdir::TempDir::default();
        let path = tmp_dir.join("config.json");
        std::fs::write(&path, "{not json")?;

        assert!(ParseConfig::from_path(&path).is_err());

        Ok(())
    }

    #[test]
    fn vaf_source_names_round_trip() -> Result<(), anyhow::Error> {
        for source in VafSource::iter() {
            assert_eq!(source.to_string().parse::<VafSource>()?, source);
        }
        assert_eq!(VafSource::SampleAd.to_string(), "sample-ad");

        Ok(())
    }

    #[rstest::rstest]
    #[case(GenotypeMatching::Tokens, "tokens")]
    #[case(GenotypeMatching::Substring, "substring")]
    fn genotype_matching_display(#[case] matching: GenotypeMatching, #[case] expected: &str) {
        assert_eq!(matching.to_string(), expected);
    }
}
