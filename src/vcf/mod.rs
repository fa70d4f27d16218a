//! Parsing of VCF text into canonical variant records.
//!
//! The parser is lenient: lines that cannot be used are logged and skipped, and
//! only an input without any valid variant is an error.

pub mod conf;
pub mod expand;
pub mod fields;
pub mod lines;
pub mod normalize;
pub mod parse;
pub mod schema;
pub mod tokenize;
pub mod validate;

use crate::err::{ParseError, RowError};

use self::conf::ParseConfig;
use self::expand::expand_alleles;
use self::fields::{decode_samples, InfoMap, MISSING};
use self::normalize::Normalizer;
use self::schema::CanonicalVariant;
use self::tokenize::RawRecord;

/// Parse VCF `text` into canonical variants, in input order.
///
/// # Errors
///
/// Returns `ParseError::NoVariantsFound` if the text yields no valid variant.
pub fn parse_vcf(text: &str, config: &ParseConfig) -> Result<Vec<CanonicalVariant>, ParseError> {
    let classified = lines::classify(text);
    if !classified.has_column_header {
        tracing::debug!("no #CHROM header line, sample columns will be ignored");
    }

    let normalizer = Normalizer::new(config);
    let mut drafts = Vec::new();
    for line in &classified.data_lines {
        let record = match RawRecord::tokenize(line.text) {
            Ok(record) => record,
            Err(e) => {
                tracing::warn!("skipping line {}: {}", line.lineno, RowError::from(e));
                continue;
            }
        };

        let info = InfoMap::decode(record.fixed.info);
        let samples = decode_samples(record.sample_block.as_ref(), &classified.sample_names);
        let alleles = expand_alleles(&record.fixed, &samples, config);
        if alleles.is_empty() {
            tracing::debug!(
                "line {}: record {} has no alternate allele to report",
                line.lineno,
                record.fixed.id.unwrap_or(MISSING)
            );
        }
        for allele in alleles {
            drafts.push(normalizer.normalize(line.lineno, &record.fixed, &allele, &info, &samples));
        }
    }

    validate::validate(drafts)
}

/// Parse VCF `text` with the default configuration.
pub fn parse_vcf_default(text: &str) -> Result<Vec<CanonicalVariant>, ParseError> {
    parse_vcf(text, &ParseConfig::default())
}

#[cfg(test)]
mod test {
    use float_cmp::approx_eq;
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::vcf::conf::GenotypeMatching;

    const SAMPLE_VCF: &str = "##fileformat=VCFv4.2
##FILTER=<ID=PASS,Description=\"All filters passed\">
##reference=GRCh38
##INFO=<ID=GENE,Number=1,Type=String,Description=\"Gene symbol\">
##INFO=<ID=HGVS,Number=1,Type=String,Description=\"HGVS protein notation\">
##INFO=<ID=CONSEQUENCE,Number=1,Type=String,Description=\"Variant consequence\">
##FORMAT=<ID=GT,Number=1,Type=String,Description=\"Genotype\">
##FORMAT=<ID=AD,Number=R,Type=Integer,Description=\"Allelic depths\">
##FORMAT=<ID=DP,Number=1,Type=Integer,Description=\"Read depth\">
##FORMAT=<ID=VAF,Number=1,Type=Float,Description=\"Variant allele frequency\">
#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tSAMPLE1
7\t55259515\trs121434568\tT\tG\t100\tPASS\tGENE=EGFR;HGVS=p.L858R;CONSEQUENCE=missense_variant\tGT:AD:DP:VAF\t0/1:65:100:0.35
17\t7577120\trs28934576\tG\tA\t95\tPASS\tGENE=TP53;HGVS=p.R273H;CONSEQUENCE=missense_variant\tGT:AD:DP:VAF\t0/1:42:100:0.42";

    #[test]
    fn parse_sample_vcf() -> Result<(), anyhow::Error> {
        let variants = parse_vcf_default(SAMPLE_VCF)?;

        insta::assert_debug_snapshot!(variants);

        Ok(())
    }

    #[test]
    fn parse_is_idempotent() -> Result<(), anyhow::Error> {
        let first = parse_vcf_default(SAMPLE_VCF)?;
        let second = parse_vcf_default(SAMPLE_VCF)?;

        assert_eq!(first, second);
        assert_eq!(
            first.iter().map(|v| v.observation_id()).collect::<Vec<_>>(),
            second.iter().map(|v| v.observation_id()).collect::<Vec<_>>()
        );

        Ok(())
    }

    #[test]
    fn parse_preserves_order() -> Result<(), anyhow::Error> {
        let text = "X\t300\t.\tA\tC\n1\t200\t.\tA\tC,G,T\n1\t100\t.\tA\tC\n";

        let variants = parse_vcf_default(text)?;

        assert_eq!(
            variants.iter().map(|v| v.variant_key()).collect::<Vec<_>>(),
            vec!["X-300-A-C", "1-200-A-C", "1-200-A-G", "1-200-A-T", "1-100-A-C"]
        );

        Ok(())
    }

    #[test]
    fn parse_multi_allelic() -> Result<(), anyhow::Error> {
        let variants = parse_vcf_default("1\t100\t.\tA\tC,G\t.\tPASS\tGENE=TEST")?;

        assert_eq!(variants.len(), 2);
        assert_eq!(variants[0].alternate, "C");
        assert_eq!(variants[1].alternate, "G");
        assert!(variants.iter().all(|v| v.gene.as_deref() == Some("TEST")));
        assert!(variants.iter().all(|v| v.position == 100 && v.reference == "A"));

        Ok(())
    }

    #[rstest::rstest]
    #[case("AF=0.5\tGT:VAF\t0/1:0.9", 0.5)]
    #[case(".\tGT:AD\t0/1:70,30", 0.3)]
    fn parse_vaf_precedence(#[case] rest: &str, #[case] expected: f64) -> Result<(), anyhow::Error> {
        let text = format!(
            "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tTUMOR\n\
             1\t100\t.\tA\tC\t.\tPASS\t{rest}"
        );

        let variants = parse_vcf_default(&text)?;
        let vaf = variants[0].variant_allele_frequency.expect("VAF present");

        assert!(approx_eq!(f64, vaf, expected, ulps = 2));

        Ok(())
    }

    #[rstest::rstest]
    #[case("")]
    #[case("\n\n  \n")]
    #[case("#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO")]
    #[case("##fileformat=VCFv4.2\n#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\n")]
    #[case("1\t100\t.\n2\t200")]
    #[case("\t100\t5\tA\tC\tG\t.")]
    #[case("1\tabc\t.\tA\tC\n0\t0\t.\tA\tC\n1\t1\t.\t.\tC\n1\t1\t.\tA\t.")]
    fn parse_no_variants(#[case] text: &str) {
        assert_eq!(parse_vcf_default(text), Err(ParseError::NoVariantsFound));
    }

    #[tracing_test::traced_test]
    #[test]
    fn parse_skips_malformed_line() -> Result<(), anyhow::Error> {
        let variants = parse_vcf_default("1\t100\t.\tA\tC\t.\tPASS\tGENE=TEST\n1\t100\t.\n")?;

        assert_eq!(variants.len(), 1);
        assert_eq!(variants[0].gene.as_deref(), Some("TEST"));
        assert!(logs_contain("skipping line 2"));

        Ok(())
    }

    #[tracing_test::traced_test]
    #[test]
    fn parse_logs_record_without_alleles() {
        let result = parse_vcf_default("1\t100\trs42\tA\t.");

        assert_eq!(result, Err(ParseError::NoVariantsFound));
        assert!(logs_contain("record rs42 has no alternate allele"));
    }

    #[test]
    fn parse_snpeff_annotation() -> Result<(), anyhow::Error> {
        let variants = parse_vcf_default(
            "7\t55259515\t.\tT\tA\t.\tPASS\tANN=A|missense_variant|MODERATE|EGFR|ENSG00000146648",
        )?;

        assert_eq!(variants[0].gene.as_deref(), Some("EGFR"));
        assert_eq!(variants[0].consequence.as_deref(), Some("missense_variant"));

        Ok(())
    }

    #[test]
    fn parse_whitespace_delimited() -> Result<(), anyhow::Error> {
        let tabs = parse_vcf_default(
            "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tS1\n\
             1\t100\t.\tA\tC\t50\tq10\tGENE=TEST;AF=0.25\tGT:AD\t0/1:10,5",
        )?;
        let spaces = parse_vcf_default(
            "#CHROM  POS ID  REF ALT QUAL FILTER INFO FORMAT S1\n\
             1   100   .   A   C   50   q10   GENE=TEST;AF=0.25   GT:AD   0/1:10,5",
        )?;

        assert_eq!(tabs, spaces);
        assert_eq!(tabs[0].filter_status.as_deref(), Some("q10"));

        Ok(())
    }

    #[test]
    fn parse_genotype_filtered_multi_sample() -> Result<(), anyhow::Error> {
        let text = "##PEDIGREE=<Derived=Patient_01_Somatic,Original=Patient_01_Germline>
#CHROM  POS ID  REF ALT QUAL    FILTER  INFO        FORMAT  Patient_01_Germline Patient_01_Somatic
1   69091   .   A   C,G .       PASS    AF=0.1122   GT      1/0                 2/1
1   69849   .   G   A,C,T .     PASS    AF=0.1122   GT      1/0                 2/1
1   69511   .   A   C,G .       PASS    AF=0.3580   GT      1/1                 1/1";

        let variants = parse_vcf_default(text)?;

        assert_eq!(
            variants.iter().map(|v| v.variant_key()).collect::<Vec<_>>(),
            vec!["1-69091-A-C", "1-69091-A-G", "1-69849-G-A", "1-69849-G-C", "1-69511-A-C"]
        );
        assert!(variants[..4]
            .iter()
            .all(|v| v.variant_allele_frequency == Some(0.1122)));

        Ok(())
    }

    #[test]
    fn parse_with_config() -> Result<(), anyhow::Error> {
        let text = "#CHROM\tPOS\tID\tREF\tALT\tQUAL\tFILTER\tINFO\tFORMAT\tS1\n\
                    chr1\t100\t.\tA\tC,G,T\t.\tPASS\t.\tGT\t0/11";
        let config = ParseConfig {
            genotype_matching: GenotypeMatching::Substring,
            normalize_chromosome: true,
            ..Default::default()
        };

        let variants = parse_vcf(text, &config)?;

        assert_eq!(
            variants.iter().map(|v| v.variant_key()).collect::<Vec<_>>(),
            vec!["1-100-A-C"]
        );

        Ok(())
    }
}
