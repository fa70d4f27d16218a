//! The canonical variant record produced by the parser.

use uuid::Uuid;

/// One validated variant with exactly one alternate allele.
#[serde_with::skip_serializing_none]
#[derive(
    Debug, Default, Clone, PartialEq, serde::Serialize, serde::Deserialize, derive_builder::Builder,
)]
#[serde(rename_all = "camelCase")]
#[builder(setter(into))]
pub struct CanonicalVariant {
    /// Chromosome name as given in the input (or canonicalized if configured).
    pub chromosome: String,
    /// 1-based position.
    pub position: u64,
    /// Reference allele.
    pub reference: String,
    /// The single alternate allele.
    pub alternate: String,
    /// Gene symbol.
    #[builder(default)]
    pub gene: Option<String>,
    /// HGVS notation, protein or coding.
    #[builder(default)]
    pub hgvs_notation: Option<String>,
    /// Sequence Ontology consequence term.
    #[builder(default)]
    pub consequence: Option<String>,
    /// Variant allele frequency in `[0, 1]`.
    #[builder(default)]
    pub variant_allele_frequency: Option<f64>,
    /// Phred-scaled `QUAL`.
    #[builder(default)]
    pub quality: Option<f64>,
    /// Failed filters; absent for passing records.
    #[builder(default)]
    pub filter_status: Option<String>,
}

impl CanonicalVariant {
    /// Key of the form `chrom-pos-ref-alt`.
    pub fn variant_key(&self) -> String {
        format!(
            "{}-{}-{}-{}",
            self.chromosome, self.position, self.reference, self.alternate
        )
    }

    /// Deterministic identifier derived from the variant coordinates.
    pub fn observation_id(&self) -> Uuid {
        let name = format!(
            "{}:{}:{}:{}",
            self.chromosome, self.position, self.reference, self.alternate
        );
        Uuid::new_v5(&Uuid::NAMESPACE_OID, name.as_bytes())
    }
}
