//! Implementation of `vcf parse` subcommand.

use std::io::Write;

use thousands::Separable;

use super::conf::{GenotypeMatching, ParseConfig};
use super::schema::CanonicalVariant;
use crate::common::{self, io::open_write_maybe_gz, io::read_to_string_maybe_gz};

/// Command line arguments for `vcf parse` subcommand.
#[derive(Debug, Default, clap::Parser)]
#[command(author, version, about = "parse VCF text into canonical variants", long_about = None)]
pub struct Args {
    /// Path to input VCF file, may be gzip-compressed; `-` for stdin.
    #[arg(long)]
    pub path_in: String,
    /// Path to output JSON file, gzip-compressed if ending in `.gz`; `-` for stdout.
    #[arg(long)]
    pub path_out: String,
    /// Optional path to parser configuration JSON file.
    #[arg(long)]
    pub path_config: Option<String>,
    /// Canonicalize chromosome names, e.g., `chr1` to `1`.
    #[arg(long, default_value_t = false)]
    pub normalize_chromosome: bool,
    /// How `GT` is matched against alternate alleles; overrides the configuration.
    #[arg(long, value_enum)]
    pub genotype_matching: Option<GenotypeMatching>,
    /// Maximal number of variants to write out; optional.
    #[arg(long)]
    pub max_var_count: Option<usize>,
}

/// One output record: the variant with its observation identifier.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct VariantOutput {
    pub id: uuid::Uuid,
    #[serde(flatten)]
    pub variant: CanonicalVariant,
}

impl From<CanonicalVariant> for VariantOutput {
    fn from(variant: CanonicalVariant) -> Self {
        Self {
            id: variant.observation_id(),
            variant,
        }
    }
}

/// The output document.
#[derive(Debug, Clone, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ParseOutput {
    pub variants: Vec<VariantOutput>,
}

/// Build the parser configuration from the optional file and the command line.
fn load_config(args: &Args) -> Result<ParseConfig, anyhow::Error> {
    let mut config = match &args.path_config {
        Some(path_config) => {
            tracing::info!("loading configuration from {}...", path_config);
            ParseConfig::from_path(path_config)?
        }
        None => ParseConfig::default(),
    };
    if args.normalize_chromosome {
        config.normalize_chromosome = true;
    }
    if let Some(genotype_matching) = args.genotype_matching {
        config.genotype_matching = genotype_matching;
    }
    Ok(config)
}

/// Main entry point for `vcf parse` sub command.
pub fn run(args_common: &crate::common::Args, args: &Args) -> Result<(), anyhow::Error> {
    let before_anything = std::time::Instant::now();
    tracing::info!("oncofhir-vcf {}", common::worker_version());
    tracing::info!("args_common = {:#?}", &args_common);
    tracing::info!("args = {:#?}", &args);

    common::trace_rss_now();

    let config = load_config(args)?;
    tracing::debug!("config = {:#?}", &config);

    tracing::info!("reading input file...");
    let text = read_to_string_maybe_gz(&args.path_in)?;

    tracing::info!("parsing variants...");
    let before_parsing = std::time::Instant::now();
    let mut variants = super::parse_vcf(&text, &config)
        .map_err(|e| anyhow::anyhow!("could not parse {}: {}", &args.path_in, e))?;
    tracing::info!(
        "... parsed {} variants in {:?}",
        variants.len().separate_with_commas(),
        before_parsing.elapsed()
    );
    if let Some(max_var_count) = args.max_var_count {
        if variants.len() > max_var_count {
            tracing::warn!("limiting output to {} variants", max_var_count);
            variants.truncate(max_var_count);
        }
    }
    common::trace_rss_now();

    tracing::info!("writing output file...");
    let output = ParseOutput {
        variants: variants.into_iter().map(VariantOutput::from).collect(),
    };
    let mut writer = open_write_maybe_gz(&args.path_out).map_err(|e| {
        anyhow::anyhow!(
            "could not open output file {} for writing: {}",
            &args.path_out,
            e
        )
    })?;
    serde_json::to_writer_pretty(&mut writer, &output)
        .map_err(|e| anyhow::anyhow!("could not write output: {}", e))?;
    writeln!(writer)?;
    writer.flush()?;

    tracing::info!(
        "All of `vcf parse` completed in {:?}",
        before_anything.elapsed()
    );
    Ok(())
}
