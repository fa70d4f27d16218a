//! Common functionality.

use byte_unit::{Byte, UnitType};
use clap::Parser;
use clap_verbosity_flag::{InfoLevel, Verbosity};
use indexmap::IndexMap;

pub mod io;

/// Commonly used command line arguments.
#[derive(Parser, Debug)]
pub struct Args {
    /// Verbosity of the program
    #[clap(flatten)]
    pub verbose: Verbosity<InfoLevel>,
}

impl Default for Args {
    fn default() -> Self {
        Self {
            verbose: Verbosity::new(0, 0),
        }
    }
}

/// Helper to print the current memory resident set size via `tracing`.
pub fn trace_rss_now() {
    let rss = procfs::process::Process::myself()
        .and_then(|me| me.stat())
        .map(|stat| stat.rss * procfs::page_size());
    match rss {
        Ok(rss) => tracing::debug!(
            "RSS now: {:.2}",
            Byte::from_u64(rss).get_appropriate_unit(UnitType::Binary)
        ),
        Err(e) => tracing::debug!("could not determine RSS: {}", e),
    }
}

/// Definition of canonical chromosome names.
pub const CHROMS: &[&str] = &[
    "1", "2", "3", "4", "5", "6", "7", "8", "9", "10", "11", "12", "13", "14", "15", "16", "17",
    "18", "19", "20", "21", "22", "X", "Y", "MT",
];

/// Build mapping of chromosome names to chromosome counts.
///
/// Keys are lower-case; look up with `to_ascii_lowercase()`.
pub fn build_chrom_map() -> IndexMap<String, usize> {
    let mut result = IndexMap::new();
    for (i, &chrom_name) in CHROMS.iter().enumerate() {
        let chrom_name = chrom_name.to_ascii_lowercase();
        result.insert(format!("chr{chrom_name}"), i);
        result.insert(chrom_name, i);
    }
    result.insert("m".to_owned(), 24);
    result.insert("chrm".to_owned(), 24);
    result
}

/// Canonicalize a chromosome name, e.g., `chr1` to `1` and `chrM` to `MT`.
///
/// Names that do not map to one of `CHROMS` are returned unchanged.
pub fn canonicalize_chrom(chrom_map: &IndexMap<String, usize>, chrom: &str) -> String {
    chrom_map
        .get(&chrom.to_ascii_lowercase())
        .map(|&idx| CHROMS[idx].to_owned())
        .unwrap_or_else(|| chrom.to_owned())
}

/// Return the version of the `oncofhir-vcf` crate and `x.y.z` in tests.
pub fn worker_version() -> &'static str {
    if cfg!(test) {
        "x.y.z"
    } else {
        env!("CARGO_PKG_VERSION")
    }
}
