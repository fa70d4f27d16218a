//! Common, IO-related code.

use std::{
    fs::File,
    io::{BufRead, BufReader, BufWriter, Read, Write},
    path::Path,
};

use flate2::{bufread::MultiGzDecoder, write::GzEncoder, Compression};

/// Path value that selects stdin/stdout instead of a file.
pub const STDIO_PATH: &str = "-";

/// Transparently open a file with gzip decoder.
///
/// Reads from stdin if `path` is `-`.
pub fn open_read_maybe_gz<P>(path: P) -> Result<Box<dyn BufRead>, anyhow::Error>
where
    P: AsRef<Path>,
{
    if path.as_ref() == Path::new(STDIO_PATH) {
        tracing::trace!("Reading from stdin");
        Ok(Box::new(BufReader::new(std::io::stdin())))
    } else if path.as_ref().extension().map(|s| s.to_str()) == Some(Some("gz")) {
        tracing::trace!("Opening {:?} as gzip for reading", path.as_ref());
        let file = File::open(path)?;
        let bufreader = BufReader::new(file);
        let decoder = MultiGzDecoder::new(bufreader);
        Ok(Box::new(BufReader::new(decoder)))
    } else {
        tracing::trace!("Opening {:?} as plain text for reading", path.as_ref());
        let file = File::open(path)?;
        Ok(Box::new(BufReader::new(file)))
    }
}

/// Transparently open a file with gzip encoder.
///
/// Writes to stdout if `path` is `-`.
pub fn open_write_maybe_gz<P>(path: P) -> Result<Box<dyn Write>, anyhow::Error>
where
    P: AsRef<Path>,
{
    if path.as_ref() == Path::new(STDIO_PATH) {
        tracing::trace!("Writing to stdout");
        Ok(Box::new(BufWriter::new(std::io::stdout())))
    } else if path.as_ref().extension().map(|s| s.to_str()) == Some(Some("gz")) {
        tracing::trace!("Opening {:?} as gzip for writing", path.as_ref());
        let file = File::create(path)?;
        let bufwriter = BufWriter::new(file);
        let encoder = GzEncoder::new(bufwriter, Compression::default());
        Ok(Box::new(encoder))
    } else {
        tracing::trace!("Opening {:?} as plain text for writing", path.as_ref());
        let file = File::create(path)?;
        Ok(Box::new(BufWriter::new(file)))
    }
}

/// Read the whole (maybe gzip-compressed) file at `path` into a string.
pub fn read_to_string_maybe_gz<P>(path: P) -> Result<String, anyhow::Error>
where
    P: AsRef<Path>,
{
    let mut reader = open_read_maybe_gz(path.as_ref()).map_err(|e| {
        anyhow::anyhow!("could not open input file {:?}: {}", path.as_ref(), e)
    })?;
    let mut text = String::new();
    reader
        .read_to_string(&mut text)
        .map_err(|e| anyhow::anyhow!("could not read input file {:?}: {}", path.as_ref(), e))?;
    Ok(text)
}

#[cfg(test)]
mod test {
    use std::io::{Read, Write};

    use pretty_assertions::assert_eq;

    #[rstest::rstest]
    #[case("test.txt")]
    #[case("test.txt.gz")]
    fn write_then_read_maybe_gz(#[case] filename: &str) -> Result<(), anyhow::Error> {
        let tmp_dir = temp_testdir::TempDir::default();

        {
            let mut f = super::open_write_maybe_gz(tmp_dir.join(filename))?;
            f.write_all(b"#CHROM\tPOS\n1\t100\n")?;
            f.flush()?;
        }

        let text = super::read_to_string_maybe_gz(tmp_dir.join(filename))?;
        assert_eq!(text, "#CHROM\tPOS\n1\t100\n");

        Ok(())
    }

    #[test]
    fn gzip_output_is_compressed() -> Result<(), anyhow::Error> {
        let tmp_dir = temp_testdir::TempDir::default();
        let path = tmp_dir.join("out.json.gz");

        {
            let mut f = super::open_write_maybe_gz(&path)?;
            f.write_all(b"{}")?;
        }

        let mut buf = Vec::new();
        std::fs::File::open(&path)?.read_to_end(&mut buf)?;
        assert_eq!(&buf[..2], &[0x1f, 0x8b]);

        Ok(())
    }

    #[test]
    fn read_missing_file_fails() {
        let tmp_dir = temp_testdir::TempDir::default();

        assert!(super::read_to_string_maybe_gz(tmp_dir.join("missing.vcf")).is_err());
    }
}
