//! YAML file loading.
//!
//! A stream may hold several `---` separated documents; every loader returns
//! them all, in order, so the caller can pick one by index.

use crate::document::parser::parse_yaml_documents;
use crate::document::tree::YamlTree;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Loads and parses a YAML file from the filesystem.
///
/// Files ending in `.gz` are decompressed first.
///
/// # Examples
///
/// ```no_run
/// use yamlnav::file::loader::load_yaml_file;
///
/// let documents = load_yaml_file("config.yaml").unwrap();
/// println!("{} document(s)", documents.len());
/// ```
///
/// # Errors
///
/// This function will return an error if:
/// - The file cannot be read (missing, permissions, etc.)
/// - A `.gz` file is not valid gzip
/// - The contents are not valid YAML
pub fn load_yaml_file<P: AsRef<Path>>(path: P) -> Result<Vec<YamlTree>> {
    let path_ref = path.as_ref();

    let is_gzipped = path_ref
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext == "gz")
        .unwrap_or(false);

    let content = if is_gzipped {
        read_gzipped_file(path_ref)?
    } else {
        fs::read_to_string(path_ref)
            .with_context(|| format!("Failed to read file: {}", path_ref.display()))?
    };

    log::debug!("loaded {} bytes from {}", content.len(), path_ref.display());
    parse_yaml_documents(&content)
        .with_context(|| format!("Failed to parse YAML in {}", path_ref.display()))
}

/// Loads and parses YAML from standard input.
///
/// Gzip input is detected by its magic bytes and decompressed.
pub fn load_yaml_from_stdin() -> Result<Vec<YamlTree>> {
    use std::io::{self, Read};

    let mut buffer = Vec::new();
    io::stdin()
        .read_to_end(&mut buffer)
        .context("Failed to read from stdin")?;
    load_yaml_bytes(&buffer).context("Failed to parse YAML from stdin")
}

/// Parses raw bytes as YAML, decompressing gzip data first.
pub fn load_yaml_bytes(bytes: &[u8]) -> Result<Vec<YamlTree>> {
    // gzip magic bytes
    let content = if bytes.starts_with(&[0x1f, 0x8b]) {
        decompress_gzip_bytes(bytes)?
    } else {
        String::from_utf8(bytes.to_vec()).context("Invalid UTF-8 in input")?
    };
    parse_yaml_documents(&content)
}

/// Reads and decompresses a gzipped file.
fn read_gzipped_file<P: AsRef<Path>>(path: P) -> Result<String> {
    use flate2::read::GzDecoder;
    use std::io::Read;

    let file = fs::File::open(path).context("Failed to open gzipped file")?;
    let mut decoder = GzDecoder::new(file);
    let mut content = String::new();
    decoder
        .read_to_string(&mut content)
        .context("Failed to decompress gzipped file - file may be corrupted")?;
    Ok(content)
}

fn decompress_gzip_bytes(bytes: &[u8]) -> Result<String> {
    use flate2::read::GzDecoder;
    use std::io::Read;

    let mut decoder = GzDecoder::new(bytes);
    let mut content = String::new();
    decoder
        .read_to_string(&mut content)
        .context("Failed to decompress gzipped input")?;
    Ok(content)
}
