//! YAML file saving.
//!
//! Writes go to a temporary file that is then renamed over the target, so a
//! crash never leaves a half-written file behind.

use crate::config::Config;
use crate::document::emitter::emit_documents;
use crate::document::parser::parse_yaml_documents;
use crate::document::tree::YamlTree;
use anyhow::{Context, Result};
use std::fs;
use std::path::Path;

/// Creates a backup of a file by copying it with a .bak extension.
fn create_backup<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    let mut backup_path = path.to_path_buf();
    let original_name = backup_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| anyhow::anyhow!("Invalid file name"))?;
    backup_path.set_file_name(format!("{}.bak", original_name));
    fs::copy(path, &backup_path).context("Failed to create backup")?;
    log::debug!("backed up {} to {}", path.display(), backup_path.display());
    Ok(())
}

/// Saves documents to a file, gzip-compressed when the name ends in `.gz`.
///
/// # Examples
///
/// ```no_run
/// use yamlnav::config::Config;
/// use yamlnav::document::parser::parse_yaml;
/// use yamlnav::file::saver::save_yaml_file;
///
/// let tree = parse_yaml("name: Alice").unwrap();
/// save_yaml_file("output.yaml", &[tree], &Config::default()).unwrap();
/// ```
///
/// # Errors
///
/// This function will return an error if:
/// - Backup creation fails (if requested)
/// - The emitted YAML does not parse back
/// - Writing or renaming the temp file fails
pub fn save_yaml_file<P: AsRef<Path>>(path: P, documents: &[YamlTree], config: &Config) -> Result<()> {
    let path = path.as_ref();
    let should_compress = path.to_string_lossy().ends_with(".gz");

    if config.create_backup && path.exists() {
        create_backup(path)?;
    }

    let yaml = emit_documents(documents, config.indent_size);

    // Catch emitter bugs before they reach the user's file
    let reparsed = parse_yaml_documents(&yaml)
        .context("Generated invalid YAML - this is a bug in yamlnav's emitter")?;
    if reparsed.len() != documents.len() {
        anyhow::bail!(
            "Generated YAML has {} document(s), expected {}",
            reparsed.len(),
            documents.len()
        );
    }

    write_file_atomic(path, yaml.as_bytes(), should_compress)
}

/// Writes data to a file atomically, optionally compressing with gzip.
fn write_file_atomic<P: AsRef<Path>>(path: P, data: &[u8], compress: bool) -> Result<()> {
    use flate2::write::GzEncoder;
    use flate2::Compression;
    use std::io::Write;

    let path = path.as_ref();
    let temp_path = path.with_extension("tmp");

    if compress {
        let file = fs::File::create(&temp_path).context("Failed to create temp file")?;
        let mut encoder = GzEncoder::new(file, Compression::default());
        encoder
            .write_all(data)
            .context("Failed to write compressed data")?;
        encoder.finish().context("Failed to finish compression")?;
    } else {
        fs::write(&temp_path, data).context("Failed to write temp file")?;
    }

    fs::rename(&temp_path, path).context("Failed to rename temp file")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::parser::parse_yaml;
    use tempfile::TempDir;

    #[test]
    fn test_write_file_atomic_uncompressed() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("out.yaml");

        write_file_atomic(&target, b"a: 1\n", false).unwrap();

        assert_eq!(fs::read_to_string(&target).unwrap(), "a: 1\n");
        assert!(!dir.path().join("out.tmp").exists());
    }

    #[test]
    fn test_backup_only_when_enabled() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("data.yaml");
        fs::write(&target, "old: true\n").unwrap();
        let tree = parse_yaml("new: true").unwrap();

        save_yaml_file(&target, std::slice::from_ref(&tree), &Config::default()).unwrap();
        assert!(!dir.path().join("data.yaml.bak").exists());

        let config = Config {
            create_backup: true,
            ..Config::default()
        };
        save_yaml_file(&target, &[tree], &config).unwrap();
        assert_eq!(
            fs::read_to_string(dir.path().join("data.yaml.bak")).unwrap(),
            "new: true\n"
        );
    }
}
