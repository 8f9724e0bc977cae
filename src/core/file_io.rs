use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::digits::formatter::DigitString;
use crate::error::{DigitsError, Result};

/// Falls back to `"digits"` when the path has no usable file stem.
pub fn extract_base_name(path: &str) -> &str {
    Path::new(path)
        .file_stem() // Get the base name component of the path
        .and_then(|name| name.to_str())
        .unwrap_or("digits")
}

/// `out/<project>/<params base name>[/<date time>]`, created if missing.
pub fn build_output_path_with_date_time(
    params_path: &str,
    project: &str,
    datetime: &Option<String>,
) -> std::io::Result<PathBuf> {
    let mut dirs = vec!["out", project, extract_base_name(params_path)];
    if let Some(inner_datetime_str) = datetime {
        dirs.push(inner_datetime_str);
    }

    let directory_path: PathBuf = dirs.iter().collect();
    std::fs::create_dir_all(&directory_path)?;
    Ok(directory_path)
}

pub fn date_time_string() -> String {
    use chrono::{Datelike, Local, Timelike};
    let local_time = Local::now();
    format!(
        "{:04}{:02}{:02}_{:02}{:02}{:02}",
        local_time.year(),
        local_time.month(),
        local_time.day(),
        local_time.hour(),
        local_time.minute(),
        local_time.second()
    )
}

pub fn maybe_date_time_string(enable: bool) -> Option<String> {
    if enable {
        Some(date_time_string())
    } else {
        None
    }
}

/**
 * Store a path and prefix together, so that the digits, the parameters, the
 * report and the diagnostics of one run all land next to each other.
 */
pub struct FilePrefix {
    pub directory_path: PathBuf,
    pub file_base: String,
}

impl FilePrefix {
    pub fn with_suffix(&self, suffix: &str) -> PathBuf {
        self.directory_path.join(self.file_base.clone() + suffix)
    }

    pub fn create_file_with_suffix(
        &self,
        suffix: &str,
    ) -> std::io::Result<std::io::BufWriter<std::fs::File>> {
        let file = std::fs::File::create(self.with_suffix(suffix))?;
        Ok(std::io::BufWriter::new(file))
    }
}

/// Persist the digit string exactly, with no trailing newline.
pub fn write_digit_string(path: &Path, digits: &DigitString) -> std::io::Result<()> {
    let mut writer = std::io::BufWriter::new(std::fs::File::create(path)?);
    writer.write_all(digits.as_str().as_bytes())?;
    writer.flush()
}

/// Read a persisted digit string, trimmed of surrounding whitespace.
pub fn read_persisted_digits(path: &Path) -> Result<String> {
    let missing = |source: std::io::Error| DigitsError::MissingArtifact {
        path: path.to_path_buf(),
        source,
    };
    let mut contents = String::new();
    std::fs::File::open(path)
        .and_then(|mut file| file.read_to_string(&mut contents))
        .map_err(missing)?;
    Ok(contents.trim().to_owned())
}

pub fn serialize_to_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let writer = std::io::BufWriter::new(std::fs::File::create(path)?);
    serde_json::to_writer_pretty(writer, value)?;
    Ok(())
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

pub fn compute_file_hash(path: &Path) -> std::io::Result<String> {
    let mut buffer = Vec::new();
    std::fs::File::open(path)?.read_to_end(&mut buffer)?;
    Ok(sha256_hex(&buffer))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::digits::common::DecimalPlaces;
    use crate::digits::formatter::format_fixed;
    use std::str::FromStr;

    #[test]
    fn test_extract_base_name() {
        assert_eq!(extract_base_name("demos/sqrt2_10k.json"), "sqrt2_10k");
        assert_eq!(extract_base_name("plain"), "plain");
        assert_eq!(extract_base_name(""), "digits");
    }

    #[test]
    fn test_write_then_read_trims_whitespace() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("digits.txt");
        let value = bigdecimal::BigDecimal::from_str("1.41421356").unwrap();
        let digits = format_fixed(&value, DecimalPlaces::from(5));

        write_digit_string(&path, &digits).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "1.41421");

        std::fs::write(&path, "  1.41421\n").unwrap();
        assert_eq!(read_persisted_digits(&path).unwrap(), "1.41421");
    }

    #[test]
    fn test_missing_artifact() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("does_not_exist.txt");
        match read_persisted_digits(&path) {
            Err(DigitsError::MissingArtifact { path: reported, .. }) => assert_eq!(reported, path),
            other => panic!("expected MissingArtifact, got {:?}", other),
        }
    }

    #[test]
    fn test_sha256_hex() {
        assert_eq!(
            sha256_hex(b"1.4"),
            "1a948f1b4374f4e3f02501c7feb43784021718a93c1ed5f9f19adf357bb2d20e"
        );
    }

    #[test]
    fn test_file_prefix_suffixes() {
        let dir = tempfile::tempdir().unwrap();
        let prefix = FilePrefix {
            directory_path: dir.path().to_path_buf(),
            file_base: "run".to_owned(),
        };
        assert_eq!(prefix.with_suffix("_report.json"), dir.path().join("run_report.json"));

        let mut writer = prefix.create_file_with_suffix(".txt").unwrap();
        writer.write_all(b"1").unwrap();
        writer.flush().unwrap();
        assert_eq!(compute_file_hash(&prefix.with_suffix(".txt")).unwrap(), sha256_hex(b"1"));
    }
}
