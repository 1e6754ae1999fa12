//! Serialization of scan results to YAML or JSON.

use crate::scanner::ScanResult;
use anyhow::{Context, Result};
use log::debug;
use std::fs;
use std::path::Path;

/// Serializes a scan result to YAML.
pub fn serialize_yaml(result: &ScanResult) -> Result<String> {
    debug!("Serializing scan result to YAML");
    serde_yaml::to_string(result).context("Failed to serialize scan result to YAML")
}

/// Serializes a scan result to pretty-printed JSON.
///
/// This is the shape the documentation UI consumes.
pub fn serialize_json(result: &ScanResult) -> Result<String> {
    debug!("Serializing scan result to JSON");
    serde_json::to_string_pretty(result).context("Failed to serialize scan result to JSON")
}

/// Writes string content to a file, creating parent directories as needed.
pub fn write_to_file(content: &str, path: &Path) -> Result<()> {
    debug!("Writing content to file: {}", path.display());

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
    }

    fs::write(path, content)
        .with_context(|| format!("Failed to write to file: {}", path.display()))?;

    debug!("Successfully wrote {} bytes to {}", content.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::ScanStats;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn empty_result() -> ScanResult {
        ScanResult {
            groups: Vec::new(),
            stats: ScanStats {
                total_groups: 0,
                total_endpoints: 0,
                last_scan_timestamp: Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap(),
            },
        }
    }

    #[test]
    fn test_serialize_json() {
        let json = serialize_json(&empty_result()).unwrap();

        assert!(json.contains("\"groups\": []"));
        assert!(json.contains("\"totalGroups\": 0"));
        assert!(json.contains("2024-01-02T03:04:05Z"));
    }

    #[test]
    fn test_serialize_yaml() {
        let yaml = serialize_yaml(&empty_result()).unwrap();

        assert!(yaml.contains("groups: []"));
        assert!(yaml.contains("totalEndpoints: 0"));
    }

    #[test]
    fn test_json_round_trips() {
        let result = empty_result();
        let json = serialize_json(&result).unwrap();
        let back: ScanResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn test_write_to_file_creates_parents() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("out/docs/api.json");

        write_to_file("{}", &path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "{}");
    }
}
