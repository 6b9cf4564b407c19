//! Session export: a snapshot of the profile and the latest recommendations.

use anyhow::{Context, Result};
use chrono::Local;
use data_loader::{GenreFilters, UserId, UserProfile};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Current local time as RFC 3339
pub fn timestamp_now() -> String {
    Local::now().to_rfc3339()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionExport {
    pub user_id: UserId,
    pub favorites: Vec<String>,
    pub filters: GenreFilters,
    /// Recommended titles, best first
    pub recommendations: Vec<String>,
    pub timestamp: String,
}

impl SessionExport {
    pub fn new(profile: &UserProfile, recommendations: Vec<String>) -> Self {
        Self {
            user_id: profile.user_id,
            favorites: profile.favorites.clone(),
            filters: profile.filters.clone(),
            recommendations,
            timestamp: timestamp_now(),
        }
    }

    /// Write as pretty JSON to `<dir>/<file_name>`
    pub fn write(&self, dir: &Path, file_name: &str) -> Result<PathBuf> {
        fs::create_dir_all(dir).with_context(|| format!("Failed to create {}", dir.display()))?;

        let path = dir.join(file_name);
        let json = serde_json::to_string_pretty(self)?;
        fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;
    use tempfile::TempDir;

    #[test]
    fn test_export_contents() {
        let dir = TempDir::new().unwrap();
        let mut profile = UserProfile::new(5);
        profile.favorites.push("Heat (1995)".to_string());
        profile.filters = GenreFilters::new(&["Action"], &[]);

        let export = SessionExport::new(&profile, vec!["GoldenEye (1995)".to_string()]);
        let path = export.write(dir.path(), "session.json").unwrap();

        let written: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(written["user_id"], 5);
        assert_eq!(written["favorites"][0], "Heat (1995)");
        assert_eq!(written["filters"]["include"][0], "Action");
        assert_eq!(written["recommendations"][0], "GoldenEye (1995)");
        assert!(DateTime::parse_from_rfc3339(written["timestamp"].as_str().unwrap()).is_ok());
    }

    #[test]
    fn test_non_ascii_titles_survive() {
        let dir = TempDir::new().unwrap();
        let export = SessionExport::new(&UserProfile::new(1), vec!["Amélie (2001)".to_string()]);

        let path = export.write(dir.path(), "out.txt").unwrap();
        let read: SessionExport = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();

        assert_eq!(read, export);
    }
}
