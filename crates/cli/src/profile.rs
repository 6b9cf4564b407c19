//! JSON persistence for user profiles.
//!
//! One pretty-printed file per user: `<dir>/user_<id>.json`.

use anyhow::{Context, Result};
use data_loader::{UserId, UserProfile};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Directory of saved profiles
pub struct ProfileStore {
    dir: PathBuf,
}

impl ProfileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, user_id: UserId) -> PathBuf {
        self.dir.join(format!("user_{}.json", user_id))
    }

    /// Load a profile, or start a fresh one if the user has none yet
    pub fn load(&self, user_id: UserId) -> Result<UserProfile> {
        let path = self.path_for(user_id);
        let contents = match fs::read_to_string(&path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                info!("No saved profile for user {}, starting fresh", user_id);
                return Ok(UserProfile::new(user_id));
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read profile {}", path.display()))
            }
        };

        let mut profile: UserProfile = serde_json::from_str(&contents)
            .with_context(|| format!("Malformed profile {}", path.display()))?;
        // The file name decides whose profile this is
        profile.user_id = user_id;

        debug!(
            "Loaded profile for user {} ({} favorites, {} ratings)",
            user_id,
            profile.favorites.len(),
            profile.ratings.len()
        );
        Ok(profile)
    }

    /// Write the profile, creating the directory if needed
    pub fn save(&self, profile: &UserProfile) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("Failed to create {}", self.dir.display()))?;

        let path = self.path_for(profile.user_id);
        let json = serde_json::to_string_pretty(profile)?;
        fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;

        debug!("Saved profile to {}", path.display());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_loader::GenreFilters;
    use tempfile::TempDir;

    #[test]
    fn test_missing_profile_is_fresh() {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::new(dir.path());

        let profile = store.load(42).unwrap();

        assert_eq!(profile, UserProfile::new(42));
    }

    #[test]
    fn test_save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::new(dir.path().join("nested"));

        let mut profile = UserProfile::new(3);
        profile.favorites.push("Heat (1995)".to_string());
        profile.filters = GenreFilters::new(&["Action"], &["Horror"]);
        profile.ratings.insert(6, 4.5);

        let path = store.save(&profile).unwrap();
        assert!(path.ends_with("user_3.json"));
        assert_eq!(store.load(3).unwrap(), profile);
    }

    #[test]
    fn test_missing_fields_default() {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::new(dir.path());
        fs::write(store.path_for(9), r#"{"user_id": 9, "favorites": ["Up (2009)"]}"#).unwrap();

        let profile = store.load(9).unwrap();

        assert_eq!(profile.favorites, vec!["Up (2009)".to_string()]);
        assert!(profile.ratings.is_empty());
        assert!(profile.history.is_empty());
    }

    #[test]
    fn test_malformed_profile_is_error() {
        let dir = TempDir::new().unwrap();
        let store = ProfileStore::new(dir.path());
        fs::write(store.path_for(1), "not json").unwrap();

        assert!(store.load(1).is_err());
    }
}
