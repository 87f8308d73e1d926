//! Device-local saved recipes.
//!
//! A JSON file mapping user id to the set of recipe ids that user saved.
//! Never synchronized with the server.

use std::collections::{BTreeMap, BTreeSet};
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use foodable_api_types::Id;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

use super::error::InfraError;

const SAVED_RECIPES_FILE_NAME: &str = "saved_recipes.json";

type SavedMap = BTreeMap<Id, BTreeSet<Id>>;

#[derive(Debug)]
pub struct SavedRecipeStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within the process.
    write_lock: Mutex<()>,
}

impl SavedRecipeStore {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(SAVED_RECIPES_FILE_NAME),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Saved recipe ids for `user_id`, ascending.
    pub async fn list(&self, user_id: Id) -> Result<Vec<Id>, InfraError> {
        Ok(self
            .read_all()
            .await?
            .remove(&user_id)
            .map(|ids| ids.into_iter().collect())
            .unwrap_or_default())
    }

    pub async fn contains(&self, user_id: Id, recipe_id: Id) -> Result<bool, InfraError> {
        Ok(self
            .read_all()
            .await?
            .get(&user_id)
            .is_some_and(|ids| ids.contains(&recipe_id)))
    }

    /// Flip the saved state of `recipe_id`; returns the new state.
    pub async fn toggle(&self, user_id: Id, recipe_id: Id) -> Result<bool, InfraError> {
        let _guard = self.write_lock.lock().await;
        let mut all = self.read_all().await?;
        let ids = all.entry(user_id).or_default();
        let saved = if ids.remove(&recipe_id) {
            false
        } else {
            ids.insert(recipe_id);
            true
        };
        if ids.is_empty() {
            all.remove(&user_id);
        }
        self.write_all(&all).await?;
        debug!(user_id, recipe_id, saved, "Saved recipe toggled");
        Ok(saved)
    }

    pub async fn clear_user(&self, user_id: Id) -> Result<(), InfraError> {
        let _guard = self.write_lock.lock().await;
        let mut all = self.read_all().await?;
        if all.remove(&user_id).is_some() {
            self.write_all(&all).await?;
        }
        Ok(())
    }

    async fn read_all(&self) -> Result<SavedMap, InfraError> {
        let raw = match fs::read(&self.path).await {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(SavedMap::new()),
            Err(err) => return Err(InfraError::Io(err)),
        };
        serde_json::from_slice(&raw).map_err(|err| {
            InfraError::storage(format!(
                "failed to parse {}: {err}",
                self.path.display()
            ))
        })
    }

    async fn write_all(&self, all: &SavedMap) -> Result<(), InfraError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }
        let encoded = serde_json::to_vec_pretty(all)
            .map_err(|err| InfraError::storage(format!("failed to encode saved recipes: {err}")))?;
        let staging = self.path.with_extension("json.tmp");
        fs::write(&staging, encoded).await?;
        fs::rename(&staging, &self.path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tempfile::tempdir;

    use super::*;

    #[tokio::test]
    async fn missing_file_is_empty() -> Result<(), InfraError> {
        let dir = tempdir()?;
        let store = SavedRecipeStore::new(dir.path());
        assert!(store.list(1).await?.is_empty());
        assert!(!store.contains(1, 5).await?);
        Ok(())
    }

    #[tokio::test]
    async fn toggle_is_scoped_per_user() -> Result<(), InfraError> {
        let dir = tempdir()?;
        let store = SavedRecipeStore::new(dir.path());

        assert!(store.toggle(1, 9).await?);
        assert!(store.toggle(1, 3).await?);
        assert!(store.toggle(2, 9).await?);
        assert_eq!(store.list(1).await?, vec![3, 9]);

        assert!(!store.toggle(1, 9).await?);
        assert_eq!(store.list(1).await?, vec![3]);
        assert!(store.contains(2, 9).await?);

        store.clear_user(2).await?;
        assert!(store.list(2).await?.is_empty());
        assert_eq!(store.list(1).await?, vec![3]);
        Ok(())
    }

    #[tokio::test]
    async fn survives_reopen() -> Result<(), InfraError> {
        let dir = tempdir()?;
        SavedRecipeStore::new(dir.path()).toggle(7, 1).await?;
        assert!(SavedRecipeStore::new(dir.path()).contains(7, 1).await?);
        assert!(!dir.path().join("saved_recipes.json.tmp").exists());
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_toggles_keep_every_write() -> Result<(), InfraError> {
        let dir = tempdir()?;
        let store = Arc::new(SavedRecipeStore::new(dir.path()));

        let toggles = (1..=8).map(|recipe_id| {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.toggle(4, recipe_id).await })
        });
        for toggle in futures::future::join_all(toggles).await {
            assert!(toggle.expect("join")?);
        }

        assert_eq!(store.list(4).await?, (1..=8).collect::<Vec<_>>());
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_file_is_a_storage_error() -> Result<(), InfraError> {
        let dir = tempdir()?;
        fs::write(dir.path().join(SAVED_RECIPES_FILE_NAME), "not json").await?;
        let err = SavedRecipeStore::new(dir.path())
            .list(1)
            .await
            .expect_err("corrupt file");
        assert!(matches!(err, InfraError::Storage { .. }));
        Ok(())
    }
}
