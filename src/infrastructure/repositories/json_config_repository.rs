use async_trait::async_trait;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::domain::entities::guild_config::{GuildConfig, GuildConfigPatch};
use crate::domain::repositories::config_repository::{
    GuildConfigMap, GuildConfigRepository, RepositoryError,
};

/// Per-guild settings in one JSON object keyed by guild id.
///
/// Every read goes to disk. Updates are a full read-modify-write of the file,
/// serialized through `write_lock` so two guilds updating at once cannot
/// overwrite each other's changes.
pub struct JsonGuildConfigRepository {
    file_path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonGuildConfigRepository {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
            write_lock: Mutex::new(()),
        }
    }

    fn load_data(file_path: &Path) -> Result<GuildConfigMap, RepositoryError> {
        if !file_path.exists() {
            return Ok(GuildConfigMap::new());
        }

        let content = fs::read_to_string(file_path)?;
        let data: GuildConfigMap = serde_json::from_str(&content)?;
        Ok(data)
    }

    fn read_or_empty(&self) -> GuildConfigMap {
        match Self::load_data(&self.file_path) {
            Ok(data) => data,
            Err(e) => {
                warn!(
                    path = %self.file_path.display(),
                    "Config file is corrupt, treating it as empty: {}", e
                );
                GuildConfigMap::new()
            }
        }
    }

    fn save_data(&self, data: &GuildConfigMap) -> Result<(), RepositoryError> {
        let mut json = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut json, formatter);
        data.serialize(&mut serializer)?;

        if let Some(parent) = self.file_path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        // rename over the old file so a failed write leaves it intact
        let tmp_path = self.file_path.with_extension("json.tmp");
        fs::write(&tmp_path, &json)?;
        fs::rename(&tmp_path, &self.file_path)?;
        Ok(())
    }
}

#[async_trait]
impl GuildConfigRepository for JsonGuildConfigRepository {
    async fn load(&self) -> GuildConfigMap {
        self.read_or_empty()
    }

    async fn update_guild_config(
        &self,
        guild_id: u64,
        patch: GuildConfigPatch,
    ) -> Result<GuildConfig, RepositoryError> {
        let _guard = self.write_lock.lock().await;

        let mut data = self.read_or_empty();
        let entry = data.entry(guild_id).or_default();
        entry.apply(patch);
        let updated = entry.clone();

        self.save_data(&data)?;
        debug!(guild_id, "Guild config saved");
        Ok(updated)
    }
}

impl std::fmt::Debug for JsonGuildConfigRepository {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JsonGuildConfigRepository")
            .field("file_path", &self.file_path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn repo_in(dir: &tempfile::TempDir) -> JsonGuildConfigRepository {
        JsonGuildConfigRepository::new(dir.path().join("config.json"))
    }

    #[tokio::test]
    async fn missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repo_in(&dir);

        assert!(repo.load().await.is_empty());
        assert_eq!(repo.get_guild_config(1).await, GuildConfig::default());
    }

    #[tokio::test]
    async fn corrupt_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();
        let repo = JsonGuildConfigRepository::new(&path);

        assert!(repo.load().await.is_empty());
    }

    #[tokio::test]
    async fn corrupt_file_is_replaced_on_update() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, "[1, 2").unwrap();
        let repo = JsonGuildConfigRepository::new(&path);

        repo.update_guild_config(9, GuildConfigPatch::channel(3))
            .await
            .unwrap();

        assert_eq!(repo.get_guild_config(9).await.channel_id, Some(3));
    }

    #[tokio::test]
    async fn channel_update_keeps_roles() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repo_in(&dir);

        repo.update_guild_config(42, GuildConfigPatch::roles(vec![10, 20]))
            .await
            .unwrap();
        repo.update_guild_config(42, GuildConfigPatch::channel(777))
            .await
            .unwrap();

        let config = repo.get_guild_config(42).await;
        assert_eq!(config.channel_id, Some(777));
        assert_eq!(config.role_ids, vec![10, 20]);
    }

    #[tokio::test]
    async fn role_update_replaces_list() {
        let dir = tempfile::tempdir().unwrap();
        let repo = repo_in(&dir);

        repo.update_guild_config(42, GuildConfigPatch::roles(vec![1, 2, 3]))
            .await
            .unwrap();
        repo.update_guild_config(42, GuildConfigPatch::roles(vec![4]))
            .await
            .unwrap();

        assert_eq!(repo.get_guild_config(42).await.role_ids, vec![4]);
    }

    #[tokio::test]
    async fn file_layout_uses_string_guild_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let repo = JsonGuildConfigRepository::new(&path);

        repo.update_guild_config(123, GuildConfigPatch::channel(456))
            .await
            .unwrap();

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["123"]["channel_id"], 456);
        assert_eq!(raw["123"]["role_ids"], serde_json::json!([]));
    }

    #[tokio::test]
    async fn reads_existing_file_written_elsewhere() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        fs::write(&path, r#"{"5": {"channel_id": 7}, "6": {"role_ids": [1, 2]}}"#).unwrap();
        let repo = JsonGuildConfigRepository::new(&path);

        assert_eq!(repo.get_guild_config(5).await.channel_id, Some(7));
        assert_eq!(repo.get_guild_config(6).await.role_ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn concurrent_updates_for_different_guilds_are_not_lost() {
        let dir = tempfile::tempdir().unwrap();
        let repo = Arc::new(repo_in(&dir));

        let mut handles = Vec::new();
        for guild_id in 1..=20u64 {
            let repo = repo.clone();
            handles.push(tokio::spawn(async move {
                repo.update_guild_config(guild_id, GuildConfigPatch::channel(guild_id * 10))
                    .await
                    .unwrap();
            }));
        }
        for handle in handles {
            handle.await.unwrap();
        }

        let data = repo.load().await;
        assert_eq!(data.len(), 20);
        assert_eq!(data[&7].channel_id, Some(70));
    }
}
