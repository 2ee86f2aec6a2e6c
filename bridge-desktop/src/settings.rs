//! Key-Value Storage using SQLite

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    storage::SettingsStore,
};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions},
    Row,
};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tokio::sync::OnceCell;
use tracing::debug;

const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS kv_store (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL,
        updated_at INTEGER NOT NULL
    )
"#;

/// SQLite-backed key-value store implementation
///
/// Provides persistent string storage for the core's local collections and
/// preferences. Each call is an independent statement; there is no
/// cross-call transaction.
pub struct SqliteSettingsStore {
    pool: SqlitePool,
    schema: OnceCell<()>,
}

impl SqliteSettingsStore {
    /// Create a new store with the given database path
    pub async fn new(db_path: PathBuf) -> Result<Self> {
        let store = Self::open_lazy(&db_path)?;
        store.ensure_schema().await?;
        debug!(path = ?db_path, "Initialized key-value store");
        Ok(store)
    }

    /// Open a store without touching the database yet
    ///
    /// Usable outside an async context: the first connection and the table
    /// are created on first use.
    pub fn open_lazy(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent).map_err(BridgeError::Io)?;
        }

        // SQLite URLs want forward slashes, even on Windows
        let path_str = db_path.to_string_lossy().replace('\\', "/");
        let options = SqliteConnectOptions::from_str(&format!("sqlite://{}", path_str))
            .map_err(|e| BridgeError::Storage(format!("Invalid database path: {}", e)))?
            .create_if_missing(true);

        // No idle/lifetime reaper, so no runtime is needed to build the pool
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_lazy_with(options);

        Ok(Self {
            pool,
            schema: OnceCell::new(),
        })
    }

    /// Default database location: `<data_dir>/fleet-yard/storage.db`
    pub fn default_path() -> Result<PathBuf> {
        let base = dirs::data_dir().ok_or_else(|| {
            BridgeError::NotAvailable("No platform data directory available".to_string())
        })?;
        Ok(base.join("fleet-yard").join("storage.db"))
    }

    /// Create a store under the platform data directory
    pub async fn in_data_dir() -> Result<Self> {
        Self::new(Self::default_path()?).await
    }

    /// Create an in-memory store (for testing)
    ///
    /// The pool is pinned to a single long-lived connection: every SQLite
    /// in-memory connection sees its own database.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| BridgeError::Storage(format!("Failed to connect to DB: {}", e)))?;

        let store = Self {
            pool,
            schema: OnceCell::new(),
        };
        store.ensure_schema().await?;
        Ok(store)
    }

    async fn ensure_schema(&self) -> Result<()> {
        self.schema
            .get_or_try_init(|| async {
                sqlx::query(CREATE_TABLE)
                    .execute(&self.pool)
                    .await
                    .map(|_| ())
                    .map_err(|e| BridgeError::Storage(format!("Failed to create table: {}", e)))
            })
            .await?;
        Ok(())
    }

    fn now() -> i64 {
        chrono::Utc::now().timestamp()
    }
}

#[async_trait]
impl SettingsStore for SqliteSettingsStore {
    async fn set_string(&self, key: &str, value: &str) -> Result<()> {
        self.ensure_schema().await?;
        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?, ?, ?)
            ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(Self::now())
        .execute(&self.pool)
        .await
        .map_err(|e| BridgeError::Storage(format!("Failed to set value: {}", e)))?;

        debug!(key = key, bytes = value.len(), "Stored value");
        Ok(())
    }

    async fn get_string(&self, key: &str) -> Result<Option<String>> {
        self.ensure_schema().await?;
        let row = sqlx::query("SELECT value FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| BridgeError::Storage(format!("Failed to get value: {}", e)))?;

        Ok(row.map(|row| row.get(0)))
    }

    async fn delete(&self, key: &str) -> Result<()> {
        self.ensure_schema().await?;
        sqlx::query("DELETE FROM kv_store WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await
            .map_err(|e| BridgeError::Storage(format!("Failed to delete value: {}", e)))?;

        debug!(key = key, "Deleted value");
        Ok(())
    }

    async fn has_key(&self, key: &str) -> Result<bool> {
        self.ensure_schema().await?;
        let row = sqlx::query("SELECT 1 FROM kv_store WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| BridgeError::Storage(format!("Failed to check key: {}", e)))?;

        Ok(row.is_some())
    }

    async fn list_keys(&self) -> Result<Vec<String>> {
        self.ensure_schema().await?;
        let rows = sqlx::query("SELECT key FROM kv_store ORDER BY key")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| BridgeError::Storage(format!("Failed to list keys: {}", e)))?;

        Ok(rows.into_iter().map(|row| row.get(0)).collect())
    }

    async fn clear_all(&self) -> Result<()> {
        self.ensure_schema().await?;
        sqlx::query("DELETE FROM kv_store")
            .execute(&self.pool)
            .await
            .map_err(|e| BridgeError::Storage(format!("Failed to clear store: {}", e)))?;

        debug!("Cleared key-value store");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_string_operations() {
        let store = SqliteSettingsStore::in_memory().await.unwrap();

        store.set_string("@motos", "[]").await.unwrap();
        assert_eq!(
            store.get_string("@motos").await.unwrap(),
            Some("[]".to_string())
        );

        store.set_string("@motos", "[{\"id\":\"1\"}]").await.unwrap();
        assert_eq!(
            store.get_string("@motos").await.unwrap(),
            Some("[{\"id\":\"1\"}]".to_string())
        );

        store.delete("@motos").await.unwrap();
        assert_eq!(store.get_string("@motos").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_missing_key_is_ok() {
        let store = SqliteSettingsStore::in_memory().await.unwrap();
        store.delete("missing").await.unwrap();
        assert!(!store.has_key("missing").await.unwrap());
    }

    #[tokio::test]
    async fn test_list_and_clear() {
        let store = SqliteSettingsStore::in_memory().await.unwrap();

        store.set_string("@vagas", "[]").await.unwrap();
        store.set_string("@language", "pt-BR").await.unwrap();

        let keys = store.list_keys().await.unwrap();
        assert_eq!(keys, vec!["@language", "@vagas"]);

        store.clear_all().await.unwrap();
        assert!(store.list_keys().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_file_backed_store_persists() {
        let dir = std::env::temp_dir().join(format!("fleet-kv-{}", uuid::Uuid::new_v4()));
        let path = dir.join("storage.db");

        {
            let store = SqliteSettingsStore::new(path.clone()).await.unwrap();
            store.set_string("@theme_mode", "dark").await.unwrap();
        }

        let reopened = SqliteSettingsStore::new(path).await.unwrap();
        assert_eq!(
            reopened.get_string("@theme_mode").await.unwrap(),
            Some("dark".to_string())
        );

        let _ = std::fs::remove_dir_all(dir);
    }

    #[tokio::test]
    async fn test_lazy_store_creates_schema_on_first_use() {
        let dir = std::env::temp_dir().join(format!("fleet-kv-{}", uuid::Uuid::new_v4()));
        let store = SqliteSettingsStore::open_lazy(&dir.join("storage.db")).unwrap();

        assert_eq!(store.get_string("@language").await.unwrap(), None);
        store.set_string("@language", "es").await.unwrap();
        assert!(store.has_key("@language").await.unwrap());

        let _ = std::fs::remove_dir_all(dir);
    }
}
