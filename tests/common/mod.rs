//! Temp SQLite files shared by the integration tests.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tokio::fs;

/// A fresh `sqlite:` url under the temp dir, unique per call and `tag`.
pub fn temp_database(tag: &str) -> (String, PathBuf) {
    let mut hasher = DefaultHasher::new();
    SystemTime::now().hash(&mut hasher);
    tag.hash(&mut hasher);
    let db_path = std::env::temp_dir().join(format!("modelbook_{tag}_{}.sqlite", hasher.finish()));
    let database_url = format!("sqlite:{}", db_path.to_str().unwrap());
    (database_url, db_path)
}

/// Remove the database file along with its WAL and SHM siblings.
pub async fn remove_database(db_path: &Path) {
    let wal_path = PathBuf::from(format!("{}-wal", db_path.to_string_lossy()));
    let shm_path = PathBuf::from(format!("{}-shm", db_path.to_string_lossy()));
    let _ = fs::remove_file(&wal_path).await;
    let _ = fs::remove_file(&shm_path).await;
    let _ = fs::remove_file(db_path).await;
}
