use std::{
    collections::HashSet,
    fs,
    path::{Path, PathBuf},
};

use tokio::sync::Mutex;

use crate::{domain::Key, errors::Error, Result};

/// In-memory set of keys that can still be redeemed.
///
/// Loaded once at startup and only ever shrinks. Consumption is not written
/// back, so a restart makes every key in the file redeemable again.
#[derive(Debug, Default)]
pub struct KeyCatalog {
    keys: Mutex<HashSet<Key>>,
}

impl KeyCatalog {
    pub fn new(keys: impl IntoIterator<Item = Key>) -> Self {
        Self {
            keys: Mutex::new(keys.into_iter().collect()),
        }
    }

    /// Read a JSON array of positive keys. Missing or malformed files are errors.
    pub fn load(path: &Path) -> Result<Self> {
        let txt = fs::read_to_string(path).map_err(|e| catalog_err(path, e))?;
        let keys: Vec<Key> = serde_json::from_str(&txt).map_err(|e| catalog_err(path, e))?;
        if keys.contains(&0) {
            return Err(catalog_err(path, "keys must be positive integers, found 0"));
        }
        Ok(Self::new(keys))
    }

    /// Remove `key` if present. Returns whether this call consumed it.
    ///
    /// Check and removal happen under one lock, so concurrent redemptions of
    /// the same key resolve to exactly one winner.
    pub async fn redeem(&self, key: Key) -> bool {
        self.keys.lock().await.remove(&key)
    }

    pub async fn contains(&self, key: Key) -> bool {
        self.keys.lock().await.contains(&key)
    }

    pub async fn remaining(&self) -> usize {
        self.keys.lock().await.len()
    }

    pub async fn snapshot(&self) -> HashSet<Key> {
        self.keys.lock().await.clone()
    }
}

fn catalog_err(path: &Path, e: impl std::fmt::Display) -> Error {
    Error::Catalog {
        path: PathBuf::from(path),
        reason: e.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[tokio::test]
    async fn load_deduplicates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("numbers.json");
        fs::write(&path, "[1001, 2002, 1001]").unwrap();

        let catalog = KeyCatalog::load(&path).unwrap();
        assert_eq!(catalog.remaining().await, 2);
        assert!(catalog.contains(1001).await);
        assert!(catalog.contains(2002).await);
    }

    #[test]
    fn load_missing_file_is_catalog_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = KeyCatalog::load(&dir.path().join("nope.json")).unwrap_err();
        assert!(matches!(err, Error::Catalog { .. }));
    }

    #[test]
    fn load_rejects_malformed_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("numbers.json");

        for bad in ["not json", "{\"a\": 1}", "[1, \"2\"]", "[-5]", "[1.5]"] {
            fs::write(&path, bad).unwrap();
            let err = KeyCatalog::load(&path).unwrap_err();
            assert!(matches!(err, Error::Catalog { .. }), "accepted {bad}");
        }
    }

    #[test]
    fn load_rejects_zero_key() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("numbers.json");
        fs::write(&path, "[1001, 0]").unwrap();

        let err = KeyCatalog::load(&path).unwrap_err();
        assert!(matches!(err, Error::Catalog { .. }));
    }

    #[tokio::test]
    async fn redeem_is_single_use() {
        let catalog = KeyCatalog::new([1001, 2002]);

        assert!(catalog.redeem(1001).await);
        assert!(!catalog.redeem(1001).await);
        assert_eq!(catalog.snapshot().await, HashSet::from([2002]));
    }

    #[tokio::test]
    async fn redeem_unknown_key_leaves_catalog_alone() {
        let catalog = KeyCatalog::new([1001]);
        assert!(!catalog.redeem(42).await);
        assert_eq!(catalog.remaining().await, 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_redemptions_have_one_winner() {
        let catalog = Arc::new(KeyCatalog::new([7]));

        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let catalog = catalog.clone();
                tokio::spawn(async move { catalog.redeem(7).await })
            })
            .collect();

        let mut wins = 0;
        for t in tasks {
            if t.await.unwrap() {
                wins += 1;
            }
        }
        assert_eq!(wins, 1);
        assert_eq!(catalog.remaining().await, 0);
    }
}
