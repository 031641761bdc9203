use std::path::Path;
use std::str;

use anyhow::{Context, Result};
use rocksdb::{Options, DB};

use crate::storage::KeyValueStore;

/// RocksDB-backed persistent scope. Values are stored as UTF-8 strings under
/// the plain storage key so the layout matches what the dashboard reads.
pub struct RocksStore {
    db: DB,
}

impl RocksStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        std::fs::create_dir_all(path)
            .with_context(|| format!("Failed to create data dir at {}", path.display()))?;

        let mut opts = Options::default();
        opts.create_if_missing(true);
        let db = DB::open(&opts, path)
            .with_context(|| format!("Failed to open rocksdb at {}", path.display()))?;
        Ok(Self { db })
    }
}

impl KeyValueStore for RocksStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        match self.db.get(key)? {
            Some(bytes) => {
                let value = str::from_utf8(&bytes)
                    .with_context(|| format!("Non UTF-8 value under {key}"))?;
                Ok(Some(value.to_string()))
            }
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.db.put(key, value.as_bytes())?;
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.db.delete(key)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{read_json_or_default, write_json, DEVICES_KEY};

    #[test]
    fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = RocksStore::open(dir.path()).unwrap();
            write_json(&store, DEVICES_KEY, &vec![1, 2, 3]).unwrap();
        }

        let store = RocksStore::open(dir.path()).unwrap();
        let back: Vec<i32> = read_json_or_default(&store, DEVICES_KEY);
        assert_eq!(back, vec![1, 2, 3]);

        store.remove(DEVICES_KEY).unwrap();
        assert_eq!(store.get(DEVICES_KEY).unwrap(), None);
    }
}
