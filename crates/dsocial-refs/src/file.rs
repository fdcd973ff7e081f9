//! JSON-file backed reference store.
//!
//! All refs live in a single `refs.json` document inside a state directory.
//! Every write rewrites the document through a temporary file in the same
//! directory followed by a rename, so readers never observe a half-written
//! file. The document is re-read on every call, so separate processes
//! sharing the directory see each other's writes.

use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use dsocial_types::ContentHash;
use tracing::debug;

use crate::error::{RefError, Result};
use crate::names::validate_ref_name;
use crate::traits::RefStore;

/// File name of the refs document inside the state directory.
pub const REFS_FILE: &str = "refs.json";

type RefMap = BTreeMap<String, ContentHash>;

/// A [`RefStore`] persisted to `<state_dir>/refs.json`.
#[derive(Debug)]
pub struct FileRefStore {
    dir: PathBuf,
    write_lock: Mutex<()>,
}

impl FileRefStore {
    /// Open (and create if needed) the state directory.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        Ok(Self {
            dir,
            write_lock: Mutex::new(()),
        })
    }

    /// Path of the refs document.
    pub fn path(&self) -> PathBuf {
        self.dir.join(REFS_FILE)
    }

    fn load(&self) -> Result<RefMap> {
        match fs::read(self.path()) {
            Ok(data) => serde_json::from_slice(&data)
                .map_err(|e| RefError::Serialization(format!("{}: {e}", self.path().display()))),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(RefMap::new()),
            Err(e) => Err(e.into()),
        }
    }

    fn save(&self, refs: &RefMap) -> Result<()> {
        let data = serde_json::to_vec_pretty(refs)
            .map_err(|e| RefError::Serialization(e.to_string()))?;
        let mut tmp = tempfile::NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(&data)?;
        tmp.as_file().sync_all()?;
        tmp.persist(self.path()).map_err(|e| RefError::Io(e.error))?;
        Ok(())
    }

    fn update<T>(&self, f: impl FnOnce(&mut RefMap) -> T) -> Result<T> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| RefError::Serialization(format!("lock poisoned: {e}")))?;
        let mut refs = self.load()?;
        let out = f(&mut refs);
        self.save(&refs)?;
        Ok(out)
    }
}

impl RefStore for FileRefStore {
    fn read_ref(&self, name: &str) -> Result<Option<ContentHash>> {
        Ok(self.load()?.remove(name))
    }

    fn write_ref(&self, name: &str, hash: &ContentHash) -> Result<()> {
        validate_ref_name(name)?;
        self.update(|refs| {
            refs.insert(name.to_string(), hash.clone());
        })?;
        debug!(name, hash = %hash, "ref updated");
        Ok(())
    }

    fn delete_ref(&self, name: &str) -> Result<bool> {
        self.update(|refs| refs.remove(name).is_some())
    }

    fn list_refs(&self) -> Result<Vec<(String, ContentHash)>> {
        Ok(self.load()?.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash(s: &str) -> ContentHash {
        ContentHash::parse(s).unwrap()
    }

    #[test]
    fn empty_directory_has_no_refs() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRefStore::open(dir.path()).unwrap();
        assert!(store.profile().unwrap().is_none());
        assert!(store.list_refs().unwrap().is_empty());
    }

    #[test]
    fn refs_persist_across_instances() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = FileRefStore::open(dir.path()).unwrap();
            store.set_profile(&hash("QmPersisted")).unwrap();
        }
        let reopened = FileRefStore::open(dir.path()).unwrap();
        assert_eq!(reopened.profile().unwrap(), Some(hash("QmPersisted")));
    }

    #[test]
    fn open_creates_nested_state_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let store = FileRefStore::open(&nested).unwrap();
        store.write_ref("x", &hash("QmX")).unwrap();
        assert!(nested.join(REFS_FILE).exists());
    }

    #[test]
    fn delete_and_list() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRefStore::open(dir.path()).unwrap();
        store.write_ref("b", &hash("QmB")).unwrap();
        store.write_ref("a", &hash("QmA")).unwrap();
        assert_eq!(
            store.list_refs().unwrap(),
            vec![("a".to_string(), hash("QmA")), ("b".to_string(), hash("QmB"))]
        );
        assert!(store.delete_ref("a").unwrap());
        assert!(!store.delete_ref("a").unwrap());
        assert_eq!(store.list_refs().unwrap().len(), 1);
    }

    #[test]
    fn document_is_plain_json() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRefStore::open(dir.path()).unwrap();
        store.set_profile(&hash("QmDoc")).unwrap();
        let text = fs::read_to_string(store.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["profile"], "QmDoc");
    }

    #[test]
    fn corrupt_document_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileRefStore::open(dir.path()).unwrap();
        fs::write(store.path(), b"{ not json").unwrap();
        assert!(matches!(
            store.profile().unwrap_err(),
            RefError::Serialization(_)
        ));
    }
}
