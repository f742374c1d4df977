//! JSON file persistence for the collection.
//!
//! The whole collection lives in one pretty-printed JSON document. Saves go
//! through a sibling `<file>.tmp` that is synced and then renamed over the
//! original, so a crash leaves either the old or the new document in place.

use crate::core::Collection;
use crate::error::Result;
use crate::models::Document;
use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// The store file and the operations on it
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
}

impl Store {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Store {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling file the next save is staged in
    pub fn temp_path(&self) -> PathBuf {
        let mut name = OsString::from(self.path.as_os_str());
        name.push(".tmp");
        PathBuf::from(name)
    }

    /// Load the collection.
    ///
    /// A missing file is created holding an empty document and an empty
    /// collection is returned without reading it back.
    pub fn open(&self) -> Result<Collection> {
        if !self.path.exists() {
            info!(path = %self.path.display(), "store not found, creating an empty one");
            self.write_document(&Document::new())?;
            return Ok(Collection::default());
        }

        let data = fs::read_to_string(&self.path)?;
        let doc: Document = serde_json::from_str(&data)?;
        debug!(path = %self.path.display(), lists = doc.len(), "read store");
        Collection::load_from_document(doc)
    }

    /// Write the collection back when it was modified. Returns whether a write happened.
    pub fn save_if_dirty(&self, collection: &Collection) -> Result<bool> {
        if !collection.is_dirty() {
            debug!("collection unchanged, skipping save");
            return Ok(false);
        }
        self.save(collection)?;
        Ok(true)
    }

    pub fn save(&self, collection: &Collection) -> Result<()> {
        self.write_document(&collection.save_to_document())?;
        info!(path = %self.path.display(), lists = collection.len(), "saved store");
        Ok(())
    }

    fn write_document(&self, doc: &Document) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir)?;
            }
        }

        let tmp = self.temp_path();
        let written = write_synced(&tmp, doc).and_then(|()| Ok(fs::rename(&tmp, &self.path)?));
        if written.is_err() {
            // A failed save never leaves a partial staging file behind
            if let Err(e) = fs::remove_file(&tmp) {
                debug!(path = %tmp.display(), error = %e, "could not remove staging file");
            }
        }
        written
    }
}

fn write_synced(path: &Path, doc: &Document) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, doc)?;
    writer.write_all(b"\n")?;
    let file = writer.into_inner().map_err(|e| e.into_error())?;
    file.sync_all()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{AddItem, Confirm, ManageList};
    use crate::error::TodoError;
    use crate::models::NewItem;
    use tempfile::TempDir;

    struct Yes;

    impl Confirm for Yes {
        fn confirm(&mut self, _question: &str) -> bool {
            true
        }
    }

    fn setup() -> (Store, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let store = Store::new(temp_dir.path().join("todo.json"));
        (store, temp_dir)
    }

    fn read_json(path: &Path) -> serde_json::Value {
        serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
    }

    #[test]
    fn test_open_missing_file_creates_empty_document() {
        let (store, _temp) = setup();

        let collection = store.open().unwrap();
        assert!(collection.is_empty());
        assert!(!collection.is_dirty());
        assert_eq!(read_json(store.path()), serde_json::json!({}));
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn test_open_creates_parent_directories() {
        let temp_dir = TempDir::new().unwrap();
        let store = Store::new(temp_dir.path().join("nested/dir/todo.json"));
        store.open().unwrap();
        assert!(store.path().exists());
    }

    #[test]
    fn test_missing_file_then_add_fails() {
        let (store, _temp) = setup();
        let mut collection = store.open().unwrap();

        let err = collection
            .add_item(AddItem {
                list: "work".to_string(),
                item: NewItem {
                    name: "Report".to_string(),
                    ..Default::default()
                },
            })
            .unwrap_err();
        assert!(matches!(err, TodoError::ListNotFound { .. }));
        assert!(!store.save_if_dirty(&collection).unwrap());
    }

    #[test]
    fn test_save_and_reopen() {
        let (store, _temp) = setup();
        let mut collection = store.open().unwrap();
        collection
            .manage_list(
                &ManageList {
                    name: "groceries".to_string(),
                    delete: false,
                },
                &mut Yes,
            )
            .unwrap();
        collection
            .add_item(AddItem {
                list: "groceries".to_string(),
                item: NewItem {
                    name: "Eggs".to_string(),
                    tags: vec!["dairy".to_string()],
                    ..Default::default()
                },
            })
            .unwrap();

        assert!(store.save_if_dirty(&collection).unwrap());
        assert!(!store.temp_path().exists());

        let reopened = store.open().unwrap();
        assert!(!reopened.is_dirty());
        assert_eq!(reopened.list("groceries"), collection.list("groceries"));
    }

    #[test]
    fn test_clean_collection_is_not_written() {
        let (store, _temp) = setup();
        fs::write(store.path(), r#"{"work": {"items": []}}"#).unwrap();

        let collection = store.open().unwrap();
        assert!(!store.save_if_dirty(&collection).unwrap());
        assert_eq!(
            fs::read_to_string(store.path()).unwrap(),
            r#"{"work": {"items": []}}"#
        );
    }

    #[test]
    fn test_save_replaces_existing_file_and_stale_temp() {
        let (store, _temp) = setup();
        fs::write(store.path(), r#"{"old": {"items": []}}"#).unwrap();
        fs::write(store.temp_path(), "garbage").unwrap();

        let mut collection = store.open().unwrap();
        collection
            .manage_list(
                &ManageList {
                    name: "new".to_string(),
                    delete: false,
                },
                &mut Yes,
            )
            .unwrap();
        store.save(&collection).unwrap();

        assert_eq!(
            read_json(store.path()),
            serde_json::json!({"old": {"items": []}, "new": {"items": []}})
        );
        assert!(!store.temp_path().exists());
    }

    #[test]
    fn test_failed_save_removes_staging_file() {
        let (store, _temp) = setup();
        // A non-empty directory at the destination makes the final rename fail
        fs::create_dir(store.path()).unwrap();
        fs::write(store.path().join("keep"), "").unwrap();

        let err = store.save(&Collection::default()).unwrap_err();
        assert!(matches!(err, TodoError::Io(_)));
        assert!(!store.temp_path().exists());
        assert!(store.path().join("keep").exists());
    }

    #[test]
    fn test_open_rejects_record_without_name() {
        let (store, _temp) = setup();
        fs::write(
            store.path(),
            r#"{"work": {"items": [{"date": 1700000000}]}}"#,
        )
        .unwrap();

        assert!(matches!(
            store.open(),
            Err(TodoError::MissingField { field: "name" })
        ));
    }

    #[test]
    fn test_open_rejects_malformed_json() {
        let (store, _temp) = setup();
        fs::write(store.path(), "{not json").unwrap();
        assert!(matches!(store.open(), Err(TodoError::Json(_))));
    }

    #[test]
    fn test_temp_path_is_sibling() {
        let store = Store::new("/home/me/.td.json");
        assert_eq!(store.temp_path(), PathBuf::from("/home/me/.td.json.tmp"));
    }
}
