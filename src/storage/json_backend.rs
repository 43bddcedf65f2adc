use std::{
    collections::BTreeMap,
    path::PathBuf,
};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    domain::MemberRecord,
    errors::{FormError, Result},
    utils::persistence::{load_json, save_json},
};

use super::RecordStore;

const SCHEMA_VERSION: u32 = 1;

/// On-disk document. One file can hold several named collections.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(default)]
    schema_version: u32,
    #[serde(default)]
    collections: BTreeMap<String, Vec<MemberRecord>>,
}

/// [`RecordStore`] backed by a pretty-printed JSON file.
///
/// The whole document is rewritten on every change through a staging file
/// and a rename, so a crash never leaves a half-written store behind.
#[derive(Debug, Clone)]
pub struct JsonRecordStore {
    path: PathBuf,
    collection: String,
}

impl JsonRecordStore {
    pub fn open(path: impl Into<PathBuf>, collection: impl Into<String>) -> Result<Self> {
        let store = Self {
            path: path.into(),
            collection: collection.into(),
        };
        if store.collection.trim().is_empty() {
            return Err(FormError::Config("collection name must not be empty".into()));
        }
        let document = store.read()?;
        if document.schema_version > SCHEMA_VERSION {
            return Err(FormError::Storage(format!(
                "record store `{}` is from a newer schema version",
                store.path.display()
            )));
        }
        Ok(store)
    }

    fn read(&self) -> Result<StoreDocument> {
        Ok(load_json(&self.path)?.unwrap_or_default())
    }

    fn records(&self) -> Result<(StoreDocument, Vec<MemberRecord>)> {
        let mut document = self.read()?;
        let records = document
            .collections
            .remove(&self.collection)
            .unwrap_or_default();
        Ok((document, records))
    }

    fn write(&self, mut document: StoreDocument, records: Vec<MemberRecord>) -> Result<()> {
        document.schema_version = SCHEMA_VERSION;
        document
            .collections
            .insert(self.collection.clone(), records);
        save_json(&document, &self.path)
    }
}

impl RecordStore for JsonRecordStore {
    fn list(&self) -> Result<Vec<MemberRecord>> {
        Ok(self.records()?.1)
    }

    fn get(&self, id: Uuid) -> Result<MemberRecord> {
        self.list()?
            .into_iter()
            .find(|record| record.id == id)
            .ok_or(FormError::RecordNotFound(id))
    }

    fn insert(&mut self, record: MemberRecord) -> Result<()> {
        let (document, mut records) = self.records()?;
        if records.iter().any(|existing| existing.id == record.id) {
            return Err(FormError::Storage(format!(
                "record {} already exists",
                record.id
            )));
        }
        tracing::info!(id = %record.id, collection = %self.collection, "inserting member");
        records.push(record);
        self.write(document, records)
    }

    fn update(&mut self, record: &MemberRecord) -> Result<bool> {
        let (document, mut records) = self.records()?;
        let slot = records
            .iter_mut()
            .find(|existing| existing.id == record.id)
            .ok_or(FormError::RecordNotFound(record.id))?;
        if *slot == *record {
            tracing::debug!(id = %record.id, "member unchanged; skipping write");
            return Ok(false);
        }
        *slot = record.clone();
        tracing::info!(id = %record.id, collection = %self.collection, "updating member");
        self.write(document, records)?;
        Ok(true)
    }

    fn delete_at(&mut self, index: usize) -> Result<MemberRecord> {
        let (document, mut records) = self.records()?;
        if index >= records.len() {
            return Err(FormError::IndexOutOfRange(index));
        }
        let removed = records.remove(index);
        tracing::info!(id = %removed.id, collection = %self.collection, "deleting member");
        self.write(document, records)?;
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::tempdir;

    fn store(dir: &Path) -> JsonRecordStore {
        JsonRecordStore::open(dir.join("members.json"), "members").unwrap()
    }

    #[test]
    fn missing_file_lists_empty() {
        let dir = tempdir().unwrap();
        assert!(store(dir.path()).list().unwrap().is_empty());
    }

    #[test]
    fn insert_update_and_delete_round_trip_through_disk() {
        let dir = tempdir().unwrap();
        let mut members = store(dir.path());
        let jane = MemberRecord::new("Jane", "Doe");
        let john = MemberRecord::new("John", "Roe");
        members.insert(jane.clone()).unwrap();
        members.insert(john.clone()).unwrap();

        let reopened = store(dir.path());
        assert_eq!(reopened.list().unwrap(), vec![jane.clone(), john.clone()]);

        let mut edited = jane.clone();
        edited.zip = Some("12345".into());
        assert!(members.update(&edited).unwrap());
        assert!(!members.update(&edited).unwrap());
        assert_eq!(members.get(jane.id).unwrap().zip.as_deref(), Some("12345"));

        let removed = members.delete_at(1).unwrap();
        assert_eq!(removed.id, john.id);
        assert_eq!(members.list().unwrap().len(), 1);
    }

    #[test]
    fn out_of_range_and_unknown_ids_are_errors() {
        let dir = tempdir().unwrap();
        let mut members = store(dir.path());
        assert!(matches!(
            members.delete_at(0),
            Err(FormError::IndexOutOfRange(0))
        ));
        let ghost = MemberRecord::new("No", "One");
        assert!(matches!(
            members.update(&ghost),
            Err(FormError::RecordNotFound(id)) if id == ghost.id
        ));
        assert!(matches!(members.get_at(3), Err(FormError::IndexOutOfRange(3))));
    }

    #[test]
    fn collections_share_a_file_without_mixing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("members.json");
        let mut active = JsonRecordStore::open(&path, "active").unwrap();
        let mut alumni = JsonRecordStore::open(&path, "alumni").unwrap();
        active.insert(MemberRecord::new("Jane", "Doe")).unwrap();
        alumni.insert(MemberRecord::new("Old", "Timer")).unwrap();
        assert_eq!(active.list().unwrap().len(), 1);
        assert_eq!(alumni.list().unwrap()[0].first_name, "Old");
    }

    #[test]
    fn blank_collection_name_is_rejected() {
        let dir = tempdir().unwrap();
        assert!(matches!(
            JsonRecordStore::open(dir.path().join("m.json"), " "),
            Err(FormError::Config(_))
        ));
    }
}
