#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use member_form::{
    domain::MemberRecord,
    storage::{JsonRecordStore, RecordStore},
};
use tempfile::TempDir;

/// Isolated application home holding the config and the default record store.
pub struct TestHome {
    dir: TempDir,
}

impl TestHome {
    pub fn new() -> Self {
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn store_path(&self) -> PathBuf {
        self.dir.path().join("members.json")
    }

    pub fn store(&self) -> JsonRecordStore {
        JsonRecordStore::open(self.store_path(), "members").expect("open record store")
    }

    pub fn seed(&self, records: &[MemberRecord]) {
        let mut store = self.store();
        for record in records {
            store.insert(record.clone()).expect("seed record");
        }
    }

    /// CLI command bound to this home, with colours off and no scripted keys.
    pub fn cli(&self) -> Command {
        let mut cmd = Command::cargo_bin("member_form_cli").expect("binary is built");
        cmd.env("MEMBER_FORM_HOME", self.path())
            .env("NO_COLOR", "1")
            .env_remove("MEMBER_FORM_TEST_KEYS");
        cmd
    }

    /// CLI command that feeds `keys` to the member form.
    pub fn cli_with_keys(&self, keys: &str) -> Command {
        let mut cmd = self.cli();
        cmd.env("MEMBER_FORM_TEST_KEYS", keys);
        cmd
    }
}
