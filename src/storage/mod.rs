pub mod json_backend;

use uuid::Uuid;

use crate::{domain::MemberRecord, errors::Result};

/// Persistence collaborator of the member form.
///
/// Records are listed in a stable order; `delete_at` addresses the position
/// shown by `list`.
pub trait RecordStore {
    fn list(&self) -> Result<Vec<MemberRecord>>;
    fn get(&self, id: Uuid) -> Result<MemberRecord>;
    fn insert(&mut self, record: MemberRecord) -> Result<()>;
    /// Replaces the stored record with the same id. Returns `false` when the
    /// stored copy already equals `record` and nothing was written.
    fn update(&mut self, record: &MemberRecord) -> Result<bool>;
    fn delete_at(&mut self, index: usize) -> Result<MemberRecord>;

    fn get_at(&self, index: usize) -> Result<MemberRecord> {
        self.list()?
            .into_iter()
            .nth(index)
            .ok_or(crate::errors::FormError::IndexOutOfRange(index))
    }
}

pub use json_backend::JsonRecordStore;
