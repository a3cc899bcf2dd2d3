use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

use crate::models::OwnerId;

/// Owners that asked to upload a table and have not sent the file yet.
///
/// `/upload` calls [`UploadSessions::begin`]; the next document from that
/// owner calls [`UploadSessions::take`], which both checks and clears the
/// flag. Cloning shares the same set.
#[derive(Clone, Debug, Default)]
pub struct UploadSessions {
    pending: Arc<Mutex<HashSet<OwnerId>>>,
}

impl UploadSessions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self, owner_id: OwnerId) {
        self.lock().insert(owner_id);
    }

    /// Clear the owner's pending upload, returning whether there was one.
    pub fn take(&self, owner_id: OwnerId) -> bool {
        self.lock().remove(&owner_id)
    }

    pub fn is_pending(&self, owner_id: OwnerId) -> bool {
        self.lock().contains(&owner_id)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashSet<OwnerId>> {
        // The set holds plain ids, so a panic elsewhere cannot leave it torn.
        self.pending.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
