use serde::{Deserialize, Serialize};
use uuid::Uuid;
use vodca::{AsRefln, Fromln};

#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Fromln, AsRefln)]
pub struct BorrowRequestId(Uuid);

impl BorrowRequestId {
    pub fn new(id: impl Into<Uuid>) -> Self {
        Self(id.into())
    }

    /// Hyphen-less form, fits the 32 character `character_string` template slot.
    pub fn borrow_number(&self) -> String {
        self.0.simple().to_string()
    }
}

impl Default for BorrowRequestId {
    fn default() -> Self {
        Self(Uuid::new_v4())
    }
}
