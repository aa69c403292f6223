use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

use crate::KernelError;

/// Per-app WeChat user identifier. Doubles as the subscribe message recipient.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize, Deserialize, Fromln, AsRefln)]
pub struct OpenId(String);

impl OpenId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn validated(id: impl Into<String>) -> error_stack::Result<Self, KernelError> {
        let id = id.into();
        let trimmed = id.trim();
        if trimmed.is_empty() {
            return Err(error_stack::Report::new(KernelError::Unauthorized)
                .attach_printable("open id is empty"));
        }
        Ok(Self(trimmed.to_string()))
    }
}
