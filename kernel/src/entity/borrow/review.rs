use destructure::Destructure;
use serde::{Deserialize, Serialize};
use vodca::References;

use crate::entity::OpenId;

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, References, Destructure)]
pub struct Review {
    reviewer: OpenId,
    remark: Option<String>,
}

impl Review {
    pub fn new(reviewer: OpenId, remark: Option<String>) -> Self {
        Self { reviewer, remark }
    }
}
