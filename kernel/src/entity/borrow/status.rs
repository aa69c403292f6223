use std::fmt::{Display, Formatter};
use std::str::FromStr;

use error_stack::Report;
use serde::{Deserialize, Serialize};

use crate::KernelError;

/// ```text
/// pending ──> approved ──> borrowed ──> returned
///    └──────> rejected
/// ```
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BorrowStatus {
    Pending,
    Approved,
    Rejected,
    Borrowed,
    #[serde(alias = "completed")]
    Returned,
}

impl BorrowStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BorrowStatus::Pending => "pending",
            BorrowStatus::Approved => "approved",
            BorrowStatus::Rejected => "rejected",
            BorrowStatus::Borrowed => "borrowed",
            BorrowStatus::Returned => "returned",
        }
    }

    pub fn can_transition_to(&self, next: BorrowStatus) -> bool {
        matches!(
            (self, next),
            (BorrowStatus::Pending, BorrowStatus::Approved)
                | (BorrowStatus::Pending, BorrowStatus::Rejected)
                | (BorrowStatus::Approved, BorrowStatus::Borrowed)
                | (BorrowStatus::Borrowed, BorrowStatus::Returned)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, BorrowStatus::Rejected | BorrowStatus::Returned)
    }
}

impl Display for BorrowStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BorrowStatus {
    type Err = Report<KernelError>;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BorrowStatus::Pending),
            "approved" => Ok(BorrowStatus::Approved),
            "rejected" => Ok(BorrowStatus::Rejected),
            "borrowed" => Ok(BorrowStatus::Borrowed),
            "returned" | "completed" => Ok(BorrowStatus::Returned),
            other => Err(Report::new(KernelError::Validation)
                .attach_printable(format!("unknown borrow status `{other}`"))),
        }
    }
}
