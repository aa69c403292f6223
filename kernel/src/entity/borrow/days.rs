use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

use crate::KernelError;

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct BorrowDays(i32);

impl BorrowDays {
    pub const DEFAULT: i32 = 7;
    pub const MAX: i32 = 90;

    pub fn new(days: impl Into<i32>) -> Self {
        Self(days.into())
    }

    pub fn validated(days: impl Into<i32>) -> error_stack::Result<Self, KernelError> {
        let days = days.into();
        if (1..=Self::MAX).contains(&days) {
            Ok(Self(days))
        } else {
            Err(error_stack::Report::new(KernelError::Validation)
                .attach_printable(format!("borrow days must be within 1..={}, got {days}", Self::MAX)))
        }
    }
}

impl Default for BorrowDays {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}
