use serde::{Deserialize, Serialize};
use time::Date;
use vodca::{AsRefln, Fromln};

use crate::entity::iso_date;

/// Calendar day the book leaves the shelf.
#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize, Fromln, AsRefln)]
pub struct BorrowDate(#[serde(with = "iso_date")] Date);

impl BorrowDate {
    pub fn new(date: impl Into<Date>) -> Self {
        Self(date.into())
    }
}

/// Calendar day the book is due back.
#[derive(Debug, Clone, Copy, Eq, PartialEq, PartialOrd, Ord, Serialize, Deserialize, Fromln, AsRefln)]
pub struct ReturnDate(#[serde(with = "iso_date")] Date);

impl ReturnDate {
    pub fn new(date: impl Into<Date>) -> Self {
        Self(date.into())
    }

    /// Whole days from `today` until this date. Negative once overdue.
    pub fn days_from(&self, today: Date) -> i64 {
        (self.0 - today).whole_days()
    }
}
