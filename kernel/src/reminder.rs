use std::fmt::{Display, Formatter};

use time::Date;
use vodca::{AsRefln, Fromln};

use crate::entity::{format_iso_date, BorrowRequest, BorrowRequestId, BorrowStatus};
use crate::KernelError;

/// Days-before-due on which a "return soon" reminder goes out.
pub const DUE_SOON_DAYS: [i64; 2] = [3, 1];

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Reminder {
    DueSoon { days_left: i64 },
    Overdue { days: i64 },
}

pub fn plan_reminder(request: &BorrowRequest, today: Date) -> Option<Reminder> {
    if request.status() != &BorrowStatus::Borrowed {
        return None;
    }
    let days_left = request.return_date().as_ref()?.days_from(today);
    if days_left < 0 {
        Some(Reminder::Overdue { days: -days_left })
    } else if DUE_SOON_DAYS.contains(&days_left) {
        Some(Reminder::DueSoon { days_left })
    } else {
        None
    }
}

#[derive(Debug, Clone, Eq, PartialEq, Hash, Fromln, AsRefln)]
pub struct ReminderKey(String);

impl ReminderKey {
    pub fn new(id: &BorrowRequestId, reminder: &Reminder, today: Date) -> Self {
        let today = format_iso_date(&today);
        let key = match reminder {
            Reminder::Overdue { .. } => format!("{}_overdue_{today}", id.as_ref()),
            Reminder::DueSoon { days_left } => {
                format!("{}_{days_left}days_{today}", id.as_ref())
            }
        };
        Self(key)
    }
}

impl Display for ReminderKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[async_trait::async_trait]
pub trait ReminderLedger: 'static + Sync + Send {
    /// Records `key` if nobody has yet. `true` only for the caller that recorded it.
    async fn claim(&self, key: &ReminderKey) -> error_stack::Result<bool, KernelError>;
    /// Drops a claim whose reminder was not delivered.
    async fn release(&self, key: &ReminderKey) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnReminderLedger: 'static + Sync + Send {
    type ReminderLedger: ReminderLedger;
    fn reminder_ledger(&self) -> &Self::ReminderLedger;
}

#[cfg(test)]
mod test {
    use time::macros::{date, datetime};
    use time::Date;
    use uuid::Uuid;

    use crate::entity::{
        Applicant, BookId, BookName, BorrowDays, BorrowRequest, BorrowRequestId, BorrowStatus,
        CreatedAt, OpenId, ReturnDate, UpdatedAt, Version,
    };

    use super::{plan_reminder, Reminder, ReminderKey};

    fn request(status: BorrowStatus, return_date: Option<Date>) -> BorrowRequest {
        BorrowRequest::new(
            BorrowRequestId::new(Uuid::nil()),
            BookId::new("book-1"),
            BookName::new("Rust"),
            OpenId::new("reader"),
            BorrowDays::default(),
            status,
            Applicant::default(),
            None,
            None,
            return_date.map(ReturnDate::new),
            None,
            None,
            CreatedAt::new(datetime!(2024-03-01 09:00 +8)),
            UpdatedAt::new(datetime!(2024-03-01 09:00 +8)),
            Version::initial(),
        )
    }

    #[test]
    fn due_soon_only_on_three_and_one_days_left() {
        let today = date!(2024 - 03 - 10);
        let plan = |due| plan_reminder(&request(BorrowStatus::Borrowed, Some(due)), today);

        assert_eq!(
            plan(date!(2024 - 03 - 13)),
            Some(Reminder::DueSoon { days_left: 3 })
        );
        assert_eq!(
            plan(date!(2024 - 03 - 11)),
            Some(Reminder::DueSoon { days_left: 1 })
        );
        assert_eq!(plan(date!(2024 - 03 - 12)), None);
        assert_eq!(plan(date!(2024 - 03 - 10)), None);
        assert_eq!(plan(date!(2024 - 03 - 20)), None);
    }

    #[test]
    fn past_due_date_is_overdue() {
        let today = date!(2024 - 03 - 10);
        let plan = plan_reminder(
            &request(BorrowStatus::Borrowed, Some(date!(2024 - 03 - 05))),
            today,
        );
        assert_eq!(plan, Some(Reminder::Overdue { days: 5 }));
    }

    #[test]
    fn only_borrowed_requests_with_due_date_are_planned() {
        let today = date!(2024 - 03 - 10);
        let due = Some(date!(2024 - 03 - 11));
        for status in [
            BorrowStatus::Pending,
            BorrowStatus::Approved,
            BorrowStatus::Rejected,
            BorrowStatus::Returned,
        ] {
            assert_eq!(plan_reminder(&request(status, due), today), None);
        }
        assert_eq!(
            plan_reminder(&request(BorrowStatus::Borrowed, None), today),
            None
        );
    }

    #[test]
    fn keys_embed_reminder_and_day() {
        let id = BorrowRequestId::new(Uuid::nil());
        let today = date!(2024 - 03 - 10);
        assert_eq!(
            ReminderKey::new(&id, &Reminder::Overdue { days: 2 }, today).to_string(),
            "00000000-0000-0000-0000-000000000000_overdue_2024-03-10"
        );
        assert_eq!(
            ReminderKey::new(&id, &Reminder::DueSoon { days_left: 3 }, today).to_string(),
            "00000000-0000-0000-0000-000000000000_3days_2024-03-10"
        );
    }
}
