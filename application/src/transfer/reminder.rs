use time::Date;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ReminderOutcome {
    Sent,
    /// Already delivered earlier today.
    AlreadySent,
    /// No usable template for the reminder kind.
    Unconfigured,
    Failed,
}

#[derive(Debug, Clone)]
pub struct DueReminderDto {
    pub id: Uuid,
    pub open_id: String,
    pub book_name: String,
    pub return_date: Date,
    /// Days until due, negative when overdue.
    pub days_left: i64,
    pub overdue: bool,
    pub outcome: ReminderOutcome,
}

#[derive(Debug, Clone, Default)]
pub struct ReminderReportDto {
    /// Borrowed requests scanned.
    pub total: usize,
    /// Of those, requests carrying a return date.
    pub checked: usize,
    pub due: Vec<DueReminderDto>,
    pub sent: usize,
}
