use tracing::{debug, info, warn};

use kernel::interface::access::DependOnAdministrators;
use kernel::interface::clock::{Clock, DependOnClock};
use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::notify::{DependOnSubscribeMessageSender, Notice, SubscribeMessageSender};
use kernel::interface::query::{BorrowRequestQuery, DependOnBorrowRequestQuery};
use kernel::interface::reminder::{
    plan_reminder, DependOnReminderLedger, Reminder, ReminderKey, ReminderLedger,
};
use kernel::prelude::entity::{BorrowRequest, BorrowStatus, OpenId};
use kernel::KernelError;

use crate::transfer::{DueReminderDto, ReminderOutcome, ReminderReportDto};

#[async_trait::async_trait]
pub trait CheckReturnRemindersService:
    'static
    + Sync
    + Send
    + DependOnBorrowRequestQuery
    + DependOnReminderLedger
    + DependOnSubscribeMessageSender
    + DependOnClock
    + DependOnAdministrators
{
    /// Admin-triggered pass.
    async fn check_return_reminders(
        &self,
        actor: &OpenId,
    ) -> error_stack::Result<ReminderReportDto, KernelError> {
        self.administrators().ensure(actor)?;
        self.run_return_reminders().await
    }

    /// Sends every reminder due today that has not been delivered yet.
    /// Running it several times on the same day sends each reminder once.
    async fn run_return_reminders(&self) -> error_stack::Result<ReminderReportDto, KernelError> {
        let today = self.clock().today();
        let borrowed = {
            let mut connection = self.database_connection().transact().await?;
            let borrowed = self
                .borrow_request_query()
                .find_by_status(&mut connection, &BorrowStatus::Borrowed)
                .await?;
            connection.commit().await?;
            borrowed
        };

        let mut report = ReminderReportDto {
            total: borrowed.len(),
            checked: borrowed
                .iter()
                .filter(|request| request.return_date().is_some())
                .count(),
            ..Default::default()
        };
        for request in borrowed {
            let Some(reminder) = plan_reminder(&request, today) else {
                continue;
            };
            let key = ReminderKey::new(request.id(), &reminder, today);
            let outcome = deliver(self, &request, &reminder, &key).await;
            if outcome == ReminderOutcome::Sent {
                report.sent += 1;
            }
            let (days_left, overdue) = match reminder {
                Reminder::DueSoon { days_left } => (days_left, false),
                Reminder::Overdue { days } => (-days, true),
            };
            report.due.push(DueReminderDto {
                id: *request.id().as_ref(),
                open_id: request.requester().as_ref().clone(),
                book_name: request.book_name().as_ref().clone(),
                return_date: request
                    .return_date()
                    .map(|date| *date.as_ref())
                    .unwrap_or(today),
                days_left,
                overdue,
                outcome,
            });
        }
        info!(
            total = report.total,
            checked = report.checked,
            due = report.due.len(),
            sent = report.sent,
            "return reminder pass finished"
        );
        Ok(report)
    }
}

impl<T> CheckReturnRemindersService for T where
    T: DependOnBorrowRequestQuery
        + DependOnReminderLedger
        + DependOnSubscribeMessageSender
        + DependOnClock
        + DependOnAdministrators
{
}

async fn deliver<T>(
    module: &T,
    request: &BorrowRequest,
    reminder: &Reminder,
    key: &ReminderKey,
) -> ReminderOutcome
where
    T: DependOnReminderLedger + DependOnSubscribeMessageSender + ?Sized,
{
    let Some(return_date) = request.return_date().map(|date| *date.as_ref()) else {
        return ReminderOutcome::Failed;
    };
    let notice = match *reminder {
        Reminder::DueSoon { days_left } => Notice::ReturnReminder {
            id: request.id().clone(),
            book_name: request.book_name().clone(),
            return_date,
            days_left,
        },
        Reminder::Overdue { days } => Notice::OverdueReminder {
            id: request.id().clone(),
            book_name: request.book_name().clone(),
            return_date,
            overdue_days: days,
        },
    };
    let Some(message) = module
        .notification_templates()
        .compose(request.requester(), &notice)
    else {
        debug!(kind = ?notice.kind(), "no subscribe template configured, skipping");
        return ReminderOutcome::Unconfigured;
    };

    // Claimed before sending: overlapping passes deliver a key once.
    match module.reminder_ledger().claim(key).await {
        Ok(true) => {}
        Ok(false) => {
            debug!(%key, "reminder already sent");
            return ReminderOutcome::AlreadySent;
        }
        Err(report) => {
            warn!(%key, "failed to claim reminder: {report:?}");
            return ReminderOutcome::Failed;
        }
    }

    if let Err(report) = module.subscribe_message_sender().send(&message).await {
        warn!(%key, "failed to send reminder: {report:?}");
        if let Err(report) = module.reminder_ledger().release(key).await {
            warn!(%key, "failed to release reminder claim: {report:?}");
        }
        return ReminderOutcome::Failed;
    }
    ReminderOutcome::Sent
}
