use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::Mutex;

use kernel::interface::reminder::{ReminderKey, ReminderLedger};
use kernel::KernelError;

#[derive(Debug, Clone, Default)]
pub struct InMemoryReminderLedger {
    marked: Arc<Mutex<HashSet<ReminderKey>>>,
}

impl InMemoryReminderLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn marked(&self) -> Vec<ReminderKey> {
        self.marked.lock().await.iter().cloned().collect()
    }
}

#[async_trait::async_trait]
impl ReminderLedger for InMemoryReminderLedger {
    async fn claim(&self, key: &ReminderKey) -> error_stack::Result<bool, KernelError> {
        Ok(self.marked.lock().await.insert(key.clone()))
    }

    async fn release(&self, key: &ReminderKey) -> error_stack::Result<(), KernelError> {
        self.marked.lock().await.remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use time::macros::date;

    use kernel::interface::reminder::{Reminder, ReminderKey, ReminderLedger};
    use kernel::prelude::entity::BorrowRequestId;
    use kernel::KernelError;

    use super::InMemoryReminderLedger;

    #[tokio::test]
    async fn only_first_claim_wins_until_released() -> error_stack::Result<(), KernelError> {
        let ledger = InMemoryReminderLedger::new();
        let key = ReminderKey::new(
            &BorrowRequestId::default(),
            &Reminder::Overdue { days: 2 },
            date!(2024 - 03 - 10),
        );

        assert!(ledger.claim(&key).await?);
        assert!(!ledger.claim(&key).await?);
        ledger.release(&key).await?;
        assert!(ledger.claim(&key).await?);
        assert_eq!(ledger.marked().await, vec![key]);
        Ok(())
    }
}
