//! Process-local storage with the same transactional contract as the
//! PostgreSQL adapter. Writes are staged on a copy and published on commit;
//! dropping a transaction discards them.

mod borrow;
mod reminder;
mod user;

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::{OwnedRwLockWriteGuard, RwLock};

use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::prelude::entity::{BorrowRequest, BorrowRequestId, OpenId, User};
use kernel::KernelError;

pub use self::{borrow::*, reminder::*, user::*};

#[derive(Debug, Clone, Default)]
pub(in crate::database) struct Store {
    requests: HashMap<BorrowRequestId, BorrowRequest>,
    users: HashMap<OpenId, User>,
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryDatabase {
    store: Arc<RwLock<Store>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for InMemoryDatabase {
    type Transaction = InMemoryTransaction;
    async fn transact(&self) -> error_stack::Result<Self::Transaction, KernelError> {
        let guard = Arc::clone(&self.store).write_owned().await;
        let staged = guard.clone();
        Ok(InMemoryTransaction { guard, staged })
    }
}

pub struct InMemoryTransaction {
    guard: OwnedRwLockWriteGuard<Store>,
    staged: Store,
}

#[async_trait::async_trait]
impl Transaction for InMemoryTransaction {
    async fn commit(self) -> error_stack::Result<(), KernelError> {
        let InMemoryTransaction { mut guard, staged } = self;
        *guard = staged;
        Ok(())
    }

    async fn roll_back(self) -> error_stack::Result<(), KernelError> {
        Ok(())
    }
}
