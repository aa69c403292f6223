use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{BorrowRequest, Version};
use crate::KernelError;

#[async_trait::async_trait]
pub trait BorrowRequestModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn create(
        &self,
        con: &mut Self::Transaction,
        request: &BorrowRequest,
    ) -> error_stack::Result<(), KernelError>;

    /// Writes `request` only while the stored row still carries `expected`.
    /// Fails with [`KernelError::Concurrency`] otherwise.
    async fn update(
        &self,
        con: &mut Self::Transaction,
        request: &BorrowRequest,
        expected: &Version<BorrowRequest>,
    ) -> error_stack::Result<(), KernelError>;
}

pub trait DependOnBorrowRequestModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type BorrowRequestModifier: BorrowRequestModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn borrow_request_modifier(&self) -> &Self::BorrowRequestModifier;
}
