use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::{BorrowRequest, BorrowRequestId, BorrowStatus, OpenId, SelectLimit, SelectOffset};
use crate::KernelError;

#[async_trait::async_trait]
pub trait BorrowRequestQuery: 'static + Sync + Send {
    type Transaction: Transaction;
    async fn find_by_id(
        &self,
        con: &mut Self::Transaction,
        id: &BorrowRequestId,
    ) -> error_stack::Result<Option<BorrowRequest>, KernelError>;

    /// Newest first.
    async fn find_all(
        &self,
        con: &mut Self::Transaction,
        status: Option<&BorrowStatus>,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<BorrowRequest>, KernelError>;

    /// Newest first.
    async fn find_by_requester(
        &self,
        con: &mut Self::Transaction,
        requester: &OpenId,
    ) -> error_stack::Result<Vec<BorrowRequest>, KernelError>;

    async fn find_by_status(
        &self,
        con: &mut Self::Transaction,
        status: &BorrowStatus,
    ) -> error_stack::Result<Vec<BorrowRequest>, KernelError>;
}

pub trait DependOnBorrowRequestQuery: 'static + Sync + Send + DependOnDatabaseConnection {
    type BorrowRequestQuery: BorrowRequestQuery<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn borrow_request_query(&self) -> &Self::BorrowRequestQuery;
}
