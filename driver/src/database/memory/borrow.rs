use error_stack::Report;

use kernel::interface::query::BorrowRequestQuery;
use kernel::interface::update::BorrowRequestModifier;
use kernel::prelude::entity::{
    BorrowRequest, BorrowRequestId, BorrowStatus, OpenId, SelectLimit, SelectOffset, Version,
};
use kernel::KernelError;

use crate::database::memory::InMemoryTransaction;

pub struct InMemoryBorrowRequestRepository;

fn newest_first(mut requests: Vec<BorrowRequest>) -> Vec<BorrowRequest> {
    requests.sort_by(|a, b| b.created_at().as_ref().cmp(a.created_at().as_ref()));
    requests
}

#[async_trait::async_trait]
impl BorrowRequestQuery for InMemoryBorrowRequestRepository {
    type Transaction = InMemoryTransaction;

    async fn find_by_id(
        &self,
        con: &mut InMemoryTransaction,
        id: &BorrowRequestId,
    ) -> error_stack::Result<Option<BorrowRequest>, KernelError> {
        Ok(con.staged.requests.get(id).cloned())
    }

    async fn find_all(
        &self,
        con: &mut InMemoryTransaction,
        status: Option<&BorrowStatus>,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<BorrowRequest>, KernelError> {
        let matched = con
            .staged
            .requests
            .values()
            .filter(|request| status.map_or(true, |status| request.status() == status))
            .cloned()
            .collect();
        Ok(newest_first(matched)
            .into_iter()
            .skip(*offset.as_ref() as usize)
            .take(*limit.as_ref() as usize)
            .collect())
    }

    async fn find_by_requester(
        &self,
        con: &mut InMemoryTransaction,
        requester: &OpenId,
    ) -> error_stack::Result<Vec<BorrowRequest>, KernelError> {
        let matched = con
            .staged
            .requests
            .values()
            .filter(|request| request.is_requested_by(requester))
            .cloned()
            .collect();
        Ok(newest_first(matched))
    }

    async fn find_by_status(
        &self,
        con: &mut InMemoryTransaction,
        status: &BorrowStatus,
    ) -> error_stack::Result<Vec<BorrowRequest>, KernelError> {
        let matched = con
            .staged
            .requests
            .values()
            .filter(|request| request.status() == status)
            .cloned()
            .collect();
        Ok(newest_first(matched))
    }
}

#[async_trait::async_trait]
impl BorrowRequestModifier for InMemoryBorrowRequestRepository {
    type Transaction = InMemoryTransaction;

    async fn create(
        &self,
        con: &mut InMemoryTransaction,
        request: &BorrowRequest,
    ) -> error_stack::Result<(), KernelError> {
        if con.staged.requests.contains_key(request.id()) {
            return Err(Report::new(KernelError::Concurrency).attach_printable(format!(
                "borrow request {} already exists",
                request.id().as_ref()
            )));
        }
        con.staged
            .requests
            .insert(request.id().clone(), request.clone());
        Ok(())
    }

    async fn update(
        &self,
        con: &mut InMemoryTransaction,
        request: &BorrowRequest,
        expected: &Version<BorrowRequest>,
    ) -> error_stack::Result<(), KernelError> {
        match con.staged.requests.get_mut(request.id()) {
            Some(stored) if stored.version() == expected => {
                *stored = request.clone();
                Ok(())
            }
            _ => Err(Report::new(KernelError::Concurrency).attach_printable(format!(
                "borrow request {} is no longer at version {}",
                request.id().as_ref(),
                expected.as_ref()
            ))),
        }
    }
}
