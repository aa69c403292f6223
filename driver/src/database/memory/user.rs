use error_stack::Report;

use kernel::interface::query::UserQuery;
use kernel::interface::update::UserModifier;
use kernel::prelude::entity::{OpenId, User};
use kernel::KernelError;

use crate::database::memory::InMemoryTransaction;

pub struct InMemoryUserRepository;

#[async_trait::async_trait]
impl UserQuery for InMemoryUserRepository {
    type Transaction = InMemoryTransaction;

    async fn find_by_open_id(
        &self,
        con: &mut InMemoryTransaction,
        open_id: &OpenId,
    ) -> error_stack::Result<Option<User>, KernelError> {
        Ok(con.staged.users.get(open_id).cloned())
    }
}

#[async_trait::async_trait]
impl UserModifier for InMemoryUserRepository {
    type Transaction = InMemoryTransaction;

    async fn register(
        &self,
        con: &mut InMemoryTransaction,
        user: &User,
    ) -> error_stack::Result<User, KernelError> {
        let stored = con
            .staged
            .users
            .entry(user.open_id().clone())
            .or_insert_with(|| user.clone());
        if let Some(phone_number) = user.phone_number().clone() {
            if stored.phone_number().as_ref() != Some(&phone_number) {
                let updated_at = user.updated_at().clone();
                stored.substitute(|stored| {
                    *stored.phone_number = Some(phone_number);
                    *stored.updated_at = updated_at;
                });
            }
        }
        Ok(stored.clone())
    }

    async fn update(
        &self,
        con: &mut InMemoryTransaction,
        user: &User,
    ) -> error_stack::Result<(), KernelError> {
        match con.staged.users.get_mut(user.open_id()) {
            Some(stored) => {
                *stored = user.clone();
                Ok(())
            }
            None => Err(Report::new(KernelError::NotFound)
                .attach_printable(format!("user {} does not exist", user.open_id().as_ref()))),
        }
    }
}
