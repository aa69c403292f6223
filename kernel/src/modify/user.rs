use crate::database::{DatabaseConnection, DependOnDatabaseConnection, Transaction};
use crate::entity::User;
use crate::KernelError;

#[async_trait::async_trait]
pub trait UserModifier: 'static + Sync + Send {
    type Transaction: Transaction;
    /// Inserts `user`. For an open id that is already stored, only the phone
    /// number is refreshed, and only when `user` carries one. Returns the
    /// stored user.
    async fn register(
        &self,
        con: &mut Self::Transaction,
        user: &User,
    ) -> error_stack::Result<User, KernelError>;
    async fn update(&self, con: &mut Self::Transaction, user: &User)
        -> error_stack::Result<(), KernelError>;
}

pub trait DependOnUserModifier: 'static + Sync + Send + DependOnDatabaseConnection {
    type UserModifier: UserModifier<
        Transaction = <Self::DatabaseConnection as DatabaseConnection>::Transaction,
    >;
    fn user_modifier(&self) -> &Self::UserModifier;
}
