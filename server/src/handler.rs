use driver::clock::SystemClock;
use driver::database::postgres::{
    PostgresBorrowRequestRepository, PostgresDatabase, PostgresUserRepository,
};
use driver::database::redis::{RedisDatabase, RedisReminderLedger};
use driver::wechat::{WeChatClient, WeChatConfig};
use kernel::interface::access::{Administrators, DependOnAdministrators};
use kernel::interface::clock::DependOnClock;
use kernel::interface::database::DependOnDatabaseConnection;
use kernel::interface::identity::DependOnIdentityProvider;
use kernel::interface::notify::{DependOnSubscribeMessageSender, NotificationTemplates};
use kernel::interface::query::{DependOnBorrowRequestQuery, DependOnUserQuery};
use kernel::interface::reminder::DependOnReminderLedger;
use kernel::interface::update::{DependOnBorrowRequestModifier, DependOnUserModifier};
use kernel::KernelError;
use std::sync::Arc;

use crate::config::Config;

#[cfg(test)]
pub mod test_module;

/// Router state shared by every route.
pub struct AppModule<H = Handler>(Arc<H>);

impl<H> Clone for AppModule<H> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl AppModule {
    pub async fn new(config: &Config) -> error_stack::Result<Self, KernelError> {
        Ok(Self(Arc::new(Handler::init(config).await?)))
    }
}

impl<H> AppModule<H> {
    #[cfg(test)]
    pub fn with_handler(handler: H) -> Self {
        Self(Arc::new(handler))
    }

    pub fn handler(&self) -> &H {
        &self.0
    }
}

pub struct Handler {
    pgpool: PostgresDatabase,
    reminder_ledger: RedisReminderLedger,
    wechat: WeChatClient,
    clock: SystemClock,
    templates: NotificationTemplates,
    administrators: Administrators,
}

impl Handler {
    pub async fn init(config: &Config) -> error_stack::Result<Self, KernelError> {
        let pgpool = PostgresDatabase::new().await?;
        pgpool.migrate().await?;
        let reminder_ledger = RedisReminderLedger::new(RedisDatabase::new()?);
        let wechat = WeChatClient::new(WeChatConfig::from_env()?)?;

        Ok(Self {
            pgpool,
            reminder_ledger,
            wechat,
            clock: SystemClock,
            templates: config.templates.clone(),
            administrators: config.administrators.clone(),
        })
    }
}

impl DependOnDatabaseConnection for Handler {
    type DatabaseConnection = PostgresDatabase;
    fn database_connection(&self) -> &Self::DatabaseConnection {
        &self.pgpool
    }
}

impl DependOnBorrowRequestQuery for Handler {
    type BorrowRequestQuery = PostgresBorrowRequestRepository;
    fn borrow_request_query(&self) -> &Self::BorrowRequestQuery {
        &PostgresBorrowRequestRepository
    }
}

impl DependOnBorrowRequestModifier for Handler {
    type BorrowRequestModifier = PostgresBorrowRequestRepository;
    fn borrow_request_modifier(&self) -> &Self::BorrowRequestModifier {
        &PostgresBorrowRequestRepository
    }
}

impl DependOnUserQuery for Handler {
    type UserQuery = PostgresUserRepository;
    fn user_query(&self) -> &Self::UserQuery {
        &PostgresUserRepository
    }
}

impl DependOnUserModifier for Handler {
    type UserModifier = PostgresUserRepository;
    fn user_modifier(&self) -> &Self::UserModifier {
        &PostgresUserRepository
    }
}

impl DependOnReminderLedger for Handler {
    type ReminderLedger = RedisReminderLedger;
    fn reminder_ledger(&self) -> &Self::ReminderLedger {
        &self.reminder_ledger
    }
}

impl DependOnSubscribeMessageSender for Handler {
    type SubscribeMessageSender = WeChatClient;
    fn subscribe_message_sender(&self) -> &Self::SubscribeMessageSender {
        &self.wechat
    }

    fn notification_templates(&self) -> &NotificationTemplates {
        &self.templates
    }
}

impl DependOnIdentityProvider for Handler {
    type IdentityProvider = WeChatClient;
    fn identity_provider(&self) -> &Self::IdentityProvider {
        &self.wechat
    }
}

impl DependOnClock for Handler {
    type Clock = SystemClock;
    fn clock(&self) -> &Self::Clock {
        &self.clock
    }
}

impl DependOnAdministrators for Handler {
    fn administrators(&self) -> &Administrators {
        &self.administrators
    }
}
