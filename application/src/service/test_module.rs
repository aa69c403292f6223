use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use error_stack::Report;
use time::macros::datetime;
use time::OffsetDateTime;
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use driver::database::memory::{
    InMemoryBorrowRequestRepository, InMemoryDatabase, InMemoryReminderLedger,
    InMemoryUserRepository,
};
use kernel::interface::access::{Administrators, DependOnAdministrators};
use kernel::interface::clock::{Clock, DependOnClock};
use kernel::interface::database::DependOnDatabaseConnection;
use kernel::interface::identity::{
    DependOnIdentityProvider, IdentityProvider, LoginCode, PhoneCode,
};
use kernel::interface::notify::{
    DependOnSubscribeMessageSender, NotificationTemplates, SubscribeMessage,
    SubscribeMessageKind, SubscribeMessageSender,
};
use kernel::interface::query::{DependOnBorrowRequestQuery, DependOnUserQuery};
use kernel::interface::reminder::DependOnReminderLedger;
use kernel::interface::update::{DependOnBorrowRequestModifier, DependOnUserModifier};
use kernel::prelude::entity::{OpenId, PhoneNumber};
use kernel::KernelError;

pub const ADMIN: &str = "admin";
pub const READER: &str = "reader";

#[derive(Clone)]
pub struct RecordingSender {
    outbox: UnboundedSender<SubscribeMessage>,
    failing: Arc<AtomicBool>,
}

impl RecordingSender {
    pub fn fail(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

#[async_trait::async_trait]
impl SubscribeMessageSender for RecordingSender {
    async fn send(&self, message: &SubscribeMessage) -> error_stack::Result<(), KernelError> {
        // Stands in for the network round trip so concurrent callers interleave.
        tokio::task::yield_now().await;
        if self.failing.load(Ordering::SeqCst) {
            return Err(Report::new(KernelError::External).attach_printable("errcode 43101"));
        }
        self.outbox
            .send(message.clone())
            .map_err(|_| Report::new(KernelError::Internal))
    }
}

#[derive(Clone)]
pub struct FixedClock(Arc<Mutex<OffsetDateTime>>);

impl FixedClock {
    pub fn set(&self, now: OffsetDateTime) {
        *self.0.lock().unwrap() = now;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        *self.0.lock().unwrap()
    }
}

pub struct FakeIdentity;

#[async_trait::async_trait]
impl IdentityProvider for FakeIdentity {
    async fn resolve_open_id(&self, code: &LoginCode) -> error_stack::Result<OpenId, KernelError> {
        match code.as_ref().strip_prefix("code-") {
            Some(open_id) => Ok(OpenId::new(open_id)),
            None => Err(Report::new(KernelError::Unauthorized)),
        }
    }

    async fn resolve_phone_number(
        &self,
        code: &PhoneCode,
    ) -> error_stack::Result<PhoneNumber, KernelError> {
        match code.as_ref().as_str() {
            "phone-ok" => Ok(PhoneNumber::new("13800000000")),
            _ => Err(Report::new(KernelError::External)),
        }
    }
}

pub struct TestModule {
    pub database: InMemoryDatabase,
    pub ledger: InMemoryReminderLedger,
    pub sender: RecordingSender,
    pub clock: FixedClock,
    administrators: Administrators,
    templates: NotificationTemplates,
}

impl TestModule {
    pub fn new() -> (Self, UnboundedReceiver<SubscribeMessage>) {
        let (outbox, inbox) = unbounded_channel();
        let templates = SubscribeMessageKind::ALL.into_iter().fold(
            NotificationTemplates::new("pages/myBorrows/myBorrows"),
            |templates, kind| templates.with_template(kind, format!("tmpl-{kind:?}-0123456789")),
        );
        let module = Self {
            database: InMemoryDatabase::new(),
            ledger: InMemoryReminderLedger::new(),
            sender: RecordingSender {
                outbox,
                failing: Arc::new(AtomicBool::new(false)),
            },
            clock: FixedClock(Arc::new(Mutex::new(datetime!(2024-03-01 09:00 +8)))),
            administrators: Administrators::new([OpenId::new(ADMIN)]),
            templates,
        };
        (module, inbox)
    }

    pub fn without_template(mut self, kind: SubscribeMessageKind) -> Self {
        self.templates = self.templates.with_template(kind, "YOUR_TEMPLATE_ID");
        self
    }
}

pub async fn next_message(inbox: &mut UnboundedReceiver<SubscribeMessage>) -> SubscribeMessage {
    tokio::time::timeout(Duration::from_secs(1), inbox.recv())
        .await
        .expect("no notification within a second")
        .expect("sender dropped")
}

pub async fn assert_silent(inbox: &mut UnboundedReceiver<SubscribeMessage>) {
    tokio::task::yield_now().await;
    assert!(inbox.try_recv().is_err(), "unexpected notification");
}

impl DependOnDatabaseConnection for TestModule {
    type DatabaseConnection = InMemoryDatabase;
    fn database_connection(&self) -> &Self::DatabaseConnection {
        &self.database
    }
}

impl DependOnBorrowRequestQuery for TestModule {
    type BorrowRequestQuery = InMemoryBorrowRequestRepository;
    fn borrow_request_query(&self) -> &Self::BorrowRequestQuery {
        &InMemoryBorrowRequestRepository
    }
}

impl DependOnBorrowRequestModifier for TestModule {
    type BorrowRequestModifier = InMemoryBorrowRequestRepository;
    fn borrow_request_modifier(&self) -> &Self::BorrowRequestModifier {
        &InMemoryBorrowRequestRepository
    }
}

impl DependOnUserQuery for TestModule {
    type UserQuery = InMemoryUserRepository;
    fn user_query(&self) -> &Self::UserQuery {
        &InMemoryUserRepository
    }
}

impl DependOnUserModifier for TestModule {
    type UserModifier = InMemoryUserRepository;
    fn user_modifier(&self) -> &Self::UserModifier {
        &InMemoryUserRepository
    }
}

impl DependOnReminderLedger for TestModule {
    type ReminderLedger = InMemoryReminderLedger;
    fn reminder_ledger(&self) -> &Self::ReminderLedger {
        &self.ledger
    }
}

impl DependOnSubscribeMessageSender for TestModule {
    type SubscribeMessageSender = RecordingSender;
    fn subscribe_message_sender(&self) -> &Self::SubscribeMessageSender {
        &self.sender
    }

    fn notification_templates(&self) -> &NotificationTemplates {
        &self.templates
    }
}

impl DependOnClock for TestModule {
    type Clock = FixedClock;
    fn clock(&self) -> &Self::Clock {
        &self.clock
    }
}

impl DependOnIdentityProvider for TestModule {
    type IdentityProvider = FakeIdentity;
    fn identity_provider(&self) -> &Self::IdentityProvider {
        &FakeIdentity
    }
}

impl DependOnAdministrators for TestModule {
    fn administrators(&self) -> &Administrators {
        &self.administrators
    }
}
