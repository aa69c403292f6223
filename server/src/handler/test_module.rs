use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use error_stack::Report;
use http_body_util::BodyExt;
use serde_json::Value;
use time::macros::datetime;
use time::OffsetDateTime;
use tower::ServiceExt;

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
    SubscribeMessageSender,
};
use kernel::interface::query::{DependOnBorrowRequestQuery, DependOnUserQuery};
use kernel::interface::reminder::DependOnReminderLedger;
use kernel::interface::update::{DependOnBorrowRequestModifier, DependOnUserModifier};
use kernel::prelude::entity::{OpenId, PhoneNumber};
use kernel::KernelError;

use crate::extract::OPENID_HEADER;
use crate::handler::AppModule;
use crate::route::{BorrowRouter, ReminderRouter, UserRouter};

pub const ADMIN: &str = "admin";
pub const READER: &str = "reader";

#[derive(Clone)]
pub struct AcceptingSender;

#[async_trait::async_trait]
impl SubscribeMessageSender for AcceptingSender {
    async fn send(&self, _: &SubscribeMessage) -> error_stack::Result<(), KernelError> {
        Ok(())
    }
}

pub struct StoppedClock;

impl Clock for StoppedClock {
    fn now(&self) -> OffsetDateTime {
        datetime!(2024-03-01 09:00 +8)
    }
}

pub struct CodeIdentity;

#[async_trait::async_trait]
impl IdentityProvider for CodeIdentity {
    async fn resolve_open_id(&self, code: &LoginCode) -> error_stack::Result<OpenId, KernelError> {
        match code.as_ref().strip_prefix("code-") {
            Some(open_id) => Ok(OpenId::new(open_id)),
            None => Err(Report::new(KernelError::Unauthorized)),
        }
    }

    async fn resolve_phone_number(
        &self,
        _: &PhoneCode,
    ) -> error_stack::Result<PhoneNumber, KernelError> {
        Err(Report::new(KernelError::External))
    }
}

pub struct TestHandler {
    database: InMemoryDatabase,
    ledger: InMemoryReminderLedger,
    administrators: Administrators,
    templates: NotificationTemplates,
}

/// Every business route over in-memory storage, with [`ADMIN`] as the only
/// administrator.
pub fn app() -> Router {
    let handler = TestHandler {
        database: InMemoryDatabase::new(),
        ledger: InMemoryReminderLedger::new(),
        administrators: Administrators::new([OpenId::new(ADMIN)]),
        templates: NotificationTemplates::new("pages/myBorrows/myBorrows"),
    };
    Router::<AppModule<TestHandler>>::new()
        .route_borrow()
        .route_user()
        .route_reminder()
        .with_state(AppModule::with_handler(handler))
}

pub fn request(method: &str, uri: &str, actor: Option<&str>, body: Option<Value>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(actor) = actor {
        builder = builder.header(OPENID_HEADER, actor);
    }
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

/// Sends `request` and returns the status with the JSON body (`Null` when empty).
pub async fn call(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    if body.is_empty() {
        return (status, Value::Null);
    }
    (status, serde_json::from_slice(&body).unwrap())
}

impl DependOnDatabaseConnection for TestHandler {
    type DatabaseConnection = InMemoryDatabase;
    fn database_connection(&self) -> &Self::DatabaseConnection {
        &self.database
    }
}

impl DependOnBorrowRequestQuery for TestHandler {
    type BorrowRequestQuery = InMemoryBorrowRequestRepository;
    fn borrow_request_query(&self) -> &Self::BorrowRequestQuery {
        &InMemoryBorrowRequestRepository
    }
}

impl DependOnBorrowRequestModifier for TestHandler {
    type BorrowRequestModifier = InMemoryBorrowRequestRepository;
    fn borrow_request_modifier(&self) -> &Self::BorrowRequestModifier {
        &InMemoryBorrowRequestRepository
    }
}

impl DependOnUserQuery for TestHandler {
    type UserQuery = InMemoryUserRepository;
    fn user_query(&self) -> &Self::UserQuery {
        &InMemoryUserRepository
    }
}

impl DependOnUserModifier for TestHandler {
    type UserModifier = InMemoryUserRepository;
    fn user_modifier(&self) -> &Self::UserModifier {
        &InMemoryUserRepository
    }
}

impl DependOnReminderLedger for TestHandler {
    type ReminderLedger = InMemoryReminderLedger;
    fn reminder_ledger(&self) -> &Self::ReminderLedger {
        &self.ledger
    }
}

impl DependOnSubscribeMessageSender for TestHandler {
    type SubscribeMessageSender = AcceptingSender;
    fn subscribe_message_sender(&self) -> &Self::SubscribeMessageSender {
        &AcceptingSender
    }

    fn notification_templates(&self) -> &NotificationTemplates {
        &self.templates
    }
}

impl DependOnIdentityProvider for TestHandler {
    type IdentityProvider = CodeIdentity;
    fn identity_provider(&self) -> &Self::IdentityProvider {
        &CodeIdentity
    }
}

impl DependOnClock for TestHandler {
    type Clock = StoppedClock;
    fn clock(&self) -> &Self::Clock {
        &StoppedClock
    }
}

impl DependOnAdministrators for TestHandler {
    fn administrators(&self) -> &Administrators {
        &self.administrators
    }
}
