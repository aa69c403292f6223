use error_stack::Report;
use time::Duration;
use tracing::info;

use kernel::interface::access::DependOnAdministrators;
use kernel::interface::clock::{Clock, DependOnClock};
use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::event::{Applier, BorrowEvent, EventInfo};
use kernel::interface::notify::{DependOnSubscribeMessageSender, Notice};
use kernel::interface::query::{BorrowRequestQuery, DependOnBorrowRequestQuery};
use kernel::interface::update::{BorrowRequestModifier, DependOnBorrowRequestModifier};
use kernel::prelude::entity::{
    parse_iso_date, Applicant, BookId, BookName, BorrowDate, BorrowDays, BorrowRequest,
    BorrowRequestId, BorrowStatus, BorrowTime, OpenId, ReturnDate, ReturnTime, Review,
    SelectLimit, SelectOffset,
};
use kernel::KernelError;

use crate::service::notify::spawn_notice;
use crate::transfer::{
    BorrowRequestDto, ConfirmBorrowDto, ConfirmReturnDto, GetAllBorrowRequestsDto,
    GetBorrowRequestDto, ReviewBorrowRequestDto, SubmitBorrowRequestDto,
};

fn required(field: &str, value: String) -> error_stack::Result<String, KernelError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Report::new(KernelError::Validation)
            .attach_printable(format!("`{field}` must not be empty")));
    }
    Ok(trimmed.to_string())
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[async_trait::async_trait]
pub trait SubmitBorrowRequestService:
    'static + Sync + Send + DependOnBorrowRequestModifier + DependOnClock + DependOnSubscribeMessageSender
{
    async fn submit_borrow_request(
        &self,
        actor: &OpenId,
        dto: SubmitBorrowRequestDto,
    ) -> error_stack::Result<BorrowRequestDto, KernelError> {
        let book_id = BookId::new(required("book_id", dto.book_id)?);
        let book_name = BookName::new(required("book_name", dto.book_name)?);
        let borrow_days = match dto.borrow_days {
            Some(days) => BorrowDays::validated(days)?,
            None => BorrowDays::default(),
        };
        let applicant = Applicant::new(
            optional(dto.name),
            optional(dto.phone),
            optional(dto.email),
            optional(dto.student_id),
            optional(dto.department),
            optional(dto.reason),
            optional(dto.remark),
        );

        let now = self.clock().now();
        let mut request = None;
        request.apply(EventInfo::new(
            BorrowEvent::Submit {
                id: BorrowRequestId::default(),
                book_id,
                book_name,
                requester: actor.clone(),
                borrow_days,
                applicant,
            },
            now,
        ))?;
        let request = request.ok_or_else(|| {
            Report::new(KernelError::Internal).attach_printable("submit produced no request")
        })?;

        let mut connection = self.database_connection().transact().await?;
        self.borrow_request_modifier()
            .create(&mut connection, &request)
            .await?;
        connection.commit().await?;
        info!(id = %request.id().as_ref(), requester = %actor.as_ref(), "borrow request submitted");

        spawn_notice(
            self,
            request.requester(),
            Notice::RequestSubmitted {
                book_name: request.book_name().clone(),
                submitted_on: self.clock().today(),
            },
        );
        Ok(BorrowRequestDto::from(request))
    }
}

impl<T> SubmitBorrowRequestService for T where
    T: DependOnBorrowRequestModifier + DependOnClock + DependOnSubscribeMessageSender
{
}

#[async_trait::async_trait]
pub trait GetBorrowRequestService:
    'static + Sync + Send + DependOnBorrowRequestQuery + DependOnAdministrators
{
    async fn get_borrow_request(
        &self,
        actor: &OpenId,
        dto: GetBorrowRequestDto,
    ) -> error_stack::Result<Option<BorrowRequestDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let id = BorrowRequestId::new(dto.id);
        let request = self
            .borrow_request_query()
            .find_by_id(&mut connection, &id)
            .await?;
        match request {
            None => Ok(None),
            Some(request)
                if request.is_requested_by(actor) || self.administrators().contains(actor) =>
            {
                Ok(Some(BorrowRequestDto::from(request)))
            }
            Some(_) => Err(Report::new(KernelError::Forbidden)
                .attach_printable(format!("{} does not own request {}", actor.as_ref(), dto.id))),
        }
    }

    async fn get_all_borrow_requests(
        &self,
        actor: &OpenId,
        dto: GetAllBorrowRequestsDto,
    ) -> error_stack::Result<Vec<BorrowRequestDto>, KernelError> {
        self.administrators().ensure(actor)?;
        let status = dto
            .status
            .as_deref()
            .map(str::parse::<BorrowStatus>)
            .transpose()?;
        let limit = dto.limit.map(SelectLimit::new).unwrap_or_default();
        let offset = dto.offset.map(SelectOffset::new).unwrap_or_default();

        let mut connection = self.database_connection().transact().await?;
        let requests = self
            .borrow_request_query()
            .find_all(&mut connection, status.as_ref(), &limit, &offset)
            .await?;
        Ok(requests.into_iter().map(BorrowRequestDto::from).collect())
    }

    async fn get_my_borrow_requests(
        &self,
        actor: &OpenId,
    ) -> error_stack::Result<Vec<BorrowRequestDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let requests = self
            .borrow_request_query()
            .find_by_requester(&mut connection, actor)
            .await?;
        Ok(requests.into_iter().map(BorrowRequestDto::from).collect())
    }
}

impl<T> GetBorrowRequestService for T where
    T: DependOnBorrowRequestQuery + DependOnAdministrators
{
}

/// Loads the request, applies the event built from it and writes it back
/// guarded by the version it was read at.
async fn transition<T, F>(
    module: &T,
    id: &BorrowRequestId,
    expected: Option<i64>,
    event: F,
) -> error_stack::Result<BorrowRequest, KernelError>
where
    T: DependOnBorrowRequestQuery + DependOnBorrowRequestModifier + DependOnClock + ?Sized,
    F: FnOnce(&BorrowRequest) -> error_stack::Result<BorrowEvent, KernelError> + Send,
{
    let mut connection = module.database_connection().transact().await?;
    let mut request = module
        .borrow_request_query()
        .find_by_id(&mut connection, id)
        .await?;
    let Some(stored) = request.as_ref() else {
        return Err(Report::new(KernelError::NotFound)
            .attach_printable(format!("borrow request {} does not exist", id.as_ref())));
    };
    let read_version = stored.version().clone();
    if let Some(expected) = expected {
        if expected != *read_version.as_ref() {
            return Err(Report::new(KernelError::Concurrency).attach_printable(format!(
                "expected version {expected}, found {}",
                read_version.as_ref()
            )));
        }
    }
    let event = event(stored)?;
    request.apply(EventInfo::new(event, module.clock().now()))?;
    let request = request.ok_or_else(|| {
        Report::new(KernelError::Internal).attach_printable("transition dropped the request")
    })?;

    module
        .borrow_request_modifier()
        .update(&mut connection, &request, &read_version)
        .await?;
    connection.commit().await?;
    info!(id = %id.as_ref(), status = %request.status(), "borrow request moved");
    Ok(request)
}

#[async_trait::async_trait]
pub trait ReviewBorrowRequestService:
    'static
    + Sync
    + Send
    + DependOnBorrowRequestQuery
    + DependOnBorrowRequestModifier
    + DependOnClock
    + DependOnAdministrators
    + DependOnSubscribeMessageSender
{
    async fn review_borrow_request(
        &self,
        actor: &OpenId,
        dto: ReviewBorrowRequestDto,
    ) -> error_stack::Result<BorrowRequestDto, KernelError> {
        self.administrators().ensure(actor)?;
        let today = self.clock().today();
        let review = Review::new(actor.clone(), optional(dto.admin_remark));
        let approve = dto.approve;
        let request = transition(self, &BorrowRequestId::new(dto.id), dto.version, |request| {
            if !approve {
                return Ok(BorrowEvent::Reject { review });
            }
            let days = Duration::days(i64::from(*request.borrow_days().as_ref()));
            let due = today.checked_add(days).ok_or_else(|| {
                Report::new(KernelError::Validation).attach_printable("due date out of range")
            })?;
            Ok(BorrowEvent::Approve {
                review,
                borrow_date: BorrowDate::new(today),
                return_date: ReturnDate::new(due),
            })
        })
        .await?;

        spawn_notice(
            self,
            request.requester(),
            Notice::ReviewResult {
                book_name: request.book_name().clone(),
                approved: approve,
                remark: request.review().as_ref().and_then(|review| review.remark().clone()),
            },
        );
        Ok(BorrowRequestDto::from(request))
    }
}

impl<T> ReviewBorrowRequestService for T where
    T: DependOnBorrowRequestQuery
        + DependOnBorrowRequestModifier
        + DependOnClock
        + DependOnAdministrators
        + DependOnSubscribeMessageSender
{
}

#[async_trait::async_trait]
pub trait ConfirmBorrowService:
    'static
    + Sync
    + Send
    + DependOnBorrowRequestQuery
    + DependOnBorrowRequestModifier
    + DependOnClock
    + DependOnAdministrators
    + DependOnSubscribeMessageSender
{
    async fn confirm_borrow(
        &self,
        actor: &OpenId,
        dto: ConfirmBorrowDto,
    ) -> error_stack::Result<BorrowRequestDto, KernelError> {
        self.administrators().ensure(actor)?;
        let due_date = parse_iso_date(dto.due_date.trim())?;
        let now = self.clock().now();
        let today = self.clock().today();
        let request = transition(self, &BorrowRequestId::new(dto.id), dto.version, |_| {
            Ok(BorrowEvent::Lend {
                borrow_date: BorrowDate::new(today),
                return_date: ReturnDate::new(due_date),
                borrow_time: BorrowTime::new(now),
            })
        })
        .await?;

        spawn_notice(
            self,
            request.requester(),
            Notice::BorrowSuccess {
                id: request.id().clone(),
                book_name: request.book_name().clone(),
                borrow_date: today,
                return_date: due_date,
            },
        );
        Ok(BorrowRequestDto::from(request))
    }
}

impl<T> ConfirmBorrowService for T where
    T: DependOnBorrowRequestQuery
        + DependOnBorrowRequestModifier
        + DependOnClock
        + DependOnAdministrators
        + DependOnSubscribeMessageSender
{
}

#[async_trait::async_trait]
pub trait ConfirmReturnService:
    'static
    + Sync
    + Send
    + DependOnBorrowRequestQuery
    + DependOnBorrowRequestModifier
    + DependOnClock
    + DependOnAdministrators
    + DependOnSubscribeMessageSender
{
    async fn confirm_return(
        &self,
        actor: &OpenId,
        dto: ConfirmReturnDto,
    ) -> error_stack::Result<BorrowRequestDto, KernelError> {
        self.administrators().ensure(actor)?;
        let now = self.clock().now();
        let request = transition(self, &BorrowRequestId::new(dto.id), dto.version, |_| {
            Ok(BorrowEvent::Return {
                return_time: ReturnTime::new(now),
            })
        })
        .await?;

        spawn_notice(
            self,
            request.requester(),
            Notice::ReturnSuccess {
                id: request.id().clone(),
                book_name: request.book_name().clone(),
                returned_on: self.clock().today(),
            },
        );
        Ok(BorrowRequestDto::from(request))
    }
}

impl<T> ConfirmReturnService for T where
    T: DependOnBorrowRequestQuery
        + DependOnBorrowRequestModifier
        + DependOnClock
        + DependOnAdministrators
        + DependOnSubscribeMessageSender
{
}
