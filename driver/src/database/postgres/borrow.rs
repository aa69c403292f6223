use error_stack::Report;
use sqlx::PgConnection;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use kernel::interface::clock::BEIJING_OFFSET;
use kernel::interface::query::BorrowRequestQuery;
use kernel::interface::update::BorrowRequestModifier;
use kernel::prelude::entity::{
    Applicant, BookId, BookName, BorrowDate, BorrowDays, BorrowRequest, BorrowRequestId,
    BorrowStatus, BorrowTime, CreatedAt, DestructApplicant, DestructBorrowRequest, OpenId,
    ReturnDate, ReturnTime, Review, SelectLimit, SelectOffset, UpdatedAt, Version,
};
use kernel::KernelError;

use crate::database::postgres::PostgresTransaction;
use crate::error::ConvertError;

pub struct PostgresBorrowRequestRepository;

#[async_trait::async_trait]
impl BorrowRequestQuery for PostgresBorrowRequestRepository {
    type Transaction = PostgresTransaction;

    async fn find_by_id(
        &self,
        con: &mut PostgresTransaction,
        id: &BorrowRequestId,
    ) -> error_stack::Result<Option<BorrowRequest>, KernelError> {
        PgBorrowRequestInternal::find_by_id(con, id).await
    }

    async fn find_all(
        &self,
        con: &mut PostgresTransaction,
        status: Option<&BorrowStatus>,
        limit: &SelectLimit,
        offset: &SelectOffset,
    ) -> error_stack::Result<Vec<BorrowRequest>, KernelError> {
        PgBorrowRequestInternal::find_all(con, status, Some(*limit.as_ref()), *offset.as_ref())
            .await
    }

    async fn find_by_requester(
        &self,
        con: &mut PostgresTransaction,
        requester: &OpenId,
    ) -> error_stack::Result<Vec<BorrowRequest>, KernelError> {
        PgBorrowRequestInternal::find_by_requester(con, requester).await
    }

    async fn find_by_status(
        &self,
        con: &mut PostgresTransaction,
        status: &BorrowStatus,
    ) -> error_stack::Result<Vec<BorrowRequest>, KernelError> {
        PgBorrowRequestInternal::find_all(con, Some(status), None, 0).await
    }
}

#[async_trait::async_trait]
impl BorrowRequestModifier for PostgresBorrowRequestRepository {
    type Transaction = PostgresTransaction;

    async fn create(
        &self,
        con: &mut PostgresTransaction,
        request: &BorrowRequest,
    ) -> error_stack::Result<(), KernelError> {
        PgBorrowRequestInternal::create(con, request).await
    }

    async fn update(
        &self,
        con: &mut PostgresTransaction,
        request: &BorrowRequest,
        expected: &Version<BorrowRequest>,
    ) -> error_stack::Result<(), KernelError> {
        PgBorrowRequestInternal::update(con, request, expected).await
    }
}

#[derive(sqlx::FromRow)]
struct BorrowRequestRow {
    id: Uuid,
    book_id: String,
    book_name: String,
    requester: String,
    borrow_days: i32,
    status: String,
    applicant_name: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    student_id: Option<String>,
    department: Option<String>,
    reason: Option<String>,
    remark: Option<String>,
    admin_open_id: Option<String>,
    admin_remark: Option<String>,
    borrow_date: Option<Date>,
    return_date: Option<Date>,
    borrow_time: Option<OffsetDateTime>,
    return_time: Option<OffsetDateTime>,
    created_at: OffsetDateTime,
    updated_at: OffsetDateTime,
    version: i64,
}

impl TryFrom<BorrowRequestRow> for BorrowRequest {
    type Error = Report<KernelError>;

    fn try_from(value: BorrowRequestRow) -> Result<Self, Self::Error> {
        let status = value.status.parse::<BorrowStatus>()?;
        let review = value
            .admin_open_id
            .map(|admin| Review::new(OpenId::new(admin), value.admin_remark));
        Ok(BorrowRequest::new(
            BorrowRequestId::new(value.id),
            BookId::new(value.book_id),
            BookName::new(value.book_name),
            OpenId::new(value.requester),
            BorrowDays::new(value.borrow_days),
            status,
            Applicant::new(
                value.applicant_name,
                value.phone,
                value.email,
                value.student_id,
                value.department,
                value.reason,
                value.remark,
            ),
            review,
            value.borrow_date.map(BorrowDate::new),
            value.return_date.map(ReturnDate::new),
            value
                .borrow_time
                .map(|time| BorrowTime::new(time.to_offset(BEIJING_OFFSET))),
            value
                .return_time
                .map(|time| ReturnTime::new(time.to_offset(BEIJING_OFFSET))),
            CreatedAt::new(value.created_at.to_offset(BEIJING_OFFSET)),
            UpdatedAt::new(value.updated_at.to_offset(BEIJING_OFFSET)),
            Version::new(value.version),
        ))
    }
}

pub(in crate::database) struct PgBorrowRequestInternal;

impl PgBorrowRequestInternal {
    async fn find_by_id(
        con: &mut PgConnection,
        id: &BorrowRequestId,
    ) -> error_stack::Result<Option<BorrowRequest>, KernelError> {
        let row = sqlx::query_as::<_, BorrowRequestRow>(
            // language=postgresql
            r#"
            SELECT id, book_id, book_name, requester, borrow_days, status,
                   applicant_name, phone, email, student_id, department, reason, remark,
                   admin_open_id, admin_remark, borrow_date, return_date, borrow_time, return_time,
                   created_at, updated_at, version
            FROM borrow_requests
            WHERE id = $1
            "#,
        )
        .bind(id.as_ref())
        .fetch_optional(con)
        .await
        .convert_error()?;
        row.map(BorrowRequest::try_from).transpose()
    }

    async fn find_all(
        con: &mut PgConnection,
        status: Option<&BorrowStatus>,
        limit: Option<i64>,
        offset: i64,
    ) -> error_stack::Result<Vec<BorrowRequest>, KernelError> {
        // A NULL limit means no limit.
        let rows = sqlx::query_as::<_, BorrowRequestRow>(
            // language=postgresql
            r#"
            SELECT id, book_id, book_name, requester, borrow_days, status,
                   applicant_name, phone, email, student_id, department, reason, remark,
                   admin_open_id, admin_remark, borrow_date, return_date, borrow_time, return_time,
                   created_at, updated_at, version
            FROM borrow_requests
            WHERE $1::TEXT IS NULL OR status = $1
            ORDER BY created_at DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(status.map(BorrowStatus::as_str))
        .bind(limit)
        .bind(offset)
        .fetch_all(con)
        .await
        .convert_error()?;
        rows.into_iter().map(BorrowRequest::try_from).collect()
    }

    async fn find_by_requester(
        con: &mut PgConnection,
        requester: &OpenId,
    ) -> error_stack::Result<Vec<BorrowRequest>, KernelError> {
        let rows = sqlx::query_as::<_, BorrowRequestRow>(
            // language=postgresql
            r#"
            SELECT id, book_id, book_name, requester, borrow_days, status,
                   applicant_name, phone, email, student_id, department, reason, remark,
                   admin_open_id, admin_remark, borrow_date, return_date, borrow_time, return_time,
                   created_at, updated_at, version
            FROM borrow_requests
            WHERE requester = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(requester.as_ref())
        .fetch_all(con)
        .await
        .convert_error()?;
        rows.into_iter().map(BorrowRequest::try_from).collect()
    }

    async fn create(
        con: &mut PgConnection,
        request: &BorrowRequest,
    ) -> error_stack::Result<(), KernelError> {
        let DestructApplicant {
            name,
            phone,
            email,
            student_id,
            department,
            reason,
            remark,
        } = request.applicant().clone().into_destruct();
        // language=postgresql
        sqlx::query(
            r#"
            INSERT INTO borrow_requests (id, book_id, book_name, requester, borrow_days, status,
                                         applicant_name, phone, email, student_id, department, reason, remark,
                                         created_at, updated_at, version)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(request.id().as_ref())
        .bind(request.book_id().as_ref())
        .bind(request.book_name().as_ref())
        .bind(request.requester().as_ref())
        .bind(request.borrow_days().as_ref())
        .bind(request.status().as_str())
        .bind(name)
        .bind(phone)
        .bind(email)
        .bind(student_id)
        .bind(department)
        .bind(reason)
        .bind(remark)
        .bind(request.created_at().as_ref())
        .bind(request.updated_at().as_ref())
        .bind(request.version().as_ref())
        .execute(con)
        .await
        .convert_error()?;
        Ok(())
    }

    async fn update(
        con: &mut PgConnection,
        request: &BorrowRequest,
        expected: &Version<BorrowRequest>,
    ) -> error_stack::Result<(), KernelError> {
        let DestructBorrowRequest {
            id,
            status,
            review,
            borrow_date,
            return_date,
            borrow_time,
            return_time,
            updated_at,
            version,
            ..
        } = request.clone().into_destruct();
        // language=postgresql
        let result = sqlx::query(
            r#"
            UPDATE borrow_requests
            SET status = $3, admin_open_id = $4, admin_remark = $5,
                borrow_date = $6, return_date = $7, borrow_time = $8, return_time = $9,
                updated_at = $10, version = $11
            WHERE id = $1 AND version = $2
            "#,
        )
        .bind(id.as_ref())
        .bind(expected.as_ref())
        .bind(status.as_str())
        .bind(review.as_ref().map(|review| review.reviewer().as_ref().clone()))
        .bind(review.as_ref().and_then(|review| review.remark().clone()))
        .bind(borrow_date.map(Date::from))
        .bind(return_date.map(Date::from))
        .bind(borrow_time.map(OffsetDateTime::from))
        .bind(return_time.map(OffsetDateTime::from))
        .bind(updated_at.as_ref())
        .bind(version.as_ref())
        .execute(con)
        .await
        .convert_error()?;
        if result.rows_affected() == 0 {
            return Err(Report::new(KernelError::Concurrency).attach_printable(format!(
                "borrow request {} is no longer at version {}",
                id.as_ref(),
                expected.as_ref()
            )));
        }
        Ok(())
    }
}
