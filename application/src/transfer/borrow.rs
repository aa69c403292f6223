use time::{Date, OffsetDateTime};
use uuid::Uuid;

use kernel::prelude::entity::{
    BorrowRequest, DestructApplicant, DestructBorrowRequest, DestructReview,
};

#[derive(Debug, Clone)]
pub struct BorrowRequestDto {
    pub id: Uuid,
    pub book_id: String,
    pub book_name: String,
    pub open_id: String,
    pub borrow_days: i32,
    pub status: String,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub student_id: Option<String>,
    pub department: Option<String>,
    pub reason: Option<String>,
    pub remark: Option<String>,
    pub admin_open_id: Option<String>,
    pub admin_remark: Option<String>,
    pub borrow_date: Option<Date>,
    pub return_date: Option<Date>,
    pub borrow_time: Option<OffsetDateTime>,
    pub return_time: Option<OffsetDateTime>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
    pub version: i64,
}

impl From<BorrowRequest> for BorrowRequestDto {
    fn from(value: BorrowRequest) -> Self {
        let DestructBorrowRequest {
            id,
            book_id,
            book_name,
            requester,
            borrow_days,
            status,
            applicant,
            review,
            borrow_date,
            return_date,
            borrow_time,
            return_time,
            created_at,
            updated_at,
            version,
        } = value.into_destruct();
        let DestructApplicant {
            name,
            phone,
            email,
            student_id,
            department,
            reason,
            remark,
        } = applicant.into_destruct();
        let (admin_open_id, admin_remark) = match review.map(|review| review.into_destruct()) {
            Some(DestructReview { reviewer, remark }) => (Some(reviewer.into()), remark),
            None => (None, None),
        };
        Self {
            id: id.into(),
            book_id: book_id.into(),
            book_name: book_name.into(),
            open_id: requester.into(),
            borrow_days: borrow_days.into(),
            status: status.as_str().to_string(),
            name,
            phone,
            email,
            student_id,
            department,
            reason,
            remark,
            admin_open_id,
            admin_remark,
            borrow_date: borrow_date.map(Date::from),
            return_date: return_date.map(Date::from),
            borrow_time: borrow_time.map(OffsetDateTime::from),
            return_time: return_time.map(OffsetDateTime::from),
            created_at: created_at.into(),
            updated_at: updated_at.into(),
            version: version.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SubmitBorrowRequestDto {
    pub book_id: String,
    pub book_name: String,
    /// Defaults to seven days.
    pub borrow_days: Option<i32>,
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub student_id: Option<String>,
    pub department: Option<String>,
    pub reason: Option<String>,
    pub remark: Option<String>,
}

pub struct GetBorrowRequestDto {
    pub id: Uuid,
}

#[derive(Debug, Clone, Default)]
pub struct GetAllBorrowRequestsDto {
    pub status: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct ReviewBorrowRequestDto {
    pub id: Uuid,
    pub approve: bool,
    pub admin_remark: Option<String>,
    pub version: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct ConfirmBorrowDto {
    pub id: Uuid,
    /// `YYYY-MM-DD`
    pub due_date: String,
    pub version: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct ConfirmReturnDto {
    pub id: Uuid,
    pub version: Option<i64>,
}
