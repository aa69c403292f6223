use application::transfer::BorrowRequestDto;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::prelude::entity::iso_date;
use serde::Serialize;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::controller::Exhaust;

#[derive(Debug, Serialize)]
pub struct BorrowRequestResponse {
    id: Uuid,
    /// Shown to readers on the borrow slip.
    borrow_number: String,
    book_id: String,
    book_name: String,
    open_id: String,
    borrow_days: i32,
    status: String,
    name: Option<String>,
    phone: Option<String>,
    email: Option<String>,
    student_id: Option<String>,
    department: Option<String>,
    reason: Option<String>,
    remark: Option<String>,
    admin_open_id: Option<String>,
    admin_remark: Option<String>,
    #[serde(with = "iso_date::option")]
    borrow_date: Option<Date>,
    #[serde(with = "iso_date::option")]
    return_date: Option<Date>,
    #[serde(with = "time::serde::rfc3339::option")]
    borrow_time: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339::option")]
    return_time: Option<OffsetDateTime>,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    updated_at: OffsetDateTime,
    version: i64,
}

impl From<BorrowRequestDto> for BorrowRequestResponse {
    fn from(dto: BorrowRequestDto) -> Self {
        Self {
            id: dto.id,
            borrow_number: dto.id.simple().to_string(),
            book_id: dto.book_id,
            book_name: dto.book_name,
            open_id: dto.open_id,
            borrow_days: dto.borrow_days,
            status: dto.status,
            name: dto.name,
            phone: dto.phone,
            email: dto.email,
            student_id: dto.student_id,
            department: dto.department,
            reason: dto.reason,
            remark: dto.remark,
            admin_open_id: dto.admin_open_id,
            admin_remark: dto.admin_remark,
            borrow_date: dto.borrow_date,
            return_date: dto.return_date,
            borrow_time: dto.borrow_time,
            return_time: dto.return_time,
            created_at: dto.created_at,
            updated_at: dto.updated_at,
            version: dto.version,
        }
    }
}

impl IntoResponse for BorrowRequestResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, axum::Json(self)).into_response()
    }
}

#[derive(Debug, Serialize)]
#[serde(transparent)]
pub struct CreatedBorrowRequestResponse(BorrowRequestResponse);

impl IntoResponse for CreatedBorrowRequestResponse {
    fn into_response(self) -> Response {
        (StatusCode::CREATED, axum::Json(self)).into_response()
    }
}

pub struct BorrowPresenter;

impl Exhaust<BorrowRequestDto> for BorrowPresenter {
    type To = BorrowRequestResponse;
    fn emit(&self, output: BorrowRequestDto) -> Self::To {
        BorrowRequestResponse::from(output)
    }
}

impl Exhaust<Option<BorrowRequestDto>> for BorrowPresenter {
    type To = Option<BorrowRequestResponse>;
    fn emit(&self, output: Option<BorrowRequestDto>) -> Self::To {
        output.map(BorrowRequestResponse::from)
    }
}

impl Exhaust<Vec<BorrowRequestDto>> for BorrowPresenter {
    type To = axum::Json<Vec<BorrowRequestResponse>>;
    fn emit(&self, output: Vec<BorrowRequestDto>) -> Self::To {
        let result = output
            .into_iter()
            .map(BorrowRequestResponse::from)
            .collect::<Vec<_>>();
        axum::Json::from(result)
    }
}

pub struct SubmitPresenter;

impl Exhaust<BorrowRequestDto> for SubmitPresenter {
    type To = CreatedBorrowRequestResponse;
    fn emit(&self, output: BorrowRequestDto) -> Self::To {
        CreatedBorrowRequestResponse(BorrowRequestResponse::from(output))
    }
}

#[cfg(test)]
mod test {
    use application::transfer::BorrowRequestDto;
    use time::macros::{date, datetime};
    use uuid::Uuid;

    use super::BorrowRequestResponse;

    #[test]
    fn dates_are_rendered_for_the_mini_program() {
        let id = Uuid::new_v4();
        let dto = BorrowRequestDto {
            id,
            book_id: "b-1".into(),
            book_name: "三体".into(),
            open_id: "o-reader".into(),
            borrow_days: 7,
            status: "borrowed".into(),
            name: None,
            phone: None,
            email: None,
            student_id: None,
            department: None,
            reason: None,
            remark: None,
            admin_open_id: Some("o-admin".into()),
            admin_remark: None,
            borrow_date: Some(date!(2024 - 03 - 01)),
            return_date: Some(date!(2024 - 03 - 08)),
            borrow_time: Some(datetime!(2024-03-01 10:00 +8)),
            return_time: None,
            created_at: datetime!(2024-03-01 09:00 +8),
            updated_at: datetime!(2024-03-01 10:00 +8),
            version: 2,
        };
        let json = serde_json::to_value(BorrowRequestResponse::from(dto)).unwrap();
        assert_eq!(json["borrow_number"], id.simple().to_string());
        assert_eq!(json["borrow_date"], "2024-03-01");
        assert_eq!(json["return_date"], "2024-03-08");
        assert_eq!(json["borrow_time"], "2024-03-01T10:00:00+08:00");
        assert!(json["return_time"].is_null());
        assert_eq!(json["version"], 2);
    }
}
