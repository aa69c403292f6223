use application::transfer::{DueReminderDto, ReminderOutcome, ReminderReportDto};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use kernel::prelude::entity::iso_date;
use serde::Serialize;
use time::Date;
use uuid::Uuid;

use crate::controller::Exhaust;

#[derive(Debug, Serialize)]
pub struct DueReminderResponse {
    id: Uuid,
    open_id: String,
    book_name: String,
    #[serde(with = "iso_date")]
    return_date: Date,
    days_left: i64,
    overdue: bool,
    outcome: &'static str,
}

#[derive(Debug, Serialize)]
pub struct ReminderReportResponse {
    total: usize,
    checked: usize,
    sent: usize,
    due: Vec<DueReminderResponse>,
}

impl IntoResponse for ReminderReportResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, axum::Json(self)).into_response()
    }
}

fn outcome_label(outcome: ReminderOutcome) -> &'static str {
    match outcome {
        ReminderOutcome::Sent => "sent",
        ReminderOutcome::AlreadySent => "already_sent",
        ReminderOutcome::Unconfigured => "unconfigured",
        ReminderOutcome::Failed => "failed",
    }
}

impl From<DueReminderDto> for DueReminderResponse {
    fn from(dto: DueReminderDto) -> Self {
        Self {
            id: dto.id,
            open_id: dto.open_id,
            book_name: dto.book_name,
            return_date: dto.return_date,
            days_left: dto.days_left,
            overdue: dto.overdue,
            outcome: outcome_label(dto.outcome),
        }
    }
}

pub struct ReminderPresenter;

impl Exhaust<ReminderReportDto> for ReminderPresenter {
    type To = ReminderReportResponse;
    fn emit(&self, output: ReminderReportDto) -> Self::To {
        ReminderReportResponse {
            total: output.total,
            checked: output.checked,
            sent: output.sent,
            due: output.due.into_iter().map(DueReminderResponse::from).collect(),
        }
    }
}

#[cfg(test)]
mod test {
    use application::transfer::{DueReminderDto, ReminderOutcome, ReminderReportDto};
    use time::macros::date;
    use uuid::Uuid;

    use crate::controller::Exhaust;

    use super::ReminderPresenter;

    #[test]
    fn report_lists_each_due_reminder() {
        let report = ReminderReportDto {
            total: 3,
            checked: 2,
            sent: 1,
            due: vec![DueReminderDto {
                id: Uuid::nil(),
                open_id: "o-reader".into(),
                book_name: "三体".into(),
                return_date: date!(2024 - 03 - 04),
                days_left: 3,
                overdue: false,
                outcome: ReminderOutcome::AlreadySent,
            }],
        };
        let json = serde_json::to_value(ReminderPresenter.emit(report)).unwrap();
        assert_eq!(json["total"], 3);
        assert_eq!(json["sent"], 1);
        assert_eq!(json["due"][0]["return_date"], "2024-03-04");
        assert_eq!(json["due"][0]["outcome"], "already_sent");
    }
}
