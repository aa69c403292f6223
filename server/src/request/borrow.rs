use application::transfer::{
    ConfirmBorrowDto, ConfirmReturnDto, GetAllBorrowRequestsDto, GetBorrowRequestDto,
    ReviewBorrowRequestDto, SubmitBorrowRequestDto,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::controller::Intake;

#[derive(Debug, Deserialize)]
pub struct SubmitBorrowRequest {
    #[serde(alias = "bookId")]
    book_id: String,
    #[serde(alias = "bookName")]
    book_name: String,
    #[serde(default, alias = "borrowDays")]
    borrow_days: Option<i32>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    phone: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default, alias = "studentId")]
    student_id: Option<String>,
    #[serde(default)]
    department: Option<String>,
    #[serde(default)]
    reason: Option<String>,
    #[serde(default)]
    remark: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct GetAllBorrowRequestsQuery {
    status: Option<String>,
    limit: Option<i64>,
    offset: Option<i64>,
}

#[derive(Debug)]
pub struct GetBorrowRequest {
    id: Uuid,
}

impl GetBorrowRequest {
    pub fn new(id: Uuid) -> Self {
        Self { id }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReviewAction {
    Approve,
    Reject,
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    action: ReviewAction,
    #[serde(default, alias = "adminRemark")]
    admin_remark: Option<String>,
    #[serde(default)]
    version: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct LendRequest {
    #[serde(alias = "dueDate")]
    due_date: String,
    #[serde(default)]
    version: Option<i64>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ReturnRequest {
    #[serde(default)]
    version: Option<i64>,
}

pub struct BorrowTransformer;

impl Intake<SubmitBorrowRequest> for BorrowTransformer {
    type To = SubmitBorrowRequestDto;
    fn emit(&self, input: SubmitBorrowRequest) -> Self::To {
        SubmitBorrowRequestDto {
            book_id: input.book_id,
            book_name: input.book_name,
            borrow_days: input.borrow_days,
            name: input.name,
            phone: input.phone,
            email: input.email,
            student_id: input.student_id,
            department: input.department,
            reason: input.reason,
            remark: input.remark,
        }
    }
}

impl Intake<GetAllBorrowRequestsQuery> for BorrowTransformer {
    type To = GetAllBorrowRequestsDto;
    fn emit(&self, input: GetAllBorrowRequestsQuery) -> Self::To {
        GetAllBorrowRequestsDto {
            status: input.status.filter(|status| !status.trim().is_empty()),
            limit: input.limit,
            offset: input.offset,
        }
    }
}

impl Intake<GetBorrowRequest> for BorrowTransformer {
    type To = GetBorrowRequestDto;
    fn emit(&self, input: GetBorrowRequest) -> Self::To {
        GetBorrowRequestDto { id: input.id }
    }
}

impl Intake<(Uuid, ReviewRequest)> for BorrowTransformer {
    type To = ReviewBorrowRequestDto;
    fn emit(&self, (id, req): (Uuid, ReviewRequest)) -> Self::To {
        ReviewBorrowRequestDto {
            id,
            approve: req.action == ReviewAction::Approve,
            admin_remark: req.admin_remark,
            version: req.version,
        }
    }
}

impl Intake<(Uuid, LendRequest)> for BorrowTransformer {
    type To = ConfirmBorrowDto;
    fn emit(&self, (id, req): (Uuid, LendRequest)) -> Self::To {
        ConfirmBorrowDto {
            id,
            due_date: req.due_date,
            version: req.version,
        }
    }
}

impl Intake<(Uuid, ReturnRequest)> for BorrowTransformer {
    type To = ConfirmReturnDto;
    fn emit(&self, (id, req): (Uuid, ReturnRequest)) -> Self::To {
        ConfirmReturnDto {
            id,
            version: req.version,
        }
    }
}

#[cfg(test)]
mod test {
    use uuid::Uuid;

    use crate::controller::Intake;

    use super::{
        BorrowTransformer, GetAllBorrowRequestsQuery, LendRequest, ReviewRequest,
        SubmitBorrowRequest,
    };

    #[test]
    fn submit_accepts_mini_program_field_names() {
        let req: SubmitBorrowRequest = serde_json::from_str(
            r#"{"bookId":"b-1","bookName":"三体","borrowDays":14,"studentId":"2021001","reason":"课程"}"#,
        )
        .unwrap();
        let dto = BorrowTransformer.emit(req);
        assert_eq!(dto.book_id, "b-1");
        assert_eq!(dto.book_name, "三体");
        assert_eq!(dto.borrow_days, Some(14));
        assert_eq!(dto.student_id.as_deref(), Some("2021001"));
        assert_eq!(dto.reason.as_deref(), Some("课程"));
        assert!(dto.phone.is_none());
    }

    #[test]
    fn review_action_decides_approval() {
        let id = Uuid::new_v4();
        let approve: ReviewRequest =
            serde_json::from_str(r#"{"action":"approve","version":2}"#).unwrap();
        let dto = BorrowTransformer.emit((id, approve));
        assert!(dto.approve);
        assert_eq!(dto.version, Some(2));

        let reject: ReviewRequest =
            serde_json::from_str(r#"{"action":"reject","admin_remark":"已借出"}"#).unwrap();
        let dto = BorrowTransformer.emit((id, reject));
        assert!(!dto.approve);
        assert_eq!(dto.admin_remark.as_deref(), Some("已借出"));

        assert!(serde_json::from_str::<ReviewRequest>(r#"{"action":"maybe"}"#).is_err());
    }

    #[test]
    fn lend_needs_due_date() {
        assert!(serde_json::from_str::<LendRequest>("{}").is_err());
        let req: LendRequest = serde_json::from_str(r#"{"due_date":"2024-03-15"}"#).unwrap();
        let dto = BorrowTransformer.emit((Uuid::nil(), req));
        assert_eq!(dto.due_date, "2024-03-15");
        assert!(dto.version.is_none());
    }

    #[test]
    fn blank_status_filter_means_all() {
        let query = GetAllBorrowRequestsQuery {
            status: Some(" ".into()),
            limit: Some(10),
            offset: None,
        };
        let dto = BorrowTransformer.emit(query);
        assert!(dto.status.is_none());
        assert_eq!(dto.limit, Some(10));
    }
}
