use error_stack::Report;

use crate::entity::{
    Applicant, BookId, BookName, BorrowDate, BorrowDays, BorrowRequest, BorrowRequestId,
    BorrowStatus, BorrowTime, CreatedAt, OpenId, ReturnDate, ReturnTime, Review, UpdatedAt,
    Version,
};
use crate::event::{Applier, DestructEventInfo, EventInfo};
use crate::KernelError;

#[derive(Debug, Clone, Eq, PartialEq)]
pub enum BorrowEvent {
    Submit {
        id: BorrowRequestId,
        book_id: BookId,
        book_name: BookName,
        requester: OpenId,
        borrow_days: BorrowDays,
        applicant: Applicant,
    },
    Approve {
        review: Review,
        borrow_date: BorrowDate,
        return_date: ReturnDate,
    },
    Reject {
        review: Review,
    },
    Lend {
        borrow_date: BorrowDate,
        return_date: ReturnDate,
        borrow_time: BorrowTime,
    },
    Return {
        return_time: ReturnTime,
    },
}

impl BorrowEvent {
    pub fn target_status(&self) -> BorrowStatus {
        match self {
            BorrowEvent::Submit { .. } => BorrowStatus::Pending,
            BorrowEvent::Approve { .. } => BorrowStatus::Approved,
            BorrowEvent::Reject { .. } => BorrowStatus::Rejected,
            BorrowEvent::Lend { .. } => BorrowStatus::Borrowed,
            BorrowEvent::Return { .. } => BorrowStatus::Returned,
        }
    }
}

impl Applier<EventInfo<BorrowEvent>> for Option<BorrowRequest> {
    fn apply(&mut self, event: EventInfo<BorrowEvent>) -> error_stack::Result<(), KernelError> {
        let DestructEventInfo { event, occurred_at } = event.into_destruct();
        match (self, event) {
            (
                option @ None,
                BorrowEvent::Submit {
                    id,
                    book_id,
                    book_name,
                    requester,
                    borrow_days,
                    applicant,
                },
            ) => {
                *option = Some(BorrowRequest::new(
                    id,
                    book_id,
                    book_name,
                    requester,
                    borrow_days,
                    BorrowStatus::Pending,
                    applicant,
                    None,
                    None,
                    None,
                    None,
                    None,
                    CreatedAt::new(occurred_at),
                    UpdatedAt::new(occurred_at),
                    Version::initial(),
                ));
                Ok(())
            }
            (Some(request), BorrowEvent::Submit { .. }) => Err(Report::new(
                KernelError::InvalidTransition,
            )
            .attach_printable(format!(
                "borrow request {} already exists",
                request.id().as_ref()
            ))),
            (None, event) => Err(Report::new(KernelError::NotFound).attach_printable(format!(
                "cannot move a missing borrow request to {}",
                event.target_status()
            ))),
            (Some(request), event) => {
                let current = *request.status();
                let next = event.target_status();
                if !current.can_transition_to(next) {
                    return Err(Report::new(KernelError::InvalidTransition)
                        .attach_printable(format!("{current} -> {next}")));
                }
                if let BorrowEvent::Lend {
                    borrow_date,
                    return_date,
                    ..
                } = &event
                {
                    if return_date.as_ref() < borrow_date.as_ref() {
                        return Err(Report::new(KernelError::Validation).attach_printable(
                            "return date must not be earlier than the borrow date",
                        ));
                    }
                }
                let version = request.version().next();
                request.substitute(|request| {
                    match event {
                        BorrowEvent::Approve {
                            review,
                            borrow_date,
                            return_date,
                        } => {
                            *request.review = Some(review);
                            *request.borrow_date = Some(borrow_date);
                            *request.return_date = Some(return_date);
                        }
                        BorrowEvent::Reject { review } => {
                            *request.review = Some(review);
                        }
                        BorrowEvent::Lend {
                            borrow_date,
                            return_date,
                            borrow_time,
                        } => {
                            *request.borrow_date = Some(borrow_date);
                            *request.return_date = Some(return_date);
                            *request.borrow_time = Some(borrow_time);
                        }
                        BorrowEvent::Return { return_time } => {
                            *request.return_time = Some(return_time);
                        }
                        BorrowEvent::Submit { .. } => {}
                    }
                    *request.status = next;
                    *request.updated_at = UpdatedAt::new(occurred_at);
                    *request.version = version;
                });
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod test {
    use time::macros::{date, datetime};

    use crate::entity::{
        Applicant, BookId, BookName, BorrowDate, BorrowDays, BorrowRequest, BorrowRequestId,
        BorrowStatus, BorrowTime, OpenId, ReturnDate, ReturnTime, Review,
    };
    use crate::event::{Applier, BorrowEvent, EventInfo};
    use crate::KernelError;

    fn submitted() -> Option<BorrowRequest> {
        let mut request = None;
        request
            .apply(EventInfo::new(
                BorrowEvent::Submit {
                    id: BorrowRequestId::default(),
                    book_id: BookId::new("book-1"),
                    book_name: BookName::new("The Rust Programming Language"),
                    requester: OpenId::new("reader"),
                    borrow_days: BorrowDays::default(),
                    applicant: Applicant::default(),
                },
                datetime!(2024-03-01 09:00 +8),
            ))
            .unwrap();
        request
    }

    fn review() -> Review {
        Review::new(OpenId::new("admin"), Some("ok".into()))
    }

    fn lend() -> BorrowEvent {
        BorrowEvent::Lend {
            borrow_date: BorrowDate::new(date!(2024 - 03 - 02)),
            return_date: ReturnDate::new(date!(2024 - 03 - 09)),
            borrow_time: BorrowTime::new(datetime!(2024-03-02 10:00 +8)),
        }
    }

    #[test]
    fn submit_creates_pending_request() {
        let request = submitted().unwrap();
        assert_eq!(request.status(), &BorrowStatus::Pending);
        assert_eq!(*request.version().as_ref(), 0);
        assert!(request.borrow_date().is_none());
        assert!(request.return_time().is_none());
    }

    #[test]
    fn full_lifecycle_bumps_version_each_step() {
        let mut request = submitted();
        request
            .apply(EventInfo::new(
                BorrowEvent::Approve {
                    review: review(),
                    borrow_date: BorrowDate::new(date!(2024 - 03 - 01)),
                    return_date: ReturnDate::new(date!(2024 - 03 - 08)),
                },
                datetime!(2024-03-01 10:00 +8),
            ))
            .unwrap();
        request
            .apply(EventInfo::new(lend(), datetime!(2024-03-02 10:00 +8)))
            .unwrap();
        request
            .apply(EventInfo::new(
                BorrowEvent::Return {
                    return_time: ReturnTime::new(datetime!(2024-03-08 18:00 +8)),
                },
                datetime!(2024-03-08 18:00 +8),
            ))
            .unwrap();

        let request = request.unwrap();
        assert_eq!(request.status(), &BorrowStatus::Returned);
        assert_eq!(*request.version().as_ref(), 3);
        assert_eq!(
            request.borrow_date().map(|d| *d.as_ref()),
            Some(date!(2024 - 03 - 02))
        );
        assert_eq!(
            request.return_date().map(|d| *d.as_ref()),
            Some(date!(2024 - 03 - 09))
        );
        assert!(request.return_time().is_some());
        assert_eq!(
            request.updated_at().as_ref(),
            &datetime!(2024-03-08 18:00 +8)
        );
    }

    #[test]
    fn rejected_request_cannot_be_lent() {
        let mut request = submitted();
        request
            .apply(EventInfo::new(
                BorrowEvent::Reject { review: review() },
                datetime!(2024-03-01 10:00 +8),
            ))
            .unwrap();
        let before = request.clone();

        let report = request
            .apply(EventInfo::new(lend(), datetime!(2024-03-02 10:00 +8)))
            .unwrap_err();
        assert!(matches!(
            report.current_context(),
            KernelError::InvalidTransition
        ));
        assert_eq!(request, before);
    }

    #[test]
    fn pending_request_cannot_skip_to_borrowed() {
        let mut request = submitted();
        let report = request
            .apply(EventInfo::new(lend(), datetime!(2024-03-02 10:00 +8)))
            .unwrap_err();
        assert!(matches!(
            report.current_context(),
            KernelError::InvalidTransition
        ));
    }

    #[test]
    fn lend_rejects_due_date_before_borrow_date() {
        let mut request = submitted();
        request
            .apply(EventInfo::new(
                BorrowEvent::Approve {
                    review: review(),
                    borrow_date: BorrowDate::new(date!(2024 - 03 - 01)),
                    return_date: ReturnDate::new(date!(2024 - 03 - 08)),
                },
                datetime!(2024-03-01 10:00 +8),
            ))
            .unwrap();
        let report = request
            .apply(EventInfo::new(
                BorrowEvent::Lend {
                    borrow_date: BorrowDate::new(date!(2024 - 03 - 05)),
                    return_date: ReturnDate::new(date!(2024 - 03 - 04)),
                    borrow_time: BorrowTime::new(datetime!(2024-03-05 10:00 +8)),
                },
                datetime!(2024-03-05 10:00 +8),
            ))
            .unwrap_err();
        assert!(matches!(report.current_context(), KernelError::Validation));
        assert_eq!(request.unwrap().status(), &BorrowStatus::Approved);
    }

    #[test]
    fn transitions_on_missing_request_are_not_found() {
        let mut request: Option<BorrowRequest> = None;
        let report = request
            .apply(EventInfo::new(
                BorrowEvent::Reject { review: review() },
                datetime!(2024-03-01 10:00 +8),
            ))
            .unwrap_err();
        assert!(matches!(report.current_context(), KernelError::NotFound));
    }
}
