mod applicant;
mod book;
mod date;
mod days;
mod id;
mod moment;
mod review;
mod status;

pub use self::{
    applicant::*, book::*, date::*, days::*, id::*, moment::*, review::*, status::*,
};
use crate::entity::{CreatedAt, OpenId, UpdatedAt, Version};
use destructure::{Destructure, Mutation};
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure, Mutation)]
pub struct BorrowRequest {
    id: BorrowRequestId,
    book_id: BookId,
    book_name: BookName,
    requester: OpenId,
    borrow_days: BorrowDays,
    status: BorrowStatus,
    applicant: Applicant,
    review: Option<Review>,
    borrow_date: Option<BorrowDate>,
    return_date: Option<ReturnDate>,
    borrow_time: Option<BorrowTime>,
    return_time: Option<ReturnTime>,
    created_at: CreatedAt<BorrowRequest>,
    updated_at: UpdatedAt<BorrowRequest>,
    version: Version<BorrowRequest>,
}

impl BorrowRequest {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: BorrowRequestId,
        book_id: BookId,
        book_name: BookName,
        requester: OpenId,
        borrow_days: BorrowDays,
        status: BorrowStatus,
        applicant: Applicant,
        review: Option<Review>,
        borrow_date: Option<BorrowDate>,
        return_date: Option<ReturnDate>,
        borrow_time: Option<BorrowTime>,
        return_time: Option<ReturnTime>,
        created_at: CreatedAt<BorrowRequest>,
        updated_at: UpdatedAt<BorrowRequest>,
        version: Version<BorrowRequest>,
    ) -> Self {
        Self {
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
        }
    }

    pub fn is_requested_by(&self, open_id: &OpenId) -> bool {
        self.requester.eq(open_id)
    }
}
