use application::service::{
    ConfirmBorrowService, ConfirmReturnService, GetBorrowRequestService,
    ReviewBorrowRequestService, SubmitBorrowRequestService,
};
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use kernel::KernelError;
use uuid::Uuid;

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::extract::Actor;
use crate::handler::AppModule;
use crate::request::{
    BorrowTransformer, GetAllBorrowRequestsQuery, GetBorrowRequest, LendRequest, ReturnRequest,
    ReviewRequest, SubmitBorrowRequest,
};
use crate::response::{BorrowPresenter, BorrowRequestResponse, SubmitPresenter};

pub trait BorrowRouter {
    fn route_borrow(self) -> Self;
}

impl<H> BorrowRouter for Router<AppModule<H>>
where
    H: SubmitBorrowRequestService
        + GetBorrowRequestService
        + ReviewBorrowRequestService
        + ConfirmBorrowService
        + ConfirmReturnService,
{
    fn route_borrow(self) -> Self {
        self.route(
            "/borrow-requests",
            get(
                |State(module): State<AppModule<H>>,
                 Actor(actor): Actor,
                 Query(req): Query<GetAllBorrowRequestsQuery>| async move {
                    Controller::new(BorrowTransformer, BorrowPresenter)
                        .intake(req)
                        .handle(|dto| async move {
                            module.handler().get_all_borrow_requests(&actor, dto).await
                        })
                        .await
                },
            )
            .post(
                |State(module): State<AppModule<H>>,
                 Actor(actor): Actor,
                 Json(req): Json<SubmitBorrowRequest>| async move {
                    Controller::new(BorrowTransformer, SubmitPresenter)
                        .intake(req)
                        .handle(|dto| async move {
                            module.handler().submit_borrow_request(&actor, dto).await
                        })
                        .await
                },
            ),
        )
        .route(
            "/borrow-requests/mine",
            get(
                |State(module): State<AppModule<H>>, Actor(actor): Actor| async move {
                    Controller::new((), BorrowPresenter)
                        .bypass(|| async move { module.handler().get_my_borrow_requests(&actor).await })
                        .await
                },
            ),
        )
        .route(
            "/borrow-requests/:id",
            get(
                |State(module): State<AppModule<H>>,
                 Actor(actor): Actor,
                 Path(id): Path<Uuid>| async move {
                    Controller::new(BorrowTransformer, BorrowPresenter)
                        .intake(GetBorrowRequest::new(id))
                        .handle(|dto| async move {
                            module.handler().get_borrow_request(&actor, dto).await
                        })
                        .await
                        .and_then(|res| {
                            res.map(BorrowRequestResponse::into_response)
                                .ok_or_else(|| ErrorStatus::from(KernelError::NotFound))
                        })
                },
            ),
        )
        .route(
            "/borrow-requests/:id/review",
            post(
                |State(module): State<AppModule<H>>,
                 Actor(actor): Actor,
                 Path(id): Path<Uuid>,
                 Json(req): Json<ReviewRequest>| async move {
                    Controller::new(BorrowTransformer, BorrowPresenter)
                        .intake((id, req))
                        .handle(|dto| async move {
                            module.handler().review_borrow_request(&actor, dto).await
                        })
                        .await
                },
            ),
        )
        .route(
            "/borrow-requests/:id/lend",
            post(
                |State(module): State<AppModule<H>>,
                 Actor(actor): Actor,
                 Path(id): Path<Uuid>,
                 Json(req): Json<LendRequest>| async move {
                    Controller::new(BorrowTransformer, BorrowPresenter)
                        .intake((id, req))
                        .handle(|dto| async move { module.handler().confirm_borrow(&actor, dto).await })
                        .await
                },
            ),
        )
        .route(
            "/borrow-requests/:id/return",
            post(
                |State(module): State<AppModule<H>>,
                 Actor(actor): Actor,
                 Path(id): Path<Uuid>,
                 req: Option<Json<ReturnRequest>>| async move {
                    let req = req.map(|Json(req)| req).unwrap_or_default();
                    Controller::new(BorrowTransformer, BorrowPresenter)
                        .intake((id, req))
                        .handle(|dto| async move { module.handler().confirm_return(&actor, dto).await })
                        .await
                },
            ),
        )
    }
}
