use application::service::{GetProfileService, LoginService, UpdateProfileService};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use kernel::KernelError;

use crate::controller::Controller;
use crate::error::ErrorStatus;
use crate::extract::Actor;
use crate::handler::AppModule;
use crate::request::{LoginRequest, UpdateProfileRequest, UserTransformer};
use crate::response::{UserPresenter, UserResponse};

pub trait UserRouter {
    fn route_user(self) -> Self;
}

impl<H> UserRouter for Router<AppModule<H>>
where
    H: LoginService + GetProfileService + UpdateProfileService,
{
    fn route_user(self) -> Self {
        self.route(
            "/users/login",
            post(
                |State(module): State<AppModule<H>>, Json(req): Json<LoginRequest>| async move {
                    Controller::new(UserTransformer, UserPresenter)
                        .intake(req)
                        .handle(|dto| async move { module.handler().login(dto).await })
                        .await
                },
            ),
        )
        .route(
            "/users/me",
            get(
                |State(module): State<AppModule<H>>, Actor(actor): Actor| async move {
                    Controller::new((), UserPresenter)
                        .bypass(|| async move { module.handler().get_profile(&actor).await })
                        .await
                        .and_then(|res| {
                            res.map(UserResponse::into_response)
                                .ok_or_else(|| ErrorStatus::from(KernelError::NotFound))
                        })
                },
            )
            .patch(
                |State(module): State<AppModule<H>>,
                 Actor(actor): Actor,
                 Json(req): Json<UpdateProfileRequest>| async move {
                    Controller::new(UserTransformer, UserPresenter)
                        .intake(req)
                        .handle(|dto| async move { module.handler().update_profile(&actor, dto).await })
                        .await
                },
            ),
        )
    }
}

#[cfg(test)]
mod test {
    use axum::http::StatusCode;
    use serde_json::json;

    use crate::handler::test_module::{app, call, request};

    #[tokio::test]
    async fn profile_follows_login() {
        let app = app();
        let (status, body) = call(&app, request("GET", "/users/me", Some("carol"), None)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["message"].is_string());

        let login = json!({ "code": "code-carol" });
        let (status, user) = call(&app, request("POST", "/users/login", None, Some(login))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(user["open_id"], "carol");

        let (status, me) = call(&app, request("GET", "/users/me", Some("carol"), None)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(me["open_id"], "carol");
    }

    #[tokio::test]
    async fn rejected_login_code_is_unauthorized() {
        let app = app();
        let login = json!({ "code": "stale" });
        let (status, body) = call(&app, request("POST", "/users/login", None, Some(login))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert!(body["message"].is_string());
    }
}
