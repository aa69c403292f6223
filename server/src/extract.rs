use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use kernel::prelude::entity::OpenId;

use crate::error::ErrorStatus;

/// Injected by WeChat cloud hosting for calls made through `wx.cloud.callContainer`.
pub const OPENID_HEADER: &str = "x-wx-openid";

/// The WeChat user making the call.
#[derive(Debug, Clone)]
pub struct Actor(pub OpenId);

#[async_trait::async_trait]
impl<S: Send + Sync> FromRequestParts<S> for Actor {
    type Rejection = ErrorStatus;

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(OPENID_HEADER)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default();
        OpenId::validated(header)
            .map(Actor)
            .map_err(ErrorStatus::from)
    }
}

#[cfg(test)]
mod test {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::routing::get;
    use axum::Router;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::{Actor, OPENID_HEADER};

    fn router() -> Router {
        Router::new().route("/", get(|Actor(actor): Actor| async move { actor.as_ref().clone() }))
    }

    #[tokio::test]
    async fn header_identifies_actor() {
        let response = router()
            .oneshot(
                Request::get("/")
                    .header(OPENID_HEADER, "o-reader")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"o-reader");
    }

    #[tokio::test]
    async fn missing_or_blank_header_is_unauthorized() {
        let missing = router()
            .oneshot(Request::get("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(missing.status(), StatusCode::UNAUTHORIZED);

        let blank = router()
            .oneshot(
                Request::get("/")
                    .header(OPENID_HEADER, "  ")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(blank.status(), StatusCode::UNAUTHORIZED);
    }
}
