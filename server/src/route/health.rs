use axum::routing::get;
use axum::{Json, Router};
use serde_json::json;

pub trait HealthRouter {
    fn route_health(self) -> Self;
}

impl<S> HealthRouter for Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn route_health(self) -> Self {
        self.route("/health", get(|| async { Json(json!({ "status": "ok" })) }))
    }
}

#[cfg(test)]
mod test {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use axum::Router;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    use super::HealthRouter;

    #[tokio::test]
    async fn health_answers_without_identity() {
        let response = Router::new()
            .route_health()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["status"], "ok");
    }
}
