use application::transfer::UserDto;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use time::OffsetDateTime;

use crate::controller::Exhaust;

#[derive(Debug, Serialize)]
pub struct UserResponse {
    open_id: String,
    nick_name: Option<String>,
    avatar_url: Option<String>,
    phone_number: Option<String>,
    department: Option<String>,
    email: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    updated_at: OffsetDateTime,
}

impl IntoResponse for UserResponse {
    fn into_response(self) -> Response {
        (StatusCode::OK, axum::Json(self)).into_response()
    }
}

impl From<UserDto> for UserResponse {
    fn from(dto: UserDto) -> Self {
        Self {
            open_id: dto.open_id,
            nick_name: dto.nick_name,
            avatar_url: dto.avatar_url,
            phone_number: dto.phone_number,
            department: dto.department,
            email: dto.email,
            created_at: dto.created_at,
            updated_at: dto.updated_at,
        }
    }
}

pub struct UserPresenter;

impl Exhaust<UserDto> for UserPresenter {
    type To = UserResponse;
    fn emit(&self, output: UserDto) -> Self::To {
        UserResponse::from(output)
    }
}

impl Exhaust<Option<UserDto>> for UserPresenter {
    type To = Option<UserResponse>;
    fn emit(&self, output: Option<UserDto>) -> Self::To {
        output.map(UserResponse::from)
    }
}
