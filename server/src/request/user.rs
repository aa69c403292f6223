use application::transfer::{LoginDto, UpdateProfileDto};
use serde::Deserialize;

use crate::controller::Intake;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    code: String,
    #[serde(default, alias = "phoneCode")]
    phone_code: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateProfileRequest {
    #[serde(default, alias = "nickName")]
    nick_name: Option<String>,
    #[serde(default, alias = "avatarUrl")]
    avatar_url: Option<String>,
    #[serde(default, alias = "phoneNumber")]
    phone_number: Option<String>,
    #[serde(default)]
    department: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

pub struct UserTransformer;

impl Intake<LoginRequest> for UserTransformer {
    type To = LoginDto;
    fn emit(&self, input: LoginRequest) -> Self::To {
        LoginDto {
            code: input.code,
            phone_code: input.phone_code.filter(|code| !code.trim().is_empty()),
        }
    }
}

impl Intake<UpdateProfileRequest> for UserTransformer {
    type To = UpdateProfileDto;
    fn emit(&self, input: UpdateProfileRequest) -> Self::To {
        UpdateProfileDto {
            nick_name: input.nick_name,
            avatar_url: input.avatar_url,
            phone_number: input.phone_number,
            department: input.department,
            email: input.email,
        }
    }
}
