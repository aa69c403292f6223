use time::OffsetDateTime;

use kernel::prelude::entity::{DestructUser, User};

#[derive(Debug, Clone)]
pub struct UserDto {
    pub open_id: String,
    pub nick_name: Option<String>,
    pub avatar_url: Option<String>,
    pub phone_number: Option<String>,
    pub department: Option<String>,
    pub email: Option<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<User> for UserDto {
    fn from(value: User) -> Self {
        let DestructUser {
            open_id,
            nick_name,
            avatar_url,
            phone_number,
            department,
            email,
            created_at,
            updated_at,
        } = value.into_destruct();
        Self {
            open_id: open_id.into(),
            nick_name: nick_name.map(String::from),
            avatar_url: avatar_url.map(String::from),
            phone_number: phone_number.map(String::from),
            department: department.map(String::from),
            email: email.map(String::from),
            created_at: created_at.into(),
            updated_at: updated_at.into(),
        }
    }
}

pub struct LoginDto {
    pub code: String,
    pub phone_code: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct UpdateProfileDto {
    pub nick_name: Option<String>,
    pub avatar_url: Option<String>,
    pub phone_number: Option<String>,
    pub department: Option<String>,
    pub email: Option<String>,
}
