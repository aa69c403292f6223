use error_stack::Report;
use tracing::{info, warn};

use kernel::interface::clock::{Clock, DependOnClock};
use kernel::interface::database::{DatabaseConnection, Transaction};
use kernel::interface::identity::{DependOnIdentityProvider, IdentityProvider, LoginCode, PhoneCode};
use kernel::interface::query::{DependOnUserQuery, UserQuery};
use kernel::interface::update::{DependOnUserModifier, UserModifier};
use kernel::prelude::entity::{
    AvatarUrl, CreatedAt, Department, Email, NickName, OpenId, PhoneNumber, UpdatedAt, User,
};
use kernel::KernelError;

use crate::transfer::{LoginDto, UpdateProfileDto, UserDto};

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

#[async_trait::async_trait]
pub trait LoginService:
    'static + Sync + Send + DependOnIdentityProvider + DependOnUserModifier + DependOnClock
{
    async fn login(&self, dto: LoginDto) -> error_stack::Result<UserDto, KernelError> {
        let code = non_blank(Some(dto.code)).ok_or_else(|| {
            Report::new(KernelError::Validation).attach_printable("login code is empty")
        })?;
        let open_id = self
            .identity_provider()
            .resolve_open_id(&LoginCode::new(code))
            .await?;

        let phone_number = match non_blank(dto.phone_code) {
            Some(code) => match self
                .identity_provider()
                .resolve_phone_number(&PhoneCode::new(code))
                .await
            {
                Ok(phone) => Some(phone),
                Err(report) => {
                    warn!(open_id = %open_id.as_ref(), "phone number lookup failed: {report:?}");
                    None
                }
            },
            None => None,
        };

        let now = self.clock().now();
        let candidate = User::new(
            open_id.clone(),
            None,
            None,
            phone_number,
            None,
            None,
            CreatedAt::new(now),
            UpdatedAt::new(now),
        );
        let mut connection = self.database_connection().transact().await?;
        let user = self
            .user_modifier()
            .register(&mut connection, &candidate)
            .await?;
        connection.commit().await?;
        info!(open_id = %open_id.as_ref(), "user logged in");
        Ok(UserDto::from(user))
    }
}

impl<T> LoginService for T where T: DependOnIdentityProvider + DependOnUserModifier + DependOnClock {}

#[async_trait::async_trait]
pub trait GetProfileService: 'static + Sync + Send + DependOnUserQuery {
    async fn get_profile(&self, actor: &OpenId) -> error_stack::Result<Option<UserDto>, KernelError> {
        let mut connection = self.database_connection().transact().await?;
        let user = self
            .user_query()
            .find_by_open_id(&mut connection, actor)
            .await?;
        Ok(user.map(UserDto::from))
    }
}

impl<T> GetProfileService for T where T: DependOnUserQuery {}

#[async_trait::async_trait]
pub trait UpdateProfileService:
    'static + Sync + Send + DependOnUserQuery + DependOnUserModifier + DependOnClock
{
    /// Only the fields present in `dto` are overwritten.
    async fn update_profile(
        &self,
        actor: &OpenId,
        dto: UpdateProfileDto,
    ) -> error_stack::Result<UserDto, KernelError> {
        let now = self.clock().now();
        let mut connection = self.database_connection().transact().await?;
        let mut user = self
            .user_query()
            .find_by_open_id(&mut connection, actor)
            .await?
            .ok_or_else(|| {
                Report::new(KernelError::NotFound)
                    .attach_printable(format!("user {} has not logged in yet", actor.as_ref()))
            })?;

        user.substitute(|user| {
            if let Some(nick_name) = non_blank(dto.nick_name) {
                *user.nick_name = Some(NickName::new(nick_name));
            }
            if let Some(avatar_url) = non_blank(dto.avatar_url) {
                *user.avatar_url = Some(AvatarUrl::new(avatar_url));
            }
            if let Some(phone_number) = non_blank(dto.phone_number) {
                *user.phone_number = Some(PhoneNumber::new(phone_number));
            }
            if let Some(department) = non_blank(dto.department) {
                *user.department = Some(Department::new(department));
            }
            if let Some(email) = non_blank(dto.email) {
                *user.email = Some(Email::new(email));
            }
            *user.updated_at = UpdatedAt::new(now);
        });
        self.user_modifier().update(&mut connection, &user).await?;
        connection.commit().await?;
        Ok(UserDto::from(user))
    }
}

impl<T> UpdateProfileService for T where
    T: DependOnUserQuery + DependOnUserModifier + DependOnClock
{
}
