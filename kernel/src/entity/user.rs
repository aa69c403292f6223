mod open_id;
mod profile;

pub use self::{open_id::*, profile::*};
use crate::entity::{CreatedAt, UpdatedAt};
use destructure::{Destructure, Mutation};
use vodca::References;

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure, Mutation)]
pub struct User {
    open_id: OpenId,
    nick_name: Option<NickName>,
    avatar_url: Option<AvatarUrl>,
    phone_number: Option<PhoneNumber>,
    department: Option<Department>,
    email: Option<Email>,
    created_at: CreatedAt<User>,
    updated_at: UpdatedAt<User>,
}

impl User {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        open_id: OpenId,
        nick_name: Option<NickName>,
        avatar_url: Option<AvatarUrl>,
        phone_number: Option<PhoneNumber>,
        department: Option<Department>,
        email: Option<Email>,
        created_at: CreatedAt<User>,
        updated_at: UpdatedAt<User>,
    ) -> Self {
        Self {
            open_id,
            nick_name,
            avatar_url,
            phone_number,
            department,
            email,
            created_at,
            updated_at,
        }
    }
}
