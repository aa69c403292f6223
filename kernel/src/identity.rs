use serde::{Deserialize, Serialize};
use vodca::{AsRefln, Fromln};

use crate::entity::{OpenId, PhoneNumber};
use crate::KernelError;

/// One-shot `wx.login` code.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct LoginCode(String);

impl LoginCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }
}

/// One-shot code from the `getPhoneNumber` button.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, Fromln, AsRefln)]
pub struct PhoneCode(String);

impl PhoneCode {
    pub fn new(code: impl Into<String>) -> Self {
        Self(code.into())
    }
}

#[async_trait::async_trait]
pub trait IdentityProvider: 'static + Sync + Send {
    async fn resolve_open_id(&self, code: &LoginCode) -> error_stack::Result<OpenId, KernelError>;
    async fn resolve_phone_number(
        &self,
        code: &PhoneCode,
    ) -> error_stack::Result<PhoneNumber, KernelError>;
}

pub trait DependOnIdentityProvider: 'static + Sync + Send {
    type IdentityProvider: IdentityProvider;
    fn identity_provider(&self) -> &Self::IdentityProvider;
}
