use std::collections::BTreeMap;

use error_stack::Report;
use serde::{Deserialize, Serialize};

use kernel::interface::notify::{SubscribeMessage, TemplateValue};
use kernel::prelude::entity::{OpenId, PhoneNumber};
use kernel::KernelError;

use super::token::AccessToken;

const INVALID_CREDENTIAL: i64 = 40001;
const ACCESS_TOKEN_EXPIRED: i64 = 42001;

fn api_error(errcode: i64, errmsg: Option<&str>) -> Report<KernelError> {
    Report::new(KernelError::External).attach_printable(format!(
        "wechat api returned errcode {errcode}: {}",
        errmsg.unwrap_or("<no message>")
    ))
}

#[derive(Debug, Deserialize)]
pub(super) struct ErrorResponse {
    #[serde(default)]
    errcode: i64,
    errmsg: Option<String>,
}

impl ErrorResponse {
    pub(super) fn is_expired_token(&self) -> bool {
        matches!(self.errcode, INVALID_CREDENTIAL | ACCESS_TOKEN_EXPIRED)
    }

    pub(super) fn into_result(self) -> error_stack::Result<(), KernelError> {
        if self.errcode == 0 {
            Ok(())
        } else {
            Err(api_error(self.errcode, self.errmsg.as_deref()))
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct TokenResponse {
    access_token: Option<String>,
    #[serde(default)]
    expires_in: u64,
    #[serde(default)]
    errcode: i64,
    errmsg: Option<String>,
}

impl TokenResponse {
    pub(super) fn into_token(self) -> error_stack::Result<AccessToken, KernelError> {
        match self.access_token {
            Some(token) if self.errcode == 0 => Ok(AccessToken::new(token, self.expires_in)),
            _ => Err(api_error(self.errcode, self.errmsg.as_deref())
                .attach_printable("failed to fetch access token")),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct SessionResponse {
    openid: Option<String>,
    #[serde(default)]
    errcode: i64,
    errmsg: Option<String>,
}

impl SessionResponse {
    pub(super) fn into_open_id(self) -> error_stack::Result<OpenId, KernelError> {
        match self.openid {
            Some(openid) if self.errcode == 0 && !openid.is_empty() => Ok(OpenId::new(openid)),
            // Codes are single use; an invalid one is the caller's problem.
            _ => Err(Report::new(KernelError::Unauthorized).attach_printable(format!(
                "login code rejected with errcode {}: {}",
                self.errcode,
                self.errmsg.as_deref().unwrap_or("<no message>")
            ))),
        }
    }
}

#[derive(Debug, Serialize)]
pub(super) struct PhoneNumberBody<'a> {
    pub(super) code: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PhoneInfo {
    phone_number: Option<String>,
    pure_phone_number: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct PhoneNumberResponse {
    #[serde(default)]
    errcode: i64,
    errmsg: Option<String>,
    phone_info: Option<PhoneInfo>,
}

impl PhoneNumberResponse {
    pub(super) fn into_phone_number(self) -> error_stack::Result<PhoneNumber, KernelError> {
        if self.errcode != 0 {
            return Err(api_error(self.errcode, self.errmsg.as_deref()));
        }
        self.phone_info
            .and_then(|info| info.pure_phone_number.or(info.phone_number))
            .map(PhoneNumber::new)
            .ok_or_else(|| {
                Report::new(KernelError::External).attach_printable("phone_info is missing")
            })
    }
}

#[derive(Debug, Serialize)]
pub(super) struct SubscribeSendBody<'a> {
    touser: &'a str,
    template_id: &'a str,
    page: &'a str,
    data: &'a BTreeMap<String, TemplateValue>,
    miniprogram_state: &'a str,
    lang: &'static str,
}

impl<'a> SubscribeSendBody<'a> {
    pub(super) fn new(message: &'a SubscribeMessage, miniprogram_state: &'a str) -> Self {
        Self {
            touser: message.to().as_ref(),
            template_id: message.template_id(),
            page: message.page(),
            data: message.data(),
            miniprogram_state,
            lang: "zh_CN",
        }
    }
}
