mod payload;
mod token;

use std::sync::Arc;
use std::time::Duration;

use error_stack::ResultExt;
use tokio::sync::Mutex;
use tracing::{debug, info};

use kernel::interface::identity::{IdentityProvider, LoginCode, PhoneCode};
use kernel::interface::notify::{SubscribeMessage, SubscribeMessageSender};
use kernel::prelude::entity::{OpenId, PhoneNumber};
use kernel::KernelError;

use crate::env;
use crate::error::ConvertError;

use self::payload::*;
use self::token::AccessToken;

const WX_APPID: &str = "WX_APPID";
const WX_SECRET: &str = "WX_SECRET";
const WX_API_BASE: &str = "WX_API_BASE";
const WX_MINIPROGRAM_STATE: &str = "WX_MINIPROGRAM_STATE";
const WX_HTTP_TIMEOUT_SECS: &str = "WX_HTTP_TIMEOUT_SECS";

const DEFAULT_API_BASE: &str = "https://api.weixin.qq.com";
const DEFAULT_MINIPROGRAM_STATE: &str = "formal";
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Debug, Clone)]
pub struct WeChatConfig {
    pub app_id: String,
    pub secret: String,
    pub api_base: String,
    /// `developer`, `trial` or `formal`.
    pub miniprogram_state: String,
    /// Upper bound for a whole request, connect included.
    pub timeout: Duration,
}

impl WeChatConfig {
    pub fn from_env() -> error_stack::Result<Self, KernelError> {
        Ok(Self {
            app_id: env(WX_APPID)?,
            secret: env(WX_SECRET)?,
            api_base: env(WX_API_BASE).unwrap_or_else(|_| DEFAULT_API_BASE.to_string()),
            miniprogram_state: env(WX_MINIPROGRAM_STATE)
                .unwrap_or_else(|_| DEFAULT_MINIPROGRAM_STATE.to_string()),
            timeout: env(WX_HTTP_TIMEOUT_SECS)
                .ok()
                .and_then(|secs| secs.trim().parse().ok())
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_HTTP_TIMEOUT),
        })
    }
}

/// Client for the mini program server API. Cheap to clone; clones share the
/// access token cache.
#[derive(Clone)]
pub struct WeChatClient {
    http: reqwest::Client,
    config: Arc<WeChatConfig>,
    token: Arc<Mutex<Option<AccessToken>>>,
}

impl WeChatClient {
    pub fn new(config: WeChatConfig) -> error_stack::Result<Self, KernelError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.timeout)
            .build()
            .change_context(KernelError::Internal)
            .attach_printable("failed to build wechat http client")?;
        Ok(Self {
            http,
            config: Arc::new(config),
            token: Arc::new(Mutex::new(None)),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.config.api_base.trim_end_matches('/'))
    }

    /// Refreshes run one at a time under the cache lock. The client timeout
    /// bounds how long other callers wait behind a stalled refresh.
    async fn access_token(&self) -> error_stack::Result<String, KernelError> {
        let mut cached = self.token.lock().await;
        if let Some(token) = cached.as_ref().filter(|token| token.is_fresh()) {
            return Ok(token.value().to_string());
        }
        let response: TokenResponse = self
            .http
            .get(self.url("cgi-bin/token"))
            .query(&[
                ("grant_type", "client_credential"),
                ("appid", self.config.app_id.as_str()),
                ("secret", self.config.secret.as_str()),
            ])
            .send()
            .await
            .convert_error()
            .attach_printable("failed to fetch access token")?
            .json()
            .await
            .convert_error()?;
        let token = response.into_token()?;
        info!("refreshed wechat access token");
        let value = token.value().to_string();
        *cached = Some(token);
        Ok(value)
    }

    async fn forget_access_token(&self) {
        *self.token.lock().await = None;
    }

    async fn post_subscribe_message(
        &self,
        body: &SubscribeSendBody<'_>,
    ) -> error_stack::Result<ErrorResponse, KernelError> {
        let token = self.access_token().await?;
        self.http
            .post(self.url("cgi-bin/message/subscribe/send"))
            .query(&[("access_token", token.as_str())])
            .json(body)
            .send()
            .await
            .convert_error()?
            .json()
            .await
            .convert_error()
    }
}

#[async_trait::async_trait]
impl SubscribeMessageSender for WeChatClient {
    async fn send(&self, message: &SubscribeMessage) -> error_stack::Result<(), KernelError> {
        let body = SubscribeSendBody::new(message, &self.config.miniprogram_state);
        let mut response = self.post_subscribe_message(&body).await?;
        if response.is_expired_token() {
            debug!("access token rejected, retrying once with a new one");
            self.forget_access_token().await;
            response = self.post_subscribe_message(&body).await?;
        }
        response
            .into_result()
            .attach_printable_lazy(|| {
                format!(
                    "subscribe message {:?} to {} was refused",
                    message.kind(),
                    message.to().as_ref()
                )
            })
    }
}

#[async_trait::async_trait]
impl IdentityProvider for WeChatClient {
    async fn resolve_open_id(&self, code: &LoginCode) -> error_stack::Result<OpenId, KernelError> {
        let response: SessionResponse = self
            .http
            .get(self.url("sns/jscode2session"))
            .query(&[
                ("appid", self.config.app_id.as_str()),
                ("secret", self.config.secret.as_str()),
                ("js_code", code.as_ref().as_str()),
                ("grant_type", "authorization_code"),
            ])
            .send()
            .await
            .convert_error()?
            .json()
            .await
            .convert_error()?;
        response.into_open_id()
    }

    async fn resolve_phone_number(
        &self,
        code: &PhoneCode,
    ) -> error_stack::Result<PhoneNumber, KernelError> {
        let token = self.access_token().await?;
        let response: PhoneNumberResponse = self
            .http
            .post(self.url("wxa/business/getuserphonenumber"))
            .query(&[("access_token", token.as_str())])
            .json(&PhoneNumberBody {
                code: code.as_ref(),
            })
            .send()
            .await
            .convert_error()?
            .json()
            .await
            .convert_error()?;
        response
            .into_phone_number()
            .attach_printable("failed to resolve phone number")
    }
}
