use std::time::Duration;

use tokio::time::Instant;

/// Tokens are dropped this long before WeChat would expire them.
pub(super) const REFRESH_MARGIN: Duration = Duration::from_secs(300);

pub(super) struct AccessToken {
    value: String,
    refresh_at: Instant,
}

impl AccessToken {
    pub(super) fn new(value: String, expires_in: u64) -> Self {
        let lifetime = Duration::from_secs(expires_in).saturating_sub(REFRESH_MARGIN);
        Self {
            value,
            refresh_at: Instant::now() + lifetime,
        }
    }

    pub(super) fn value(&self) -> &str {
        &self.value
    }

    pub(super) fn is_fresh(&self) -> bool {
        Instant::now() < self.refresh_at
    }
}
