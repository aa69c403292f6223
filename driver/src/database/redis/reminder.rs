use deadpool_redis::redis::{self, AsyncCommands};
use error_stack::ResultExt;
use kernel::interface::reminder::{ReminderKey, ReminderLedger};
use kernel::KernelError;

use crate::database::redis::RedisDatabase;
use crate::error::ConvertError;

const KEY_PREFIX: &str = "reminder:";
/// Keys carry the day they were planned for, so a week is plenty.
const CLAIM_TTL_SECS: u64 = 7 * 24 * 60 * 60;

#[derive(Clone)]
pub struct RedisReminderLedger {
    db: RedisDatabase,
}

impl RedisReminderLedger {
    pub fn new(db: RedisDatabase) -> Self {
        Self { db }
    }
}

fn redis_key(key: &ReminderKey) -> String {
    format!("{KEY_PREFIX}{key}")
}

#[async_trait::async_trait]
impl ReminderLedger for RedisReminderLedger {
    async fn claim(&self, key: &ReminderKey) -> error_stack::Result<bool, KernelError> {
        let mut con = self.db.connection().await?;
        // `SET NX` answers OK only to the caller that created the key.
        let created: Option<String> = redis::cmd("SET")
            .arg(redis_key(key))
            .arg(1)
            .arg("NX")
            .arg("EX")
            .arg(CLAIM_TTL_SECS)
            .query_async(&mut con)
            .await
            .convert_error()
            .attach_printable_lazy(|| format!("failed to claim reminder {key}"))?;
        Ok(created.is_some())
    }

    async fn release(&self, key: &ReminderKey) -> error_stack::Result<(), KernelError> {
        let mut con = self.db.connection().await?;
        let _: i64 = con
            .del(redis_key(key))
            .await
            .convert_error()
            .attach_printable_lazy(|| format!("failed to release reminder {key}"))?;
        Ok(())
    }
}
