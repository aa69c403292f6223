mod reminder;

use crate::env;
use crate::error::ConvertError;
use deadpool_redis::redis::RedisError;
use deadpool_redis::{Config, Connection, Pool, PoolError, Runtime};
use error_stack::{Report, ResultExt};
use kernel::KernelError;

pub use self::reminder::*;

const REDIS_URL: &str = "REDIS_URL";

/// Connection pool for the single-key commands the reminder ledger needs.
#[derive(Clone)]
pub struct RedisDatabase {
    pool: Pool,
}

impl RedisDatabase {
    pub fn new() -> error_stack::Result<Self, KernelError> {
        let url = env(REDIS_URL)?;
        let pool = Config::from_url(url)
            .create_pool(Some(Runtime::Tokio1))
            .change_context(KernelError::Internal)
            .attach_printable("failed to create redis pool")?;
        Ok(Self { pool })
    }

    pub async fn connection(&self) -> error_stack::Result<Connection, KernelError> {
        self.pool
            .get()
            .await
            .convert_error()
            .attach_printable("failed to check out a redis connection")
    }
}

impl<T: 'static> ConvertError for Result<T, PoolError> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|error| {
            let context = match error {
                PoolError::Timeout(_) => KernelError::Timeout,
                _ => KernelError::Internal,
            };
            Report::new(error).change_context(context)
        })
    }
}

impl<T: 'static> ConvertError for Result<T, RedisError> {
    type Ok = T;
    fn convert_error(self) -> error_stack::Result<T, KernelError> {
        self.map_err(|error| {
            let context = if error.is_timeout() || error.is_connection_dropped() {
                KernelError::Timeout
            } else {
                KernelError::External
            };
            Report::new(error).change_context(context)
        })
    }
}
