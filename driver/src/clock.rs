use kernel::interface::clock::{Clock, BEIJING_OFFSET};
use time::OffsetDateTime;

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc().to_offset(BEIJING_OFFSET)
    }
}
