use time::macros::offset;
use time::{Date, OffsetDateTime, UtcOffset};

/// Every calendar date in the system (borrow date, due date, reminder day)
/// is taken in this offset.
pub const BEIJING_OFFSET: UtcOffset = offset!(+8);

pub trait Clock: 'static + Sync + Send {
    fn now(&self) -> OffsetDateTime;

    fn today(&self) -> Date {
        self.now().to_offset(BEIJING_OFFSET).date()
    }
}

pub trait DependOnClock: 'static + Sync + Send {
    type Clock: Clock;
    fn clock(&self) -> &Self::Clock;
}
