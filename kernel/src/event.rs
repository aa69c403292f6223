mod borrow;

pub use self::borrow::*;
use destructure::Destructure;
use time::OffsetDateTime;
use vodca::References;

use crate::KernelError;

pub trait Applier<T> {
    fn apply(&mut self, event: T) -> error_stack::Result<(), KernelError>;
}

#[derive(Debug, Clone, Eq, PartialEq, References, Destructure)]
pub struct EventInfo<Event> {
    event: Event,
    occurred_at: OffsetDateTime,
}

impl<Event> EventInfo<Event> {
    pub fn new(event: Event, occurred_at: OffsetDateTime) -> Self {
        Self { event, occurred_at }
    }
}
