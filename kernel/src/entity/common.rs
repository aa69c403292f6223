mod calendar;
mod operation;
mod time;
mod version;

pub use self::{calendar::*, operation::*, time::*, version::*};
