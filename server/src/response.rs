mod borrow;
mod reminder;
mod user;

pub use self::{borrow::*, reminder::*, user::*};
