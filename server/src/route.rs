mod borrow;
mod health;
mod reminder;
mod user;

pub use self::{borrow::*, health::*, reminder::*, user::*};
