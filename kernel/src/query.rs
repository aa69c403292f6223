mod borrow;
mod user;

pub use self::{borrow::*, user::*};
