mod borrow;
mod common;
mod user;

pub use self::{borrow::*, common::*, user::*};
