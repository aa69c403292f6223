mod borrow;
mod notify;
mod reminder;
mod user;

#[cfg(test)]
mod test_module;

pub use self::{borrow::*, reminder::*, user::*};
