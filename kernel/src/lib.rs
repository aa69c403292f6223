pub use crate::error::*;

mod access;
mod clock;
mod database;
mod entity;
mod error;
mod event;
mod identity;
mod modify;
mod notify;
mod query;
mod reminder;

#[cfg(feature = "prelude")]
pub mod prelude {
    pub mod entity {
        pub use crate::entity::*;
    }
}

#[cfg(feature = "interface")]
pub mod interface {
    pub mod access {
        pub use crate::access::*;
    }
    pub mod clock {
        pub use crate::clock::*;
    }
    pub mod database {
        pub use crate::database::*;
    }
    pub mod event {
        pub use crate::event::*;
    }
    pub mod identity {
        pub use crate::identity::*;
    }
    pub mod notify {
        pub use crate::notify::*;
    }
    pub mod query {
        pub use crate::query::*;
    }
    pub mod reminder {
        pub use crate::reminder::*;
    }
    pub mod update {
        pub use crate::modify::*;
    }
}
