pub mod auth;
pub mod batch;
pub mod inventory;
pub mod page;
pub mod public;
pub mod request;
pub mod reservation;

pub use auth::*;
pub use batch::*;
pub use inventory::*;
pub use page::*;
pub use public::*;
pub use request::*;
pub use reservation::*;
