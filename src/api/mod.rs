//! Endpoint wrappers for the marketplace REST API.
//!
//! Each module provides a struct that borrows a [`Connection`](crate::connection::Connection)
//! and exposes async methods returning `Result<T>` with typed payloads from
//! [`models`](crate::models).

pub mod auth;
pub mod inventory;
pub mod public;
pub mod requests;
pub mod reservations;
pub mod shops;
pub mod templates;
pub mod waiting_list;

pub use auth::AuthApi;
pub use inventory::InventoryApi;
pub use public::PublicApi;
pub use requests::RequestsApi;
pub use reservations::ReservationsApi;
pub use shops::ShopsApi;
pub use templates::TemplatesApi;
pub use waiting_list::WaitingListApi;
