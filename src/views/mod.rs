//! Headless view-models for the merchant screens.
//!
//! Each view owns the state a UI renders (lists, drafts, notices) and the
//! transitions between states. Network failures never escape a view: they are
//! logged, the last good state is kept, and an error [`Notice`] is queued.

pub mod debounce;
pub mod feed;
pub mod generation;
pub mod inbox;
pub mod inventory;
pub mod login;
pub mod notice;
pub mod registration;
pub mod reservations;

pub use debounce::Debouncer;
pub use feed::{FeedHandle, MessageFeed, MessageListener, PollingFeed};
pub use generation::{Generation, Ticket};
pub use inbox::{Conversation, ConversationState, RequestInbox, RequestsBackend, StatusGate};
pub use inventory::{InventoryBackend, InventoryBrowser, InventoryState};
pub use login::{LoginForm, Route};
pub use notice::{Notice, NoticeLevel, Notices};
pub use registration::{RegistrationForm, ShopChoice};
pub use reservations::{ReservationBoard, ReservationRow};
