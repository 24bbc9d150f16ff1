//! Client SDK for the TCG marketplace merchant back-office.
//!
//! Talks to the marketplace REST API (inventory, card templates, customer
//! requests, reservations, public share pages) and provides the headless
//! view-models a merchant UI binds to: the polling request inbox, the
//! debounced inventory browser with its bulk-add flows, login and signup
//! forms.
//!
//! # Quick start
//!
//! ```no_run
//! use tcg_merchant_sdk::MerchantClient;
//! use tcg_merchant_sdk::models::RequestFilter;
//!
//! # async fn run() -> tcg_merchant_sdk::Result<()> {
//! let client = MerchantClient::builder().build()?;
//!
//! let session = client.auth().login("cardhaven", "s3cret").await?;
//! let shop_id = session.user.shop_id.unwrap_or_default();
//!
//! let pending = client.requests().list(shop_id, &RequestFilter::default()).await?;
//! println!("{} open requests", pending.len());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod config;
pub mod connection;
pub mod error;
pub mod models;
pub mod query;
pub mod session;
pub mod views;

pub use connection::Connection;
pub use error::{ClientError, Result};
pub use query::QueryBuilder;
pub use session::{SessionContext, SessionStore};

use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

// ---------------------------------------------------------------------------
// MerchantClientBuilder
// ---------------------------------------------------------------------------

/// Builder for configuring and constructing a [`MerchantClient`].
///
/// Use [`MerchantClient::builder()`] to obtain a builder, chain configuration
/// methods, and call [`build()`](MerchantClientBuilder::build).
pub struct MerchantClientBuilder {
    base_url: Option<String>,
    session_dir: Option<PathBuf>,
    in_memory_session: bool,
    timeout: Duration,
}

impl Default for MerchantClientBuilder {
    fn default() -> Self {
        Self {
            base_url: None,
            session_dir: None,
            in_memory_session: false,
            timeout: config::HTTP_TIMEOUT,
        }
    }
}

impl MerchantClientBuilder {
    /// Set the API base URL.
    ///
    /// If not set, `TCG_API_BASE_URL` is consulted, then
    /// [`config::DEFAULT_API_BASE`].
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the directory holding the persisted session.
    ///
    /// Defaults to the platform data directory (e.g.
    /// `~/.local/share/tcg-merchant` on Linux).
    pub fn session_dir<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.session_dir = Some(path.as_ref().to_path_buf());
        self
    }

    /// Keep the session in memory only; nothing is written to disk.
    pub fn in_memory_session(mut self, in_memory: bool) -> Self {
        self.in_memory_session = in_memory;
        self
    }

    /// Set the HTTP request timeout. Defaults to 30 seconds.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Build the client, restoring any persisted session.
    pub fn build(self) -> Result<MerchantClient> {
        let store = if self.in_memory_session {
            SessionStore::in_memory()
        } else {
            SessionStore::new(self.session_dir)?
        };
        let session = SessionContext::restore(store)?;
        let base_url = config::api_base_url(self.base_url.as_deref());
        let conn = Connection::new(&base_url, self.timeout, session)?;
        Ok(MerchantClient { conn })
    }
}

// ---------------------------------------------------------------------------
// MerchantClient
// ---------------------------------------------------------------------------

/// The main entry point of the SDK.
///
/// Wraps a [`Connection`] and exposes each API area as a lightweight
/// borrowing wrapper. Cloning is cheap and clones share the session.
#[derive(Clone)]
pub struct MerchantClient {
    conn: Connection,
}

impl MerchantClient {
    pub fn builder() -> MerchantClientBuilder {
        MerchantClientBuilder::default()
    }

    // -- API accessors -----------------------------------------------------

    /// Login, logout and merchant signup.
    pub fn auth(&self) -> api::AuthApi<'_> {
        api::AuthApi::new(&self.conn)
    }

    /// Shop stock, bulk adds and imports.
    pub fn inventory(&self) -> api::InventoryApi<'_> {
        api::InventoryApi::new(&self.conn)
    }

    /// The shared card-template catalog.
    pub fn templates(&self) -> api::TemplatesApi<'_> {
        api::TemplatesApi::new(&self.conn)
    }

    /// Customer requests and their conversations.
    pub fn requests(&self) -> api::RequestsApi<'_> {
        api::RequestsApi::new(&self.conn)
    }

    pub fn reservations(&self) -> api::ReservationsApi<'_> {
        api::ReservationsApi::new(&self.conn)
    }

    pub fn shops(&self) -> api::ShopsApi<'_> {
        api::ShopsApi::new(&self.conn)
    }

    /// Unauthenticated share-page data.
    pub fn public(&self) -> api::PublicApi<'_> {
        api::PublicApi::new(&self.conn)
    }

    pub fn waiting_list(&self) -> api::WaitingListApi<'_> {
        api::WaitingListApi::new(&self.conn)
    }

    // -- Session -----------------------------------------------------------

    /// The process-wide session shared by every view built from this client.
    pub fn session(&self) -> &SessionContext {
        &self.conn.session
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl fmt::Display for MerchantClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let user = self
            .conn
            .session
            .current()
            .map(|s| s.user.username)
            .unwrap_or_else(|| "-".to_string());
        write!(
            f,
            "MerchantClient(base_url={}, user={})",
            self.conn.base_url(),
            user
        )
    }
}
