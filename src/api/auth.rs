//! Merchant login, logout and registration.

use tracing::info;

use crate::connection::Connection;
use crate::error::{ClientError, Result};
use crate::models::{LoginBody, MerchantRegistration, MerchantUser, Session};

pub struct AuthApi<'a> {
    conn: &'a Connection,
}

impl<'a> AuthApi<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// POST `auth/login`. On success the returned session is persisted and
    /// becomes current; on failure nothing is stored.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session> {
        if username.trim().is_empty() || password.is_empty() {
            return Err(ClientError::Validation(vec![
                "Username and password are required".to_string(),
            ]));
        }
        let body = LoginBody {
            username: username.trim(),
            password,
        };
        let session: Session = self.conn.post_public("auth/login", &body).await?;
        self.conn.session.establish(session.clone())?;
        info!(user = %session.user.username, "merchant logged in");
        Ok(session)
    }

    /// Forget the local session. The backend keeps no logout state.
    pub fn logout(&self) {
        self.conn.session.invalidate();
    }

    /// POST `auth/register-merchant`.
    pub async fn register_merchant(
        &self,
        registration: &MerchantRegistration,
    ) -> Result<MerchantUser> {
        self.conn
            .post_public("auth/register-merchant", registration)
            .await
    }
}
