use crate::connection::Connection;
use crate::error::{ClientError, Result};
use crate::models::{MessageResponse, WaitingListEntry};

/// Landing-page waiting list signup.
pub struct WaitingListApi<'a> {
    conn: &'a Connection,
}

impl<'a> WaitingListApi<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// POST `waiting-list`. The email is checked locally before anything is
    /// sent.
    pub async fn join(&self, entry: &WaitingListEntry) -> Result<MessageResponse> {
        if !looks_like_email(&entry.email) {
            return Err(ClientError::Validation(vec![
                "Please enter a valid email address".to_string(),
            ]));
        }
        self.conn.post_public("waiting-list", entry).await
    }
}

pub(crate) fn looks_like_email(email: &str) -> bool {
    let email = email.trim();
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
        }
        None => false,
    }
}
