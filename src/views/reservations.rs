use chrono::{DateTime, Utc};
use tracing::warn;

use crate::error::{ClientError, Result};
use crate::models::{Reservation, ReservationStatus};
use crate::views::notice::{Notice, Notices};
use crate::MerchantClient;

/// One rendered line of the reservations table.
#[derive(Debug, Clone, PartialEq)]
pub struct ReservationRow {
    pub id: i64,
    pub card: String,
    pub customer: String,
    pub status: ReservationStatus,
    pub code: String,
    pub expires_in: String,
}

/// Reservations of the signed-in merchant's shop, with in-store validation.
pub struct ReservationBoard {
    client: MerchantClient,
    shop_id: i64,
    reservations: Vec<Reservation>,
    last_validated: Option<Reservation>,
    notices: Notices,
}

impl ReservationBoard {
    pub fn mount(client: &MerchantClient) -> Result<Self> {
        let shop_id = client.session().shop_id().ok_or(ClientError::NoSession)?;
        Ok(Self {
            client: client.clone(),
            shop_id,
            reservations: Vec::new(),
            last_validated: None,
            notices: Notices::default(),
        })
    }

    pub fn reservations(&self) -> &[Reservation] {
        &self.reservations
    }

    pub fn last_validated(&self) -> Option<&Reservation> {
        self.last_validated.as_ref()
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.take()
    }

    pub async fn refresh(&mut self) -> bool {
        match self.client.reservations().list(self.shop_id).await {
            Ok(list) => {
                self.reservations = list;
                true
            }
            Err(e) => {
                warn!(error = %e, "failed to load reservations, keeping previous list");
                self.notices.push(Notice::from_error(&e));
                false
            }
        }
    }

    /// Validate a scanned or typed code, then reload the list. Invalid codes
    /// surface the backend's message.
    pub async fn validate(&mut self, code: &str) -> bool {
        match self.client.reservations().validate(code).await {
            Ok(reservation) => {
                self.notices.push(Notice::success(format!(
                    "Reservation {} validated",
                    reservation.validation_code
                )));
                self.last_validated = Some(reservation);
                self.refresh().await;
                true
            }
            Err(e) => {
                warn!(error = %e, "reservation validation failed");
                self.notices.push(Notice::from_error(&e));
                false
            }
        }
    }

    pub fn rows(&self, now: DateTime<Utc>) -> Vec<ReservationRow> {
        self.reservations
            .iter()
            .map(|r| ReservationRow {
                id: r.id,
                card: r
                    .card_name
                    .clone()
                    .unwrap_or_else(|| format!("Card #{}", r.card_id)),
                customer: r
                    .user_name
                    .clone()
                    .unwrap_or_else(|| format!("User #{}", r.user_id)),
                status: r.status,
                code: r.validation_code.clone(),
                expires_in: match r.status {
                    ReservationStatus::Pending => r.format_time_to_expiry(now),
                    _ => "-".to_string(),
                },
            })
            .collect()
    }
}
