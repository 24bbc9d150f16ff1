use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReservationStatus {
    Pending,
    Validated,
    PickedUp,
    Expired,
    Cancelled,
}

/// A player's time-boxed hold on a stock item, redeemed in store by code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reservation {
    pub id: i64,
    pub user_id: i64,
    pub user_name: Option<String>,
    pub shop_id: i64,
    pub card_id: i64,
    pub card_name: Option<String>,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    pub status: ReservationStatus,
    pub validation_code: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

fn default_quantity() -> u32 {
    1
}

impl Reservation {
    /// Remaining hold time, or `None` once `expires_at` has passed.
    ///
    /// Display only: the backend owns expiry.
    pub fn time_to_expiry(&self, now: DateTime<Utc>) -> Option<TimeDelta> {
        let left = self.expires_at - now;
        if left > TimeDelta::zero() {
            Some(left)
        } else {
            None
        }
    }

    pub fn format_time_to_expiry(&self, now: DateTime<Utc>) -> String {
        match self.time_to_expiry(now) {
            None => "Expired".to_string(),
            Some(left) => {
                let hours = left.num_hours();
                let minutes = left.num_minutes() % 60;
                if hours > 0 {
                    format!("{}h {:02}m", hours, minutes)
                } else {
                    format!("{}m", minutes.max(1))
                }
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ValidateReservationBody<'a> {
    pub qr_code: &'a str,
}
