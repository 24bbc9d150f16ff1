use crate::connection::Connection;
use crate::error::{ClientError, Result};
use crate::models::{Reservation, ValidateReservationBody};
use crate::query::QueryBuilder;

/// In-store pickup reservations.
pub struct ReservationsApi<'a> {
    conn: &'a Connection,
}

impl<'a> ReservationsApi<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// GET `reservations?shopId`
    pub async fn list(&self, shop_id: i64) -> Result<Vec<Reservation>> {
        let params = QueryBuilder::new().eq("shopId", shop_id).build();
        self.conn.get("reservations", &params).await
    }

    /// POST `reservations/validate` with the scanned or typed code.
    pub async fn validate(&self, code: &str) -> Result<Reservation> {
        let code = code.trim();
        if code.is_empty() {
            return Err(ClientError::Validation(vec![
                "Enter or scan a reservation code".to_string(),
            ]));
        }
        self.conn
            .post("reservations/validate", &ValidateReservationBody { qr_code: code })
            .await
    }
}
