use crate::connection::Connection;
use crate::error::Result;
use crate::models::ShopSummary;
use crate::query::QueryBuilder;

/// Shop directory lookups used when claiming an existing shop at signup.
pub struct ShopsApi<'a> {
    conn: &'a Connection,
}

impl<'a> ShopsApi<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// GET `shops/search?q=`. Public: used before the merchant has an account.
    pub async fn search(&self, query: &str) -> Result<Vec<ShopSummary>> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }
        let params = QueryBuilder::new().eq("q", query).build();
        self.conn.get_public("shops/search", &params).await
    }
}
