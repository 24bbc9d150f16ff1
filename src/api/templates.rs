use crate::connection::Connection;
use crate::error::Result;
use crate::models::{CardTemplate, Page, TemplateFilters};
use crate::query::QueryBuilder;

/// Shared card-template catalog.
pub struct TemplatesApi<'a> {
    conn: &'a Connection,
}

impl<'a> TemplatesApi<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// GET `card-templates?…&page&size`
    pub async fn search(
        &self,
        filters: &TemplateFilters,
        page: u32,
        size: u32,
    ) -> Result<Page<CardTemplate>> {
        let params = QueryBuilder::new()
            .opt("name", filters.name.as_deref())
            .opt("tcgType", filters.tcg_type.as_deref())
            .opt("setName", filters.set_name.as_deref())
            .opt("expansionId", filters.expansion_id)
            .opt("rarity", filters.rarity.as_deref())
            .page(page, size)
            .build();
        self.conn.get("card-templates", &params).await
    }
}
