//! Shop stock: single-item CRUD, bulk adds and file imports.

use reqwest::multipart::{Form, Part};

use crate::connection::Connection;
use crate::error::{ClientError, Result};
use crate::models::{
    BatchResult, BulkAddByExpansion, BulkAddBySet, BulkAddTemplates, BulkConfig, CatalogScope,
    ImportAck, InventoryCard, InventoryFilters, InventoryItemInput, UploadFile,
};
use crate::query::QueryBuilder;

// ---------------------------------------------------------------------------
// InventoryApi
// ---------------------------------------------------------------------------

pub struct InventoryApi<'a> {
    conn: &'a Connection,
}

impl<'a> InventoryApi<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    // -- Listing -----------------------------------------------------------

    /// GET `inventory?shopId&…`
    pub async fn list(
        &self,
        shop_id: i64,
        filters: &InventoryFilters,
    ) -> Result<Vec<InventoryCard>> {
        let params = QueryBuilder::new()
            .eq("shopId", shop_id)
            .opt("search", filters.search.as_deref())
            .opt("tcgType", filters.tcg_type.as_deref())
            .opt("condition", filters.condition.map(|c| c.as_str()))
            .opt("nationality", filters.nationality.map(|n| n.as_str()))
            .build();
        self.conn.get("inventory", &params).await
    }

    // -- Single item -------------------------------------------------------

    pub async fn create(&self, item: &InventoryItemInput) -> Result<InventoryCard> {
        validate_item(item)?;
        self.conn.post("inventory", item).await
    }

    pub async fn update(&self, id: i64, item: &InventoryItemInput) -> Result<InventoryCard> {
        validate_item(item)?;
        self.conn.put(&format!("inventory/{}", id), item).await
    }

    pub async fn delete(&self, id: i64) -> Result<()> {
        self.conn.delete(&format!("inventory/{}", id)).await
    }

    // -- Bulk add ----------------------------------------------------------

    /// POST `inventory/bulk-add-templates` with an explicit template id list.
    pub async fn bulk_add_templates(&self, req: &BulkAddTemplates) -> Result<BatchResult> {
        if req.template_ids.is_empty() {
            return Err(ClientError::Validation(vec![
                "Select at least one card".to_string(),
            ]));
        }
        validate_config(&req.config)?;
        self.conn.post("inventory/bulk-add-templates", req).await
    }

    /// POST `inventory/bulk-add-by-set`.
    pub async fn bulk_add_by_set(&self, req: &BulkAddBySet) -> Result<BatchResult> {
        validate_config(&req.config)?;
        self.conn.post("inventory/bulk-add-by-set", req).await
    }

    /// POST `inventory/bulk-add-by-expansion`.
    pub async fn bulk_add_by_expansion(&self, req: &BulkAddByExpansion) -> Result<BatchResult> {
        validate_config(&req.config)?;
        self.conn.post("inventory/bulk-add-by-expansion", req).await
    }

    /// Dispatch to the set-level or expansion-level endpoint depending on how
    /// far the scope was narrowed.
    pub async fn bulk_add_scope(
        &self,
        shop_id: i64,
        scope: &CatalogScope,
        config: BulkConfig,
    ) -> Result<BatchResult> {
        match scope {
            CatalogScope::Set {
                expansion_id,
                set_name,
            } => {
                self.bulk_add_by_set(&BulkAddBySet {
                    shop_id,
                    expansion_id: *expansion_id,
                    set_name: set_name.clone(),
                    config,
                })
                .await
            }
            CatalogScope::Expansion { expansion_id } => {
                self.bulk_add_by_expansion(&BulkAddByExpansion {
                    shop_id,
                    expansion_id: *expansion_id,
                    config,
                })
                .await
            }
        }
    }

    // -- File import -------------------------------------------------------

    /// POST `inventory/import`: a CSV matching the downloadable template,
    /// processed synchronously.
    pub async fn import_csv(&self, shop_id: i64, file: UploadFile) -> Result<BatchResult> {
        if !file.file_name.to_ascii_lowercase().ends_with(".csv") {
            return Err(ClientError::Validation(vec![
                "Only .csv files can be imported directly".to_string(),
            ]));
        }
        let part = Part::bytes(file.bytes)
            .file_name(file.file_name)
            .mime_str("text/csv")?;
        let form = Form::new()
            .text("shopId", shop_id.to_string())
            .part("file", part);
        self.conn.post_multipart("inventory/import", form).await
    }

    /// POST `inventory/import/custom`: any document, queued for manual
    /// processing. Only an acknowledgement comes back.
    pub async fn import_custom(
        &self,
        shop_id: i64,
        file: UploadFile,
        notes: Option<&str>,
    ) -> Result<ImportAck> {
        let mut form = Form::new()
            .text("shopId", shop_id.to_string())
            .part("file", Part::bytes(file.bytes).file_name(file.file_name));
        if let Some(notes) = notes.map(str::trim).filter(|n| !n.is_empty()) {
            form = form.text("notes", notes.to_string());
        }
        self.conn.post_multipart("inventory/import/custom", form).await
    }

    /// GET `inventory/import/template`: the CSV header file to fill in.
    pub async fn import_template(&self) -> Result<Vec<u8>> {
        self.conn.get_bytes("inventory/import/template").await
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_item(item: &InventoryItemInput) -> Result<()> {
    let mut problems = Vec::new();
    if item.quantity == 0 {
        problems.push("Quantity must be at least 1".to_string());
    }
    if !item.price.is_finite() || item.price < 0.0 {
        problems.push("Price must be zero or more".to_string());
    }
    if problems.is_empty() {
        Ok(())
    } else {
        Err(ClientError::Validation(problems))
    }
}

fn validate_config(config: &BulkConfig) -> Result<()> {
    let mut problems = Vec::new();
    if config.quantity == 0 {
        problems.push("Quantity must be at least 1".to_string());
    }
    if !config.price.is_finite() || config.price < 0.0 {
        problems.push("Price must be zero or more".to_string());
    }
    if problems.is_empty() {
        Ok(())
    } else {
        Err(ClientError::Validation(problems))
    }
}
