//! Inventory browser: template catalog search, the shop's stock list with
//! debounced text search, and the bulk-add and import flows.

use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, MutexGuard, Weak};
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::config;
use crate::error::{ClientError, Result};
use crate::models::{
    BatchOutcome, BatchResult, BulkAddTemplates, BulkConfig, CardTemplate, CatalogScope,
    ImportAck, InventoryCard, InventoryFilters, InventoryItemInput, Page, TemplateFilters,
    UploadFile,
};
use crate::session::SessionContext;
use crate::views::debounce::Debouncer;
use crate::views::generation::Generation;
use crate::views::notice::{Notice, Notices};
use crate::MerchantClient;

// ---------------------------------------------------------------------------
// InventoryBackend
// ---------------------------------------------------------------------------

/// The inventory and catalog endpoints the browser needs.
#[async_trait]
pub trait InventoryBackend: Send + Sync {
    async fn list_inventory(
        &self,
        shop_id: i64,
        filters: &InventoryFilters,
    ) -> Result<Vec<InventoryCard>>;

    async fn search_templates(
        &self,
        filters: &TemplateFilters,
        page: u32,
        size: u32,
    ) -> Result<Page<CardTemplate>>;

    async fn create_item(&self, item: &InventoryItemInput) -> Result<InventoryCard>;

    async fn update_item(&self, id: i64, item: &InventoryItemInput) -> Result<InventoryCard>;

    async fn delete_item(&self, id: i64) -> Result<()>;

    async fn bulk_add_templates(&self, req: &BulkAddTemplates) -> Result<BatchResult>;

    async fn bulk_add_scope(
        &self,
        shop_id: i64,
        scope: &CatalogScope,
        config: BulkConfig,
    ) -> Result<BatchResult>;

    async fn import_csv(&self, shop_id: i64, file: UploadFile) -> Result<BatchResult>;

    async fn import_custom(
        &self,
        shop_id: i64,
        file: UploadFile,
        notes: Option<String>,
    ) -> Result<ImportAck>;
}

#[async_trait]
impl InventoryBackend for MerchantClient {
    async fn list_inventory(
        &self,
        shop_id: i64,
        filters: &InventoryFilters,
    ) -> Result<Vec<InventoryCard>> {
        self.inventory().list(shop_id, filters).await
    }

    async fn search_templates(
        &self,
        filters: &TemplateFilters,
        page: u32,
        size: u32,
    ) -> Result<Page<CardTemplate>> {
        self.templates().search(filters, page, size).await
    }

    async fn create_item(&self, item: &InventoryItemInput) -> Result<InventoryCard> {
        self.inventory().create(item).await
    }

    async fn update_item(&self, id: i64, item: &InventoryItemInput) -> Result<InventoryCard> {
        self.inventory().update(id, item).await
    }

    async fn delete_item(&self, id: i64) -> Result<()> {
        self.inventory().delete(id).await
    }

    async fn bulk_add_templates(&self, req: &BulkAddTemplates) -> Result<BatchResult> {
        self.inventory().bulk_add_templates(req).await
    }

    async fn bulk_add_scope(
        &self,
        shop_id: i64,
        scope: &CatalogScope,
        config: BulkConfig,
    ) -> Result<BatchResult> {
        self.inventory().bulk_add_scope(shop_id, scope, config).await
    }

    async fn import_csv(&self, shop_id: i64, file: UploadFile) -> Result<BatchResult> {
        self.inventory().import_csv(shop_id, file).await
    }

    async fn import_custom(
        &self,
        shop_id: i64,
        file: UploadFile,
        notes: Option<String>,
    ) -> Result<ImportAck> {
        self.inventory()
            .import_custom(shop_id, file, notes.as_deref())
            .await
    }
}

// ---------------------------------------------------------------------------
// InventoryState
// ---------------------------------------------------------------------------

/// Everything the inventory screen renders.
#[derive(Debug, Clone, Default)]
pub struct InventoryState {
    pub items: Vec<InventoryCard>,
    pub filters: InventoryFilters,
    pub templates: Vec<CardTemplate>,
    pub template_filters: TemplateFilters,
    pub template_page: u32,
    pub has_more_templates: bool,
    /// A new catalog search is in flight; the page counters above still
    /// belong to the previous one.
    pub searching_templates: bool,
    /// Template ids picked for a multi-select bulk add.
    pub selected: BTreeSet<i64>,
    pub last_batch: Option<BatchResult>,
    pub notices: Notices,
}

// ---------------------------------------------------------------------------
// InventoryBrowser
// ---------------------------------------------------------------------------

/// View-model of the merchant inventory screen.
///
/// Cheap to clone; clones share state. Every write is followed by a full
/// reload of the stock list.
#[derive(Clone)]
pub struct InventoryBrowser {
    inner: Arc<BrowserInner>,
}

struct BrowserInner {
    backend: Arc<dyn InventoryBackend>,
    shop_id: i64,
    page_size: u32,
    state: Mutex<InventoryState>,
    inventory_gen: Generation,
    template_gen: Generation,
    search: Debouncer<String>,
}

impl BrowserInner {
    fn lock(&self) -> MutexGuard<'_, InventoryState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn notify(&self, notice: Notice) {
        self.lock().notices.push(notice);
    }

    async fn load_inventory(&self, filters: InventoryFilters) -> bool {
        let ticket = self.inventory_gen.begin();
        let result = self.backend.list_inventory(self.shop_id, &filters).await;
        if !self.inventory_gen.is_current(ticket) {
            debug!("discarding stale inventory response");
            return false;
        }
        match result {
            Ok(items) => {
                debug!(count = items.len(), "inventory loaded");
                self.lock().items = items;
                true
            }
            Err(e) => {
                warn!(error = %e, "failed to load inventory, keeping previous list");
                self.notify(Notice::from_error(&e));
                false
            }
        }
    }

    async fn search_for(&self, query: String) -> bool {
        let filters = {
            let mut state = self.lock();
            state.filters.search = Some(query).filter(|q| !q.trim().is_empty());
            state.filters.clone()
        };
        self.load_inventory(filters).await
    }
}

impl InventoryBrowser {
    /// Bind the browser to the signed-in merchant's shop.
    pub fn mount(backend: Arc<dyn InventoryBackend>, session: &SessionContext) -> Result<Self> {
        let shop_id = session.shop_id().ok_or(ClientError::NoSession)?;
        Ok(Self::for_shop(backend, shop_id))
    }

    pub fn for_shop(backend: Arc<dyn InventoryBackend>, shop_id: i64) -> Self {
        Self::with_debounce(backend, shop_id, config::SEARCH_DEBOUNCE)
    }

    pub fn with_debounce(
        backend: Arc<dyn InventoryBackend>,
        shop_id: i64,
        delay: Duration,
    ) -> Self {
        let inner = Arc::new_cyclic(|weak: &Weak<BrowserInner>| {
            let weak = weak.clone();
            BrowserInner {
                backend,
                shop_id,
                page_size: config::TEMPLATE_PAGE_SIZE,
                state: Mutex::new(InventoryState::default()),
                inventory_gen: Generation::new(),
                template_gen: Generation::new(),
                search: Debouncer::new(delay, move |query: String| {
                    let weak = weak.clone();
                    async move {
                        if let Some(inner) = weak.upgrade() {
                            inner.search_for(query).await;
                        }
                    }
                }),
            }
        });
        Self { inner }
    }

    pub fn shop_id(&self) -> i64 {
        self.inner.shop_id
    }

    pub fn snapshot(&self) -> InventoryState {
        self.inner.lock().clone()
    }

    pub fn items(&self) -> Vec<InventoryCard> {
        self.inner.lock().items.clone()
    }

    pub fn take_notices(&self) -> Vec<Notice> {
        self.inner.lock().notices.take()
    }

    // -- Stock list --------------------------------------------------------

    /// Reload the stock list with the current filters.
    pub async fn reload(&self) -> bool {
        let filters = self.inner.lock().filters.clone();
        self.inner.load_inventory(filters).await
    }

    /// Replace the non-text filters and reload.
    pub async fn apply_filters(&self, filters: InventoryFilters) -> bool {
        {
            let mut state = self.inner.lock();
            let search = state.filters.search.take();
            state.filters = InventoryFilters { search, ..filters };
        }
        self.reload().await
    }

    /// Text typed into the search box. The backend is queried once typing
    /// pauses for the debounce delay.
    pub fn set_search_text(&self, text: impl Into<String>) {
        self.inner.search.call(text.into());
    }

    /// Search immediately, bypassing the debounce.
    pub async fn search_now(&self, text: impl Into<String>) -> bool {
        self.inner.search.cancel();
        self.inner.search_for(text.into()).await
    }

    pub fn search_pending(&self) -> bool {
        self.inner.search.is_pending()
    }

    pub async fn add_item(&self, item: &InventoryItemInput) -> bool {
        match self.inner.backend.create_item(item).await {
            Ok(_) => {
                self.inner.notify(Notice::success("Card added to inventory"));
                self.reload().await;
                true
            }
            Err(e) => {
                warn!(error = %e, "failed to add inventory item");
                self.inner.notify(Notice::from_error(&e));
                false
            }
        }
    }

    pub async fn update_item(&self, id: i64, item: &InventoryItemInput) -> bool {
        match self.inner.backend.update_item(id, item).await {
            Ok(_) => {
                self.inner.notify(Notice::success("Card updated"));
                self.reload().await;
                true
            }
            Err(e) => {
                warn!(id, error = %e, "failed to update inventory item");
                self.inner.notify(Notice::from_error(&e));
                false
            }
        }
    }

    pub async fn delete_item(&self, id: i64) -> bool {
        match self.inner.backend.delete_item(id).await {
            Ok(()) => {
                self.inner.notify(Notice::success("Card removed"));
                self.reload().await;
                true
            }
            Err(e) => {
                warn!(id, error = %e, "failed to delete inventory item");
                self.inner.notify(Notice::from_error(&e));
                false
            }
        }
    }

    // -- Template catalog --------------------------------------------------

    /// Start a new catalog search from the first page, replacing the list.
    pub async fn search_templates(&self, filters: TemplateFilters) -> bool {
        {
            let mut state = self.inner.lock();
            state.template_filters = filters.clone();
            state.searching_templates = true;
        }
        self.fetch_templates(filters, 0, false).await
    }

    /// Append the next catalog page. No-op when the last page is showing or
    /// while a new search has not landed yet.
    pub async fn load_more(&self) -> bool {
        let (filters, next) = {
            let state = self.inner.lock();
            if !state.has_more_templates || state.searching_templates {
                return false;
            }
            (state.template_filters.clone(), state.template_page + 1)
        };
        self.fetch_templates(filters, next, true).await
    }

    async fn fetch_templates(&self, filters: TemplateFilters, page: u32, append: bool) -> bool {
        let ticket = self.inner.template_gen.begin();
        let result = self
            .inner
            .backend
            .search_templates(&filters, page, self.inner.page_size)
            .await;
        if !self.inner.template_gen.is_current(ticket) {
            debug!(page, "discarding stale template page");
            return false;
        }
        if !append {
            self.inner.lock().searching_templates = false;
        }
        match result {
            Ok(found) => {
                let mut state = self.inner.lock();
                state.has_more_templates = found.has_next();
                state.template_page = page;
                if append {
                    state.templates.extend(found.content);
                } else {
                    state.templates = found.content;
                }
                true
            }
            Err(e) => {
                warn!(page, error = %e, "template search failed");
                if !append {
                    // The listed pages belong to other filters.
                    self.inner.lock().has_more_templates = false;
                }
                self.inner.notify(Notice::from_error(&e));
                false
            }
        }
    }

    // -- Selection & bulk add ---------------------------------------------

    /// Flip membership of a template in the selection; returns whether it is
    /// now selected.
    pub fn toggle_selected(&self, template_id: i64) -> bool {
        let mut state = self.inner.lock();
        if state.selected.remove(&template_id) {
            false
        } else {
            state.selected.insert(template_id);
            true
        }
    }

    pub fn selected(&self) -> Vec<i64> {
        self.inner.lock().selected.iter().copied().collect()
    }

    pub fn clear_selection(&self) {
        self.inner.lock().selected.clear();
    }

    /// Add every selected template with one shared configuration.
    pub async fn bulk_add_selected(&self, config: BulkConfig) -> Option<BatchResult> {
        let template_ids = self.selected();
        if template_ids.is_empty() {
            self.inner.notify(Notice::error("Select at least one card"));
            return None;
        }
        let req = BulkAddTemplates {
            shop_id: self.inner.shop_id,
            template_ids,
            config,
        };
        let result = self.inner.backend.bulk_add_templates(&req).await;
        let batch = self.handle_batch(result).await?;
        if batch.success_count > 0 {
            self.clear_selection();
        }
        Some(batch)
    }

    /// Add a whole expansion, or one set inside it.
    pub async fn bulk_add_scope(
        &self,
        scope: CatalogScope,
        config: BulkConfig,
    ) -> Option<BatchResult> {
        let result = self
            .inner
            .backend
            .bulk_add_scope(self.inner.shop_id, &scope, config)
            .await;
        self.handle_batch(result).await
    }

    pub async fn import_csv(&self, file: UploadFile) -> Option<BatchResult> {
        let result = self.inner.backend.import_csv(self.inner.shop_id, file).await;
        self.handle_batch(result).await
    }

    /// Queue an arbitrary file for manual processing. Nothing is added now,
    /// so the stock list is left alone.
    pub async fn import_custom(
        &self,
        file: UploadFile,
        notes: Option<String>,
    ) -> Option<ImportAck> {
        match self
            .inner
            .backend
            .import_custom(self.inner.shop_id, file, notes)
            .await
        {
            Ok(ack) => {
                self.inner.notify(Notice::from_ack(&ack));
                Some(ack)
            }
            Err(e) => {
                warn!(error = %e, "custom import request failed");
                self.inner.notify(Notice::from_error(&e));
                None
            }
        }
    }

    /// Turn a batch response into a notice; reload when anything was added.
    async fn handle_batch(&self, result: Result<BatchResult>) -> Option<BatchResult> {
        match result {
            Ok(batch) => {
                let outcome = batch.outcome();
                debug!(
                    success = batch.success_count,
                    errors = batch.error_count,
                    ?outcome,
                    "batch finished"
                );
                {
                    let mut state = self.inner.lock();
                    state.notices.push(Notice::from_batch(&batch));
                    state.last_batch = Some(batch.clone());
                }
                if outcome != BatchOutcome::Failed {
                    self.reload().await;
                }
                Some(batch)
            }
            Err(e) => {
                warn!(error = %e, "batch request failed");
                self.inner.notify(Notice::from_error(&e));
                None
            }
        }
    }
}
