//! Shared test fixtures for the merchant SDK integration tests.
//!
//! Provides two kinds of backend:
//! - `MockApi`, a real HTTP server (axum on 127.0.0.1:0) that records every
//!   call and answers with scripted JSON, for tests that go through
//!   `MerchantClient`;
//! - `FakeRequests` / `FakeInventory`, in-memory implementations of the view
//!   backend traits, for timer-driven tests under a paused tokio clock.

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{header, HeaderMap, Method, Uri};
use axum::response::Response;
use axum::Router;
use chrono::{DateTime, Utc};
use serde_json::Value;

use tcg_merchant_sdk::models::{
    BatchResult, BulkAddTemplates, BulkConfig, CardCondition, CardTemplate, CatalogScope,
    CustomerRequest, ImportAck, InventoryCard, InventoryFilters, InventoryItemInput,
    MerchantUser, Nationality, Page, RequestFilter, RequestMessage, RequestStatus, RequestType,
    SenderRole, Session, TemplateFilters, UploadFile,
};
use tcg_merchant_sdk::views::{InventoryBackend, RequestsBackend};
use tcg_merchant_sdk::{ClientError, MerchantClient, Result};

// ---------------------------------------------------------------------------
// Sample data
// ---------------------------------------------------------------------------

pub fn ts(s: &str) -> DateTime<Utc> {
    s.parse().unwrap()
}

pub fn sample_session(shop_id: Option<i64>) -> Session {
    Session {
        token: "tok-123".to_string(),
        user: MerchantUser {
            id: 11,
            username: "cardhaven".to_string(),
            email: Some("owner@cardhaven.test".to_string()),
            role: Some("MERCHANT".to_string()),
            shop_id,
        },
    }
}

pub fn sample_request(id: i64, status: RequestStatus, unread: bool) -> CustomerRequest {
    CustomerRequest {
        id,
        user_id: 500 + id,
        user_name: Some(format!("player{}", id)),
        shop_id: 7,
        request_type: RequestType::PriceCheck,
        status,
        title: format!("Request {}", id),
        description: None,
        card_id: None,
        card_name: Some("Charizard".to_string()),
        has_unread_messages: unread,
        message_count: 2,
        created_at: ts("2026-03-01T10:00:00Z"),
        updated_at: None,
    }
}

pub fn sample_message(id: i64, request_id: i64, content: &str, at: &str) -> RequestMessage {
    RequestMessage {
        id,
        request_id,
        sender_type: SenderRole::User,
        sender_id: Some(501),
        content: content.to_string(),
        created_at: ts(at),
    }
}

pub fn sample_template(id: i64, name: &str) -> CardTemplate {
    CardTemplate {
        id,
        name: name.to_string(),
        tcg_type: "POKEMON".to_string(),
        set_name: Some("Base Set".to_string()),
        expansion_id: Some(1),
        card_number: Some(id.to_string()),
        rarity: Some("Rare".to_string()),
        image_url: None,
    }
}

/// A stock record whose `notes` carry `label`, so tests can tell which
/// response ended up on screen.
pub fn sample_card(id: i64, label: &str) -> InventoryCard {
    InventoryCard {
        id,
        card_template_id: 4,
        shop_id: 7,
        condition: CardCondition::NearMint,
        quantity: 1,
        price: 12.5,
        nationality: Nationality::Eng,
        notes: Some(label.to_string()),
        card_template: Some(sample_template(4, "Charizard")),
    }
}

pub fn sample_item_input() -> InventoryItemInput {
    InventoryItemInput {
        card_template_id: 4,
        shop_id: 7,
        condition: CardCondition::Excellent,
        quantity: 2,
        price: 30.0,
        nationality: Nationality::Ita,
        notes: None,
    }
}

pub fn api_error(status: u16, message: &str) -> ClientError {
    ClientError::Api {
        status,
        message: Some(message.to_string()),
    }
}

// ---------------------------------------------------------------------------
// MockApi: scripted HTTP backend
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: String,
    /// Path relative to the API base, e.g. `requests/3/messages`.
    pub path: String,
    pub query: String,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl RecordedCall {
    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }

    pub fn body_text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

#[derive(Default)]
struct MockState {
    routes: Mutex<HashMap<(String, String), (u16, String)>>,
    calls: Mutex<Vec<RecordedCall>>,
}

pub struct MockApi {
    pub base_url: String,
    state: Arc<MockState>,
}

impl MockApi {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new().fallback(handle).with_state(Arc::clone(&state));
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        Self {
            base_url: format!("http://{}/api", addr),
            state,
        }
    }

    /// Answer `method path` with `status` and a JSON body.
    pub fn respond(&self, method: &str, path: &str, status: u16, body: Value) {
        self.respond_raw(method, path, status, &body.to_string());
    }

    pub fn respond_raw(&self, method: &str, path: &str, status: u16, body: &str) {
        self.state.routes.lock().unwrap().insert(
            (method.to_string(), path.to_string()),
            (status, body.to_string()),
        );
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.state.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, path: &str) -> Vec<RecordedCall> {
        self.calls().into_iter().filter(|c| c.path == path).collect()
    }

    /// A client pointed at this server with an in-memory, signed-out session.
    pub fn client(&self) -> MerchantClient {
        MerchantClient::builder()
            .base_url(&self.base_url)
            .in_memory_session(true)
            .build()
            .unwrap()
    }

    pub fn signed_in_client(&self, shop_id: i64) -> MerchantClient {
        let client = self.client();
        client
            .session()
            .establish(sample_session(Some(shop_id)))
            .unwrap();
        client
    }
}

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let path = uri.path().trim_start_matches("/api/").to_string();
    let header_str = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };
    state.calls.lock().unwrap().push(RecordedCall {
        method: method.to_string(),
        path: path.clone(),
        query: uri.query().unwrap_or("").to_string(),
        authorization: header_str(header::AUTHORIZATION),
        content_type: header_str(header::CONTENT_TYPE),
        body: body.to_vec(),
    });

    let scripted = state
        .routes
        .lock()
        .unwrap()
        .get(&(method.to_string(), path))
        .cloned();
    let (status, body) =
        scripted.unwrap_or((404, r#"{"message":"No such endpoint"}"#.to_string()));
    Response::builder()
        .status(status)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body))
        .unwrap()
}

// ---------------------------------------------------------------------------
// FakeRequests
// ---------------------------------------------------------------------------

#[derive(Default)]
pub struct FakeRequests {
    pub requests: Mutex<Vec<CustomerRequest>>,
    pub thread: Mutex<Vec<RequestMessage>>,
    pub sent: Mutex<Vec<String>>,
    pub status_calls: Mutex<Vec<RequestStatus>>,
    pub message_calls: AtomicUsize,
    /// Milliseconds each successive `messages` call waits before answering.
    /// The thread is read before the wait, so a late answer is an old one.
    pub message_delays: Mutex<VecDeque<u64>>,
    pub mark_read_calls: AtomicUsize,
    pub fail_list: AtomicBool,
    pub fail_messages: AtomicBool,
    pub fail_send: AtomicBool,
}

impl FakeRequests {
    pub fn with_requests(requests: Vec<CustomerRequest>) -> Arc<Self> {
        let fake = Self::default();
        *fake.requests.lock().unwrap() = requests;
        Arc::new(fake)
    }

    pub fn message_calls(&self) -> usize {
        self.message_calls.load(Ordering::SeqCst)
    }

    pub fn set(&self, flag: &AtomicBool, value: bool) {
        flag.store(value, Ordering::SeqCst);
    }
}

#[async_trait]
impl RequestsBackend for FakeRequests {
    async fn list_requests(
        &self,
        _shop_id: i64,
        filter: &RequestFilter,
    ) -> Result<Vec<CustomerRequest>> {
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(api_error(503, "Requests are temporarily unavailable"));
        }
        Ok(self
            .requests
            .lock()
            .unwrap()
            .iter()
            .filter(|r| filter.status.map_or(true, |s| r.status == s))
            .filter(|r| filter.request_type.map_or(true, |t| r.request_type == t))
            .cloned()
            .collect())
    }

    async fn messages(&self, request_id: i64) -> Result<Vec<RequestMessage>> {
        self.message_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_messages.load(Ordering::SeqCst) {
            return Err(api_error(502, "Upstream timeout"));
        }
        let thread: Vec<RequestMessage> = self
            .thread
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.request_id == request_id)
            .cloned()
            .collect();
        let delay = self.message_delays.lock().unwrap().pop_front().unwrap_or(0);
        if delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        Ok(thread)
    }

    async fn send_message(&self, request_id: i64, content: &str) -> Result<RequestMessage> {
        if self.fail_send.load(Ordering::SeqCst) {
            return Err(api_error(500, "Message could not be delivered"));
        }
        self.sent.lock().unwrap().push(content.to_string());
        let mut thread = self.thread.lock().unwrap();
        let message = RequestMessage {
            id: 1000 + thread.len() as i64,
            request_id,
            sender_type: SenderRole::Merchant,
            sender_id: Some(11),
            content: content.to_string(),
            created_at: ts("2026-03-01T12:00:00Z"),
        };
        thread.push(message.clone());
        Ok(message)
    }

    async fn mark_read(&self, request_id: i64) -> Result<()> {
        self.mark_read_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(request) = self
            .requests
            .lock()
            .unwrap()
            .iter_mut()
            .find(|r| r.id == request_id)
        {
            request.has_unread_messages = false;
        }
        Ok(())
    }

    async fn update_status(
        &self,
        request_id: i64,
        status: RequestStatus,
    ) -> Result<CustomerRequest> {
        self.status_calls.lock().unwrap().push(status);
        let mut requests = self.requests.lock().unwrap();
        let request = requests
            .iter_mut()
            .find(|r| r.id == request_id)
            .ok_or_else(|| ClientError::NotFound(format!("request {}", request_id)))?;
        request.status = status;
        request.updated_at = Some(ts("2026-03-02T09:30:00Z"));
        Ok(request.clone())
    }
}

// ---------------------------------------------------------------------------
// FakeInventory
// ---------------------------------------------------------------------------

/// Search text that makes the fake answer one second late.
pub const SLOW: &str = "slow";

#[derive(Default)]
pub struct FakeInventory {
    pub list_calls: Mutex<Vec<InventoryFilters>>,
    pub template_calls: Mutex<Vec<(Option<String>, u32)>>,
    pub bulk_calls: Mutex<Vec<BulkAddTemplates>>,
    pub scope_calls: Mutex<Vec<(CatalogScope, BulkConfig)>>,
    pub uploads: Mutex<Vec<String>>,
    pub next_batch: Mutex<BatchResult>,
    /// Number of catalog pages; 0 behaves as 1.
    pub template_pages: AtomicU32,
    pub fail_list: AtomicBool,
    pub fail_writes: AtomicBool,
}

impl FakeInventory {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn list_count(&self) -> usize {
        self.list_calls.lock().unwrap().len()
    }

    pub fn searches(&self) -> Vec<Option<String>> {
        self.list_calls
            .lock()
            .unwrap()
            .iter()
            .map(|f| f.search.clone())
            .collect()
    }

    pub fn script_batch(&self, batch: BatchResult) {
        *self.next_batch.lock().unwrap() = batch;
    }

    fn write_result(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(api_error(409, "Card already in inventory"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl InventoryBackend for FakeInventory {
    async fn list_inventory(
        &self,
        _shop_id: i64,
        filters: &InventoryFilters,
    ) -> Result<Vec<InventoryCard>> {
        self.list_calls.lock().unwrap().push(filters.clone());
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(api_error(503, "Inventory service unavailable"));
        }
        let label = filters.search.clone().unwrap_or_else(|| "all".to_string());
        if label == SLOW {
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
        Ok(vec![sample_card(1, &label)])
    }

    async fn search_templates(
        &self,
        filters: &TemplateFilters,
        page: u32,
        _size: u32,
    ) -> Result<Page<CardTemplate>> {
        self.template_calls
            .lock()
            .unwrap()
            .push((filters.name.clone(), page));
        let name = filters.name.clone().unwrap_or_default();
        if name == SLOW {
            tokio::time::sleep(Duration::from_secs(1)).await;
        }
        let pages = self.template_pages.load(Ordering::SeqCst).max(1);
        let base = i64::from(page) * 10;
        Ok(Page {
            content: vec![
                sample_template(base + 1, &format!("{}-{}-a", name, page)),
                sample_template(base + 2, &format!("{}-{}-b", name, page)),
            ],
            last: page + 1 >= pages,
            number: page,
        })
    }

    async fn create_item(&self, _item: &InventoryItemInput) -> Result<InventoryCard> {
        self.write_result()?;
        Ok(sample_card(2, "created"))
    }

    async fn update_item(&self, id: i64, _item: &InventoryItemInput) -> Result<InventoryCard> {
        self.write_result()?;
        Ok(sample_card(id, "updated"))
    }

    async fn delete_item(&self, _id: i64) -> Result<()> {
        self.write_result()
    }

    async fn bulk_add_templates(&self, req: &BulkAddTemplates) -> Result<BatchResult> {
        self.bulk_calls.lock().unwrap().push(req.clone());
        Ok(self.next_batch.lock().unwrap().clone())
    }

    async fn bulk_add_scope(
        &self,
        _shop_id: i64,
        scope: &CatalogScope,
        config: BulkConfig,
    ) -> Result<BatchResult> {
        self.scope_calls
            .lock()
            .unwrap()
            .push((scope.clone(), config));
        Ok(self.next_batch.lock().unwrap().clone())
    }

    async fn import_csv(&self, _shop_id: i64, file: UploadFile) -> Result<BatchResult> {
        self.uploads.lock().unwrap().push(file.file_name);
        Ok(self.next_batch.lock().unwrap().clone())
    }

    async fn import_custom(
        &self,
        _shop_id: i64,
        file: UploadFile,
        _notes: Option<String>,
    ) -> Result<ImportAck> {
        self.uploads.lock().unwrap().push(file.file_name);
        Ok(ImportAck {
            message: "File received, we will process it within 48 hours".to_string(),
        })
    }
}
