//! Merchant request inbox and the per-request conversation panel.

use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{ClientError, Result};
use crate::models::{CustomerRequest, RequestFilter, RequestMessage, RequestStatus};
use crate::session::SessionContext;
use crate::views::feed::{FeedHandle, MessageFeed, MessageListener};
use crate::views::generation::{Generation, Ticket};
use crate::views::notice::{Notice, Notices};
use crate::MerchantClient;

// ---------------------------------------------------------------------------
// RequestsBackend
// ---------------------------------------------------------------------------

/// The request endpoints the inbox and conversation need.
#[async_trait]
pub trait RequestsBackend: Send + Sync {
    async fn list_requests(
        &self,
        shop_id: i64,
        filter: &RequestFilter,
    ) -> Result<Vec<CustomerRequest>>;

    async fn messages(&self, request_id: i64) -> Result<Vec<RequestMessage>>;

    async fn send_message(&self, request_id: i64, content: &str) -> Result<RequestMessage>;

    async fn mark_read(&self, request_id: i64) -> Result<()>;

    async fn update_status(
        &self,
        request_id: i64,
        status: RequestStatus,
    ) -> Result<CustomerRequest>;
}

#[async_trait]
impl RequestsBackend for MerchantClient {
    async fn list_requests(
        &self,
        shop_id: i64,
        filter: &RequestFilter,
    ) -> Result<Vec<CustomerRequest>> {
        self.requests().list(shop_id, filter).await
    }

    async fn messages(&self, request_id: i64) -> Result<Vec<RequestMessage>> {
        self.requests().messages(request_id).await
    }

    async fn send_message(&self, request_id: i64, content: &str) -> Result<RequestMessage> {
        self.requests().send_message(request_id, content).await
    }

    async fn mark_read(&self, request_id: i64) -> Result<()> {
        self.requests().mark_read(request_id).await
    }

    async fn update_status(
        &self,
        request_id: i64,
        status: RequestStatus,
    ) -> Result<CustomerRequest> {
        self.requests().update_status(request_id, status).await
    }
}

// ---------------------------------------------------------------------------
// StatusGate
// ---------------------------------------------------------------------------

/// What the conversation panel allows for a given request status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusGate {
    pub status: RequestStatus,
    pub badge: &'static str,
    pub composer_enabled: bool,
    /// Status buttons to render; empty once the request is terminal.
    pub actions: Vec<RequestStatus>,
}

impl StatusGate {
    pub fn for_status(status: RequestStatus) -> Self {
        Self {
            status,
            badge: status_badge(status),
            composer_enabled: !status.is_terminal(),
            actions: status.merchant_transitions().to_vec(),
        }
    }
}

pub fn status_badge(status: RequestStatus) -> &'static str {
    match status {
        RequestStatus::Pending => "Pending",
        RequestStatus::Accepted => "Accepted",
        RequestStatus::Completed => "Completed",
        RequestStatus::Rejected => "Rejected",
        RequestStatus::Cancelled => "Cancelled",
    }
}

// ---------------------------------------------------------------------------
// RequestInbox
// ---------------------------------------------------------------------------

/// The merchant's list of incoming requests.
pub struct RequestInbox {
    backend: Arc<dyn RequestsBackend>,
    shop_id: i64,
    filter: RequestFilter,
    requests: Vec<CustomerRequest>,
    loaded: bool,
    notices: Notices,
}

impl RequestInbox {
    /// Bind the inbox to the signed-in merchant's shop. The shop id is read
    /// once and kept for the lifetime of the view.
    pub fn mount(backend: Arc<dyn RequestsBackend>, session: &SessionContext) -> Result<Self> {
        let shop_id = session.shop_id().ok_or(ClientError::NoSession)?;
        Ok(Self::for_shop(backend, shop_id))
    }

    pub fn for_shop(backend: Arc<dyn RequestsBackend>, shop_id: i64) -> Self {
        Self {
            backend,
            shop_id,
            filter: RequestFilter::default(),
            requests: Vec::new(),
            loaded: false,
            notices: Notices::default(),
        }
    }

    pub fn shop_id(&self) -> i64 {
        self.shop_id
    }

    pub fn requests(&self) -> &[CustomerRequest] {
        &self.requests
    }

    pub fn filter(&self) -> RequestFilter {
        self.filter
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn unread_count(&self) -> usize {
        self.requests
            .iter()
            .filter(|r| r.has_unread_messages)
            .count()
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.notices.take()
    }

    /// Fetch with a new filter. On failure the previous list stays on screen
    /// and an error notice is queued. Returns whether the list was replaced.
    pub async fn refresh(&mut self, filter: RequestFilter) -> bool {
        self.filter = filter;
        self.reload().await
    }

    /// Fetch again with the current filter.
    pub async fn reload(&mut self) -> bool {
        match self.backend.list_requests(self.shop_id, &self.filter).await {
            Ok(requests) => {
                debug!(count = requests.len(), "request inbox loaded");
                self.requests = requests;
                self.loaded = true;
                true
            }
            Err(e) => {
                warn!(error = %e, "failed to load requests, keeping previous list");
                self.notices.push(Notice::from_error(&e));
                false
            }
        }
    }

    /// Open the conversation panel of a listed request. Opening an unread
    /// request marks it read, so the list is fetched again afterwards.
    pub async fn open(
        &mut self,
        request_id: i64,
        feed: &dyn MessageFeed,
    ) -> Result<Conversation> {
        let request = self
            .requests
            .iter()
            .find(|r| r.id == request_id)
            .cloned()
            .ok_or_else(|| ClientError::NotFound(format!("request {}", request_id)))?;
        let was_unread = request.has_unread_messages;
        let conversation = Conversation::open(Arc::clone(&self.backend), feed, request).await;
        if was_unread && !conversation.request().has_unread_messages {
            self.reload().await;
        }
        Ok(conversation)
    }

    /// Move an open conversation's request to `status`, then fetch the list
    /// again so its row shows the new status.
    pub async fn update_status(
        &mut self,
        conversation: &Conversation,
        status: RequestStatus,
    ) -> bool {
        if !conversation.update_status(status).await {
            return false;
        }
        self.reload().await;
        true
    }
}

// ---------------------------------------------------------------------------
// Conversation
// ---------------------------------------------------------------------------

/// Snapshot of the conversation panel.
#[derive(Debug, Clone)]
pub struct ConversationState {
    pub request: CustomerRequest,
    pub messages: Vec<RequestMessage>,
    /// Text in the composer.
    pub draft: String,
    pub sending: bool,
    pub notices: Notices,
    refresh_failing: bool,
}

struct ConversationShared {
    state: Mutex<ConversationState>,
    generation: Generation,
}

impl ConversationShared {
    fn lock(&self) -> MutexGuard<'_, ConversationState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl MessageListener for ConversationShared {
    fn begin(&self) -> Ticket {
        self.generation.begin()
    }

    fn on_messages(&self, request_id: i64, ticket: Ticket, messages: Vec<RequestMessage>) {
        let mut state = self.lock();
        if state.request.id != request_id || !self.generation.is_current(ticket) {
            debug!(request_id, "discarding stale conversation snapshot");
            return;
        }
        state.messages = messages;
        state.refresh_failing = false;
    }

    fn on_refresh_failed(&self, request_id: i64, ticket: Ticket, error: &ClientError) {
        if !self.generation.is_current(ticket) {
            debug!(request_id, "discarding stale conversation failure");
            return;
        }
        let mut state = self.lock();
        // One notice per failure streak, not one per tick.
        if !state.refresh_failing {
            state.refresh_failing = true;
            state.notices.push(Notice::from_error(error));
        }
    }
}

/// An open conversation with live refresh.
///
/// Refresh stops on [`close`](Self::close) or when the conversation is
/// dropped.
pub struct Conversation {
    backend: Arc<dyn RequestsBackend>,
    shared: Arc<ConversationShared>,
    feed: FeedHandle,
}

impl Conversation {
    /// Load the whole thread, mark it read if it had unread messages, then
    /// start the feed. Load failures become notices; the panel still opens.
    pub async fn open(
        backend: Arc<dyn RequestsBackend>,
        feed: &dyn MessageFeed,
        request: CustomerRequest,
    ) -> Self {
        let request_id = request.id;
        let mut state = ConversationState {
            request,
            messages: Vec::new(),
            draft: String::new(),
            sending: false,
            notices: Notices::default(),
            refresh_failing: false,
        };

        match backend.messages(request_id).await {
            Ok(messages) => {
                state.messages = messages;
                if state.request.has_unread_messages {
                    match backend.mark_read(request_id).await {
                        Ok(()) => state.request.has_unread_messages = false,
                        Err(e) => {
                            warn!(request_id, error = %e, "failed to mark conversation read");
                            state.notices.push(Notice::from_error(&e));
                        }
                    }
                }
            }
            Err(e) => {
                warn!(request_id, error = %e, "failed to load conversation");
                state.notices.push(Notice::from_error(&e));
            }
        }

        let shared = Arc::new(ConversationShared {
            state: Mutex::new(state),
            generation: Generation::new(),
        });
        let listener: Arc<dyn MessageListener> = shared.clone();
        let feed = feed.watch(request_id, listener);
        Self {
            backend,
            shared,
            feed,
        }
    }

    pub fn request_id(&self) -> i64 {
        self.shared.lock().request.id
    }

    pub fn request(&self) -> CustomerRequest {
        self.shared.lock().request.clone()
    }

    pub fn messages(&self) -> Vec<RequestMessage> {
        self.shared.lock().messages.clone()
    }

    pub fn snapshot(&self) -> ConversationState {
        self.shared.lock().clone()
    }

    pub fn gate(&self) -> StatusGate {
        StatusGate::for_status(self.shared.lock().request.status)
    }

    pub fn draft(&self) -> String {
        self.shared.lock().draft.clone()
    }

    pub fn set_draft(&self, text: impl Into<String>) {
        self.shared.lock().draft = text.into();
    }

    pub fn take_notices(&self) -> Vec<Notice> {
        self.shared.lock().notices.take()
    }

    pub fn is_live(&self) -> bool {
        self.feed.is_active()
    }

    /// Send the draft.
    ///
    /// The composer is cleared before the call goes out. On success the whole
    /// thread is fetched again; nothing is appended locally. On failure the
    /// text is put back and an error notice is queued.
    pub async fn send(&self) -> bool {
        let (request_id, text) = {
            let mut state = self.shared.lock();
            if !StatusGate::for_status(state.request.status).composer_enabled {
                state
                    .notices
                    .push(Notice::error("This request is closed to new messages"));
                return false;
            }
            if state.draft.trim().is_empty() || state.sending {
                return false;
            }
            state.sending = true;
            (state.request.id, std::mem::take(&mut state.draft))
        };

        let result = self.backend.send_message(request_id, &text).await;

        match result {
            Ok(_) => {
                self.shared.lock().sending = false;
                self.refresh().await;
                true
            }
            Err(e) => {
                warn!(request_id, error = %e, "failed to send message");
                let mut state = self.shared.lock();
                state.sending = false;
                if state.draft.is_empty() {
                    state.draft = text;
                }
                state.notices.push(Notice::from_error(&e));
                false
            }
        }
    }

    /// Fetch the thread now, outside the feed's schedule. A poll still in
    /// flight when this starts can no longer replace its result.
    pub async fn refresh(&self) -> bool {
        let request_id = self.request_id();
        let ticket = self.shared.begin();
        match self.backend.messages(request_id).await {
            Ok(messages) => {
                self.shared.on_messages(request_id, ticket, messages);
                true
            }
            Err(e) => {
                warn!(request_id, error = %e, "failed to refresh conversation");
                if self.shared.generation.is_current(ticket) {
                    self.shared.lock().notices.push(Notice::from_error(&e));
                }
                false
            }
        }
    }

    /// Move the request to `status`. On success the badge, the status actions
    /// and the composer follow the new status.
    pub async fn update_status(&self, status: RequestStatus) -> bool {
        let (request_id, current) = {
            let state = self.shared.lock();
            (state.request.id, state.request.status)
        };
        if !current.can_transition_to(status) {
            self.shared.lock().notices.push(Notice::error(format!(
                "Cannot move a {} request to {}",
                status_badge(current).to_lowercase(),
                status_badge(status).to_lowercase()
            )));
            return false;
        }

        match self.backend.update_status(request_id, status).await {
            Ok(updated) => {
                let mut state = self.shared.lock();
                state.request.status = updated.status;
                state.request.updated_at = updated.updated_at;
                let badge = status_badge(updated.status).to_lowercase();
                state.notices.push(Notice::success(format!("Request {}", badge)));
                true
            }
            Err(e) => {
                warn!(request_id, error = %e, "failed to update request status");
                self.shared.lock().notices.push(Notice::from_error(&e));
                false
            }
        }
    }

    /// Stop live refresh. Idempotent.
    pub fn close(&mut self) {
        self.feed.stop();
    }
}
