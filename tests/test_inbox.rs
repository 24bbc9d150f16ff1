//! Request inbox and conversation panel, driven by an in-memory backend under
//! a paused clock.

mod common;

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;

use common::{sample_message, sample_request, sample_session, FakeRequests};
use tcg_merchant_sdk::models::{RequestFilter, RequestStatus};
use tcg_merchant_sdk::views::{
    Conversation, NoticeLevel, PollingFeed, RequestInbox, RequestsBackend, StatusGate,
};
use tcg_merchant_sdk::{ClientError, SessionContext, SessionStore};

fn backend_with_thread(status: RequestStatus, unread: bool) -> Arc<FakeRequests> {
    let fake = FakeRequests::with_requests(vec![
        sample_request(1, status, unread),
        sample_request(2, RequestStatus::Completed, false),
    ]);
    fake.thread.lock().unwrap().extend([
        sample_message(1, 1, "Is this in stock?", "2026-03-01T10:00:00Z"),
        sample_message(2, 1, "Near mint please", "2026-03-01T10:01:00Z"),
    ]);
    fake
}

async fn open_conversation(fake: &Arc<FakeRequests>) -> Conversation {
    let backend: Arc<dyn RequestsBackend> = fake.clone();
    let feed = PollingFeed::new(backend.clone());
    let request = fake.requests.lock().unwrap()[0].clone();
    Conversation::open(backend, &feed, request).await
}

// ---------------------------------------------------------------------------
// Inbox
// ---------------------------------------------------------------------------

#[tokio::test]
async fn mount_requires_a_shop() {
    let session = SessionContext::restore(SessionStore::in_memory()).unwrap();
    let fake: Arc<dyn RequestsBackend> = FakeRequests::with_requests(vec![]);
    assert!(matches!(
        RequestInbox::mount(fake.clone(), &session),
        Err(ClientError::NoSession)
    ));

    session.establish(sample_session(Some(7))).unwrap();
    let inbox = RequestInbox::mount(fake, &session).unwrap();
    assert_eq!(inbox.shop_id(), 7);
    assert!(!inbox.is_loaded());
}

#[tokio::test]
async fn refresh_applies_filter_and_counts_unread() {
    let fake = backend_with_thread(RequestStatus::Pending, true);
    let mut inbox = RequestInbox::for_shop(fake, 7);

    assert!(inbox.reload().await);
    assert_eq!(inbox.requests().len(), 2);
    assert_eq!(inbox.unread_count(), 1);

    let filter = RequestFilter {
        request_type: None,
        status: Some(RequestStatus::Completed),
    };
    assert!(inbox.refresh(filter).await);
    assert_eq!(inbox.filter(), filter);
    assert_eq!(inbox.requests().len(), 1);
    assert_eq!(inbox.requests()[0].id, 2);
}

#[tokio::test]
async fn failed_refresh_keeps_previous_list() {
    let fake = backend_with_thread(RequestStatus::Pending, false);
    let mut inbox = RequestInbox::for_shop(fake.clone(), 7);
    inbox.reload().await;

    fake.set(&fake.fail_list, true);
    assert!(!inbox.reload().await);

    assert_eq!(inbox.requests().len(), 2);
    let notices = inbox.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].level, NoticeLevel::Error);
    assert_eq!(notices[0].message, "Requests are temporarily unavailable");
}

#[tokio::test(start_paused = true)]
async fn opening_unread_request_marks_it_read() {
    let fake = backend_with_thread(RequestStatus::Pending, true);
    let mut inbox = RequestInbox::for_shop(fake.clone(), 7);
    inbox.reload().await;
    let feed = PollingFeed::new(fake.clone());

    let conversation = inbox.open(1, &feed).await.unwrap();

    assert_eq!(fake.mark_read_calls.load(Ordering::SeqCst), 1);
    assert!(!conversation.request().has_unread_messages);
    // The list was fetched again, not patched.
    assert!(!inbox.requests()[0].has_unread_messages);
    assert_eq!(inbox.unread_count(), 0);
    assert_eq!(conversation.messages().len(), 2);
    assert!(conversation.is_live());
}

#[tokio::test(start_paused = true)]
async fn opening_read_request_does_not_mark_again() {
    let fake = backend_with_thread(RequestStatus::Pending, false);
    let _conversation = open_conversation(&fake).await;
    assert_eq!(fake.mark_read_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test(start_paused = true)]
async fn opening_unknown_request_fails() {
    let fake = backend_with_thread(RequestStatus::Pending, false);
    let mut inbox = RequestInbox::for_shop(fake.clone(), 7);
    inbox.reload().await;
    let feed = PollingFeed::new(fake);
    assert!(matches!(
        inbox.open(42, &feed).await,
        Err(ClientError::NotFound(_))
    ));
}

// ---------------------------------------------------------------------------
// Polling
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn conversation_polls_every_four_seconds_until_closed() {
    let fake = backend_with_thread(RequestStatus::Accepted, false);
    let mut conversation = open_conversation(&fake).await;
    assert_eq!(fake.message_calls(), 1);

    sleep(Duration::from_millis(3900)).await;
    assert_eq!(fake.message_calls(), 1);

    sleep(Duration::from_millis(200)).await;
    assert_eq!(fake.message_calls(), 2);

    fake.thread
        .lock()
        .unwrap()
        .push(sample_message(3, 1, "Any news?", "2026-03-01T10:05:00Z"));
    sleep(Duration::from_secs(4)).await;
    assert_eq!(fake.message_calls(), 3);
    assert_eq!(conversation.messages().len(), 3);

    conversation.close();
    assert!(!conversation.is_live());
    sleep(Duration::from_secs(20)).await;
    assert_eq!(fake.message_calls(), 3);
}

#[tokio::test(start_paused = true)]
async fn dropping_conversation_stops_polling() {
    let fake = backend_with_thread(RequestStatus::Accepted, false);
    let conversation = open_conversation(&fake).await;
    drop(conversation);

    sleep(Duration::from_secs(12)).await;
    assert_eq!(fake.message_calls(), 1);
}

#[tokio::test(start_paused = true)]
async fn poll_failures_raise_one_notice_per_streak() {
    let fake = backend_with_thread(RequestStatus::Accepted, false);
    let conversation = open_conversation(&fake).await;

    fake.set(&fake.fail_messages, true);
    sleep(Duration::from_millis(4100)).await;
    sleep(Duration::from_secs(4)).await;
    let notices = conversation.take_notices();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].message, "Upstream timeout");
    // The thread on screen survives the failures.
    assert_eq!(conversation.messages().len(), 2);

    fake.set(&fake.fail_messages, false);
    sleep(Duration::from_secs(4)).await;
    fake.set(&fake.fail_messages, true);
    sleep(Duration::from_secs(4)).await;
    assert_eq!(conversation.take_notices().len(), 1);
}

#[tokio::test(start_paused = true)]
async fn late_poll_cannot_replace_thread_refetched_after_send() {
    let fake = backend_with_thread(RequestStatus::Accepted, false);
    // open answers at once, the first poll takes 3s, the refetch after send
    // answers at once.
    fake.message_delays.lock().unwrap().extend([0, 3000, 0]);
    let conversation = open_conversation(&fake).await;

    sleep(Duration::from_millis(4500)).await;
    assert_eq!(fake.message_calls(), 2);
    conversation.set_draft("Two copies left");
    assert!(conversation.send().await);
    assert_eq!(conversation.messages().len(), 3);

    // The first poll lands at t=7s carrying the pre-send thread.
    sleep(Duration::from_millis(2600)).await;
    let messages = conversation.messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(messages.last().unwrap().content, "Two copies left");
    assert!(conversation.take_notices().is_empty());
}

// ---------------------------------------------------------------------------
// Composer
// ---------------------------------------------------------------------------

#[tokio::test(start_paused = true)]
async fn send_clears_draft_and_refetches_thread() {
    let fake = backend_with_thread(RequestStatus::Accepted, false);
    let conversation = open_conversation(&fake).await;

    conversation.set_draft("Yes, 2 copies left");
    assert!(conversation.send().await);

    assert_eq!(conversation.draft(), "");
    assert_eq!(*fake.sent.lock().unwrap(), vec!["Yes, 2 copies left"]);
    assert_eq!(fake.message_calls(), 2);
    let messages = conversation.messages();
    assert_eq!(messages.last().unwrap().content, "Yes, 2 copies left");
}

#[tokio::test(start_paused = true)]
async fn failed_send_restores_draft() {
    let fake = backend_with_thread(RequestStatus::Pending, false);
    let conversation = open_conversation(&fake).await;
    fake.set(&fake.fail_send, true);

    conversation.set_draft("Hello");
    assert!(!conversation.send().await);

    assert_eq!(conversation.draft(), "Hello");
    assert!(!conversation.snapshot().sending);
    let notices = conversation.take_notices();
    assert_eq!(notices[0].message, "Message could not be delivered");
}

#[tokio::test(start_paused = true)]
async fn blank_draft_is_not_sent() {
    let fake = backend_with_thread(RequestStatus::Pending, false);
    let conversation = open_conversation(&fake).await;

    conversation.set_draft("   ");
    assert!(!conversation.send().await);
    assert!(fake.sent.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn terminal_request_disables_composer() {
    let fake = backend_with_thread(RequestStatus::Rejected, false);
    let conversation = open_conversation(&fake).await;

    let gate = conversation.gate();
    assert_eq!(gate.badge, "Rejected");
    assert!(!gate.composer_enabled);
    assert!(gate.actions.is_empty());

    conversation.set_draft("Too late");
    assert!(!conversation.send().await);
    assert!(fake.sent.lock().unwrap().is_empty());
    assert_eq!(conversation.take_notices()[0].level, NoticeLevel::Error);
}

// ---------------------------------------------------------------------------
// Status changes
// ---------------------------------------------------------------------------

#[test]
fn gates_follow_status() {
    let pending = StatusGate::for_status(RequestStatus::Pending);
    assert!(pending.composer_enabled);
    assert_eq!(
        pending.actions,
        vec![RequestStatus::Accepted, RequestStatus::Rejected]
    );

    let cancelled = StatusGate::for_status(RequestStatus::Cancelled);
    assert_eq!(cancelled.badge, "Cancelled");
    assert!(!cancelled.composer_enabled);
}

#[tokio::test(start_paused = true)]
async fn accepting_updates_badge_and_actions() {
    let fake = backend_with_thread(RequestStatus::Pending, false);
    let conversation = open_conversation(&fake).await;

    assert!(conversation.update_status(RequestStatus::Accepted).await);

    let gate = conversation.gate();
    assert_eq!(gate.badge, "Accepted");
    assert_eq!(
        gate.actions,
        vec![RequestStatus::Completed, RequestStatus::Rejected]
    );
    assert!(conversation.request().updated_at.is_some());
    assert_eq!(conversation.take_notices()[0].message, "Request accepted");

    assert!(conversation.update_status(RequestStatus::Completed).await);
    assert!(!conversation.gate().composer_enabled);
}

#[tokio::test(start_paused = true)]
async fn inbox_row_follows_accepted_request() {
    let fake = backend_with_thread(RequestStatus::Pending, false);
    let mut inbox = RequestInbox::for_shop(fake.clone(), 7);
    inbox.reload().await;
    let feed = PollingFeed::new(fake.clone());
    let conversation = inbox.open(1, &feed).await.unwrap();

    assert!(inbox.update_status(&conversation, RequestStatus::Accepted).await);

    assert_eq!(conversation.gate().status, RequestStatus::Accepted);
    let row = inbox.requests().iter().find(|r| r.id == 1).unwrap();
    assert_eq!(row.status, RequestStatus::Accepted);
}

#[tokio::test(start_paused = true)]
async fn refused_transition_leaves_inbox_untouched() {
    let fake = backend_with_thread(RequestStatus::Pending, false);
    let mut inbox = RequestInbox::for_shop(fake.clone(), 7);
    inbox.reload().await;
    let feed = PollingFeed::new(fake.clone());
    let conversation = inbox.open(1, &feed).await.unwrap();
    fake.set(&fake.fail_list, true);

    assert!(!inbox.update_status(&conversation, RequestStatus::Completed).await);
    assert!(inbox.take_notices().is_empty());
    assert_eq!(inbox.requests()[0].status, RequestStatus::Pending);
}

#[tokio::test(start_paused = true)]
async fn illegal_transition_is_refused_locally() {
    let fake = backend_with_thread(RequestStatus::Pending, false);
    let conversation = open_conversation(&fake).await;

    assert!(!conversation.update_status(RequestStatus::Completed).await);
    assert!(fake.status_calls.lock().unwrap().is_empty());
    assert_eq!(conversation.gate().status, RequestStatus::Pending);
    assert_eq!(
        conversation.take_notices()[0].message,
        "Cannot move a pending request to completed"
    );
}
