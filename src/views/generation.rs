use std::sync::atomic::{AtomicU64, Ordering};

/// Tag carried by an issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Ticket(u64);

/// Per-view request counter.
///
/// Each request takes a ticket from [`begin`](Self::begin); a response is only
/// applied when its ticket is still the latest one issued, so a slow earlier
/// response can never overwrite a newer one.
#[derive(Debug, Default)]
pub struct Generation {
    latest: AtomicU64,
}

impl Generation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self) -> Ticket {
        Ticket(self.latest.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.latest.load(Ordering::SeqCst) == ticket.0
    }
}
