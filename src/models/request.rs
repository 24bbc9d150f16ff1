use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// RequestType
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestType {
    Trade,
    PriceCheck,
    Evaluation,
    Availability,
    Buyback,
    General,
    #[serde(other)]
    Other,
}

impl RequestType {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestType::Trade => "TRADE",
            RequestType::PriceCheck => "PRICE_CHECK",
            RequestType::Evaluation => "EVALUATION",
            RequestType::Availability => "AVAILABILITY",
            RequestType::Buyback => "BUYBACK",
            RequestType::General => "GENERAL",
            RequestType::Other => "OTHER",
        }
    }
}

// ---------------------------------------------------------------------------
// RequestStatus
// ---------------------------------------------------------------------------

/// Lifecycle of a customer request.
///
/// ```text
/// PENDING  -> ACCEPTED | REJECTED
/// ACCEPTED -> COMPLETED | REJECTED
/// COMPLETED, REJECTED, CANCELLED are terminal
/// ```
///
/// `CANCELLED` is set by the player on the backend; a merchant only ever
/// observes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Completed,
    Rejected,
    Cancelled,
}

impl RequestStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "PENDING",
            RequestStatus::Accepted => "ACCEPTED",
            RequestStatus::Completed => "COMPLETED",
            RequestStatus::Rejected => "REJECTED",
            RequestStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            RequestStatus::Completed | RequestStatus::Rejected | RequestStatus::Cancelled
        )
    }

    /// Statuses a merchant may move a request to from `self`.
    pub fn merchant_transitions(&self) -> &'static [RequestStatus] {
        match self {
            RequestStatus::Pending => &[RequestStatus::Accepted, RequestStatus::Rejected],
            RequestStatus::Accepted => &[RequestStatus::Completed, RequestStatus::Rejected],
            _ => &[],
        }
    }

    pub fn can_transition_to(&self, next: RequestStatus) -> bool {
        self.merchant_transitions().contains(&next)
    }
}

// ---------------------------------------------------------------------------
// CustomerRequest
// ---------------------------------------------------------------------------

/// A conversation thread opened by a player against a shop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerRequest {
    pub id: i64,
    pub user_id: i64,
    pub user_name: Option<String>,
    pub shop_id: i64,
    #[serde(rename = "type")]
    pub request_type: RequestType,
    pub status: RequestStatus,
    pub title: String,
    pub description: Option<String>,
    pub card_id: Option<i64>,
    pub card_name: Option<String>,
    #[serde(default)]
    pub has_unread_messages: bool,
    #[serde(default)]
    pub message_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Optional inbox filter; `None` fields are not sent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequestFilter {
    pub request_type: Option<RequestType>,
    pub status: Option<RequestStatus>,
}

// ---------------------------------------------------------------------------
// RequestMessage
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SenderRole {
    User,
    Merchant,
    System,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestMessage {
    pub id: i64,
    pub request_id: i64,
    pub sender_type: SenderRole,
    pub sender_id: Option<i64>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SendMessageBody<'a> {
    pub content: &'a str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct StatusUpdateBody {
    pub status: RequestStatus,
}
