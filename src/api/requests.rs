//! Customer request inbox and per-request conversation.

use crate::connection::Connection;
use crate::error::{ClientError, Result};
use crate::models::{
    CustomerRequest, RequestFilter, RequestMessage, RequestStatus, SendMessageBody,
    StatusUpdateBody,
};
use crate::query::QueryBuilder;

pub struct RequestsApi<'a> {
    conn: &'a Connection,
}

impl<'a> RequestsApi<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    /// GET `requests?shopId&type&status`
    pub async fn list(&self, shop_id: i64, filter: &RequestFilter) -> Result<Vec<CustomerRequest>> {
        let params = QueryBuilder::new()
            .eq("shopId", shop_id)
            .opt("type", filter.request_type.map(|t| t.as_str()))
            .opt("status", filter.status.map(|s| s.as_str()))
            .build();
        self.conn.get("requests", &params).await
    }

    /// GET `requests/{id}/messages`, oldest first.
    pub async fn messages(&self, request_id: i64) -> Result<Vec<RequestMessage>> {
        let mut messages: Vec<RequestMessage> = self
            .conn
            .get(&format!("requests/{}/messages", request_id), &[])
            .await?;
        messages.sort_by_key(|m| (m.created_at, m.id));
        Ok(messages)
    }

    /// POST `requests/{id}/messages`
    pub async fn send_message(&self, request_id: i64, content: &str) -> Result<RequestMessage> {
        let content = content.trim();
        if content.is_empty() {
            return Err(ClientError::Validation(vec![
                "Message cannot be empty".to_string(),
            ]));
        }
        self.conn
            .post(
                &format!("requests/{}/messages", request_id),
                &SendMessageBody { content },
            )
            .await
    }

    /// POST `requests/{id}/read`
    pub async fn mark_read(&self, request_id: i64) -> Result<()> {
        self.conn
            .post_empty(&format!("requests/{}/read", request_id))
            .await
    }

    /// PUT `requests/{id}/status`. `CANCELLED` belongs to the player and is
    /// refused before anything is sent.
    pub async fn update_status(
        &self,
        request_id: i64,
        status: RequestStatus,
    ) -> Result<CustomerRequest> {
        if status == RequestStatus::Cancelled {
            return Err(ClientError::InvalidArgument(
                "merchants cannot cancel a request".to_string(),
            ));
        }
        self.conn
            .put(
                &format!("requests/{}/status", request_id),
                &StatusUpdateBody { status },
            )
            .await
    }
}
