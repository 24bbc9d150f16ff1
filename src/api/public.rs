//! Unauthenticated data behind the public share pages.

use crate::connection::Connection;
use crate::error::Result;
use crate::models::{PublicCard, PublicCommunityEvent, PublicShop, PublicTournament, ShareKind};

pub struct PublicApi<'a> {
    conn: &'a Connection,
}

impl<'a> PublicApi<'a> {
    pub fn new(conn: &'a Connection) -> Self {
        Self { conn }
    }

    fn path(kind: ShareKind, id: i64) -> String {
        format!("public/{}/{}", kind.api_segment(), id)
    }

    pub async fn shop(&self, id: i64) -> Result<PublicShop> {
        self.conn.get_public(&Self::path(ShareKind::Shop, id), &[]).await
    }

    pub async fn tournament(&self, id: i64) -> Result<PublicTournament> {
        self.conn
            .get_public(&Self::path(ShareKind::Tournament, id), &[])
            .await
    }

    pub async fn community_event(&self, id: i64) -> Result<PublicCommunityEvent> {
        self.conn
            .get_public(&Self::path(ShareKind::CommunityEvent, id), &[])
            .await
    }

    pub async fn card(&self, id: i64) -> Result<PublicCard> {
        self.conn.get_public(&Self::path(ShareKind::Card, id), &[]).await
    }

    /// Raw payload for any share kind, for callers that only need to render
    /// a preview.
    pub async fn raw(&self, kind: ShareKind, id: i64) -> Result<serde_json::Value> {
        self.conn.get_public(&Self::path(kind, id), &[]).await
    }
}
