use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config;

// ---------------------------------------------------------------------------
// Public share payloads (no auth)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicShop {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub logo_url: Option<String>,
    #[serde(default)]
    pub verified: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicTournament {
    pub id: i64,
    pub title: String,
    pub tcg_type: Option<String>,
    pub shop_id: Option<i64>,
    pub shop_name: Option<String>,
    pub start_date: Option<DateTime<Utc>>,
    pub max_participants: Option<u32>,
    #[serde(default)]
    pub current_participants: u32,
    pub entry_fee: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicCommunityEvent {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub event_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicCard {
    pub id: i64,
    pub name: String,
    pub tcg_type: Option<String>,
    pub set_name: Option<String>,
    pub rarity: Option<String>,
    pub image_url: Option<String>,
    pub price: Option<f64>,
    pub shop_name: Option<String>,
}

// ---------------------------------------------------------------------------
// SharePage
// ---------------------------------------------------------------------------

/// Kinds of public pages that deep-link into the companion app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShareKind {
    Shop,
    Tournament,
    CommunityEvent,
    Card,
}

impl ShareKind {
    /// Path segment under `public/` on the API.
    pub fn api_segment(&self) -> &'static str {
        match self {
            ShareKind::Shop => "shops",
            ShareKind::Tournament => "tournaments",
            ShareKind::CommunityEvent => "community-events",
            ShareKind::Card => "cards",
        }
    }

    /// Host part of the app deep link.
    pub fn link_segment(&self) -> &'static str {
        match self {
            ShareKind::Shop => "shop",
            ShareKind::Tournament => "tournament",
            ShareKind::CommunityEvent => "event",
            ShareKind::Card => "card",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "shop" | "shops" => Some(ShareKind::Shop),
            "tournament" | "tournaments" => Some(ShareKind::Tournament),
            "event" | "events" | "community-event" | "community-events" => {
                Some(ShareKind::CommunityEvent)
            }
            "card" | "cards" => Some(ShareKind::Card),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SharePage {
    pub kind: ShareKind,
    pub id: i64,
}

impl SharePage {
    pub fn new(kind: ShareKind, id: i64) -> Self {
        Self { kind, id }
    }

    /// `tcgapp://<kind>/<id>`
    pub fn deep_link(&self) -> String {
        format!(
            "{}://{}/{}",
            config::APP_DEEP_LINK_SCHEME,
            self.kind.link_segment(),
            self.id
        )
    }

    pub fn web_url(&self) -> String {
        format!(
            "{}/{}/{}",
            config::SHARE_WEB_BASE,
            self.kind.link_segment(),
            self.id
        )
    }
}
