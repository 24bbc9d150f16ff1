use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Enumerations
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CardCondition {
    Mint,
    NearMint,
    Excellent,
    Good,
    LightPlayed,
    Played,
    Poor,
}

impl CardCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            CardCondition::Mint => "MINT",
            CardCondition::NearMint => "NEAR_MINT",
            CardCondition::Excellent => "EXCELLENT",
            CardCondition::Good => "GOOD",
            CardCondition::LightPlayed => "LIGHT_PLAYED",
            CardCondition::Played => "PLAYED",
            CardCondition::Poor => "POOR",
        }
    }
}

/// Print language of a physical card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Nationality {
    Eng,
    Ita,
    Jpn,
    Fra,
    Ger,
    Spa,
    Por,
    Kor,
    Chn,
}

impl Nationality {
    pub fn as_str(&self) -> &'static str {
        match self {
            Nationality::Eng => "ENG",
            Nationality::Ita => "ITA",
            Nationality::Jpn => "JPN",
            Nationality::Fra => "FRA",
            Nationality::Ger => "GER",
            Nationality::Spa => "SPA",
            Nationality::Por => "POR",
            Nationality::Kor => "KOR",
            Nationality::Chn => "CHN",
        }
    }
}

// ---------------------------------------------------------------------------
// CardTemplate — shared catalog entry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardTemplate {
    pub id: i64,
    pub name: String,
    pub tcg_type: String,
    pub set_name: Option<String>,
    pub expansion_id: Option<i64>,
    pub card_number: Option<String>,
    pub rarity: Option<String>,
    pub image_url: Option<String>,
}

/// Filters for the paginated template catalog.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TemplateFilters {
    pub name: Option<String>,
    pub tcg_type: Option<String>,
    pub set_name: Option<String>,
    pub expansion_id: Option<i64>,
    pub rarity: Option<String>,
}

// ---------------------------------------------------------------------------
// InventoryCard — a shop's stock record
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryCard {
    pub id: i64,
    pub card_template_id: i64,
    pub shop_id: i64,
    pub condition: CardCondition,
    pub quantity: u32,
    pub price: f64,
    pub nationality: Nationality,
    pub notes: Option<String>,
    pub card_template: Option<CardTemplate>,
}

/// Body for creating or replacing a single stock record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItemInput {
    pub card_template_id: i64,
    pub shop_id: i64,
    pub condition: CardCondition,
    pub quantity: u32,
    pub price: f64,
    pub nationality: Nationality,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryFilters {
    pub search: Option<String>,
    pub tcg_type: Option<String>,
    pub condition: Option<CardCondition>,
    pub nationality: Option<Nationality>,
}

// ---------------------------------------------------------------------------
// Bulk add
// ---------------------------------------------------------------------------

/// Stock configuration shared by every item in a bulk add.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkConfig {
    pub condition: CardCondition,
    pub quantity: u32,
    pub price: f64,
    pub nationality: Nationality,
}

impl Default for BulkConfig {
    fn default() -> Self {
        Self {
            condition: CardCondition::NearMint,
            quantity: 1,
            price: 0.0,
            nationality: Nationality::Eng,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkAddTemplates {
    pub shop_id: i64,
    pub template_ids: Vec<i64>,
    #[serde(flatten)]
    pub config: BulkConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkAddBySet {
    pub shop_id: i64,
    pub expansion_id: i64,
    pub set_name: String,
    #[serde(flatten)]
    pub config: BulkConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkAddByExpansion {
    pub shop_id: i64,
    pub expansion_id: i64,
    #[serde(flatten)]
    pub config: BulkConfig,
}

/// Catalog scope for a server-resolved bulk add.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogScope {
    Expansion { expansion_id: i64 },
    Set { expansion_id: i64, set_name: String },
}

impl CatalogScope {
    /// Narrow to a set when one has been picked, otherwise target the whole
    /// expansion.
    pub fn from_selection(expansion_id: i64, set_name: Option<&str>) -> Self {
        match set_name.map(str::trim).filter(|s| !s.is_empty()) {
            Some(set) => CatalogScope::Set {
                expansion_id,
                set_name: set.to_string(),
            },
            None => CatalogScope::Expansion { expansion_id },
        }
    }
}

/// A file picked for import.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    pub async fn from_path(path: impl AsRef<std::path::Path>) -> std::io::Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload")
            .to_string();
        Ok(Self { file_name, bytes })
    }
}
