use serde::{Deserialize, Serialize};

/// One page of a paginated listing.
///
/// Whether another page exists comes from the `last` flag, not from a total.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(default = "Vec::new")]
    pub content: Vec<T>,
    #[serde(default = "default_last")]
    pub last: bool,
    #[serde(default)]
    pub number: u32,
}

fn default_last() -> bool {
    true
}

impl<T> Page<T> {
    pub fn has_next(&self) -> bool {
        !self.last
    }
}
