//! URL query-string builder for list and search endpoints.
//!
//! Optional filters that are `None` or blank are dropped rather than sent as
//! empty parameters. Builder methods return `&mut Self` for chaining.
//!
//! # Example
//!
//! ```rust
//! use tcg_merchant_sdk::QueryBuilder;
//! let params = QueryBuilder::new()
//!     .eq("shopId", 42)
//!     .opt("status", Some("PENDING"))
//!     .opt("type", None::<&str>)
//!     .page(0, 24)
//!     .build();
//! assert_eq!(params.len(), 4);
//! ```

use std::fmt::Display;

/// Collects query parameters in insertion order.
#[derive(Debug, Default, Clone)]
pub struct QueryBuilder {
    params: Vec<(String, String)>,
}

impl QueryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a parameter unconditionally.
    pub fn eq(&mut self, key: &str, value: impl Display) -> &mut Self {
        self.params.push((key.to_string(), value.to_string()));
        self
    }

    /// Add a parameter only when present and not blank.
    pub fn opt<V: Display>(&mut self, key: &str, value: Option<V>) -> &mut Self {
        if let Some(v) = value {
            let v = v.to_string();
            if !v.trim().is_empty() {
                self.params.push((key.to_string(), v.trim().to_string()));
            }
        }
        self
    }

    /// Add `page` and `size`.
    pub fn page(&mut self, page: u32, size: u32) -> &mut Self {
        self.eq("page", page).eq("size", size)
    }

    pub fn build(&self) -> Vec<(String, String)> {
        self.params.clone()
    }
}
