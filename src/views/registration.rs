//! Merchant signup: create a new shop or claim one already listed.

use tracing::warn;

use crate::api::waiting_list::looks_like_email;
use crate::error::{ClientError, Result};
use crate::models::{MerchantRegistration, MerchantUser, NewShopDetails, ShopSummary};
use crate::MerchantClient;

pub const MIN_PASSWORD_LEN: usize = 8;

/// Which shop the new account is attached to.
#[derive(Debug, Clone, PartialEq)]
pub enum ShopChoice {
    New(NewShopDetails),
    LinkExisting {
        query: String,
        results: Vec<ShopSummary>,
        selected: Option<i64>,
    },
}

impl ShopChoice {
    pub fn new_shop() -> Self {
        ShopChoice::New(NewShopDetails {
            name: String::new(),
            address: String::new(),
            city: String::new(),
            phone: None,
            website: None,
        })
    }

    pub fn link_existing() -> Self {
        ShopChoice::LinkExisting {
            query: String::new(),
            results: Vec::new(),
            selected: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RegistrationForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub shop: ShopChoice,
    pub errors: Vec<String>,
}

impl RegistrationForm {
    pub fn new(shop: ShopChoice) -> Self {
        Self {
            username: String::new(),
            email: String::new(),
            password: String::new(),
            confirm_password: String::new(),
            shop,
            errors: Vec::new(),
        }
    }

    fn account_fields_filled(&self) -> bool {
        !self.username.trim().is_empty()
            && !self.email.trim().is_empty()
            && !self.password.is_empty()
            && !self.confirm_password.is_empty()
    }

    /// Whether the submit button is enabled.
    ///
    /// Claiming an existing shop stays disabled until one has been picked from
    /// the search results; a new shop only needs its required fields.
    pub fn can_submit(&self) -> bool {
        if !self.account_fields_filled() {
            return false;
        }
        match &self.shop {
            ShopChoice::New(shop) => {
                !shop.name.trim().is_empty()
                    && !shop.address.trim().is_empty()
                    && !shop.city.trim().is_empty()
            }
            ShopChoice::LinkExisting { selected, .. } => selected.is_some(),
        }
    }

    /// Full synchronous validation, run before anything is sent.
    pub fn validate(&self) -> Vec<String> {
        let mut problems = Vec::new();
        if self.username.trim().is_empty() {
            problems.push("Username is required".to_string());
        }
        if !looks_like_email(&self.email) {
            problems.push("Please enter a valid email address".to_string());
        }
        if self.password.len() < MIN_PASSWORD_LEN {
            problems.push(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LEN
            ));
        }
        if self.password != self.confirm_password {
            problems.push("Passwords do not match".to_string());
        }
        match &self.shop {
            ShopChoice::New(shop) => {
                if shop.name.trim().is_empty() {
                    problems.push("Shop name is required".to_string());
                }
                if shop.address.trim().is_empty() {
                    problems.push("Shop address is required".to_string());
                }
                if shop.city.trim().is_empty() {
                    problems.push("City is required".to_string());
                }
            }
            ShopChoice::LinkExisting { selected, .. } => {
                if selected.is_none() {
                    problems.push("Select your shop from the search results".to_string());
                }
            }
        }
        problems
    }

    /// Search the shop directory for the claim flow. Clears any selection.
    pub async fn search_shops(&mut self, client: &MerchantClient, text: &str) -> Result<()> {
        let ShopChoice::LinkExisting {
            query,
            results,
            selected,
        } = &mut self.shop
        else {
            return Err(ClientError::InvalidArgument(
                "shop search only applies when linking an existing shop".to_string(),
            ));
        };
        *query = text.to_string();
        *selected = None;
        *results = client.shops().search(text).await?;
        Ok(())
    }

    /// Pick a shop from the current results. Already-claimed shops and ids
    /// not in the results are refused.
    pub fn select_shop(&mut self, shop_id: i64) -> bool {
        match &mut self.shop {
            ShopChoice::LinkExisting {
                results, selected, ..
            } => match results.iter().find(|s| s.id == shop_id) {
                Some(shop) if !shop.claimed => {
                    *selected = Some(shop_id);
                    true
                }
                _ => false,
            },
            ShopChoice::New(_) => false,
        }
    }

    pub fn to_registration(&self) -> Result<MerchantRegistration> {
        let problems = self.validate();
        if !problems.is_empty() {
            return Err(ClientError::Validation(problems));
        }
        let (new_shop, existing_shop_id) = match &self.shop {
            ShopChoice::New(shop) => (Some(shop.clone()), None),
            ShopChoice::LinkExisting { selected, .. } => (None, *selected),
        };
        Ok(MerchantRegistration {
            username: self.username.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            new_shop,
            existing_shop_id,
        })
    }

    /// Validate and submit. Validation problems are kept in `errors` and never
    /// reach the backend.
    pub async fn submit(&mut self, client: &MerchantClient) -> Result<MerchantUser> {
        let registration = match self.to_registration() {
            Ok(r) => r,
            Err(e) => {
                if let ClientError::Validation(problems) = &e {
                    self.errors = problems.clone();
                }
                return Err(e);
            }
        };
        self.errors.clear();
        match client.auth().register_merchant(&registration).await {
            Ok(user) => Ok(user),
            Err(e) => {
                warn!(error = %e, "merchant registration failed");
                self.errors = vec![e.user_message()];
                Err(e)
            }
        }
    }
}
